//! Top-level declaration parsing: includes, functions, variables.

use cwalk_lex::TokenKind;
use cwalk_util::{CwalkError, Result};

use crate::ast::{CType, Node, NodeId};
use crate::Parser;

impl<'a> Parser<'a> {
    /// `program := decl*`
    pub(crate) fn program(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        let decls = self.declarations()?;
        Ok(self.push(Node::Program { decls, line }))
    }

    /// Collects top-level declarations in source order.
    ///
    /// A declarator list with initializers contributes one
    /// `VarDeclaration` per name plus one `Assign` per initializer,
    /// declaration first.
    fn declarations(&mut self) -> Result<Vec<NodeId>> {
        let mut decls = Vec::new();

        loop {
            if self.current.kind == TokenKind::Hash {
                decls.push(self.include_library()?);
            } else if self.current.kind.is_type_keyword() {
                if self.check_function() {
                    decls.push(self.function_declaration()?);
                } else {
                    decls.extend(self.declaration_list()?);
                }
            } else {
                return Ok(decls);
            }
        }
    }

    /// `include := '#' 'include' '<' ID '.' ID '>'`
    ///
    /// Only the shape is enforced here; the analyzer checks that the
    /// extension is `h` and that the library is one it can bind.
    fn include_library(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        self.expect(TokenKind::Hash)?;

        let directive = self.expect_ident()?;
        if directive != "include" {
            return Err(CwalkError::syntax(
                format!("expected token <include> but found <{}>", directive),
                line,
            ));
        }

        self.expect(TokenKind::Lt)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Dot)?;
        let ext = self.expect_ident()?;
        self.expect(TokenKind::Gt)?;

        Ok(self.push(Node::IncludeLibrary { name, ext, line }))
    }

    /// Probe: does a type keyword start a function declaration rather
    /// than a variable declaration? True when `type ID (` lies ahead.
    fn check_function(&mut self) -> bool {
        self.probe(|p| {
            p.advance()?;
            match p.current.kind {
                TokenKind::Ident(_) => {
                    p.advance()?;
                }
                _ => return Ok(false),
            }
            Ok(p.current.kind == TokenKind::LParen)
        })
    }

    /// `function_decl := type ID '(' params? ')' compound`
    fn function_declaration(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        let ret_type = self.type_spec()?;
        let name = self.expect_ident()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parameters()?;
        self.expect(TokenKind::RParen)?;

        let body = self.function_body()?;

        Ok(self.push(Node::FunctionDeclaration {
            ret_type,
            name,
            params,
            body,
            line,
        }))
    }

    /// `params := (type variable)(',' type variable)*`
    fn parameters(&mut self) -> Result<Vec<NodeId>> {
        let mut params = Vec::new();

        if self.current.kind == TokenKind::RParen {
            return Ok(params);
        }

        loop {
            let line = self.current.line;
            let ty = self.type_spec()?;
            let name = self.expect_ident()?;
            params.push(self.push(Node::Param { ty, name, line }));

            if !self.match_kind(TokenKind::Comma)? {
                return Ok(params);
            }
        }
    }

    /// Function body: declarations intermixed with statements inside
    /// braces, like a compound statement but kept as its own node so
    /// the evaluator can run it in the frame's base scope.
    fn function_body(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        self.expect(TokenKind::LBrace)?;

        let mut children = Vec::new();
        while self.current.kind != TokenKind::RBrace {
            if self.current.kind == TokenKind::Eof {
                return Err(self.unexpected("}"));
            }
            if self.is_var_decl_start() {
                children.extend(self.declaration_list()?);
            } else {
                children.push(self.statement()?);
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(self.push(Node::FunctionBody { children, line }))
    }

    /// True when the current token can start a local variable
    /// declaration (`void` cannot).
    pub(crate) fn is_var_decl_start(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Char | TokenKind::Int | TokenKind::Float | TokenKind::Double
        )
    }

    /// `var_decls := type init_decl (',' init_decl)* ';'`
    ///
    /// Returns the flattened node list: a `VarDeclaration` for every
    /// declarator, followed by an `Assign` when it has an initializer.
    pub(crate) fn declaration_list(&mut self) -> Result<Vec<NodeId>> {
        let ty = self.type_spec()?;
        let mut nodes = Vec::new();

        loop {
            self.init_declarator(ty, &mut nodes)?;
            if !self.match_kind(TokenKind::Comma)? {
                break;
            }
        }

        self.expect(TokenKind::Semicolon)?;
        Ok(nodes)
    }

    /// `init_decl := variable ('=' assignment)?`
    fn init_declarator(&mut self, ty: CType, nodes: &mut Vec<NodeId>) -> Result<()> {
        let line = self.current.line;
        let name = self.expect_ident()?;
        nodes.push(self.push(Node::VarDeclaration {
            ty,
            name: name.clone(),
            line,
        }));

        if self.current.kind == TokenKind::Assign {
            self.advance()?;
            let target = self.push(Node::Var { name, line });
            let value = self.assignment_expression()?;
            nodes.push(self.push(Node::Assign {
                target,
                op: crate::ast::AssignOp::Assign,
                value,
                line,
            }));
        }

        Ok(())
    }

    /// Consumes a type keyword.
    pub(crate) fn type_spec(&mut self) -> Result<CType> {
        let ty = match self.current.kind {
            TokenKind::Char => CType::Char,
            TokenKind::Int => CType::Int,
            TokenKind::Float => CType::Float,
            TokenKind::Double => CType::Double,
            TokenKind::Void => CType::Void,
            _ => return Err(self.unexpected("type name")),
        };
        self.advance()?;
        Ok(ty)
    }
}
