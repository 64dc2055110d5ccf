//! Statement parsing: iteration, selection, jumps, compounds.

use cwalk_lex::TokenKind;
use cwalk_util::Result;

use crate::ast::{Node, NodeId};
use crate::Parser;

impl<'a> Parser<'a> {
    /// `statement := iter | sel | jump | compound | expr_stmt`
    pub(crate) fn statement(&mut self) -> Result<NodeId> {
        match self.current.kind {
            TokenKind::While | TokenKind::Do | TokenKind::For => self.iteration_statement(),
            TokenKind::If => self.selection_statement(),
            TokenKind::Return | TokenKind::Break | TokenKind::Continue => self.jump_statement(),
            TokenKind::LBrace => self.compound_statement(),
            _ => self.expression_statement(),
        }
    }

    /// `while`, `do ... while`, and `for` loops.
    fn iteration_statement(&mut self) -> Result<NodeId> {
        let line = self.current.line;

        match self.current.kind {
            TokenKind::While => {
                self.advance()?;
                self.expect(TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(TokenKind::RParen)?;
                let body = self.statement()?;
                Ok(self.push(Node::WhileStatement { cond, body, line }))
            }
            TokenKind::Do => {
                self.advance()?;
                let body = self.statement()?;
                self.expect(TokenKind::While)?;
                self.expect(TokenKind::LParen)?;
                let cond = self.expression()?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.push(Node::DoWhileStatement { cond, body, line }))
            }
            _ => {
                self.expect(TokenKind::For)?;
                self.expect(TokenKind::LParen)?;
                let setup = self.expression_statement()?;
                let cond = self.expression_statement()?;
                let step = if self.current.kind == TokenKind::RParen {
                    let line = self.current.line;
                    self.push(Node::NoOp { line })
                } else {
                    self.expression()?
                };
                self.expect(TokenKind::RParen)?;
                let body = self.statement()?;
                Ok(self.push(Node::ForStatement {
                    setup,
                    cond,
                    step,
                    body,
                    line,
                }))
            }
        }
    }

    /// `if '(' expression ')' statement ('else' statement)?`
    fn selection_statement(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen)?;

        let then_body = self.statement()?;
        let else_body = if self.match_kind(TokenKind::Else)? {
            self.statement()?
        } else {
            self.push(Node::NoOp { line })
        };

        Ok(self.push(Node::IfStatement {
            cond,
            then_body,
            else_body,
            line,
        }))
    }

    /// `return expression? ';' | break ';' | continue ';'`
    fn jump_statement(&mut self) -> Result<NodeId> {
        let line = self.current.line;

        match self.current.kind {
            TokenKind::Return => {
                self.advance()?;
                let expr = if self.current.kind == TokenKind::Semicolon {
                    self.push(Node::NoOp { line })
                } else {
                    self.expression()?
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(self.push(Node::ReturnStmt { expr, line }))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.push(Node::BreakStatement { line }))
            }
            _ => {
                self.expect(TokenKind::Continue)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.push(Node::ContinueStatement { line }))
            }
        }
    }

    /// `compound := '{' (var_decls | statement)* '}'`
    pub(crate) fn compound_statement(&mut self) -> Result<NodeId> {
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

        Ok(self.push(Node::CompoundStatement { children, line }))
    }

    /// `expr_stmt := expression? ';'` - an empty statement is a `NoOp`.
    pub(crate) fn expression_statement(&mut self) -> Result<NodeId> {
        if self.current.kind == TokenKind::Semicolon {
            let line = self.current.line;
            self.advance()?;
            return Ok(self.push(Node::NoOp { line }));
        }

        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;
    use crate::Ast;

    /// Parses a program with `body` inside `main` and returns the
    /// function body children.
    fn body_of_main(source_body: &str) -> (Ast, Vec<NodeId>) {
        let source = format!("int main() {{ {} }}", source_body);
        let ast = parse_source(&source).unwrap();
        let root = ast.root();
        let decls = match ast.node(root) {
            Node::Program { decls, .. } => decls.clone(),
            other => panic!("expected Program, got {:?}", other),
        };
        let body = match ast.node(decls[0]) {
            Node::FunctionDeclaration { body, .. } => *body,
            other => panic!("expected FunctionDeclaration, got {:?}", other),
        };
        let children = match ast.node(body) {
            Node::FunctionBody { children, .. } => children.clone(),
            other => panic!("expected FunctionBody, got {:?}", other),
        };
        (ast, children)
    }

    #[test]
    fn test_while_statement() {
        let (ast, children) = body_of_main("while (1) { }");
        match ast.node(children[0]) {
            Node::WhileStatement { body, .. } => {
                assert!(matches!(ast.node(*body), Node::CompoundStatement { .. }));
            }
            other => panic!("expected WhileStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_do_while_statement() {
        let (ast, children) = body_of_main("do { } while (0);");
        assert!(matches!(
            ast.node(children[0]),
            Node::DoWhileStatement { .. }
        ));
    }

    #[test]
    fn test_do_while_requires_semicolon() {
        let err = parse_source("int main() { do { } while (0) }").unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
    }

    #[test]
    fn test_for_statement_full() {
        let (ast, children) = body_of_main("for (i = 0; i < 5; i = i + 1) { }");
        match ast.node(children[0]) {
            Node::ForStatement {
                setup, cond, step, ..
            } => {
                assert!(matches!(ast.node(*setup), Node::Expression { .. }));
                assert!(matches!(ast.node(*cond), Node::Expression { .. }));
                assert!(matches!(ast.node(*step), Node::Expression { .. }));
            }
            other => panic!("expected ForStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_statement_empty_sections() {
        let (ast, children) = body_of_main("for (;;) break;");
        match ast.node(children[0]) {
            Node::ForStatement {
                setup, cond, step, ..
            } => {
                assert!(matches!(ast.node(*setup), Node::NoOp { .. }));
                assert!(matches!(ast.node(*cond), Node::NoOp { .. }));
                assert!(matches!(ast.node(*step), Node::NoOp { .. }));
            }
            other => panic!("expected ForStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else() {
        let (ast, children) = body_of_main("if (1) return 1; else return 2;");
        match ast.node(children[0]) {
            Node::IfStatement { else_body, .. } => {
                assert!(matches!(ast.node(*else_body), Node::ReturnStmt { .. }));
            }
            other => panic!("expected IfStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else_gets_noop() {
        let (ast, children) = body_of_main("if (1) return 1;");
        match ast.node(children[0]) {
            Node::IfStatement { else_body, .. } => {
                assert!(matches!(ast.node(*else_body), Node::NoOp { .. }));
            }
            other => panic!("expected IfStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_else_binds_to_inner_if() {
        let (ast, children) = body_of_main("if (1) if (0) return 1; else return 2;");
        match ast.node(children[0]) {
            Node::IfStatement {
                then_body,
                else_body,
                ..
            } => {
                assert!(matches!(ast.node(*else_body), Node::NoOp { .. }));
                match ast.node(*then_body) {
                    Node::IfStatement { else_body, .. } => {
                        assert!(matches!(ast.node(*else_body), Node::ReturnStmt { .. }));
                    }
                    other => panic!("expected inner IfStatement, got {:?}", other),
                }
            }
            other => panic!("expected IfStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_jump_statements() {
        let (ast, children) = body_of_main("break; continue; return;");
        assert!(matches!(ast.node(children[0]), Node::BreakStatement { .. }));
        assert!(matches!(
            ast.node(children[1]),
            Node::ContinueStatement { .. }
        ));
        match ast.node(children[2]) {
            Node::ReturnStmt { expr, .. } => {
                assert!(matches!(ast.node(*expr), Node::NoOp { .. }));
            }
            other => panic!("expected ReturnStmt, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_statement_is_noop() {
        let (ast, children) = body_of_main(";;");
        assert_eq!(children.len(), 2);
        assert!(matches!(ast.node(children[0]), Node::NoOp { .. }));
    }

    #[test]
    fn test_nested_compounds() {
        let (ast, children) = body_of_main("{ { int x; } }");
        match ast.node(children[0]) {
            Node::CompoundStatement { children, .. } => {
                assert!(matches!(
                    ast.node(children[0]),
                    Node::CompoundStatement { .. }
                ));
            }
            other => panic!("expected CompoundStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_declarations_intermixed_with_statements() {
        let (ast, children) = body_of_main("int x; x = 1; int y = 2; return x;");
        assert_eq!(children.len(), 5);
        assert!(matches!(ast.node(children[0]), Node::VarDeclaration { .. }));
        assert!(matches!(ast.node(children[1]), Node::Expression { .. }));
        assert!(matches!(ast.node(children[2]), Node::VarDeclaration { .. }));
        assert!(matches!(ast.node(children[3]), Node::Assign { .. }));
        assert!(matches!(ast.node(children[4]), Node::ReturnStmt { .. }));
    }
}
