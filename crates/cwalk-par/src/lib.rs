//! cwalk-par - Recursive-descent parser for the interpreted C subset.
//!
//! The parser pulls tokens lazily from a [`Lexer`], holding exactly one
//! token of lookahead, and builds the arena [`Ast`]. The grammar:
//!
//! ```text
//! program      := decl*
//! decl         := include | function_decl | var_decls
//! include      := '#' 'include' '<' ID '.' ID '>'
//! function_decl:= type ID '(' params? ')' compound
//! var_decls    := type init_decl (',' init_decl)* ';'
//! statement    := iter | sel | jump | compound | expr_stmt
//! expression   := assignment (',' assignment)*
//! assignment   := variable asg_op assignment | conditional
//! conditional  := logical_or ('?' expression ':' conditional)?
//! ```
//!
//! Expression precedence is encoded as one production per level,
//! lowest to highest: logical-or, logical-and, bitwise-or, bitwise-xor,
//! bitwise-and, equality, relational, shift, additive, multiplicative,
//! cast, unary, postfix, primary. Every binary level is a
//! left-associative loop; assignment and the conditional operator
//! recurse to the right.
//!
//! Three productions need more than one token of lookahead: telling a
//! function declaration from a variable declaration, spotting a cast
//! `(type)`, and spotting an assignment from its left-hand side. Each
//! is decided by a speculative probe: save the current token and the
//! lexer position, run a small parse that answers yes or no, restore
//! both. That is the only backtracking in the parser.

mod ast;
mod expr;
mod items;
mod stmt;

pub use ast::{AssignOp, Ast, BinOp, CType, Node, NodeId, NumLit, UnOp};

use cwalk_lex::{Lexer, Token, TokenKind};
use cwalk_util::{CwalkError, IndexVec, Result};

/// Recursive-descent parser over a lazy token stream.
pub struct Parser<'a> {
    /// Token source.
    lexer: Lexer<'a>,

    /// One token of lookahead.
    current: Token,

    /// Arena collecting every node as it is built.
    nodes: IndexVec<NodeId, Node>,
}

impl<'a> Parser<'a> {
    /// Creates a parser and preloads one token of lookahead.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            nodes: IndexVec::new(),
        })
    }

    /// Parses a whole program and asserts the input is exhausted.
    pub fn parse(mut self) -> Result<Ast> {
        let root = self.program()?;

        if self.current.kind != TokenKind::Eof {
            return Err(self.unexpected("end of file"));
        }

        Ok(Ast::new(self.nodes, root))
    }

    /// Appends a node to the arena and returns its id.
    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node)
    }

    /// Consumes the current token, pulling the next one, and returns
    /// the consumed token.
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consumes the current token if it is exactly `kind`.
    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(CwalkError::syntax(
                format!(
                    "expected token <{}> but found <{}>",
                    kind, self.current.kind
                ),
                self.current.line,
            ))
        }
    }

    /// Consumes the current token if it matches, reporting whether it did.
    fn match_kind(&mut self, kind: TokenKind) -> Result<bool> {
        if self.current.kind == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token, which must be an identifier, and
    /// returns its name.
    fn expect_ident(&mut self) -> Result<String> {
        match self.current.kind {
            TokenKind::Ident(_) => {
                let token = self.advance()?;
                match token.kind {
                    TokenKind::Ident(name) => Ok(name),
                    _ => unreachable!(),
                }
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Error for a token that does not fit the production.
    fn unexpected(&self, expected: &str) -> CwalkError {
        CwalkError::syntax(
            format!(
                "expected token <{}> but found <{}>",
                expected, self.current.kind
            ),
            self.current.line,
        )
    }

    /// Runs a speculative parse and restores the stream exactly.
    ///
    /// The closure advances through tokens freely and answers whether
    /// the construct ahead matches. Errors inside the probe count as a
    /// non-match; the stream is rewound either way.
    fn probe<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> Result<bool>,
    {
        let saved_token = self.current.clone();
        let saved_lexer = self.lexer.snapshot();

        let matched = f(self).unwrap_or(false);

        self.current = saved_token;
        self.lexer.restore(saved_lexer);
        matched
    }
}

#[cfg(test)]
pub(crate) fn parse_source(source: &str) -> Result<Ast> {
    Parser::new(Lexer::new(source))?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_program() {
        let ast = parse_source("").unwrap();
        match ast.node(ast.root()) {
            Node::Program { decls, .. } => assert!(decls.is_empty()),
            other => panic!("expected Program, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_source("int main() { return 0; } 42").unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
    }

    #[test]
    fn test_probe_restores_stream() {
        let lexer = Lexer::new("a b c");
        let mut parser = Parser::new(lexer).unwrap();

        let matched = parser.probe(|p| {
            p.advance()?;
            p.advance()?;
            Ok(false)
        });

        assert!(!matched);
        assert_eq!(parser.current.kind, TokenKind::Ident("a".into()));
    }

    #[test]
    fn test_probe_restores_on_error() {
        // The probe hits a lexical error ("$") and must still rewind.
        let lexer = Lexer::new("a $");
        let mut parser = Parser::new(lexer).unwrap();

        let matched = parser.probe(|p| {
            p.advance()?;
            p.advance()?;
            Ok(true)
        });

        assert!(!matched);
        assert_eq!(parser.current.kind, TokenKind::Ident("a".into()));
    }
}
