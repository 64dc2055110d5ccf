//! Expression parsing.
//!
//! One production per precedence level, lowest binding first:
//!
//! | Level | Operators |
//! |---|---|
//! | comma | `,` |
//! | assignment | `=` `+=` `-=` `*=` `/=` (right) |
//! | conditional | `?:` (right) |
//! | logical-or | `\|\|` |
//! | logical-and | `&&` |
//! | bitwise-or | `\|` |
//! | bitwise-xor | `^` |
//! | bitwise-and | `&` |
//! | equality | `==` `!=` |
//! | relational | `<` `>` `<=` `>=` |
//! | shift | `<<` `>>` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | cast | `(type)` |
//! | unary | `++` `--` `!` `+` `-` `&` |
//! | postfix | `++` `--` `(args)` |
//!
//! Binary levels iterate (left-associative); assignment and the
//! conditional recurse into themselves on the right.

use cwalk_lex::TokenKind;
use cwalk_util::{CwalkError, Result};

use crate::ast::{AssignOp, BinOp, Node, NodeId, NumLit, UnOp};
use crate::Parser;

impl<'a> Parser<'a> {
    /// `expression := assignment (',' assignment)*`
    ///
    /// Always wraps its children in an `Expression` node whose value is
    /// the last child's value.
    pub(crate) fn expression(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        let mut children = vec![self.assignment_expression()?];

        while self.match_kind(TokenKind::Comma)? {
            children.push(self.assignment_expression()?);
        }

        Ok(self.push(Node::Expression { children, line }))
    }

    /// Probe: does an assignment expression start here? True when an
    /// identifier followed by an assignment operator lies ahead.
    fn check_assignment(&mut self) -> bool {
        self.probe(|p| {
            if matches!(p.current.kind, TokenKind::Ident(_)) {
                p.advance()?;
                Ok(p.current.kind.is_assign_op())
            } else {
                Ok(false)
            }
        })
    }

    /// `assignment := variable asg_op assignment | conditional`
    pub(crate) fn assignment_expression(&mut self) -> Result<NodeId> {
        if !self.check_assignment() {
            return self.conditional_expression();
        }

        let line = self.current.line;
        let target = self.variable()?;

        let op = match self.current.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            _ => return Err(self.unexpected("assignment operator")),
        };
        self.advance()?;

        let value = self.assignment_expression()?;
        Ok(self.push(Node::Assign {
            target,
            op,
            value,
            line,
        }))
    }

    /// `conditional := logical_or ('?' expression ':' conditional)?`
    fn conditional_expression(&mut self) -> Result<NodeId> {
        let cond = self.logical_or_expression()?;

        if self.current.kind != TokenKind::Question {
            return Ok(cond);
        }

        let line = self.current.line;
        self.advance()?;
        let then_expr = self.expression()?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.conditional_expression()?;

        Ok(self.push(Node::TernaryOperator {
            cond,
            then_expr,
            else_expr,
            line,
        }))
    }

    fn logical_or_expression(&mut self) -> Result<NodeId> {
        let mut node = self.logical_and_expression()?;
        while self.current.kind == TokenKind::OrOr {
            let line = self.current.line;
            self.advance()?;
            let right = self.logical_and_expression()?;
            node = self.push(Node::BinaryOperator {
                op: BinOp::Or,
                left: node,
                right,
                line,
            });
        }
        Ok(node)
    }

    fn logical_and_expression(&mut self) -> Result<NodeId> {
        let mut node = self.inclusive_or_expression()?;
        while self.current.kind == TokenKind::AndAnd {
            let line = self.current.line;
            self.advance()?;
            let right = self.inclusive_or_expression()?;
            node = self.push(Node::BinaryOperator {
                op: BinOp::And,
                left: node,
                right,
                line,
            });
        }
        Ok(node)
    }

    fn inclusive_or_expression(&mut self) -> Result<NodeId> {
        let mut node = self.exclusive_or_expression()?;
        while self.current.kind == TokenKind::Pipe {
            let line = self.current.line;
            self.advance()?;
            let right = self.exclusive_or_expression()?;
            node = self.push(Node::BinaryOperator {
                op: BinOp::BitOr,
                left: node,
                right,
                line,
            });
        }
        Ok(node)
    }

    fn exclusive_or_expression(&mut self) -> Result<NodeId> {
        let mut node = self.and_expression()?;
        while self.current.kind == TokenKind::Caret {
            let line = self.current.line;
            self.advance()?;
            let right = self.and_expression()?;
            node = self.push(Node::BinaryOperator {
                op: BinOp::BitXor,
                left: node,
                right,
                line,
            });
        }
        Ok(node)
    }

    fn and_expression(&mut self) -> Result<NodeId> {
        let mut node = self.equality_expression()?;
        while self.current.kind == TokenKind::Amp {
            let line = self.current.line;
            self.advance()?;
            let right = self.equality_expression()?;
            node = self.push(Node::BinaryOperator {
                op: BinOp::BitAnd,
                left: node,
                right,
                line,
            });
        }
        Ok(node)
    }

    fn equality_expression(&mut self) -> Result<NodeId> {
        let mut node = self.relational_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => return Ok(node),
            };
            let line = self.current.line;
            self.advance()?;
            let right = self.relational_expression()?;
            node = self.push(Node::BinaryOperator {
                op,
                left: node,
                right,
                line,
            });
        }
    }

    fn relational_expression(&mut self) -> Result<NodeId> {
        let mut node = self.shift_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::GtEq => BinOp::GtEq,
                _ => return Ok(node),
            };
            let line = self.current.line;
            self.advance()?;
            let right = self.shift_expression()?;
            node = self.push(Node::BinaryOperator {
                op,
                left: node,
                right,
                line,
            });
        }
    }

    fn shift_expression(&mut self) -> Result<NodeId> {
        let mut node = self.additive_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => return Ok(node),
            };
            let line = self.current.line;
            self.advance()?;
            let right = self.additive_expression()?;
            node = self.push(Node::BinaryOperator {
                op,
                left: node,
                right,
                line,
            });
        }
    }

    fn additive_expression(&mut self) -> Result<NodeId> {
        let mut node = self.multiplicative_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => return Ok(node),
            };
            let line = self.current.line;
            self.advance()?;
            let right = self.multiplicative_expression()?;
            node = self.push(Node::BinaryOperator {
                op,
                left: node,
                right,
                line,
            });
        }
    }

    fn multiplicative_expression(&mut self) -> Result<NodeId> {
        let mut node = self.cast_expression()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => return Ok(node),
            };
            let line = self.current.line;
            self.advance()?;
            let right = self.cast_expression()?;
            node = self.push(Node::BinaryOperator {
                op,
                left: node,
                right,
                line,
            });
        }
    }

    /// Probe: does `(type)` lie ahead? Distinguishes a cast from a
    /// parenthesized expression.
    fn check_cast(&mut self) -> bool {
        self.probe(|p| {
            if p.current.kind != TokenKind::LParen {
                return Ok(false);
            }
            p.advance()?;
            if !matches!(
                p.current.kind,
                TokenKind::Char | TokenKind::Int | TokenKind::Float | TokenKind::Double
            ) {
                return Ok(false);
            }
            p.advance()?;
            Ok(p.current.kind == TokenKind::RParen)
        })
    }

    /// `cast := '(' type ')' cast | unary`
    fn cast_expression(&mut self) -> Result<NodeId> {
        if !self.check_cast() {
            return self.unary_expression();
        }

        let line = self.current.line;
        self.expect(TokenKind::LParen)?;
        let ty = self.type_spec()?;
        self.expect(TokenKind::RParen)?;
        let expr = self.cast_expression()?;

        Ok(self.push(Node::UnaryOperator {
            op: UnOp::Cast(ty),
            expr,
            prefix: true,
            line,
        }))
    }

    /// Prefix `++` `--` `!` `+` `-` `&` and fallthrough to postfix.
    fn unary_expression(&mut self) -> Result<NodeId> {
        let line = self.current.line;

        let op = match self.current.kind {
            TokenKind::PlusPlus => UnOp::Inc,
            TokenKind::MinusMinus => UnOp::Dec,
            TokenKind::Plus => UnOp::Plus,
            TokenKind::Minus => UnOp::Minus,
            TokenKind::Not => UnOp::Not,
            TokenKind::Amp => UnOp::Addr,
            _ => return self.postfix_expression(),
        };
        self.advance()?;

        // `++`/`--` nest through further unary operators; the rest
        // bind a cast expression.
        let expr = if matches!(op, UnOp::Inc | UnOp::Dec) {
            self.unary_expression()?
        } else {
            self.cast_expression()?
        };

        Ok(self.push(Node::UnaryOperator {
            op,
            expr,
            prefix: true,
            line,
        }))
    }

    /// Postfix `++`/`--` and call application, at most one of either.
    fn postfix_expression(&mut self) -> Result<NodeId> {
        let node = self.primary_expression()?;

        match self.current.kind {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.current.kind == TokenKind::PlusPlus {
                    UnOp::Inc
                } else {
                    UnOp::Dec
                };
                let line = self.current.line;
                self.advance()?;
                Ok(self.push(Node::UnaryOperator {
                    op,
                    expr: node,
                    prefix: false,
                    line,
                }))
            }
            TokenKind::LParen => {
                let line = self.current.line;
                self.advance()?;
                let args = if self.current.kind == TokenKind::RParen {
                    Vec::new()
                } else {
                    self.argument_expression_list()?
                };
                self.expect(TokenKind::RParen)?;

                let name = match self.nodes[node] {
                    Node::Var { ref name, .. } => name.clone(),
                    _ => {
                        return Err(CwalkError::syntax(
                            "function name must be an identifier",
                            line,
                        ));
                    }
                };
                Ok(self.push(Node::FunctionCall { name, args, line }))
            }
            _ => Ok(node),
        }
    }

    fn argument_expression_list(&mut self) -> Result<Vec<NodeId>> {
        let mut args = vec![self.assignment_expression()?];
        while self.match_kind(TokenKind::Comma)? {
            args.push(self.assignment_expression()?);
        }
        Ok(args)
    }

    /// `primary := '(' expression ')' | constant | string | variable`
    ///
    /// A parenthesized expression yields the contained node directly,
    /// never a wrapper.
    fn primary_expression(&mut self) -> Result<NodeId> {
        let line = self.current.line;

        match self.current.kind {
            TokenKind::LParen => {
                self.advance()?;
                let node = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(node)
            }
            TokenKind::IntConst(value) => {
                self.advance()?;
                Ok(self.push(Node::Num {
                    value: NumLit::Int(value),
                    line,
                }))
            }
            TokenKind::RealConst(value) => {
                self.advance()?;
                Ok(self.push(Node::Num {
                    value: NumLit::Real(value),
                    line,
                }))
            }
            TokenKind::CharConst(value) => {
                self.advance()?;
                Ok(self.push(Node::Num {
                    value: NumLit::Char(value),
                    line,
                }))
            }
            TokenKind::Str(_) => {
                let token = self.advance()?;
                match token.kind {
                    TokenKind::Str(value) => Ok(self.push(Node::Str { value, line })),
                    _ => unreachable!(),
                }
            }
            TokenKind::Ident(_) => self.variable(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Consumes an identifier into a `Var` node.
    pub(crate) fn variable(&mut self) -> Result<NodeId> {
        let line = self.current.line;
        let name = self.expect_ident()?;
        Ok(self.push(Node::Var { name, line }))
    }
}
