//! Operator lexing with maximal munch.
//!
//! Two-character forms are always preferred over their one-character
//! prefixes, so `<<` never lexes as two `<` tokens and `+=` never as
//! `+` `=`.

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an operator starting at the current character.
    ///
    /// The caller guarantees the current character is one of
    /// `+ - * / % = ! < > & | ^`.
    pub(crate) fn lex_operator(&mut self) -> TokenKind {
        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            '+' => {
                if self.cursor.match_char('+') {
                    TokenKind::PlusPlus
                } else if self.cursor.match_char('=') {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.cursor.match_char('-') {
                    TokenKind::MinusMinus
                } else if self.cursor.match_char('=') {
                    TokenKind::MinusAssign
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.cursor.match_char('=') {
                    TokenKind::StarAssign
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.cursor.match_char('=') {
                    TokenKind::SlashAssign
                } else {
                    TokenKind::Slash
                }
            }
            '%' => TokenKind::Percent,
            '=' => {
                if self.cursor.match_char('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.cursor.match_char('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.cursor.match_char('<') {
                    TokenKind::Shl
                } else if self.cursor.match_char('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.match_char('>') {
                    TokenKind::Shr
                } else if self.cursor.match_char('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.cursor.match_char('&') {
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.cursor.match_char('|') {
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            // '^' is the only caller case left.
            _ => TokenKind::Caret,
        }
    }
}
