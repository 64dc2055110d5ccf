//! Integer and real literal lexing.

use cwalk_util::{CwalkError, Result};

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a numeric literal.
    ///
    /// A plain digit sequence is an integer constant; a digit sequence
    /// with exactly one interior `.` is a real constant. Anything else
    /// that starts with a digit is malformed.
    pub(crate) fn lex_number(&mut self) -> Result<TokenKind> {
        let line = self.cursor.line();
        let start = self.cursor.position();

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() != '.' {
            let text = self.cursor.slice_from(start);
            return match text.parse::<i64>() {
                Ok(value) => Ok(TokenKind::IntConst(value)),
                Err(_) => Err(CwalkError::lexer(
                    format!("integer literal '{}' is too large", text),
                    line,
                )),
            };
        }

        // Consume the dot; a real literal needs digits on both sides.
        self.cursor.advance();
        if !self.cursor.current_char().is_ascii_digit() {
            return Err(CwalkError::lexer(
                format!("malformed real literal '{}'", self.cursor.slice_from(start)),
                line,
            ));
        }
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        // A second dot means something like `1.2.3`.
        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            return Err(CwalkError::lexer(
                format!("malformed real literal '{}'", self.cursor.slice_from(start)),
                line,
            ));
        }

        let text = self.cursor.slice_from(start);
        match text.parse::<f64>() {
            Ok(value) => Ok(TokenKind::RealConst(value)),
            Err(_) => Err(CwalkError::lexer(
                format!("malformed real literal '{}'", text),
                line,
            )),
        }
    }
}
