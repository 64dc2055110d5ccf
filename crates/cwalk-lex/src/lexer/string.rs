//! String and character literal lexing.

use cwalk_util::{CwalkError, Result};

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a `"..."` string literal, processing escape sequences.
    pub(crate) fn lex_string(&mut self) -> Result<TokenKind> {
        let line = self.cursor.line();
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return Err(CwalkError::lexer("unterminated string literal", line));
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                content.push(self.lex_escape()? as char);
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Ok(TokenKind::Str(content))
    }

    /// Lexes a `'x'` character literal into its 8-bit code point.
    pub(crate) fn lex_char(&mut self) -> Result<TokenKind> {
        let line = self.cursor.line();
        self.cursor.advance();

        if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
            return Err(CwalkError::lexer("unterminated character literal", line));
        }

        let c = self.cursor.current_char();
        if c == '\'' {
            return Err(CwalkError::lexer("empty character literal", line));
        }

        let value = if c == '\\' {
            self.cursor.advance();
            self.lex_escape()?
        } else {
            let code = c as u32;
            if code > 0xFF {
                return Err(CwalkError::lexer(
                    format!("character literal '{}' is out of range", c),
                    line,
                ));
            }
            self.cursor.advance();
            code as u8
        };

        if !self.cursor.match_char('\'') {
            return Err(CwalkError::lexer("unterminated character literal", line));
        }

        Ok(TokenKind::CharConst(value))
    }

    /// Decodes the escape character after a consumed backslash.
    fn lex_escape(&mut self) -> Result<u8> {
        let line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Err(CwalkError::lexer("unterminated escape sequence", line));
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'n' => Ok(b'\n'),
            't' => Ok(b'\t'),
            '\\' => Ok(b'\\'),
            '\'' => Ok(b'\''),
            '"' => Ok(b'"'),
            '0' => Ok(0),
            _ => Err(CwalkError::lexer(
                format!("unknown escape sequence '\\{}'", c),
                line,
            )),
        }
    }
}
