//! Identifier and keyword lexing.

use crate::token::TokenKind;
use crate::Lexer;

/// Maps a lexeme to its reserved-word kind, if it is one.
fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "char" => TokenKind::Char,
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "double" => TokenKind::Double,
        "void" => TokenKind::Void,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "for" => TokenKind::For,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        _ => return None,
    };
    Some(kind)
}

impl<'a> Lexer<'a> {
    /// Lexes `[A-Za-z_][A-Za-z0-9_]*`, yielding a keyword kind when the
    /// lexeme is reserved and an identifier otherwise.
    pub(crate) fn lex_ident(&mut self) -> TokenKind {
        let start = self.cursor.position();

        loop {
            let c = self.cursor.current_char();
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }
}
