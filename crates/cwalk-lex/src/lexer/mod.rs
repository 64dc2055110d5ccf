//! Core lexer: dispatch, whitespace and comment skipping, state saving.
//!
//! The specialized scanning routines live in sibling modules, one per
//! concern, as `impl Lexer` blocks:
//!
//! - `ident` - identifiers and reserved words
//! - `number` - integer and real literals
//! - `string` - string and character literals with escapes
//! - `operator` - operators, with maximal munch for the
//!   multi-character forms

mod ident;
mod number;
mod operator;
mod string;

use cwalk_util::{CwalkError, Result};

use crate::cursor::{Cursor, CursorSnapshot};
use crate::token::{Token, TokenKind};

/// The lexer: a cursor over source text producing one token per call.
///
/// Tokens are produced lazily; the parser holds exactly one token of
/// lookahead and pulls the next with [`next_token`](Lexer::next_token).
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
}

/// A saved lexer state, restorable with [`Lexer::restore`].
#[derive(Clone, Copy, Debug)]
pub struct LexerSnapshot {
    cursor: CursorSnapshot,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Saves the stream position so a speculative parse can rewind.
    pub fn snapshot(&self) -> LexerSnapshot {
        LexerSnapshot {
            cursor: self.cursor.snapshot(),
        }
    }

    /// Rewinds to a previously saved position.
    pub fn restore(&mut self, snapshot: LexerSnapshot) {
        self.cursor.restore(snapshot.cursor);
    }

    /// Consumes and returns the next token.
    ///
    /// Skips whitespace and `/* ... */` comments first. At the end of
    /// input every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        let line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, line));
        }

        let kind = match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                TokenKind::LParen
            }
            ')' => {
                self.cursor.advance();
                TokenKind::RParen
            }
            '{' => {
                self.cursor.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.cursor.advance();
                TokenKind::RBrace
            }
            ';' => {
                self.cursor.advance();
                TokenKind::Semicolon
            }
            ',' => {
                self.cursor.advance();
                TokenKind::Comma
            }
            '.' => {
                self.cursor.advance();
                TokenKind::Dot
            }
            '?' => {
                self.cursor.advance();
                TokenKind::Question
            }
            ':' => {
                self.cursor.advance();
                TokenKind::Colon
            }
            '#' => {
                self.cursor.advance();
                TokenKind::Hash
            }
            '"' => self.lex_string()?,
            '\'' => self.lex_char()?,
            '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' => {
                self.lex_operator()
            }
            c if c.is_ascii_digit() => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(),
            c => {
                return Err(CwalkError::lexer(format!("unknown character '{}'", c), line));
            }
        };

        Ok(Token::new(kind, line))
    }

    /// Skips whitespace and block comments, in any interleaving.
    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while !self.cursor.is_at_end() && self.cursor.current_char().is_whitespace() {
                self.cursor.advance();
            }

            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
                let start_line = self.cursor.line();
                self.cursor.advance();
                self.cursor.advance();

                loop {
                    if self.cursor.is_at_end() {
                        return Err(CwalkError::lexer("unterminated comment", start_line));
                    }
                    if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
            } else {
                return Ok(());
            }
        }
    }
}
