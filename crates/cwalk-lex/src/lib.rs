//! cwalk-lex - Lexical analysis for the interpreted C subset.
//!
//! Transforms source text into a lazy stream of [`Token`]s. The parser
//! pulls tokens one at a time; nothing is buffered beyond the cursor
//! position, which is what makes checkpoint/restore cheap enough to
//! power the parser's speculative probes.
//!
//! Recognized forms:
//!
//! - identifiers `[A-Za-z_][A-Za-z0-9_]*`, with reserved words mapped
//!   to their keyword kinds
//! - integer, real, character, and string literals (character and
//!   string literals process the standard escapes)
//! - the multi-character operators `== != <= >= && || << >> ++ --
//!   += -= *= /=` by maximal munch, plus the single-character
//!   operators and punctuation
//! - `/* ... */` comments and whitespace, skipped
//!
//! Lexical failures (unknown character, unterminated literal or
//! comment, malformed number) abort with a `LexerError`.

pub mod cursor;
mod lexer;
mod token;

pub use cursor::{Cursor, CursorSnapshot};
pub use lexer::{Lexer, LexerSnapshot};
pub use token::{Token, TokenKind};
