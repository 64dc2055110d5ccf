//! Error types shared across the interpreter pipeline.
//!
//! Every phase fails with a [`CwalkError`]. There is no local recovery:
//! the first error aborts the run and propagates to the driver, which
//! prints the kind name and the message.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CwalkError>;

/// The interpreter error taxonomy.
///
/// Each variant carries a human-readable message and the 1-based source
/// line the failure was detected on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CwalkError {
    /// Malformed token, unterminated literal, or unknown character.
    #[error("{message} [line {line}]")]
    Lexer { message: String, line: u32 },

    /// Token mismatch or exhausted input in the middle of a production.
    #[error("{message} [line {line}]")]
    Syntax { message: String, line: u32 },

    /// Undeclared name, duplicate declaration, call to an unknown
    /// function, or an include the interpreter cannot bind.
    #[error("{message} [line {line}]")]
    Semantic { message: String, line: u32 },

    /// Operator applied to operands of incompatible types.
    #[error("{message} [line {line}]")]
    Type { message: String, line: u32 },

    /// Failure during evaluation: uninitialized read, division by
    /// zero, write to an undeclared name, return type mismatch.
    #[error("{message} [line {line}]")]
    Runtime { message: String, line: u32 },
}

impl CwalkError {
    pub fn lexer(message: impl Into<String>, line: u32) -> Self {
        CwalkError::Lexer {
            message: message.into(),
            line,
        }
    }

    pub fn syntax(message: impl Into<String>, line: u32) -> Self {
        CwalkError::Syntax {
            message: message.into(),
            line,
        }
    }

    pub fn semantic(message: impl Into<String>, line: u32) -> Self {
        CwalkError::Semantic {
            message: message.into(),
            line,
        }
    }

    pub fn type_error(message: impl Into<String>, line: u32) -> Self {
        CwalkError::Type {
            message: message.into(),
            line,
        }
    }

    pub fn runtime(message: impl Into<String>, line: u32) -> Self {
        CwalkError::Runtime {
            message: message.into(),
            line,
        }
    }

    /// The kind name printed by the driver, e.g. `LexerError`.
    pub fn kind(&self) -> &'static str {
        match self {
            CwalkError::Lexer { .. } => "LexerError",
            CwalkError::Syntax { .. } => "SyntaxError",
            CwalkError::Semantic { .. } => "SemanticError",
            CwalkError::Type { .. } => "TypeError",
            CwalkError::Runtime { .. } => "RuntimeError",
        }
    }

    /// Source line the error was detected on.
    pub fn line(&self) -> u32 {
        match self {
            CwalkError::Lexer { line, .. }
            | CwalkError::Syntax { line, .. }
            | CwalkError::Semantic { line, .. }
            | CwalkError::Type { line, .. }
            | CwalkError::Runtime { line, .. } => *line,
        }
    }
}
