//! Errors raised while normalizing, parsing, or tokenizing source.

use crate::tree::Position;

/// Source text does not parse under the host grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("invalid syntax at {line}:{column}: {message}")]
    Invalid {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("grammar unavailable: {0}")]
    Grammar(String),

    #[error("parser produced no tree")]
    NoTree,
}

impl SyntaxError {
    pub(crate) fn at(position: Position, message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }

    /// Where the error was detected, if it is tied to a location.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Invalid { line, column, .. } => Some(Position::new(*line, *column)),
            _ => None,
        }
    }
}

/// Error from the tree building pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("transform `{transform}` requires `{missing}` to run first")]
    TransformOrder {
        transform: &'static str,
        missing: &'static str,
    },
}
