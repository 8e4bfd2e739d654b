use thiserror::Error;

/// Errors that can occur while parsing a FortiGate configuration.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input does not follow the `config`/`edit`/`set` command grammar.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// Input ended while a `config` or `edit` block was still open.
    #[error("unexpected end of input at line {line}: unclosed {open}")]
    UnexpectedEof { line: usize, open: String },
    /// Failed to read input file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Line number the error refers to, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } | Self::UnexpectedEof { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Errors returned by lookups on a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{segment}' not found while resolving '{path}'")]
    KeyNotFound { path: String, segment: String },
    #[error("'{key}' is a {found}, expected a {expected}")]
    WrongKind {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("'{key}' holds {count} values, expected exactly one")]
    NotSingleValue { key: String, count: usize },
    #[error("configuration has no VDOMs")]
    NoVdoms,
    #[error("VDOM '{0}' not found")]
    NoSuchVdom(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
