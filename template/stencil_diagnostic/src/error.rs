//! The template compilation error type.

use std::fmt;

/// What kind of compile-time failure occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// An escape sequence whose escaped character is not legal in the
    /// current lexical context (e.g. `\<` outside a placeholder header).
    IllegalEscape,
    /// A placeholder format section was closed by `]` before its `>`.
    IncompleteFormat,
    /// The pattern ended inside a placeholder.
    UnterminatedPlaceholder,
    /// The pattern ended with a lone `\`.
    DanglingEscape,
    /// A placeholder carried no parameter names at all.
    MissingParameter,
    /// A single-value placeholder carried a parameter-name count other
    /// than one.
    WrongParameterCount { found: usize },
    /// The placeholder header matched no registered placeholder kind.
    UnknownPlaceholder { header: String },
    /// The placeholder's format string failed its trial parse.
    InvalidFormat { detail: String },
    /// A parameter name that the resolver could not bind to any member of
    /// the data-source type.
    UnknownParameter { parameter: String, source: String },
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileErrorKind::IllegalEscape => write!(f, "An illegal escape sequence."),
            CompileErrorKind::IncompleteFormat => {
                write!(f, "Found an incomplete format specification.")
            }
            CompileErrorKind::UnterminatedPlaceholder => {
                write!(f, "The pattern ends inside an unterminated placeholder.")
            }
            CompileErrorKind::DanglingEscape => {
                write!(f, "The pattern ends in the middle of an escape sequence.")
            }
            CompileErrorKind::MissingParameter => {
                write!(f, "A placeholder requires at least one parameter name.")
            }
            CompileErrorKind::WrongParameterCount { found } => write!(
                f,
                "A single-value placeholder requires exactly one parameter name, found {found}."
            ),
            CompileErrorKind::UnknownPlaceholder { header } => {
                write!(f, "Unknown placeholder type '{header}'.")
            }
            CompileErrorKind::InvalidFormat { detail } => {
                write!(f, "The placeholder has an invalid format: {detail}.")
            }
            CompileErrorKind::UnknownParameter { parameter, source } => {
                write!(f, "Unknown parameter '{parameter}' for data source `{source}`.")
            }
        }
    }
}

/// A template compilation failure.
///
/// Carries the offending pattern verbatim and, when known, the character
/// position (not byte offset) the failure refers to. Positions always index
/// into the original pattern — the pattern string is never mutated during
/// compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    kind: CompileErrorKind,
    pattern: String,
    position: Option<u32>,
}

impl CompileError {
    /// A compile error pinned to a character position in the pattern.
    pub fn at(kind: CompileErrorKind, pattern: impl Into<String>, position: u32) -> Self {
        CompileError {
            kind,
            pattern: pattern.into(),
            position: Some(position),
        }
    }

    /// A compile error with no meaningful position (e.g. an empty-input
    /// precondition failure).
    pub fn new(kind: CompileErrorKind, pattern: impl Into<String>) -> Self {
        CompileError {
            kind,
            pattern: pattern.into(),
            position: None,
        }
    }

    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }

    /// The pattern that failed to compile, verbatim.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Character position of the failure, if known.
    pub fn position(&self) -> Option<u32> {
        self.position
    }

    /// Two-line caret snippet: the pattern, then a `^` under the offending
    /// character.
    pub fn snippet(&self) -> String {
        match self.position {
            Some(pos) => {
                format!("{}\n{}^", self.pattern, " ".repeat(pos as usize))
            }
            None => self.pattern.clone(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(
                f,
                "{} In template '{}' at character {}.",
                self.kind, self.pattern, pos
            ),
            None => write!(f, "{} In template '{}'.", self.kind, self.pattern),
        }
    }
}

impl std::error::Error for CompileError {}
