use std::{error::Error, fmt::Display};

/// Error reported by the database-access layer.
///
/// The `kind` is what callers branch on; `message` is for humans only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SQLError {
    pub kind: ErrorKind,
    pub message: String,
}

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    /// The object being created is already present.
    DuplicateObject,
    /// A referenced database, table or column is missing.
    UndefinedObject,
    /// A constraint cannot be added, e.g. a foreign key to an unindexed column.
    ConstraintError,
    UnsupportedError,
    ConnectionError,
    RuntimeError,
}

impl Error for SQLError {}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "Parse Error"),
            ErrorKind::DuplicateObject => write!(f, "Duplicate Object"),
            ErrorKind::UndefinedObject => write!(f, "Undefined Object"),
            ErrorKind::ConstraintError => write!(f, "Constraint Error"),
            ErrorKind::UnsupportedError => write!(f, "Unsupported"),
            ErrorKind::ConnectionError => write!(f, "Connection Error"),
            ErrorKind::RuntimeError => write!(f, "Runtime Error"),
        }
    }
}

impl Display for SQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl SQLError {
    pub fn new(kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: message.as_ref().to_string(),
        }
    }

    pub fn is_duplicate_object(&self) -> bool {
        self.kind == ErrorKind::DuplicateObject
    }
}
