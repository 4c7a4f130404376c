//! Error handling types for building and parsing
//!
//! Every failure is reported synchronously from the entry point that caused it.
//! No partial tree is ever returned alongside an error.

use std::fmt;
use thiserror::Error;

/// Main error type for zxml operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The specific kind of error
    kind: ErrorKind,
    /// Byte offset into the XML input where the error occurred
    position: Option<u64>,
    /// Additional context for the error
    context: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file passed to `from_file` is absent or unreadable
    MissingFile { path: String },
    /// The XML input is malformed
    Parse { message: String },
    /// Nesting went deeper than the configured maximum
    RecursionLimitExceeded { max: usize },
    /// A structured value uses a shape the builder cannot express
    InvalidStructure { reason: String },
    /// The XML input is larger than the configured maximum
    MaxSizeExceeded { max: usize },
    /// Reading or writing a stream failed
    Io { message: String },
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            position: None,
            context: None,
        }
    }

    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingFile { path: path.into() })
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
        })
    }

    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidStructure {
            reason: reason.into(),
        })
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io {
            message: message.into(),
        })
    }

    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Option<u64> {
        self.position
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingFile { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse { .. })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile { path } => write!(f, "File {} does not exist", path),
            Self::Parse { message } => write!(f, "Malformed XML: {}", message),
            Self::RecursionLimitExceeded { max } => {
                write!(f, "Maximum nesting depth of {} exceeded", max)
            }
            Self::InvalidStructure { reason } => write!(f, "Invalid structure: {}", reason),
            Self::MaxSizeExceeded { max } => {
                write!(f, "Maximum input size of {} bytes exceeded", max)
            }
            Self::Io { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "at byte {}: {}", position, self.kind)?,
            None => write!(f, "Error: {}", self.kind)?,
        }

        if let Some(ctx) = &self.context {
            write!(f, "\nContext: {}", ctx)?;
        }

        Ok(())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
