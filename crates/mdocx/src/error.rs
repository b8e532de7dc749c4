use core::fmt;
use std::{borrow::Cow, ops::Deref};

/// The category of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The markdown text was empty or whitespace-only.
    EmptyInput,
    /// The token stream broke a structural invariant of the parser.
    Structure,
    /// The document could not be packed into a DOCX file.
    Serialize,
    /// A configuration source could not be read.
    Config,
    /// An I/O failure.
    Io,
    /// Anything else.
    Msg,
}

/// An error that can occur during the conversion process.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
struct Repr {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr {
            kind,
            msg: msg.into(),
        }))
    }

    /// The markdown text has nothing to convert.
    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, "markdown content must not be empty")
    }

    /// A token at `pos` does not have the shape the transformer expects.
    pub fn structure(pos: usize, msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Structure, format!("malformed token stream at {pos}: {msg}"))
    }

    /// The output document could not be written.
    pub fn serialize(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Serialize, format!("failed to pack DOCX: {msg}"))
    }

    /// A configuration source is invalid.
    pub fn config(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Config, format!("invalid configuration: {msg}"))
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.deref().msg)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.0.kind)?;
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Self::new(ErrorKind::Msg, e.to_string())
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Self::new(ErrorKind::Msg, s)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::new(ErrorKind::Msg, s)
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Self::new(ErrorKind::Msg, s)
    }
}
