//! Error types for the backdrop-fx crate.

use std::error::Error as StdError;
use std::fmt;

/// Configuration-boundary error type.
///
/// Rendering never fails: the per-frame paths turn these errors into
/// fallbacks (default color, skipped frame). They only surface from the
/// parsing and loading entry points.
#[derive(Debug)]
pub enum Error {
    /// A color token could not be parsed as `#rgb` or `#rrggbb`.
    InvalidColor(String),

    /// A configuration value is out of range.
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    Parse(String),

    /// Reading a configuration file failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidColor(token) => write!(f, "invalid color token: {:?}", token),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Parse(msg) => write!(f, "parse error: {}", msg),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Create an invalid color error for the given token.
    pub fn invalid_color(token: impl Into<String>) -> Self {
        Error::InvalidColor(token.into())
    }

    /// Create an invalid config error with a message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Create a parse error with a message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Returns true if this is an InvalidColor error.
    pub fn is_invalid_color(&self) -> bool {
        matches!(self, Error::InvalidColor(_))
    }

    /// Returns true if this is an InvalidConfig error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
