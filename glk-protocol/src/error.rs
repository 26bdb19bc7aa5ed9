use std::{error::Error as StdError, fmt::Display, io};

/// Errors that may occur when talking to a module.
///
/// None of these are retried internally. Validation and unsupported operation errors are
/// raised before any byte is written.
#[derive(Debug)]
pub enum Error {
    /// A parameter is out of range or a symbolic value is not supported
    Validation(String),
    /// The operation is intentionally not implemented
    Unsupported(&'static str),
    /// The underlying byte stream failed or was closed
    Transport(io::Error),
    /// A reply did not have the expected shape
    Protocol(String),
    /// The model identifier does not encode the display dimensions
    UnknownDevice(String),
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Transport(value)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(reason) => write!(f, "Invalid parameter: {}", reason),
            Error::Unsupported(operation) => write!(f, "{} is unsupported", operation),
            Error::Transport(error) => write!(f, "{}", error),
            Error::Protocol(reason) => write!(f, "Protocol error: {}", reason),
            Error::UnknownDevice(reason) => write!(f, "{}", reason),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Transport(error) => Some(error),
            _ => None,
        }
    }
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::Validation("Contrast value is out of range".to_string()).to_string(),
        "Invalid parameter: Contrast value is out of range"
    );
    assert_eq!(
        Error::Unsupported("Flow control").to_string(),
        "Flow control is unsupported"
    );
    let transport = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "port closed"));
    assert!(transport.source().is_some());
}
