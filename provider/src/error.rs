use std::io;

/// The error type for decoding TZif data.
#[derive(Debug)]
pub enum DecodeError {
    /// The zone file could not be read.
    Io(io::Error),
    /// The zone does not exist in the bundled database.
    NotFound,
    /// The bytes are not valid TZif data.
    Malformed(&'static str),
}

impl From<io::Error> for DecodeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "unable to read zone file: {err}"),
            Self::NotFound => f.write_str("zone is not part of the bundled database"),
            Self::Malformed(msg) => write!(f, "illformed TZif data: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}
