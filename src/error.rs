//! This module implements `TransitionError`.

use std::{borrow::Cow, error::Error, fmt, sync::Arc};

use zone_transitions_provider::DecodeError;

/// `TransitionError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The zone is neither on the search path nor in the bundled data.
    #[default]
    ZoneNotFound,
    /// A located zone file could not be decoded.
    Decode,
    /// An option value that is not implemented was requested.
    NotSupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoneNotFound => "ZoneNotFound",
            Self::Decode => "DecodeError",
            Self::NotSupported => "NotSupportedError",
        }
        .fmt(f)
    }
}

/// The error type for resolving and validating transition data.
#[derive(Debug, Clone)]
pub struct TransitionError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    source: Option<Arc<dyn Error + Send + Sync + 'static>>,
}

impl TransitionError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
            source: None,
        }
    }

    /// Create a zone not found error.
    #[inline]
    #[must_use]
    pub fn zone_not_found() -> Self {
        Self::new(ErrorKind::ZoneNotFound)
    }

    /// Create a decode error.
    #[inline]
    #[must_use]
    pub fn decode() -> Self {
        Self::new(ErrorKind::Decode)
    }

    /// Create a not supported error.
    #[inline]
    #[must_use]
    pub fn not_supported() -> Self {
        Self::new(ErrorKind::NotSupported)
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Attach the lower level cause of this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

impl Error for TransitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl From<DecodeError> for TransitionError {
    fn from(value: DecodeError) -> Self {
        Self::decode()
            .with_message(value.to_string())
            .with_source(value)
    }
}

/// Why the bundled fallback could not provide a zone.
///
/// Every variant surfaces as [`ErrorKind::ZoneNotFound`]; the variant is
/// kept as the error's source for diagnostics.
#[derive(Debug)]
pub enum FallbackFailure {
    /// No bundled data was compiled in.
    Unavailable,
    /// The bundled data has no entry with this exact name.
    MissingResource,
    /// The name cannot be spelled as a bundled resource name.
    UnrepresentableName,
    /// The bundled entry exists but failed to decode.
    Read(DecodeError),
}

impl fmt::Display for FallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("bundled time zone data is not available"),
            Self::MissingResource => f.write_str("no bundled entry with this name"),
            Self::UnrepresentableName => {
                f.write_str("name is not representable as a bundled resource name")
            }
            Self::Read(err) => write!(f, "failed reading bundled entry: {err}"),
        }
    }
}

impl Error for FallbackFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            _ => None,
        }
    }
}
