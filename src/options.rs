//! Options for handling local times that a zone skips or repeats.
//!
//! Only [`AmbiguousTimePolicy::NaT`] and [`NonexistentTimePolicy::NaT`]
//! are implemented. The other values are recognized so that they can be
//! rejected with a precise error.

use core::{fmt, str::FromStr};

use crate::{TransitionError, TransitionResult};

/// Name of the option controlling repeated local times.
pub const AMBIGUOUS_OPTION: &str = "ambiguous";
/// Name of the option controlling skipped local times.
pub const NONEXISTENT_OPTION: &str = "nonexistent";

/// How to resolve a local time that occurs twice, at a backward
/// transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguousTimePolicy {
    /// Map the local time to a null instant.
    #[default]
    NaT,
    /// Fail the conversion.
    Raise,
    /// Infer the offset from the order of the values.
    Infer,
    /// Use the earlier of the two instants.
    Earliest,
    /// Use the later of the two instants.
    Latest,
}

impl AmbiguousTimePolicy {
    pub fn is_supported(self) -> bool {
        self == Self::NaT
    }
}

/// A parsing error for `AmbiguousTimePolicy`.
#[derive(Debug, Clone, Copy)]
pub struct ParseAmbiguousTimePolicyError;

impl fmt::Display for ParseAmbiguousTimePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid ambiguous time policy")
    }
}

impl std::error::Error for ParseAmbiguousTimePolicyError {}

impl FromStr for AmbiguousTimePolicy {
    type Err = ParseAmbiguousTimePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NaT" => Ok(Self::NaT),
            "raise" => Ok(Self::Raise),
            "infer" => Ok(Self::Infer),
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            _ => Err(ParseAmbiguousTimePolicyError),
        }
    }
}

impl fmt::Display for AmbiguousTimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NaT => "NaT",
            Self::Raise => "raise",
            Self::Infer => "infer",
            Self::Earliest => "earliest",
            Self::Latest => "latest",
        }
        .fmt(f)
    }
}

/// How to resolve a local time that never occurs, at a forward
/// transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonexistentTimePolicy {
    /// Map the local time to a null instant.
    #[default]
    NaT,
    /// Fail the conversion.
    Raise,
    /// Move to the first instant after the gap.
    ShiftForward,
    /// Move to the last instant before the gap.
    ShiftBackward,
}

impl NonexistentTimePolicy {
    pub fn is_supported(self) -> bool {
        self == Self::NaT
    }
}

/// A parsing error for `NonexistentTimePolicy`.
#[derive(Debug, Clone, Copy)]
pub struct ParseNonexistentTimePolicyError;

impl fmt::Display for ParseNonexistentTimePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid nonexistent time policy")
    }
}

impl std::error::Error for ParseNonexistentTimePolicyError {}

impl FromStr for NonexistentTimePolicy {
    type Err = ParseNonexistentTimePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NaT" => Ok(Self::NaT),
            "raise" => Ok(Self::Raise),
            "shift_forward" => Ok(Self::ShiftForward),
            "shift_backward" => Ok(Self::ShiftBackward),
            _ => Err(ParseNonexistentTimePolicyError),
        }
    }
}

impl fmt::Display for NonexistentTimePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NaT => "NaT",
            Self::Raise => "raise",
            Self::ShiftForward => "shift_forward",
            Self::ShiftBackward => "shift_backward",
        }
        .fmt(f)
    }
}

/// Checks the `ambiguous` and `nonexistent` option values, in that order.
///
/// Every value other than `"NaT"` fails with
/// [`ErrorKind::NotSupported`](crate::ErrorKind::NotSupported), whether
/// or not it names a known policy.
///
/// ```
/// use zone_transitions::{validate_local_time_policy, ErrorKind};
///
/// assert!(validate_local_time_policy("NaT", "NaT").is_ok());
///
/// let err = validate_local_time_policy("raise", "NaT").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NotSupported);
/// assert!(err.message().contains(r#"ambiguous="raise""#));
/// ```
pub fn validate_local_time_policy(ambiguous: &str, nonexistent: &str) -> TransitionResult<()> {
    check_option(
        AMBIGUOUS_OPTION,
        ambiguous,
        ambiguous
            .parse::<AmbiguousTimePolicy>()
            .is_ok_and(AmbiguousTimePolicy::is_supported),
    )?;
    check_option(
        NONEXISTENT_OPTION,
        nonexistent,
        nonexistent
            .parse::<NonexistentTimePolicy>()
            .is_ok_and(NonexistentTimePolicy::is_supported),
    )
}

/// Checks already parsed policies.
pub fn validate_policies(
    ambiguous: AmbiguousTimePolicy,
    nonexistent: NonexistentTimePolicy,
) -> TransitionResult<()> {
    check_option(
        AMBIGUOUS_OPTION,
        &ambiguous.to_string(),
        ambiguous.is_supported(),
    )?;
    check_option(
        NONEXISTENT_OPTION,
        &nonexistent.to_string(),
        nonexistent.is_supported(),
    )
}

fn check_option(option: &str, value: &str, supported: bool) -> TransitionResult<()> {
    if supported {
        return Ok(());
    }
    Err(TransitionError::not_supported().with_message(format!(
        "{option}={value:?} is not supported, only {option}=\"NaT\" is currently supported"
    )))
}
