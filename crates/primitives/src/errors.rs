//! Error classification shared by every component.

use std::fmt;

use crate::header::HeaderDecodeError;

/// Coarse classes every error of the bridge falls into.
///
/// All of them abort the call that raised them without changing any state,
/// the caller has to issue a corrected call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Invalid construction parameters or input arrays.
    Config,

    /// A mutating call from an identity that is not registered for it.
    UnauthorizedCaller,

    /// A block or kernel that was never reported.
    UnknownReference,

    /// A call that is valid in shape but out of order.
    SequenceViolation,

    /// A call that contradicts the shape of the checkpoint tree.
    StructuralViolation,

    /// A lookup outside the known or finalized window.
    LookupUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Config => "config",
            ErrorKind::UnauthorizedCaller => "unauthorized caller",
            ErrorKind::UnknownReference => "unknown reference",
            ErrorKind::SequenceViolation => "sequence violation",
            ErrorKind::StructuralViolation => "structural violation",
            ErrorKind::LookupUnavailable => "lookup unavailable",
        };
        f.write_str(s)
    }
}

impl HeaderDecodeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StructuralViolation
    }
}
