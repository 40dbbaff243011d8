//! Error definitions.
//!
//! Every fallible operation of this crate returns [`Result`], whose error type
//! is [`VokabelError`]. Fatal conditions always name the resource or the
//! argument that caused them.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// A specialized Result type for this crate.
pub type Result<T, E = VokabelError> = std::result::Result<T, E>;

/// The error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum VokabelError {
    /// The error variant for [`InvalidArgumentError`].
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`InvalidStateError`].
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// A required resource could not be opened or read.
    #[error("failed to load the {resource} from '{}': {source}", .path.display())]
    ResourceLoad {
        /// Human-readable name of the resource, e.g. `"lemma index"`.
        resource: &'static str,
        /// Path that was tried.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// The error variant for [`ParseIntError`](std::num::ParseIntError).
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// The error variant for [`Utf8Error`](std::str::Utf8Error).
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// The error variant for [`rkyv::rancor::Error`].
    #[error(transparent)]
    Rkyv(#[from] rkyv::rancor::Error),
}

impl VokabelError {
    /// Creates an [`InvalidArgumentError`].
    ///
    /// # Arguments
    ///
    /// * `arg` - Name of the argument or option.
    /// * `msg` - Error message.
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// Creates an [`InvalidFormatError`].
    ///
    /// # Arguments
    ///
    /// * `arg` - Name of the format (usually the resource).
    /// * `msg` - Error message.
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// Creates an [`InvalidStateError`].
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }

    /// Creates a [`VokabelError::ResourceLoad`].
    pub(crate) fn resource_load<P>(resource: &'static str, path: P, source: std::io::Error) -> Self
    where
        P: Into<PathBuf>,
    {
        Self::ResourceLoad {
            resource,
            path: path.into(),
            source,
        }
    }

    /// Returns the argument name if this is an [`InvalidArgumentError`].
    pub fn invalid_argument_name(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument(e) => Some(e.arg),
            _ => None,
        }
    }
}

/// Error used when an argument or a combination of arguments is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when the input format is invalid.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when the state is invalid.
#[derive(Debug)]
pub struct InvalidStateError {
    /// Error message.
    pub(crate) msg: String,

    /// Cause of the error.
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}
