//! Error hierarchy of the binding
//!
//! Session operations fail with [`ZkError`], a taxonomy value paired with the
//! native code it was translated from. Loading configuration can additionally
//! fail with a [`ConfigError`], so the crate-level [`Error`] wraps both.

use config::ConfigError;

use crate::constants::ZOK;
use crate::constants::ZSYSTEMERROR;
use crate::ErrorKind;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a session operation
pub type ZkResult<T> = std::result::Result<T, ZkError>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Coordination service or session usage failure
    #[error(transparent)]
    Zk(#[from] ZkError),

    /// Configuration loading or validation failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Taxonomy kind when the failure came from a session operation.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Zk(e) => Some(e.kind()),
            Error::Config(_) => None,
        }
    }
}

/// Failure reported by the coordination service or by the binding itself
///
/// Renders as `"<kind> (<code>)"`, e.g. `NoNode (-101)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} ({code})")]
pub struct ZkError {
    kind: ErrorKind,
    code: i32,
}

impl ZkError {
    /// Error for a taxonomy kind, carrying that kind's native code.
    ///
    /// [`ErrorKind::Unknown`] has no native code of its own and carries
    /// `ZSYSTEMERROR` (-1), so it renders as `Unknown (-1)`. Use
    /// [`from_code`](ZkError::from_code) to keep an unrecognised code.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            code: kind.native_code().unwrap_or(ZSYSTEMERROR),
        }
    }

    /// Error for a raw native code; unknown codes are kept verbatim.
    pub fn from_code(code: i32) -> Self {
        Self {
            kind: ErrorKind::from_code(code),
            code,
        }
    }

    /// Translates the errno left behind by a failed session initialisation.
    ///
    /// `EINVAL` means the hosts or timeout were rejected; every other cause,
    /// including a missing errno, is a system error.
    pub fn from_init_errno(errno: Option<i32>) -> Self {
        match errno {
            Some(libc::EINVAL) => Self::new(ErrorKind::BadArguments),
            _ => Self::new(ErrorKind::SystemError),
        }
    }

    /// Translates a native return code: `ZOK` passes, anything else fails.
    pub fn check(code: i32) -> ZkResult<()> {
        if code == ZOK {
            Ok(())
        } else {
            Err(Self::from_code(code))
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub(crate) fn invalid_state() -> Self {
        Self::new(ErrorKind::InvalidState)
    }

    pub(crate) fn bad_arguments() -> Self {
        Self::new(ErrorKind::BadArguments)
    }
}

impl From<ErrorKind> for ZkError {
    fn from(kind: ErrorKind) -> Self {
        ZkError::new(kind)
    }
}
