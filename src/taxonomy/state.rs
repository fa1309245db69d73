use std::fmt;

use crate::constants::*;

/// Connection state carried by a watch notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Server expired the session; the handle is unusable
    SessionExpired,
    AuthFailed,
    Connecting,
    Associating,
    Connected,
    Unknown,
}

impl StateKind {
    /// Translates a native connection state. Unrecognised codes yield `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            ZOO_EXPIRED_SESSION_STATE => StateKind::SessionExpired,
            ZOO_AUTH_FAILED_STATE => StateKind::AuthFailed,
            ZOO_CONNECTING_STATE => StateKind::Connecting,
            ZOO_ASSOCIATING_STATE => StateKind::Associating,
            ZOO_CONNECTED_STATE => StateKind::Connected,
            _ => StateKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::SessionExpired => "SessionExpired",
            StateKind::AuthFailed => "AuthFailed",
            StateKind::Connecting => "Connecting",
            StateKind::Associating => "Associating",
            StateKind::Connected => "Connected",
            StateKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
