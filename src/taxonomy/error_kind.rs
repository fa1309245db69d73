use std::fmt;

use crate::constants::*;

/// Stable taxonomy of results reported by the coordination service
///
/// `Ok` is part of the table so that the mapping is total over the native
/// vocabulary; it never appears inside a [`ZkError`](crate::ZkError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Ok,
    SystemError,
    RuntimeInconsistency,
    DataInconsistency,
    ConnectionLoss,
    MarshallingError,
    Unimplemented,
    OperationTimeout,
    BadArguments,
    InvalidState,
    ApiError,
    NoNode,
    NoAuth,
    BadVersion,
    NoChildrenForEphemerals,
    NodeExists,
    NotEmpty,
    SessionExpired,
    InvalidCallback,
    InvalidAcl,
    AuthFailed,
    Closing,
    Nothing,
    SessionMoved,
    Unknown,
}

impl ErrorKind {
    /// Translates a native return code. Unrecognised codes yield `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            ZOK => ErrorKind::Ok,
            ZSYSTEMERROR => ErrorKind::SystemError,
            ZRUNTIMEINCONSISTENCY => ErrorKind::RuntimeInconsistency,
            ZDATAINCONSISTENCY => ErrorKind::DataInconsistency,
            ZCONNECTIONLOSS => ErrorKind::ConnectionLoss,
            ZMARSHALLINGERROR => ErrorKind::MarshallingError,
            ZUNIMPLEMENTED => ErrorKind::Unimplemented,
            ZOPERATIONTIMEOUT => ErrorKind::OperationTimeout,
            ZBADARGUMENTS => ErrorKind::BadArguments,
            ZINVALIDSTATE => ErrorKind::InvalidState,
            ZAPIERROR => ErrorKind::ApiError,
            ZNONODE => ErrorKind::NoNode,
            ZNOAUTH => ErrorKind::NoAuth,
            ZBADVERSION => ErrorKind::BadVersion,
            ZNOCHILDRENFOREPHEMERALS => ErrorKind::NoChildrenForEphemerals,
            ZNODEEXISTS => ErrorKind::NodeExists,
            ZNOTEMPTY => ErrorKind::NotEmpty,
            ZSESSIONEXPIRED => ErrorKind::SessionExpired,
            ZINVALIDCALLBACK => ErrorKind::InvalidCallback,
            ZINVALIDACL => ErrorKind::InvalidAcl,
            ZAUTHFAILED => ErrorKind::AuthFailed,
            ZCLOSING => ErrorKind::Closing,
            ZNOTHING => ErrorKind::Nothing,
            ZSESSIONMOVED => ErrorKind::SessionMoved,
            _ => ErrorKind::Unknown,
        }
    }

    /// Native code of this kind; `None` for `Unknown`, which has no code of
    /// its own.
    pub fn native_code(&self) -> Option<i32> {
        let code = match self {
            ErrorKind::Ok => ZOK,
            ErrorKind::SystemError => ZSYSTEMERROR,
            ErrorKind::RuntimeInconsistency => ZRUNTIMEINCONSISTENCY,
            ErrorKind::DataInconsistency => ZDATAINCONSISTENCY,
            ErrorKind::ConnectionLoss => ZCONNECTIONLOSS,
            ErrorKind::MarshallingError => ZMARSHALLINGERROR,
            ErrorKind::Unimplemented => ZUNIMPLEMENTED,
            ErrorKind::OperationTimeout => ZOPERATIONTIMEOUT,
            ErrorKind::BadArguments => ZBADARGUMENTS,
            ErrorKind::InvalidState => ZINVALIDSTATE,
            ErrorKind::ApiError => ZAPIERROR,
            ErrorKind::NoNode => ZNONODE,
            ErrorKind::NoAuth => ZNOAUTH,
            ErrorKind::BadVersion => ZBADVERSION,
            ErrorKind::NoChildrenForEphemerals => ZNOCHILDRENFOREPHEMERALS,
            ErrorKind::NodeExists => ZNODEEXISTS,
            ErrorKind::NotEmpty => ZNOTEMPTY,
            ErrorKind::SessionExpired => ZSESSIONEXPIRED,
            ErrorKind::InvalidCallback => ZINVALIDCALLBACK,
            ErrorKind::InvalidAcl => ZINVALIDACL,
            ErrorKind::AuthFailed => ZAUTHFAILED,
            ErrorKind::Closing => ZCLOSING,
            ErrorKind::Nothing => ZNOTHING,
            ErrorKind::SessionMoved => ZSESSIONMOVED,
            ErrorKind::Unknown => return None,
        };
        Some(code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Ok => "Ok",
            ErrorKind::SystemError => "SystemError",
            ErrorKind::RuntimeInconsistency => "RuntimeInconsistency",
            ErrorKind::DataInconsistency => "DataInconsistency",
            ErrorKind::ConnectionLoss => "ConnectionLoss",
            ErrorKind::MarshallingError => "MarshallingError",
            ErrorKind::Unimplemented => "Unimplemented",
            ErrorKind::OperationTimeout => "OperationTimeout",
            ErrorKind::BadArguments => "BadArguments",
            ErrorKind::InvalidState => "InvalidState",
            ErrorKind::ApiError => "ApiError",
            ErrorKind::NoNode => "NoNode",
            ErrorKind::NoAuth => "NoAuth",
            ErrorKind::BadVersion => "BadVersion",
            ErrorKind::NoChildrenForEphemerals => "NoChildrenForEphemerals",
            ErrorKind::NodeExists => "NodeExists",
            ErrorKind::NotEmpty => "NotEmpty",
            ErrorKind::SessionExpired => "SessionExpired",
            ErrorKind::InvalidCallback => "InvalidCallback",
            ErrorKind::InvalidAcl => "InvalidAcl",
            ErrorKind::AuthFailed => "AuthFailed",
            ErrorKind::Closing => "Closing",
            ErrorKind::Nothing => "Nothing",
            ErrorKind::SessionMoved => "SessionMoved",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
