// -
// Binding defaults

/// Default capacity in bytes of the per-call exchange buffer.
pub const DEFAULT_BUFFER_LENGTH: usize = 1024;

/// Version argument meaning "match any version" on delete/set.
pub(crate) const ANY_VERSION: i32 = -1;

/// Length argument the native client reads as "null payload".
pub(crate) const NULL_PAYLOAD_LEN: i32 = -1;

// -
// Native return codes (zookeeper.h `ZOO_ERRORS`)

pub(crate) const ZOK: i32 = 0;

/// System and server-side errors
pub(crate) const ZSYSTEMERROR: i32 = -1;
pub(crate) const ZRUNTIMEINCONSISTENCY: i32 = -2;
pub(crate) const ZDATAINCONSISTENCY: i32 = -3;
pub(crate) const ZCONNECTIONLOSS: i32 = -4;
pub(crate) const ZMARSHALLINGERROR: i32 = -5;
pub(crate) const ZUNIMPLEMENTED: i32 = -6;
pub(crate) const ZOPERATIONTIMEOUT: i32 = -7;
pub(crate) const ZBADARGUMENTS: i32 = -8;
pub(crate) const ZINVALIDSTATE: i32 = -9;

/// API errors
pub(crate) const ZAPIERROR: i32 = -100;
pub(crate) const ZNONODE: i32 = -101;
pub(crate) const ZNOAUTH: i32 = -102;
pub(crate) const ZBADVERSION: i32 = -103;
pub(crate) const ZNOCHILDRENFOREPHEMERALS: i32 = -108;
pub(crate) const ZNODEEXISTS: i32 = -110;
pub(crate) const ZNOTEMPTY: i32 = -111;
pub(crate) const ZSESSIONEXPIRED: i32 = -112;
pub(crate) const ZINVALIDCALLBACK: i32 = -113;
pub(crate) const ZINVALIDACL: i32 = -114;
pub(crate) const ZAUTHFAILED: i32 = -115;
pub(crate) const ZCLOSING: i32 = -116;
pub(crate) const ZNOTHING: i32 = -117;
pub(crate) const ZSESSIONMOVED: i32 = -118;

// -
// Watch event types

pub(crate) const ZOO_CREATED_EVENT: i32 = 1;
pub(crate) const ZOO_DELETED_EVENT: i32 = 2;
pub(crate) const ZOO_CHANGED_EVENT: i32 = 3;
pub(crate) const ZOO_CHILD_EVENT: i32 = 4;
pub(crate) const ZOO_SESSION_EVENT: i32 = -1;
pub(crate) const ZOO_NOTWATCHING_EVENT: i32 = -2;

// -
// Connection states

pub(crate) const ZOO_EXPIRED_SESSION_STATE: i32 = -112;
pub(crate) const ZOO_AUTH_FAILED_STATE: i32 = -113;
pub(crate) const ZOO_CONNECTING_STATE: i32 = 1;
pub(crate) const ZOO_ASSOCIATING_STATE: i32 = 2;
pub(crate) const ZOO_CONNECTED_STATE: i32 = 3;

// -
// Create flag bits

pub(crate) const ZOO_EPHEMERAL: i32 = 1;
pub(crate) const ZOO_SEQUENCE: i32 = 2;
