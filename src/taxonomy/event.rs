use std::fmt;

use crate::constants::*;

/// Kind of change reported by a watch notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Watched node was created
    Created,
    /// Watched node was deleted
    Deleted,
    /// Payload of the watched node changed
    Changed,
    /// Children of the watched node changed
    Child,
    /// Connection state of the session changed
    Session,
    /// Watch was removed by the server
    NotWatching,
    Unknown,
}

impl EventKind {
    /// Translates a native event type. Unrecognised codes yield `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            ZOO_CREATED_EVENT => EventKind::Created,
            ZOO_DELETED_EVENT => EventKind::Deleted,
            ZOO_CHANGED_EVENT => EventKind::Changed,
            ZOO_CHILD_EVENT => EventKind::Child,
            ZOO_SESSION_EVENT => EventKind::Session,
            ZOO_NOTWATCHING_EVENT => EventKind::NotWatching,
            _ => EventKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "Created",
            EventKind::Deleted => "Deleted",
            EventKind::Changed => "Changed",
            EventKind::Child => "Child",
            EventKind::Session => "Session",
            EventKind::NotWatching => "NotWatching",
            EventKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
