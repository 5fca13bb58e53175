//! Who is asking for work.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Origin used for callers that supply neither an identity nor an origin.
pub const LOOPBACK_ORIGIN: &str = "127.0.0.1";

/// Participant reference.
///
/// A request is either from an authenticated user or from an anonymous
/// caller tracked by network origin, never both. All unidentified callers
/// without an origin share the [`LOOPBACK_ORIGIN`] participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Participant {
    Identified(UserId),
    Anonymous(String),
}

impl Participant {
    /// Build a participant from the optional pair a transport layer has.
    ///
    /// Identity wins when present. Otherwise the origin is used, falling back
    /// to the loopback placeholder when it is missing or blank.
    pub fn resolve(identity: Option<UserId>, origin: Option<&str>) -> Self {
        match (identity, origin) {
            (Some(user_id), _) => Participant::Identified(user_id),
            (None, Some(origin)) => Participant::anonymous(origin),
            (None, None) => Participant::anonymous_default(),
        }
    }

    pub fn identified(user_id: UserId) -> Self {
        Participant::Identified(user_id)
    }

    /// Anonymous participant keyed by `origin`, trimmed. A blank origin is
    /// the loopback placeholder.
    pub fn anonymous(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        let trimmed = origin.trim();
        if trimmed.is_empty() {
            return Participant::anonymous_default();
        }
        if trimmed.len() == origin.len() {
            return Participant::Anonymous(origin);
        }
        Participant::Anonymous(trimmed.to_string())
    }

    pub fn anonymous_default() -> Self {
        Participant::Anonymous(LOOPBACK_ORIGIN.to_string())
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Participant::Identified(user_id) => Some(*user_id),
            Participant::Anonymous(_) => None,
        }
    }

    pub fn origin(&self) -> Option<&str> {
        match self {
            Participant::Identified(_) => None,
            Participant::Anonymous(origin) => Some(origin),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Identified(user_id) => write!(f, "{user_id}"),
            Participant::Anonymous(origin) => write!(f, "anon@{origin}"),
        }
    }
}
