//! Room Keys
//!
//! A room is the addressable channel a message belongs to. There are exactly
//! two kinds and the kind is always explicit in the key:
//!
//! - `private:<low>:<high>` - a one-to-one conversation, the two participant
//!   ids sorted so that either side derives the same key
//! - `group:<group_id>` - the channel of a group
//!
//! There is no global room.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

const PRIVATE_PREFIX: &str = "private:";
const GROUP_PREFIX: &str = "group:";

/// Kind of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Private,
    Group,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Private => "private",
            RoomKind::Group => "group",
        }
    }
}

/// Key of a message channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoomKey {
    /// One-to-one room; `low <= high` always holds
    Private { low: Uuid, high: Uuid },
    /// Room of a group
    Group(Uuid),
}

impl RoomKey {
    /// Derive the private room of two users. Argument order does not matter.
    pub fn private(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            RoomKey::Private { low: a, high: b }
        } else {
            RoomKey::Private { low: b, high: a }
        }
    }

    pub fn group(group_id: Uuid) -> Self {
        RoomKey::Group(group_id)
    }

    pub fn kind(&self) -> RoomKind {
        match self {
            RoomKey::Private { .. } => RoomKind::Private,
            RoomKey::Group(_) => RoomKind::Group,
        }
    }

    /// Whether `user_id` is one of the two participants of a private room.
    /// Always false for group rooms, whose membership lives in the store.
    pub fn involves(&self, user_id: Uuid) -> bool {
        match self {
            RoomKey::Private { low, high } => *low == user_id || *high == user_id,
            RoomKey::Group(_) => false,
        }
    }

    /// The other participant of a private room, seen from `user_id`
    pub fn peer_of(&self, user_id: Uuid) -> Option<Uuid> {
        match self {
            RoomKey::Private { low, high } if *low == user_id => Some(*high),
            RoomKey::Private { low, high } if *high == user_id => Some(*low),
            _ => None,
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKey::Private { low, high } => write!(f, "{}{}:{}", PRIVATE_PREFIX, low, high),
            RoomKey::Group(id) => write!(f, "{}{}", GROUP_PREFIX, id),
        }
    }
}

impl FromStr for RoomKey {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(PRIVATE_PREFIX) {
            let (a, b) = rest
                .split_once(':')
                .ok_or_else(|| SharedError::invalid_room(s))?;
            let a = Uuid::parse_str(a).map_err(|_| SharedError::invalid_room(s))?;
            let b = Uuid::parse_str(b).map_err(|_| SharedError::invalid_room(s))?;
            return Ok(RoomKey::private(a, b));
        }

        if let Some(rest) = s.strip_prefix(GROUP_PREFIX) {
            let id = Uuid::parse_str(rest).map_err(|_| SharedError::invalid_room(s))?;
            return Ok(RoomKey::Group(id));
        }

        Err(SharedError::invalid_room(s))
    }
}

impl TryFrom<String> for RoomKey {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoomKey> for String {
    fn from(key: RoomKey) -> Self {
        key.to_string()
    }
}
