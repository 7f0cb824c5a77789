//! Status enums for queues and queue members.
//!
//! Both enums are stored as lowercase TEXT in the database and carry their
//! legal state transitions, so every layer shares one definition of the
//! lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a queue.
///
/// `open → paused ⇄ open → closed`; `closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Accepting new members.
    #[default]
    Open,
    /// Temporarily not accepting joins; can reopen.
    Paused,
    /// Permanently closed. No transition out.
    Closed,
}

impl QueueStatus {
    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Same-status writes are allowed as no-ops; the only forbidden moves
    /// are out of [`QueueStatus::Closed`].
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self != Self::Closed
    }

    /// Whether members may join a queue in this status.
    #[must_use]
    pub fn accepts_joins(self) -> bool {
        self == Self::Open
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Paused => write!(f, "paused"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "paused" => Ok(Self::Paused),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid queue status: {s}")),
        }
    }
}

/// Lifecycle status of a queue member (one user's ticket).
///
/// `waiting → {called, skipped, left}`; `called → {done, skipped}`.
/// `skipped`, `done` and `left` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// In line, counted for position.
    #[default]
    Waiting,
    /// Called to the counter by the dashboard.
    Called,
    /// Skipped by staff.
    Skipped,
    /// Served.
    Done,
    /// Left the queue voluntarily.
    Left,
}

impl MemberStatus {
    /// Whether a transition from `self` to `next` is legal.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Called | Self::Skipped | Self::Left)
                | (Self::Called, Self::Done | Self::Skipped)
        )
    }

    /// Whether this member currently holds a place in line.
    #[must_use]
    pub fn is_waiting(self) -> bool {
        self == Self::Waiting
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Called => write!(f, "called"),
            Self::Skipped => write!(f, "skipped"),
            Self::Done => write!(f, "done"),
            Self::Left => write!(f, "left"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "called" => Ok(Self::Called),
            "skipped" => Ok(Self::Skipped),
            "done" => Ok(Self::Done),
            "left" => Ok(Self::Left),
            _ => Err(format!("invalid member status: {s}")),
        }
    }
}

// SQLx TEXT codecs (with sqlite feature)

#[cfg(feature = "sqlite")]
macro_rules! impl_sqlite_text_enum {
    ($name:ident) => {
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(s.parse::<Self>()?)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.to_string(), buf)
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_sqlite_text_enum!(QueueStatus);
#[cfg(feature = "sqlite")]
impl_sqlite_text_enum!(MemberStatus);
