//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `sqlite` feature)
///
/// # Example
///
/// ```rust
/// # use taboor_core::define_id;
/// define_id!(UserId);
/// define_id!(QueueId);
///
/// let user_id = UserId::new(1);
/// let queue_id = QueueId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = queue_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "sqlite")]
        impl ::sqlx::Type<::sqlx::Sqlite> for $name {
            fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
                <i64 as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &::sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as ::sqlx::Type<::sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Sqlite> for $name {
            fn decode(
                value: ::sqlx::sqlite::SqliteValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i64 as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'q> ::sqlx::Encode<'q, ::sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::std::vec::Vec<::sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Encode<'q, ::sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(BusinessId);
define_id!(ServiceId);
define_id!(QueueId);
define_id!(MemberId);

/// A per-queue ticket number.
///
/// Ticket numbers are unique within a queue and strictly increasing in join
/// order, starting at 1. They double as the explicit insertion-order field
/// for position counting and FIFO dequeue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize,
)]
#[serde(transparent)]
pub struct TicketNumber(i64);

impl TicketNumber {
    /// The ticket number assigned to the first member of an empty queue.
    pub const FIRST: Self = Self(1);

    /// Create a ticket number from an i64 value.
    #[must_use]
    pub const fn new(n: i64) -> Self {
        Self(n)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl ::core::fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TicketNumber {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

impl From<TicketNumber> for i64 {
    fn from(n: TicketNumber) -> Self {
        n.0
    }
}

#[cfg(feature = "sqlite")]
impl ::sqlx::Type<::sqlx::Sqlite> for TicketNumber {
    fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
        <i64 as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &::sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as ::sqlx::Type<::sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Sqlite> for TicketNumber {
    fn decode(
        value: ::sqlx::sqlite::SqliteValueRef<'r>,
    ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
        let n = <i64 as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
        Ok(Self(n))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> ::sqlx::Encode<'q, ::sqlx::Sqlite> for TicketNumber {
    fn encode_by_ref(
        &self,
        buf: &mut ::std::vec::Vec<::sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <i64 as ::sqlx::Encode<'q, ::sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}
