//! Store-generated document identifiers.
//!
//! Every document in the store (items, users, carts, orders) is keyed by a
//! 12-byte [`ObjectId`], rendered as 24 lowercase hex characters on the wire.
//!
//! ## Layout
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 0..4  | creation time, unix seconds (big-endian)   |
//! | 4..9  | random value fixed for the process         |
//! | 9..12 | wrapping counter, randomly seeded          |
//!
//! Ids created later therefore sort after ids created in an earlier second.

use core::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of the hex rendering of an [`ObjectId`].
pub const OBJECT_ID_HEX_LEN: usize = 24;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random);
static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::random()));

/// Errors that can occur when parsing an [`ObjectId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not exactly 24 characters long.
    #[error("identifier must be {expected} hex characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },
    /// The input contains a non-hex character.
    #[error("identifier contains non-hex character {0:?}")]
    InvalidCharacter(char),
}

/// A 12-byte document identifier.
///
/// ```
/// use bazaar_core::ObjectId;
///
/// let id = ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
/// assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
///
/// assert!(ObjectId::parse("not-an-id").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let secs = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::from_parts(secs, *PROCESS_UNIQUE, count)
    }

    fn from_parts(secs: u32, unique: [u8; 5], count: u32) -> Self {
        let [t0, t1, t2, t3] = secs.to_be_bytes();
        let [u0, u1, u2, u3, u4] = unique;
        let [_, c0, c1, c2] = count.to_be_bytes();
        Self([t0, t1, t2, t3, u0, u1, u2, u3, u4, c0, c1, c2])
    }

    /// Build an identifier from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parse an identifier from its 24-character hex form.
    ///
    /// Upper and lower case hex digits are both accepted.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the input has the wrong length or contains a
    /// character that is not a hex digit.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != OBJECT_ID_HEX_LEN {
            return Err(IdError::InvalidLength {
                expected: OBJECT_ID_HEX_LEN,
                actual: s.chars().count(),
            });
        }

        let mut bytes = [0_u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, .. } => IdError::InvalidCharacter(c),
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                IdError::InvalidLength {
                    expected: OBJECT_ID_HEX_LEN,
                    actual: s.chars().count(),
                }
            }
        })?;

        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the creation time embedded in the identifier.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let [t0, t1, t2, t3, ..] = self.0;
        let secs = u32::from_be_bytes([t0, t1, t2, t3]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// Stored as TEXT so ids stay readable in psql.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ObjectId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ObjectId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ObjectId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_through_display() {
        let id = ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let id = ObjectId::parse("65A1F0C2E4B0A1B2C3D4E5F6").unwrap();
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            ObjectId::parse("abc"),
            Err(IdError::InvalidLength {
                expected: 24,
                actual: 3
            })
        );
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5f600").is_err());
    }

    #[test]
    fn test_parse_non_hex() {
        assert_eq!(
            ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5fz"),
            Err(IdError::InvalidCharacter('z'))
        );
    }

    #[test]
    fn test_parse_multibyte_input_is_rejected() {
        // 24 bytes but only 12 chars
        assert!(matches!(
            ObjectId::parse("éééééééééééé"),
            Err(IdError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        let id = ObjectId::from_bytes([0xab; 12]);
        assert_eq!(id.to_string(), "abababababababababababab");
        assert_eq!(format!("{id:?}"), "ObjectId(abababababababababababab)");
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_is_embedded() {
        let id = ObjectId::from_parts(1_700_000_000, [0; 5], 7);
        assert_eq!(id.timestamp().timestamp(), 1_700_000_000);
        assert_eq!(id.bytes()[11], 7);
    }

    #[test]
    fn test_counter_is_truncated_to_three_bytes() {
        let id = ObjectId::from_parts(0, [0; 5], 0x0102_0304);
        assert_eq!(id.to_string(), "000000000000000000020304");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let id = ObjectId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1f0c2e4b0a1b2c3d4e5f6\"");

        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
