//! Newtype IDs for type-safe document references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different collections.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`ObjectId`](crate::ObjectId) with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]` (24-char hex string)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `generate()`, `parse()` and `as_object_id()`
/// - `FromStr`, `Display` and `From<ObjectId>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(ReviewId);
/// define_id!(CouponId);
///
/// let review_id = ReviewId::generate();
/// let coupon_id = CouponId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ReviewId = coupon_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::ObjectId);

        impl $name {
            /// Generate a new, unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::ObjectId::new())
            }

            /// Parse an ID from its 24-character hex form.
            ///
            /// # Errors
            ///
            /// Returns `IdError` if the input is not a well-formed identifier.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::ObjectId::parse(s).map(Self)
            }

            /// Get the underlying document identifier.
            #[must_use]
            pub const fn as_object_id(&self) -> $crate::ObjectId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$crate::ObjectId> for $name {
            fn from(id: $crate::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <$crate::ObjectId as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <$crate::ObjectId as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <$crate::ObjectId as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <$crate::ObjectId as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// One ID type per collection
define_id!(UserId);
define_id!(ItemId);
define_id!(CartId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{IdError, ObjectId};

    #[test]
    fn test_parse_and_display() {
        let id = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            ItemId::parse("I1"),
            Err(IdError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_conversions_preserve_identity() {
        let raw = ObjectId::new();
        let cart_id = CartId::from(raw);
        assert_eq!(cart_id.as_object_id(), raw);
        assert_eq!(ObjectId::from(cart_id), raw);
    }

    #[test]
    fn test_serde_transparent() {
        let id: OrderId = serde_json::from_str("\"65a1f0c2e4b0a1b2c3d4e5f6\"").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"65a1f0c2e4b0a1b2c3d4e5f6\""
        );
    }
}
