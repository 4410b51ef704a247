//! Newtype IDs for type-safe entity references.
//!
//! Every persisted record in OmniCart is keyed by an opaque string: seed
//! products carry numeric ids rendered as strings (`"7"`), locally created
//! products use `local-…`, orders `ORD-…`, shipments `SHP-…`. The
//! `define_id!` macro wraps those strings so a `ProductId` can never be
//! passed where an `OrderId` is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use omnicart_core::define_id;
/// define_id!(CouponId);
/// define_id!(VoucherId);
///
/// let coupon = CouponId::new("SAVE10");
/// let voucher = VoucherId::from("SAVE10");
/// assert_eq!(coupon.as_str(), voucher.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: CouponId = voucher;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(SellerId);
define_id!(OrderId);
define_id!(ShipmentId);
define_id!(AdId);

impl UserId {
    /// Namespace used for carts and wishlists of anonymous visitors.
    pub const GUEST: &'static str = "guest";

    /// Returns the storage namespace for this user.
    ///
    /// Blank ids collapse into the shared guest namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        if self.0.trim().is_empty() {
            Self::GUEST
        } else {
            &self.0
        }
    }
}

impl ProductId {
    /// Prefix for products created locally rather than fetched from the seed catalog.
    pub const LOCAL_PREFIX: &'static str = "local-";

    /// Whether this id was minted locally.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(Self::LOCAL_PREFIX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str_agree() {
        let id = ProductId::new("7");
        assert_eq!(id.to_string(), "7");
        assert_eq!(id.as_str(), "7");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = OrderId::from("ORD-1-2");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ORD-1-2\"");
    }

    #[test]
    fn test_blank_user_maps_to_guest() {
        assert_eq!(UserId::new("").namespace(), "guest");
        assert_eq!(UserId::new("   ").namespace(), "guest");
        assert_eq!(UserId::new("u-1").namespace(), "u-1");
    }

    #[test]
    fn test_local_product_ids() {
        assert!(ProductId::new("local-abc").is_local());
        assert!(!ProductId::new("12").is_local());
    }
}
