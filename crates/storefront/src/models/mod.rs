//! Persisted records and the views built from them.
//!
//! Every record serializes with camelCase field names, matching the JSON
//! documents written by earlier builds. Money is `Decimal`, serialized as a
//! string.

pub mod ad;
pub mod cart;
pub mod order;
pub mod preferences;
pub mod product;
pub mod shipment;
pub mod wishlist;

pub use ad::{Ad, AdInput, AdPatch};
pub use cart::{CartItem, CartView};
pub use order::{Order, OrderItem, OrderItemInput, OrderRequest};
pub use preferences::{BrowseDefaults, Preferences, PreferencesUpdate};
pub use product::{DeleteOutcome, MAX_PRICE, Product};
pub use shipment::Shipment;
pub use wishlist::{WishlistItem, WishlistMove};

use thiserror::Error;

/// A money total that `Decimal` cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Amount is too large")]
pub struct AmountOverflow;
