//! Cart records.

use omnicart_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AmountOverflow, Product};

/// One line in a user's cart.
///
/// `price`, `name`, and `image_url` are a snapshot taken from the catalog
/// the first time the product could be looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

impl CartItem {
    /// A new line, snapshotting `product` when it could be looked up.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32, product: Option<&Product>) -> Self {
        let mut item = Self {
            product_id,
            quantity,
            price: Decimal::ZERO,
            name: String::new(),
            image_url: String::new(),
        };
        if let Some(product) = product {
            item.fill_snapshot(product);
        }
        item
    }

    /// Fill snapshot fields that are still empty or zero from `product`.
    pub fn fill_snapshot(&mut self, product: &Product) {
        if self.price.is_zero() {
            self.price = product.price;
        }
        if self.name.is_empty() {
            self.name.clone_from(&product.name);
        }
        if self.image_url.is_empty() {
            self.image_url.clone_from(&product.image_url);
        }
    }

    /// Whether the snapshot fields have been filled from the catalog.
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        !self.name.is_empty()
    }

    /// `price × quantity`, or `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Cart contents with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Decimal,
    pub subtotal_display: String,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: Decimal::ZERO,
            subtotal_display: Price::from_amount(Decimal::ZERO).display(),
        }
    }
}

impl TryFrom<Vec<CartItem>> for CartView {
    type Error = AmountOverflow;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let item_count = items.iter().map(|i| i.quantity).fold(0, u32::saturating_add);
        let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
            item.line_total().and_then(|line| sum.checked_add(line))
        });
        let subtotal = subtotal.ok_or(AmountOverflow)?;
        Ok(Self {
            items,
            item_count,
            subtotal,
            subtotal_display: Price::from_amount(subtotal).display(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32, cents: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            quantity,
            price: Decimal::new(cents, 2),
            name: format!("Product {id}"),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_view_totals() {
        let view = CartView::try_from(vec![item("1", 2, 1050), item("2", 1, 199)]).unwrap();
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, Decimal::new(2299, 2));
        assert_eq!(view.subtotal_display, "$22.99");
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::try_from(Vec::new()).unwrap();
        assert_eq!(view, CartView::empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal_display, "$0.00");
    }

    #[test]
    fn test_extreme_prices_overflow_instead_of_panicking() {
        let mut line = item("1", 2, 0);
        line.price = Decimal::MAX;
        assert_eq!(line.line_total(), None);
        assert_eq!(CartView::try_from(vec![line]), Err(AmountOverflow));

        let mut single = item("1", 1, 0);
        single.price = Decimal::MAX;
        assert_eq!(
            CartView::try_from(vec![single.clone(), single]),
            Err(AmountOverflow)
        );
    }
}
