//! Normalization of raw product JSON into [`Product`].
//!
//! Seed payloads and documents written by older builds disagree on field
//! names (`title` vs `name`, `stock` vs `quantity`, `category` vs
//! `categoryName`). Every product passes through [`product_from_value`]
//! before it reaches the merged view.

use chrono::{DateTime, Utc};
use omnicart_core::{ProductId, SellerId};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::coerce::{self, first_field};
use crate::models::Product;

pub const DEFAULT_NAME: &str = "Unnamed Product";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_SELLER_NAME: &str = "Dummy Seller";

const MAX_RATING: f64 = 5.0;

/// Normalize one raw product object.
///
/// Returns `None` for non-objects and for objects without a usable `id`.
#[must_use]
pub fn product_from_value(value: &Value) -> Option<Product> {
    let obj = value.as_object()?;
    let id = obj.get("id").and_then(coerce::text)?;
    Some(product_with_id(ProductId::new(id), obj))
}

/// Normalize `obj` under an explicit id, ignoring any `id` field it carries.
#[must_use]
pub fn product_with_id(id: ProductId, obj: &Map<String, Value>) -> Product {
    let price = first_field(obj, &["price"])
        .and_then(coerce::decimal)
        .unwrap_or_default()
        .max(Decimal::ZERO);
    let quantity = first_field(obj, &["quantity", "stock"])
        .and_then(coerce::count)
        .unwrap_or(0);
    let rating = first_field(obj, &["rating"])
        .and_then(coerce::float)
        .unwrap_or(0.0)
        .clamp(0.0, MAX_RATING);
    let popularity = first_field(obj, &["popularity", "rating"])
        .and_then(coerce::float)
        .unwrap_or(0.0);

    let image_url = string_field(obj, &["imageUrl", "thumbnail"])
        .or_else(|| {
            obj.get("images")
                .and_then(Value::as_array)
                .and_then(|images| images.first())
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default();

    let seller_id = string_field(obj, &["sellerId"])
        .map_or_else(|| dummy_seller_for(id.as_str()), SellerId::new);

    Product {
        name: string_field(obj, &["name", "title"]).unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: string_field(obj, &["description"]).unwrap_or_default(),
        price,
        quantity,
        rating,
        category_name: string_field(obj, &["categoryName", "category"])
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        image_url,
        seller_id,
        seller_name: string_field(obj, &["sellerName"])
            .unwrap_or_else(|| DEFAULT_SELLER_NAME.to_string()),
        brand: string_field(obj, &["brand"]).unwrap_or_default(),
        reviews: obj
            .get("reviews")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        created_at: created_at(obj).unwrap_or_else(Utc::now),
        popularity,
        id,
    }
}

/// Seed products carry no seller, so they are spread over three placeholder
/// sellers by numeric id.
fn dummy_seller_for(id: &str) -> SellerId {
    let bucket = id.parse::<u64>().map_or(1, |n| n % 3 + 1);
    SellerId::new(format!("dummy-seller-{bucket}"))
}

fn string_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    first_field(obj, names).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn created_at(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let raw = obj
        .get("createdAt")
        .and_then(Value::as_str)
        .or_else(|| {
            obj.get("meta")
                .and_then(|meta| meta.get("createdAt"))
                .and_then(Value::as_str)
        })?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_seed_shape() {
        let product = product_from_value(&json!({
            "id": 7,
            "title": "Phone",
            "price": 199.99,
            "stock": 12,
            "rating": 4.5,
            "category": "smartphones",
            "thumbnail": "https://cdn/7.png",
            "meta": {"createdAt": "2024-05-23T08:56:21.618Z"}
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "7");
        assert_eq!(product.name, "Phone");
        assert_eq!(product.price, Decimal::new(19999, 2));
        assert_eq!(product.quantity, 12);
        assert_eq!(product.category_name, "smartphones");
        assert_eq!(product.image_url, "https://cdn/7.png");
        assert_eq!(product.seller_id.as_str(), "dummy-seller-2");
        assert_eq!(product.seller_name, "Dummy Seller");
        assert!((product.popularity - 4.5).abs() < f64::EPSILON);
        assert_eq!(product.created_at.to_rfc3339(), "2024-05-23T08:56:21.618+00:00");
    }

    #[test]
    fn test_defaults_and_clamping() {
        let product = product_from_value(&json!({
            "id": "local-abc",
            "price": "-3",
            "rating": 9,
            "images": ["a.png", "b.png"]
        }))
        .unwrap();

        assert_eq!(product.name, DEFAULT_NAME);
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert!((product.rating - 5.0).abs() < f64::EPSILON);
        assert_eq!(product.category_name, DEFAULT_CATEGORY);
        assert_eq!(product.image_url, "a.png");
        assert_eq!(product.seller_id.as_str(), "dummy-seller-1");
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn test_rejects_missing_id() {
        assert!(product_from_value(&json!({"name": "x"})).is_none());
        assert!(product_from_value(&json!("x")).is_none());
    }

    #[test]
    fn test_normalized_product_reads_back_unchanged() {
        let product = product_from_value(&json!({
            "id": "p1", "name": "Mug", "price": "12.50", "quantity": 3,
            "sellerId": "s-9", "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let stored = serde_json::to_value(&product).unwrap();
        assert_eq!(product_from_value(&stored).unwrap(), product);
    }
}
