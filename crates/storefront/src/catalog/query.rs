//! Search, filter, and sort over the merged catalog.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::coerce;
use crate::models::Product;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Newest,
    Popular,
    Rating,
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            "popular" => Ok(Self::Popular),
            "rating" => Ok(Self::Rating),
            _ => Err(()),
        }
    }
}

/// Listing parameters as they arrive from a query string.
///
/// Every field is raw text. Blank or unparseable numeric bounds are ignored
/// and an unknown sort keeps merge order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
    pub sort: Option<String>,
}

impl ProductQuery {
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn min_price(mut self, min_price: impl Into<String>) -> Self {
        self.min_price = Some(min_price.into());
        self
    }

    #[must_use]
    pub fn max_price(mut self, max_price: impl Into<String>) -> Self {
        self.max_price = Some(max_price.into());
        self
    }

    #[must_use]
    pub fn min_rating(mut self, min_rating: impl Into<String>) -> Self {
        self.min_rating = Some(min_rating.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// The recognized sort key, if any.
    #[must_use]
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(|s| s.parse().ok())
    }

    /// Filter and sort `products`.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let search = lowered(self.search.as_deref());
        let category = lowered(self.category.as_deref());
        let min_price = self.min_price.as_deref().and_then(coerce::parse_decimal);
        let max_price = self.max_price.as_deref().and_then(coerce::parse_decimal);
        let min_rating = self
            .min_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite());

        let mut filtered: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                search.as_deref().is_none_or(|needle| {
                    p.name.to_lowercase().contains(needle)
                        || p.description.to_lowercase().contains(needle)
                })
            })
            .filter(|p| {
                category
                    .as_deref()
                    .is_none_or(|needle| p.category_name.to_lowercase().contains(needle))
            })
            .filter(|p| within(p.price, min_price, max_price))
            .filter(|p| min_rating.is_none_or(|min| p.rating >= min))
            .collect();

        // `sort_by` is stable, so ties keep merge order
        match self.sort_key() {
            Some(SortKey::PriceAsc) => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(SortKey::PriceDesc) => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
            Some(SortKey::Newest) => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Some(SortKey::Popular) => {
                filtered.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
            }
            Some(SortKey::Rating) => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            None => {}
        }

        filtered
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value
        .map(str::to_lowercase)
        .filter(|v| !v.is_empty())
}

fn within(price: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use omnicart_core::{ProductId, SellerId};

    use super::*;

    fn product(id: &str, price: i64, rating: f64, days: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            description: String::new(),
            price: Decimal::new(price, 0),
            quantity: 1,
            rating,
            category_name: "Home Decor".to_string(),
            image_url: String::new(),
            seller_id: SellerId::new("s1"),
            seller_name: String::new(),
            brand: String::new(),
            reviews: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, days, 0, 0, 0).unwrap(),
            popularity: rating,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("a", 50, 2.0, 1),
            product("b", 150, 4.0, 3),
            product("c", 250, 5.0, 2),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let q = ProductQuery::default().min_price("150").max_price("250");
        assert_eq!(ids(&q.apply(catalog())), ["b", "c"]);
    }

    #[test]
    fn test_filters_intersect() {
        let q = ProductQuery::default()
            .min_price("100")
            .max_price("200")
            .min_rating("4.5");
        assert!(q.apply(catalog()).is_empty());
    }

    #[test]
    fn test_non_numeric_bounds_are_ignored() {
        let q = ProductQuery::default().min_price("cheap").min_rating("");
        assert_eq!(q.apply(catalog()).len(), 3);
    }

    #[test]
    fn test_search_and_category_are_case_insensitive() {
        let q = ProductQuery::default().search("ITEM B");
        assert_eq!(ids(&q.apply(catalog())), ["b"]);

        let q = ProductQuery::default().category("decor");
        assert_eq!(q.apply(catalog()).len(), 3);
    }

    #[test]
    fn test_sorts() {
        let sorted = |key: &str| ids(&ProductQuery::default().sort(key).apply(catalog()))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        assert_eq!(sorted("price_desc"), ["c", "b", "a"]);
        assert_eq!(sorted(" Price_Asc "), ["a", "b", "c"]);
        assert_eq!(sorted("newest"), ["b", "c", "a"]);
        assert_eq!(sorted("rating"), ["c", "b", "a"]);
        assert_eq!(sorted("popular"), ["c", "b", "a"]);
        assert_eq!(sorted("bogus"), ["a", "b", "c"]);
    }
}
