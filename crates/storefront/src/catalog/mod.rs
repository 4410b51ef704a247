//! Product catalog.
//!
//! The catalog a client sees is a merge of three things:
//!
//! - the **seed**: a read-only base catalog loaded from [`SeedSource`]
//! - **overrides**: products created or edited locally, stored under
//!   [`keys::CUSTOM_PRODUCTS`]; an override shadows the seed product with the
//!   same id wholesale
//! - **tombstones**: ids deleted locally, stored under
//!   [`keys::DELETED_PRODUCTS`], which never reappear even if the seed
//!   still lists them
//!
//! Merge order is seed order (with overrides substituted in place) followed
//! by local-only overrides in insertion order.

mod normalize;
mod query;
mod seed;

pub use normalize::{product_from_value, product_with_id};
pub use query::{ProductQuery, SortKey};
pub use seed::{SeedCatalog, SeedSource};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use omnicart_core::{ProductId, SellerId};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{DeleteOutcome, MAX_PRICE, Product};
use crate::store::{self, Documents, StoreError, keys};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Seed catalog request failed.
    #[error("Seed catalog fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Seed catalog answered with a non-success status.
    #[error("Seed catalog returned HTTP {0}")]
    Status(u16),

    /// Override or tombstone storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A created or edited product is priced above [`MAX_PRICE`].
    #[error("Price must not exceed {}", MAX_PRICE)]
    InvalidPrice,
}

/// Merged product catalog.
#[derive(Clone, Debug)]
pub struct CatalogService {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    seed: SeedCatalog,
    docs: Arc<Documents>,
}

impl CatalogService {
    /// Create a catalog over `docs` with the given seed.
    #[must_use]
    pub fn new(docs: Arc<Documents>, seed: SeedSource, cache_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                seed: SeedCatalog::new(seed, cache_ttl),
                docs,
            }),
        }
    }

    /// The seed loader.
    #[must_use]
    pub fn seed(&self) -> &SeedCatalog {
        &self.inner.seed
    }

    /// The merged view, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded or storage fails.
    pub async fn merged(&self) -> Result<Vec<Product>, CatalogError> {
        let seed = self.inner.seed.load().await?;
        let docs = Arc::clone(&self.inner.docs);
        let (overrides, deleted) = store::blocking(move || {
            Ok::<_, CatalogError>((load_overrides(&docs)?, load_tombstones(&docs)?))
        })
        .await?;
        let deleted: HashSet<ProductId> = deleted.into_iter().collect();

        let seed_ids: HashSet<&ProductId> = seed.iter().map(|p| &p.id).collect();
        let (shadowing, local_only): (Vec<Product>, Vec<Product>) = overrides
            .into_iter()
            .partition(|p| seed_ids.contains(&p.id));

        let merged = seed
            .iter()
            .map(|base| {
                shadowing
                    .iter()
                    .find(|o| o.id == base.id)
                    .unwrap_or(base)
                    .clone()
            })
            .chain(local_only)
            .filter(|p| !deleted.contains(&p.id))
            .collect();

        Ok(merged)
    }

    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded or storage fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        Ok(query.apply(self.merged().await?))
    }

    /// Look up one product in the merged view.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded or storage fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.merged().await?.into_iter().find(|p| p.id == *id))
    }

    /// List a seller's products matching `query`. Unknown sellers get an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded or storage fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn list_by_seller(
        &self,
        seller_id: &SellerId,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .merged()
            .await?
            .into_iter()
            .filter(|p| p.seller_id == *seller_id)
            .collect();
        Ok(query.apply(products))
    }

    /// Distinct category names in merge order.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded or storage fails.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut seen = HashSet::new();
        Ok(self
            .merged()
            .await?
            .into_iter()
            .map(|p| p.category_name)
            .filter(|c| seen.insert(c.clone()))
            .collect())
    }

    /// Create a local product from raw input.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPrice` if the price exceeds
    /// [`MAX_PRICE`], or `CatalogError::Store` if the override cannot be
    /// written.
    #[instrument(skip(self, input))]
    pub fn create_product(&self, input: Value) -> Result<Product, CatalogError> {
        let id = ProductId::new(format!("{}{}", ProductId::LOCAL_PREFIX, Uuid::new_v4().simple()));
        let product = normalize_with_id(input, &id)?;
        let stored = serde_json::to_value(&product).map_err(StoreError::from)?;

        self.inner.docs.transaction(|tx| {
            let mut overrides: Vec<Value> = tx.read(keys::CUSTOM_PRODUCTS, Vec::new)?;
            overrides.push(stored);
            tx.write(keys::CUSTOM_PRODUCTS, &overrides)?;
            Ok::<_, CatalogError>(())
        })?;

        info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    /// Replace (or add) the override for `id`. Seed products gain an
    /// override; nothing from the previous record is kept.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPrice` if the price exceeds
    /// [`MAX_PRICE`], or `CatalogError::Store` if the override cannot be
    /// written.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub fn update_product(&self, id: &ProductId, input: Value) -> Result<Product, CatalogError> {
        let product = normalize_with_id(input, id)?;
        let stored = serde_json::to_value(&product).map_err(StoreError::from)?;

        self.inner.docs.transaction(|tx| {
            let mut overrides: Vec<Value> = tx.read(keys::CUSTOM_PRODUCTS, Vec::new)?;
            match overrides.iter_mut().find(|v| override_id(v).as_ref() == Some(id)) {
                Some(existing) => *existing = stored,
                None => overrides.push(stored),
            }
            tx.write(keys::CUSTOM_PRODUCTS, &overrides)?;
            Ok::<_, CatalogError>(())
        })?;

        info!("Updated product");
        Ok(product)
    }

    /// Drop any override for `id` and tombstone it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if storage fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete_product(&self, id: &ProductId) -> Result<DeleteOutcome, CatalogError> {
        self.inner.docs.transaction(|tx| {
            let mut overrides: Vec<Value> = tx.read(keys::CUSTOM_PRODUCTS, Vec::new)?;
            overrides.retain(|v| override_id(v).as_ref() != Some(id));

            let mut deleted: Vec<ProductId> = tx.read(keys::DELETED_PRODUCTS, Vec::new)?;
            if !deleted.contains(id) {
                deleted.push(id.clone());
            }

            tx.write(keys::CUSTOM_PRODUCTS, &overrides)?;
            tx.write(keys::DELETED_PRODUCTS, &deleted)?;
            Ok::<_, CatalogError>(())
        })?;

        info!("Deleted product");
        Ok(DeleteOutcome {
            success: true,
            id: id.clone(),
        })
    }

}

fn load_overrides(docs: &Documents) -> Result<Vec<Product>, StoreError> {
    let raw: Vec<Value> = docs.read(keys::CUSTOM_PRODUCTS, Vec::new)?;
    Ok(raw.iter().filter_map(product_from_value).collect())
}

fn load_tombstones(docs: &Documents) -> Result<Vec<ProductId>, StoreError> {
    docs.read(keys::DELETED_PRODUCTS, Vec::new)
}

fn normalize_with_id(input: Value, id: &ProductId) -> Result<Product, CatalogError> {
    let obj = match input {
        Value::Object(obj) => obj,
        _ => serde_json::Map::new(),
    };
    let product = product_with_id(id.clone(), &obj);
    if product.price > MAX_PRICE {
        return Err(CatalogError::InvalidPrice);
    }
    Ok(product)
}

fn override_id(value: &Value) -> Option<ProductId> {
    value
        .get("id")
        .and_then(crate::coerce::text)
        .map(ProductId::new)
}
