//! Typed, versioned JSON documents on top of a [`KeyValueStore`].
//!
//! Documents are written as `{"version": N, "data": ...}`. A stored value
//! that is not an envelope is a legacy (version 0) document from the browser
//! builds and is upgraded by [`upgrade_legacy`] before it is decoded.
//!
//! Reads never fail the caller on bad data:
//!
//! - a list with some undecodable records yields the good records; the bad
//!   ones are logged and kept aside
//! - malformed JSON, an unknown future version, or a shape mismatch yields
//!   the caller's default
//!
//! Writes are stricter. A transaction re-appends the records it kept aside
//! and refuses to overwrite a document it could not read at all.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use omnicart_core::ShipmentStatus;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Batch, KeyValueStore, StoreError};
use super::{keys, schema};

/// Envelope version written by this build.
pub const CURRENT_VERSION: u64 = 1;

/// Typed access to the documents in a store.
///
/// All mutations run inside [`Documents::transaction`], which holds a
/// process-wide write lock for the whole read-modify-write and commits the
/// staged writes as one atomic [`Batch`].
pub struct Documents {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for Documents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Documents").finish_non_exhaustive()
    }
}

/// Outcome of rewriting every stored document at the current version.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Keys rewritten in the current envelope format.
    pub rewritten: Vec<String>,
    /// Keys already at the current version.
    pub current: Vec<String>,
    /// Keys left untouched because they could not be decoded.
    pub skipped: Vec<String>,
}

impl Documents {
    /// Wrap a backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying backend.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read and decode the document under `key`, or `default()` when it is
    /// missing or unreadable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the backend itself fails.
    pub fn read<T, F>(&self, key: &str, default: F) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        Ok(match load(key, self.store.get(key)?.as_deref()) {
            Loaded::Decoded { value, .. } => value,
            Loaded::Missing | Loaded::Unreadable => default(),
        })
    }

    /// Run `f` as a single read-modify-write transaction.
    ///
    /// Writes staged through the [`Transaction`] are visible to later reads in
    /// the same transaction and are committed together once `f` returns `Ok`.
    /// Nothing is written if `f` returns an error.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`, or a `StoreError` from the
    /// lock or the commit.
    pub fn transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Transaction<'_>) -> Result<R, E>,
    {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut tx = Transaction {
            docs: self,
            staged: BTreeMap::new(),
            seen: BTreeMap::new(),
        };
        let output = f(&mut tx)?;

        let batch = tx.into_batch();
        if !batch.is_empty() {
            debug!(writes = batch.len(), "Committing document transaction");
            self.store.apply(batch)?;
        }
        Ok(output)
    }

    /// Rewrite every stored document in the current envelope format.
    ///
    /// A legacy document is only rewritten once its upgraded data decodes as
    /// the record type stored under its key; anything else is reported as
    /// skipped and left as it was.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub fn migrate_all(&self) -> Result<MigrationReport, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut report = MigrationReport::default();
        let mut batch = Batch::new();

        for key in self.store.keys()? {
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            match parse_versioned(&key, &raw) {
                Some((version, _)) if version == CURRENT_VERSION => report.current.push(key),
                Some((_, data)) if schema::validates(&key, &data) => {
                    batch = batch.set(key.clone(), encode(&data)?);
                    report.rewritten.push(key);
                }
                Some(_) => {
                    warn!(key, "Legacy document does not match its record type, leaving it");
                    report.skipped.push(key);
                }
                None => report.skipped.push(key),
            }
        }

        if !batch.is_empty() {
            self.store.apply(batch)?;
        }
        Ok(report)
    }
}

/// What a transaction has learned about a key it read.
enum Seen {
    Clean,
    /// Records that failed to decode, re-appended on write.
    Skipped(Vec<Value>),
    /// The whole document failed to decode.
    Unreadable,
}

/// Staged writes for one [`Documents::transaction`].
pub struct Transaction<'a> {
    docs: &'a Documents,
    staged: BTreeMap<String, Option<String>>,
    seen: BTreeMap<String, Seen>,
}

impl Transaction<'_> {
    /// Read a document, seeing writes already staged in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the backend itself fails.
    pub fn read<T, F>(&mut self, key: &str, default: F) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let loaded = match self.staged.get(key) {
            Some(Some(raw)) => load(key, Some(raw.as_str())),
            Some(None) => Loaded::Missing,
            None => load(key, self.docs.store.get(key)?.as_deref()),
        };

        let (seen, value) = match loaded {
            Loaded::Missing => (Seen::Clean, default()),
            Loaded::Decoded { value, skipped } if skipped.is_empty() => (Seen::Clean, value),
            Loaded::Decoded { value, skipped } => (Seen::Skipped(skipped), value),
            Loaded::Unreadable => (Seen::Unreadable, default()),
        };
        self.seen.insert(key.to_string(), seen);
        Ok(value)
    }

    /// Whether `key` held a document this transaction could not decode.
    #[must_use]
    pub fn is_unreadable(&self, key: &str) -> bool {
        matches!(self.seen.get(key), Some(Seen::Unreadable))
    }

    /// Stage a write of `value` under `key`.
    ///
    /// Records skipped when `key` was read are appended back to a list
    /// value so they survive the write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreadable` if the stored document could not be
    /// decoded or is from a newer build, or `StoreError::Serialize` if
    /// `value` cannot be encoded.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        if !self.seen.contains_key(key)
            && !self.staged.contains_key(key)
            && let Some(raw) = self.docs.store.get(key)?
            && parse_versioned(key, &raw).is_none()
        {
            self.seen.insert(key.to_string(), Seen::Unreadable);
        }

        let mut data = serde_json::to_value(value)?;
        match self.seen.get(key) {
            Some(Seen::Unreadable) => {
                warn!(key, "Refusing to overwrite an unreadable document");
                return Err(StoreError::Unreadable(key.to_string()));
            }
            Some(Seen::Skipped(records)) => {
                if let Value::Array(items) = &mut data {
                    items.extend(records.iter().cloned());
                }
            }
            Some(Seen::Clean) | None => {}
        }

        self.staged.insert(key.to_string(), Some(encode(&data)?));
        Ok(())
    }

    /// Stage removal of `key`. Removal is allowed even for unreadable
    /// documents.
    pub fn remove(&mut self, key: &str) {
        self.seen.insert(key.to_string(), Seen::Clean);
        self.staged.insert(key.to_string(), None);
    }

    fn into_batch(self) -> Batch {
        self.staged
            .into_iter()
            .fold(Batch::new(), |batch, (key, value)| match value {
                Some(raw) => batch.set(key, raw),
                None => batch.remove(key),
            })
    }
}

/// Encode `value` in the current envelope.
fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize + ?Sized> {
        version: u64,
        data: &'a T,
    }

    Ok(serde_json::to_string(&Envelope {
        version: CURRENT_VERSION,
        data: value,
    })?)
}

/// A decoded read.
enum Loaded<T> {
    Missing,
    Decoded { value: T, skipped: Vec<Value> },
    Unreadable,
}

fn load<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Loaded<T> {
    let Some(raw) = raw else {
        return Loaded::Missing;
    };
    let Some((_, data)) = parse_versioned(key, raw) else {
        return Loaded::Unreadable;
    };
    match decode(key, data) {
        Some((value, skipped)) => Loaded::Decoded { value, skipped },
        None => Loaded::Unreadable,
    }
}

/// Decode `data`, dropping list records that do not fit `T`.
///
/// A record fits when a one-element list holding it decodes as `T`.
fn decode<T: DeserializeOwned>(key: &str, data: Value) -> Option<(T, Vec<Value>)> {
    let error = match serde_json::from_value::<T>(data.clone()) {
        Ok(value) => return Some((value, Vec::new())),
        Err(e) => e,
    };

    let Value::Array(records) = data else {
        warn!(key, error = %error, "Stored document has an unexpected shape, using default");
        return None;
    };

    let (kept, skipped): (Vec<Value>, Vec<Value>) = records
        .into_iter()
        .partition(|record| {
            serde_json::from_value::<T>(Value::Array(vec![record.clone()])).is_ok()
        });
    warn!(
        key,
        skipped = skipped.len(),
        error = %error,
        "Skipping stored records with an unexpected shape"
    );

    match serde_json::from_value::<T>(Value::Array(kept)) {
        Ok(value) => Some((value, skipped)),
        Err(e) => {
            warn!(key, error = %e, "Stored document has an unexpected shape, using default");
            None
        }
    }
}

/// Parse a raw value into `(stored_version, upgraded_data)`.
fn parse_versioned(key: &str, raw: &str) -> Option<(u64, Value)> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Stored document is not valid JSON, using default");
            return None;
        }
    };

    match split_envelope(value) {
        Ok((version, data)) if version <= CURRENT_VERSION => Some((version, data)),
        Ok((version, _)) => {
            warn!(key, version, "Stored document is from a newer build, using default");
            None
        }
        Err(legacy) => Some((0, upgrade_legacy(key, legacy))),
    }
}

/// Split an envelope into `(version, data)`, or hand back a bare legacy value.
fn split_envelope(value: Value) -> Result<(u64, Value), Value> {
    match value {
        Value::Object(mut map)
            if map.len() == 2 && map.contains_key("data") && map.contains_key("version") =>
        {
            match map.get("version").and_then(Value::as_u64) {
                Some(version) => Ok((version, map.remove("data").unwrap_or(Value::Null))),
                None => Err(Value::Object(map)),
            }
        }
        other => Err(other),
    }
}

/// Upgrade a version-0 document to the version-1 shape.
///
/// Browser builds stored ids as whatever JSON type the UI had at hand and
/// statuses in any casing. Version 1 stores ids as strings and statuses in
/// their canonical form.
fn upgrade_legacy(key: &str, value: Value) -> Value {
    let Value::Array(items) = value else {
        return value;
    };

    let items = items.into_iter();
    let upgraded: Vec<Value> = if key == keys::DELETED_PRODUCTS {
        items.map(stringify_scalar).collect()
    } else if key == keys::ORDERS || key == keys::SHIPMENTS {
        items
            .map(|item| map_object(item, |obj| canonicalize_status(obj, key == keys::ORDERS)))
            .collect()
    } else if key.starts_with(keys::CART_PREFIX) || key.starts_with(keys::WISHLIST_PREFIX) {
        items.map(|item| map_object(item, stringify_product_id)).collect()
    } else {
        items.collect()
    };

    Value::Array(upgraded)
}

fn map_object(value: Value, f: impl FnOnce(&mut Map<String, Value>)) -> Value {
    match value {
        Value::Object(mut obj) => {
            f(&mut obj);
            Value::Object(obj)
        }
        other => other,
    }
}

fn stringify_scalar(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        other => other,
    }
}

fn stringify_product_id(obj: &mut Map<String, Value>) {
    if let Some(id) = obj.remove("productId") {
        obj.insert("productId".to_string(), stringify_scalar(id));
    }
    if let Some(Value::String(qty)) = obj.get("quantity")
        && let Ok(parsed) = qty.trim().parse::<u64>()
    {
        obj.insert("quantity".to_string(), Value::from(parsed));
    }
}

fn canonicalize_status(obj: &mut Map<String, Value>, default_pending: bool) {
    let canonical = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ShipmentStatus>().ok());

    match canonical {
        Some(status) => {
            obj.insert("status".to_string(), Value::from(status.as_str()));
        }
        None if default_pending => {
            obj.insert(
                "status".to_string(),
                Value::from(ShipmentStatus::Pending.as_str()),
            );
        }
        None => {}
    }
}
