//! Command implementations.
//!
//! Each command returns a serializable value; `main` prints it.

pub mod orders;
pub mod products;
pub mod shipments;
pub mod store;

use std::sync::Arc;

use omnicart_storefront::config::StorefrontConfig;
use omnicart_storefront::state::AppState;
use omnicart_storefront::store::{FileStore, KeyValueStore, MemoryStore};
use serde::Serialize;
use tracing::info;

/// Build the service graph over the configured data directory.
///
/// Without a configured directory the state runs over an empty in-memory
/// store, as the storefront server does.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened.
pub fn open(config: StorefrontConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = match &config.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Opening data directory");
            Arc::new(FileStore::open(dir)?)
        }
        None => Arc::new(MemoryStore::new()),
    };
    Ok(AppState::new(config, store))
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` fails to serialize.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
