//! OmniCart Core - Shared types library.
//!
//! This crate provides common types used across all OmniCart components:
//! - `storefront` - Commerce services and the JSON HTTP API
//! - `cli` - Operator commands against a persisted store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
