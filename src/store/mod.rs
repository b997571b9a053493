//! Schema Store
//!
//! Persists form schemas as a single JSON array under one well-known key of
//! a key-value backend.
//!
//! # Design Principles
//!
//! - Injected: callers depend on the `SchemaStore` trait
//! - Explicit lifecycle: `open` a store over a backend, `close` to get it back
//! - Reads never fail: missing or unreadable content is an empty collection
//! - Writes report failure to the caller

mod backend;
mod errors;
mod json_store;

pub use backend::{check_key, FileBackend, KeyValueBackend, MemoryBackend};
pub use errors::{StoreError, StoreResult};
pub use json_store::{JsonSchemaStore, SchemaStore, DEFAULT_STORAGE_KEY};
