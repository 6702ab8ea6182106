#![forbid(unsafe_code)]
//! SQLite persistence for makazi: schema bootstrap, a process-scoped
//! connection pool, and typed accessors per entity. Accessors are plain
//! functions over a borrowed connection so callers decide how long they hold
//! a pool slot.

mod error;
pub mod directors;
pub mod inquiries;
pub mod pool;
pub mod properties;
pub mod schema;
pub mod sessions;
pub mod users;

pub use error::StoreError;
pub use pool::{StoreConfig, StoreConnection, StorePool};

pub const CRATE_NAME: &str = "makazi-store";

#[cfg(test)]
mod store_tests;
