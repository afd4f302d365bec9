//! Storage layer
//!
//! Two interchangeable backends behind one trait: an embedded SQLite table
//! and a Redis counter/set/hash layout. Which one serves the process is
//! decided once at startup.

pub mod redis;
pub mod sqlite;

pub use self::redis::RedisStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use shelf_types::Item;

/// Persistence contract for items.
///
/// Implementations own id allocation: ids are positive, strictly increasing
/// across concurrent inserts, and never reused after a delete.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All live items, in backend-determined order.
    async fn list(&self) -> Result<Vec<Item>>;

    /// `None` when no record exists for `id`.
    async fn get(&self, id: i64) -> Result<Option<Item>>;

    /// Allocates a fresh id, persists the record, and returns the stored
    /// item. Callers validate the name before reaching this point.
    async fn insert(&self, name: &str, description: &str) -> Result<Item>;

    /// Overwrites both fields in place; the id never changes. `false` when
    /// no record exists for `id`.
    async fn update(&self, id: i64, name: &str, description: &str) -> Result<bool>;

    /// Removes the record and its membership entry. `false` when no record
    /// exists for `id`.
    async fn delete(&self, id: i64) -> Result<bool>;
}
