//! Persistence for cafe rows.
//!
//! The service only talks to the [`CafeStore`] trait. Two implementations exist:
//! - [`PostgresCafeStore`]: the production table, reached through a `sqlx` pool.
//! - [`MemoryCafeStore`]: a process-local table used by tests and `DATABASE_URL=memory` runs.

use crate::domain::cafe::{Cafe, CafeField, NewCafe};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCafeStore;
pub use postgres::PostgresCafeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the offending column.
    #[error("unique constraint violated on '{0}'")]
    UniqueViolation(String),

    /// Any other integrity constraint (not-null, check) rejected the write.
    #[error("integrity constraint violated: {0}")]
    Integrity(String),

    /// A value does not fit the column that stores it.
    #[error("value too long: {0}")]
    ValueTooLong(String),

    #[error("column '{0}' cannot be used as a query filter")]
    UnsupportedFilter(CafeField),

    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Single-row operations over the `cafe` table.
///
/// Implementations must enforce uniqueness of `name` and must never leave a partial row behind
/// when `insert` fails.
#[async_trait]
pub trait CafeStore: Send + Sync {
    async fn insert(&self, cafe: NewCafe) -> Result<Cafe, StoreError>;

    /// Overwrites the row with `cafe.id`. Returns `false` when no such row exists.
    async fn update(&self, cafe: &Cafe) -> Result<bool, StoreError>;

    /// Returns `false` when no such row exists.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Cafe>, StoreError>;

    /// Exact-match filter on one text column.
    async fn query_by_field(&self, field: CafeField, value: &str) -> Result<Vec<Cafe>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Cafe>, StoreError>;

    /// Connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
