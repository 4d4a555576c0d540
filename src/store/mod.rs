use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Token, TokenFilter};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Access to the token table owned by the token-storage subsystem.
///
/// `count_active` and `list_active` share the same predicate:
/// `revoked = false AND expires_at >= now`, narrowed by the filter.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Token>>;

    async fn count_active(&self, filter: &TokenFilter, now: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Snapshot of the matching active tokens, ordered by id.
    async fn list_active(
        &self,
        filter: &TokenFilter,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Token>>;

    /// Marks the token revoked. Idempotent; returns false if no such row exists.
    async fn revoke(&self, id: &str) -> anyhow::Result<bool>;
}
