use std::future::Future;

use crate::error::AppError;
use crate::models::PlayerRecord;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Persists extracted players.
pub trait PlayerStore: Send + Sync + Clone {
    /// Insert or update players keyed by (team name, player id).
    ///
    /// Returns the number of rows written. Upserting the same record twice
    /// leaves a single row.
    fn upsert_players(
        &self,
        players: &[PlayerRecord],
    ) -> impl Future<Output = Result<u64, AppError>> + Send;
}

/// A no-op PlayerStore for use when persistence is not needed.
#[derive(Debug, Clone)]
pub struct NullStore;

impl PlayerStore for NullStore {
    async fn upsert_players(&self, _players: &[PlayerRecord]) -> Result<u64, AppError> {
        Ok(0)
    }
}
