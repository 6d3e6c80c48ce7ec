//! Collaborator interfaces supplying candidate places and confirmed schedules.
//!
//! The synthesis core consumes these as narrow, read-only contracts. Caching,
//! transport, authentication and retry policy all live with the
//! implementations; the core never coordinates locking over them.

use async_trait::async_trait;

use crate::api::ThreadId;
use crate::models::place::Place;
use crate::models::schedule::ConfirmedSchedule;
use crate::pool::error::PoolResult;

/// Read-only access to the candidate place pool.
#[async_trait]
pub trait CandidatePool: Send + Sync {
    /// Fetch up to `limit` places for a region matching any of the keywords.
    ///
    /// # Arguments
    /// * `region` - Destination region, e.g. a city or district name
    /// * `category_keywords` - Keyword synonyms for one place category
    /// * `limit` - Maximum number of places to return
    ///
    /// # Returns
    /// * `Ok(Vec<Place>)` - Matching places, possibly fewer than `limit`.
    ///   An empty result is `Ok(vec![])`, never an error.
    /// * `Err(PoolError)` - The provider failed or is unreachable
    async fn query(
        &self,
        region: &str,
        category_keywords: &[&str],
        limit: usize,
    ) -> PoolResult<Vec<Place>>;

    /// Check availability of the backing provider.
    async fn health_check(&self) -> PoolResult<bool>;
}

/// Read-only access to confirmed schedule entries parsed upstream.
///
/// Entries arrive already validated: document understanding has resolved
/// titles, timestamps and document kinds before they reach this interface.
#[async_trait]
pub trait ConfirmedScheduleSource: Send + Sync {
    /// All confirmed entries recorded for a conversation thread.
    ///
    /// # Returns
    /// * `Ok(Vec<ConfirmedSchedule>)` - Entries for the thread, empty when
    ///   the thread has no confirmed documents
    /// * `Err(PoolError)` - The source failed or is unreachable
    async fn for_thread(&self, thread_id: &ThreadId) -> PoolResult<Vec<ConfirmedSchedule>>;
}
