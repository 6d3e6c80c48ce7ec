//! In-memory pool implementations.
//!
//! These store places and confirmed schedules in plain HashMaps behind a
//! read-write lock, giving tests and local development fast, deterministic
//! and isolated collaborators without any external service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::ThreadId;
use crate::models::place::Place;
use crate::models::schedule::ConfirmedSchedule;
use crate::pool::error::PoolResult;
use crate::pool::source::{CandidatePool, ConfirmedScheduleSource};

#[derive(Default)]
struct PoolData {
    /// region -> places available there
    places: HashMap<String, Vec<Place>>,
    is_healthy: bool,
}

/// Seedable in-memory candidate pool.
///
/// Keyword matching is a case-insensitive substring test against the place
/// name and category label, which is enough for tests and local development.
#[derive(Clone)]
pub struct InMemoryCandidatePool {
    data: Arc<RwLock<PoolData>>,
}

impl InMemoryCandidatePool {
    /// Create a new empty pool.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(PoolData {
                places: HashMap::new(),
                is_healthy: true,
            })),
        }
    }

    /// Register places under a region, appending to any existing entries.
    pub fn seed_region(&self, region: impl Into<String>, places: Vec<Place>) {
        let mut data = self.data.write().unwrap();
        data.places.entry(region.into()).or_default().extend(places);
    }

    /// Mark the pool as unhealthy for failure-path tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Number of places seeded across all regions.
    pub fn place_count(&self) -> usize {
        self.data.read().unwrap().places.values().map(Vec::len).sum()
    }
}

impl Default for InMemoryCandidatePool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandidatePool for InMemoryCandidatePool {
    async fn query(
        &self,
        region: &str,
        category_keywords: &[&str],
        limit: usize,
    ) -> PoolResult<Vec<Place>> {
        let data = self.data.read().unwrap();
        let Some(region_places) = data.places.get(region) else {
            return Ok(Vec::new());
        };

        let lowered: Vec<String> = category_keywords
            .iter()
            .map(|kw| kw.to_ascii_lowercase())
            .collect();

        let matches: Vec<Place> = region_places
            .iter()
            .filter(|place| {
                let name = place.name.to_ascii_lowercase();
                let category = place.category.to_ascii_lowercase();
                lowered
                    .iter()
                    .any(|kw| name.contains(kw) || category.contains(kw))
            })
            .take(limit)
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn health_check(&self) -> PoolResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }
}

#[derive(Default)]
struct ScheduleData {
    /// thread id -> confirmed entries for that thread
    schedules: HashMap<String, Vec<ConfirmedSchedule>>,
}

/// Seedable in-memory confirmed schedule source.
#[derive(Clone, Default)]
pub struct InMemoryScheduleSource {
    data: Arc<RwLock<ScheduleData>>,
}

impl InMemoryScheduleSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record confirmed entries for a thread, appending to existing ones.
    pub fn seed_thread(&self, thread_id: &ThreadId, entries: Vec<ConfirmedSchedule>) {
        let mut data = self.data.write().unwrap();
        data.schedules
            .entry(thread_id.value().to_string())
            .or_default()
            .extend(entries);
    }
}

#[async_trait]
impl ConfirmedScheduleSource for InMemoryScheduleSource {
    async fn for_thread(&self, thread_id: &ThreadId) -> PoolResult<Vec<ConfirmedSchedule>> {
        let data = self.data.read().unwrap();
        Ok(data
            .schedules
            .get(thread_id.value())
            .cloned()
            .unwrap_or_default())
    }
}
