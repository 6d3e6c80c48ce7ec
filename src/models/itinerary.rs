//! Final itinerary shapes: optimized routes, per-day plans and statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::PlaceId;
use crate::models::place::Place;
use crate::models::schedule::{TimeBlock, TimeBlockCandidates};

/// A single travel leg between two consecutive places in a day route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: PlaceId,
    pub to: PlaceId,
    /// Great-circle distance between the two places.
    pub distance: qtty::Kilometers,
    /// Estimated travel time at the configured average speed.
    pub duration: qtty::Minutes,
}

/// Visiting order for one day after clustering and 2-opt refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub day_number: u32,
    /// Places in final visiting order.
    pub places: Vec<Place>,
    pub legs: Vec<RouteLeg>,
    pub total_distance: qtty::Kilometers,
    pub total_duration: qtty::Minutes,
}

/// One trip day with its visiting order and slot assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyItinerary {
    pub date: NaiveDate,
    pub day_number: u32,
    /// Places in final visiting order.
    pub places: Vec<Place>,
    pub time_slots: BTreeMap<TimeBlock, TimeBlockCandidates>,
}

/// Aggregate statistics over a finished itinerary.
///
/// All aggregation is null-safe: places without a rating stay out of the
/// average, places without a review count add nothing to the total, and
/// blank category labels stay out of the histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryStatistics {
    pub total_places: usize,
    pub user_selected_count: usize,
    pub ai_recommended_count: usize,
    /// Fraction of placed entries the user picked themselves (0.0 to 1.0).
    pub user_selected_ratio: f64,
    /// Mean provider rating over the places that carry one.
    pub average_rating: f64,
    /// Number of places that carried a rating.
    pub rated_count: usize,
    pub total_reviews: u64,
    pub category_histogram: BTreeMap<String, usize>,
}

/// Complete synthesized itinerary for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub daily_itineraries: Vec<DailyItinerary>,
    pub optimized_routes: Vec<OptimizedRoute>,
    pub total_distance: qtty::Kilometers,
    pub total_duration: qtty::Minutes,
    pub statistics: ItineraryStatistics,
    /// SHA256 checksum of the originating request, for caller-side
    /// idempotence checks.
    #[serde(default)]
    pub checksum: String,
}
