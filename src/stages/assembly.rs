//! Stage 3: itinerary assembly.
//!
//! Applies the hard per-block cap to filler candidates, computes each day's
//! visiting order, and folds everything into the final itinerary with
//! aggregate statistics. Purely a reduction over Stage 2 output plus route
//! computation; all aggregation is null-safe.

use std::collections::BTreeMap;

use chrono::Duration;
use log::debug;

use crate::algorithms::routing::build_route;
use crate::api::SynthesisRequest;
use crate::config::SynthesisConfig;
use crate::models::itinerary::{DailyItinerary, Itinerary, ItineraryStatistics};
use crate::models::place::Place;
use crate::models::schedule::{TimeBlock, TimeBlockCandidates};
use crate::stages::distribution::TimeBlockPlan;

/// Clone a slot, truncating filler candidates to the capacity left under
/// the committed cap. Committed entries are never touched here.
fn cap_slot(slot: &TimeBlockCandidates, max_places_per_block: usize) -> TimeBlockCandidates {
    let mut capped = slot.clone();
    let open = max_places_per_block.saturating_sub(capped.committed_count());
    capped.ai_candidates.truncate(open);
    capped
}

/// A day's places in block order: user selections first within each block,
/// then the surviving filler candidates. Confirmed entries are calendar
/// events, not places, and stay in the slots only.
fn day_places(slots: &BTreeMap<TimeBlock, TimeBlockCandidates>) -> Vec<Place> {
    let mut places = Vec::new();
    for block in TimeBlock::ALL {
        if let Some(slot) = slots.get(&block) {
            places.extend(slot.user_selected.iter().cloned());
            places.extend(slot.ai_candidates.iter().cloned());
        }
    }
    places
}

/// Run Stage 3: cap slots, order each day's route, and derive statistics.
pub fn assemble_itinerary(
    request: &SynthesisRequest,
    plan: &TimeBlockPlan,
    config: &SynthesisConfig,
) -> Itinerary {
    let mut daily_itineraries = Vec::new();
    let mut optimized_routes = Vec::new();
    let mut total_km = 0.0;
    let mut total_minutes = 0.0;

    for (day_number, schedule) in &plan.time_blocks {
        let time_slots: BTreeMap<TimeBlock, TimeBlockCandidates> = schedule
            .blocks
            .iter()
            .map(|(block, slot)| (*block, cap_slot(slot, config.max_places_per_block)))
            .collect();

        let route = build_route(
            *day_number,
            day_places(&time_slots),
            config.places_per_cluster,
            config.average_speed_kmh,
        );
        total_km += route.total_distance.value();
        total_minutes += route.total_duration.value();

        daily_itineraries.push(DailyItinerary {
            date: request.start_date + Duration::days(i64::from(*day_number) - 1),
            day_number: *day_number,
            places: route.places.clone(),
            time_slots,
        });
        optimized_routes.push(route);
    }

    let statistics = compute_statistics(&daily_itineraries);
    debug!(
        "Assembled itinerary: {} days, {} places, {:.1} km",
        daily_itineraries.len(),
        statistics.total_places,
        total_km
    );

    Itinerary {
        daily_itineraries,
        optimized_routes,
        total_distance: qtty::Kilometers::new(total_km),
        total_duration: qtty::Minutes::new(total_minutes),
        statistics,
        checksum: request_checksum(request),
    }
}

/// Aggregate statistics over the capped slots of every day.
fn compute_statistics(days: &[DailyItinerary]) -> ItineraryStatistics {
    let mut user_selected_count = 0usize;
    let mut ai_recommended_count = 0usize;
    let mut rating_sum = 0.0;
    let mut rated_count = 0usize;
    let mut total_reviews = 0u64;
    let mut category_histogram: BTreeMap<String, usize> = BTreeMap::new();

    for day in days {
        for slot in day.time_slots.values() {
            user_selected_count += slot.user_selected.len();
            ai_recommended_count += slot.ai_candidates.len();
            for place in slot.user_selected.iter().chain(slot.ai_candidates.iter()) {
                if let Some(rating) = place.rating {
                    rating_sum += rating;
                    rated_count += 1;
                }
                if let Some(reviews) = place.review_count {
                    total_reviews += u64::from(reviews);
                }
                let label = place.category.trim();
                if !label.is_empty() {
                    *category_histogram.entry(label.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    let total_places = user_selected_count + ai_recommended_count;
    let user_selected_ratio = if total_places == 0 {
        0.0
    } else {
        user_selected_count as f64 / total_places as f64
    };
    let average_rating = if rated_count == 0 {
        0.0
    } else {
        rating_sum / rated_count as f64
    };

    ItineraryStatistics {
        total_places,
        user_selected_count,
        ai_recommended_count,
        user_selected_ratio,
        average_rating,
        rated_count,
        total_reviews,
        category_histogram,
    }
}

/// Checksum of the originating request, for caller-side idempotence checks.
pub fn request_checksum(request: &SynthesisRequest) -> String {
    let json = serde_json::to_string(request).unwrap_or_default();
    compute_request_checksum(&json)
}

/// Compute a checksum for the request JSON
fn compute_request_checksum(json_str: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(json_str.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
