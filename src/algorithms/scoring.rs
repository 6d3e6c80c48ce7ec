//! Distance and composite score computations.
//!
//! Pure functions over place coordinates and quality signals. Distances are
//! great-circle (Haversine); scores are normalized to [0, 1]. Missing data
//! (absent coordinates, ratings, review counts) contributes zero rather than
//! erroring, so callers can score sparse provider records directly.

use crate::models::place::{Place, PlaceCategory};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance at or under which proximity scores a full 1.0.
pub const NEAR_DISTANCE_KM: f64 = 5.0;

/// Distance at or over which proximity scores 0.0.
pub const FAR_DISTANCE_KM: f64 = 10.0;

/// Review volume saturates at 10^REVIEW_LOG_DIVISOR - 1 reviews.
const REVIEW_LOG_DIVISOR: f64 = 4.0;

const DISTANCE_WEIGHT: f64 = 0.4;
const QUALITY_WEIGHT: f64 = 0.4;
const DIVERSITY_WEIGHT: f64 = 0.2;

/// Must-include weighting per category. Ordered table: the first matching
/// category wins for ambiguous labels.
const DIVERSITY_WEIGHTS: [(PlaceCategory, f64); 5] = [
    (PlaceCategory::Restaurant, 0.9),
    (PlaceCategory::Attraction, 0.8),
    (PlaceCategory::Cafe, 0.7),
    (PlaceCategory::Activity, 0.6),
    (PlaceCategory::Shopping, 0.5),
];

const DEFAULT_DIVERSITY_WEIGHT: f64 = 0.4;

/// Great-circle distance between two coordinate pairs in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Floating error can push `a` past 1.0 for near-antipodal points, which
    // would make the square root of (1 - a) NaN.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance between two places; 0.0 when either lacks coordinates.
pub fn distance_between(a: &Place, b: &Place) -> f64 {
    match (&a.location, &b.location) {
        (Some(from), Some(to)) => {
            haversine_km(from.latitude, from.longitude, to.latitude, to.longitude)
        }
        _ => 0.0,
    }
}

/// Smallest distance from `place` to any reference; 0.0 on an empty set.
pub fn min_distance_km(place: &Place, references: &[Place]) -> f64 {
    if references.is_empty() {
        return 0.0;
    }
    references
        .iter()
        .map(|reference| distance_between(place, reference))
        .fold(f64::INFINITY, f64::min)
}

/// Mean distance from `place` to the references; 0.0 on an empty set.
pub fn average_distance_km(place: &Place, references: &[Place]) -> f64 {
    if references.is_empty() {
        return 0.0;
    }
    let total: f64 = references
        .iter()
        .map(|reference| distance_between(place, reference))
        .sum();
    total / references.len() as f64
}

/// Sum of consecutive pairwise distances along a place sequence.
pub fn total_route_distance_km(places: &[Place]) -> f64 {
    if places.len() < 2 {
        return 0.0;
    }
    places
        .windows(2)
        .map(|pair| distance_between(&pair[0], &pair[1]))
        .sum()
}

/// Quality score from rating and review volume, in [0, 1].
pub fn base_score(place: &Place) -> f64 {
    let review_score = match place.review_count {
        Some(count) => ((f64::from(count) + 1.0).log10() / REVIEW_LOG_DIVISOR).min(1.0),
        None => 0.0,
    };
    let rating_score = match place.rating {
        Some(rating) => (rating / 5.0).clamp(0.0, 1.0),
        None => 0.0,
    };
    0.5 * review_score + 0.5 * rating_score
}

/// Proximity score: 1.0 at or under [`NEAR_DISTANCE_KM`], 0.0 at or over
/// [`FAR_DISTANCE_KM`], linear in between. Non-positive distances count as
/// co-located.
pub fn distance_score(km: f64) -> f64 {
    if km <= NEAR_DISTANCE_KM {
        return 1.0;
    }
    if km >= FAR_DISTANCE_KM {
        return 0.0;
    }
    (FAR_DISTANCE_KM - km) / (FAR_DISTANCE_KM - NEAR_DISTANCE_KM)
}

/// Heuristic category weighting used by the comprehensive score.
pub fn diversity_score(category_label: &str) -> f64 {
    DIVERSITY_WEIGHTS
        .iter()
        .find(|(category, _)| category.matches_label(category_label))
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_DIVERSITY_WEIGHT)
}

/// Composite rank score for filler candidates, in [0, 1].
///
/// Proximity to the reference anchors and provider quality carry equal
/// weight; the category weighting breaks ties between otherwise similar
/// places. Pure function: identical inputs always produce identical output.
pub fn comprehensive_score(place: &Place, references: &[Place]) -> f64 {
    let proximity = distance_score(min_distance_km(place, references));
    DISTANCE_WEIGHT * proximity
        + QUALITY_WEIGHT * base_score(place)
        + DIVERSITY_WEIGHT * diversity_score(&place.category)
}
