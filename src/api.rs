//! Public API surface for the itinerary synthesis engine.
//!
//! This file consolidates the DTO types that cross the crate boundary.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::itinerary::DailyItinerary;
pub use crate::models::itinerary::Itinerary;
pub use crate::models::itinerary::ItineraryStatistics;
pub use crate::models::itinerary::OptimizedRoute;
pub use crate::models::itinerary::RouteLeg;
pub use crate::models::place::Place;
pub use crate::models::place::PlaceCategory;
pub use crate::models::schedule::ConfirmedSchedule;
pub use crate::models::schedule::DaySchedule;
pub use crate::models::schedule::DocumentKind;
pub use crate::models::schedule::TimeBlock;
pub use crate::models::schedule::TimeBlockCandidates;
pub use crate::stages::distribution::TimeBlockPlan;
pub use crate::stages::selection::CandidateSelection;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

/// Conversation thread identifier, carried through every stage response.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

/// Upstream place identifier (provider-scoped, opaque).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaceId(pub String);

impl ThreadId {
    pub fn new(value: impl Into<String>) -> Self {
        ThreadId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl PlaceId {
    pub fn new(value: impl Into<String>) -> Self {
        PlaceId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ThreadId> for String {
    fn from(id: ThreadId) -> Self {
        id.0
    }
}

/// Geographic point (latitude, longitude).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Input contract for one itinerary synthesis run.
///
/// Collected upstream (conversation slots, user picks, parsed documents) and
/// handed to the core as a single value; the core never reaches back into
/// session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub thread_id: ThreadId,
    /// Destination regions to search (city or district names).
    pub destinations: Vec<String>,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Trip length in days.
    pub trip_days: u32,
    /// Travel style tags such as "food" or "culture".
    #[serde(default)]
    pub style_tags: Vec<String>,
    /// Places the user explicitly chose, in selection order.
    #[serde(default)]
    pub user_selections: Vec<Place>,
}

impl SynthesisRequest {
    /// Check the input contract before any stage runs.
    ///
    /// Missing destinations, blank region names, a zero-day trip and
    /// out-of-range coordinates are rejected here. Degenerate but valid data
    /// (empty pool categories, missing ratings) flows through the stages and
    /// degrades gracefully instead.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if self.destinations.is_empty() {
            return Err(SynthesisError::invalid_request(
                "at least one destination region is required",
            ));
        }
        if self.destinations.iter().any(|d| d.trim().is_empty()) {
            return Err(SynthesisError::invalid_request(
                "destination regions must not be blank",
            ));
        }
        if self.trip_days == 0 {
            return Err(SynthesisError::invalid_request(
                "trip must span at least one day",
            ));
        }
        for place in &self.user_selections {
            if place.id.value().trim().is_empty() {
                return Err(SynthesisError::invalid_request(
                    "user selections must carry a place id",
                ));
            }
            if let Some(location) = &place.location {
                if !(-90.0..=90.0).contains(&location.latitude)
                    || !(-180.0..=180.0).contains(&location.longitude)
                {
                    return Err(SynthesisError::InvalidCoordinate {
                        latitude: location.latitude,
                        longitude: location.longitude,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> SynthesisRequest {
        SynthesisRequest {
            thread_id: ThreadId::new("t-1"),
            destinations: vec!["seoul".to_string()],
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            trip_days: 3,
            style_tags: Vec::new(),
            user_selections: Vec::new(),
        }
    }

    #[test]
    fn test_thread_id_new() {
        let id = ThreadId::new("t-42");
        assert_eq!(id.value(), "t-42");
    }

    #[test]
    fn test_thread_id_equality() {
        let id1 = ThreadId::new("a");
        let id2 = ThreadId::new("a");
        let id3 = ThreadId::new("b");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_place_id_new() {
        let id = PlaceId::new("ChIJ123");
        assert_eq!(id.value(), "ChIJ123");
    }

    #[test]
    fn test_place_id_display() {
        let id = PlaceId::new("p-9");
        assert_eq!(format!("{}", id), "p-9");
    }

    #[test]
    fn test_ids_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(PlaceId::new("x"));
        set.insert(PlaceId::new("y"));
        set.insert(PlaceId::new("x")); // Duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_geo_point_valid() {
        let point = GeoPoint::new(37.5665, 126.978).unwrap();
        assert_eq!(point.latitude, 37.5665);
        assert_eq!(point.longitude, 126.978);
    }

    #[test]
    fn test_geo_point_rejects_bad_latitude() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(-90.1, 0.0).is_err());
    }

    #[test]
    fn test_geo_point_rejects_bad_longitude() {
        assert!(GeoPoint::new(0.0, 180.1).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
    }

    #[test]
    fn test_geo_point_boundary_values() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_validate_accepts_minimal_request() {
        assert!(minimal_request().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_destinations() {
        let mut request = minimal_request();
        request.destinations.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_destination() {
        let mut request = minimal_request();
        request.destinations = vec!["  ".to_string()];
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_trip_days() {
        let mut request = minimal_request();
        request.trip_days = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_selection_coordinates() {
        let mut request = minimal_request();
        let mut place = Place::new(PlaceId::new("p1"), "Somewhere", "attraction");
        place.location = Some(GeoPoint {
            latitude: 123.0,
            longitude: 0.0,
        });
        request.user_selections.push(place);

        let err = request.validate().unwrap_err();
        assert!(matches!(err, SynthesisError::InvalidCoordinate { .. }));
    }
}
