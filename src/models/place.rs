//! Candidate place model and the closed category taxonomy.
//!
//! Providers report categories as free-form labels ("korean bbq restaurant",
//! "observation deck"); the closed [`PlaceCategory`] taxonomy overlays them
//! for pool queries, time-block affinity and diversity weighting. Label
//! mapping is substring-based and deliberately forgiving: an unmatched label
//! falls to documented defaults instead of failing.

use serde::{Deserialize, Serialize};

use crate::api::{GeoPoint, PlaceId};

/// A candidate place sourced from the place pool.
///
/// Everything beyond identity, name and category tracks what upstream
/// providers actually return: optional, and treated as contributing nothing
/// when absent. Instances are immutable values owned by whichever stage
/// currently holds them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    /// Free-form category label as reported by the provider.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Provider rating on a 0-5 scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// Relative price tier (0-4).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
}

impl Place {
    /// Create a place with only the required fields set.
    pub fn new(id: PlaceId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            location: None,
            address: None,
            rating: None,
            review_count: None,
            price_level: None,
            open_now: None,
        }
    }
}

/// Closed category taxonomy for itinerary planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Attraction,
    Restaurant,
    Cafe,
    Shopping,
    Activity,
    Culture,
    Nature,
    ThemePark,
    NightView,
    Accommodation,
}

impl PlaceCategory {
    /// Every category, in taxonomy order.
    pub const ALL: [PlaceCategory; 10] = [
        PlaceCategory::Attraction,
        PlaceCategory::Restaurant,
        PlaceCategory::Cafe,
        PlaceCategory::Shopping,
        PlaceCategory::Activity,
        PlaceCategory::Culture,
        PlaceCategory::Nature,
        PlaceCategory::ThemePark,
        PlaceCategory::NightView,
        PlaceCategory::Accommodation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Attraction => "attraction",
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Shopping => "shopping",
            PlaceCategory::Activity => "activity",
            PlaceCategory::Culture => "culture",
            PlaceCategory::Nature => "nature",
            PlaceCategory::ThemePark => "theme_park",
            PlaceCategory::NightView => "night_view",
            PlaceCategory::Accommodation => "accommodation",
        }
    }

    /// Keyword synonyms used when querying the candidate pool.
    ///
    /// The first keyword is always the category's natural-language name, so
    /// [`PlaceCategory::matches_label`] recognizes canonical labels.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            PlaceCategory::Attraction => &["attraction", "landmark", "sightseeing"],
            PlaceCategory::Restaurant => &["restaurant", "food", "dining"],
            PlaceCategory::Cafe => &["cafe", "coffee", "bakery"],
            PlaceCategory::Shopping => &["shopping", "market", "mall"],
            PlaceCategory::Activity => &["activity", "experience", "tour"],
            PlaceCategory::Culture => &["culture", "museum", "gallery", "temple"],
            PlaceCategory::Nature => &["nature", "park", "garden"],
            PlaceCategory::ThemePark => &["theme park", "amusement park"],
            PlaceCategory::NightView => &["night view", "observation deck", "skyline"],
            PlaceCategory::Accommodation => &["accommodation", "hotel", "lodging"],
        }
    }

    /// Whether a free-form provider label belongs to this category.
    ///
    /// Case-insensitive substring match against the keyword synonyms, plus
    /// the serialized snake_case name so round-tripped labels match too.
    pub fn matches_label(&self, label: &str) -> bool {
        if label.trim().is_empty() {
            return false;
        }
        let label = label.to_ascii_lowercase();
        label == self.as_str() || self.keywords().iter().any(|kw| label.contains(kw))
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_new_defaults() {
        let place = Place::new(PlaceId::new("p1"), "Namsan Tower", "attraction");
        assert_eq!(place.name, "Namsan Tower");
        assert!(place.location.is_none());
        assert!(place.rating.is_none());
        assert!(place.review_count.is_none());
    }

    #[test]
    fn test_matches_label_exact() {
        assert!(PlaceCategory::Restaurant.matches_label("restaurant"));
        assert!(PlaceCategory::ThemePark.matches_label("theme_park"));
    }

    #[test]
    fn test_matches_label_substring() {
        assert!(PlaceCategory::Restaurant.matches_label("Korean BBQ Restaurant"));
        assert!(PlaceCategory::Cafe.matches_label("specialty coffee"));
        assert!(PlaceCategory::NightView.matches_label("rooftop observation deck"));
    }

    #[test]
    fn test_matches_label_rejects_unrelated() {
        assert!(!PlaceCategory::Restaurant.matches_label("city park"));
        assert!(!PlaceCategory::Cafe.matches_label(""));
        assert!(!PlaceCategory::Cafe.matches_label("   "));
    }

    #[test]
    fn test_all_categories_have_keywords() {
        for category in PlaceCategory::ALL {
            assert!(!category.keywords().is_empty());
            // Every category recognizes its own natural-language name.
            assert!(category.matches_label(category.keywords()[0]));
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&PlaceCategory::ThemePark).unwrap();
        assert_eq!(json, "\"theme_park\"");
        let back: PlaceCategory = serde_json::from_str("\"night_view\"").unwrap();
        assert_eq!(back, PlaceCategory::NightView);
    }

    #[test]
    fn test_place_serde_skips_missing_fields() {
        let place = Place::new(PlaceId::new("p1"), "Somewhere", "cafe");
        let json = serde_json::to_string(&place).unwrap();
        assert!(!json.contains("rating"));
        assert!(!json.contains("location"));
    }
}
