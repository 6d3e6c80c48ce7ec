//! Stage 1: candidate selection.
//!
//! For each destination region, fetches a superset of places per category
//! from the candidate pool, filters them by category label and style
//! compatibility, ranks them by review volume with rating as tie-break, and
//! keeps the top N. An empty category is an empty list, never an error.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use futures::future;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SynthesisConfig;
use crate::error::SynthesisError;
use crate::models::place::{Place, PlaceCategory};
use crate::pool::source::CandidatePool;

/// Which categories each style tag admits. A tag not listed here imposes no
/// constraint.
const STYLE_RULES: [(&str, &[PlaceCategory]); 8] = [
    ("food", &[PlaceCategory::Restaurant, PlaceCategory::Cafe]),
    ("culture", &[PlaceCategory::Culture, PlaceCategory::Attraction]),
    ("nature", &[PlaceCategory::Nature, PlaceCategory::Activity]),
    ("shopping", &[PlaceCategory::Shopping]),
    (
        "nightlife",
        &[PlaceCategory::NightView, PlaceCategory::Restaurant],
    ),
    (
        "family",
        &[
            PlaceCategory::ThemePark,
            PlaceCategory::Attraction,
            PlaceCategory::Nature,
        ],
    ),
    (
        "relaxation",
        &[
            PlaceCategory::Cafe,
            PlaceCategory::Nature,
            PlaceCategory::Accommodation,
        ],
    ),
    (
        "adventure",
        &[PlaceCategory::Activity, PlaceCategory::ThemePark],
    ),
];

/// Stage 1 output: ranked candidates per region and category.
///
/// Every region carries all ten category keys; categories with no
/// qualifying places (or excluded by the style profile) hold empty lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSelection {
    pub destinations: Vec<String>,
    pub region_candidates: BTreeMap<String, BTreeMap<String, Vec<Place>>>,
    pub total_candidates: usize,
}

impl CandidateSelection {
    /// Ranked places for one region and category; empty when absent.
    pub fn candidates(&self, region: &str, category: PlaceCategory) -> &[Place] {
        self.region_candidates
            .get(region)
            .and_then(|by_category| by_category.get(category.as_str()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All candidates merged across regions, keyed by category label.
    pub fn places_by_category(&self) -> BTreeMap<String, Vec<Place>> {
        let mut merged: BTreeMap<String, Vec<Place>> = BTreeMap::new();
        for by_category in self.region_candidates.values() {
            for (label, places) in by_category {
                merged
                    .entry(label.clone())
                    .or_default()
                    .extend(places.iter().cloned());
            }
        }
        merged
    }
}

/// Whether the style profile admits a category.
///
/// Inclusive filtering: an empty profile admits everything, and a profile
/// made up entirely of unrecognized tags imposes no constraint. As soon as
/// one tag is recognized, a category qualifies only through some recognized
/// tag's rule.
fn style_admits(style_tags: &[String], category: PlaceCategory) -> bool {
    if style_tags.is_empty() {
        return true;
    }
    let mut any_known = false;
    for tag in style_tags {
        let tag = tag.trim().to_ascii_lowercase();
        if let Some((_, admitted)) = STYLE_RULES.iter().find(|(name, _)| *name == tag) {
            any_known = true;
            if admitted.contains(&category) {
                return true;
            }
        }
    }
    !any_known
}

/// Filter to label-matching places, rank, and truncate to `limit`.
///
/// Ranking is lexicographic: review count descending, then rating
/// descending. Missing counts and ratings rank as zero.
fn rank_candidates(mut places: Vec<Place>, category: PlaceCategory, limit: usize) -> Vec<Place> {
    places.retain(|place| category.matches_label(&place.category));
    places.sort_by(|a, b| {
        b.review_count
            .unwrap_or(0)
            .cmp(&a.review_count.unwrap_or(0))
            .then_with(|| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
    });
    places.truncate(limit);
    places
}

/// Run Stage 1 over every destination region.
///
/// Queries admitted categories concurrently per region. Pool failures
/// propagate; empty results do not.
pub async fn select_candidates(
    pool: &dyn CandidatePool,
    destinations: &[String],
    style_tags: &[String],
    config: &SynthesisConfig,
) -> Result<CandidateSelection, SynthesisError> {
    let fetch_limit = config.fetch_limit();
    let mut region_candidates = BTreeMap::new();
    let mut total_candidates = 0usize;

    for region in destinations {
        let admitted: Vec<PlaceCategory> = PlaceCategory::ALL
            .iter()
            .copied()
            .filter(|category| style_admits(style_tags, *category))
            .collect();

        let queries = admitted.iter().map(|category| {
            let keywords = category.keywords();
            async move { pool.query(region, keywords, fetch_limit).await }
        });
        let fetched = future::try_join_all(queries).await?;

        let mut by_category: BTreeMap<String, Vec<Place>> = BTreeMap::new();
        for category in PlaceCategory::ALL {
            by_category.insert(category.as_str().to_string(), Vec::new());
        }
        for (category, places) in admitted.iter().zip(fetched) {
            let ranked = rank_candidates(places, *category, config.top_n_per_category);
            total_candidates += ranked.len();
            by_category.insert(category.as_str().to_string(), ranked);
        }
        debug!(
            "Selected candidates for region '{}' across {} categories",
            region,
            admitted.len()
        );
        region_candidates.insert(region.clone(), by_category);
    }

    Ok(CandidateSelection {
        destinations: destinations.to_vec(),
        region_candidates,
        total_candidates,
    })
}
