//! Stage 2: time-block distribution.
//!
//! Three placement passes over a per-day, per-block grid:
//! 1. confirmed fixed events, mapped by calendar day and clock hour, never
//!    rejected or rebalanced;
//! 2. user selections, round-robin across days, into the block their
//!    category is affine to (capacity is advisory for these — a selection is
//!    always recorded somewhere);
//! 3. filler candidates, appended to blocks still under the committed cap,
//!    ranked by composite score against the day's own selections.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Timelike};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::scoring::comprehensive_score;
use crate::api::ThreadId;
use crate::config::SynthesisConfig;
use crate::models::place::{Place, PlaceCategory};
use crate::models::schedule::{ConfirmedSchedule, DaySchedule, TimeBlock};
use crate::stages::selection::CandidateSelection;

/// Which block each category is affine to. Ordered table: the first
/// matching category wins for ambiguous labels.
const BLOCK_AFFINITY: [(PlaceCategory, TimeBlock); 10] = [
    // Theme parks sort before nature: both match "park".
    (PlaceCategory::ThemePark, TimeBlock::AfternoonActivity),
    (PlaceCategory::Cafe, TimeBlock::Breakfast),
    (PlaceCategory::Attraction, TimeBlock::MorningActivity),
    (PlaceCategory::Culture, TimeBlock::MorningActivity),
    (PlaceCategory::Nature, TimeBlock::MorningActivity),
    (PlaceCategory::Restaurant, TimeBlock::Lunch),
    (PlaceCategory::Shopping, TimeBlock::AfternoonActivity),
    (PlaceCategory::Activity, TimeBlock::AfternoonActivity),
    (PlaceCategory::NightView, TimeBlock::EveningActivity),
    (PlaceCategory::Accommodation, TimeBlock::EveningActivity),
];

/// Block for labels no category claims.
const DEFAULT_BLOCK: TimeBlock = TimeBlock::AfternoonActivity;

/// Stage 2 output: the populated day-and-block grid.
///
/// Every day from 1 to `trip_days` is present, including days that ended up
/// with nothing scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlockPlan {
    pub thread_id: ThreadId,
    pub trip_days: u32,
    pub time_blocks: BTreeMap<u32, DaySchedule>,
}

impl TimeBlockPlan {
    /// Schedule for one day, when that day exists in the plan.
    pub fn day(&self, day_number: u32) -> Option<&DaySchedule> {
        self.time_blocks.get(&day_number)
    }

    /// Committed (confirmed + user-selected) entries across the whole plan.
    pub fn committed_count(&self) -> usize {
        self.time_blocks.values().map(DaySchedule::committed_count).sum()
    }
}

/// Block a category label is affine to; [`DEFAULT_BLOCK`] when no category
/// claims the label.
fn affine_block(category_label: &str) -> TimeBlock {
    BLOCK_AFFINITY
        .iter()
        .find(|(category, _)| category.matches_label(category_label))
        .map(|(_, block)| *block)
        .unwrap_or(DEFAULT_BLOCK)
}

/// Categories the filler pass draws from for each block.
///
/// Broader than [`BLOCK_AFFINITY`]: both meal blocks draw restaurants, and
/// evenings draw cafes alongside night views, so no block is structurally
/// unfillable.
fn fill_categories(block: TimeBlock) -> &'static [PlaceCategory] {
    match block {
        TimeBlock::Breakfast => &[PlaceCategory::Cafe],
        TimeBlock::MorningActivity => &[
            PlaceCategory::Attraction,
            PlaceCategory::Culture,
            PlaceCategory::Nature,
        ],
        TimeBlock::Lunch => &[PlaceCategory::Restaurant],
        TimeBlock::AfternoonActivity => &[
            PlaceCategory::Attraction,
            PlaceCategory::Activity,
            PlaceCategory::Shopping,
            PlaceCategory::ThemePark,
        ],
        TimeBlock::Dinner => &[PlaceCategory::Restaurant],
        TimeBlock::EveningActivity => &[PlaceCategory::NightView, PlaceCategory::Cafe],
    }
}

/// Run Stage 2: distribute fixed events, user selections, and filler
/// candidates over the day-and-block grid.
pub fn distribute_blocks(
    thread_id: &ThreadId,
    start_date: NaiveDate,
    trip_days: u32,
    confirmed: &[ConfirmedSchedule],
    user_selections: &[Place],
    candidates: &CandidateSelection,
    config: &SynthesisConfig,
) -> TimeBlockPlan {
    let days = trip_days.max(1);
    let mut time_blocks: BTreeMap<u32, DaySchedule> = BTreeMap::new();
    for day in 1..=days {
        time_blocks.insert(day, DaySchedule::new(day));
    }

    place_confirmed(&mut time_blocks, start_date, days, confirmed);
    place_user_selections(&mut time_blocks, days, user_selections, config);
    place_ai_candidates(&mut time_blocks, days, user_selections, candidates, config);

    debug!(
        "Distributed {} confirmed, {} selected over {} days for thread {}",
        confirmed.len(),
        user_selections.len(),
        days,
        thread_id
    );

    TimeBlockPlan {
        thread_id: thread_id.clone(),
        trip_days: days,
        time_blocks,
    }
}

/// Pass 1: insert every confirmed entry unconditionally.
///
/// The day index comes from the entry's calendar date relative to the trip
/// start, clamped into the trip window; the block comes from its clock hour.
fn place_confirmed(
    time_blocks: &mut BTreeMap<u32, DaySchedule>,
    start_date: NaiveDate,
    days: u32,
    confirmed: &[ConfirmedSchedule],
) {
    for entry in confirmed {
        let offset = (entry.start_time.date_naive() - start_date).num_days();
        let day = (offset + 1).clamp(1, i64::from(days)) as u32;
        let block = TimeBlock::from_hour(entry.start_time.hour());
        time_blocks
            .entry(day)
            .or_insert_with(|| DaySchedule::new(day))
            .block_mut(block)
            .confirmed
            .push(entry.clone());
    }
}

/// Pass 2: distribute user selections round-robin across days.
///
/// The day advances every `selections_per_day` placements, capped at the
/// last trip day. Within a day the selection goes to its affine block, or
/// to the first non-full block when the affine one is at capacity; when
/// every block is full it stays in the affine block anyway — user
/// selections are never dropped.
fn place_user_selections(
    time_blocks: &mut BTreeMap<u32, DaySchedule>,
    days: u32,
    user_selections: &[Place],
    config: &SynthesisConfig,
) {
    for (index, place) in user_selections.iter().enumerate() {
        let day = ((index / config.selections_per_day) as u32 + 1).min(days);
        let schedule = time_blocks
            .entry(day)
            .or_insert_with(|| DaySchedule::new(day));

        let affine = affine_block(&place.category);
        let at_capacity = |block: TimeBlock| {
            schedule
                .blocks
                .get(&block)
                .map(|slot| slot.committed_count() >= config.max_places_per_block)
                .unwrap_or(false)
        };
        let target = if !at_capacity(affine) {
            affine
        } else {
            TimeBlock::ALL
                .iter()
                .copied()
                .find(|block| !at_capacity(*block))
                .unwrap_or(affine)
        };
        schedule.block_mut(target).user_selected.push(place.clone());
    }
}

/// Pass 3: append filler candidates to blocks still under the committed cap.
///
/// Candidates come from the block's affine categories, are scored against
/// the day's own user selections, and the best few are appended. A place is
/// proposed at most once across the whole plan, and never when the user
/// already selected it.
fn place_ai_candidates(
    time_blocks: &mut BTreeMap<u32, DaySchedule>,
    days: u32,
    user_selections: &[Place],
    candidates: &CandidateSelection,
    config: &SynthesisConfig,
) {
    let pool = candidates.places_by_category();
    let mut proposed: HashSet<_> = user_selections
        .iter()
        .map(|place| place.id.clone())
        .collect();

    for day in 1..=days {
        let references: Vec<Place> = time_blocks
            .get(&day)
            .map(|schedule| {
                schedule
                    .blocks
                    .values()
                    .flat_map(|slot| slot.user_selected.iter().cloned())
                    .collect()
            })
            .unwrap_or_default();

        for block in TimeBlock::ALL {
            let committed = time_blocks
                .get(&day)
                .and_then(|schedule| schedule.blocks.get(&block))
                .map(|slot| slot.committed_count())
                .unwrap_or(0);
            if committed >= config.max_places_per_block {
                continue;
            }

            let mut scored: Vec<(f64, &Place)> = Vec::new();
            for category in fill_categories(block) {
                let places = match pool.get(category.as_str()) {
                    Some(places) => places,
                    None => continue,
                };
                for place in places {
                    if proposed.contains(&place.id) {
                        continue;
                    }
                    scored.push((comprehensive_score(place, &references), place));
                }
            }
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

            let picked: Vec<Place> = scored
                .into_iter()
                .take(config.ai_candidates_per_block)
                .map(|(_, place)| place.clone())
                .collect();
            for place in &picked {
                proposed.insert(place.id.clone());
            }
            if let Some(schedule) = time_blocks.get_mut(&day) {
                schedule.block_mut(block).ai_candidates.extend(picked);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlaceId;
    use crate::models::schedule::DocumentKind;
    use chrono::{TimeZone, Utc};

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn thread() -> ThreadId {
        ThreadId::new("thread-1")
    }

    fn categorized(id: &str, category: &str) -> Place {
        Place::new(PlaceId::new(id), id, category)
    }

    fn flight(day_offset: i64, hour: u32) -> ConfirmedSchedule {
        let start = Utc
            .with_ymd_and_hms(2025, 4, (10 + day_offset) as u32, hour, 0, 0)
            .unwrap();
        ConfirmedSchedule::new("ICN arrival", None, start, None, DocumentKind::Flight).unwrap()
    }

    fn empty_candidates() -> CandidateSelection {
        CandidateSelection {
            destinations: vec!["seoul".to_string()],
            region_candidates: BTreeMap::new(),
            total_candidates: 0,
        }
    }

    fn candidates_with(category: PlaceCategory, places: Vec<Place>) -> CandidateSelection {
        let mut by_category = BTreeMap::new();
        let total = places.len();
        by_category.insert(category.as_str().to_string(), places);
        let mut region_candidates = BTreeMap::new();
        region_candidates.insert("seoul".to_string(), by_category);
        CandidateSelection {
            destinations: vec!["seoul".to_string()],
            region_candidates,
            total_candidates: total,
        }
    }

    #[test]
    fn test_affine_block_table() {
        assert_eq!(affine_block("restaurant"), TimeBlock::Lunch);
        assert_eq!(affine_block("tourist attraction"), TimeBlock::MorningActivity);
        assert_eq!(affine_block("cafe"), TimeBlock::Breakfast);
        assert_eq!(affine_block("night view"), TimeBlock::EveningActivity);
        assert_eq!(affine_block("spa"), DEFAULT_BLOCK);
    }

    #[test]
    fn test_theme_park_is_not_nature() {
        // "theme park" also contains the nature keyword "park"; the table
        // order must send it to the afternoon, not the morning.
        assert_eq!(affine_block("theme park"), TimeBlock::AfternoonActivity);
        assert_eq!(affine_block("national park"), TimeBlock::MorningActivity);
    }

    #[test]
    fn test_fill_table_per_block() {
        assert_eq!(
            fill_categories(TimeBlock::Breakfast),
            &[PlaceCategory::Cafe]
        );
        assert_eq!(
            fill_categories(TimeBlock::MorningActivity),
            &[
                PlaceCategory::Attraction,
                PlaceCategory::Culture,
                PlaceCategory::Nature,
            ]
        );
        assert_eq!(
            fill_categories(TimeBlock::Lunch),
            &[PlaceCategory::Restaurant]
        );
        assert_eq!(
            fill_categories(TimeBlock::AfternoonActivity),
            &[
                PlaceCategory::Attraction,
                PlaceCategory::Activity,
                PlaceCategory::Shopping,
                PlaceCategory::ThemePark,
            ]
        );
        assert_eq!(
            fill_categories(TimeBlock::Dinner),
            &[PlaceCategory::Restaurant]
        );
        assert_eq!(
            fill_categories(TimeBlock::EveningActivity),
            &[PlaceCategory::NightView, PlaceCategory::Cafe]
        );

        // No block is structurally unfillable.
        for block in TimeBlock::ALL {
            assert!(!fill_categories(block).is_empty());
        }
    }

    #[test]
    fn test_every_day_present_even_when_empty() {
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            3,
            &[],
            &[],
            &empty_candidates(),
            &SynthesisConfig::default(),
        );
        assert_eq!(plan.trip_days, 3);
        assert_eq!(plan.time_blocks.len(), 3);
        for day in 1..=3 {
            assert!(plan.day(day).is_some());
        }
        assert_eq!(plan.committed_count(), 0);
    }

    #[test]
    fn test_fixed_event_lands_by_hour_and_day() {
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            3,
            &[flight(0, 8), flight(1, 19)],
            &[],
            &empty_candidates(),
            &SynthesisConfig::default(),
        );

        let day1 = plan.day(1).unwrap();
        assert_eq!(day1.blocks[&TimeBlock::Breakfast].confirmed.len(), 1);

        let day2 = plan.day(2).unwrap();
        assert_eq!(day2.blocks[&TimeBlock::Dinner].confirmed.len(), 1);
    }

    #[test]
    fn test_fixed_event_outside_window_is_clamped() {
        // One event the day before the trip, one well past its end.
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            2,
            &[flight(-1, 10), flight(9, 10)],
            &[],
            &empty_candidates(),
            &SynthesisConfig::default(),
        );

        assert_eq!(
            plan.day(1).unwrap().blocks[&TimeBlock::MorningActivity]
                .confirmed
                .len(),
            1
        );
        assert_eq!(
            plan.day(2).unwrap().blocks[&TimeBlock::MorningActivity]
                .confirmed
                .len(),
            1
        );
    }

    #[test]
    fn test_user_selections_round_robin_across_days() {
        let selections: Vec<Place> = (0..8)
            .map(|i| categorized(&format!("p{}", i), "attraction"))
            .collect();
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            3,
            &[],
            &selections,
            &empty_candidates(),
            &SynthesisConfig::default(),
        );

        assert_eq!(plan.day(1).unwrap().committed_count(), 6);
        assert_eq!(plan.day(2).unwrap().committed_count(), 2);
        assert_eq!(plan.day(3).unwrap().committed_count(), 0);
    }

    #[test]
    fn test_affinity_overflow_goes_to_first_open_block() {
        let selections = vec![
            categorized("r1", "restaurant"),
            categorized("r2", "restaurant"),
            categorized("r3", "restaurant"),
        ];
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[],
            &selections,
            &empty_candidates(),
            &SynthesisConfig::default(),
        );

        let day = plan.day(1).unwrap();
        assert_eq!(day.blocks[&TimeBlock::Lunch].user_selected.len(), 2);
        // Lunch is full, so the third lands in the first open block.
        assert_eq!(day.blocks[&TimeBlock::Breakfast].user_selected.len(), 1);
    }

    #[test]
    fn test_user_selections_are_never_dropped() {
        // Thirteen selections on a one-day trip: twelve fill every block to
        // the cap and the last one still lands somewhere.
        let selections: Vec<Place> = (0..13)
            .map(|i| categorized(&format!("p{}", i), "restaurant"))
            .collect();
        let config = SynthesisConfig {
            selections_per_day: 20,
            ..SynthesisConfig::default()
        };
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[],
            &selections,
            &empty_candidates(),
            &config,
        );

        assert_eq!(plan.committed_count(), 13);
        let day = plan.day(1).unwrap();
        assert_eq!(day.blocks[&TimeBlock::Lunch].user_selected.len(), 3);
    }

    #[test]
    fn test_unknown_category_uses_default_block() {
        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[],
            &[categorized("x1", "mystery venue")],
            &empty_candidates(),
            &SynthesisConfig::default(),
        );

        let day = plan.day(1).unwrap();
        assert_eq!(day.blocks[&DEFAULT_BLOCK].user_selected.len(), 1);
    }

    #[test]
    fn test_ai_fill_respects_open_capacity_and_dedup() {
        let mut filler: Vec<Place> = (0..8)
            .map(|i| {
                let mut place = categorized(&format!("f{}", i), "restaurant");
                place.rating = Some(4.0);
                place.review_count = Some(100 + i);
                place
            })
            .collect();
        // The user already chose f0; it must never be re-proposed.
        let selected = filler.remove(0);
        let candidates = candidates_with(PlaceCategory::Restaurant, {
            let mut all = filler.clone();
            all.insert(0, selected.clone());
            all
        });

        let plan = distribute_blocks(
            &thread(),
            start_date(),
            2,
            &[],
            &[selected.clone()],
            &candidates,
            &SynthesisConfig::default(),
        );

        let mut seen = HashSet::new();
        for day in 1..=2 {
            for slot in plan.day(day).unwrap().blocks.values() {
                for place in &slot.ai_candidates {
                    assert_ne!(place.id, selected.id, "selected place re-proposed");
                    assert!(seen.insert(place.id.clone()), "place proposed twice");
                }
            }
        }
        assert!(!seen.is_empty());
    }

    #[test]
    fn test_ai_fill_skips_full_blocks() {
        let selections = vec![
            categorized("r1", "restaurant"),
            categorized("r2", "restaurant"),
        ];
        let filler: Vec<Place> = (0..4)
            .map(|i| categorized(&format!("f{}", i), "restaurant"))
            .collect();
        let candidates = candidates_with(PlaceCategory::Restaurant, filler);

        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[],
            &selections,
            &candidates,
            &SynthesisConfig::default(),
        );

        let day = plan.day(1).unwrap();
        // Lunch is at the committed cap: no filler goes there.
        assert!(day.blocks[&TimeBlock::Lunch].ai_candidates.is_empty());
        // Dinner is open and also draws restaurants.
        assert!(!day.blocks[&TimeBlock::Dinner].ai_candidates.is_empty());
    }

    #[test]
    fn test_ai_fill_caps_per_block() {
        let filler: Vec<Place> = (0..12)
            .map(|i| categorized(&format!("f{}", i), "restaurant"))
            .collect();
        let candidates = candidates_with(PlaceCategory::Restaurant, filler);

        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[],
            &[],
            &candidates,
            &SynthesisConfig::default(),
        );

        let day = plan.day(1).unwrap();
        assert_eq!(day.blocks[&TimeBlock::Lunch].ai_candidates.len(), 5);
        assert_eq!(day.blocks[&TimeBlock::Dinner].ai_candidates.len(), 5);
    }

    #[test]
    fn test_fixed_event_survives_ai_fill() {
        let filler: Vec<Place> = (0..6)
            .map(|i| {
                let mut place = categorized(&format!("c{}", i), "cafe");
                place.review_count = Some(50);
                place
            })
            .collect();
        let candidates = candidates_with(PlaceCategory::Cafe, filler);
        let selections = vec![
            categorized("s1", "attraction"),
            categorized("s2", "restaurant"),
            categorized("s3", "cafe"),
        ];

        let plan = distribute_blocks(
            &thread(),
            start_date(),
            1,
            &[flight(0, 8)],
            &selections,
            &candidates,
            &SynthesisConfig::default(),
        );

        let breakfast = &plan.day(1).unwrap().blocks[&TimeBlock::Breakfast];
        assert_eq!(breakfast.confirmed.len(), 1);
        assert_eq!(breakfast.confirmed[0].title, "ICN arrival");
    }
}
