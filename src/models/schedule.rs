//! Confirmed schedule entries and the day/time-block grid they occupy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::place::Place;

/// Source document type for a confirmed schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Flight,
    Hotel,
    Ticket,
    Reservation,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Flight => "flight",
            DocumentKind::Hotel => "hotel",
            DocumentKind::Ticket => "ticket",
            DocumentKind::Reservation => "reservation",
            DocumentKind::Other => "other",
        }
    }

    /// Scheduling priority. Higher values are harder commitments.
    pub fn priority(&self) -> f64 {
        match self {
            DocumentKind::Flight => 10.0,
            DocumentKind::Hotel => 8.0,
            DocumentKind::Ticket => 6.0,
            DocumentKind::Reservation => 4.0,
            DocumentKind::Other => 2.0,
        }
    }
}

/// An externally confirmed, immovable calendar entry: a flight, a hotel
/// booking, a ticketed event.
///
/// Produced by document understanding upstream; the synthesis core only
/// places these, it never edits or drops them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedSchedule {
    pub title: String,
    /// Free-text location from the source document, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Missing end times resolve to one hour after the start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub kind: DocumentKind,
    /// Always true for entries that came from a confirmed document.
    pub fixed: bool,
    pub priority: f64,
}

impl ConfirmedSchedule {
    /// Create a confirmed entry, rejecting end times before the start.
    pub fn new(
        title: impl Into<String>,
        location: Option<String>,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        kind: DocumentKind,
    ) -> Option<Self> {
        if let Some(end) = end_time {
            if end < start_time {
                return None;
            }
        }
        Some(Self {
            title: title.into(),
            location,
            start_time,
            end_time,
            kind,
            fixed: true,
            priority: kind.priority(),
        })
    }

    /// End of the entry, resolving missing end times to start + 1h.
    pub fn resolved_end(&self) -> DateTime<Utc> {
        self.end_time
            .unwrap_or_else(|| self.start_time + Duration::hours(1))
    }
}

/// The six activity blocks of a travel day, in chronological order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeBlock {
    Breakfast,
    MorningActivity,
    Lunch,
    AfternoonActivity,
    Dinner,
    EveningActivity,
}

impl TimeBlock {
    /// Every block, in chronological order.
    pub const ALL: [TimeBlock; 6] = [
        TimeBlock::Breakfast,
        TimeBlock::MorningActivity,
        TimeBlock::Lunch,
        TimeBlock::AfternoonActivity,
        TimeBlock::Dinner,
        TimeBlock::EveningActivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBlock::Breakfast => "BREAKFAST",
            TimeBlock::MorningActivity => "MORNING_ACTIVITY",
            TimeBlock::Lunch => "LUNCH",
            TimeBlock::AfternoonActivity => "AFTERNOON_ACTIVITY",
            TimeBlock::Dinner => "DINNER",
            TimeBlock::EveningActivity => "EVENING_ACTIVITY",
        }
    }

    /// Clock-hour window covered by this block (inclusive start, exclusive end).
    pub fn hour_range(&self) -> (u32, u32) {
        match self {
            TimeBlock::Breakfast => (7, 9),
            TimeBlock::MorningActivity => (9, 12),
            TimeBlock::Lunch => (12, 14),
            TimeBlock::AfternoonActivity => (14, 18),
            TimeBlock::Dinner => (18, 20),
            TimeBlock::EveningActivity => (20, 23),
        }
    }

    /// Block containing the given clock hour.
    ///
    /// Hours before the breakfast window fold into breakfast; hours past the
    /// evening window fold into the evening block, so every hour maps to a
    /// block.
    pub fn from_hour(hour: u32) -> TimeBlock {
        match hour {
            0..=8 => TimeBlock::Breakfast,
            9..=11 => TimeBlock::MorningActivity,
            12..=13 => TimeBlock::Lunch,
            14..=17 => TimeBlock::AfternoonActivity,
            18..=19 => TimeBlock::Dinner,
            _ => TimeBlock::EveningActivity,
        }
    }
}

impl std::fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Occupants of one (day, time block) slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeBlockCandidates {
    /// Fixed entries from confirmed documents. Never displaced.
    #[serde(default)]
    pub confirmed: Vec<ConfirmedSchedule>,
    /// Places the user explicitly picked. Never dropped.
    #[serde(default)]
    pub user_selected: Vec<Place>,
    /// Ranked fill proposals; the only capacity-limited group.
    #[serde(default)]
    pub ai_candidates: Vec<Place>,
}

impl TimeBlockCandidates {
    /// Committed occupancy: confirmed entries plus user selections.
    pub fn committed_count(&self) -> usize {
        self.confirmed.len() + self.user_selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.user_selected.is_empty() && self.ai_candidates.is_empty()
    }
}

/// One trip day as a block -> candidates map.
///
/// All six blocks are present from construction so the response shape is
/// stable regardless of how sparsely a day is filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    /// 1-based day number within the trip.
    pub day_number: u32,
    pub blocks: BTreeMap<TimeBlock, TimeBlockCandidates>,
}

impl DaySchedule {
    pub fn new(day_number: u32) -> Self {
        let blocks = TimeBlock::ALL
            .iter()
            .map(|&block| (block, TimeBlockCandidates::default()))
            .collect();
        Self { day_number, blocks }
    }

    pub fn block_mut(&mut self, block: TimeBlock) -> &mut TimeBlockCandidates {
        self.blocks.entry(block).or_default()
    }

    /// Total committed entries across all blocks of the day.
    pub fn committed_count(&self) -> usize {
        self.blocks.values().map(TimeBlockCandidates::committed_count).sum()
    }
}
