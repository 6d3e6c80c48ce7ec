//! Service layer orchestrating the synthesis stages.
//!
//! This module sits between the pool collaborators and the stage functions.
//! It validates requests, fetches confirmed schedules, and chains Stage 1
//! through Stage 3 for the common full-pipeline case.

pub mod synthesis;

pub use synthesis::{
    distribute_time_blocks, optimize_itinerary, select_candidates, synthesize,
};
