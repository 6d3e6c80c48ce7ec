//! Full-pipeline itinerary synthesis.
//!
//! Each stage is exposed on its own so an orchestrator can run them
//! separately (Stage 1 results go back to the user for selection before
//! Stage 2 runs); [`synthesize`] chains all three for the common case.
//!
//! The request is validated before any stage runs: input-shape violations
//! fail fast as [`SynthesisError`], while degenerate-but-valid data (empty
//! categories, sparse days) degrades inside the stages.

use log::{debug, info};

use crate::api::SynthesisRequest;
use crate::config::SynthesisConfig;
use crate::error::SynthesisError;
use crate::models::itinerary::Itinerary;
use crate::models::schedule::ConfirmedSchedule;
use crate::pool::source::{CandidatePool, ConfirmedScheduleSource};
use crate::stages::assembly::assemble_itinerary;
use crate::stages::distribution::{distribute_blocks, TimeBlockPlan};
use crate::stages::selection::{self, CandidateSelection};

/// Run Stage 1: fetch, filter and rank candidates for every destination.
///
/// Validates the request first; pool failures propagate, empty categories
/// do not.
pub async fn select_candidates(
    pool: &dyn CandidatePool,
    request: &SynthesisRequest,
    config: &SynthesisConfig,
) -> Result<CandidateSelection, SynthesisError> {
    request.validate()?;
    let selection = selection::select_candidates(
        pool,
        &request.destinations,
        &request.style_tags,
        config,
    )
    .await?;
    debug!(
        "Stage 1 complete for thread {}: {} candidates over {} regions",
        request.thread_id,
        selection.total_candidates,
        selection.region_candidates.len()
    );
    Ok(selection)
}

/// Run Stage 2: distribute confirmed events, user selections and filler
/// candidates over the day-and-block grid.
///
/// Pure once its inputs are in memory; the confirmed entries come from the
/// schedule source, already parsed and validated upstream.
pub fn distribute_time_blocks(
    request: &SynthesisRequest,
    confirmed: &[ConfirmedSchedule],
    selection: &CandidateSelection,
    config: &SynthesisConfig,
) -> TimeBlockPlan {
    distribute_blocks(
        &request.thread_id,
        request.start_date,
        request.trip_days,
        confirmed,
        &request.user_selections,
        selection,
        config,
    )
}

/// Run Stage 3: cap filler candidates, order each day's route, and fold
/// everything into the final itinerary.
pub fn optimize_itinerary(
    request: &SynthesisRequest,
    plan: &TimeBlockPlan,
    config: &SynthesisConfig,
) -> Itinerary {
    assemble_itinerary(request, plan, config)
}

/// Run the full pipeline: Stage 1 → Stage 2 → Stage 3.
///
/// Confirmed schedules for the request's thread are fetched from
/// `schedule_source`; everything else is computed from the request and the
/// candidate pool. Re-invocation with the same inputs is safe and produces
/// an equivalent itinerary.
pub async fn synthesize(
    pool: &dyn CandidatePool,
    schedule_source: &dyn ConfirmedScheduleSource,
    request: &SynthesisRequest,
    config: &SynthesisConfig,
) -> Result<Itinerary, SynthesisError> {
    request.validate()?;
    config.validate()?;

    info!(
        "Synthesizing itinerary for thread {}: {} days, {} destinations, {} selections",
        request.thread_id,
        request.trip_days,
        request.destinations.len(),
        request.user_selections.len()
    );

    let selection = select_candidates(pool, request, config).await?;
    let confirmed = schedule_source.for_thread(&request.thread_id).await?;
    debug!(
        "Fetched {} confirmed schedules for thread {}",
        confirmed.len(),
        request.thread_id
    );

    let plan = distribute_time_blocks(request, &confirmed, &selection, config);
    let itinerary = optimize_itinerary(request, &plan, config);

    info!(
        "Synthesis complete for thread {}: {} places, {:.1} km total",
        request.thread_id,
        itinerary.statistics.total_places,
        itinerary.total_distance.value()
    );
    Ok(itinerary)
}
