//! The three synthesis stages, in pipeline order.
//!
//! Each stage is callable on its own and returns its own response shape;
//! [`crate::services::synthesis`] chains them for the common case.

pub mod assembly;
pub mod distribution;
pub mod selection;

pub use assembly::{assemble_itinerary, request_checksum};
pub use distribution::{distribute_blocks, TimeBlockPlan};
pub use selection::{select_candidates, CandidateSelection};
