//! Collaborator seam for candidate places and confirmed schedules.
//!
//! The core talks to its data providers through the narrow async traits in
//! [`source`]; the in-memory implementations behind the `local-pool` feature
//! back tests and local development.

pub mod error;
#[cfg(feature = "local-pool")]
pub mod memory;
pub mod source;

pub use error::{PoolError, PoolResult};
#[cfg(feature = "local-pool")]
pub use memory::{InMemoryCandidatePool, InMemoryScheduleSource};
pub use source::{CandidatePool, ConfirmedScheduleSource};
