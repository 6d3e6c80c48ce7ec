//! # tripsmith
//!
//! Multi-day travel itinerary synthesis engine.
//!
//! This crate assembles a travel itinerary from a pool of candidate places,
//! a set of user-must-visit selections, and externally confirmed fixed
//! events (flights, hotels, ticketed events parsed upstream). It is a
//! library-style computation invoked by an external service layer: no HTTP
//! transport, no persistence, no session state.
//!
//! ## Pipeline
//!
//! - **Stage 1** ([`stages::selection`]): filter and rank the candidate
//!   pool per region and category
//! - **Stage 2** ([`stages::distribution`]): place confirmed events, user
//!   selections and filler candidates into per-day time blocks
//! - **Stage 3** ([`stages::assembly`]): cluster each day geographically,
//!   refine the visiting order with 2-opt, and fold everything into the
//!   final itinerary with aggregate statistics
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: request and response types crossing the crate boundary
//! - [`models`]: domain model (places, schedules, itineraries)
//! - [`algorithms`]: pure scoring, clustering and routing primitives
//! - [`stages`]: the three synthesis stages
//! - [`services`]: stage orchestration and the full pipeline entry point
//! - [`pool`]: collaborator traits for candidate places and confirmed
//!   schedules, plus in-memory implementations for tests
//! - [`config`]: TOML-backed tuning knobs with working defaults
//!
//! ## Example
//!
//! ```no_run
//! use tripsmith::api::{SynthesisRequest, ThreadId};
//! use tripsmith::config::SynthesisConfig;
//! use tripsmith::pool::{InMemoryCandidatePool, InMemoryScheduleSource};
//! use tripsmith::services::synthesize;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = InMemoryCandidatePool::new();
//!     let schedules = InMemoryScheduleSource::new();
//!     let request = SynthesisRequest {
//!         thread_id: ThreadId::new("t-1"),
//!         destinations: vec!["seoul".to_string()],
//!         start_date: chrono::NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
//!         trip_days: 3,
//!         style_tags: vec!["food".to_string()],
//!         user_selections: Vec::new(),
//!     };
//!
//!     let config = SynthesisConfig::default();
//!     let itinerary = synthesize(&pool, &schedules, &request, &config).await?;
//!     println!("{} places over {} days", itinerary.statistics.total_places,
//!         itinerary.daily_itineraries.len());
//!     Ok(())
//! }
//! ```

pub mod algorithms;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod services;
pub mod stages;

pub use api::{GeoPoint, PlaceId, SynthesisRequest, ThreadId};
pub use config::SynthesisConfig;
pub use error::SynthesisError;
pub use models::request::parse_request_json_str;
pub use services::synthesize;
