//! Geometric and scoring primitives shared by the synthesis stages.
//!
//! Everything in this module is a pure function (or a deterministic
//! procedure) over in-memory data: no I/O, no clocks, no randomness.

pub mod clustering;
pub mod routing;
pub mod scoring;

pub use clustering::{cluster_places, order_clusters_by_proximity, Cluster, ClusterAssignment};
pub use routing::{build_route, improve_order, optimize_order, order_cost, RouteAnchor};
pub use scoring::{
    average_distance_km, base_score, comprehensive_score, distance_between, distance_score,
    diversity_score, haversine_km, min_distance_km, total_route_distance_km,
};
