//! Intra-day route ordering.
//!
//! Routes are built cluster-first: places are grouped geographically, the
//! clusters are chained by centroid proximity, and the concatenated order is
//! refined with 2-opt. The refinement never regresses: a reversal is kept
//! only when it strictly shortens the route.

use crate::algorithms::clustering::{cluster_places, order_clusters_by_proximity};
use crate::algorithms::scoring::distance_between;
use crate::models::itinerary::{OptimizedRoute, RouteLeg};
use crate::models::place::{Place, PlaceCategory};

/// Upper bound on full 2-opt sweeps over one route.
const MAX_PASSES: usize = 100;

/// Which route endpoints stay pinned during 2-opt.
///
/// The first position is always preserved: it is the day's departure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAnchor {
    /// Only the first place keeps its position.
    FixedStart,
    /// Both the first and the last place keep their positions.
    FixedStartEnd,
}

/// Total great-circle length of the route described by `order`, in
/// kilometers. Pairs where either place lacks coordinates contribute zero.
pub fn order_cost(places: &[Place], order: &[usize]) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }
    order
        .windows(2)
        .map(|pair| distance_between(&places[pair[0]], &places[pair[1]]))
        .sum()
}

/// 2-opt refinement starting from input order.
pub fn optimize_order(places: &[Place], anchor: RouteAnchor) -> Vec<usize> {
    let mut order: Vec<usize> = (0..places.len()).collect();
    improve_order(places, &mut order, anchor);
    order
}

/// Refine an existing visiting order in place with 2-opt.
///
/// Each sweep tries every segment reversal within the movable range and
/// keeps a reversal only when the total route length strictly decreases.
/// Sweeps repeat until a full pass finds no improvement or [`MAX_PASSES`]
/// is reached. Routes of two or fewer places are returned untouched.
pub fn improve_order(places: &[Place], order: &mut [usize], anchor: RouteAnchor) {
    let len = order.len();
    if len <= 2 {
        return;
    }
    let last_movable = match anchor {
        RouteAnchor::FixedStart => len - 1,
        RouteAnchor::FixedStartEnd => len - 2,
    };
    let mut best_cost = order_cost(places, order);
    for _ in 0..MAX_PASSES {
        let mut improved = false;
        for i in 1..last_movable {
            for j in (i + 1)..=last_movable {
                order[i..=j].reverse();
                let cost = order_cost(places, order);
                if cost < best_cost {
                    best_cost = cost;
                    improved = true;
                } else {
                    order[i..=j].reverse();
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// Build the optimized route for one day.
///
/// A lodging entry, when present, is moved to the front so the day departs
/// from it. Located places are clustered with k = ceil(n / places_per_cluster),
/// the clusters are chained by centroid proximity, and the resulting order is
/// refined with 2-opt. Places without coordinates are appended at the end;
/// legs touching them have zero length.
pub fn build_route(
    day_number: u32,
    mut places: Vec<Place>,
    places_per_cluster: usize,
    average_speed_kmh: f64,
) -> OptimizedRoute {
    if let Some(position) = places
        .iter()
        .position(|place| PlaceCategory::Accommodation.matches_label(&place.category))
    {
        if position > 0 {
            let lodging = places.remove(position);
            places.insert(0, lodging);
        }
    }

    let per_cluster = places_per_cluster.max(1);
    let k = places.len().div_ceil(per_cluster);
    let assignment = cluster_places(&places, k);

    let mut order: Vec<usize> = Vec::with_capacity(places.len());
    for position in order_clusters_by_proximity(&assignment, 0) {
        order.extend(assignment.clusters[position].members.iter().copied());
    }
    improve_order(&places, &mut order, RouteAnchor::FixedStart);
    order.extend(assignment.unlocated.iter().copied());

    let ordered: Vec<Place> = order.iter().map(|&index| places[index].clone()).collect();

    let mut legs = Vec::new();
    let mut total_km = 0.0;
    let mut total_minutes = 0.0;
    for pair in ordered.windows(2) {
        let km = distance_between(&pair[0], &pair[1]);
        let minutes = if average_speed_kmh > 0.0 {
            km / average_speed_kmh * 60.0
        } else {
            0.0
        };
        total_km += km;
        total_minutes += minutes;
        legs.push(RouteLeg {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            distance: qtty::Kilometers::new(km),
            duration: qtty::Minutes::new(minutes),
        });
    }

    OptimizedRoute {
        day_number,
        places: ordered,
        legs,
        total_distance: qtty::Kilometers::new(total_km),
        total_duration: qtty::Minutes::new(total_minutes),
    }
}
