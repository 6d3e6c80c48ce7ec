//! Geographic clustering of places with Lloyd's k-means.
//!
//! Distances between points and centroids are great-circle kilometers;
//! centroids are updated as arithmetic means of member coordinates, which is
//! accurate at city scale. Places without coordinates never enter a cluster
//! and are reported separately so callers can still schedule them.

use crate::algorithms::scoring::haversine_km;
use crate::api::GeoPoint;
use crate::models::place::Place;

/// Upper bound on Lloyd iterations. Small inputs converge in a handful.
const MAX_ITERATIONS: usize = 50;

/// One geographic cluster. `members` holds indices into the place slice the
/// assignment was computed from.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: usize,
    pub centroid: GeoPoint,
    pub members: Vec<usize>,
}

/// Output of [`cluster_places`]: the non-empty clusters plus the indices of
/// places that had no coordinates.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignment {
    pub clusters: Vec<Cluster>,
    pub unlocated: Vec<usize>,
}

impl ClusterAssignment {
    /// Cluster position (index into `clusters`) containing `place_index`,
    /// if that place was clustered.
    pub fn cluster_of(&self, place_index: usize) -> Option<usize> {
        self.clusters
            .iter()
            .position(|cluster| cluster.members.contains(&place_index))
    }
}

/// Partition `places` into at most `k` geographic clusters.
///
/// Seeds are the first `k` distinct coordinates in input order, so the
/// result is deterministic for a given input sequence. `k` is reduced to the
/// number of distinct coordinates when the input has fewer; a `k` of zero is
/// treated as one whenever any place has coordinates.
pub fn cluster_places(places: &[Place], k: usize) -> ClusterAssignment {
    let mut located: Vec<usize> = Vec::new();
    let mut unlocated: Vec<usize> = Vec::new();
    for (index, place) in places.iter().enumerate() {
        match place.location {
            Some(_) => located.push(index),
            None => unlocated.push(index),
        }
    }
    if located.is_empty() {
        return ClusterAssignment {
            clusters: Vec::new(),
            unlocated,
        };
    }

    let mut centroids: Vec<GeoPoint> = Vec::new();
    let mut seen: Vec<(f64, f64)> = Vec::new();
    let target = k.max(1);
    for &index in &located {
        if centroids.len() >= target {
            break;
        }
        let point = places[index].location.unwrap();
        let coordinate = (point.latitude, point.longitude);
        if seen.contains(&coordinate) {
            continue;
        }
        seen.push(coordinate);
        centroids.push(point);
    }

    let mut assignments: Vec<usize> = vec![0; located.len()];
    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (slot, &index) in located.iter().enumerate() {
            let point = places[index].location.unwrap();
            let nearest = nearest_centroid(&centroids, point);
            if assignments[slot] != nearest {
                assignments[slot] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        for (centroid_index, centroid) in centroids.iter_mut().enumerate() {
            let mut lat_sum = 0.0;
            let mut lon_sum = 0.0;
            let mut count = 0usize;
            for (slot, &index) in located.iter().enumerate() {
                if assignments[slot] == centroid_index {
                    let point = places[index].location.unwrap();
                    lat_sum += point.latitude;
                    lon_sum += point.longitude;
                    count += 1;
                }
            }
            // A centroid that lost every member keeps its position.
            if count > 0 {
                *centroid = GeoPoint {
                    latitude: lat_sum / count as f64,
                    longitude: lon_sum / count as f64,
                };
            }
        }
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for (centroid_index, centroid) in centroids.into_iter().enumerate() {
        let members: Vec<usize> = located
            .iter()
            .enumerate()
            .filter(|(slot, _)| assignments[*slot] == centroid_index)
            .map(|(_, &index)| index)
            .collect();
        if members.is_empty() {
            continue;
        }
        clusters.push(Cluster {
            id: clusters.len(),
            centroid,
            members,
        });
    }

    ClusterAssignment {
        clusters,
        unlocated,
    }
}

fn nearest_centroid(centroids: &[GeoPoint], point: GeoPoint) -> usize {
    let mut best = 0usize;
    let mut best_km = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let km = haversine_km(
            point.latitude,
            point.longitude,
            centroid.latitude,
            centroid.longitude,
        );
        if km < best_km {
            best_km = km;
            best = index;
        }
    }
    best
}

/// Visit order over the clusters of `assignment`, as positions into its
/// `clusters` vector. Starts at the cluster containing `start_place_index`
/// (the first cluster when that place is unclustered) and greedily chains to
/// the nearest unvisited centroid.
pub fn order_clusters_by_proximity(
    assignment: &ClusterAssignment,
    start_place_index: usize,
) -> Vec<usize> {
    let count = assignment.clusters.len();
    if count == 0 {
        return Vec::new();
    }
    let mut current = assignment.cluster_of(start_place_index).unwrap_or(0);
    let mut visited = vec![false; count];
    let mut order = Vec::with_capacity(count);
    visited[current] = true;
    order.push(current);

    while order.len() < count {
        let from = assignment.clusters[current].centroid;
        let mut next = None;
        let mut next_km = f64::INFINITY;
        for (position, cluster) in assignment.clusters.iter().enumerate() {
            if visited[position] {
                continue;
            }
            let km = haversine_km(
                from.latitude,
                from.longitude,
                cluster.centroid.latitude,
                cluster.centroid.longitude,
            );
            if km < next_km {
                next_km = km;
                next = Some(position);
            }
        }
        match next {
            Some(position) => {
                visited[position] = true;
                order.push(position);
                current = position;
            }
            None => break,
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PlaceId;

    fn place_at(id: &str, latitude: f64, longitude: f64) -> Place {
        let mut place = Place::new(PlaceId::new(id), id, "attraction");
        place.location = Some(GeoPoint {
            latitude,
            longitude,
        });
        place
    }

    fn unlocated(id: &str) -> Place {
        Place::new(PlaceId::new(id), id, "attraction")
    }

    #[test]
    fn test_empty_input_produces_empty_assignment() {
        let assignment = cluster_places(&[], 3);
        assert!(assignment.clusters.is_empty());
        assert!(assignment.unlocated.is_empty());
    }

    #[test]
    fn test_two_separated_groups() {
        // Two tight groups ~111 km apart.
        let places = vec![
            place_at("a1", 37.00, 127.00),
            place_at("a2", 37.01, 127.01),
            place_at("b1", 38.00, 127.00),
            place_at("b2", 38.01, 127.01),
            place_at("a3", 37.02, 127.00),
        ];
        let assignment = cluster_places(&places, 2);
        assert_eq!(assignment.clusters.len(), 2);

        let group_of = |index: usize| assignment.cluster_of(index).unwrap();
        assert_eq!(group_of(0), group_of(1));
        assert_eq!(group_of(0), group_of(4));
        assert_eq!(group_of(2), group_of(3));
        assert_ne!(group_of(0), group_of(2));
    }

    #[test]
    fn test_k_larger_than_distinct_points() {
        let places = vec![
            place_at("a", 37.0, 127.0),
            place_at("b", 37.5, 127.5),
            place_at("b-twin", 37.5, 127.5),
        ];
        let assignment = cluster_places(&places, 10);
        assert_eq!(assignment.clusters.len(), 2);
        let total_members: usize = assignment
            .clusters
            .iter()
            .map(|cluster| cluster.members.len())
            .sum();
        assert_eq!(total_members, 3);
    }

    #[test]
    fn test_identical_coordinates_collapse_to_one_cluster() {
        let places = vec![
            place_at("a", 37.0, 127.0),
            place_at("b", 37.0, 127.0),
            place_at("c", 37.0, 127.0),
        ];
        let assignment = cluster_places(&places, 3);
        assert_eq!(assignment.clusters.len(), 1);
        assert_eq!(assignment.clusters[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_unlocated_places_are_excluded() {
        let places = vec![
            place_at("a", 37.0, 127.0),
            unlocated("no-coords"),
            place_at("b", 37.1, 127.0),
        ];
        let assignment = cluster_places(&places, 2);
        assert_eq!(assignment.unlocated, vec![1]);
        for cluster in &assignment.clusters {
            assert!(!cluster.members.contains(&1));
        }
    }

    #[test]
    fn test_all_unlocated() {
        let places = vec![unlocated("a"), unlocated("b")];
        let assignment = cluster_places(&places, 2);
        assert!(assignment.clusters.is_empty());
        assert_eq!(assignment.unlocated, vec![0, 1]);
    }

    #[test]
    fn test_zero_k_clamps_to_one() {
        let places = vec![place_at("a", 37.0, 127.0), place_at("b", 37.1, 127.0)];
        let assignment = cluster_places(&places, 0);
        assert_eq!(assignment.clusters.len(), 1);
        assert_eq!(assignment.clusters[0].members.len(), 2);
    }

    #[test]
    fn test_proximity_order_chains_nearest() {
        // Three groups on a line: west, middle, east. Starting from the
        // west group the chain must visit middle before east.
        let places = vec![
            place_at("west", 37.0, 126.0),
            place_at("middle", 37.0, 127.0),
            place_at("east", 37.0, 128.0),
        ];
        let assignment = cluster_places(&places, 3);
        assert_eq!(assignment.clusters.len(), 3);

        let start_cluster = assignment.cluster_of(0).unwrap();
        let order = order_clusters_by_proximity(&assignment, 0);
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], start_cluster);
        assert_eq!(order[1], assignment.cluster_of(1).unwrap());
        assert_eq!(order[2], assignment.cluster_of(2).unwrap());
    }

    #[test]
    fn test_proximity_order_with_unclustered_start() {
        let places = vec![unlocated("x"), place_at("a", 37.0, 127.0)];
        let assignment = cluster_places(&places, 1);
        let order = order_clusters_by_proximity(&assignment, 0);
        assert_eq!(order, vec![0]);
    }
}
