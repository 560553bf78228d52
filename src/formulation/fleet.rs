//! Fleet structure classification.
//!
//! Two heuristic readings of the fleet geometry drive the choice of a
//! construction strategy:
//!
//! - *uniform*: every vehicle sees the same distances to and from a probe
//!   stop, so vehicles are interchangeable;
//! - *loop route*: every vehicle drives between distinct anchors and the
//!   probe is not co-located with both of them.
//!
//! A wrong reading only costs search quality, never model correctness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::ProblemData;

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetStructure {
    pub loop_route: bool,
    pub uniform: bool,
}

/// Anchor-to-probe distances of one vehicle, each the larger of travel time
/// and distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeDistances {
    pub start_probe: i64,
    pub probe_end: i64,
    pub start_end: i64,
}

/// Generator seed derived from the instance shape.
pub fn probe_seed(stops: usize, vehicles: usize, matrix_size: usize) -> u64 {
    ((stops as u64) << 32) ^ ((vehicles as u64) << 16) ^ matrix_size as u64
}

/// Matrix location of the probe stop.
///
/// The stop is drawn from a generator seeded with [`probe_seed`], so the
/// same instance always yields the same probe. Without stops, vehicle 0's
/// start location is used.
pub fn probe_location(data: &ProblemData) -> Option<usize> {
    let first = data.vehicles().first()?;
    if data.nodes().is_empty() {
        return Some(first.start_location());
    }

    let seed = probe_seed(data.num_stops(), data.vehicles().len(), data.matrix_size());
    let mut rng = StdRng::seed_from_u64(seed);
    let stop = rng.random_range(0..data.num_stops());
    Some(data.nodes()[stop].matrix_index())
}

/// Folds per-vehicle probe distances into a [`FleetStructure`].
///
/// An empty fleet is both uniform and loop-shaped.
pub fn fold_distances(distances: impl IntoIterator<Item = ProbeDistances>) -> FleetStructure {
    let init = (
        FleetStructure {
            loop_route: true,
            uniform: true,
        },
        None::<(i64, i64)>,
    );
    let (structure, _) = distances.into_iter().fold(init, |(acc, first), d| {
        let pair = (d.start_probe, d.probe_end);
        let uniform = acc.uniform && first.is_none_or(|f| f == pair);
        let loop_route = acc.loop_route && d.start_end != 0 && !(d.start_probe == 0 && d.probe_end == 0);
        (FleetStructure { loop_route, uniform }, first.or(Some(pair)))
    });
    structure
}

/// Classifies the fleet of `data` around its probe stop.
pub fn classify(data: &ProblemData) -> FleetStructure {
    let Some(probe) = probe_location(data) else {
        return fold_distances([]);
    };
    let far = |v: usize, from: usize, to: usize| data.travel_time(v, from, to).max(data.travel_distance(v, from, to));
    fold_distances(data.vehicles().iter().enumerate().map(|(v, vehicle)| ProbeDistances {
        start_probe: far(v, vehicle.start_location(), probe),
        probe_end: far(v, probe, vehicle.end_location()),
        start_end: far(v, vehicle.start_location(), vehicle.end_location()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::models::{Node, Vehicle};
    use proptest::prelude::*;

    // locations 0 and 1 are depots, 2 and 3 stops
    fn matrix() -> TravelMatrix {
        TravelMatrix::from_rows(vec![
            vec![0, 8, 5, 5],
            vec![8, 0, 7, 7],
            vec![5, 7, 0, 2],
            vec![5, 7, 2, 0],
        ])
        .expect("square")
    }

    fn data(vehicles: Vec<Vehicle>) -> ProblemData {
        ProblemData::new(
            vec![Node::new("a", 2), Node::new("b", 3)],
            vehicles,
            Vec::new(),
            vec![TravelMatrices::uniform(matrix())],
            100,
        )
    }

    #[test]
    fn test_probe_is_reproducible() {
        let d = data(vec![Vehicle::new("v", 0, 1)]);
        let probe = probe_location(&d);
        assert!(matches!(probe, Some(2) | Some(3)));
        assert_eq!(probe_location(&d), probe);
    }

    #[test]
    fn test_probe_seed_packs_counts() {
        assert_eq!(probe_seed(0, 0, 0), 0);
        assert_eq!(probe_seed(2, 1, 4), (2 << 32) | (1 << 16) | 4);
        assert_ne!(probe_seed(2, 1, 4), probe_seed(1, 2, 4));
    }

    #[test]
    fn test_identical_vehicles_are_uniform() {
        let d = data(vec![Vehicle::new("v0", 0, 1), Vehicle::new("v1", 0, 1)]);
        assert_eq!(
            classify(&d),
            FleetStructure {
                loop_route: true,
                uniform: true
            }
        );
    }

    #[test]
    fn test_perturbed_start_breaks_uniformity() {
        let d = data(vec![Vehicle::new("v0", 0, 1), Vehicle::new("v1", 1, 1)]);
        let structure = classify(&d);
        assert!(!structure.uniform);
        // v1 starts and ends at the same depot
        assert!(!structure.loop_route);
    }

    #[test]
    fn test_degenerate_probe_is_not_a_loop() {
        let structure = fold_distances([ProbeDistances {
            start_probe: 0,
            probe_end: 0,
            start_end: 4,
        }]);
        assert!(!structure.loop_route);
        assert!(structure.uniform);
    }

    #[test]
    fn test_no_stops_probes_first_start() {
        let d = ProblemData::new(
            Vec::new(),
            vec![Vehicle::new("v", 1, 0)],
            Vec::new(),
            vec![TravelMatrices::uniform(matrix())],
            100,
        );
        assert_eq!(probe_location(&d), Some(1));
    }

    fn distances() -> impl Strategy<Value = ProbeDistances> {
        (0i64..20, 0i64..20, 0i64..20).prop_map(|(start_probe, probe_end, start_end)| ProbeDistances {
            start_probe,
            probe_end,
            start_end,
        })
    }

    proptest! {
        #[test]
        fn prop_fold_matches_pointwise_definition(all in proptest::collection::vec(distances(), 0..8)) {
            let structure = fold_distances(all.clone());
            let uniform = all.windows(2).all(|w| {
                (w[0].start_probe, w[0].probe_end) == (w[1].start_probe, w[1].probe_end)
            });
            let loop_route = all
                .iter()
                .all(|d| d.start_end != 0 && !(d.start_probe == 0 && d.probe_end == 0));
            prop_assert_eq!(structure.uniform, uniform);
            prop_assert_eq!(structure.loop_route, loop_route);
        }

        #[test]
        fn prop_repeating_a_vehicle_keeps_uniformity(d in distances(), n in 1usize..6) {
            prop_assert!(fold_distances(std::iter::repeat_n(d, n)).uniform);
        }
    }
}
