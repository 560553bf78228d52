//! Problem instance data.

use serde::{Deserialize, Serialize};

use super::{Break, Node, Vehicle};
use crate::distance::TravelMatrices;

/// Instance-wide maxima used to size penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScalingMaxima {
    pub max_time: i64,
    pub max_distance: i64,
    pub max_service_time: i64,
    pub max_time_cost: i64,
    pub max_distance_cost: i64,
}

/// What a model node stands for.
///
/// Stops occupy model nodes `0..n`; vehicle `v` owns start node `n + 2v`
/// and end node `n + 2v + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Stop(usize),
    Start(usize),
    End(usize),
}

/// A read-only VRPTW instance.
///
/// # Examples
///
/// ```
/// use u_vrptw::distance::{TravelMatrices, TravelMatrix};
/// use u_vrptw::models::{Node, NodeRef, ProblemData, Vehicle};
///
/// let matrix = TravelMatrix::from_rows(vec![vec![0, 4], vec![4, 0]]).unwrap();
/// let data = ProblemData::new(
///     vec![Node::new("a", 1).with_service_time(2)],
///     vec![Vehicle::new("v", 0, 0)],
///     vec![],
///     vec![TravelMatrices::uniform(matrix)],
///     1_000,
/// );
/// assert_eq!(data.num_model_nodes(), 3);
/// assert_eq!(data.node_ref(1), NodeRef::Start(0));
/// assert_eq!(data.travel_time(0, 0, 1), 4);
/// assert_eq!(data.node_service_time(0), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemData {
    nodes: Vec<Node>,
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    breaks: Vec<Break>,
    profiles: Vec<TravelMatrices>,
    horizon: i64,
}

impl ProblemData {
    pub fn new(
        nodes: Vec<Node>,
        vehicles: Vec<Vehicle>,
        breaks: Vec<Break>,
        profiles: Vec<TravelMatrices>,
        horizon: i64,
    ) -> Self {
        Self {
            nodes,
            vehicles,
            breaks,
            profiles,
            horizon,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    pub fn profiles(&self) -> &[TravelMatrices] {
        &self.profiles
    }

    /// Upper bound of every time cumul.
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    pub fn num_stops(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct matrix locations.
    pub fn matrix_size(&self) -> usize {
        self.profiles.first().map_or(0, TravelMatrices::size)
    }

    /// Number of capacity tracks, taken from the first vehicle.
    pub fn num_capacities(&self) -> usize {
        self.vehicles.first().map_or(0, |v| v.capacities().len())
    }

    /// Stops plus one start and one end node per vehicle.
    pub fn num_model_nodes(&self) -> usize {
        self.nodes.len() + 2 * self.vehicles.len()
    }

    pub fn start_node(&self, vehicle: usize) -> usize {
        self.nodes.len() + 2 * vehicle
    }

    pub fn end_node(&self, vehicle: usize) -> usize {
        self.nodes.len() + 2 * vehicle + 1
    }

    /// `(start, end)` model nodes of every vehicle.
    pub fn starts_ends(&self) -> Vec<(usize, usize)> {
        (0..self.vehicles.len())
            .map(|v| (self.start_node(v), self.end_node(v)))
            .collect()
    }

    pub fn node_ref(&self, node: usize) -> NodeRef {
        let n = self.nodes.len();
        if node < n {
            NodeRef::Stop(node)
        } else if (node - n) % 2 == 0 {
            NodeRef::Start((node - n) / 2)
        } else {
            NodeRef::End((node - n) / 2)
        }
    }

    /// Matrix location of a model node.
    pub fn node_location(&self, node: usize) -> usize {
        match self.node_ref(node) {
            NodeRef::Stop(i) => self.nodes[i].matrix_index(),
            NodeRef::Start(v) => self.vehicles[v].start_location(),
            NodeRef::End(v) => self.vehicles[v].end_location(),
        }
    }

    /// Service time of a model node, zero for vehicle anchors.
    pub fn node_service_time(&self, node: usize) -> i64 {
        match self.node_ref(node) {
            NodeRef::Stop(i) => self.nodes[i].service_time(),
            NodeRef::Start(_) | NodeRef::End(_) => 0,
        }
    }

    /// Quantity of capacity `i` at a model node, zero for vehicle anchors.
    pub fn node_quantity(&self, node: usize, i: usize) -> i64 {
        match self.node_ref(node) {
            NodeRef::Stop(s) => self.nodes[s].quantity(i),
            NodeRef::Start(_) | NodeRef::End(_) => 0,
        }
    }

    fn profile_of(&self, vehicle: usize) -> &TravelMatrices {
        &self.profiles[self.vehicles[vehicle].profile()]
    }

    /// Travel time between matrix locations for the vehicle's profile.
    pub fn travel_time(&self, vehicle: usize, from: usize, to: usize) -> i64 {
        self.profile_of(vehicle).time(from, to)
    }

    /// Travel distance between matrix locations for the vehicle's profile.
    pub fn travel_distance(&self, vehicle: usize, from: usize, to: usize) -> i64 {
        self.profile_of(vehicle).distance(from, to)
    }

    /// Travel time between model nodes plus the service time at `from`.
    pub fn time_plus_service_time(&self, vehicle: usize, from: usize, to: usize) -> i64 {
        self.travel_time(vehicle, self.node_location(from), self.node_location(to))
            + self.node_service_time(from)
    }

    /// Largest travel times, distances, service times and cost multipliers.
    pub fn scaling_maxima(&self) -> ScalingMaxima {
        ScalingMaxima {
            max_time: self.profiles.iter().map(TravelMatrices::max_time).max().unwrap_or(0),
            max_distance: self
                .profiles
                .iter()
                .map(TravelMatrices::max_distance)
                .max()
                .unwrap_or(0),
            max_service_time: self.nodes.iter().map(Node::service_time).max().unwrap_or(0),
            max_time_cost: self
                .vehicles
                .iter()
                .map(Vehicle::cost_time_multiplier)
                .max()
                .unwrap_or(0),
            max_distance_cost: self
                .vehicles
                .iter()
                .map(Vehicle::cost_distance_multiplier)
                .max()
                .unwrap_or(0),
        }
    }
}
