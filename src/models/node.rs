//! Stop and time window types.

use serde::{Deserialize, Serialize};

/// Magnitude from which raw bounds are read as "no bound".
///
/// Instance providers encode open time windows with large sentinels; any
/// raw value at or beyond `±UNBOUNDED` is converted to `None`.
pub const UNBOUNDED: i64 = i64::MAX / 4;

/// A time window with optional bounds.
///
/// `None` means the side is open. The vehicle may arrive before `ready`
/// and wait; arriving after `due` is either forbidden or penalized,
/// depending on the stop's lateness multiplier.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{TimeWindow, UNBOUNDED};
///
/// let tw = TimeWindow::from_raw(-UNBOUNDED, 3600);
/// assert_eq!(tw.ready(), None);
/// assert_eq!(tw.due(), Some(3600));
/// assert!(TimeWindow::from_raw(i64::MIN, i64::MAX).is_open());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: Option<i64>,
    due: Option<i64>,
}

impl TimeWindow {
    /// Creates a time window from optional bounds.
    pub fn new(ready: Option<i64>, due: Option<i64>) -> Self {
        Self { ready, due }
    }

    /// Creates a closed window `[ready, due]`.
    pub fn closed(ready: i64, due: i64) -> Self {
        Self::new(Some(ready), Some(due))
    }

    /// Creates a window from raw provider values, mapping sentinels to `None`.
    pub fn from_raw(ready: i64, due: i64) -> Self {
        Self {
            ready: (ready > -UNBOUNDED).then_some(ready),
            due: (due < UNBOUNDED).then_some(due),
        }
    }

    /// A window without bounds.
    pub fn open() -> Self {
        Self::default()
    }

    /// Earliest start, if bounded.
    pub fn ready(&self) -> Option<i64> {
        self.ready
    }

    /// Latest start, if bounded.
    pub fn due(&self) -> Option<i64> {
        self.due
    }

    /// Returns `true` if neither side is bounded.
    pub fn is_open(&self) -> bool {
        self.ready.is_none() && self.due.is_none()
    }

    /// Returns `true` if `time` satisfies both bounds.
    pub fn contains(&self, time: i64) -> bool {
        self.ready.is_none_or(|ready| time >= ready) && self.due.is_none_or(|due| time <= due)
    }

    /// Amount by which `time` exceeds `due`.
    pub fn lateness(&self, time: i64) -> i64 {
        self.due.map_or(0, |due| (time - due).max(0))
    }
}

/// A stop to visit.
///
/// Two consecutive nodes sharing a matrix location are alternative time
/// windows for the same stop; at most one of them is visited.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Node, TimeWindow};
///
/// let node = Node::new("n1", 3)
///     .with_time_window(TimeWindow::closed(100, 200))
///     .with_service_time(30)
///     .with_late_multiplier(5);
/// assert_eq!(node.matrix_index(), 3);
/// assert_eq!(node.late_multiplier(), Some(5));
/// assert!(node.allows_vehicle(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    matrix_index: usize,
    #[serde(default)]
    time_window: TimeWindow,
    #[serde(default)]
    late_multiplier: Option<i64>,
    #[serde(default)]
    service_time: i64,
    #[serde(default)]
    quantities: Vec<i64>,
    #[serde(default)]
    allowed_vehicles: Vec<usize>,
    #[serde(default)]
    optional: bool,
}

impl Node {
    /// Creates a stop at the given matrix location with no constraints.
    pub fn new(id: impl Into<String>, matrix_index: usize) -> Self {
        Self {
            id: id.into(),
            matrix_index,
            time_window: TimeWindow::open(),
            late_multiplier: None,
            service_time: 0,
            quantities: Vec::new(),
            allowed_vehicles: Vec::new(),
            optional: false,
        }
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    /// Makes the due bound soft, costing `multiplier` per unit of lateness.
    pub fn with_late_multiplier(mut self, multiplier: i64) -> Self {
        self.late_multiplier = Some(multiplier);
        self
    }

    pub fn with_service_time(mut self, service_time: i64) -> Self {
        self.service_time = service_time;
        self
    }

    /// Quantities per capacity index.
    pub fn with_quantities(mut self, quantities: Vec<i64>) -> Self {
        self.quantities = quantities;
        self
    }

    /// Restricts the stop to the given vehicle indices.
    pub fn with_allowed_vehicles(mut self, vehicles: Vec<usize>) -> Self {
        self.allowed_vehicles = vehicles;
        self
    }

    /// Allows the stop to be skipped at no cost.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matrix_index(&self) -> usize {
        self.matrix_index
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Lateness multiplier; `None` or a non-positive value keeps `due` hard.
    pub fn late_multiplier(&self) -> Option<i64> {
        self.late_multiplier
    }

    pub fn service_time(&self) -> i64 {
        self.service_time
    }

    /// Quantity for capacity index `i`, zero when not given.
    pub fn quantity(&self, i: usize) -> i64 {
        self.quantities.get(i).copied().unwrap_or(0)
    }

    /// Allowed vehicles; empty means any vehicle.
    pub fn allowed_vehicles(&self) -> &[usize] {
        &self.allowed_vehicles
    }

    pub fn allows_vehicle(&self, vehicle: usize) -> bool {
        self.allowed_vehicles.is_empty() || self.allowed_vehicles.contains(&vehicle)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns `true` if `other` is the alternative time window of this stop.
    pub fn shares_location(&self, other: &Node) -> bool {
        self.matrix_index == other.matrix_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_time_window_closed() {
        let tw = TimeWindow::closed(10, 20);
        assert_eq!(tw.ready(), Some(10));
        assert_eq!(tw.due(), Some(20));
        assert!(tw.contains(10));
        assert!(tw.contains(20));
        assert!(!tw.contains(9));
        assert!(!tw.contains(21));
    }

    #[test]
    fn test_time_window_lateness() {
        let tw = TimeWindow::closed(10, 20);
        assert_eq!(tw.lateness(15), 0);
        assert_eq!(tw.lateness(25), 5);
        assert_eq!(TimeWindow::open().lateness(i64::MAX), 0);
    }

    #[test]
    fn test_sentinels_are_open() {
        let tw = TimeWindow::from_raw(-UNBOUNDED, UNBOUNDED);
        assert!(tw.is_open());
        let tw = TimeWindow::from_raw(i64::MIN, 50);
        assert_eq!(tw.ready(), None);
        assert_eq!(tw.due(), Some(50));
    }

    #[test]
    fn test_node_defaults() {
        let node = Node::new("a", 2);
        assert_eq!(node.id(), "a");
        assert!(node.time_window().is_open());
        assert_eq!(node.service_time(), 0);
        assert_eq!(node.quantity(0), 0);
        assert!(node.allows_vehicle(0));
        assert!(!node.is_optional());
    }

    #[test]
    fn test_sticky_vehicles() {
        let node = Node::new("a", 2).with_allowed_vehicles(vec![1, 3]);
        assert!(node.allows_vehicle(1));
        assert!(!node.allows_vehicle(2));
    }

    #[test]
    fn test_shares_location() {
        let a = Node::new("a", 4);
        let b = Node::new("b", 4);
        let c = Node::new("c", 5);
        assert!(a.shares_location(&b));
        assert!(!a.shares_location(&c));
    }

    proptest! {
        #[test]
        fn prop_raw_bounds_inside_sentinels_are_kept(ready in -1_000_000i64..1_000_000, span in 0i64..1_000_000) {
            let tw = TimeWindow::from_raw(ready, ready + span);
            prop_assert_eq!(tw.ready(), Some(ready));
            prop_assert_eq!(tw.due(), Some(ready + span));
            prop_assert!(tw.contains(ready));
        }

        #[test]
        fn prop_sentinels_never_become_bounds(low in i64::MIN..=-UNBOUNDED, high in UNBOUNDED..=i64::MAX) {
            let tw = TimeWindow::from_raw(low, high);
            prop_assert!(tw.is_open());
        }
    }
}
