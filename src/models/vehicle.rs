//! Vehicle, capacity and break types.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// One capacity track of a vehicle.
///
/// `limit: None` leaves the track unbounded. A positive overload
/// multiplier turns the limit into a soft bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub limit: Option<i64>,
    pub overload_multiplier: Option<i64>,
}

impl Capacity {
    /// A hard limit.
    pub fn hard(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            overload_multiplier: None,
        }
    }

    /// A limit that may be exceeded at `multiplier` per unit.
    pub fn soft(limit: i64, multiplier: i64) -> Self {
        Self {
            limit: Some(limit),
            overload_multiplier: Some(multiplier),
        }
    }

    /// No limit.
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// A vehicle of the fleet.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Capacity, TimeWindow, Vehicle};
///
/// let v = Vehicle::new("truck", 0, 0)
///     .with_time_window(TimeWindow::closed(0, 28_800))
///     .with_capacities(vec![Capacity::hard(10)])
///     .with_costs(100, 1, 0);
/// assert_eq!(v.start_location(), 0);
/// assert_eq!(v.cost_fixed(), 100);
/// assert_eq!(v.capacities().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    start_location: usize,
    end_location: usize,
    #[serde(default)]
    profile: usize,
    #[serde(default)]
    time_window: TimeWindow,
    #[serde(default)]
    late_multiplier: Option<i64>,
    #[serde(default)]
    capacities: Vec<Capacity>,
    #[serde(default)]
    cost_fixed: i64,
    #[serde(default)]
    cost_time_multiplier: i64,
    #[serde(default)]
    cost_distance_multiplier: i64,
}

impl Vehicle {
    /// Creates a vehicle travelling from `start_location` to `end_location`.
    ///
    /// Default: profile 0, open time window, no capacities, no costs.
    pub fn new(id: impl Into<String>, start_location: usize, end_location: usize) -> Self {
        Self {
            id: id.into(),
            start_location,
            end_location,
            profile: 0,
            time_window: TimeWindow::open(),
            late_multiplier: None,
            capacities: Vec::new(),
            cost_fixed: 0,
            cost_time_multiplier: 0,
            cost_distance_multiplier: 0,
        }
    }

    /// Sets the travel matrix profile.
    pub fn with_profile(mut self, profile: usize) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the working window (`time_start`, `time_end`).
    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    /// Makes the end bound soft, costing `multiplier` per unit of overtime.
    pub fn with_late_multiplier(mut self, multiplier: i64) -> Self {
        self.late_multiplier = Some(multiplier);
        self
    }

    pub fn with_capacities(mut self, capacities: Vec<Capacity>) -> Self {
        self.capacities = capacities;
        self
    }

    /// Sets fixed, per-time-unit and per-distance-unit costs.
    pub fn with_costs(mut self, fixed: i64, time_multiplier: i64, distance_multiplier: i64) -> Self {
        self.cost_fixed = fixed;
        self.cost_time_multiplier = time_multiplier;
        self.cost_distance_multiplier = distance_multiplier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_location(&self) -> usize {
        self.start_location
    }

    pub fn end_location(&self) -> usize {
        self.end_location
    }

    pub fn profile(&self) -> usize {
        self.profile
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Earliest departure, if bounded.
    pub fn time_start(&self) -> Option<i64> {
        self.time_window.ready()
    }

    /// Latest return, if bounded.
    pub fn time_end(&self) -> Option<i64> {
        self.time_window.due()
    }

    pub fn late_multiplier(&self) -> Option<i64> {
        self.late_multiplier
    }

    pub fn capacities(&self) -> &[Capacity] {
        &self.capacities
    }

    pub fn cost_fixed(&self) -> i64 {
        self.cost_fixed
    }

    pub fn cost_time_multiplier(&self) -> i64 {
        self.cost_time_multiplier
    }

    pub fn cost_distance_multiplier(&self) -> i64 {
        self.cost_distance_multiplier
    }
}

/// A rest break owned by a vehicle.
///
/// A break with zero duration is not required and is never placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    vehicle: usize,
    duration: i64,
    #[serde(default)]
    time_window: TimeWindow,
}

impl Break {
    pub fn new(vehicle: usize, duration: i64, time_window: TimeWindow) -> Self {
        Self {
            vehicle,
            duration,
            time_window,
        }
    }

    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Window in which the break must start.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn is_required(&self) -> bool {
        self.duration > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new("v", 1, 2);
        assert_eq!(v.id(), "v");
        assert_eq!(v.start_location(), 1);
        assert_eq!(v.end_location(), 2);
        assert_eq!(v.profile(), 0);
        assert!(v.time_window().is_open());
        assert!(v.capacities().is_empty());
        assert_eq!(v.cost_fixed(), 0);
    }

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new("v", 0, 0)
            .with_profile(2)
            .with_time_window(TimeWindow::closed(8, 18))
            .with_late_multiplier(3)
            .with_capacities(vec![Capacity::soft(5, 10), Capacity::unlimited()])
            .with_costs(50, 2, 1);
        assert_eq!(v.profile(), 2);
        assert_eq!(v.time_start(), Some(8));
        assert_eq!(v.time_end(), Some(18));
        assert_eq!(v.late_multiplier(), Some(3));
        assert_eq!(v.capacities()[0], Capacity::soft(5, 10));
        assert_eq!(v.capacities()[1].limit, None);
        assert_eq!(v.cost_time_multiplier(), 2);
        assert_eq!(v.cost_distance_multiplier(), 1);
    }

    #[test]
    fn test_break_required() {
        assert!(Break::new(0, 30, TimeWindow::closed(10, 20)).is_required());
        assert!(!Break::new(0, 0, TimeWindow::open()).is_required());
    }
}
