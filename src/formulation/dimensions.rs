//! Cumulative dimensions and per-vehicle costs.

use tracing::debug;

use crate::engine::{RoutingModel, SoftBound, Transit};
use crate::error::Result;
use crate::models::ProblemData;

pub const TIME: &str = "time";
pub const DISTANCE: &str = "distance";
pub const ORDER: &str = "order";

/// Name of the load dimension of capacity index `i`.
pub fn quantity_dimension(i: usize) -> String {
    format!("quantity{i}")
}

/// Visiting-order locality proxy: `100 * sqrt(time)`.
pub fn order_transit(time: i64) -> i64 {
    (100.0 * (time.max(0) as f64).sqrt()) as i64
}

fn per_vehicle<'a>(data: &'a ProblemData, transit: impl Fn(usize, usize, usize) -> i64 + Copy + 'a) -> Vec<Transit<'a>> {
    (0..data.vehicles().len())
        .map(|v| Box::new(move |from: usize, to: usize| transit(v, from, to)) as Transit<'a>)
        .collect()
}

/// Registers the `time`, `distance`, optional `order` and `quantity{i}`
/// dimensions, then applies vehicle costs, working hours and capacities.
pub fn add_dimensions<'a>(model: &mut RoutingModel<'a>, data: &'a ProblemData, nearby: bool) -> Result<()> {
    let horizon = data.horizon();

    model.add_dimension_with_vehicle_transits(
        per_vehicle(data, |v, from, to| data.time_plus_service_time(v, from, to)),
        horizon,
        horizon,
        false,
        TIME,
    )?;
    model.add_dimension_with_vehicle_transits(
        per_vehicle(data, |v, from, to| {
            data.travel_distance(v, data.node_location(from), data.node_location(to))
        }),
        0,
        i64::MAX,
        true,
        DISTANCE,
    )?;
    if nearby {
        model.add_dimension_with_vehicle_transits(
            per_vehicle(data, |v, from, to| {
                order_transit(data.travel_time(v, data.node_location(from), data.node_location(to)))
            }),
            horizon,
            horizon,
            true,
            ORDER,
        )?;
    }
    for i in 0..data.num_capacities() {
        model.add_dimension(
            Box::new(move |from: usize, _: usize| data.node_quantity(from, i)),
            0,
            i64::MAX,
            true,
            &quantity_dimension(i),
        );
    }

    for (v, vehicle) in data.vehicles().iter().enumerate() {
        model.set_fixed_cost_of_vehicle(vehicle.cost_fixed(), v)?;
        model
            .dimension_mut(DISTANCE)?
            .set_span_cost_coefficient_for_vehicle(vehicle.cost_distance_multiplier(), v);
        if nearby {
            let coefficient = (vehicle.cost_time_multiplier() + vehicle.cost_distance_multiplier()) / 5;
            model
                .dimension_mut(ORDER)?
                .set_span_cost_coefficient_for_vehicle(coefficient, v);
        }

        let time = model.dimension_mut(TIME)?;
        time.set_span_cost_coefficient_for_vehicle(vehicle.cost_time_multiplier(), v);
        if let Some(start) = vehicle.time_start() {
            time.set_start_cumul_min(v, start);
        }
        if let Some(end) = vehicle.time_end() {
            match vehicle.late_multiplier().filter(|&m| m > 0) {
                Some(multiplier) => time.set_end_soft_upper_bound(v, SoftBound::new(end, multiplier)),
                None => time.set_end_cumul_max(v, end),
            }
        }

        for (i, capacity) in vehicle.capacities().iter().enumerate().take(data.num_capacities()) {
            let Some(limit) = capacity.limit else {
                continue;
            };
            let quantity = model.dimension_mut(&quantity_dimension(i))?;
            match capacity.overload_multiplier.filter(|&m| m > 0) {
                Some(multiplier) => quantity.set_end_soft_upper_bound(v, SoftBound::new(limit, multiplier)),
                None => quantity.set_end_cumul_max(v, limit),
            }
        }
    }

    debug!(
        dimensions = model.dimensions().len(),
        capacities = data.num_capacities(),
        nearby,
        "dimensions registered"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::models::{Capacity, Node, TimeWindow, Vehicle};

    fn data() -> ProblemData {
        let time = TravelMatrix::from_rows(vec![vec![0, 4, 9], vec![4, 0, 6], vec![9, 6, 0]]).expect("square");
        let distance =
            TravelMatrix::from_rows(vec![vec![0, 40, 90], vec![40, 0, 60], vec![90, 60, 0]]).expect("square");
        ProblemData::new(
            vec![
                Node::new("a", 1).with_service_time(3).with_quantities(vec![2, 5]),
                Node::new("b", 2).with_quantities(vec![1, 1]),
            ],
            vec![
                Vehicle::new("v0", 0, 0)
                    .with_time_window(TimeWindow::closed(10, 500))
                    .with_capacities(vec![Capacity::hard(4), Capacity::soft(3, 7)])
                    .with_costs(100, 2, 3),
                Vehicle::new("v1", 0, 0)
                    .with_time_window(TimeWindow::closed(0, 400))
                    .with_late_multiplier(9)
                    .with_capacities(vec![Capacity::unlimited(), Capacity::hard(9)]),
            ],
            Vec::new(),
            vec![TravelMatrices::new(time, distance)],
            1_000,
        )
    }

    #[test]
    fn test_dimension_order_and_transits() {
        let data = data();
        let mut model = RoutingModel::new(data.num_model_nodes(), 2, &data.starts_ends());
        add_dimensions(&mut model, &data, true).expect("valid");

        let names: Vec<&str> = model.dimensions().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["time", "distance", "order", "quantity0", "quantity1"]);

        let time = model.dimension(TIME).expect("time");
        // travel 6 plus the service time of a
        assert_eq!(time.transit(0, 0, 1), 9);
        assert!(!time.fix_start_cumul_to_zero());
        assert_eq!(time.slack_max(), 1_000);
        assert_eq!(model.dimension(DISTANCE).expect("distance").transit(1, 0, 1), 60);
        assert_eq!(model.dimension(ORDER).expect("order").transit(0, 0, 1), 244);
        assert_eq!(model.dimension("quantity1").expect("load").transit(0, 0, 1), 5);
    }

    #[test]
    fn test_vehicle_bounds_and_costs() {
        let data = data();
        let mut model = RoutingModel::new(data.num_model_nodes(), 2, &data.starts_ends());
        add_dimensions(&mut model, &data, false).expect("valid");

        assert!(model.dimension(ORDER).is_err());
        assert_eq!(model.fixed_cost_of_vehicle(0), 100);

        let time = model.dimension(TIME).expect("time");
        assert_eq!(time.span_cost_coefficient(0), 2);
        assert_eq!(time.cumul_min(model.start(0)), 10);
        assert_eq!(time.cumul_max(model.end(0)), 500);
        // soft end for v1
        assert_eq!(time.cumul_max(model.end(1)), 1_000);
        assert_eq!(time.soft_upper_bound(model.end(1)), Some(SoftBound::new(400, 9)));

        let q0 = model.dimension("quantity0").expect("load");
        assert_eq!(q0.cumul_max(model.end(0)), 4);
        assert_eq!(q0.cumul_max(model.end(1)), i64::MAX);
        let q1 = model.dimension("quantity1").expect("load");
        assert_eq!(q1.soft_upper_bound(model.end(0)), Some(SoftBound::new(3, 7)));
        assert_eq!(q1.cumul_max(model.end(1)), 9);
    }

    #[test]
    fn test_order_transit() {
        assert_eq!(order_transit(0), 0);
        assert_eq!(order_transit(4), 200);
        assert_eq!(order_transit(-3), 0);
    }
}
