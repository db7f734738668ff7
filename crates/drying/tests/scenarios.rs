mod common;

use approx::assert_relative_eq;

use lyo_drying::{Status, Variant, Warning};

use common::{mass_rate, pressure_bounds, reference, run, shelf_schedule, web};

const PRODUCT_AREA: f64 = 3.14;
const TOL: f64 = 1e-6;

#[test]
fn pressure_only_dries_below_critical_temperature() {
    let trajectory = run(reference(
        &(pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 1800.0)),
    ));

    assert_eq!(trajectory.variant, Variant::PressureOnly);
    assert_eq!(trajectory.status, Status::Complete);
    assert!(trajectory.warnings.is_empty(), "{:?}", trajectory.warnings);
    assert!(trajectory.final_fraction() >= 0.99);
    assert_relative_eq!(trajectory.final_fraction(), 1.0);

    let max_bottom = trajectory.max_bottom_temperature().expect("has records");
    assert!(max_bottom <= -25.0 + TOL, "bottom reached {max_bottom}");

    // The critical temperature is the active constraint late in the run.
    assert!(max_bottom > -25.0 - 1e-3);

    let drying_time = trajectory.drying_time().expect("complete");
    assert_relative_eq!(drying_time, 16.004, epsilon = 0.02);
}

#[test]
fn pressure_only_trajectory_respects_every_constraint() {
    let trajectory = run(reference(
        &(pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 1800.0)),
    ));
    let records = &trajectory.records;

    for pair in records.windows(2) {
        assert!(pair[1].time > pair[0].time);
        assert!(pair[1].dried_fraction >= pair[0].dried_fraction);
    }

    for record in records {
        assert!((0.0..=1.0).contains(&record.dried_fraction));
        assert!((40.0 - TOL..=200.0 + TOL).contains(&record.chamber_pressure));
        assert!(record.bottom_temperature <= -25.0 + TOL);

        let capacity = 5.0 + 10.0 * record.chamber_pressure / 1000.0;
        assert!(398.0 * mass_rate(record, PRODUCT_AREA) <= capacity + TOL);

        if record.sublimation_flux > 0.0 {
            assert!(record.front_temperature <= record.bottom_temperature + TOL);
            assert!(record.bottom_temperature <= record.shelf_temperature + TOL);
        }
    }
}

#[test]
fn two_hour_holds_time_out() {
    let trajectory = run(reference(
        &(pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 120.0)),
    ));

    assert_eq!(trajectory.status, Status::IncompleteTimedOut);
    assert!(trajectory.drying_time().is_none());

    let fraction = trajectory.final_fraction();
    assert!(fraction > 0.2 && fraction < 0.3, "dried {fraction}");

    let Some(Warning::DryingIncomplete {
        time,
        dried_fraction,
    }) = trajectory.warnings.last()
    else {
        panic!("expected a drying-incomplete warning: {:?}", trajectory.warnings);
    };
    assert!(*time >= 4.0 - TOL);
    assert!(*dried_fraction >= fraction);
    assert!(trajectory.records.last().is_some_and(|r| r.time < 4.0));
}

#[test]
fn temperature_only_reference_web_scenario() {
    let trajectory = run(web(
        r#"
[pressure.schedule]
setpoints = [0.15]
hold_times = [1800.0]
ramp_rate = 0.5

[temperature.bounds]
min = -45.0
max = 120.0
"#,
    ));

    assert_eq!(trajectory.variant, Variant::TemperatureOnly);
    assert_eq!(trajectory.status, Status::Complete);

    let drying_time = trajectory.drying_time().expect("complete");
    assert_relative_eq!(drying_time, 2.123, epsilon = 0.02);

    let first = trajectory.records[0];
    assert_relative_eq!(first.shelf_temperature, 120.0, epsilon = TOL);
    assert_relative_eq!(first.chamber_pressure, 150.0, epsilon = 1e-9);

    for record in &trajectory.records {
        assert!((-45.0 - TOL..=120.0 + TOL).contains(&record.shelf_temperature));
        assert!(record.bottom_temperature <= -5.0 + TOL);
    }
}

#[test]
fn more_freedom_never_dries_slower() {
    let baseline = run(reference(
        &(pressure_bounds(0.06, 0.06) + &shelf_schedule(120.0, 1800.0)),
    ));
    let pressure_only = run(reference(
        &(pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 1800.0)),
    ));
    let joint = run(reference(
        &(pressure_bounds(0.04, 0.2)
            + r#"
[temperature.bounds]
min = -40.0
max = -10.0
"#),
    ));

    assert_eq!(joint.variant, Variant::Joint);
    let baseline = baseline.drying_time().expect("baseline completes");
    let pressure_only = pressure_only.drying_time().expect("pressure-only completes");
    let joint = joint.drying_time().expect("joint completes");

    assert!(joint <= pressure_only, "{joint} > {pressure_only}");
    assert!(pressure_only <= baseline, "{pressure_only} > {baseline}");
    assert_relative_eq!(joint, 15.268, epsilon = 0.02);
    assert_relative_eq!(baseline, 16.555, epsilon = 0.02);
}

#[test]
fn negative_capacity_region_is_avoided() {
    let mut config = reference(&(pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 1800.0)));
    config.equipment.intercept = -0.5;
    config.equipment.slope = 11.7;

    let trajectory = run(config);

    assert_eq!(trajectory.status, Status::Complete);
    assert!(matches!(
        trajectory.warnings.first(),
        Some(Warning::NegativeCapacity { pressure, .. }) if *pressure == 0.04
    ));

    // Capacity is zero at 0.5 / 11.7 ≈ 0.0427 Torr.
    let zero_capacity = 0.5 / 11.7 * 1000.0;
    for record in &trajectory.records {
        assert!(record.chamber_pressure >= zero_capacity - TOL);
        let capacity = -0.5 + 11.7 * record.chamber_pressure / 1000.0;
        assert!(398.0 * mass_rate(record, PRODUCT_AREA) <= capacity + TOL);
    }
}

#[test]
fn failed_steps_fall_back_and_continue() {
    let trajectory = run(web(
        r#"
[pressure.bounds]
min = 0.05

[temperature.schedule]
initial = -35.0
setpoints = [-20.0, 120.0]
hold_times = [300.0, 1800.0]
ramp_rate = 1.0
"#,
    ));

    assert_eq!(trajectory.status, Status::Complete);

    let failures: Vec<f64> = trajectory
        .warnings
        .iter()
        .filter_map(|warning| match warning {
            Warning::OptimizationFailure { time, .. } => Some(*time),
            _ => None,
        })
        .collect();
    assert!(!failures.is_empty());

    // Failures come at the end, when the hot shelf outruns the product, and
    // each retains the pressure of the step before it.
    let first_failure = failures[0];
    let records = &trajectory.records;
    let index = records
        .iter()
        .position(|r| r.time == first_failure)
        .expect("failure time is recorded");
    assert!(index > 0);
    assert_eq!(records[index].chamber_pressure, records[index - 1].chamber_pressure);

    assert_relative_eq!(trajectory.final_fraction(), 1.0);
}

#[test]
fn joint_with_open_pressure_bound() {
    let trajectory = run(web(
        r#"
[pressure.bounds]
min = 0.05

[temperature.bounds]
min = -45.0
max = 120.0
"#,
    ));

    assert_eq!(trajectory.status, Status::Complete);
    assert_relative_eq!(
        trajectory.drying_time().expect("complete"),
        1.979,
        epsilon = 0.02
    );
    for record in &trajectory.records {
        assert!(record.chamber_pressure >= 50.0 - TOL);
        assert!(record.bottom_temperature <= -5.0 + TOL);
    }
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let axes = pressure_bounds(0.04, 0.2) + &shelf_schedule(120.0, 120.0);

    let first = run(reference(&axes));
    let second = run(reference(&axes));

    assert_eq!(first, second);
}
