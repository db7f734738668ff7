#![allow(dead_code)]

use lyo_drying::{DryingConfig, OutputRecord, Trajectory, TrajectoryOptimizer};

/// Product, vial, and dryer shared by every scenario.
///
/// `critical_temperature`, `intercept`, and `slope` vary between scenarios;
/// the axis tables are appended by the caller.
pub fn base_toml(critical_temperature: f64, intercept: f64, slope: f64) -> String {
    format!(
        r#"
vial_count = 398
timestep = 0.01

[vial]
vial_area = 3.8
product_area = 3.14
fill_volume = 2.0

[product]
solute_fraction = 0.05
critical_temperature = {critical_temperature}
resistance = {{ r0 = 1.4, a1 = 16.0, a2 = 0.0 }}

[heat_transfer]
kc = 2.75e-4
kp = 8.93e-4
kd = 0.46

[equipment]
intercept = {intercept}
slope = {slope}
"#
    )
}

/// The reference product: Tcrit = -25 °C, capacity 5 + 10·P kg/hr.
pub fn reference(axes: &str) -> DryingConfig {
    parse(&(base_toml(-25.0, 5.0, 10.0) + axes))
}

/// The web-interface product: Tcrit = -5 °C, capacity -0.182 + 11.7·P kg/hr.
pub fn web(axes: &str) -> DryingConfig {
    parse(&(base_toml(-5.0, -0.182, 11.7) + axes))
}

pub fn parse(text: &str) -> DryingConfig {
    toml::from_str(text).expect("scenario config should parse")
}

pub fn run(config: DryingConfig) -> Trajectory {
    TrajectoryOptimizer::new(config)
        .expect("scenario config should validate")
        .run()
}

/// Shelf ramping -40 → -20 → -10 °C at 1 °C/min with the given holds [min].
pub fn shelf_schedule(first_hold: f64, second_hold: f64) -> String {
    format!(
        r#"
[temperature.schedule]
initial = -40.0
setpoints = [-20.0, -10.0]
hold_times = [{first_hold}, {second_hold}]
ramp_rate = 1.0
"#
    )
}

pub fn pressure_bounds(min: f64, max: f64) -> String {
    format!(
        r#"
[pressure.bounds]
min = {min}
max = {max}
"#
    )
}

/// Per-vial sublimation rate [kg/hr] behind a record.
pub fn mass_rate(record: &OutputRecord, product_area: f64) -> f64 {
    record.sublimation_flux * product_area * 1e-4
}
