// src/efficiency/map_data.rs

// Motor/inverter efficiency map, compiled in.
// Rows follow TORQUE_POINTS_NM, columns follow SPEED_POINTS_RPM.

/// Number of torque breakpoints (rows).
pub const TORQUE_POINT_COUNT: usize = 26;
/// Number of speed breakpoints (columns).
pub const SPEED_POINT_COUNT: usize = 21;

/// Torque axis in Nm, 0..=250 in 10 Nm steps.
pub const TORQUE_POINTS_NM: [f64; TORQUE_POINT_COUNT] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0, 140.0,
    150.0, 160.0, 170.0, 180.0, 190.0, 200.0, 210.0, 220.0, 230.0, 240.0, 250.0,
];

/// Speed axis in rpm, 0..=5000 in 250 rpm steps.
pub const SPEED_POINTS_RPM: [f64; SPEED_POINT_COUNT] = [
    0.0, 250.0, 500.0, 750.0, 1000.0, 1250.0, 1500.0, 1750.0, 2000.0, 2250.0, 2500.0, 2750.0,
    3000.0, 3250.0, 3500.0, 3750.0, 4000.0, 4250.0, 4500.0, 4750.0, 5000.0,
];

/// Efficiency in percent. Zero marks a point outside the usable operating region.
#[rustfmt::skip]
pub const EFFICIENCY_PERCENT: [[f64; SPEED_POINT_COUNT]; TORQUE_POINT_COUNT] = [
    [0.0, 0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0], //   0 Nm
    [0.0, 0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0,  0.0], //  10 Nm
    [0.0, 0.0, 86.0, 86.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 86.0, 86.0,  0.0], //  20 Nm
    [0.0, 0.0, 86.0, 86.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 86.0, 86.0,  0.0], //  30 Nm
    [0.0, 0.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0, 90.0, 90.0, 86.0], //  40 Nm
    [0.0, 0.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0, 90.0, 90.0, 86.0], //  50 Nm
    [0.0, 0.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0, 90.0, 90.0, 86.0], //  60 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0], //  70 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0], //  80 Nm
    [0.0, 0.0, 86.0, 86.0, 95.0, 95.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 95.0, 95.0, 90.0], //  90 Nm
    [0.0, 0.0, 86.0, 86.0, 95.0, 95.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 95.0, 95.0, 90.0], // 100 Nm
    [0.0, 0.0, 86.0, 86.0, 95.0, 95.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 95.0, 95.0, 90.0], // 110 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 95.0, 95.0, 94.0, 94.0, 86.0], // 120 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 96.0, 95.0, 95.0, 94.0, 94.0, 86.0], // 130 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0, 90.0, 86.0], // 140 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0, 90.0, 86.0], // 150 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0, 90.0, 86.0], // 160 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0, 90.0, 90.0, 90.0,  0.0], // 170 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 95.0, 95.0, 95.0, 95.0, 94.0, 94.0, 90.0, 90.0, 90.0, 90.0,  0.0], // 180 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0,  0.0], // 190 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0,  0.0], // 200 Nm
    [0.0, 0.0, 86.0, 86.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 94.0, 90.0, 90.0,  0.0], // 210 Nm
    [0.0, 0.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0,  0.0], // 220 Nm
    [0.0, 0.0, 86.0, 86.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0,  0.0], // 230 Nm
    [0.0, 0.0,  0.0,  0.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0,  0.0,  0.0,  0.0], // 240 Nm
    [0.0, 0.0,  0.0,  0.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0,  0.0,  0.0,  0.0], // 250 Nm
];

// src/efficiency/map_data.rs
