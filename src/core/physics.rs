//! Gravity-only climbing model.
//!
//! Power is what it takes to lift the total mass up an average gradient at a
//! given ground speed. No aerodynamic, rolling or drivetrain losses.

use crate::domain::model::PowerEstimate;

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.8067;

pub const MS_TO_KMH: f64 = 3.6;

pub fn gradient_pct(elevation_gain_m: f64, climb_length_km: f64) -> f64 {
    (elevation_gain_m / (climb_length_km * 1000.0)) * 100.0
}

pub fn gear_ratio(chainring_teeth: u32, sprocket_teeth: u32) -> f64 {
    chainring_teeth as f64 / sprocket_teeth as f64
}

/// Ground speed in m/s for a cadence (rpm) turning `gear_ratio` on a wheel.
pub fn speed_ms(cadence_rpm: f64, gear_ratio: f64, wheel_circumference_m: f64) -> f64 {
    (cadence_rpm * gear_ratio * wheel_circumference_m) / 60.0
}

/// Sine of the incline angle for a gradient given in percent.
pub fn incline_sine(gradient_pct: f64) -> f64 {
    (gradient_pct / 100.0).atan().sin()
}

pub fn implied_power(mass_kg: f64, gradient_pct: f64, speed_ms: f64) -> f64 {
    STANDARD_GRAVITY * mass_kg * incline_sine(gradient_pct) * speed_ms
}

pub fn estimate(
    mass_kg: f64,
    gradient_pct: f64,
    cadence_rpm: u32,
    gear_ratio: f64,
    wheel_circumference_m: f64,
) -> PowerEstimate {
    let speed_ms = speed_ms(cadence_rpm as f64, gear_ratio, wheel_circumference_m);
    PowerEstimate {
        speed_ms,
        power_w: implied_power(mass_kg, gradient_pct, speed_ms),
    }
}

pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * MS_TO_KMH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_pct() {
        assert!((gradient_pct(500.0, 5.0) - 10.0).abs() < 1e-12);
        assert_eq!(gradient_pct(0.0, 3.0), 0.0);
    }

    #[test]
    fn test_speed_from_cadence() {
        // 50x15 @ 90rpm on 700x25c
        let ratio = gear_ratio(50, 15);
        let speed = speed_ms(90.0, ratio, 2.096);
        assert!((ms_to_kmh(speed) - 37.728).abs() < 1e-9);
    }

    #[test]
    fn test_implied_power_flat_is_zero() {
        assert_eq!(implied_power(75.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_implied_power_increases_with_gradient() {
        let mut previous = implied_power(75.0, 0.5, 5.0);
        for step in 1..40 {
            let current = implied_power(75.0, 0.5 + step as f64 * 0.5, 5.0);
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn test_incline_sine_ten_percent() {
        // sin(atan(0.1)) = 0.1 / sqrt(1.01)
        let expected = 0.1 / 1.01_f64.sqrt();
        assert!((incline_sine(10.0) - expected).abs() < 1e-12);
    }
}
