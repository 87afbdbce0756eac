use crate::core::physics;
use crate::domain::model::{ClimbProfile, DrivetrainCandidate};
use crate::utils::error::{GearError, Result};
use crate::utils::validation::{validate_positive, validate_tooth_counts, Validate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CadenceSpeed {
    pub gear_ratio: f64,
    pub speed_kmh: f64,
}

/// Whole minutes plus remaining whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClimbDuration {
    pub minutes: u64,
    pub seconds: u64,
}

impl ClimbDuration {
    pub fn from_seconds(total_seconds: f64) -> Self {
        Self {
            minutes: (total_seconds / 60.0).floor() as u64,
            seconds: (total_seconds % 60.0).floor() as u64,
        }
    }
}

impl std::fmt::Display for ClimbDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min {} s", self.minutes, self.seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimbEstimate {
    pub gradient_pct: f64,
    pub gear_ratio: f64,
    pub speed_kmh: f64,
    pub power_w: f64,
    pub duration: ClimbDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerTargetEstimate {
    pub gradient_pct: f64,
    pub gear_ratio: f64,
    pub speed_kmh: f64,
    pub cadence_rpm: f64,
    pub duration: ClimbDuration,
}

fn validate_gear(chainring_teeth: u32, sprocket_teeth: u32) -> Result<()> {
    validate_tooth_counts("chainring", &[chainring_teeth])?;
    validate_tooth_counts("sprocket", &[sprocket_teeth])?;
    Ok(())
}

pub fn cadence_speed(
    chainring_teeth: u32,
    sprocket_teeth: u32,
    cadence_rpm: u32,
    wheel_circumference_m: f64,
) -> Result<CadenceSpeed> {
    validate_gear(chainring_teeth, sprocket_teeth)?;
    validate_positive("wheel_circumference_m", wheel_circumference_m)?;

    let gear_ratio = physics::gear_ratio(chainring_teeth, sprocket_teeth);
    let speed_ms = physics::speed_ms(cadence_rpm as f64, gear_ratio, wheel_circumference_m);

    Ok(CadenceSpeed {
        gear_ratio,
        speed_kmh: physics::ms_to_kmh(speed_ms),
    })
}

/// Time and gravity power for riding the whole climb in one gear at a fixed cadence.
pub fn estimate_climb(
    profile: &ClimbProfile,
    candidate: &DrivetrainCandidate,
    wheel_circumference_m: f64,
) -> Result<ClimbEstimate> {
    profile.validate()?;
    validate_gear(candidate.chainring_teeth, candidate.sprocket_teeth)?;
    validate_positive("wheel_circumference_m", wheel_circumference_m)?;

    let gradient_pct = profile.gradient_pct();
    let gear_ratio = candidate.gear_ratio();
    let estimate = physics::estimate(
        profile.mass_kg,
        gradient_pct,
        candidate.cadence_rpm,
        gear_ratio,
        wheel_circumference_m,
    );

    if estimate.speed_ms <= 0.0 {
        return Err(GearError::invalid_input(
            "cadence_rpm",
            candidate.cadence_rpm,
            "Cadence must be greater than 0 to finish the climb",
        ));
    }

    Ok(ClimbEstimate {
        gradient_pct,
        gear_ratio,
        speed_kmh: physics::ms_to_kmh(estimate.speed_ms),
        power_w: estimate.power_w,
        duration: ClimbDuration::from_seconds(profile.climb_length_m() / estimate.speed_ms),
    })
}

/// Speed the target power sustains on the gradient, and the cadence that speed needs in the given gear.
pub fn cadence_for_power(
    profile: &ClimbProfile,
    target_power_w: f64,
    chainring_teeth: u32,
    sprocket_teeth: u32,
    wheel_circumference_m: f64,
) -> Result<PowerTargetEstimate> {
    profile.validate()?;
    validate_positive("target_power_w", target_power_w)?;
    validate_gear(chainring_teeth, sprocket_teeth)?;
    validate_positive("wheel_circumference_m", wheel_circumference_m)?;

    let gradient_pct = profile.gradient_pct();
    let load = physics::STANDARD_GRAVITY * profile.mass_kg * physics::incline_sine(gradient_pct);
    if load <= 0.0 {
        return Err(GearError::invalid_input(
            "elevation_gain_m",
            profile.elevation_gain_m,
            "A flat climb has no gravity load to balance the target power",
        ));
    }

    let gear_ratio = physics::gear_ratio(chainring_teeth, sprocket_teeth);
    let speed_ms = target_power_w / load;
    let cadence_rpm = (speed_ms * 60.0) / (gear_ratio * wheel_circumference_m);

    Ok(PowerTargetEstimate {
        gradient_pct,
        gear_ratio,
        speed_kmh: physics::ms_to_kmh(speed_ms),
        cadence_rpm,
        duration: ClimbDuration::from_seconds(profile.climb_length_m() / speed_ms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_speed() {
        let result = cadence_speed(50, 15, 90, 2.096).unwrap();
        assert!((result.gear_ratio - 3.3333).abs() < 1e-4);
        assert!((result.speed_kmh - 37.728).abs() < 1e-9);

        assert!(cadence_speed(50, 0, 90, 2.096).is_err());
        assert!(cadence_speed(50, 15, 90, 0.0).is_err());
    }

    #[test]
    fn test_climb_duration_split() {
        let duration = ClimbDuration::from_seconds(477.1);
        assert_eq!(duration, ClimbDuration { minutes: 7, seconds: 57 });
        assert_eq!(duration.to_string(), "7 min 57 s");
    }

    #[test]
    fn test_estimate_climb() {
        let profile = ClimbProfile::new(75.0, 500.0, 5.0);
        let estimate =
            estimate_climb(&profile, &DrivetrainCandidate::new(34, 28, 80), 2.096).unwrap();

        let speed_ms = 80.0 * (34.0 / 28.0) * 2.096 / 60.0;
        let expected_power = physics::implied_power(75.0, 10.0, speed_ms);
        let expected_seconds = 5000.0 / speed_ms;

        assert!((estimate.gradient_pct - 10.0).abs() < 1e-12);
        assert!((estimate.power_w - expected_power).abs() < 1e-9);
        assert_eq!(
            estimate.duration,
            ClimbDuration::from_seconds(expected_seconds)
        );
    }

    #[test]
    fn test_estimate_climb_rejects_zero_cadence() {
        let profile = ClimbProfile::new(75.0, 500.0, 5.0);
        let err = estimate_climb(&profile, &DrivetrainCandidate::new(34, 28, 0), 2.096).unwrap_err();
        assert!(err.to_string().contains("cadence_rpm"));
    }

    #[test]
    fn test_cadence_for_power_round_trips() {
        let profile = ClimbProfile::new(75.0, 500.0, 5.0);
        let estimate = cadence_for_power(&profile, 250.0, 34, 32, 2.096).unwrap();

        let speed_ms = physics::speed_ms(estimate.cadence_rpm, estimate.gear_ratio, 2.096);
        let power = physics::implied_power(75.0, estimate.gradient_pct, speed_ms);
        assert!((power - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_cadence_for_power_rejects_flat_climb() {
        let profile = ClimbProfile::new(75.0, 0.0, 5.0);
        assert!(cadence_for_power(&profile, 250.0, 34, 32, 2.096).is_err());
    }
}
