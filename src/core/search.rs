use crate::core::physics;
use crate::domain::model::{BestResult, ClimbProfile, GearSearchRequest, SearchDomains};
use crate::utils::error::{GearError, Result};
use crate::utils::validation::{
    validate_non_empty, validate_non_negative, validate_positive, validate_tooth_counts, Validate,
};

impl Validate for ClimbProfile {
    fn validate(&self) -> Result<()> {
        validate_positive("mass_kg", self.mass_kg)?;
        validate_non_negative("elevation_gain_m", self.elevation_gain_m)?;
        validate_positive("climb_length_km", self.climb_length_km)?;
        Ok(())
    }
}

impl Validate for SearchDomains {
    fn validate(&self) -> Result<()> {
        validate_tooth_counts("chainrings", &self.chainrings)?;
        validate_tooth_counts("sprockets", &self.sprockets)?;
        validate_non_empty("cadences", &self.cadences)?;
        Ok(())
    }
}

impl Validate for GearSearchRequest {
    fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        validate_positive("target_power_w", self.target_power_w)?;
        validate_positive("wheel_circumference_m", self.wheel_circumference_m)?;
        self.domains.validate()?;
        Ok(())
    }
}

/// Best-so-far accumulator, local to one search call.
struct Leader {
    deviation_w: f64,
    chainring_teeth: u32,
    sprocket_teeth: u32,
    cadence_rpm: u32,
    gear_ratio: f64,
    speed_ms: f64,
    power_w: f64,
}

/// Exhaustively evaluates every chainring × sprocket × cadence combination and
/// returns the one whose implied power is closest to the target.
///
/// Iteration is chainring-major, then sprocket, then cadence. The leader is only
/// replaced on a strictly smaller deviation, so among equal deviations the
/// first candidate in that order is kept.
pub fn find_optimal_gear(request: &GearSearchRequest) -> Result<BestResult> {
    request.validate()?;

    let mass_kg = request.profile.mass_kg;
    let circumference = request.wheel_circumference_m;
    let target = request.target_power_w;
    let gradient_pct = request.profile.gradient_pct();

    let mut leader: Option<Leader> = None;
    let mut evaluated = 0usize;

    for &chainring in &request.domains.chainrings {
        for &sprocket in &request.domains.sprockets {
            let gear_ratio = physics::gear_ratio(chainring, sprocket);

            for &cadence in &request.domains.cadences {
                let estimate =
                    physics::estimate(mass_kg, gradient_pct, cadence, gear_ratio, circumference);
                let deviation_w = (estimate.power_w - target).abs();
                evaluated += 1;

                let improves = leader
                    .as_ref()
                    .map_or(true, |best| deviation_w < best.deviation_w);

                if improves {
                    leader = Some(Leader {
                        deviation_w,
                        chainring_teeth: chainring,
                        sprocket_teeth: sprocket,
                        cadence_rpm: cadence,
                        gear_ratio,
                        speed_ms: estimate.speed_ms,
                        power_w: estimate.power_w,
                    });
                }
            }
        }
    }

    // 驗證過的 domains 不會是空的，這裡只是保險
    let best = leader.ok_or_else(|| {
        GearError::invalid_input("domains", "[]", "Search domains produced no candidates")
    })?;

    Ok(BestResult {
        cadence_rpm: best.cadence_rpm,
        gear_ratio: best.gear_ratio,
        speed_kmh: physics::ms_to_kmh(best.speed_ms),
        chainring_teeth: best.chainring_teeth,
        sprocket_teeth: best.sprocket_teeth,
        power_w: best.power_w,
        deviation_w: best.deviation_w,
        gradient_pct,
        evaluated_candidates: evaluated,
    })
}
