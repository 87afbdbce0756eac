use crate::core::RequestSource;
use crate::domain::model::{BestResult, ClimbProfile, GearSearchRequest, SearchDomains, WheelSize};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Lambda event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaRequest {
    pub mass_kg: f64,
    pub elevation_gain_m: f64,
    pub climb_length_km: f64,
    pub target_power_w: f64,
    pub wheel: Option<WheelSize>,
    pub wheel_circumference_m: Option<f64>,
    pub chainrings: Option<Vec<u32>>,
    pub sprockets: Option<Vec<u32>>,
    pub cadences: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaResponse {
    pub message: String,
    pub cadence_rpm: u32,
    pub gear_ratio: f64,
    pub speed_kmh: f64,
    pub chainring_teeth: u32,
    pub sprocket_teeth: u32,
    pub power_w: f64,
    pub gradient_pct: f64,
}

impl LambdaRequest {
    /// 沒有指定輪徑時，使用 DEFAULT_WHEEL 環境變數，再退回 700x25c
    fn resolve_circumference(&self) -> Result<f64> {
        if let Some(circumference) = self.wheel_circumference_m {
            return Ok(circumference);
        }

        let wheel = match self.wheel {
            Some(wheel) => wheel,
            None => match env::var("DEFAULT_WHEEL") {
                Ok(label) => label.parse::<WheelSize>()?,
                Err(_) => WheelSize::default(),
            },
        };
        Ok(wheel.circumference_m())
    }
}

impl RequestSource for LambdaRequest {
    fn search_request(&self) -> Result<GearSearchRequest> {
        let profile = ClimbProfile::new(self.mass_kg, self.elevation_gain_m, self.climb_length_km);
        let domains = SearchDomains::with_overrides(
            self.chainrings.clone(),
            self.sprockets.clone(),
            self.cadences.clone(),
        );

        Ok(
            GearSearchRequest::new(profile, self.target_power_w, self.resolve_circumference()?)
                .with_domains(domains),
        )
    }
}

impl From<&BestResult> for LambdaResponse {
    fn from(result: &BestResult) -> Self {
        Self {
            message: format!(
                "Ride {}x{} at {} rpm",
                result.chainring_teeth, result.sprocket_teeth, result.cadence_rpm
            ),
            cadence_rpm: result.cadence_rpm,
            gear_ratio: result.gear_ratio,
            speed_kmh: result.speed_kmh,
            chainring_teeth: result.chainring_teeth,
            sprocket_teeth: result.sprocket_teeth,
            power_w: result.power_w,
            gradient_pct: result.gradient_pct,
        }
    }
}
