use crate::core::physics;
use crate::utils::error::{GearError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CHAINRINGS: std::ops::RangeInclusive<u32> = 24..=68;
pub const DEFAULT_SPROCKETS: std::ops::RangeInclusive<u32> = 10..=52;
pub const DEFAULT_CADENCE_MIN: u32 = 50;
pub const DEFAULT_CADENCE_MAX: u32 = 130;
pub const DEFAULT_CADENCE_STEP: usize = 5;

/// Rider plus bike on a single average gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimbProfile {
    pub mass_kg: f64,
    pub elevation_gain_m: f64,
    pub climb_length_km: f64,
}

impl ClimbProfile {
    pub fn new(mass_kg: f64, elevation_gain_m: f64, climb_length_km: f64) -> Self {
        Self {
            mass_kg,
            elevation_gain_m,
            climb_length_km,
        }
    }

    /// Percent rise over run. Callers must have validated `climb_length_km > 0`.
    pub fn gradient_pct(&self) -> f64 {
        physics::gradient_pct(self.elevation_gain_m, self.climb_length_km)
    }

    pub fn climb_length_m(&self) -> f64 {
        self.climb_length_km * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrivetrainCandidate {
    pub chainring_teeth: u32,
    pub sprocket_teeth: u32,
    pub cadence_rpm: u32,
}

impl DrivetrainCandidate {
    pub fn new(chainring_teeth: u32, sprocket_teeth: u32, cadence_rpm: u32) -> Self {
        Self {
            chainring_teeth,
            sprocket_teeth,
            cadence_rpm,
        }
    }

    pub fn gear_ratio(&self) -> f64 {
        physics::gear_ratio(self.chainring_teeth, self.sprocket_teeth)
    }
}

/// Supported tyre sizes and their rolling circumference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WheelSize {
    #[default]
    #[serde(rename = "700x25c")]
    Road700x25,
    #[serde(rename = "700x28c")]
    Road700x28,
    #[serde(rename = "700x32c")]
    Road700x32,
    #[serde(rename = "650bx47")]
    Gravel650bx47,
}

impl WheelSize {
    pub const ALL: [WheelSize; 4] = [
        WheelSize::Road700x25,
        WheelSize::Road700x28,
        WheelSize::Road700x32,
        WheelSize::Gravel650bx47,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WheelSize::Road700x25 => "700x25c",
            WheelSize::Road700x28 => "700x28c",
            WheelSize::Road700x32 => "700x32c",
            WheelSize::Gravel650bx47 => "650bx47",
        }
    }

    pub fn circumference_m(&self) -> f64 {
        match self {
            WheelSize::Road700x25 => 2.096,
            WheelSize::Road700x28 => 2.136,
            WheelSize::Road700x32 => 2.150,
            WheelSize::Gravel650bx47 => 2.000,
        }
    }
}

impl fmt::Display for WheelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3}m)", self.label(), self.circumference_m())
    }
}

impl FromStr for WheelSize {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "");
        WheelSize::ALL
            .into_iter()
            .find(|wheel| wheel.label() == normalized)
            .ok_or_else(|| {
                let labels: Vec<&str> = WheelSize::ALL.iter().map(|w| w.label()).collect();
                GearError::invalid_input(
                    "wheel",
                    s,
                    format!("Unknown wheel size. Valid sizes: {}", labels.join(", ")),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub speed_ms: f64,
    pub power_w: f64,
}

/// The three discrete axes the search enumerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDomains {
    pub chainrings: Vec<u32>,
    pub sprockets: Vec<u32>,
    pub cadences: Vec<u32>,
}

impl Default for SearchDomains {
    fn default() -> Self {
        Self {
            chainrings: DEFAULT_CHAINRINGS.collect(),
            sprockets: DEFAULT_SPROCKETS.collect(),
            cadences: (DEFAULT_CADENCE_MIN..=DEFAULT_CADENCE_MAX)
                .step_by(DEFAULT_CADENCE_STEP)
                .collect(),
        }
    }
}

impl SearchDomains {
    pub fn candidate_count(&self) -> usize {
        self.chainrings.len() * self.sprockets.len() * self.cadences.len()
    }

    /// Replaces each axis that has an override, keeping the defaults otherwise.
    pub fn with_overrides(
        chainrings: Option<Vec<u32>>,
        sprockets: Option<Vec<u32>>,
        cadences: Option<Vec<u32>>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            chainrings: chainrings.unwrap_or(defaults.chainrings),
            sprockets: sprockets.unwrap_or(defaults.sprockets),
            cadences: cadences.unwrap_or(defaults.cadences),
        }
    }
}

/// A domain written either as an explicit list or as an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainSpec {
    List(Vec<u32>),
    Range {
        start: u32,
        end: u32,
        #[serde(default = "default_step")]
        step: u32,
    },
}

fn default_step() -> u32 {
    1
}

impl DomainSpec {
    pub fn values(&self, field_name: &str) -> Result<Vec<u32>> {
        match self {
            DomainSpec::List(values) => Ok(values.clone()),
            DomainSpec::Range { start, end, step } => {
                if *step == 0 {
                    return Err(GearError::invalid_input(
                        field_name,
                        step,
                        "Range step must be at least 1",
                    ));
                }
                if start > end {
                    return Err(GearError::invalid_input(
                        field_name,
                        format!("{}..={}", start, end),
                        "Range start must not exceed range end",
                    ));
                }
                Ok((*start..=*end).step_by(*step as usize).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSearchRequest {
    pub profile: ClimbProfile,
    pub target_power_w: f64,
    pub wheel_circumference_m: f64,
    #[serde(default)]
    pub domains: SearchDomains,
}

impl GearSearchRequest {
    pub fn new(profile: ClimbProfile, target_power_w: f64, wheel_circumference_m: f64) -> Self {
        Self {
            profile,
            target_power_w,
            wheel_circumference_m,
            domains: SearchDomains::default(),
        }
    }

    pub fn with_domains(mut self, domains: SearchDomains) -> Self {
        self.domains = domains;
        self
    }
}

/// Winning candidate of a search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestResult {
    pub cadence_rpm: u32,
    pub gear_ratio: f64,
    pub speed_kmh: f64,
    pub chainring_teeth: u32,
    pub sprocket_teeth: u32,
    pub power_w: f64,
    pub deviation_w: f64,
    pub gradient_pct: f64,
    pub evaluated_candidates: usize,
}
