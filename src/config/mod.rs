pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::RequestSource;
#[cfg(feature = "cli")]
use crate::domain::model::{ClimbProfile, GearSearchRequest, SearchDomains, WheelSize};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "climb-gear")]
#[command(about = "Find the gear and cadence that hold a target power on a climb")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Search every chainring, sprocket and cadence for the target power
    Search(SearchArgs),
    /// Print or export the chainring x sprocket ratio table
    Table(TableArgs),
    /// Convert cadence in one gear to ground speed
    Speed(SpeedArgs),
    /// Time and power for riding a climb in one gear
    Climb(ClimbArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct WheelArgs {
    /// Tyre size: 700x25c, 700x28c, 700x32c or 650bx47
    #[arg(long, default_value = "700x25c")]
    pub wheel: WheelSize,

    /// Raw wheel circumference in meters, overrides --wheel
    #[arg(long)]
    pub circumference_m: Option<f64>,
}

#[cfg(feature = "cli")]
impl WheelArgs {
    pub fn circumference_m(&self) -> f64 {
        self.circumference_m
            .unwrap_or_else(|| self.wheel.circumference_m())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ClimbArgs {
    #[arg(long)]
    pub mass_kg: f64,

    #[arg(long)]
    pub elevation_gain_m: f64,

    #[arg(long)]
    pub climb_length_km: f64,

    #[arg(long)]
    pub chainring: u32,

    #[arg(long)]
    pub sprocket: u32,

    #[arg(long, conflicts_with = "target_power_w", required_unless_present = "target_power_w")]
    pub cadence: Option<u32>,

    /// Solve for the cadence that holds this power instead
    #[arg(long)]
    pub target_power_w: Option<f64>,

    #[command(flatten)]
    pub wheel: WheelArgs,
}

#[cfg(feature = "cli")]
impl ClimbArgs {
    pub fn profile(&self) -> ClimbProfile {
        ClimbProfile::new(self.mass_kg, self.elevation_gain_m, self.climb_length_km)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub mass_kg: f64,

    #[arg(long)]
    pub elevation_gain_m: f64,

    #[arg(long)]
    pub climb_length_km: f64,

    #[arg(long)]
    pub target_power_w: f64,

    #[command(flatten)]
    pub wheel: WheelArgs,

    /// Chainring tooth counts to try (default 24..=68)
    #[arg(long, value_delimiter = ',')]
    pub chainrings: Option<Vec<u32>>,

    /// Sprocket tooth counts to try (default 10..=52)
    #[arg(long, value_delimiter = ',')]
    pub sprockets: Option<Vec<u32>>,

    /// Cadences in rpm to try (default 50..=130 step 5)
    #[arg(long, value_delimiter = ',')]
    pub cadences: Option<Vec<u32>>,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,
}

#[cfg(feature = "cli")]
impl RequestSource for SearchArgs {
    fn search_request(&self) -> Result<GearSearchRequest> {
        let profile = ClimbProfile::new(self.mass_kg, self.elevation_gain_m, self.climb_length_km);
        let domains = SearchDomains::with_overrides(
            self.chainrings.clone(),
            self.sprockets.clone(),
            self.cadences.clone(),
        );

        Ok(
            GearSearchRequest::new(profile, self.target_power_w, self.wheel.circumference_m())
                .with_domains(domains),
        )
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct TableArgs {
    #[arg(long, value_delimiter = ',')]
    pub chainrings: Option<Vec<u32>>,

    #[arg(long, value_delimiter = ',')]
    pub sprockets: Option<Vec<u32>>,

    /// Ratios at or above this value are highlighted
    #[arg(long, default_value = "2.5")]
    pub min_ratio: f64,

    /// Export formats (csv, tsv, json); prints to the terminal when empty
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "gear_table")]
    pub filename: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SpeedArgs {
    #[arg(long)]
    pub chainring: u32,

    #[arg(long)]
    pub sprocket: u32,

    #[arg(long)]
    pub cadence: u32,

    #[command(flatten)]
    pub wheel: WheelArgs,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_defaults() {
        let config = CliConfig::try_parse_from([
            "climb-gear",
            "search",
            "--mass-kg",
            "75",
            "--elevation-gain-m",
            "500",
            "--climb-length-km",
            "5",
            "--target-power-w",
            "250",
        ])
        .unwrap();

        let Command::Search(args) = config.command else {
            panic!("expected search command");
        };
        let request = args.search_request().unwrap();

        assert_eq!(request.wheel_circumference_m, 2.096);
        assert_eq!(request.domains, SearchDomains::default());
        assert!(!config.verbose);
    }

    #[test]
    fn test_search_args_overrides() {
        let config = CliConfig::try_parse_from([
            "climb-gear",
            "--verbose",
            "search",
            "--mass-kg",
            "75",
            "--elevation-gain-m",
            "500",
            "--climb-length-km",
            "5",
            "--target-power-w",
            "250",
            "--wheel",
            "650bx47",
            "--chainrings",
            "34,50",
            "--cadences",
            "80,90",
        ])
        .unwrap();

        assert!(config.verbose);
        let Command::Search(args) = config.command else {
            panic!("expected search command");
        };
        let request = args.search_request().unwrap();

        assert_eq!(request.wheel_circumference_m, 2.000);
        assert_eq!(request.domains.chainrings, vec![34, 50]);
        assert_eq!(request.domains.cadences, vec![80, 90]);
        assert_eq!(request.domains.sprockets.len(), 43);
    }

    #[test]
    fn test_unknown_wheel_is_rejected() {
        let parsed = CliConfig::try_parse_from([
            "climb-gear", "speed", "--chainring", "50", "--sprocket", "17", "--cadence", "90",
            "--wheel", "29er",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_climb_requires_cadence_or_power() {
        let base = [
            "climb-gear",
            "climb",
            "--mass-kg",
            "75",
            "--elevation-gain-m",
            "500",
            "--climb-length-km",
            "5",
            "--chainring",
            "34",
            "--sprocket",
            "28",
        ];
        assert!(CliConfig::try_parse_from(base).is_err());

        let mut with_power = base.to_vec();
        with_power.extend(["--target-power-w", "250"]);
        assert!(CliConfig::try_parse_from(with_power).is_ok());

        let mut with_both = base.to_vec();
        with_both.extend(["--target-power-w", "250", "--cadence", "80"]);
        assert!(CliConfig::try_parse_from(with_both).is_err());
    }
}
