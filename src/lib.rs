pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::cli::LocalStorage;
pub use config::lambda::{LambdaRequest, LambdaResponse};
pub use config::toml_config::TomlConfig;
pub use core::{engine::GearFinder, gear_table::GearTable, search::find_optimal_gear};
pub use domain::model::{
    BestResult, ClimbProfile, DrivetrainCandidate, GearSearchRequest, SearchDomains, WheelSize,
};
pub use utils::error::{GearError, Result};
