use crate::core::gear_table::{
    GearTable, DEFAULT_MIN_RATIO, DEFAULT_TABLE_CHAINRINGS, DEFAULT_TABLE_SPROCKETS,
};
use crate::core::RequestSource;
use crate::domain::model::{ClimbProfile, DomainSpec, GearSearchRequest, SearchDomains, WheelSize};
use crate::utils::error::{GearError, Result};
use crate::utils::validation::{validate_output_formats, validate_path, validate_positive, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub climb: ClimbConfig,
    pub rider: RiderConfig,
    pub wheel: Option<WheelConfig>,
    pub domains: Option<DomainsConfig>,
    pub table: Option<TableConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimbConfig {
    pub name: Option<String>,
    pub mass_kg: f64,
    pub elevation_gain_m: f64,
    pub climb_length_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderConfig {
    pub target_power_w: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelConfig {
    pub size: Option<WheelSize>,
    pub circumference_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainsConfig {
    pub chainrings: Option<DomainSpec>,
    pub sprockets: Option<DomainSpec>,
    pub cadences: Option<DomainSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub chainrings: Option<DomainSpec>,
    pub sprockets: Option<DomainSpec>,
    pub min_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub filename: Option<String>,
}

fn resolve_domain(spec: Option<&DomainSpec>, field_name: &str) -> Result<Option<Vec<u32>>> {
    spec.map(|spec| spec.values(field_name)).transpose()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GearError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RIDER_MASS})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GearError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得輪圈周長，明確的 circumference_m 優先於 size
    pub fn wheel_circumference_m(&self) -> f64 {
        match &self.wheel {
            Some(WheelConfig {
                circumference_m: Some(circumference),
                ..
            }) => *circumference,
            Some(WheelConfig {
                size: Some(size), ..
            }) => size.circumference_m(),
            _ => WheelSize::default().circumference_m(),
        }
    }

    pub fn profile(&self) -> ClimbProfile {
        ClimbProfile::new(
            self.climb.mass_kg,
            self.climb.elevation_gain_m,
            self.climb.climb_length_km,
        )
    }

    pub fn climb_name(&self) -> &str {
        self.climb.name.as_deref().unwrap_or("unnamed climb")
    }

    /// 未設定的軸使用預設範圍
    pub fn search_domains(&self) -> Result<SearchDomains> {
        let Some(domains) = &self.domains else {
            return Ok(SearchDomains::default());
        };

        Ok(SearchDomains::with_overrides(
            resolve_domain(domains.chainrings.as_ref(), "domains.chainrings")?,
            resolve_domain(domains.sprockets.as_ref(), "domains.sprockets")?,
            resolve_domain(domains.cadences.as_ref(), "domains.cadences")?,
        ))
    }

    pub fn gear_table(&self) -> Result<GearTable> {
        let table = self.table.as_ref();
        let chainrings = resolve_domain(table.and_then(|t| t.chainrings.as_ref()), "table.chainrings")?
            .unwrap_or_else(|| DEFAULT_TABLE_CHAINRINGS.collect());
        let sprockets = resolve_domain(table.and_then(|t| t.sprockets.as_ref()), "table.sprockets")?
            .unwrap_or_else(|| DEFAULT_TABLE_SPROCKETS.collect());
        let min_ratio = table
            .and_then(|t| t.min_ratio)
            .unwrap_or(DEFAULT_MIN_RATIO);

        GearTable::build(&chainrings, &sprockets, min_ratio)
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }

    pub fn output_formats(&self) -> &[String] {
        self.output
            .as_ref()
            .map(|o| o.formats.as_slice())
            .unwrap_or(&[])
    }

    pub fn output_filename(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.filename.as_deref())
            .unwrap_or("gear_table")
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.search_request()?.validate()?;

        if let Some(wheel) = &self.wheel {
            if let Some(circumference) = wheel.circumference_m {
                validate_positive("wheel.circumference_m", circumference)?;
            }
        }

        if let Some(output) = &self.output {
            validate_path("output.path", &output.path)?;
            validate_output_formats("output.formats", &output.formats)?;
            validate_path("output.filename", self.output_filename())?;
            self.gear_table()?;
        }

        Ok(())
    }
}

impl RequestSource for TomlConfig {
    fn search_request(&self) -> Result<GearSearchRequest> {
        Ok(GearSearchRequest::new(
            self.profile(),
            self.rider.target_power_w,
            self.wheel_circumference_m(),
        )
        .with_domains(self.search_domains()?))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"
[climb]
name = "Col de Test"
mass_kg = 75
elevation_gain_m = 500
climb_length_km = 5.0

[rider]
target_power_w = 250
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.climb_name(), "Col de Test");
        assert_eq!(config.climb.mass_kg, 75.0);
        assert_eq!(config.wheel_circumference_m(), 2.096);
        assert_eq!(config.search_domains().unwrap(), SearchDomains::default());
        assert!(config.output_formats().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wheel_size_and_override() {
        let with_size = format!("{}\n[wheel]\nsize = \"700x32c\"\n", BASIC);
        let config = TomlConfig::from_toml_str(&with_size).unwrap();
        assert_eq!(config.wheel_circumference_m(), 2.150);

        let with_both = format!(
            "{}\n[wheel]\nsize = \"700x32c\"\ncircumference_m = 2.2\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&with_both).unwrap();
        assert_eq!(config.wheel_circumference_m(), 2.2);
    }

    #[test]
    fn test_domains_accept_lists_and_ranges() {
        let content = format!(
            "{}\n[domains]\nchainrings = [34, 50]\ncadences = {{ start = 60, end = 100, step = 20 }}\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();
        let domains = config.search_domains().unwrap();

        assert_eq!(domains.chainrings, vec![34, 50]);
        assert_eq!(domains.sprockets, SearchDomains::default().sprockets);
        assert_eq!(domains.cadences, vec![60, 80, 100]);
    }

    #[test]
    fn test_empty_domain_fails_validation() {
        let content = format!("{}\n[domains]\ncadences = []\n", BASIC);
        let config = TomlConfig::from_toml_str(&content).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, GearError::InvalidInput { ref field, .. } if field == "cadences"));
    }

    #[test]
    fn test_invalid_output_format() {
        let content = format!(
            "{}\n[output]\npath = \"./out\"\nformats = [\"csv\", \"xlsx\"]\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[climb\nmass_kg = ").unwrap_err();
        assert!(matches!(err, GearError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CLIMB_GEAR_TEST_POWER", "310");

        let content = r#"
[climb]
mass_kg = 68
elevation_gain_m = 900
climb_length_km = 12.0

[rider]
target_power_w = ${CLIMB_GEAR_TEST_POWER}
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        assert_eq!(config.rider.target_power_w, 310.0);

        std::env::remove_var("CLIMB_GEAR_TEST_POWER");
    }
}
