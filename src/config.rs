use crate::errors::{AppError, AppResult};
use crate::types::{Frequency, WorkflowStage};
use chrono::NaiveDate;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys use `__`, e.g.
/// `DELIVERY_METRICS__DEFECTS__WINDOW=6`
pub const ENV_PREFIX: &str = "DELIVERY_METRICS";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_NAME: &str = "metrics";

/// Application configuration loaded from a TOML file and environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fixed evaluation date for open items; defaults to today
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub committed_column: Option<String>,
    #[serde(default)]
    pub done_column: Option<String>,
    #[serde(default)]
    pub backlog_column: Option<String>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub style: StyleConfig,
    /// Ordered workflow stages
    #[serde(default)]
    pub workflow: Vec<WorkflowStage>,
    #[serde(default)]
    pub defects: DefectsConfig,
    #[serde(default)]
    pub net_flow: NetFlowConfig,
    #[serde(default)]
    pub waste: WasteConfig,
}

/// Where issue and cumulative-flow data are read from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON issue dump keyed by query
    #[serde(default)]
    pub issues: Option<PathBuf>,
    /// Cumulative flow CSV
    #[serde(default)]
    pub cfd: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory for relative chart paths
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_palette")]
    pub palette: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
        }
    }
}

/// One defect breakdown dimension (priority, type or environment)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionConfig {
    /// Issue field holding the dimension's value
    #[serde(default)]
    pub field: Option<String>,
    /// Known values, in display order; empty keeps every value
    #[serde(default)]
    pub values: Vec<String>,
    /// Percentage below which a value is folded into "Others"
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub chart: Option<PathBuf>,
    #[serde(default)]
    pub chart_title: Option<String>,
    #[serde(default)]
    pub chart_palette: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefectsConfig {
    #[serde(default)]
    pub query: Option<String>,
    /// Number of trailing months to show
    #[serde(default)]
    pub window: Option<usize>,
    #[serde(default)]
    pub priority: DimensionConfig,
    #[serde(default, rename = "type")]
    pub issue_type: DimensionConfig,
    #[serde(default)]
    pub environment: DimensionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetFlowConfig {
    #[serde(default = "default_net_flow_frequency")]
    pub frequency: Frequency,
    #[serde(default)]
    pub window: Option<usize>,
    #[serde(default)]
    pub chart: Option<PathBuf>,
    #[serde(default)]
    pub chart_title: Option<String>,
    #[serde(default)]
    pub chart_palette: Option<String>,
}

impl Default for NetFlowConfig {
    fn default() -> Self {
        Self {
            frequency: default_net_flow_frequency(),
            window: None,
            chart: None,
            chart_title: None,
            chart_palette: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteConfig {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_waste_frequency")]
    pub frequency: Frequency,
    #[serde(default)]
    pub window: Option<usize>,
    #[serde(default)]
    pub chart: Option<PathBuf>,
    #[serde(default)]
    pub chart_title: Option<String>,
    #[serde(default)]
    pub chart_palette: Option<String>,
}

impl Default for WasteConfig {
    fn default() -> Self {
        Self {
            query: None,
            frequency: default_waste_frequency(),
            window: None,
            chart: None,
            chart_title: None,
            chart_palette: None,
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_palette() -> String {
    "default".to_string()
}

fn default_net_flow_frequency() -> Frequency {
    Frequency::Weekly(chrono::Weekday::Mon)
}

fn default_waste_frequency() -> Frequency {
    Frequency::MonthStart
}

impl AppConfig {
    /// Load configuration from a TOML file and environment variables
    ///
    /// With no explicit path, `metrics.toml` in the working directory is used if
    /// present. Environment variables take precedence over file configuration.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let builder = Self::builder_with_defaults()?;
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Parse configuration from TOML text (no environment overrides)
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let config = Self::builder_with_defaults()?
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn builder_with_defaults() -> AppResult<ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("output.directory", ".")?
            .set_default("style.palette", default_palette())?
            .set_default("net_flow.frequency", default_net_flow_frequency().to_string())?
            .set_default("waste.frequency", default_waste_frequency().to_string())?)
    }

    /// Structural sanity checks that apply to every metric
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for stage in &self.workflow {
            if stage.name.trim().is_empty() {
                return Err(AppError::Config(
                    "Workflow stage names must not be empty".to_string(),
                ));
            }
            if !seen.insert(stage.name.as_str()) {
                return Err(AppError::Config(format!(
                    "Workflow stage '{}' is defined more than once",
                    stage.name
                )));
            }
        }

        for (name, dimension) in self.defects.dimensions() {
            if let Some(threshold) = dimension.threshold {
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(AppError::Config(format!(
                        "defects.{}.threshold must be between 0 and 100, got {}",
                        name, threshold
                    )));
                }
            }
        }
        Ok(())
    }

    /// Date used as the end of still-open items
    pub fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Resolve a chart path against the output directory
    pub fn output_path(&self, chart: &Path) -> PathBuf {
        if chart.is_absolute() {
            chart.to_path_buf()
        } else {
            self.output.directory.join(chart)
        }
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml_string(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl DefectsConfig {
    /// The three breakdown dimensions with their configuration key names
    pub fn dimensions(&self) -> [(&'static str, &DimensionConfig); 3] {
        [
            ("priority", &self.priority),
            ("type", &self.issue_type),
            ("environment", &self.environment),
        ]
    }
}
