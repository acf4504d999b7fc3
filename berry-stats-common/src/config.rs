use crate::{BerryAttribute, BerryStatsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".into()
}
fn default_page_size() -> usize {
    20
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_attributes")]
    pub attributes: Vec<BerryAttribute>,
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,
}

fn default_attributes() -> Vec<BerryAttribute> {
    vec![BerryAttribute::GrowthTime]
}
fn default_bins() -> usize {
    10
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            attributes: default_attributes(),
            histogram_bins: default_bins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "default_histogram_attribute")]
    pub attribute: BerryAttribute,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub title: Option<String>, // falls back to "<attribute> histogram"
}

fn default_histogram_attribute() -> BerryAttribute {
    BerryAttribute::GrowthTime
}
fn default_output_path() -> PathBuf {
    PathBuf::from("static/imgs/histogram.png")
}
fn default_width() -> u32 {
    1200
}
fn default_height() -> u32 {
    800
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            attribute: default_histogram_attribute(),
            output_path: default_output_path(),
            width: default_width(),
            height: default_height(),
            title: None,
        }
    }
}

impl HistogramConfig {
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} histogram", self.attribute))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("berry-stats")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("BERRY_STATS_CONFIG") {
            PathBuf::from(env_path) // $BERRY_STATS_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&std::fs::read_to_string(&path)?)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| BerryStatsError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.provider.page_size == 0 {
            return Err(BerryStatsError::Config("provider.page_size must be > 0".into()));
        }
        if self.stats.histogram_bins == 0 {
            return Err(BerryStatsError::Config("stats.histogram_bins must be > 0".into()));
        }
        if self.stats.attributes.is_empty() {
            return Err(BerryStatsError::Config("stats.attributes must not be empty".into()));
        }
        if self.histogram.width == 0 || self.histogram.height == 0 {
            return Err(BerryStatsError::Config("histogram dimensions must be > 0".into()));
        }
        Ok(())
    }
}
