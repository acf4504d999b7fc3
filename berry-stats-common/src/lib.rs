pub mod config;
pub use config::{Config, HistogramConfig, ProviderConfig, StatsConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BerryStatsError {
    /// transport failure or non-success status from the data provider
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// payload could not be parsed into the expected shape
    #[error("provider data error: {0}")]
    ProviderData(String),
    #[error("catalog is empty, statistics are undefined")]
    EmptyCatalog,
    #[error("render error: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BerryStatsError>;

/// numeric berry attributes the aggregator can track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BerryAttribute {
    GrowthTime,
    MaxHarvest,
    NaturalGiftPower,
    Size,
    Smoothness,
    SoilDryness,
}

impl BerryAttribute {
    pub const ALL: [BerryAttribute; 6] = [
        BerryAttribute::GrowthTime,
        BerryAttribute::MaxHarvest,
        BerryAttribute::NaturalGiftPower,
        BerryAttribute::Size,
        BerryAttribute::Smoothness,
        BerryAttribute::SoilDryness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BerryAttribute::GrowthTime => "growth_time",
            BerryAttribute::MaxHarvest => "max_harvest",
            BerryAttribute::NaturalGiftPower => "natural_gift_power",
            BerryAttribute::Size => "size",
            BerryAttribute::Smoothness => "smoothness",
            BerryAttribute::SoilDryness => "soil_dryness",
        }
    }
}

impl fmt::Display for BerryAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BerryAttribute {
    type Err = BerryStatsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| BerryStatsError::Config(format!("unknown berry attribute: {s}")))
    }
}
