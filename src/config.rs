use crate::projection::{Hemisphere, ProjectionKind};
use crate::table::ColumnLabels;
use crate::trajectory::aggregator::SpeedTieBreak;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_INPUT_PATH: &str = "trajectory_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "trajectory_data_projected.csv";
/// GDA2020 / MGA zone 55 (EPSG:7855).
pub const DEFAULT_ZONE: u8 = 55;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub input: Option<InputSection>,
    #[serde(default)]
    pub output: Option<OutputSection>,
    #[serde(default)]
    pub projection: Option<ProjectionSection>,
    #[serde(default)]
    pub statistics: Option<StatisticsSection>,
    #[serde(default)]
    pub report: Option<ReportSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSection {
    pub path: Option<PathBuf>,
    /// Header labels for the projected coordinate columns (default: geographic)
    pub column_labels: Option<ColumnLabels>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectionSection {
    pub kind: Option<ProjectionKind>,
    /// Zone number, 1..=60 (default: 55)
    pub zone: Option<u8>,
    /// Only consulted for UTM (default: south)
    pub hemisphere: Option<Hemisphere>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroSegmentPolicy {
    /// Warn and leave the sampling rate empty.
    #[default]
    Skip,
    /// Abort the run with a division-by-zero error.
    Fail,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatisticsSection {
    pub speed_tie_break: Option<SpeedTieBreak>,
    pub zero_segment: Option<ZeroSegmentPolicy>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSection {
    pub json_path: Option<PathBuf>,
}

/// Projection parameters after defaults have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionSettings {
    pub kind: ProjectionKind,
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        let zone = self.projection_settings().zone;
        if !(1..=60).contains(&zone) {
            return Err(ConfigError::Invalid(format!(
                "projection zone must be between 1 and 60, got {zone}"
            )));
        }
        Ok(())
    }

    pub fn input_path(&self) -> &Path {
        self.input
            .as_ref()
            .and_then(|s| s.path.as_deref())
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new(DEFAULT_INPUT_PATH))
    }

    /// Replace the input path, e.g. from the command line.
    pub fn set_input_path(&mut self, path: PathBuf) {
        self.input = Some(InputSection { path: Some(path) });
    }

    pub fn output_path(&self) -> &Path {
        self.output
            .as_ref()
            .and_then(|s| s.path.as_deref())
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new(DEFAULT_OUTPUT_PATH))
    }

    pub fn column_labels(&self) -> ColumnLabels {
        self.output
            .as_ref()
            .and_then(|s| s.column_labels)
            .unwrap_or_default()
    }

    pub fn projection_settings(&self) -> ProjectionSettings {
        let section = self.projection.as_ref();
        ProjectionSettings {
            kind: section.and_then(|s| s.kind).unwrap_or_default(),
            zone: section.and_then(|s| s.zone).unwrap_or(DEFAULT_ZONE),
            hemisphere: section.and_then(|s| s.hemisphere).unwrap_or_default(),
        }
    }

    pub fn speed_tie_break(&self) -> SpeedTieBreak {
        self.statistics
            .as_ref()
            .and_then(|s| s.speed_tie_break)
            .unwrap_or_default()
    }

    pub fn zero_segment_policy(&self) -> ZeroSegmentPolicy {
        self.statistics
            .as_ref()
            .and_then(|s| s.zero_segment)
            .unwrap_or_default()
    }

    /// Returns the JSON report path, treating an empty path as unset.
    pub fn json_report_path(&self) -> Option<&Path> {
        let path = self.report.as_ref()?.json_path.as_deref()?;
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }
}
