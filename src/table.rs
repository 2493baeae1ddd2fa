//! Flat-file input and output for trajectory tables.

use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

pub const TRAJECTORY_ID: &str = "trajectory_id";
pub const NODE_ID: &str = "node_id";
pub const TIMESTAMP: &str = "timestamp";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const SPEED_LIMIT: &str = "speed_limit";

/// Required input columns, in lookup order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    TRAJECTORY_ID,
    NODE_ID,
    TIMESTAMP,
    LATITUDE,
    LONGITUDE,
    SPEED_LIMIT,
];

/// One data row as read from the input, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row number; the header is row 0.
    pub row: usize,
    pub trajectory_id: String,
    pub node_id: String,
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
    pub speed_limit: String,
}

/// A reprojected sample. `x`/`y` are meters in the target projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub trajectory_id: String,
    pub node_id: String,
    pub timestamp: String,
    pub x: f64,
    pub y: f64,
    pub speed_limit: String,
}

/// Header labels used for the projected coordinate columns on output.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLabels {
    /// Keep `latitude`/`longitude`, holding projected y/x respectively.
    #[default]
    Geographic,
    /// Use `northing`/`easting`.
    Projected,
}

impl ColumnLabels {
    pub fn header(self) -> [&'static str; 6] {
        match self {
            Self::Geographic => REQUIRED_COLUMNS,
            Self::Projected => [
                TRAJECTORY_ID,
                NODE_ID,
                TIMESTAMP,
                "northing",
                "easting",
                SPEED_LIMIT,
            ],
        }
    }
}

struct ColumnIndex {
    trajectory_id: usize,
    node_id: usize,
    timestamp: usize,
    latitude: usize,
    longitude: usize,
    speed_limit: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, AppError> {
        if headers.len() != REQUIRED_COLUMNS.len() {
            return Err(AppError::Schema(format!(
                "expected {} columns, found {}",
                REQUIRED_COLUMNS.len(),
                headers.len()
            )));
        }
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| AppError::Schema(format!("missing column {name}")))
        };
        Ok(Self {
            trajectory_id: find(TRAJECTORY_ID)?,
            node_id: find(NODE_ID)?,
            timestamp: find(TIMESTAMP)?,
            latitude: find(LATITUDE)?,
            longitude: find(LONGITUDE)?,
            speed_limit: find(SPEED_LIMIT)?,
        })
    }
}

/// Read the input table, validating its header.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, AppError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AppError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let field = |column: usize| record.get(column).unwrap_or_default().to_string();
        records.push(RawRecord {
            row: index + 1,
            trajectory_id: field(columns.trajectory_id),
            node_id: field(columns.node_id),
            timestamp: field(columns.timestamp),
            latitude: field(columns.latitude),
            longitude: field(columns.longitude),
            speed_limit: field(columns.speed_limit),
        });
    }

    info!(path = %path.display(), rows = records.len(), "Input table loaded");
    Ok(records)
}

/// Write reprojected points under a fixed header order.
pub fn write_projected_table(
    path: impl AsRef<Path>,
    points: &[Point],
    labels: ColumnLabels,
) -> Result<(), AppError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(labels.header())?;
    for point in points {
        let y = point.y.to_string();
        let x = point.x.to_string();
        writer.write_record([
            point.trajectory_id.as_str(),
            point.node_id.as_str(),
            point.timestamp.as_str(),
            y.as_str(),
            x.as_str(),
            point.speed_limit.as_str(),
        ])?;
    }
    writer.flush()?;

    debug!(?labels, "Projected header written");
    info!(path = %path.display(), rows = points.len(), "Projected table written");
    Ok(())
}
