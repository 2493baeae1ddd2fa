//! Batch driver: read, reproject, segment, aggregate, summarize, write.

use crate::config::Config;
use crate::error::AppError;
use crate::projection::model::Projection;
use crate::projection::{create_projection, reproject};
use crate::report::{self, SummaryReport};
use crate::table::{self, Point, RawRecord};
use crate::trajectory::{Aggregator, Segmenter, SpeedTieBreak, TrajectoryStats};
use tracing::info;

/// Reproject every record, failing on the first bad coordinate.
pub fn reproject_records(
    projection: &dyn Projection,
    records: &[RawRecord],
) -> Result<Vec<Point>, AppError> {
    records
        .iter()
        .map(|record| -> Result<Point, AppError> {
            let (x, y) = reproject(projection, record.row, &record.longitude, &record.latitude)?;
            Ok(Point {
                trajectory_id: record.trajectory_id.clone(),
                node_id: record.node_id.clone(),
                timestamp: record.timestamp.clone(),
                x,
                y,
                speed_limit: record.speed_limit.clone(),
            })
        })
        .collect()
}

pub fn compute_statistics(
    points: &[Point],
    tie_break: SpeedTieBreak,
) -> Result<Vec<TrajectoryStats>, AppError> {
    let mut aggregator = Aggregator::new(tie_break);
    aggregator.consume(Segmenter::new(points))?;
    Ok(aggregator.finish())
}

/// Run the whole pass. Nothing is written unless every stage succeeds.
pub fn run(config: &Config) -> Result<SummaryReport, AppError> {
    let records = table::read_table(config.input_path())?;

    let projection = create_projection(&config.projection_settings());
    let points = reproject_records(projection.as_ref(), &records)?;
    info!(
        projection = projection.name(),
        rows = points.len(),
        "Coordinates reprojected"
    );

    let stats = compute_statistics(&points, config.speed_tie_break())?;
    info!(trajectories = stats.len(), "Trajectory statistics computed");

    let summary = report::summarize(&stats, projection.name(), config.zero_segment_policy())?;

    table::write_projected_table(config.output_path(), &points, config.column_labels())?;
    if let Some(path) = config.json_report_path() {
        summary.write_json(path)?;
    }

    Ok(summary)
}
