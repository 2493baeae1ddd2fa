//! Per-trajectory summaries and the global longest-trajectory line.

use crate::config::ZeroSegmentPolicy;
use crate::error::AppError;
use crate::trajectory::{Extremum, TrajectoryStats};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub trajectory_id: String,
    pub occurrence: usize,
    pub total_distance: f64,
    pub segment_count: usize,
    pub total_time: f64,
    /// Mean seconds between samples; `None` when there are no segments.
    pub sampling_rate: Option<f64>,
    pub longest_segment: Option<Extremum>,
    pub min_speed: Option<Extremum>,
    pub max_speed: Option<Extremum>,
}

impl TrajectorySummary {
    /// Id, with the occurrence number appended for repeated runs.
    pub fn label(&self) -> String {
        run_label(&self.trajectory_id, self.occurrence)
    }
}

fn run_label(trajectory_id: &str, occurrence: usize) -> String {
    if occurrence > 1 {
        format!("{trajectory_id}#{occurrence}")
    } else {
        trajectory_id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestTrajectory {
    pub trajectory_id: String,
    pub occurrence: usize,
    pub total_distance: f64,
    /// Meters per second over the whole trajectory.
    pub average_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostSegments {
    pub trajectory_id: String,
    pub occurrence: usize,
    pub segment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub projection: String,
    pub trajectories: Vec<TrajectorySummary>,
    pub total_distance: f64,
    pub longest: Option<LongestTrajectory>,
    /// Trajectory with the most segments, earliest on ties.
    pub most_segments: Option<MostSegments>,
}

pub fn sampling_rate(stats: &TrajectoryStats) -> Result<f64, AppError> {
    if stats.segment_count == 0 {
        return Err(AppError::DivisionByZero("trajectory has no segments"));
    }
    Ok(stats.total_time / stats.segment_count as f64)
}

pub fn average_speed(stats: &TrajectoryStats) -> Result<f64, AppError> {
    if stats.total_time == 0.0 {
        return Err(AppError::DivisionByZero("trajectory total time is zero"));
    }
    Ok(stats.total_distance / stats.total_time)
}

pub fn summarize(
    stats: &[TrajectoryStats],
    projection: &str,
    zero_segment: ZeroSegmentPolicy,
) -> Result<SummaryReport, AppError> {
    let mut trajectories = Vec::with_capacity(stats.len());
    for entry in stats {
        let sampling_rate = match sampling_rate(entry) {
            Ok(rate) => Some(rate),
            Err(err) => match zero_segment {
                ZeroSegmentPolicy::Fail => return Err(err),
                ZeroSegmentPolicy::Skip => {
                    warn!(
                        trajectory_id = %entry.trajectory_id,
                        first_index = entry.first_index,
                        "Trajectory has a single sample, no sampling rate"
                    );
                    None
                }
            },
        };
        trajectories.push(TrajectorySummary {
            trajectory_id: entry.trajectory_id.clone(),
            occurrence: entry.occurrence,
            total_distance: entry.total_distance,
            segment_count: entry.segment_count,
            total_time: entry.total_time,
            sampling_rate,
            longest_segment: entry.max_segment,
            min_speed: entry.min_speed,
            max_speed: entry.max_speed,
        });
    }

    let total_distance = stats
        .iter()
        .fold(0.0, |total, entry| total + entry.total_distance);

    // Earliest wins on ties.
    let longest = stats
        .iter()
        .filter(|entry| entry.segment_count > 0)
        .reduce(|best, entry| {
            if entry.total_distance > best.total_distance {
                entry
            } else {
                best
            }
        })
        .map(|entry| -> Result<LongestTrajectory, AppError> {
            Ok(LongestTrajectory {
                trajectory_id: entry.trajectory_id.clone(),
                occurrence: entry.occurrence,
                total_distance: entry.total_distance,
                average_speed: average_speed(entry)?,
            })
        })
        .transpose()?;

    let most_segments = stats
        .iter()
        .filter(|entry| entry.segment_count > 0)
        .reduce(|best, entry| {
            if entry.segment_count > best.segment_count {
                entry
            } else {
                best
            }
        })
        .map(|entry| MostSegments {
            trajectory_id: entry.trajectory_id.clone(),
            occurrence: entry.occurrence,
            segment_count: entry.segment_count,
        });

    info!(
        trajectories = trajectories.len(),
        total_distance,
        "Statistics summarized"
    );

    Ok(SummaryReport {
        projection: projection.to_string(),
        trajectories,
        total_distance,
        longest,
        most_segments,
    })
}

impl SummaryReport {
    /// Console report, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for trajectory in &self.trajectories {
            lines.push(format!(
                "Trace {}'s length is {:.2}m.",
                trajectory.label(),
                trajectory.total_distance
            ));
            match trajectory.longest_segment {
                Some(longest) => lines.push(format!(
                    "The length of its longest segment is {:.2}m and the index is {}.",
                    longest.value, longest.segment
                )),
                None => lines.push("The trace has no segments.".to_string()),
            }
            if let Some(rate) = trajectory.sampling_rate {
                lines.push(format!(
                    "The average sampling rate for the trace is {rate:.2}s."
                ));
            }
            if let Some(min_speed) = trajectory.min_speed {
                lines.push(format!(
                    "For the segment index {}, the minimal travel speed is reached.",
                    min_speed.segment
                ));
            }
            if let Some(max_speed) = trajectory.max_speed {
                lines.push(format!(
                    "For the segment index {}, the maximum travel speed is reached.",
                    max_speed.segment
                ));
            }
            lines.push("----".to_string());
        }

        lines.push(format!(
            "The total length of all traces is {:.2}m.",
            self.total_distance
        ));
        if let Some(most) = &self.most_segments {
            lines.push(format!(
                "The trace with the most segments is {} ({} segments).",
                run_label(&most.trajectory_id, most.occurrence),
                most.segment_count
            ));
        }
        if let Some(longest) = &self.longest {
            let label = run_label(&longest.trajectory_id, longest.occurrence);
            lines.push(format!(
                "The longest trace is {label}, and the average speed along the trace is {:.2}m/s.",
                longest.average_speed
            ));
        }
        lines
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        info!(path = %path.display(), "JSON summary written");
        Ok(())
    }
}
