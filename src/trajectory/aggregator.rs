//! Running per-trajectory totals and extrema.

use crate::error::AppError;
use crate::trajectory::metrics::SegmentMetrics;
use crate::trajectory::segmenter::{Segment, SegmentEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// How ties on segment speed are resolved.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTieBreak {
    /// Max speed keeps the earliest tie, min speed takes the latest.
    #[default]
    Legacy,
    /// Both extrema keep the earliest tie.
    KeepFirst,
}

/// An extreme value and the 1-based segment position where it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub value: f64,
    pub segment: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryStats {
    pub trajectory_id: String,
    /// 1 for the first run of this id, 2 if it reappears after a gap, and so on.
    pub occurrence: usize,
    /// Table index of the run's first row.
    pub first_index: usize,
    pub total_distance: f64,
    pub segment_count: usize,
    pub total_time: f64,
    pub max_segment: Option<Extremum>,
    pub min_speed: Option<Extremum>,
    pub max_speed: Option<Extremum>,
}

impl TrajectoryStats {
    pub fn new(trajectory_id: impl Into<String>, occurrence: usize, first_index: usize) -> Self {
        Self {
            trajectory_id: trajectory_id.into(),
            occurrence,
            first_index,
            total_distance: 0.0,
            segment_count: 0,
            total_time: 0.0,
            max_segment: None,
            min_speed: None,
            max_speed: None,
        }
    }

    /// Fold one measured segment into the running totals.
    pub fn apply(&mut self, position: usize, metrics: &SegmentMetrics, tie_break: SpeedTieBreak) {
        self.total_distance += metrics.distance;
        self.total_time += metrics.elapsed;
        self.segment_count += 1;

        let candidate = |value| Extremum {
            value,
            segment: position,
        };

        if self
            .max_segment
            .is_none_or(|current| metrics.distance > current.value)
        {
            self.max_segment = Some(candidate(metrics.distance));
        }
        if self
            .max_speed
            .is_none_or(|current| metrics.speed > current.value)
        {
            self.max_speed = Some(candidate(metrics.speed));
        }
        let replaces_min = |current: Extremum| match tie_break {
            SpeedTieBreak::Legacy => metrics.speed <= current.value,
            SpeedTieBreak::KeepFirst => metrics.speed < current.value,
        };
        if self.min_speed.is_none_or(replaces_min) {
            self.min_speed = Some(candidate(metrics.speed));
        }
    }
}

/// Owns the live statistics for one pass, in first-seen order.
#[derive(Debug)]
pub struct Aggregator {
    tie_break: SpeedTieBreak,
    stats: Vec<TrajectoryStats>,
    occurrences: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new(tie_break: SpeedTieBreak) -> Self {
        Self {
            tie_break,
            stats: Vec::new(),
            occurrences: HashMap::new(),
        }
    }

    /// Open a new trajectory run.
    fn begin(&mut self, trajectory_id: &str, first_index: usize) {
        let occurrence = self
            .occurrences
            .entry(trajectory_id.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
        if *occurrence > 1 {
            warn!(
                trajectory_id,
                occurrence = *occurrence,
                first_index,
                "Trajectory id reappears after a gap, treating as a separate trajectory"
            );
        }
        self.stats
            .push(TrajectoryStats::new(trajectory_id, *occurrence, first_index));
    }

    /// Measure a segment and add it to the run opened by the last `begin`.
    fn record(&mut self, segment: &Segment<'_>) -> Result<(), AppError> {
        let metrics = SegmentMetrics::measure(segment)?;

        debug!(
            trajectory_id = segment.trajectory_id,
            segment = segment.position,
            distance = metrics.distance,
            elapsed = metrics.elapsed,
            speed = metrics.speed,
            "Segment measured"
        );

        let tie_break = self.tie_break;
        if let Some(current) = self.stats.last_mut() {
            current.apply(segment.position, &metrics, tie_break);
        }
        Ok(())
    }

    /// Drain a segmenter, stopping at the first bad segment.
    pub fn consume<'a, I>(&mut self, events: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = SegmentEvent<'a>>,
    {
        for event in events {
            match event {
                SegmentEvent::Started {
                    trajectory_id,
                    first_index,
                } => self.begin(trajectory_id, first_index),
                SegmentEvent::Segment(segment) => self.record(&segment)?,
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<TrajectoryStats> {
        self.stats
    }
}
