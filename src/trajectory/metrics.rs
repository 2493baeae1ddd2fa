//! Planar distance, elapsed time and speed for a single segment.

use crate::error::AppError;
use crate::table::Point;
use crate::trajectory::segmenter::Segment;
use time::Time;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// Single-digit fields are accepted, e.g. `9:05:00`.
const TIME_OF_DAY: &[BorrowedFormatItem<'static>] = format_description!(
    "[hour padding:none]:[minute padding:none]:[second padding:none]"
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMetrics {
    /// Meters in the projected frame.
    pub distance: f64,
    /// Seconds.
    pub elapsed: f64,
    /// Meters per second.
    pub speed: f64,
}

impl SegmentMetrics {
    pub fn measure(segment: &Segment<'_>) -> Result<Self, AppError> {
        let distance = distance(segment.from, segment.to);
        let elapsed = elapsed_seconds(&segment.from.timestamp, &segment.to.timestamp)?;
        let speed = speed(distance, elapsed)?;
        Ok(Self {
            distance,
            elapsed,
            speed,
        })
    }
}

/// Euclidean distance between projected coordinates.
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Absolute difference between two `HH:MM:SS` times of day, in seconds.
pub fn elapsed_seconds(t1: &str, t2: &str) -> Result<f64, AppError> {
    let start = parse_time_of_day(t1)?;
    let end = parse_time_of_day(t2)?;
    Ok((end - start).as_seconds_f64().abs())
}

pub fn speed(distance: f64, elapsed: f64) -> Result<f64, AppError> {
    if elapsed == 0.0 {
        return Err(AppError::DivisionByZero("segment elapsed time is zero"));
    }
    Ok(distance / elapsed)
}

fn parse_time_of_day(raw: &str) -> Result<Time, AppError> {
    Time::parse(raw.trim(), TIME_OF_DAY).map_err(|err| AppError::TimeFormat {
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_at(x: f64, y: f64) -> Point {
        Point {
            trajectory_id: "T1".to_string(),
            node_id: "n1".to_string(),
            timestamp: "10:00:00".to_string(),
            x,
            y,
            speed_limit: "60".to_string(),
        }
    }

    #[test]
    fn distance_is_zero_to_self_and_symmetric() {
        let a = point_at(315_115.6, 5_814_297.8);
        let b = point_at(316_020.9, 5_813_207.9);

        assert_eq!(distance(&a, &a), 0.0);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn distance_is_planar_euclidean() {
        let a = point_at(0.0, 0.0);
        let b = point_at(3.0, 4.0);
        assert_eq!(distance(&a, &b), 5.0);
    }

    #[test]
    fn elapsed_seconds_is_symmetric() -> Result<(), AppError> {
        assert_eq!(elapsed_seconds("10:00:00", "10:01:30")?, 90.0);
        assert_eq!(elapsed_seconds("10:01:30", "10:00:00")?, 90.0);
        assert_eq!(elapsed_seconds("23:59:59", "00:00:00")?, 86_399.0);
        Ok(())
    }

    #[test]
    fn unpadded_fields_are_accepted() -> Result<(), AppError> {
        assert_eq!(elapsed_seconds("9:05:00", "9:05:10")?, 10.0);
        assert_eq!(elapsed_seconds("09:05:00", "9:5:3")?, 3.0);
        Ok(())
    }

    #[test]
    fn malformed_timestamp_is_time_format_error() {
        for raw in ["10:00", "25:00:00", "ten o'clock", ""] {
            let result = elapsed_seconds("10:00:00", raw);
            assert!(
                matches!(result, Err(AppError::TimeFormat { .. })),
                "{raw:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn zero_elapsed_time_is_division_by_zero() {
        assert!(matches!(
            speed(12.5, 0.0),
            Err(AppError::DivisionByZero(_))
        ));
    }

    #[test]
    fn segment_measurement_combines_all_three() -> Result<(), AppError> {
        let from = point_at(0.0, 0.0);
        let mut to = point_at(30.0, 40.0);
        to.timestamp = "10:00:10".to_string();
        let segment = Segment {
            trajectory_id: "T1",
            from: &from,
            to: &to,
            position: 1,
        };

        let metrics = SegmentMetrics::measure(&segment)?;

        assert_eq!(
            metrics,
            SegmentMetrics {
                distance: 50.0,
                elapsed: 10.0,
                speed: 5.0,
            }
        );
        Ok(())
    }

    #[test]
    fn same_timestamp_with_movement_fails() {
        let from = point_at(0.0, 0.0);
        let to = point_at(10.0, 0.0);
        let segment = Segment {
            trajectory_id: "T1",
            from: &from,
            to: &to,
            position: 1,
        };

        assert!(matches!(
            SegmentMetrics::measure(&segment),
            Err(AppError::DivisionByZero(_))
        ));
    }
}
