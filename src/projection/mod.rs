use crate::config::ProjectionSettings;
use crate::error::AppError;
use serde::Deserialize;
use std::ops::RangeInclusive;
use tracing::debug;

pub mod model;
pub mod transverse_mercator;

use model::{GRS80, Projection, WGS84};
use transverse_mercator::{SOUTHERN_FALSE_NORTHING, TransverseMercator};

pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;
pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// GDA2020 Map Grid of Australia on GRS80.
    #[default]
    Mga,
    /// Universal Transverse Mercator on WGS84.
    Utm,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    North,
    #[default]
    South,
}

// Projection factory
pub fn create_projection(settings: &ProjectionSettings) -> Box<dyn Projection> {
    let projection = match settings.kind {
        ProjectionKind::Mga => TransverseMercator::for_zone(
            format!("GDA2020 / MGA zone {}", settings.zone),
            GRS80,
            settings.zone,
            SOUTHERN_FALSE_NORTHING,
        ),
        ProjectionKind::Utm => {
            let (suffix, false_northing) = match settings.hemisphere {
                Hemisphere::North => ("N", 0.0),
                Hemisphere::South => ("S", SOUTHERN_FALSE_NORTHING),
            };
            TransverseMercator::for_zone(
                format!("WGS 84 / UTM zone {}{suffix}", settings.zone),
                WGS84,
                settings.zone,
                false_northing,
            )
        }
    };
    debug!(
        projection = projection.name(),
        central_meridian = projection.central_meridian_deg(),
        "Projection created"
    );
    Box::new(projection)
}

/// Parse, range-check and project one row's raw longitude/latitude.
///
/// Latitude is parsed before longitude, but longitude is range-checked
/// first. `row` only feeds error messages.
pub fn reproject(
    projection: &dyn Projection,
    row: usize,
    longitude: &str,
    latitude: &str,
) -> Result<(f64, f64), AppError> {
    let latitude = parse_coordinate(row, "latitude", latitude)?;
    let longitude = parse_coordinate(row, "longitude", longitude)?;
    check_range(row, "longitude", longitude, LONGITUDE_RANGE)?;
    check_range(row, "latitude", latitude, LATITUDE_RANGE)?;
    Ok(projection.forward(longitude, latitude))
}

fn parse_coordinate(row: usize, field: &'static str, raw: &str) -> Result<f64, AppError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::Parse {
            row,
            field,
            value: raw.to_string(),
        }),
    }
}

fn check_range(
    row: usize,
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), AppError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Range {
            row,
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mga55() -> Box<dyn Projection> {
        create_projection(&ProjectionSettings {
            kind: ProjectionKind::Mga,
            zone: 55,
            hemisphere: Hemisphere::South,
        })
    }

    #[test]
    fn reprojection_is_deterministic() -> Result<(), AppError> {
        let projection = mga55();
        let first = reproject(projection.as_ref(), 1, "144.9", "-37.8")?;
        let second = reproject(projection.as_ref(), 2, "144.9", "-37.8")?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn reprojection_round_trips_through_inverse() -> Result<(), AppError> {
        let projection = mga55();
        let (x, y) = reproject(projection.as_ref(), 1, " 144.91 ", "-37.81")?;
        let (lon, lat) = projection.inverse(x, y);
        assert!((lon - 144.91).abs() < 1e-9);
        assert!((lat + 37.81).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn latitude_out_of_range_names_row_and_field() {
        let result = reproject(mga55().as_ref(), 4, "144.9", "95");
        match result {
            Err(AppError::Range { row, field, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(field, "latitude");
            }
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn longitude_range_is_checked_before_latitude() {
        let result = reproject(mga55().as_ref(), 2, "-200", "95");
        match result {
            Err(err @ AppError::Range { .. }) => {
                assert!(err.to_string().contains("longitude"));
                assert!(err.to_string().contains("row 2"));
            }
            other => panic!("expected range error, got {other:?}"),
        }
    }

    #[test]
    fn range_bounds_are_inclusive() -> Result<(), AppError> {
        let projection = create_projection(&ProjectionSettings {
            kind: ProjectionKind::Utm,
            zone: 1,
            hemisphere: Hemisphere::North,
        });
        reproject(projection.as_ref(), 1, "-180", "0")?;
        reproject(projection.as_ref(), 2, "-177", "-90")?;
        Ok(())
    }

    #[test]
    fn non_numeric_coordinates_are_parse_errors() {
        let projection = mga55();
        assert!(matches!(
            reproject(projection.as_ref(), 3, "east", "-37.8"),
            Err(AppError::Parse {
                row: 3,
                field: "longitude",
                ..
            })
        ));
        assert!(matches!(
            reproject(projection.as_ref(), 5, "144.9", "NaN"),
            Err(AppError::Parse {
                row: 5,
                field: "latitude",
                ..
            })
        ));
    }

    #[test]
    fn latitude_parse_failure_is_reported_first() {
        let result = reproject(mga55().as_ref(), 3, "abc", "xyz");
        match result {
            Err(AppError::Parse { row, field, value }) => {
                assert_eq!(row, 3);
                assert_eq!(field, "latitude");
                assert_eq!(value, "xyz");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn utm_names_carry_hemisphere() {
        let north = create_projection(&ProjectionSettings {
            kind: ProjectionKind::Utm,
            zone: 33,
            hemisphere: Hemisphere::North,
        });
        assert_eq!(north.name(), "WGS 84 / UTM zone 33N");
        assert_eq!(mga55().name(), "GDA2020 / MGA zone 55");

        // Northern zones have no false northing.
        let (_, y) = north.forward(15.0, 0.0);
        assert!(y.abs() < 1e-6);
    }
}
