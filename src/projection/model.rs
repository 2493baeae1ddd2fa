//! Projection trait for geographic to planar conversion.
//!
//! A projection is chosen once from `[projection]` in the config and applied to
//! every row of the dataset.

/// Reference ellipsoid, defined by semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters.
    pub a: f64,
    pub f: f64,
}

/// GRS80, the ellipsoid of GDA2020.
pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_222_101,
};

pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

/// A fixed map projection from (longitude, latitude) in degrees to (x, y) in meters.
pub trait Projection: Send + Sync + std::fmt::Debug {
    /// Project a geographic coordinate. Inputs are assumed to be range-checked.
    fn forward(&self, longitude: f64, latitude: f64) -> (f64, f64);

    /// Recover (longitude, latitude) in degrees from projected (x, y).
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    /// Short human-readable identifier, used in logs.
    fn name(&self) -> &str;
}
