//! Transverse Mercator using the Krüger n-series to fourth order.
//!
//! Accurate to well under a millimeter within a 6° zone.

use crate::projection::model::{Ellipsoid, Projection};

/// UTM/MGA scale factor on the central meridian.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.0;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    name: String,
    central_meridian: f64,
    scale: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    // Rectifying radius A.
    radius: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl TransverseMercator {
    pub fn new(
        name: impl Into<String>,
        ellipsoid: Ellipsoid,
        central_meridian_deg: f64,
        scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = ellipsoid.f;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let radius = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);
        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4,
            49561.0 / 161280.0 * n4,
        ];
        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4,
            4397.0 / 161280.0 * n4,
        ];
        let delta = [
            2.0 * n - 2.0 / 3.0 * n2 - 2.0 * n3 + 116.0 / 45.0 * n4,
            7.0 / 3.0 * n2 - 8.0 / 5.0 * n3 - 227.0 / 45.0 * n4,
            56.0 / 15.0 * n3 - 136.0 / 35.0 * n4,
            4279.0 / 630.0 * n4,
        ];

        Self {
            name: name.into(),
            central_meridian: central_meridian_deg.to_radians(),
            scale,
            false_easting,
            false_northing,
            e: (f * (2.0 - f)).sqrt(),
            radius,
            alpha,
            beta,
            delta,
        }
    }

    /// Standard 6° zone: central meridian at `zone * 6 - 183` degrees.
    pub fn for_zone(
        name: impl Into<String>,
        ellipsoid: Ellipsoid,
        zone: u8,
        false_northing: f64,
    ) -> Self {
        Self::new(
            name,
            ellipsoid,
            zone_central_meridian(zone),
            UTM_SCALE_FACTOR,
            UTM_FALSE_EASTING,
            false_northing,
        )
    }

    pub fn central_meridian_deg(&self) -> f64 {
        self.central_meridian.to_degrees()
    }
}

pub fn zone_central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

impl Projection for TransverseMercator {
    fn forward(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let phi = latitude.to_radians();
        let lambda = longitude.to_radians() - self.central_meridian;

        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - self.e * (self.e * sin_phi).atanh()).sinh();
        let xi_prime = t.atan2(lambda.cos());
        let eta_prime = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let x = self.false_easting + self.scale * self.radius * eta;
        let y = self.false_northing + self.scale * self.radius * xi;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xi = (y - self.false_northing) / (self.scale * self.radius);
        let eta = (x - self.false_easting) / (self.scale * self.radius);

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        // Conformal latitude, then the series back to geodetic latitude.
        let chi = (xi_prime.sin() / eta_prime.cosh()).asin();
        let mut phi = chi;
        for (j, delta) in self.delta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            phi += delta * (k * chi).sin();
        }
        let lambda = eta_prime.sinh().atan2(xi_prime.cos());

        (
            (lambda + self.central_meridian).to_degrees(),
            phi.to_degrees(),
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
