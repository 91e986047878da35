//! OSGB36 National Grid to WGS84 conversion.
//!
//! Two stages:
//! 1. Inverse Transverse Mercator on the Airy 1830 ellipsoid, giving
//!    OSGB36 latitude/longitude.
//! 2. A 7-parameter Helmert shift through Earth-centred Cartesian
//!    coordinates, giving WGS84 latitude/longitude.
//!
//! All projection, ellipsoid and transform parameters are fixed constants
//! defined once below.

use crate::{decode, EastingNorthing, GeoError, LatLon, Result};

/// Iteration cap for the meridional arc loop of the inverse projection.
pub const MAX_PROJECTION_ITERATIONS: usize = 20;

/// Meridional arc residual (meters) at which the inverse projection stops.
const PROJECTION_THRESHOLD_M: f64 = 0.00001;

/// Latitude refinement steps when leaving Cartesian coordinates.
const GEODETIC_ITERATIONS: usize = 10;

/// Decimal places of the rounded WGS84 output (~1 m).
pub const OUTPUT_DECIMALS: usize = 5;

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Semi-minor axis (meters)
    pub b: f64,
}

impl Ellipsoid {
    /// First eccentricity squared.
    #[inline]
    pub fn e2(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }

    /// Third flattening `(a - b) / (a + b)`.
    #[inline]
    pub fn n(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }
}

/// Airy 1830, the OSGB36 ellipsoid.
pub const AIRY_1830: Ellipsoid = Ellipsoid { a: 6_377_563.396, b: 6_356_256.909 };

/// WGS84 ellipsoid.
pub const WGS84: Ellipsoid = Ellipsoid { a: 6_378_137.0, b: 6_356_752.3142 };

/// Transverse Mercator grid definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Scale factor on the central meridian (F0)
    pub scale_factor: f64,
    /// True origin latitude in degrees
    pub origin_lat_deg: f64,
    /// True origin longitude (central meridian) in degrees
    pub origin_lon_deg: f64,
    /// Easting of the true origin (E0)
    pub false_easting: f64,
    /// Northing of the true origin (N0)
    pub false_northing: f64,
}

/// The Ordnance Survey National Grid.
pub const NATIONAL_GRID: TransverseMercator = TransverseMercator {
    ellipsoid: AIRY_1830,
    scale_factor: 0.999_601_271_7,
    origin_lat_deg: 49.0,
    origin_lon_deg: -2.0,
    false_easting: 400_000.0,
    false_northing: -100_000.0,
};

impl TransverseMercator {
    /// Meridional arc from the true origin latitude to `phi`, scaled by F0.
    fn meridional_arc(&self, phi: f64) -> f64 {
        let n = self.ellipsoid.n();
        let (n2, n3) = (n * n, n * n * n);
        let phi0 = self.origin_lat_deg.to_radians();
        let (dp, sp) = (phi - phi0, phi + phi0);

        self.ellipsoid.b
            * self.scale_factor
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dp
                - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * dp.sin() * sp.cos()
                + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * dp).sin() * (2.0 * sp).cos()
                - (35.0 / 24.0 * n3) * (3.0 * dp).sin() * (3.0 * sp).cos())
    }

    /// Grid easting/northing to latitude/longitude in radians on the grid's ellipsoid.
    ///
    /// # Errors
    /// [`GeoError::ProjectionDidNotConverge`] if the meridional arc loop
    /// exceeds [`MAX_PROJECTION_ITERATIONS`] or produces a non-finite value.
    pub fn inverse(&self, en: &EastingNorthing) -> Result<(f64, f64)> {
        let Ellipsoid { a, .. } = self.ellipsoid;
        let e2 = self.ellipsoid.e2();
        let f0 = self.scale_factor;
        let lam0 = self.origin_lon_deg.to_radians();
        let target = en.northing - self.false_northing;

        let mut phi = self.origin_lat_deg.to_radians();
        let mut m = 0.0;
        let mut iterations = 0;
        loop {
            if iterations == MAX_PROJECTION_ITERATIONS {
                return Err(GeoError::ProjectionDidNotConverge { iterations });
            }
            iterations += 1;

            phi += (target - m) / (a * f0);
            m = self.meridional_arc(phi);

            let residual = (target - m).abs();
            if !residual.is_finite() {
                return Err(GeoError::ProjectionDidNotConverge { iterations });
            }
            if residual < PROJECTION_THRESHOLD_M {
                break;
            }
        }
        tracing::trace!(iterations, "Inverse projection converged");

        let (sin_phi, cos_phi, tan_phi) = (phi.sin(), phi.cos(), phi.tan());
        let t2 = tan_phi * tan_phi;
        let t4 = t2 * t2;
        let t6 = t4 * t2;

        let sin2 = 1.0 - e2 * sin_phi * sin_phi;
        let nu = a * f0 / sin2.sqrt();
        let rho = a * f0 * (1.0 - e2) / sin2.powf(1.5);
        let eta2 = nu / rho - 1.0;

        let vii = tan_phi / (2.0 * rho * nu);
        let viii = tan_phi / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * t2 + eta2 - 9.0 * t2 * eta2);
        let ix = tan_phi / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * t2 + 45.0 * t4);
        let x = 1.0 / (cos_phi * nu);
        let xi = 1.0 / (cos_phi * 6.0 * nu.powi(3)) * (nu / rho + 2.0 * t2);
        let xii = 1.0 / (cos_phi * 120.0 * nu.powi(5)) * (5.0 + 28.0 * t2 + 24.0 * t4);
        let xiia = 1.0 / (cos_phi * 5040.0 * nu.powi(7)) * (61.0 + 662.0 * t2 + 1320.0 * t4 + 720.0 * t6);

        let de = en.easting - self.false_easting;
        let lat = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = lam0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

        Ok((lat, lon))
    }
}

/// Earth-centred, Earth-fixed coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Seven-parameter similarity transform between Cartesian frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertParams {
    /// Translations in meters
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Scale change in parts per million
    pub scale_ppm: f64,
    /// Rotations in arcseconds
    pub rx_arcsec: f64,
    pub ry_arcsec: f64,
    pub rz_arcsec: f64,
}

/// OSGB36 to WGS84.
pub const OSGB36_TO_WGS84: HelmertParams = HelmertParams {
    tx: 446.448,
    ty: -125.157,
    tz: 542.060,
    scale_ppm: -20.4894,
    rx_arcsec: 0.1502,
    ry_arcsec: 0.2470,
    rz_arcsec: 0.8421,
};

impl HelmertParams {
    /// Apply the transform (small-angle rotation matrix).
    pub fn apply(&self, p: &Cartesian) -> Cartesian {
        let s = self.scale_ppm * 1e-6;
        let rx = (self.rx_arcsec / 3600.0).to_radians();
        let ry = (self.ry_arcsec / 3600.0).to_radians();
        let rz = (self.rz_arcsec / 3600.0).to_radians();

        Cartesian {
            x: self.tx + (1.0 + s) * p.x - rz * p.y + ry * p.z,
            y: self.ty + rz * p.x + (1.0 + s) * p.y - rx * p.z,
            z: self.tz - ry * p.x + rx * p.y + (1.0 + s) * p.z,
        }
    }
}

/// Geodetic latitude/longitude (radians, zero height) to Cartesian.
pub fn geodetic_to_cartesian(lat: f64, lon: f64, ellipsoid: &Ellipsoid) -> Cartesian {
    let e2 = ellipsoid.e2();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    Cartesian {
        x: nu * cos_lat * cos_lon,
        y: nu * cos_lat * sin_lon,
        z: nu * (1.0 - e2) * sin_lat,
    }
}

/// Cartesian to geodetic latitude/longitude in radians.
pub fn cartesian_to_geodetic(p: &Cartesian, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let e2 = ellipsoid.e2();
    let lon = p.y.atan2(p.x);
    let horizontal = p.x.hypot(p.y);

    let mut lat = p.z.atan2(horizontal * (1.0 - e2));
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = (p.z + e2 * nu * sin_lat).atan2(horizontal);
    }

    (lat, lon)
}

/// National Grid easting/northing to WGS84 degrees, unrounded.
pub fn osgb36_to_wgs84(en: &EastingNorthing) -> Result<LatLon> {
    let (lat, lon) = NATIONAL_GRID.inverse(en)?;
    let osgb36 = geodetic_to_cartesian(lat, lon, &AIRY_1830);
    let wgs84 = OSGB36_TO_WGS84.apply(&osgb36);
    let (lat, lon) = cartesian_to_geodetic(&wgs84, &WGS84);
    Ok(LatLon::new(lat.to_degrees(), lon.to_degrees()))
}

/// National Grid easting/northing to WGS84 degrees, rounded to
/// [`OUTPUT_DECIMALS`] places.
///
/// # Example
/// ```
/// use routemap_geo::{to_wgs84, EastingNorthing};
///
/// let ll = to_wgs84(&EastingNorthing::new(411_900.0, 415_700.0)).unwrap();
/// assert_eq!((ll.latitude, ll.longitude), (53.63769, -1.8215));
/// ```
pub fn to_wgs84(en: &EastingNorthing) -> Result<LatLon> {
    let ll = osgb36_to_wgs84(en)?;
    Ok(LatLon::new(
        crate::track::round_to(ll.latitude, OUTPUT_DECIMALS),
        crate::track::round_to(ll.longitude, OUTPUT_DECIMALS),
    ))
}

/// Decode a grid reference and convert it to rounded WGS84 degrees.
pub fn grid_reference_to_wgs84(reference: &str) -> Result<LatLon> {
    to_wgs84(&decode(reference)?)
}
