use std::fmt;

/// A point on the planet expressed as geographic angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees. Range: \[-90, 90\], positive north of the equator.
    pub lat: f64,
    /// Longitude in degrees. Range: \[-180, 180\], positive toward +X.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{ns} {:.4}°{ew}", self.lat.abs(), self.lon.abs())
    }
}
