//! Geographic coordinate types and spatial utilities.
//!
//! Coordinates are `f64` degrees.  Coverage sweeps step in fractions of a
//! metre (~5e-6°), well below what `f32` can resolve at typical longitudes.

use std::fmt;

/// Approximate degrees of latitude per metre (1 / 111 320).
pub const DEGREES_PER_METER: f64 = 1.0 / 111_320.0;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const EARTH_POLES_PERIMETER_M: f64 = 40_008_000.0;
const EARTH_EQUATORIAL_PERIMETER_M: f64 = 40_075_160.0;

// ── Position ──────────────────────────────────────────────────────────────────

/// A WGS-84 latitude/longitude pair in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Position) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// The point `east_m` metres east and `north_m` metres north of `self`.
    ///
    /// Flat-earth approximation scaled by the meridian and parallel
    /// perimeters at this latitude; accurate to well under a metre over the
    /// few hundred metres a search area spans.
    pub fn offset_m(self, east_m: f64, north_m: f64) -> Position {
        let parallel = EARTH_EQUATORIAL_PERIMETER_M * self.lat.to_radians().cos();
        Position {
            lat: self.lat + north_m * 360.0 / EARTH_POLES_PERIMETER_M,
            lon: self.lon + east_m * 360.0 / parallel,
        }
    }

    /// Linear interpolation in degree space; `t = 0` is `self`, `t = 1` is `to`.
    #[inline]
    pub fn lerp(self, to: Position, t: f64) -> Position {
        Position {
            lat: self.lat + (to.lat - self.lat) * t,
            lon: self.lon + (to.lon - self.lon) * t,
        }
    }

    /// Both coordinates within `tol` degrees of `other`.
    #[inline]
    pub fn approx_eq(self, other: Position, tol: f64) -> bool {
        (self.lat - other.lat).abs() <= tol && (self.lon - other.lon).abs() <= tol
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lon)
    }
}

// ── Region ────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box given by its north-west and south-east corners.
///
/// Invariant for a normalized region: `nw.lat >= se.lat` and
/// `nw.lon <= se.lon`.  Use [`Region::normalized`] on operator input.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub nw: Position,
    pub se: Position,
}

impl Region {
    #[inline]
    pub const fn new(nw: Position, se: Position) -> Self {
        Self { nw, se }
    }

    /// Rebuild from any two opposite corners so the invariant holds.
    pub fn normalized(self) -> Region {
        Region {
            nw: Position::new(self.nw.lat.max(self.se.lat), self.nw.lon.min(self.se.lon)),
            se: Position::new(self.nw.lat.min(self.se.lat), self.nw.lon.max(self.se.lon)),
        }
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.nw.lat >= self.se.lat && self.nw.lon <= self.se.lon
    }

    /// Inclusive containment test.  Assumes a normalized region.
    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        p.lat <= self.nw.lat && p.lat >= self.se.lat && p.lon >= self.nw.lon && p.lon <= self.se.lon
    }

    /// Centre of the bounding box.
    #[inline]
    pub fn midpoint(&self) -> Position {
        Position {
            lat: (self.se.lat - self.nw.lat) / 2.0 + self.nw.lat,
            lon: (self.se.lon - self.nw.lon) / 2.0 + self.nw.lon,
        }
    }

    #[inline]
    pub fn lat_span(&self) -> f64 {
        (self.nw.lat - self.se.lat).abs()
    }

    #[inline]
    pub fn lon_span(&self) -> f64 {
        (self.se.lon - self.nw.lon).abs()
    }

    /// Area in square degrees.
    #[inline]
    pub fn area(&self) -> f64 {
        self.lat_span() * self.lon_span()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[nw {} se {}]", self.nw, self.se)
    }
}

// ── RegionShape ───────────────────────────────────────────────────────────────

/// A region as stored in the shared registry.
///
/// Only rectangles take part in bridge endpoint resolution; polygons are
/// carried so that a registry containing them still loads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RegionShape {
    Rectangle(Region),
    Polygon { vertices: Vec<Position> },
}

impl RegionShape {
    #[inline]
    pub fn as_rectangle(&self) -> Option<&Region> {
        match self {
            RegionShape::Rectangle(r) => Some(r),
            RegionShape::Polygon { .. } => None,
        }
    }

    /// Bounding-box midpoint of a rectangle; `None` for any other shape.
    #[inline]
    pub fn midpoint(&self) -> Option<Position> {
        self.as_rectangle().map(Region::midpoint)
    }
}

impl From<Region> for RegionShape {
    fn from(r: Region) -> Self {
        RegionShape::Rectangle(r)
    }
}
