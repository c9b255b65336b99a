// Spotter - line-of-sight tracking of ADS-B traffic
// Copyright (C) 2017-2018  Datong Sun (dndx@idndx.com)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Line of sight between a ground observer and a target above the
//! reference ellipsoid.
//!
//! Both points are converted to earth-centered cartesian coordinates.
//! The bearing is read off the target after rotating the globe so that
//! the observer sits at latitude 0, longitude 0. The elevation angle is
//! measured against the observer's geodetic surface normal.

/// Equatorial radius in m
const EQUATORIAL_RADIUS: f64 = 6378137.0;
/// Polar radius in m
const POLAR_RADIUS: f64 = 6356752.3;
/// Eccentricity squared of the reference ellipsoid
const ECCENTRICITY_SQ: f64 = 0.00669437999014;
// below this the rotated target is straight above or below the observer
const DEGENERATE_THRESHOLD: f64 = 1.0e-6;

/// A geodetic position
#[derive(PartialEq, Debug, Copy, Clone, Deserialize)]
pub struct Position {
    /// Geodetic latitude in deg
    pub lat: f64,
    /// Longitude in deg
    pub lon: f64,
    /// Height above the reference ellipsoid in m
    pub elv: f64,
}

impl Position {
    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_valid(&self) -> bool {
        (-90_f64..=90_f64).contains(&self.lat) && (-180_f64..=180_f64).contains(&self.lon)
    }
}

/// The fixed ground station everything is measured from
pub type Observer = Position;

#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// Earth-centered cartesian point, in m
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Ellipsoid radius at the point's latitude
    pub radius: f64,
    /// Geodetic surface normal (unit length)
    pub normal: Vector,
}

impl Point {
    /// Straight line distance in m
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;

        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Unit vector pointing from `self` to `other`, `None` if both are
    /// the same point.
    pub fn unit_toward(&self, other: &Point) -> Option<Vector> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        let dist2 = dx * dx + dy * dy + dz * dz;

        if dist2 == 0_f64 {
            return None;
        }

        let dist = dist2.sqrt();

        Some(Vector {
            x: dx / dist,
            y: dy / dist,
            z: dz / dist,
        })
    }
}

#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Elevation {
    /// Degrees above the local horizon
    Visible(f64),
    BelowHorizon,
}

impl Elevation {
    /// Degrees, with `-1` standing in for a target below the horizon
    pub fn degrees(&self) -> f64 {
        match *self {
            Elevation::Visible(d) => d,
            Elevation::BelowHorizon => -1_f64,
        }
    }

    pub fn is_visible(&self) -> bool {
        match *self {
            Elevation::Visible(_) => true,
            Elevation::BelowHorizon => false,
        }
    }
}

/// Result of a line of sight computation. Fields that could not be
/// computed because the geometry is degenerate are `None`.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Sight {
    /// Bearing in deg, `[0, 360)`, 0 is north
    pub azimuth: Option<f64>,
    pub elevation: Option<Elevation>,
    /// Slant distance in km
    pub distance_km: f64,
}

/// Ellipsoid radius in m at geodetic latitude `lat` (radians)
pub fn earth_radius(lat: f64) -> f64 {
    let (sin, cos) = lat.sin_cos();
    let t1 = EQUATORIAL_RADIUS * EQUATORIAL_RADIUS * cos;
    let t2 = POLAR_RADIUS * POLAR_RADIUS * sin;
    let t3 = EQUATORIAL_RADIUS * cos;
    let t4 = POLAR_RADIUS * sin;

    ((t1 * t1 + t2 * t2) / (t3 * t3 + t4 * t4)).sqrt()
}

/// Geodetic to geocentric latitude, both in radians
pub fn geocentric_latitude(lat: f64) -> f64 {
    ((1_f64 - ECCENTRICITY_SQ) * lat.tan()).atan()
}

pub fn location_to_point(p: &Position) -> Point {
    let lat = p.lat.to_radians();
    let lon = p.lon.to_radians();
    let radius = earth_radius(lat);
    let clat = geocentric_latitude(lat);

    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_clat, cos_clat) = clat.sin_cos();

    // on the ellipsoid surface, from the geocentric latitude
    let x = radius * cos_lon * cos_clat;
    let y = radius * sin_lon * cos_clat;
    let z = radius * sin_clat;

    // the height is applied along the geodetic normal
    let (sin_lat, cos_lat) = lat.sin_cos();
    let normal = Vector {
        x: cos_lat * cos_lon,
        y: cos_lat * sin_lon,
        z: sin_lat,
    };

    Point {
        x: x + p.elv * normal.x,
        y: y + p.elv * normal.y,
        z: z + p.elv * normal.z,
        radius,
        normal,
    }
}

/// Cartesian coordinates of `b` after rotating the globe about the polar
/// axis and then the equatorial axis so that `a` lands on latitude 0,
/// longitude 0.
pub fn rotate_globe(b: &Position, a: &Position) -> Point {
    let br = location_to_point(&Position {
        lat: b.lat,
        lon: b.lon - a.lon,
        elv: b.elv,
    });

    let alat = geocentric_latitude((-a.lat).to_radians());
    let (sin, cos) = alat.sin_cos();

    Point {
        x: br.x * cos - br.z * sin,
        y: br.y,
        z: br.x * sin + br.z * cos,
        ..br
    }
}

fn azimuth(rotated: &Point) -> Option<f64> {
    if rotated.z * rotated.z + rotated.y * rotated.y <= DEGENERATE_THRESHOLD {
        return None;
    }

    let theta = rotated.z.atan2(rotated.y).to_degrees();
    let mut azimuth = 90_f64 - theta;

    if azimuth < 0_f64 {
        azimuth += 360_f64;
    }

    if azimuth >= 360_f64 {
        azimuth -= 360_f64;
    }

    Some(azimuth)
}

fn elevation(observer: &Point, target: &Point) -> Option<Elevation> {
    observer.unit_toward(target).map(|v| {
        // rounding can push the dot product of two unit vectors past 1
        let cos = v.dot(&observer.normal).max(-1_f64).min(1_f64);
        let deg = 90_f64 - cos.acos().to_degrees();

        if deg < 0_f64 {
            Elevation::BelowHorizon
        } else {
            Elevation::Visible(deg)
        }
    })
}

/// Azimuth, elevation angle and slant distance of `target` as seen from
/// `observer`.
pub fn line_of_sight(observer: &Observer, target: &Position) -> Sight {
    let ap = location_to_point(observer);
    let bp = location_to_point(target);
    let br = rotate_globe(target, observer);

    Sight {
        azimuth: azimuth(&br),
        elevation: elevation(&ap, &bp),
        distance_km: 0.001 * ap.distance(&bp),
    }
}
