// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic features, the spherical Mercator projection and path generation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_4;

use kurbo::{BezPath, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A closed ring of `(longitude, latitude)` positions in degrees.
pub type Ring = Vec<(f64, f64)>;

/// Polygonal geometry in geographic coordinates.
///
/// The first ring of each polygon is the exterior; later rings are holes.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single polygon.
    Polygon(Vec<Ring>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    fn rings(&self) -> impl Iterator<Item = &Ring> {
        let polygons: &[Vec<Ring>] = match self {
            Self::Polygon(rings) => core::slice::from_ref(rings),
            Self::MultiPolygon(polygons) => polygons,
        };
        polygons.iter().flatten()
    }
}

/// A named geographic feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Join key (the local area name).
    pub name: String,
    /// Geometry.
    pub geometry: Geometry,
}

impl Feature {
    /// Creates a feature.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

/// Latitude limit keeping the Mercator y coordinate finite.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Spherical Mercator: `x = k·λ + tx`, `y = ty − k·ln(tan(π/4 + φ/2))`, angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
    /// Scale factor `k`.
    pub scale: f64,
    /// Screen translation `(tx, ty)`.
    pub translate: (f64, f64),
}

impl Default for Mercator {
    fn default() -> Self {
        Self {
            scale: 961.0 / core::f64::consts::TAU,
            translate: (480.0, 250.0),
        }
    }
}

impl Mercator {
    /// Creates a projection.
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        Self { scale, translate }
    }

    fn raw(lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        (lon.to_radians(), -(FRAC_PI_4 + phi * 0.5).tan().ln())
    }

    /// Projects a `(longitude, latitude)` position in degrees.
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let (x, y) = Self::raw(lon, lat);
        Point::new(
            self.translate.0 + self.scale * x,
            self.translate.1 + self.scale * y,
        )
    }

    /// Fits `features` into `[0, width] × [0, height]`, centered, preserving aspect.
    ///
    /// Returns the default projection when `features` has no positions.
    pub fn fit_size(width: f64, height: f64, features: &[Feature]) -> Self {
        let mut bounds: Option<Rect> = None;
        for (lon, lat) in features.iter().flat_map(|f| f.geometry.rings()).flatten() {
            let (x, y) = Self::raw(*lon, *lat);
            bounds = Some(match bounds {
                Some(b) => b.union_pt(Point::new(x, y)),
                None => Rect::new(x, y, x, y),
            });
        }
        let Some(b) = bounds else {
            return Self::default();
        };
        let (dx, dy) = (b.width(), b.height());
        let k = match (dx > 0.0, dy > 0.0) {
            (true, true) => (width / dx).min(height / dy),
            (true, false) => width / dx,
            (false, true) => height / dy,
            (false, false) => 1.0,
        };
        Self {
            scale: k,
            translate: (
                (width - k * (b.x1 + b.x0)) * 0.5,
                (height - k * (b.y1 + b.y0)) * 0.5,
            ),
        }
    }

    /// Builds the screen-space outline of `geometry`, one closed subpath per ring.
    pub fn path(&self, geometry: &Geometry) -> BezPath {
        let mut path = BezPath::new();
        for ring in geometry.rings() {
            let mut points = ring.iter().map(|&(lon, lat)| self.project(lon, lat));
            let Some(first) = points.next() else {
                continue;
            };
            path.move_to(first);
            for p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::{PathEl, Shape};

    use super::*;

    fn square(lon0: f64, lat0: f64, size: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            (lon0, lat0),
            (lon0 + size, lat0),
            (lon0 + size, lat0 + size),
            (lon0, lat0 + size),
            (lon0, lat0),
        ]])
    }

    #[test]
    fn north_is_up() {
        let m = Mercator::new(100.0, (0.0, 0.0));
        let south = m.project(-123.1, 49.2);
        let north = m.project(-123.1, 49.3);
        assert!(north.y < south.y, "larger latitudes project higher on screen");
        assert!((m.project(0.0, 0.0) - Point::ZERO).hypot() < 1e-9);
    }

    #[test]
    fn fit_size_centers_and_fills_one_dimension() {
        let features = vec![
            Feature::new("West End", square(-123.14, 49.28, 0.02)),
            Feature::new("Downtown", square(-123.12, 49.27, 0.03)),
        ];
        let m = Mercator::fit_size(960.0, 600.0, &features);
        let mut bounds: Option<Rect> = None;
        for f in &features {
            let b = m.path(&f.geometry).bounding_box();
            bounds = Some(bounds.map_or(b, |a| a.union(b)));
        }
        let b = bounds.unwrap();
        let fills_width = (b.width() - 960.0).abs() < 1e-6;
        let fills_height = (b.height() - 600.0).abs() < 1e-6;
        assert!(fills_width || fills_height, "bounds {b:?}");
        assert!((b.center().x - 480.0).abs() < 1e-6);
        assert!((b.center().y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn multipolygons_close_every_ring() {
        let Geometry::Polygon(a) = square(0.0, 0.0, 1.0) else {
            unreachable!()
        };
        let Geometry::Polygon(b) = square(5.0, 5.0, 1.0) else {
            unreachable!()
        };
        let g = Geometry::MultiPolygon(vec![a, b]);
        let path = Mercator::default().path(&g);
        let closes = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::ClosePath))
            .count();
        assert_eq!(closes, 2);
    }

    #[test]
    fn empty_input_keeps_default_projection() {
        assert_eq!(Mercator::fit_size(960.0, 600.0, &[]), Mercator::default());
    }
}
