// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line mark generation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{BezPath, Point};
use peniko::Brush;
use peniko::color::palette::css;
use parkviz_core::{Mark, MarkId};
use parkviz_transforms::{ExecutionError, Table};

use crate::encode::positions;
use crate::scale::{PositionScale, ScaleOrdinal};

/// Interpolation between consecutive points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Cubic segments that preserve monotonicity in y, assuming x increases.
    MonotoneX,
}

/// One stroked path per series.
///
/// Rows are grouped by the `series` text column (all rows form one series when unset) and
/// drawn in table order. Rows with a missing position are skipped. Each path is identified by
/// `MarkId::for_key(layer, series)`.
#[derive(Clone, Debug)]
pub struct LineMarkSpec {
    /// Identity layer mixed into every mark id.
    pub layer: u64,
    /// Optional text column splitting rows into series.
    pub series: Option<String>,
    /// Column for the x channel.
    pub x: String,
    /// Column for the y channel.
    pub y: String,
    /// X scale.
    pub x_scale: PositionScale,
    /// Y scale.
    pub y_scale: PositionScale,
    /// Interpolation.
    pub curve: Curve,
    /// Stroke paint when no color scale is set.
    pub stroke: Brush,
    /// Optional series color scale.
    pub color: Option<ScaleOrdinal>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Rendering order hint (`parkviz_core::Mark::z_index`).
    pub z_index: i32,
}

impl LineMarkSpec {
    /// Creates a single-series linear line with a black 2px stroke.
    pub fn new(
        layer: u64,
        x: impl Into<String>,
        y: impl Into<String>,
        x_scale: PositionScale,
        y_scale: PositionScale,
    ) -> Self {
        Self {
            layer,
            series: None,
            x: x.into(),
            y: y.into(),
            x_scale,
            y_scale,
            curve: Curve::Linear,
            stroke: css::BLACK.into(),
            color: None,
            stroke_width: 2.0,
            z_index: crate::z_order::SERIES_STROKE,
        }
    }

    /// Splits rows into one line per value of `column`.
    pub fn with_series(mut self, column: impl Into<String>) -> Self {
        self.series = Some(column.into());
        self
    }

    /// Sets the interpolation.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Colors each series through `scale`.
    pub fn with_color(mut self, scale: ScaleOrdinal) -> Self {
        self.color = Some(scale);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The mark id for a series.
    pub fn id_for(&self, series: &str) -> MarkId {
        MarkId::for_key(self.layer, series)
    }

    /// Generates one path per series, in order of first appearance.
    pub fn marks(&self, table: &Table) -> Result<Vec<Mark>, ExecutionError> {
        let xs = positions(&self.x_scale, table, &self.x)?;
        let ys = positions(&self.y_scale, table, &self.y)?;
        let series = match &self.series {
            Some(col) => Some(table.text(col)?),
            None => None,
        };

        let mut order: Vec<&str> = Vec::new();
        let mut points: HashMap<&str, Vec<Point>> = HashMap::new();
        for row in 0..table.row_count() {
            let name = series.map_or("", |s| s[row].as_str());
            let entry = points.entry(name).or_insert_with(|| {
                order.push(name);
                Vec::new()
            });
            if let (Some(x), Some(y)) = (xs[row], ys[row]) {
                entry.push(Point::new(x, y));
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|name| {
                let pts = points.get(name)?;
                if pts.is_empty() {
                    return None;
                }
                let path = match self.curve {
                    Curve::Linear => linear_path(pts),
                    Curve::MonotoneX => monotone_x_path(pts),
                };
                let stroke = self
                    .color
                    .as_ref()
                    .and_then(|c| c.map(name))
                    .map_or_else(|| self.stroke.clone(), Brush::Solid);
                Some(
                    Mark::path(self.id_for(name), path)
                        .z_index(self.z_index)
                        .fill(css::TRANSPARENT)
                        .stroke(stroke, self.stroke_width)
                        .build(),
                )
            })
            .collect())
    }
}

fn linear_path(pts: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    for (i, pt) in pts.iter().enumerate() {
        if i == 0 {
            p.move_to(*pt);
        } else {
            p.line_to(*pt);
        }
    }
    p
}

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at `p1` from its neighbors (Steffen's method).
fn slope3(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = (p1.y - p0.y) / if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let s1 = (p2.y - p1.y) / if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_nan() { 0.0 } else { t }
}

/// Endpoint tangent from the one-sided difference and the neighboring tangent.
fn slope2(p0: Point, p1: Point, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h != 0.0 {
        (3.0 * (p1.y - p0.y) / h - t) / 2.0
    } else {
        t
    }
}

fn monotone_x_path(pts: &[Point]) -> BezPath {
    let n = pts.len();
    if n < 3 {
        return linear_path(pts);
    }
    let mut tangents = alloc::vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(pts[i - 1], pts[i], pts[i + 1]);
    }
    tangents[0] = slope2(pts[0], pts[1], tangents[1]);
    tangents[n - 1] = slope2(pts[n - 2], pts[n - 1], tangents[n - 2]);

    let mut p = BezPath::new();
    p.move_to(pts[0]);
    for i in 0..n - 1 {
        let (a, b) = (pts[i], pts[i + 1]);
        let dx = (b.x - a.x) / 3.0;
        p.curve_to(
            Point::new(a.x + dx, a.y + dx * tangents[i]),
            Point::new(b.x - dx, b.y - dx * tangents[i + 1]),
            b,
        );
    }
    p
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::PathEl;
    use parkviz_transforms::Column;

    use super::*;
    use crate::scale::{OrdinalDomain, ScaleContinuous, ScaleLinear};

    fn identity() -> PositionScale {
        PositionScale::Continuous(ScaleContinuous::Linear(ScaleLinear::new(
            (0.0, 100.0),
            (0.0, 100.0),
        )))
    }

    #[test]
    fn one_path_per_series_in_first_appearance_order() {
        let t = Table::new()
            .with_column(
                "area",
                Column::Text(vec!["B".into(), "A".into(), "B".into(), "A".into()]),
            )
            .and_then(|t| t.with_column("x", Column::Number(vec![0.0, 0.0, 10.0, 10.0])))
            .and_then(|t| t.with_column("y", Column::Number(vec![1.0, 2.0, 3.0, f64::NAN])))
            .unwrap();
        let colors = ScaleOrdinal::new(
            ["A", "B"].into_iter().collect::<OrdinalDomain>(),
            vec![css::RED, css::BLUE],
        );
        let spec = LineMarkSpec::new(7, "x", "y", identity(), identity())
            .with_series("area")
            .with_color(colors);
        let marks = spec.marks(&t).unwrap();
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].id, MarkId::for_key(7, "B"));
        let parkviz_core::MarkPayload::Path(b) = &marks[0].payload else {
            panic!("expected a path");
        };
        assert_eq!(b.path.elements().len(), 2);
        assert_eq!(b.stroke, Brush::Solid(css::BLUE));
        let parkviz_core::MarkPayload::Path(a) = &marks[1].payload else {
            panic!("expected a path");
        };
        assert_eq!(a.path.elements().len(), 1, "the NaN point is dropped");
    }

    #[test]
    fn monotone_curve_passes_through_points_without_overshoot() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 5.0),
        ];
        let path = monotone_x_path(&pts);
        let els = path.elements();
        assert_eq!(els.len(), 4);
        for (el, target) in els[1..].iter().zip(&pts[1..]) {
            let PathEl::CurveTo(c1, c2, end) = el else {
                panic!("expected cubic segments");
            };
            assert_eq!(end, target);
            // The flat middle segment must stay flat.
            if target.x == 2.0 {
                assert_eq!(c1.y, 1.0);
                assert_eq!(c2.y, 1.0);
            }
        }
    }

    #[test]
    fn monotone_series_place_control_points_at_thirds() {
        let t = Table::new()
            .with_column("x", Column::Number(vec![0.0, 30.0, 60.0]))
            .and_then(|t| t.with_column("y", Column::Number(vec![10.0, 40.0, 40.0])))
            .unwrap();
        let marks = LineMarkSpec::new(3, "x", "y", identity(), identity())
            .with_curve(Curve::MonotoneX)
            .marks(&t)
            .unwrap();
        let parkviz_core::MarkPayload::Path(line) = &marks[0].payload else {
            panic!("expected a path");
        };
        let PathEl::CurveTo(c1, c2, end) = line.path.elements()[1] else {
            panic!("expected a cubic segment");
        };
        assert!((c1.x - 10.0).abs() < 1e-9);
        assert!((c2.x - 20.0).abs() < 1e-9);
        assert_eq!(end, Point::new(30.0, 40.0));
    }

    #[test]
    fn short_series_fall_back_to_lines() {
        let path = monotone_x_path(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(matches!(path.elements()[1], PathEl::LineTo(_)));
    }
}
