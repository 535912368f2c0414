// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight segments for axis guides.
//!
//! Domain lines, tick marks and the full-width gridlines of the population and temperature
//! charts are all rules. Each one is an open two-point path with no fill, so hover styling and
//! transitions treat it like any other path mark.

use kurbo::{BezPath, Line, Point, Shape};
use peniko::Brush;
use peniko::color::palette::css;
use parkviz_core::{Mark, MarkId};

use crate::z_order;

/// A stroked segment between two scene points.
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Segment start.
    pub from: Point,
    /// Segment end.
    pub to: Point,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
    /// Draw order.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// A 1px black rule from `from` to `to`.
    pub fn new(id: MarkId, from: Point, to: Point) -> Self {
        Self {
            id,
            from,
            to,
            stroke: css::BLACK.into(),
            stroke_width: 1.0,
            z_index: z_order::SERIES_STROKE,
        }
    }

    /// A rule at height `y` spanning `x0..x1`.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, Point::new(x0, y), Point::new(x1, y))
    }

    /// A rule at `x` spanning `y0..y1`.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, Point::new(x, y0), Point::new(x, y1))
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the draw order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the rule mark.
    pub fn mark(&self) -> Mark {
        let path: BezPath = Line::new(self.from, self.to).to_path(0.1);
        Mark::path(self.id, path)
            .z_index(self.z_index)
            .fill(css::TRANSPARENT)
            .stroke(self.stroke.clone(), self.stroke_width)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl;
    use parkviz_core::MarkPayload;

    use super::*;

    #[test]
    fn gridline_spans_the_plot_unfilled() {
        let rule = RuleMarkSpec::horizontal(MarkId::from_raw(9), 40.0, 10.0, 210.0)
            .with_stroke(css::LIGHT_GRAY, 0.5)
            .with_z_index(z_order::GRID_LINES);
        let mark = rule.mark();
        assert_eq!(mark.z_index, z_order::GRID_LINES);
        let MarkPayload::Path(p) = &mark.payload else {
            panic!("rules are paths");
        };
        assert_eq!(
            p.path.elements(),
            [
                PathEl::MoveTo(Point::new(10.0, 40.0)),
                PathEl::LineTo(Point::new(210.0, 40.0)),
            ]
        );
        assert_eq!(p.fill, Brush::Solid(css::TRANSPARENT));
        assert_eq!(p.stroke_width, 0.5);
    }
}
