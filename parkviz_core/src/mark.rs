// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark payloads and the mark builder.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, PathEl, Point, Rect};
use peniko::{Brush, Color};

use crate::MarkId;

/// The primitive kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Circle given by center and radius.
    Circle,
    /// Arbitrary path.
    Path,
    /// Unshaped text run.
    Text,
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor position.
    Start,
    /// Text is centered on the anchor position.
    Middle,
    /// Text ends at the anchor position.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor is the vertical middle of the text.
    Middle,
    /// The anchor is the alphabetic baseline.
    Alphabetic,
    /// The anchor is the top of the text.
    Hanging,
}

/// Rectangle payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is zero).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// Circle payload.
#[derive(Clone, Debug, PartialEq)]
pub struct CirclePayload {
    /// Center in scene coordinates.
    pub center: Point,
    /// Radius in scene coordinates.
    pub radius: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is zero).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// Path payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPayload {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is zero).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// Text payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Rotation about `pos`, in degrees.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Bold weight.
    pub bold: bool,
    /// Fill paint.
    pub fill: Brush,
}

/// The encoded attributes of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// See [`RectPayload`].
    Rect(RectPayload),
    /// See [`CirclePayload`].
    Circle(CirclePayload),
    /// See [`PathPayload`].
    Path(PathPayload),
    /// See [`TextPayload`].
    Text(TextPayload),
}

impl MarkPayload {
    /// Returns the primitive kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Circle(_) => MarkKind::Circle,
            Self::Path(_) => MarkKind::Path,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Returns the geometric bounds, if they can be computed without text metrics.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Circle(c) => Some(Rect::new(
                c.center.x - c.radius,
                c.center.y - c.radius,
                c.center.x + c.radius,
                c.center.y + c.radius,
            )),
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    None
                } else {
                    Some(kurbo::Shape::bounding_box(&p.path))
                }
            }
            Self::Text(_) => None,
        }
    }

    /// Returns the fill paint.
    pub fn fill(&self) -> &Brush {
        match self {
            Self::Rect(r) => &r.fill,
            Self::Circle(c) => &c.fill,
            Self::Path(p) => &p.fill,
            Self::Text(t) => &t.fill,
        }
    }

    /// Replaces the fill paint.
    pub fn set_fill(&mut self, fill: Brush) {
        match self {
            Self::Rect(r) => r.fill = fill,
            Self::Circle(c) => c.fill = fill,
            Self::Path(p) => p.fill = fill,
            Self::Text(t) => t.fill = fill,
        }
    }

    /// Replaces the stroke width. Text has no stroke and is left untouched.
    pub fn set_stroke_width(&mut self, stroke_width: f64) {
        match self {
            Self::Rect(r) => r.stroke_width = stroke_width,
            Self::Circle(c) => c.stroke_width = stroke_width,
            Self::Path(p) => p.stroke_width = stroke_width,
            Self::Text(_) => {}
        }
    }

    /// Replaces the radius of a circle. Other kinds are left untouched.
    pub fn set_radius(&mut self, radius: f64) {
        if let Self::Circle(c) = self {
            c.radius = radius;
        }
    }

    /// A collapsed version of this payload used as the starting state of an entering mark.
    ///
    /// Rectangles collapse onto their bottom edge, circles to zero radius. Paths and text have no
    /// neutral state.
    pub fn neutral(&self) -> Option<Self> {
        match self {
            Self::Rect(r) => {
                let mut out = r.clone();
                out.rect = Rect::new(r.rect.x0, r.rect.y1, r.rect.x1, r.rect.y1);
                Some(Self::Rect(out))
            }
            Self::Circle(c) => {
                let mut out = c.clone();
                out.radius = 0.0;
                Some(Self::Circle(out))
            }
            Self::Path(_) | Self::Text(_) => None,
        }
    }

    /// Linearly interpolates every numeric attribute from `self` (`t = 0`) to `to` (`t = 1`).
    ///
    /// Non-numeric attributes (text content, anchors) take the target value. Payloads of different
    /// kinds, and paths whose element structure differs, snap to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return to.clone();
        }
        match (self, to) {
            (Self::Rect(a), Self::Rect(b)) => Self::Rect(RectPayload {
                rect: lerp_rect(a.rect, b.rect, t),
                fill: lerp_brush(&a.fill, &b.fill, t),
                stroke: lerp_brush(&a.stroke, &b.stroke, t),
                stroke_width: lerp(a.stroke_width, b.stroke_width, t),
            }),
            (Self::Circle(a), Self::Circle(b)) => Self::Circle(CirclePayload {
                center: a.center.lerp(b.center, t),
                radius: lerp(a.radius, b.radius, t),
                fill: lerp_brush(&a.fill, &b.fill, t),
                stroke: lerp_brush(&a.stroke, &b.stroke, t),
                stroke_width: lerp(a.stroke_width, b.stroke_width, t),
            }),
            (Self::Path(a), Self::Path(b)) => match lerp_path(&a.path, &b.path, t) {
                Some(path) => Self::Path(PathPayload {
                    path,
                    fill: lerp_brush(&a.fill, &b.fill, t),
                    stroke: lerp_brush(&a.stroke, &b.stroke, t),
                    stroke_width: lerp(a.stroke_width, b.stroke_width, t),
                }),
                None => to.clone(),
            },
            (Self::Text(a), Self::Text(b)) => Self::Text(TextPayload {
                pos: a.pos.lerp(b.pos, t),
                text: b.text.clone(),
                font_size: lerp(a.font_size, b.font_size, t),
                angle: lerp(a.angle, b.angle, t),
                anchor: b.anchor,
                baseline: b.baseline,
                bold: b.bold,
                fill: lerp_brush(&a.fill, &b.fill, t),
            }),
            _ => to.clone(),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

/// Interpolates two brushes. Only solid colors interpolate; anything else snaps to `to`.
pub fn lerp_brush(from: &Brush, to: &Brush, t: f64) -> Brush {
    match (from, to) {
        (Brush::Solid(a), Brush::Solid(b)) => {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "interpolation factor is clamped to [0, 1]"
            )]
            let t = t as f32;
            let mut components = [0.0_f32; 4];
            for (i, c) in components.iter_mut().enumerate() {
                *c = a.components[i] + (b.components[i] - a.components[i]) * t;
            }
            Brush::Solid(Color::new(components))
        }
        _ => to.clone(),
    }
}

fn lerp_path(a: &BezPath, b: &BezPath, t: f64) -> Option<BezPath> {
    let ea = a.elements();
    let eb = b.elements();
    if ea.len() != eb.len() {
        return None;
    }
    let mut out = Vec::with_capacity(ea.len());
    for (x, y) in ea.iter().zip(eb) {
        let el = match (x, y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(*q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(*q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(*q1, t), p2.lerp(*q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(p1.lerp(*q1, t), p2.lerp(*q2, t), p3.lerp(*q3, t))
            }
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => return None,
        };
        out.push(el);
    }
    Some(BezPath::from_vec(out))
}

/// A rendered primitive: identity, paint order and encoded attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order. Renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Encoded attributes.
    pub payload: MarkPayload,
    /// Optional hover title (renderers may expose it as a native tooltip).
    pub title: Option<String>,
}

impl Mark {
    /// Starts a rectangle mark.
    pub fn rect(id: MarkId, rect: Rect) -> MarkBuilder {
        MarkBuilder::new(
            id,
            MarkPayload::Rect(RectPayload {
                rect,
                fill: Brush::default(),
                stroke: Brush::Solid(Color::TRANSPARENT),
                stroke_width: 0.0,
            }),
        )
    }

    /// Starts a circle mark.
    pub fn circle(id: MarkId, center: Point, radius: f64) -> MarkBuilder {
        MarkBuilder::new(
            id,
            MarkPayload::Circle(CirclePayload {
                center,
                radius,
                fill: Brush::default(),
                stroke: Brush::Solid(Color::TRANSPARENT),
                stroke_width: 0.0,
            }),
        )
    }

    /// Starts a path mark.
    pub fn path(id: MarkId, path: BezPath) -> MarkBuilder {
        MarkBuilder::new(
            id,
            MarkPayload::Path(PathPayload {
                path,
                fill: Brush::default(),
                stroke: Brush::Solid(Color::TRANSPARENT),
                stroke_width: 0.0,
            }),
        )
    }

    /// Starts a text mark.
    pub fn text(id: MarkId, pos: Point, text: impl Into<String>) -> MarkBuilder {
        MarkBuilder::new(
            id,
            MarkPayload::Text(TextPayload {
                pos,
                text: text.into(),
                font_size: 10.0,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
                bold: false,
                fill: Brush::default(),
            }),
        )
    }

    /// Returns the primitive kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }

    /// Interpolates between two versions of the same mark.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            id: to.id,
            z_index: to.z_index,
            payload: self.payload.lerp(&to.payload, t),
            title: to.title.clone(),
        }
    }
}

/// Builder for [`Mark`]s, started from one of the `Mark` geometry constructors.
///
/// Style setters that do not apply to the payload kind are ignored.
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    mark: Mark,
}

impl MarkBuilder {
    fn new(id: MarkId, payload: MarkPayload) -> Self {
        Self {
            mark: Mark {
                id,
                z_index: 0,
                payload,
                title: None,
            },
        }
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.mark.z_index = z_index;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.payload.set_fill(fill.into());
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        let stroke = stroke.into();
        match &mut self.mark.payload {
            MarkPayload::Rect(r) => {
                r.stroke = stroke;
                r.stroke_width = stroke_width;
            }
            MarkPayload::Circle(c) => {
                c.stroke = stroke;
                c.stroke_width = stroke_width;
            }
            MarkPayload::Path(p) => {
                p.stroke = stroke;
                p.stroke_width = stroke_width;
            }
            MarkPayload::Text(_) => {}
        }
        self
    }

    /// Sets the font size of a text mark.
    pub fn font_size(mut self, font_size: f64) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.font_size = font_size;
        }
        self
    }

    /// Sets the rotation angle (degrees) of a text mark.
    pub fn angle(mut self, angle: f64) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.angle = angle;
        }
        self
    }

    /// Sets the anchor of a text mark.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.anchor = anchor;
        }
        self
    }

    /// Sets the baseline of a text mark.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.baseline = baseline;
        }
        self
    }

    /// Sets bold weight on a text mark.
    pub fn bold(mut self, bold: bool) -> Self {
        if let MarkPayload::Text(t) = &mut self.mark.payload {
            t.bold = bold;
        }
        self
    }

    /// Sets the hover title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.mark.title = Some(title.into());
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        self.mark
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn rect_lerp_is_linear() {
        let a = Mark::rect(MarkId(1), Rect::new(0.0, 0.0, 10.0, 10.0))
            .fill(css::BLACK)
            .build();
        let b = Mark::rect(MarkId(1), Rect::new(10.0, 20.0, 30.0, 40.0))
            .fill(css::WHITE)
            .build();
        let mid = a.lerp(&b, 0.5);
        let MarkPayload::Rect(r) = &mid.payload else {
            panic!("expected rect payload");
        };
        assert_eq!(r.rect, Rect::new(5.0, 10.0, 20.0, 25.0));
        let Brush::Solid(c) = r.fill else {
            panic!("expected solid fill");
        };
        assert!((c.components[0] - 0.5).abs() < 1e-6, "red channel halfway");
    }

    #[test]
    fn path_lerp_snaps_on_structure_change() {
        let mut a = BezPath::new();
        a.move_to((0.0, 0.0));
        a.line_to((10.0, 0.0));
        let mut b = BezPath::new();
        b.move_to((0.0, 10.0));
        b.line_to((10.0, 10.0));
        b.line_to((20.0, 10.0));
        let pa = Mark::path(MarkId(2), a).build();
        let pb = Mark::path(MarkId(2), b).build();
        assert_eq!(pa.lerp(&pb, 0.25).payload, pb.payload);
    }

    #[test]
    fn neutral_rect_collapses_to_bottom_edge() {
        let m = Mark::rect(MarkId(3), Rect::new(0.0, 5.0, 4.0, 25.0)).build();
        let Some(MarkPayload::Rect(r)) = m.payload.neutral() else {
            panic!("rects have a neutral state");
        };
        assert_eq!(r.rect.y0, 25.0);
        assert_eq!(r.rect.height(), 0.0);
    }
}
