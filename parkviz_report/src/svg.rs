// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization of a retained mark set.

use std::collections::HashMap;

use kurbo::Rect;
use parkviz_charts::{HeuristicTextMeasurer, marks_bounds};
use parkviz_core::{Mark, MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};
use peniko::Brush;

/// The marks currently drawn into one SVG document.
#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, Mark>,
    view_box: Option<Rect>,
}

impl SvgScene {
    /// Creates an empty scene with a fixed view box.
    pub(crate) fn new(view_box: Rect) -> Self {
        Self {
            marks: HashMap::new(),
            view_box: Some(view_box),
        }
    }

    /// Creates a scene holding exactly `marks`.
    pub(crate) fn from_marks(view_box: Rect, marks: impl IntoIterator<Item = Mark>) -> Self {
        let mut scene = Self::new(view_box);
        scene.marks = marks.into_iter().map(|m| (m.id, m)).collect();
        scene
    }

    pub(crate) fn len(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter { id, new, .. } | MarkDiff::Update { id, new, .. } => {
                    self.marks.insert(*id, (**new).clone());
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let marks: Vec<Mark> = self.sorted().into_iter().cloned().collect();
        let view_box = self
            .view_box
            .or_else(|| marks_bounds(&marks, &HeuristicTextMeasurer).map(|r| r.inflate(10.0, 10.0)))
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();

        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');

        for mark in &marks {
            write_mark(&mut out, mark);
        }

        out.push_str("</svg>\n");
        out
    }

    fn sorted(&self) -> Vec<&Mark> {
        let mut marks: Vec<&Mark> = self.marks.values().collect();
        marks.sort_by_key(|m| (m.z_index, m.id));
        marks
    }
}

fn write_mark(out: &mut String, mark: &Mark) {
    let tag = match &mark.payload {
        MarkPayload::Rect(r) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.rect.x0,
                r.rect.y0,
                r.rect.width(),
                r.rect.height(),
            ));
            write_paint_attr(out, "fill", &r.fill);
            write_stroke(out, &r.stroke, r.stroke_width);
            "rect"
        }
        MarkPayload::Circle(c) => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            ));
            write_paint_attr(out, "fill", &c.fill);
            write_stroke(out, &c.stroke, c.stroke_width);
            "circle"
        }
        MarkPayload::Path(p) => {
            let d = p.path.to_svg();
            out.push_str(&format!(r#"<path d="{d}""#));
            write_paint_attr(out, "fill", &p.fill);
            write_stroke(out, &p.stroke, p.stroke_width);
            "path"
        }
        MarkPayload::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
            };
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                t.pos.x, t.pos.y, t.font_size, baseline
            ));
            if t.angle != 0.0 {
                out.push_str(&format!(
                    r#" transform="rotate({} {} {})""#,
                    t.angle, t.pos.x, t.pos.y
                ));
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            if t.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            write_paint_attr(out, "fill", &t.fill);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            if let Some(title) = &mark.title {
                write_title(out, title);
            }
            out.push_str("</text>\n");
            return;
        }
    };
    match &mark.title {
        Some(title) => {
            out.push('>');
            write_title(out, title);
            out.push_str(&format!("</{tag}>\n"));
        }
        None => out.push_str("/>\n"),
    }
}

fn write_title(out: &mut String, title: &str) {
    out.push_str("<title>");
    out.push_str(&escape_xml(title));
    out.push_str("</title>");
}

fn write_stroke(out: &mut String, stroke: &Brush, stroke_width: f64) {
    if stroke_width > 0.0 {
        write_paint_attr(out, "stroke", stroke);
        out.push_str(&format!(r#" stroke-width="{stroke_width}""#));
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};
    use parkviz_core::Scene;
    use peniko::Color;
    use peniko::color::palette::css;

    use super::*;

    fn bar(key: &str, height: f64) -> Mark {
        Mark::rect(MarkId::for_key(1, key), Rect::new(0.0, 100.0 - height, 10.0, 100.0))
            .fill(css::STEEL_BLUE)
            .build()
    }

    #[test]
    fn diffs_add_and_remove_elements() {
        let mut scene = Scene::new();
        let mut svg = SvgScene::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        svg.apply_diffs(&scene.tick(vec![bar("Downtown", 40.0), bar("Kitsilano", 20.0)]));
        assert_eq!(svg.len(), 2);
        svg.apply_diffs(&scene.tick(vec![bar("Downtown", 60.0)]));
        assert_eq!(svg.len(), 1);

        let doc = svg.to_svg_string();
        assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100""#));
        assert!(doc.contains(r##"<rect x="0" y="40" width="10" height="60" fill="#4682b4"/>"##));
        assert_eq!(doc.matches("<rect").count(), 1);
    }

    #[test]
    fn text_circles_and_titles() {
        let marks = vec![
            Mark::text(MarkId(1), Point::new(5.0, 5.0), "Mon–Fri <AM>")
                .bold(true)
                .z_index(2)
                .build(),
            Mark::circle(MarkId(2), Point::new(1.0, 2.0), 4.0)
                .fill(Color::from_rgba8(255, 165, 0, 128))
                .title("Downtown & West End")
                .z_index(1)
                .build(),
        ];
        let doc = SvgScene::from_marks(Rect::new(0.0, 0.0, 10.0, 10.0), marks).to_svg_string();
        assert!(doc.contains("Mon–Fri &lt;AM&gt;</text>"));
        assert!(doc.contains(r#"font-weight="bold""#));
        assert!(doc.contains("<title>Downtown &amp; West End</title></circle>"));
        assert!(doc.contains("fill-opacity="));
        assert!(
            doc.find("<circle").unwrap() < doc.find("<text").unwrap(),
            "paint order follows z-index"
        );
    }
}
