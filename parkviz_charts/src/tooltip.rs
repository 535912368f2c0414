// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip marks: a background box plus one text line per field, placed at the pointer.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use peniko::Brush;
use peniko::color::palette::css;
use parkviz_core::{Mark, MarkId, TextBaseline};

use crate::interaction::HoverState;
use crate::measure::TextMeasurer;
use crate::z_order;

/// A visible tooltip.
#[derive(Clone, Debug)]
pub struct TooltipSpec {
    /// Stable-id base. The background uses the base, line `i` uses `base + 1 + i`.
    pub id_base: u64,
    /// Top-left corner of the tooltip box.
    pub origin: Point,
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
    /// Font size of the lines.
    pub font_size: f64,
    /// Inner padding of the box.
    pub padding: f64,
    /// Box fill.
    pub background: Brush,
    /// Box outline.
    pub border: Brush,
    /// Text fill.
    pub text_fill: Brush,
}

impl TooltipSpec {
    /// Creates a tooltip at `pointer + offset`.
    pub fn new(id_base: u64, pointer: Point, offset: Vec2, lines: Vec<String>) -> Self {
        Self {
            id_base,
            origin: pointer + offset,
            lines,
            font_size: 12.0,
            padding: 6.0,
            background: css::WHITE.into(),
            border: css::GRAY.into(),
            text_fill: css::BLACK.into(),
        }
    }

    /// Builds the tooltip for the current hover, or `None` when nothing is hovered.
    ///
    /// `lines` receives the hovered key and returns the interpolated text; returning no lines
    /// also hides the tooltip.
    pub fn for_hover(
        id_base: u64,
        hover: Option<&HoverState>,
        offset: Vec2,
        lines: impl FnOnce(&str) -> Vec<String>,
    ) -> Option<Self> {
        let hover = hover?;
        let lines = lines(&hover.key);
        if lines.is_empty() {
            return None;
        }
        Some(Self::new(id_base, hover.pointer, offset, lines))
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Generates the background and line marks.
    pub fn marks(&self, measurer: &impl TextMeasurer) -> Vec<Mark> {
        let line_height = self.font_size * 1.3;
        let width = self
            .lines
            .iter()
            .map(|l| measurer.measure(l, self.font_size).0)
            .fold(0.0_f64, f64::max);
        let height = line_height * self.lines.len() as f64;
        let box_rect = Rect::from_origin_size(
            self.origin,
            (width + 2.0 * self.padding, height + 2.0 * self.padding),
        );

        let mut out = Vec::with_capacity(self.lines.len() + 1);
        out.push(
            Mark::rect(MarkId::from_raw(self.id_base), box_rect)
                .z_index(z_order::TOOLTIP)
                .fill(self.background.clone())
                .stroke(self.border.clone(), 1.0)
                .build(),
        );
        for (i, line) in self.lines.iter().enumerate() {
            let pos = Point::new(
                box_rect.x0 + self.padding,
                box_rect.y0 + self.padding + line_height * (i as f64 + 0.5),
            );
            out.push(
                Mark::text(MarkId::from_raw(self.id_base + 1 + i as u64), pos, line.clone())
                    .z_index(z_order::TOOLTIP)
                    .font_size(self.font_size)
                    .baseline(TextBaseline::Middle)
                    .bold(i == 0)
                    .fill(self.text_fill.clone())
                    .build(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use parkviz_core::MarkPayload;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn hidden_when_nothing_hovered() {
        let t = TooltipSpec::for_hover(1, None, Vec2::new(10.0, -20.0), |_| vec!["x".into()]);
        assert!(t.is_none());
    }

    #[test]
    fn positioned_at_pointer_plus_offset() {
        let hover = HoverState {
            key: "Downtown".into(),
            pointer: Point::new(100.0, 100.0),
        };
        let t = TooltipSpec::for_hover(500, Some(&hover), Vec2::new(10.0, -20.0), |key| {
            vec![key.into(), "Avg Weekday Rate: $4.00".into()]
        })
        .unwrap();
        let marks = t.marks(&HeuristicTextMeasurer);
        assert_eq!(marks.len(), 3);
        let bg = marks[0].payload.bounds().unwrap();
        assert_eq!((bg.x0, bg.y0), (110.0, 80.0));
        let MarkPayload::Text(first) = &marks[1].payload else {
            panic!("expected text");
        };
        assert_eq!(first.text, "Downtown");
        assert!(marks.iter().all(|m| m.z_index == z_order::TOOLTIP));
    }
}
