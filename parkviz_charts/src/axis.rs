// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! An [`AxisSpec`] pairs a scale spec with an orientation. Given the plot rectangle it both
//! instantiates the scale used by the series marks ([`AxisSpec::position_scale`]) and generates
//! the guide marks ([`AxisSpec::marks`]), so ticks and data always agree.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use parkviz_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_tick_with_step;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{
    OrdinalDomain, PositionScale, ScaleContinuous, ScaleLinear, ScaleSpec, ScaleTime,
    discrete_index,
};
use crate::z_order;

/// A paint + width pair for stroked paths (domain lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and outward tick marks.
    pub rule: StrokeStyle,
    /// Style for inward (negative size) ticks drawn across the plot.
    pub grid: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            rule: rule.clone(),
            grid: StrokeStyle::solid(css::BLACK.with_alpha(0.1), 1.0),
            label_fill: rule.brush.clone(),
            label_font_size: 10.0,
            title_fill: rule.brush,
            title_font_size: 12.0,
        }
    }
}

/// Axis orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
}

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale specification.
    pub scale: ScaleSpec,
    /// Category labels for point and band scales, in index order.
    pub categories: OrdinalDomain,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks for continuous scales.
    pub tick_count: usize,
    /// Tick line length. Negative values draw ticks inward across the plot as gridlines.
    pub tick_size: f64,
    /// Padding between the tick end and the tick label.
    pub tick_padding: f64,
    /// Tick label rotation angle in degrees.
    pub label_angle: f64,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional axis title text.
    pub title: Option<String>,
    /// Distance from the plot edge to the title.
    pub title_offset: f64,
    /// Optional tick label formatter, called with the tick value and the tick step.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("categories", &self.categories)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("tick_padding", &self.tick_padding)
            .field("label_angle", &self.label_angle)
            .field("show_domain", &self.show_domain)
            .field("style", &self.style)
            .field("title", &self.title)
            .field("title_offset", &self.title_offset)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish()
    }
}

impl AxisSpec {
    /// Creates a new axis specification.
    ///
    /// The returned axis has `tick_count = 10`, `tick_size = 6`, `tick_padding = 3`, a domain
    /// line, no title and no categories.
    pub fn new(id_base: u64, scale: impl Into<ScaleSpec>, orient: AxisOrient) -> Self {
        Self {
            id_base,
            scale: scale.into(),
            categories: OrdinalDomain::new(),
            orient,
            tick_count: 10,
            tick_size: 6.0,
            tick_padding: 3.0,
            label_angle: 0.0,
            show_domain: true,
            style: AxisStyle::default(),
            title: None,
            title_offset: 40.0,
            tick_formatter: None,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Sets the category labels used by point and band scales.
    pub fn with_categories(mut self, categories: OrdinalDomain) -> Self {
        self.categories = categories;
        self
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set tick size in scene coordinates.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Set tick padding in scene coordinates.
    pub fn with_tick_padding(mut self, tick_padding: f64) -> Self {
        self.tick_padding = tick_padding;
        self
    }

    /// Set tick label rotation angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = angle_degrees;
        self
    }

    /// Enable or disable the axis domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title offset in scene coordinates.
    pub fn with_title_offset(mut self, title_offset: f64) -> Self {
        self.title_offset = title_offset;
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Continuous left axes grow upward; categories on a left axis read top to bottom.
    fn range(&self, plot: Rect) -> (f64, f64) {
        match (self.orient, &self.scale) {
            (AxisOrient::Bottom, _) => (plot.x0, plot.x1),
            (AxisOrient::Left, ScaleSpec::Point(_) | ScaleSpec::Band(_)) => (plot.y0, plot.y1),
            (AxisOrient::Left, _) => (plot.y1, plot.y0),
        }
    }

    /// Returns the continuous scale for this axis, or `None` for point and band axes.
    pub fn scale_continuous(&self, plot: Rect) -> Option<ScaleContinuous> {
        let range = self.range(plot);
        match self.scale {
            ScaleSpec::Linear(s) => Some(ScaleContinuous::Linear(
                s.instantiate_resolved(range, self.tick_count),
            )),
            ScaleSpec::Time(s) => Some(ScaleContinuous::Time(
                s.instantiate_resolved(range, self.tick_count),
            )),
            ScaleSpec::Point(_) | ScaleSpec::Band(_) => None,
        }
    }

    /// Returns the position scale that series marks on this axis should use.
    pub fn position_scale(&self, plot: Rect) -> PositionScale {
        let range = self.range(plot);
        match self.scale {
            ScaleSpec::Point(s) => PositionScale::Point(s.instantiate(range), self.categories.clone()),
            ScaleSpec::Band(s) => PositionScale::Band(s.instantiate(range), self.categories.clone()),
            ScaleSpec::Linear(s) => PositionScale::Continuous(ScaleContinuous::Linear(
                s.instantiate_resolved(range, self.tick_count),
            )),
            ScaleSpec::Time(s) => PositionScale::Continuous(ScaleContinuous::Time(
                s.instantiate_resolved(range, self.tick_count),
            )),
        }
    }

    fn tick_values(&self) -> (Vec<f64>, f64) {
        match self.scale {
            ScaleSpec::Linear(s) => {
                let domain = s.resolved_domain(self.tick_count);
                let ticks = ScaleLinear::new(domain, (0.0, 1.0)).ticks(self.tick_count);
                let step = tick_step(&ticks);
                (ticks, step)
            }
            ScaleSpec::Time(s) => {
                let domain = s.resolved_domain(self.tick_count);
                let ticks = ScaleTime::new(domain, (0.0, 1.0)).ticks(self.tick_count);
                let step = tick_step(&ticks);
                (ticks, step)
            }
            ScaleSpec::Point(s) => ((0..s.count).map(|i| i as f64).collect(), 1.0),
            ScaleSpec::Band(s) => ((0..s.count).map(|i| i as f64).collect(), 1.0),
        }
    }

    fn format_tick(&self, v: f64, step: f64) -> String {
        if let Some(f) = &self.tick_formatter {
            return (f)(v, step);
        }
        match self.scale {
            ScaleSpec::Point(_) | ScaleSpec::Band(_) => self
                .categories
                .label(discrete_index(v))
                .map(String::from)
                .unwrap_or_default(),
            ScaleSpec::Time(_) => crate::time::format_time_label(v, step),
            ScaleSpec::Linear(_) => format_tick_with_step(v, step),
        }
    }

    /// Generates axis marks for the given plot rectangle.
    pub fn marks(&self, plot: Rect) -> Vec<Mark> {
        let scale = self.position_scale(plot);
        let (ticks, step) = self.tick_values();
        let outward = self.tick_size.max(0.0);
        let (tick_brush, tick_width, tick_z) = if self.tick_size < 0.0 {
            (&self.style.grid.brush, self.style.grid.stroke_width, z_order::GRID_LINES)
        } else {
            (&self.style.rule.brush, self.style.rule.stroke_width, z_order::AXIS_RULES)
        };

        let mut out = Vec::new();

        if self.show_domain {
            let rule = match self.orient {
                AxisOrient::Bottom => {
                    RuleMarkSpec::horizontal(MarkId::from_raw(self.id_base), plot.y1, plot.x0, plot.x1)
                }
                AxisOrient::Left => {
                    RuleMarkSpec::vertical(MarkId::from_raw(self.id_base), plot.x0, plot.y0, plot.y1)
                }
            };
            out.push(
                rule.with_stroke(self.style.rule.brush.clone(), self.style.rule.stroke_width)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
        }

        for (i, v) in ticks.iter().copied().enumerate() {
            let pos = scale.map_number(v);
            let in_plot = match self.orient {
                AxisOrient::Bottom => pos >= plot.x0 - 1.0e-9 && pos <= plot.x1 + 1.0e-9,
                AxisOrient::Left => pos >= plot.y0 - 1.0e-9 && pos <= plot.y1 + 1.0e-9,
            };
            if !in_plot {
                continue;
            }
            let tick_id = MarkId::from_raw(self.id_base + 1 + i as u64);
            let label_id = MarkId::from_raw(self.id_base + 1000 + i as u64);
            let label = self.format_tick(v, step);

            let (tick, label_mark) = match self.orient {
                AxisOrient::Bottom => {
                    let y = plot.y1;
                    let tick = RuleMarkSpec::vertical(tick_id, pos, y, y + self.tick_size);
                    let anchor = if self.label_angle == 0.0 {
                        TextAnchor::Middle
                    } else {
                        TextAnchor::End
                    };
                    let at = Point::new(pos, y + outward + self.tick_padding);
                    let text = Mark::text(label_id, at, label)
                        .anchor(anchor)
                        .baseline(TextBaseline::Hanging)
                        .angle(self.label_angle);
                    (tick, text)
                }
                AxisOrient::Left => {
                    let x = plot.x0;
                    let tick = RuleMarkSpec::horizontal(tick_id, pos, x - self.tick_size, x);
                    let at = Point::new(x - outward - self.tick_padding, pos);
                    let text = Mark::text(label_id, at, label)
                        .anchor(TextAnchor::End)
                        .baseline(TextBaseline::Middle)
                        .angle(self.label_angle);
                    (tick, text)
                }
            };
            if self.tick_size != 0.0 {
                out.push(
                    tick.with_stroke(tick_brush.clone(), tick_width)
                        .with_z_index(tick_z)
                        .mark(),
                );
            }
            out.push(
                label_mark
                    .z_index(z_order::AXIS_LABELS)
                    .font_size(self.style.label_font_size)
                    .fill(self.style.label_fill.clone())
                    .build(),
            );
        }

        if let Some(title) = &self.title {
            let id = MarkId::from_raw(self.id_base + 9000);
            let builder = match self.orient {
                AxisOrient::Bottom => {
                    let at = Point::new((plot.x0 + plot.x1) * 0.5, plot.y1 + self.title_offset);
                    Mark::text(id, at, title.clone())
                }
                AxisOrient::Left => {
                    let at = Point::new(plot.x0 - self.title_offset, (plot.y0 + plot.y1) * 0.5);
                    Mark::text(id, at, title.clone()).angle(-90.0)
                }
            };
            out.push(
                builder
                    .z_index(z_order::AXIS_TITLES)
                    .font_size(self.style.title_font_size)
                    .fill(self.style.title_fill.clone())
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Middle)
                    .build(),
            );
        }

        out
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use parkviz_core::{MarkPayload, TextPayload};

    use super::*;
    use crate::scale::{ScaleBandSpec, ScaleLinearSpec, ScalePointSpec};

    fn texts(marks: &[Mark]) -> Vec<(MarkId, TextPayload)> {
        marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some((m.id, t.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn band_axis_labels_sit_at_band_centers() {
        let plot = Rect::new(0.0, 0.0, 300.0, 100.0);
        let categories: OrdinalDomain = ["Downtown", "Fairview", "Kitsilano"].into_iter().collect();
        let axis = AxisSpec::bottom(1, ScaleBandSpec::new(3).with_uniform_padding(0.2))
            .with_categories(categories);

        let PositionScale::Band(band, _) = axis.position_scale(plot) else {
            panic!("expected a band scale");
        };
        let labels = texts(&axis.marks(plot));
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[1].1.text, "Fairview");
        assert!((labels[1].1.pos.x - band.center(1)).abs() < 1e-9);
        assert_eq!(labels[1].0, MarkId::from_raw(1 + 1000 + 1));
    }

    #[test]
    fn negative_tick_size_draws_gridlines_across_plot() {
        let plot = Rect::new(0.0, 0.0, 200.0, 100.0);
        let axis = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 4.0)))
            .with_tick_count(4)
            .with_tick_size(-200.0);
        let marks = axis.marks(plot);
        let grid: Vec<&Mark> = marks
            .iter()
            .filter(|m| m.z_index == z_order::GRID_LINES)
            .collect();
        assert_eq!(grid.len(), 5, "one gridline per tick 0..=4");
        let b = grid[0].payload.bounds().unwrap();
        assert_eq!((b.x0, b.x1), (0.0, 200.0));
    }

    #[test]
    fn custom_formatter_and_title() {
        let plot = Rect::new(10.0, 10.0, 110.0, 110.0);
        let axis = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 4.0)))
            .with_tick_count(2)
            .with_tick_formatter(|v, _| alloc::format!("${v:.2}"))
            .with_title("Rate")
            .with_title_offset(30.0);
        let labels = texts(&axis.marks(plot));
        assert!(labels.iter().any(|(_, t)| t.text == "$4.00"));
        let (_, title) = labels
            .iter()
            .find(|(id, _)| *id == MarkId::from_raw(9001))
            .unwrap();
        assert_eq!(title.angle, -90.0);
        assert_eq!(title.pos, Point::new(-20.0, 60.0));
    }

    #[test]
    fn left_band_axis_lists_categories_top_down() {
        let plot = Rect::new(0.0, 0.0, 100.0, 200.0);
        let categories: OrdinalDomain = ["China", "India"].into_iter().collect();
        let axis = AxisSpec::left(1, ScaleBandSpec::new(2)).with_categories(categories);
        let labels = texts(&axis.marks(plot));
        assert!(labels[0].1.pos.y < labels[1].1.pos.y, "first category on top");
    }

    #[test]
    fn rotated_point_labels_anchor_at_end() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let categories: OrdinalDomain = ["a", "b"].into_iter().collect();
        let axis = AxisSpec::bottom(1, ScalePointSpec::new(2))
            .with_categories(categories)
            .with_label_angle(-45.0);
        let labels = texts(&axis.marks(plot));
        assert_eq!(
            labels.iter().map(|(_, t)| t.anchor).collect::<Vec<_>>(),
            vec![TextAnchor::End, TextAnchor::End]
        );
    }
}
