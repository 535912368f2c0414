// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! Two legend shapes are provided:
//! - [`LegendSwatchesSpec`]: one swatch + label per category, flowing in a row or a column.
//! - [`QuantizeLegendSpec`]: a strip of color bands for a [`ScaleQuantize`], placed along a linear
//!   axis spanning the scale's domain.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use parkviz_core::{Mark, MarkId, MarkPayload, TextAnchor, TextBaseline};

use crate::axis::{AxisSpec, AxisStyle};
use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::scale::{ScaleLinearSpec, ScaleQuantize};
use crate::z_order;

fn union_rect(a: Rect, b: Rect) -> Rect {
    Rect::new(
        a.x0.min(b.x0),
        a.y0.min(b.y0),
        a.x1.max(b.x1),
        a.y1.max(b.y1),
    )
}

fn text_bounds(
    pos: Point,
    size: (f64, f64),
    anchor: TextAnchor,
    baseline: TextBaseline,
) -> Rect {
    let (w, h) = size;
    let (x0, x1) = match anchor {
        TextAnchor::Start => (pos.x, pos.x + w),
        TextAnchor::Middle => (pos.x - w * 0.5, pos.x + w * 0.5),
        TextAnchor::End => (pos.x - w, pos.x),
    };
    let (y0, y1) = match baseline {
        TextBaseline::Middle => (pos.y - h * 0.5, pos.y + h * 0.5),
        TextBaseline::Alphabetic => (pos.y - h, pos.y),
        TextBaseline::Hanging => (pos.y, pos.y + h),
    };
    Rect::new(x0, y0, x1, y1)
}

/// Estimates the union of mark bounds, measuring text with `measurer`.
pub fn marks_bounds(marks: &[Mark], measurer: &impl TextMeasurer) -> Option<Rect> {
    marks
        .iter()
        .filter_map(|m| match &m.payload {
            MarkPayload::Text(t) => Some(text_bounds(
                t.pos,
                measurer.measure(&t.text, t.font_size),
                t.anchor,
                t.baseline,
            )),
            other => other.bounds(),
        })
        .reduce(union_rect)
}

/// A simple legend item.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label string shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// How legend items flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegendFlow {
    /// Items stack top to bottom.
    Column,
    /// Items run left to right, each taking a fixed width.
    Row {
        /// Horizontal distance between item origins.
        item_width: f64,
    },
}

/// A categorical legend: swatches with text labels.
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base. Swatch `i` uses `base + i`, label `i` uses `base + 1000 + i`.
    pub id_base: u64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows in column flow.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Item flow.
    pub flow: LegendFlow,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a column legend with defaults.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            swatch_size: 10.0,
            row_gap: 6.0,
            label_dx: 5.0,
            flow: LegendFlow::Column,
            font_size: 12.0,
            text_fill: css::BLACK.into(),
            items,
        }
    }

    /// Sets the item flow.
    pub fn with_flow(mut self, flow: LegendFlow) -> Self {
        self.flow = flow;
        self
    }

    /// Set the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Generates legend marks with the top-left corner at `origin`.
    pub fn marks(&self, origin: Point) -> Vec<Mark> {
        let row_height = self.swatch_size.max(self.font_size);
        let mut out = Vec::with_capacity(self.items.len() * 2);
        for (i, item) in self.items.iter().enumerate() {
            let offset = match self.flow {
                LegendFlow::Column => Vec2::new(0.0, i as f64 * (row_height + self.row_gap)),
                LegendFlow::Row { item_width } => Vec2::new(i as f64 * item_width, 0.0),
            };
            let at = origin + offset;
            let swatch_y = at.y + (row_height - self.swatch_size) * 0.5;
            out.push(
                Mark::rect(
                    MarkId::from_raw(self.id_base + i as u64),
                    Rect::new(at.x, swatch_y, at.x + self.swatch_size, swatch_y + self.swatch_size),
                )
                .z_index(z_order::LEGEND_SWATCHES)
                .fill(item.fill.clone())
                .build(),
            );
            out.push(
                Mark::text(
                    MarkId::from_raw(self.id_base + 1000 + i as u64),
                    Point::new(at.x + self.swatch_size + self.label_dx, at.y + row_height * 0.5),
                    item.label.clone(),
                )
                .z_index(z_order::LEGEND_LABELS)
                .font_size(self.font_size)
                .fill(self.text_fill.clone())
                .anchor(TextAnchor::Start)
                .baseline(TextBaseline::Middle)
                .build(),
            );
        }
        out
    }

    /// Measures the legend size.
    pub fn measure(&self, measurer: &impl TextMeasurer) -> Size {
        marks_bounds(&self.marks(Point::ORIGIN), measurer)
            .map(|b| Size::new(b.width(), b.height()))
            .unwrap_or_default()
    }
}

/// Where a legend is placed within the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegendPlacement {
    /// Horizontally centered, with its top edge at `y`.
    BelowCentered {
        /// Top edge of the legend strip.
        y: f64,
    },
    /// Inset from the bottom-right corner: `x` from the right edge to the legend's right edge,
    /// `y` from the bottom edge to the legend's top edge.
    BottomRight {
        /// Inset from the view's bottom-right corner.
        inset: Vec2,
    },
    /// An explicit top-left corner.
    At(Point),
}

impl LegendPlacement {
    /// Returns the legend's top-left corner for a legend of `legend` size in a view of `view`.
    pub fn origin(&self, view: Size, legend: Size) -> Point {
        match *self {
            Self::BelowCentered { y } => Point::new((view.width - legend.width) * 0.5, y),
            Self::BottomRight { inset } => {
                Point::new(view.width - legend.width - inset.x, view.height - inset.y)
            }
            Self::At(p) => p,
        }
    }
}

/// A legend for a quantize color scale.
///
/// One swatch per palette entry spans that entry's domain extent along a linear axis of
/// `width` pixels. A tick axis sits along the bottom edge of the strip.
#[derive(Clone, Debug)]
pub struct QuantizeLegendSpec {
    /// Stable-id base. Swatch `i` uses `base + i`, the axis uses `base + 2000`, the title
    /// `base + 9000`.
    pub id_base: u64,
    /// The color scale being explained.
    pub scale: ScaleQuantize,
    /// Strip width.
    pub width: f64,
    /// Strip height.
    pub height: f64,
    /// Approximate tick count.
    pub tick_count: usize,
    /// Tick size; negative draws ticks up across the swatches.
    pub tick_size: f64,
    /// Decimals for tick labels; `None` uses step-aware formatting.
    pub tick_decimals: Option<usize>,
    /// Optional title centered above the strip.
    pub title: Option<String>,
    /// Placement within the view.
    pub placement: LegendPlacement,
}

impl QuantizeLegendSpec {
    /// Creates a 300×20 legend with six ticks, centered below the plot.
    pub fn new(id_base: u64, scale: ScaleQuantize) -> Self {
        Self {
            id_base,
            scale,
            width: 300.0,
            height: 20.0,
            tick_count: 6,
            tick_size: 20.0,
            tick_decimals: None,
            title: None,
            placement: LegendPlacement::BelowCentered { y: 620.0 },
        }
    }

    /// Sets the strip size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the tick size.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Formats tick labels with a fixed number of decimals.
    pub fn with_tick_decimals(mut self, decimals: usize) -> Self {
        self.tick_decimals = Some(decimals);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the placement.
    pub fn with_placement(mut self, placement: LegendPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns one `(lo, hi, color)` band per palette entry.
    ///
    /// Missing or zero extremes are replaced by the domain bounds.
    pub fn bands(&self) -> Vec<(f64, f64, Color)> {
        let (d0, d1) = self.scale.domain();
        self.scale
            .colors()
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                let (lo, hi) = self.scale.invert_extent(i)?;
                let lo = if lo.is_finite() && lo != 0.0 { lo } else { d0 };
                let hi = if hi.is_finite() && hi != 0.0 { hi } else { d1 };
                Some((lo, hi, *c))
            })
            .collect()
    }

    /// Generates legend marks for a view of the given size.
    pub fn marks(&self, view: Size) -> Vec<Mark> {
        let origin = self
            .placement
            .origin(view, Size::new(self.width, self.height));
        let strip = Rect::from_origin_size(origin, (self.width, self.height));
        let axis_scale = ScaleLinearSpec::new(self.scale.domain());
        let x = axis_scale.instantiate((strip.x0, strip.x1));

        let mut out = Vec::new();
        for (i, (lo, hi, color)) in self.bands().into_iter().enumerate() {
            out.push(
                Mark::rect(
                    MarkId::from_raw(self.id_base + i as u64),
                    Rect::new(x.map(lo), strip.y0, x.map(hi), strip.y1),
                )
                .z_index(z_order::LEGEND_SWATCHES)
                .fill(color)
                .build(),
            );
        }

        let rule = AxisStyle::default().rule;
        let style = AxisStyle {
            grid: rule.clone(),
            rule,
            ..AxisStyle::default()
        };
        let mut axis = AxisSpec::bottom(self.id_base + 2000, axis_scale)
            .with_tick_count(self.tick_count)
            .with_tick_size(self.tick_size)
            .with_domain(false)
            .with_style(style);
        if let Some(decimals) = self.tick_decimals {
            axis = axis.with_tick_formatter(move |v, _| crate::format::format_fixed(v, decimals));
        }
        out.extend(axis.marks(strip).into_iter().map(|mut m| {
            if m.z_index == z_order::GRID_LINES || m.z_index == z_order::AXIS_RULES {
                m.z_index = z_order::LEGEND_LABELS;
            }
            m
        }));

        if let Some(title) = &self.title {
            out.push(
                Mark::text(
                    MarkId::from_raw(self.id_base + 9000),
                    Point::new(strip.center().x, strip.y0 - 10.0),
                    title.clone(),
                )
                .z_index(z_order::LEGEND_LABELS)
                .font_size(12.0)
                .anchor(TextAnchor::Middle)
                .baseline(TextBaseline::Alphabetic)
                .fill(css::BLACK)
                .build(),
            );
        }
        out
    }
}
