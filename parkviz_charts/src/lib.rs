// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `parkviz_core`.
//!
//! This crate sits between aggregated tables (`parkviz_transforms`) and the retained scene
//! (`parkviz_core`):
//! - **Scales** map data values into screen coordinates or colors (linear, time, band, point,
//!   quantize, ordinal).
//! - **Guides** (axes, legends, tooltips) are built by generating `parkviz_core::Mark`s.
//! - **Mark generators** bind table rows or geographic features to keyed primitives, so a
//!   category keeps its mark id across filter changes.
//! - **Interaction** is a pure reducer over [`ChartState`]; hover styling is applied to freshly
//!   generated marks.
//!
//! Text shaping and layout are out of scope; text marks store unshaped strings and sizes are
//! estimated through a [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod axis;
mod bar_mark;
mod encode;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geo;
mod geo_mark;
mod interaction;
mod layout;
mod legend;
mod line_mark;
mod measure;
mod paired_bar_mark;
mod palette;
mod point_mark;
mod rule_mark;
mod scale;
mod text_mark;
mod time;
mod tooltip;
mod z_order;

pub use axis::{AxisOrient, AxisSpec, AxisStyle, StrokeStyle};
pub use bar_mark::{BarMarkSpec, BarOrientation};
pub use encode::{KEY_SEPARATOR, positions, row_keys};
pub use format::{format_currency, format_fixed, format_si, format_tick_with_step};
pub use geo::{Feature, Geometry, Mercator, Ring};
pub use geo_mark::{FALLBACK_FILL, GeoMarkSpec};
pub use interaction::{ChartState, HighlightStyle, HoverState, UiEvent, apply_hover, reduce};
pub use layout::{ChartConfig, Margin, Size};
pub use legend::{
    LegendFlow, LegendItem, LegendPlacement, LegendSwatchesSpec, QuantizeLegendSpec, marks_bounds,
};
pub use line_mark::{Curve, LineMarkSpec};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use paired_bar_mark::PairedBarMarkSpec;
pub use palette::{BLUES_7, CATEGORY_10, SET_3};
pub use point_mark::PointMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    OrdinalDomain, PositionScale, ScaleBand, ScaleBandSpec, ScaleContinuous, ScaleLinear,
    ScaleLinearSpec, ScaleOrdinal, ScalePoint, ScalePointSpec, ScaleQuantize, ScaleSpec,
    ScaleTime, ScaleTimeSpec, sanitize_domain,
};
pub use text_mark::TextMarkSpec;
pub use time::{format_time_label, nice_time_ticks_seconds};
pub use tooltip::TooltipSpec;
pub use z_order::*;
