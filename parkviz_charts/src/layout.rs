// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-render chart configuration: view size, margins and interaction styling.
//!
//! A [`ChartConfig`] is built for each render call and passed through the pipeline; nothing
//! about a chart lives in shared state, so several independent chart instances can coexist.

use kurbo::{Rect, Vec2};
use peniko::Brush;

use crate::interaction::HighlightStyle;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the plot area for axes, titles and legends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// Creates a margin in CSS order (top, right, bottom, left).
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side.
    pub const fn uniform(m: f64) -> Self {
        Self::new(m, m, m, m)
    }
}

/// Configuration for one chart instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    /// Outer view size.
    pub size: Size,
    /// Margins between the view edge and the plot area.
    pub margin: Margin,
    /// Duration of update transitions in milliseconds.
    pub transition_ms: f64,
    /// Style applied to the hovered primitive.
    pub highlight: HighlightStyle,
    /// Offset from the pointer to the tooltip's top-left corner.
    pub tooltip_offset: Vec2,
}

impl ChartConfig {
    /// Creates a configuration with no margins, a 600 ms transition and the default highlight.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            margin: Margin::default(),
            transition_ms: 600.0,
            highlight: HighlightStyle::default(),
            tooltip_offset: Vec2::new(10.0, -20.0),
        }
    }

    /// Sets the margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the transition duration.
    pub fn with_transition_ms(mut self, transition_ms: f64) -> Self {
        self.transition_ms = transition_ms.max(0.0);
        self
    }

    /// Sets the hover highlight style.
    pub fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    /// Sets the hover fill, keeping the rest of the highlight style.
    pub fn with_highlight_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.highlight.fill = Some(fill.into());
        self
    }

    /// Sets the tooltip offset from the pointer.
    pub fn with_tooltip_offset(mut self, offset: Vec2) -> Self {
        self.tooltip_offset = offset;
        self
    }

    /// The full view rectangle.
    pub fn view(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    /// The plot rectangle inside the margins. Never inverted.
    pub fn plot(&self) -> Rect {
        let x0 = self.margin.left;
        let y0 = self.margin.top;
        let x1 = (self.size.width - self.margin.right).max(x0);
        let y1 = (self.size.height - self.margin.bottom).max(y0);
        Rect::new(x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn plot_is_inset_by_margins() {
        let config = ChartConfig::new(900.0, 500.0).with_margin(Margin::new(40.0, 30.0, 70.0, 70.0));
        assert_eq!(config.plot(), Rect::new(70.0, 40.0, 870.0, 430.0));
    }

    #[test]
    fn oversized_margins_collapse_plot() {
        let config = ChartConfig::new(50.0, 50.0).with_margin(Margin::uniform(40.0));
        let plot = config.plot();
        assert_eq!(plot.width(), 0.0);
        assert_eq!(plot.height(), 0.0);
    }
}
