// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide and tooltip layout.
//!
//! Text shaping happens downstream (SVG renderers, browsers), so guides accept a measurer for
//! rough bounds estimation.

/// A minimal text measurement interface used by guide generators.
///
/// Legends and tooltips use this to size backgrounds and estimate their extents before the
/// marks are generated.
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A heuristic text measurer assuming an average glyph width of ~0.6em and a height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}
