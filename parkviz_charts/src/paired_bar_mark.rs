// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paired bars: two half-band bars per category (e.g. weekday and weekend rates).

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use peniko::Brush;
use parkviz_core::{Mark, MarkId};
use parkviz_transforms::{ExecutionError, Table};

use crate::bar_mark::BarMarkSpec;
use crate::scale::{OrdinalDomain, ScaleBand, ScaleContinuous};

/// Two vertical bars per category, side by side within the category's band.
///
/// The first bar of each pair uses identity layer `layer`, the second `layer + 1`, so both
/// primitives of a category stay bound to the same key across renders.
#[derive(Clone, Debug)]
pub struct PairedBarMarkSpec {
    bars: BarMarkSpec,
    /// Numeric column for the first (left) bar.
    pub first: String,
    /// Numeric column for the second (right) bar.
    pub second: String,
    /// Fill of the first bar.
    pub first_fill: Brush,
    /// Fill of the second bar.
    pub second_fill: Brush,
}

impl PairedBarMarkSpec {
    /// Creates a paired bar spec.
    pub fn new(
        layer: u64,
        key: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
        band: ScaleBand,
        categories: OrdinalDomain,
        value_scale: ScaleContinuous,
    ) -> Self {
        let first = first.into();
        Self {
            bars: BarMarkSpec::new(layer, key, first.clone(), band, categories, value_scale),
            first,
            second: second.into(),
            first_fill: Brush::default(),
            second_fill: Brush::default(),
        }
    }

    /// Sets both fills.
    pub fn with_fills(mut self, first: impl Into<Brush>, second: impl Into<Brush>) -> Self {
        self.first_fill = first.into();
        self.second_fill = second.into();
        self
    }

    /// The two mark ids bound to a category key.
    pub fn ids_for(&self, key: &str) -> [MarkId; 2] {
        [
            MarkId::for_key(self.bars.layer, key),
            MarkId::for_key(self.bars.layer + 1, key),
        ]
    }

    /// Generates up to two bars per row; a non-finite value drops only its own bar.
    pub fn marks(&self, table: &Table) -> Result<Vec<Mark>, ExecutionError> {
        let keys = table.text(&self.bars.key)?;
        let first = table.number(&self.first)?;
        let second = table.number(&self.second)?;
        let half = self.bars.band.band_width() * 0.5;

        let mut out = Vec::with_capacity(keys.len() * 2);
        for (row, key) in keys.iter().enumerate() {
            let [a, b] = self.ids_for(key);
            if let Some(rect) = self.bars.bar_rect(key, first[row], 0.0, half) {
                out.push(
                    Mark::rect(a, rect)
                        .z_index(self.bars.z_index)
                        .fill(self.first_fill.clone())
                        .build(),
                );
            }
            if let Some(rect) = self.bars.bar_rect(key, second[row], half, half) {
                out.push(
                    Mark::rect(b, rect)
                        .z_index(self.bars.z_index)
                        .fill(self.second_fill.clone())
                        .build(),
                );
            }
        }
        Ok(out)
    }
}
