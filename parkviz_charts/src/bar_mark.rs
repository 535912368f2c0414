// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar mark generation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Brush;
use parkviz_core::{Mark, MarkId};
use parkviz_transforms::{ExecutionError, Table};

use crate::scale::{OrdinalDomain, ScaleBand, ScaleContinuous};

/// Direction bars grow in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarOrientation {
    /// Bands along x, values along y.
    Vertical,
    /// Bands along y, values along x.
    Horizontal,
}

/// A keyed bar mark derived from a table.
///
/// Generates one rect per row, identified by `MarkId::for_key(layer, key)` so a category keeps its
/// primitive across filter changes. Rows with a non-finite value, or whose key is not in
/// `categories`, produce no bar.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Identity layer mixed into every mark id.
    pub layer: u64,
    /// Text column holding the category key.
    pub key: String,
    /// Numeric column holding the bar value.
    pub value: String,
    /// Band scale positioning categories.
    pub band: ScaleBand,
    /// Category order matching `band`.
    pub categories: OrdinalDomain,
    /// Scale for bar values.
    pub value_scale: ScaleContinuous,
    /// Bar direction.
    pub orientation: BarOrientation,
    /// Baseline in data units (typically `0.0`).
    pub baseline: f64,
    /// Fill paint for bars.
    pub fill: Brush,
    /// Rendering order hint (`parkviz_core::Mark::z_index`).
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a vertical bar spec with `baseline = 0` and a default fill.
    pub fn new(
        layer: u64,
        key: impl Into<String>,
        value: impl Into<String>,
        band: ScaleBand,
        categories: OrdinalDomain,
        value_scale: ScaleContinuous,
    ) -> Self {
        Self {
            layer,
            key: key.into(),
            value: value.into(),
            band,
            categories,
            value_scale,
            orientation: BarOrientation::Vertical,
            baseline: 0.0,
            fill: Brush::default(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the bar direction.
    pub fn with_orientation(mut self, orientation: BarOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the baseline in data units.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The mark id for a category key.
    pub fn id_for(&self, key: &str) -> MarkId {
        MarkId::for_key(self.layer, key)
    }

    /// Generates one bar per row.
    pub fn marks(&self, table: &Table) -> Result<Vec<Mark>, ExecutionError> {
        let keys = table.text(&self.key)?;
        let values = table.number(&self.value)?;
        Ok(keys
            .iter()
            .zip(values)
            .filter_map(|(key, &v)| {
                let rect = self.bar_rect(key, v, 0.0, self.band.band_width())?;
                Some(
                    Mark::rect(self.id_for(key), rect)
                        .z_index(self.z_index)
                        .fill(self.fill.clone())
                        .build(),
                )
            })
            .collect())
    }

    /// The rect for `key` at value `v`, covering `[offset, offset + thickness]` of its band.
    pub(crate) fn bar_rect(&self, key: &str, v: f64, offset: f64, thickness: f64) -> Option<Rect> {
        if !v.is_finite() {
            return None;
        }
        let i = self.categories.index_of(key)?;
        let b0 = self.band.x(i) + offset;
        let b1 = b0 + thickness;
        let v0 = self.value_scale.map(self.baseline);
        let v1 = self.value_scale.map(v);
        Some(match self.orientation {
            BarOrientation::Vertical => Rect::new(b0, v0.min(v1), b1, v0.max(v1)),
            BarOrientation::Horizontal => Rect::new(v0.min(v1), b0, v0.max(v1), b1),
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use parkviz_transforms::Column;

    use super::*;
    use crate::scale::{ScaleBandSpec, ScaleLinear};

    fn table() -> Table {
        Table::new()
            .with_column(
                "area",
                Column::Text(vec!["Downtown".into(), "Kitsilano".into(), "Oakridge".into()]),
            )
            .and_then(|t| t.with_column("rate", Column::Number(vec![4.0, 1.0, f64::NAN])))
            .unwrap()
    }

    #[test]
    fn vertical_bars_grow_up_from_baseline() {
        let categories: OrdinalDomain = ["Downtown", "Kitsilano", "Oakridge"].into_iter().collect();
        let band = ScaleBandSpec::new(3).with_uniform_padding(0.2).instantiate((0.0, 300.0));
        let y = ScaleContinuous::Linear(ScaleLinear::new((0.0, 4.0), (100.0, 0.0)));
        let spec = BarMarkSpec::new(1, "area", "rate", band, categories, y);

        let marks = spec.marks(&table()).unwrap();
        assert_eq!(marks.len(), 2, "NaN rows produce no bar");
        let downtown = marks[0].payload.bounds().unwrap();
        assert_eq!((downtown.y0, downtown.y1), (0.0, 100.0));
        assert!((downtown.width() - band.band_width()).abs() < 1e-9);
        assert_eq!(marks[1].id, MarkId::for_key(1, "Kitsilano"));
    }

    #[test]
    fn horizontal_bars_grow_right() {
        let categories: OrdinalDomain = ["Downtown", "Kitsilano"].into_iter().collect();
        let band = ScaleBandSpec::new(2).instantiate((0.0, 100.0));
        let x = ScaleContinuous::Linear(ScaleLinear::new((0.0, 4.0), (0.0, 400.0)));
        let spec = BarMarkSpec::new(1, "area", "rate", band, categories, x)
            .with_orientation(BarOrientation::Horizontal);
        let marks = spec.marks(&table()).unwrap();
        let k = marks[1].payload.bounds().unwrap();
        assert_eq!((k.x0, k.x1), (0.0, 100.0));
        assert!(k.y0 > 50.0, "second band sits below the first");
    }
}
