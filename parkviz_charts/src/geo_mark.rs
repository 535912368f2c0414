// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choropleth mark generation.

extern crate alloc;

use alloc::vec::Vec;

use peniko::color::palette::css;
use peniko::{Brush, Color};
use parkviz_core::{Mark, MarkId};
use parkviz_transforms::Joined;

use crate::geo::{Feature, Mercator};
use crate::scale::ScaleQuantize;

/// Fill for features without a usable statistic.
pub const FALLBACK_FILL: Color = Color::from_rgb8(0xcc, 0xcc, 0xcc);

/// One filled path per geographic feature, colored by a joined statistic.
///
/// `values` is the output of `parkviz_transforms::join_with_fallback` over the feature names.
/// A feature is colored through `scale` only when its value is finite and non-zero; everything
/// else, including features missing from `values`, gets `fallback`.
#[derive(Clone, Debug)]
pub struct GeoMarkSpec {
    /// Identity layer mixed into every mark id.
    pub layer: u64,
    /// Screen projection.
    pub projection: Mercator,
    /// Color scale for matched values.
    pub scale: ScaleQuantize,
    /// Fill for unmatched or zero values.
    pub fallback: Brush,
    /// Outline paint.
    pub stroke: Brush,
    /// Outline width.
    pub stroke_width: f64,
    /// Rendering order hint (`parkviz_core::Mark::z_index`).
    pub z_index: i32,
}

impl GeoMarkSpec {
    /// Creates a spec with the gray fallback and white 1px outlines.
    pub fn new(layer: u64, projection: Mercator, scale: ScaleQuantize) -> Self {
        Self {
            layer,
            projection,
            scale,
            fallback: FALLBACK_FILL.into(),
            stroke: css::WHITE.into(),
            stroke_width: 1.0,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the fallback fill.
    pub fn with_fallback(mut self, fallback: impl Into<Brush>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Sets the outline.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// The mark id for a feature name.
    pub fn id_for(&self, name: &str) -> MarkId {
        MarkId::for_key(self.layer, name)
    }

    /// The fill for a joined value.
    pub fn fill_for(&self, value: Option<f64>) -> Brush {
        value
            .filter(|v| v.is_finite() && *v != 0.0)
            .and_then(|v| self.scale.map(v))
            .map_or_else(|| self.fallback.clone(), Brush::Solid)
    }

    /// Generates one path per feature, in feature order.
    pub fn marks(&self, features: &[Feature], values: &[Joined]) -> Vec<Mark> {
        features
            .iter()
            .map(|f| {
                let value = values
                    .iter()
                    .find(|j| j.key == f.name)
                    .filter(|j| j.matched)
                    .map(|j| j.value);
                Mark::path(self.id_for(&f.name), self.projection.path(&f.geometry))
                    .z_index(self.z_index)
                    .fill(self.fill_for(value))
                    .stroke(self.stroke.clone(), self.stroke_width)
                    .build()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use parkviz_core::MarkPayload;

    use super::*;
    use crate::geo::Geometry;
    use crate::palette::BLUES_7;

    fn unit(name: &str, lon: f64) -> Feature {
        Feature::new(
            name,
            Geometry::Polygon(vec![vec![
                (lon, 49.0),
                (lon + 0.1, 49.0),
                (lon + 0.1, 49.1),
                (lon, 49.0),
            ]]),
        )
    }

    #[test]
    fn unmatched_and_zero_features_use_the_fallback() {
        let features = vec![
            unit("Downtown", -123.1),
            unit("Kitsilano", -123.2),
            unit("Stanley Park", -123.3),
        ];
        let values = vec![
            Joined {
                key: "Downtown".into(),
                value: 4.0,
                matched: true,
            },
            Joined {
                key: "Kitsilano".into(),
                value: 0.0,
                matched: true,
            },
            Joined {
                key: "Stanley Park".into(),
                value: 0.0,
                matched: false,
            },
        ];
        let scale = ScaleQuantize::new((0.0, 4.0), BLUES_7);
        let spec = GeoMarkSpec::new(1, Mercator::fit_size(960.0, 600.0, &features), scale);
        let marks = spec.marks(&features, &values);

        let fills: Vec<Brush> = marks
            .iter()
            .map(|m| match &m.payload {
                MarkPayload::Path(p) => p.fill.clone(),
                _ => panic!("expected paths"),
            })
            .collect();
        assert_eq!(fills[0], Brush::Solid(BLUES_7[6]));
        assert_eq!(fills[1], Brush::Solid(FALLBACK_FILL));
        assert_eq!(fills[2], Brush::Solid(FALLBACK_FILL));
        assert_eq!(marks[2].id, MarkId::for_key(1, "Stanley Park"));
    }

    #[test]
    fn nan_values_never_reach_the_scale() {
        let spec = GeoMarkSpec::new(1, Mercator::default(), ScaleQuantize::new((0.0, 1.0), BLUES_7));
        assert_eq!(spec.fill_for(Some(f64::NAN)), Brush::Solid(FALLBACK_FILL));
        assert_eq!(spec.fill_for(None), Brush::Solid(FALLBACK_FILL));
    }
}
