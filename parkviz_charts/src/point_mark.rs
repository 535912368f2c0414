// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point mark generation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Brush;
use parkviz_core::{Mark, MarkId};
use parkviz_transforms::{ExecutionError, Table};

use crate::encode::{positions, row_keys};
use crate::scale::{PositionScale, ScaleOrdinal};

/// A circle per row, positioned by two channels.
///
/// Each channel is a column read through a [`PositionScale`]: numeric columns for continuous
/// scales, text columns for point and band scales. Rows with a missing position on either
/// channel produce no circle. Identity comes from the `keys` columns.
#[derive(Clone, Debug)]
pub struct PointMarkSpec {
    /// Identity layer mixed into every mark id.
    pub layer: u64,
    /// Text columns forming the row key.
    pub keys: Vec<String>,
    /// Column for the x channel.
    pub x: String,
    /// Column for the y channel.
    pub y: String,
    /// X scale.
    pub x_scale: PositionScale,
    /// Y scale.
    pub y_scale: PositionScale,
    /// Circle radius.
    pub radius: f64,
    /// Fill paint when no color channel is set.
    pub fill: Brush,
    /// Optional categorical color channel: a text column and its palette.
    pub color: Option<(String, ScaleOrdinal)>,
    /// Outline paint and width.
    pub stroke: Option<(Brush, f64)>,
    /// Rendering order hint (`parkviz_core::Mark::z_index`).
    pub z_index: i32,
}

impl PointMarkSpec {
    /// Creates a point mark spec with radius 4 and a default fill.
    pub fn new(
        layer: u64,
        keys: Vec<String>,
        x: impl Into<String>,
        y: impl Into<String>,
        x_scale: PositionScale,
        y_scale: PositionScale,
    ) -> Self {
        Self {
            layer,
            keys,
            x: x.into(),
            y: y.into(),
            x_scale,
            y_scale,
            radius: 4.0,
            fill: Brush::default(),
            color: None,
            stroke: None,
            z_index: crate::z_order::SERIES_POINTS,
        }
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Colors circles by a text column.
    pub fn with_color(mut self, column: impl Into<String>, scale: ScaleOrdinal) -> Self {
        self.color = Some((column.into(), scale));
        self
    }

    /// Sets an outline.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = Some((stroke.into(), stroke_width));
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The mark id for a row key.
    pub fn id_for(&self, key: &str) -> MarkId {
        MarkId::for_key(self.layer, key)
    }

    /// Generates one circle per positioned row.
    pub fn marks(&self, table: &Table) -> Result<Vec<Mark>, ExecutionError> {
        let keys = row_keys(table, &self.keys)?;
        let xs = positions(&self.x_scale, table, &self.x)?;
        let ys = positions(&self.y_scale, table, &self.y)?;
        let colors = match &self.color {
            Some((col, _)) => Some(table.text(col)?),
            None => None,
        };

        let mut out = Vec::with_capacity(keys.len());
        for (row, key) in keys.iter().enumerate() {
            let (Some(x), Some(y)) = (xs[row], ys[row]) else {
                continue;
            };
            let fill = match (&self.color, colors) {
                (Some((_, scale)), Some(labels)) => scale
                    .map(&labels[row])
                    .map(Brush::Solid)
                    .unwrap_or_else(|| self.fill.clone()),
                _ => self.fill.clone(),
            };
            let mut b = Mark::circle(self.id_for(key), Point::new(x, y), self.radius)
                .z_index(self.z_index)
                .fill(fill);
            if let Some((stroke, width)) = &self.stroke {
                b = b.stroke(stroke.clone(), *width);
            }
            out.push(b.build());
        }
        Ok(out)
    }
}
