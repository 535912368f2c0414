// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data loading for `parkviz`.
//!
//! - CSV files are read with every column as text ([`read_csv`]), then typed by a [`Schema`]
//!   that coerces numbers and timestamps explicitly.
//! - GeoJSON feature collections are read into [`parkviz_charts::Feature`]s keyed by their
//!   `name` property ([`load_features`]).
//!
//! Loading is a single attempt with no retry. Every failure is a [`LoadError`]; callers abort the
//! chart that needed the source.

mod csv;
mod error;
mod geojson;
mod schema;

use std::path::Path;

use log::info;
use parkviz_transforms::Table;

pub use csv::{read_csv, read_csv_from};
pub use error::LoadError;
pub use geojson::{load_features, parse_features};
pub use schema::{Coerced, Coercion, MalformedPolicy, Schema, parse_number, parse_time};

/// Reads a CSV file and coerces it through `schema`.
///
/// Fails with [`LoadError::Empty`] when no row survives coercion.
pub fn load_table(path: &Path, schema: &Schema) -> Result<Table, LoadError> {
    let df = read_csv(path)?;
    let coerced = schema.apply(&df)?;
    if coerced.table.row_count() == 0 {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    info!(
        "loaded {} rows from {} ({} rejected)",
        coerced.table.row_count(),
        path.display(),
        coerced.rejected
    );
    Ok(coerced.table)
}
