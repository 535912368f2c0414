// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use parkviz_transforms::TableError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors returned while loading a data source.
///
/// Loading is a single attempt; any error aborts the chart that needed the source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("failed to read `{path}`")]
    Io {
        /// Source path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("failed to parse CSV")]
    Csv(#[from] PolarsError),

    /// The GeoJSON document is not valid JSON or not a feature collection.
    #[error("failed to parse GeoJSON")]
    Json(#[from] serde_json::Error),

    /// A column named in the schema is absent from the header.
    #[error("column `{0}` not found in the data")]
    MissingColumn(String),

    /// The source parsed but produced no usable rows or features.
    #[error("{0} contains no usable records")]
    Empty(String),

    /// The coerced columns could not be assembled into a table.
    #[error("failed to assemble table")]
    Table(#[from] TableError),
}
