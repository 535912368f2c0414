// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned columnar table used as input and output of transform execution.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::ExecutionError;

/// The element type of a [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Categorical strings.
    Text,
    /// Floating point numbers.
    Number,
    /// Instants, as seconds since the Unix epoch.
    Time,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Time => "time",
        })
    }
}

/// A single typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Categorical strings.
    Text(Vec<String>),
    /// Floating point numbers. Missing values are `NaN`.
    Number(Vec<f64>),
    /// Seconds since the Unix epoch. Missing values are `NaN`.
    Time(Vec<f64>),
}

impl Column {
    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Number(v) | Self::Time(v) => v.len(),
        }
    }

    /// Returns `true` when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element type.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Text(_) => ColumnType::Text,
            Self::Number(_) => ColumnType::Number,
            Self::Time(_) => ColumnType::Time,
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        match self {
            Self::Text(v) => Self::Text(rows.iter().map(|&i| v[i].clone()).collect()),
            Self::Number(v) => Self::Number(rows.iter().map(|&i| v[i]).collect()),
            Self::Time(v) => Self::Time(rows.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// Errors returned when building a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A column with this name already exists.
    DuplicateColumn(String),
    /// A column's length differs from the table's row count.
    LengthMismatch {
        /// Column name.
        column: String,
        /// The table's row count.
        expected: usize,
        /// The column's length.
        found: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate column `{name}`"),
            Self::LengthMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "column `{column}` has {found} rows, table has {expected}"
            ),
        }
    }
}

impl core::error::Error for TableError {}

/// A named collection of equally long typed columns.
///
/// Row position is the only row identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, consuming and returning the table.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, TableError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Appends a column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), TableError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.rows,
                found: column.len(),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Returns the column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }

    /// Returns a column by name, or a [`ExecutionError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&Column, ExecutionError> {
        self.column(name)
            .ok_or_else(|| ExecutionError::MissingColumn(name.into()))
    }

    /// Returns a text column.
    pub fn text(&self, name: &str) -> Result<&[String], ExecutionError> {
        match self.require(name)? {
            Column::Text(v) => Ok(v),
            other => Err(ExecutionError::TypeMismatch {
                column: name.into(),
                expected: ColumnType::Text,
                found: other.column_type(),
            }),
        }
    }

    /// Returns a numeric column. Time columns are numeric too.
    pub fn number(&self, name: &str) -> Result<&[f64], ExecutionError> {
        match self.require(name)? {
            Column::Number(v) | Column::Time(v) => Ok(v),
            Column::Text(_) => Err(ExecutionError::TypeMismatch {
                column: name.into(),
                expected: ColumnType::Number,
                found: ColumnType::Text,
            }),
        }
    }

    /// Returns `(min, max)` over the finite values of a numeric column, or `None` if it has none.
    pub fn extent(&self, name: &str) -> Result<Option<(f64, f64)>, ExecutionError> {
        let mut out: Option<(f64, f64)> = None;
        for &v in self.number(name)? {
            if !v.is_finite() {
                continue;
            }
            out = Some(match out {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        Ok(out)
    }

    /// Returns the largest finite value of a numeric column, or `None` if it has none.
    pub fn max(&self, name: &str) -> Result<Option<f64>, ExecutionError> {
        Ok(self.extent(name)?.map(|(_, hi)| hi))
    }

    /// Returns the distinct values of a text column in first-appearance order.
    pub fn distinct(&self, name: &str) -> Result<Vec<String>, ExecutionError> {
        let mut seen = hashbrown::HashSet::new();
        let mut out = Vec::new();
        for v in self.text(name)? {
            if seen.insert(v.as_str()) {
                out.push(v.clone());
            }
        }
        Ok(out)
    }

    /// Returns a new table holding the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            rows: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = Table::new()
            .with_column("a", Column::Number(vec![1.0, 2.0]))
            .and_then(|t| t.with_column("b", Column::Number(vec![1.0])))
            .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "b".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn extent_skips_non_finite() {
        let t = Table::new()
            .with_column("v", Column::Number(vec![f64::NAN, 3.0, -1.0, f64::INFINITY]))
            .unwrap();
        assert_eq!(t.extent("v").unwrap(), Some((-1.0, 3.0)));
        assert_eq!(t.max("v").unwrap(), Some(3.0));
    }

    #[test]
    fn typed_access_reports_mismatch() {
        let t = Table::new()
            .with_column("area", Column::Text(vec!["Downtown".into()]))
            .unwrap();
        assert!(matches!(
            t.number("area"),
            Err(ExecutionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            t.text("missing"),
            Err(ExecutionError::MissingColumn(_))
        ));
    }
}
