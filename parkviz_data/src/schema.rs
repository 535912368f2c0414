// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit string-to-type coercion.
//!
//! Raw records arrive with string-typed columns. A [`Schema`] names the columns a chart needs
//! and how each is typed; everything else is dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use parkviz_transforms::{Column, Table};
use polars::prelude::DataFrame;

use crate::LoadError;
use crate::csv::string_column;

/// How a string column becomes a typed column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coercion {
    /// Kept as text (category labels, keys).
    Text,
    /// Parsed as a number, then multiplied.
    Number {
        /// Applied to every parsed value (e.g. `1000.0` for populations stored in thousands).
        multiplier: f64,
    },
    /// Parsed as an instant and stored as seconds since the Unix epoch.
    Time,
}

impl Coercion {
    /// Plain numeric coercion.
    pub fn number() -> Self {
        Self::Number { multiplier: 1.0 }
    }
}

/// What to do with a value that fails to coerce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MalformedPolicy {
    /// Drop the whole row.
    RejectRow,
    /// Keep the row and store this value instead.
    Sentinel(f64),
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        Self::Sentinel(f64::NAN)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Field {
    column: String,
    coercion: Coercion,
}

/// The typed view of a raw record collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
    policy: MalformedPolicy,
}

/// The result of [`Schema::apply`].
#[derive(Clone, Debug, PartialEq)]
pub struct Coerced {
    /// Typed table, one column per schema field in schema order.
    pub table: Table,
    /// Rows dropped under [`MalformedPolicy::RejectRow`].
    pub rejected: usize,
    /// Values replaced under [`MalformedPolicy::Sentinel`].
    pub replaced: usize,
}

impl Schema {
    /// Creates an empty schema that stores malformed numbers as `NaN`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column.
    pub fn with(mut self, column: impl Into<String>, coercion: Coercion) -> Self {
        self.fields.push(Field {
            column: column.into(),
            coercion,
        });
        self
    }

    /// Adds a text column.
    pub fn with_text(self, column: impl Into<String>) -> Self {
        self.with(column, Coercion::Text)
    }

    /// Adds a numeric column.
    pub fn with_number(self, column: impl Into<String>) -> Self {
        self.with(column, Coercion::number())
    }

    /// Adds a time column.
    pub fn with_time(self, column: impl Into<String>) -> Self {
        self.with(column, Coercion::Time)
    }

    /// Sets the malformed-value policy.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Coerces the schema's columns of `df`.
    pub fn apply(&self, df: &DataFrame) -> Result<Coerced, LoadError> {
        let raw: Vec<Vec<String>> = self
            .fields
            .iter()
            .map(|f| string_column(df, &f.column))
            .collect::<Result<_, _>>()?;
        let rows = df.height();

        let mut parsed: Vec<Vec<Option<f64>>> = Vec::with_capacity(self.fields.len());
        for (field, values) in self.fields.iter().zip(&raw) {
            parsed.push(match field.coercion {
                Coercion::Text => Vec::new(),
                Coercion::Number { multiplier } => values
                    .iter()
                    .map(|v| parse_number(v).map(|n| n * multiplier))
                    .collect(),
                Coercion::Time => values.iter().map(|v| parse_time(v)).collect(),
            });
        }

        let mut keep = Vec::with_capacity(rows);
        let mut rejected = 0;
        let mut replaced = 0;
        for row in 0..rows {
            let bad = self
                .fields
                .iter()
                .zip(&parsed)
                .filter(|(f, p)| f.coercion != Coercion::Text && p[row].is_none())
                .count();
            if bad > 0 && self.policy == MalformedPolicy::RejectRow {
                rejected += 1;
                continue;
            }
            replaced += bad;
            keep.push(row);
        }

        let sentinel = match self.policy {
            MalformedPolicy::Sentinel(v) => v,
            MalformedPolicy::RejectRow => f64::NAN,
        };
        let mut table = Table::new();
        for ((field, values), numbers) in self.fields.iter().zip(&raw).zip(&parsed) {
            let column = match field.coercion {
                Coercion::Text => Column::Text(keep.iter().map(|&r| values[r].clone()).collect()),
                Coercion::Number { .. } => Column::Number(
                    keep.iter().map(|&r| numbers[r].unwrap_or(sentinel)).collect(),
                ),
                Coercion::Time => Column::Time(
                    keep.iter().map(|&r| numbers[r].unwrap_or(sentinel)).collect(),
                ),
            };
            table.push_column(field.column.clone(), column)?;
        }

        if rejected > 0 {
            warn!("rejected {rejected} of {rows} rows with malformed values");
        }
        if replaced > 0 {
            debug!("replaced {replaced} malformed values with {sentinel}");
        }
        Ok(Coerced {
            table,
            rejected,
            replaced,
        })
    }
}

/// Parses a number, ignoring surrounding whitespace and thousands separators.
///
/// Empty strings are malformed.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an instant as seconds since the Unix epoch.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (also with a `T` separator) and `YYYY-MM-DD`. Values
/// without an offset are read as UTC.
pub fn parse_time(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let millis = if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        t.timestamp_millis()
    } else if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
    {
        t.and_utc().timestamp_millis()
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis()
    };
    Some(millis as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::csv::read_csv_from;

    fn frame(src: &str) -> DataFrame {
        read_csv_from(Cursor::new(src.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn numbers_drop_separators_and_scale() {
        assert_eq!(parse_number(" 1,409,517 "), Some(1_409_517.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);

        let df = frame("country,population\nChina,\"1,409,517\"\nIndia,1339180\n");
        let out = Schema::new()
            .with_text("country")
            .with("population", Coercion::Number { multiplier: 1000.0 })
            .apply(&df)
            .unwrap();
        assert_eq!(
            out.table.number("population").unwrap(),
            &[1_409_517_000.0, 1_339_180_000.0]
        );
    }

    #[test]
    fn sentinel_keeps_rows_and_reject_drops_them() {
        let src = "Geo Local Area,Avg_Weekday_Rate\nDowntown,4.00\nKitsilano,\nFairview,abc\n";
        let schema = Schema::new()
            .with_text("Geo Local Area")
            .with_number("Avg_Weekday_Rate");

        let kept = schema.apply(&frame(src)).unwrap();
        assert_eq!(kept.table.row_count(), 3);
        assert_eq!(kept.replaced, 2);
        assert!(kept.table.number("Avg_Weekday_Rate").unwrap()[1].is_nan());

        let zeroed = schema
            .clone()
            .with_policy(MalformedPolicy::Sentinel(0.0))
            .apply(&frame(src))
            .unwrap();
        assert_eq!(zeroed.table.number("Avg_Weekday_Rate").unwrap(), &[4.0, 0.0, 0.0]);

        let strict = schema
            .with_policy(MalformedPolicy::RejectRow)
            .apply(&frame(src))
            .unwrap();
        assert_eq!(strict.rejected, 2);
        assert_eq!(strict.table.text("Geo Local Area").unwrap(), &["Downtown".to_owned()]);
    }

    #[test]
    fn timestamps_in_three_shapes() {
        assert_eq!(parse_time("1970-01-02"), Some(86_400.0));
        assert_eq!(parse_time("1970-01-01 01:00:00"), Some(3_600.0));
        assert_eq!(parse_time("1970-01-01T01:00:00-01:00"), Some(7_200.0));
        assert_eq!(parse_time("yesterday"), None);
    }

    #[test]
    fn unknown_columns_are_reported() {
        let err = Schema::new()
            .with_number("temperature")
            .apply(&frame("timestamp\n2017-01-01\n"))
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "temperature"));
    }
}
