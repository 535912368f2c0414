// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-recompute executor for [`Transform`] sequences.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::table::{Column, ColumnType, Table};
use crate::transform::{AggregateField, AggregateOp, FoldColumn, Predicate, SortOrder, Transform};

/// Errors returned when executing a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A referenced column does not exist.
    MissingColumn(String),
    /// A referenced column has the wrong element type.
    TypeMismatch {
        /// Column name.
        column: String,
        /// Expected type.
        expected: ColumnType,
        /// Actual type.
        found: ColumnType,
    },
    /// An output column name collides with an existing column.
    DuplicateColumn(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn(name) => write!(f, "missing column `{name}`"),
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "column `{column}` is {found}, expected {expected}"),
            Self::DuplicateColumn(name) => write!(f, "duplicate output column `{name}`"),
        }
    }
}

impl core::error::Error for ExecutionError {}

/// An ordered list of transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    transforms: Vec<Transform>,
}

impl Program {
    /// Creates an empty program (identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn with(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Appends a transform.
    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Returns the transforms in execution order.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Runs every transform in order and returns the final table.
    pub fn execute(&self, input: &Table) -> Result<Table, ExecutionError> {
        let mut current = input.clone();
        for t in &self.transforms {
            current = apply(t, &current)?;
        }
        Ok(current)
    }
}

fn apply(t: &Transform, input: &Table) -> Result<Table, ExecutionError> {
    match t {
        Transform::Filter { predicate } => filter(input, predicate),
        Transform::Derive { output, inputs } => derive(input, output, inputs),
        Transform::Fold {
            columns,
            key_output,
            value_output,
            carry,
        } => fold(input, columns, key_output, value_output, carry),
        Transform::Aggregate { group_by, fields } => aggregate(input, group_by, fields),
        Transform::Sort { by, order } => sort(input, by, *order),
    }
}

fn filter(input: &Table, predicate: &Predicate) -> Result<Table, ExecutionError> {
    let rows: Vec<usize> = match predicate {
        Predicate::TextEq { col, value } => input
            .text(col)?
            .iter()
            .enumerate()
            .filter(|(_, v)| *v == value)
            .map(|(i, _)| i)
            .collect(),
        Predicate::Compare { col, op, value } => input
            .number(col)?
            .iter()
            .enumerate()
            .filter(|(_, v)| op.eval(**v, *value))
            .map(|(i, _)| i)
            .collect(),
    };
    Ok(input.take_rows(&rows))
}

fn derive(input: &Table, output: &str, inputs: &[String]) -> Result<Table, ExecutionError> {
    let mut sums = alloc::vec![0.0; input.row_count()];
    for name in inputs {
        for (acc, &v) in sums.iter_mut().zip(input.number(name)?) {
            if v.is_finite() {
                *acc += v;
            }
        }
    }
    let mut out = input.clone();
    out.push_column(output, Column::Number(sums))
        .map_err(|_| ExecutionError::DuplicateColumn(output.into()))?;
    Ok(out)
}

fn fold(
    input: &Table,
    columns: &[FoldColumn],
    key_output: &str,
    value_output: &str,
    carry: &[String],
) -> Result<Table, ExecutionError> {
    let sources: Vec<&[f64]> = columns
        .iter()
        .map(|c| input.number(&c.column))
        .collect::<Result<_, _>>()?;
    let n = input.row_count();

    let mut rows = Vec::with_capacity(n * columns.len());
    let mut keys = Vec::with_capacity(n * columns.len());
    let mut values = Vec::with_capacity(n * columns.len());
    for row in 0..n {
        for (c, src) in columns.iter().zip(&sources) {
            rows.push(row);
            keys.push(c.label.clone());
            values.push(src[row]);
        }
    }

    let taken = input.take_rows(&rows);
    let mut out = Table::new();
    for name in carry {
        out.push_column(name.clone(), taken.require(name)?.clone())
            .map_err(|_| ExecutionError::DuplicateColumn(name.clone()))?;
    }
    out.push_column(key_output, Column::Text(keys))
        .map_err(|_| ExecutionError::DuplicateColumn(key_output.into()))?;
    out.push_column(value_output, Column::Number(values))
        .map_err(|_| ExecutionError::DuplicateColumn(value_output.into()))?;
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
struct Acc {
    rows: usize,
    finite: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Acc {
    const EMPTY: Self = Self {
        rows: 0,
        finite: 0,
        sum: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    fn push(&mut self, v: f64) {
        self.rows += 1;
        if v.is_finite() {
            self.finite += 1;
            self.sum += v;
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "row counts stay far below 2^52"
    )]
    fn finish(&self, op: AggregateOp) -> f64 {
        match op {
            AggregateOp::Count => self.rows as f64,
            AggregateOp::Sum => self.sum,
            AggregateOp::Min if self.finite > 0 => self.min,
            AggregateOp::Max if self.finite > 0 => self.max,
            AggregateOp::Mean if self.finite > 0 => self.sum / self.finite as f64,
            AggregateOp::Min | AggregateOp::Max | AggregateOp::Mean => f64::NAN,
        }
    }
}

fn aggregate(
    input: &Table,
    group_by: &[String],
    fields: &[AggregateField],
) -> Result<Table, ExecutionError> {
    let keys: Vec<&[String]> = group_by
        .iter()
        .map(|k| input.text(k))
        .collect::<Result<_, _>>()?;
    let values: Vec<Option<&[f64]>> = fields
        .iter()
        .map(|f| match f.op {
            AggregateOp::Count => Ok(None),
            _ => input.number(&f.input).map(Some),
        })
        .collect::<Result<_, _>>()?;

    let mut index: HashMap<SmallVec<[&str; 2]>, usize> = HashMap::new();
    let mut group_keys: Vec<SmallVec<[&str; 2]>> = Vec::new();
    let mut accs: Vec<SmallVec<[Acc; 4]>> = Vec::new();

    for row in 0..input.row_count() {
        let key: SmallVec<[&str; 2]> = keys.iter().map(|k| k[row].as_str()).collect();
        let g = match index.get(&key) {
            Some(&g) => g,
            None => {
                let g = group_keys.len();
                index.insert(key.clone(), g);
                group_keys.push(key);
                accs.push(fields.iter().map(|_| Acc::EMPTY).collect());
                g
            }
        };
        for (acc, src) in accs[g].iter_mut().zip(&values) {
            acc.push(src.map_or(0.0, |s| s[row]));
        }
    }

    let mut out = Table::new();
    for (k, name) in group_by.iter().enumerate() {
        let col = group_keys.iter().map(|key| String::from(key[k])).collect();
        out.push_column(name.clone(), Column::Text(col))
            .map_err(|_| ExecutionError::DuplicateColumn(name.clone()))?;
    }
    for (f, field) in fields.iter().enumerate() {
        let col = accs.iter().map(|a| a[f].finish(field.op)).collect();
        out.push_column(field.output.clone(), Column::Number(col))
            .map_err(|_| ExecutionError::DuplicateColumn(field.output.clone()))?;
    }
    Ok(out)
}

fn sort(input: &Table, by: &str, order: SortOrder) -> Result<Table, ExecutionError> {
    let mut rows: Vec<usize> = (0..input.row_count()).collect();
    match input.require(by)? {
        Column::Text(v) => {
            rows.sort_by(|&a, &b| {
                let o = v[a].cmp(&v[b]);
                match order {
                    SortOrder::Asc => o,
                    SortOrder::Desc => o.reverse(),
                }
            });
        }
        Column::Number(v) | Column::Time(v) => {
            rows.sort_by(|&a, &b| compare_nan_last(v[a], v[b], order));
        }
    }
    Ok(input.take_rows(&rows))
}

fn compare_nan_last(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let o = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Asc => o,
                SortOrder::Desc => o.reverse(),
            }
        }
    }
}
