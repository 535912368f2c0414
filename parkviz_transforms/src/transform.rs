// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform IR types.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// Aggregation operation for [`Transform::Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Count rows.
    Count,
    /// Sum values (skips non-finite). A group with no finite values sums to 0.
    Sum,
    /// Minimum value (skips non-finite).
    Min,
    /// Maximum value (skips non-finite).
    Max,
    /// Mean value (skips non-finite).
    Mean,
}

/// A single aggregated output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateField {
    /// Operation to apply.
    pub op: AggregateOp,
    /// Input column. Ignored by [`AggregateOp::Count`].
    pub input: String,
    /// Output column name.
    pub output: String,
}

impl AggregateField {
    /// Creates a field.
    pub fn new(op: AggregateOp, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            op,
            input: input.into(),
            output: output.into(),
        }
    }

    /// Shorthand for a [`AggregateOp::Mean`] field.
    pub fn mean(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(AggregateOp::Mean, input, output)
    }
}

/// Sorting order for [`Transform::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Comparison operators for numeric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==` (exact float equality)
    Eq,
    /// `!=` (exact float inequality)
    Ne,
}

impl CompareOp {
    /// Evaluates `lhs <op> rhs`.
    pub fn eval(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }
}

/// A row predicate used by [`Transform::Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Text column equals a constant.
    TextEq {
        /// Column to read.
        col: String,
        /// Value to match.
        value: String,
    },
    /// Numeric comparison against a constant.
    Compare {
        /// Column to read.
        col: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand constant.
        value: f64,
    },
}

impl Predicate {
    /// Text equality predicate.
    pub fn text_eq(col: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TextEq {
            col: col.into(),
            value: value.into(),
        }
    }

    /// Numeric comparison predicate.
    pub fn compare(col: impl Into<String>, op: CompareOp, value: f64) -> Self {
        Self::Compare {
            col: col.into(),
            op,
            value,
        }
    }
}

/// One input column of a [`Transform::Fold`] and the label its values receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldColumn {
    /// Numeric input column.
    pub column: String,
    /// Label written into the fold's key column.
    pub label: String,
}

impl FoldColumn {
    /// Creates a fold column.
    pub fn new(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: label.into(),
        }
    }
}

/// A table transform, applied to the output of the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Keep only rows that satisfy a predicate. All columns are carried through.
    Filter {
        /// Predicate to apply per row.
        predicate: Predicate,
    },
    /// Append a numeric column holding the row-wise sum of several numeric columns.
    ///
    /// Non-finite inputs contribute 0.
    Derive {
        /// Output column name.
        output: String,
        /// Columns to sum.
        inputs: Vec<String>,
    },
    /// Unpivot several numeric columns into `(key, value)` rows.
    ///
    /// Every input row produces one output row per folded column, in `columns` order. Output
    /// columns are `carry` (in order) followed by `key_output` (text) and `value_output`.
    Fold {
        /// Columns to fold, with their labels.
        columns: Vec<FoldColumn>,
        /// Output text column receiving the labels.
        key_output: String,
        /// Output numeric column receiving the values.
        value_output: String,
        /// Columns to carry through to the output table.
        carry: Vec<String>,
    },
    /// Group rows by one or more text key columns and compute aggregates.
    ///
    /// Groups are emitted in order of first appearance. Output columns are `group_by` (in order)
    /// followed by the `fields` outputs (in order).
    Aggregate {
        /// Group-by key columns.
        group_by: Vec<String>,
        /// Aggregated fields.
        fields: Vec<AggregateField>,
    },
    /// Stable reorder of rows by a key column.
    ///
    /// Numeric keys order numerically with `NaN` last in either direction; text keys order
    /// lexicographically.
    Sort {
        /// Column used as the sort key.
        by: String,
        /// Sort order.
        order: SortOrder,
    },
}
