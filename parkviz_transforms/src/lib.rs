// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table transforms for `parkviz`.
//!
//! This crate provides:
//! - a small columnar [`Table`] with typed text, number and time columns,
//! - a transform IR ([`Transform`]) covering the reshaping the charts need (filter, derive, fold,
//!   aggregate, sort), executed in order by a [`Program`], and
//! - a join helper that maps aggregates back onto a fixed set of display categories with a
//!   fallback value for categories that have no aggregate.
//!
//! Execution is full-recompute: every filter change re-runs the program over the loaded table
//! and produces a fresh output table.

#![no_std]

extern crate alloc;

mod join;
mod program;
mod table;
mod transform;

#[cfg(test)]
mod aggregate_tests;

pub use join::{Joined, join_with_fallback, lookup};
pub use program::{ExecutionError, Program};
pub use table::{Column, ColumnType, Table, TableError};
pub use transform::{
    AggregateField, AggregateOp, CompareOp, FoldColumn, Predicate, SortOrder, Transform,
};
