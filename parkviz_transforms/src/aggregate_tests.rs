// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::{
    AggregateField, AggregateOp, Column, CompareOp, FoldColumn, Predicate, Program, SortOrder,
    Table, Transform,
};

fn text(values: &[&str]) -> Column {
    Column::Text(values.iter().map(|s| String::from(*s)).collect())
}

fn rates() -> Table {
    Table::new()
        .with_column("Geo Local Area", text(&["Downtown", "Downtown", "Kitsilano"]))
        .and_then(|t| t.with_column("Avg_Weekday_Rate", Column::Number(vec![3.0, 5.0, 1.0])))
        .and_then(|t| {
            t.with_column(
                "Avg_Weekend_Rate",
                Column::Number(vec![2.0, f64::NAN, 1.5]),
            )
        })
        .unwrap()
}

fn mean_by_area() -> Program {
    Program::new().with(Transform::Aggregate {
        group_by: vec!["Geo Local Area".into()],
        fields: vec![
            AggregateField::mean("Avg_Weekday_Rate", "weekday"),
            AggregateField::mean("Avg_Weekend_Rate", "weekend"),
            AggregateField::new(AggregateOp::Count, "", "n"),
        ],
    })
}

#[test]
fn mean_per_group_matches_arithmetic_mean() {
    let out = mean_by_area().execute(&rates()).unwrap();
    assert_eq!(
        out.text("Geo Local Area").unwrap(),
        &["Downtown", "Kitsilano"]
    );
    assert_eq!(out.number("weekday").unwrap(), &[4.0, 1.0]);
    // The NaN weekend rate is skipped, not counted.
    assert_eq!(out.number("weekend").unwrap(), &[2.0, 1.5]);
    assert_eq!(out.number("n").unwrap(), &[2.0, 1.0]);
}

#[test]
fn every_row_lands_in_exactly_one_group() {
    let out = mean_by_area().execute(&rates()).unwrap();
    let total: f64 = out.number("n").unwrap().iter().sum();
    assert_eq!(total, 3.0, "group counts must partition the rows");
}

#[test]
fn all_nan_group_yields_nan_mean() {
    let t = Table::new()
        .with_column("k", text(&["a", "a"]))
        .and_then(|t| t.with_column("v", Column::Number(vec![f64::NAN, f64::NAN])))
        .unwrap();
    let out = Program::new()
        .with(Transform::Aggregate {
            group_by: vec!["k".into()],
            fields: vec![
                AggregateField::mean("v", "mean"),
                AggregateField::new(AggregateOp::Sum, "v", "sum"),
                AggregateField::new(AggregateOp::Max, "v", "max"),
            ],
        })
        .execute(&t)
        .unwrap();
    assert!(out.number("mean").unwrap()[0].is_nan());
    assert_eq!(out.number("sum").unwrap()[0], 0.0);
    assert!(out.number("max").unwrap()[0].is_nan());
}

#[test]
fn two_key_grouping_keeps_first_appearance_order() {
    let t = Table::new()
        .with_column("area", text(&["B", "A", "B", "A", "B"]))
        .and_then(|t| t.with_column("time", text(&["9", "9", "10", "9", "9"])))
        .and_then(|t| t.with_column("rate", Column::Number(vec![1.0, 2.0, 3.0, 4.0, 5.0])))
        .unwrap();
    let out = Program::new()
        .with(Transform::Aggregate {
            group_by: vec!["area".into(), "time".into()],
            fields: vec![AggregateField::mean("rate", "rate")],
        })
        .execute(&t)
        .unwrap();
    assert_eq!(out.row_count(), 3);
    assert_eq!(out.text("area").unwrap(), &["B", "A", "B"]);
    assert_eq!(out.text("time").unwrap(), &["9", "9", "10"]);
    assert_eq!(out.number("rate").unwrap(), &[3.0, 3.0, 3.0]);
}

#[test]
fn filter_then_sort_descending() {
    let out = Program::new()
        .with(Transform::Filter {
            predicate: Predicate::compare("Avg_Weekday_Rate", CompareOp::Ge, 2.0),
        })
        .with(Transform::Sort {
            by: "Avg_Weekday_Rate".into(),
            order: SortOrder::Desc,
        })
        .execute(&rates())
        .unwrap();
    assert_eq!(out.number("Avg_Weekday_Rate").unwrap(), &[5.0, 3.0]);

    let downtown = Program::new()
        .with(Transform::Filter {
            predicate: Predicate::text_eq("Geo Local Area", "Kitsilano"),
        })
        .execute(&rates())
        .unwrap();
    assert_eq!(downtown.row_count(), 1);
}

#[test]
fn sort_puts_nan_last_both_ways() {
    let t = Table::new()
        .with_column("v", Column::Number(vec![2.0, f64::NAN, 1.0, 3.0]))
        .unwrap();
    for (order, expected) in [(SortOrder::Asc, [1.0, 2.0, 3.0]), (SortOrder::Desc, [3.0, 2.0, 1.0])] {
        let out = Program::new()
            .with(Transform::Sort {
                by: "v".into(),
                order,
            })
            .execute(&t)
            .unwrap();
        let v = out.number("v").unwrap();
        assert_eq!(&v[..3], &expected);
        assert!(v[3].is_nan(), "NaN sorts last");
    }
}

#[test]
fn derive_sums_with_missing_as_zero_and_fold_unpivots() {
    let t = Table::new()
        .with_column("METERHEAD", text(&["Twin", "Single"]))
        .and_then(|t| t.with_column("R_MF_9A_6P", Column::Number(vec![1.0, 2.0])))
        .and_then(|t| t.with_column("R_SA_9A_6P", Column::Number(vec![f64::NAN, 3.0])))
        .unwrap();

    let derived = Program::new()
        .with(Transform::Derive {
            output: "Total_Rate".into(),
            inputs: vec!["R_MF_9A_6P".into(), "R_SA_9A_6P".into()],
        })
        .execute(&t)
        .unwrap();
    assert_eq!(derived.number("Total_Rate").unwrap(), &[1.0, 5.0]);

    let folded = Program::new()
        .with(Transform::Fold {
            columns: vec![
                FoldColumn::new("R_MF_9A_6P", "Mon-Fri AM"),
                FoldColumn::new("R_SA_9A_6P", "Sat AM"),
            ],
            key_output: "slot".into(),
            value_output: "rate".into(),
            carry: vec!["METERHEAD".into()],
        })
        .execute(&t)
        .unwrap();
    assert_eq!(folded.row_count(), 4);
    assert_eq!(
        folded.text("METERHEAD").unwrap(),
        &["Twin", "Twin", "Single", "Single"]
    );
    let slots: Vec<&str> = folded
        .text("slot")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(slots, ["Mon-Fri AM", "Sat AM", "Mon-Fri AM", "Sat AM"]);
}

#[test]
fn missing_columns_are_reported() {
    let err = mean_by_area()
        .execute(&Table::new())
        .unwrap_err();
    assert_eq!(
        err,
        crate::ExecutionError::MissingColumn("Geo Local Area".into())
    );
}
