// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Joining aggregates back onto display categories.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ExecutionError, Table};

/// A display category with its joined value.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    /// Category label.
    pub key: String,
    /// Aggregate value, or the fallback when unmatched.
    pub value: f64,
    /// `false` when the category had no finite aggregate.
    pub matched: bool,
}

/// Builds a `key -> value` map from two columns of an aggregate table.
///
/// Later rows win on duplicate keys. Non-finite values are kept.
pub fn lookup(table: &Table, key: &str, value: &str) -> Result<HashMap<String, f64>, ExecutionError> {
    let keys = table.text(key)?;
    let values = table.number(value)?;
    Ok(keys
        .iter()
        .cloned()
        .zip(values.iter().copied())
        .collect())
}

/// Joins an aggregate table onto a fixed set of display categories by exact key match.
///
/// Returns one entry per category, in category order. Categories with no aggregate row, or whose
/// aggregate is not finite, get `fallback` and `matched = false`.
pub fn join_with_fallback<'a>(
    categories: impl IntoIterator<Item = &'a str>,
    table: &Table,
    key: &str,
    value: &str,
    fallback: f64,
) -> Result<Vec<Joined>, ExecutionError> {
    let map = lookup(table, key, value)?;
    Ok(categories
        .into_iter()
        .map(|k| match map.get(k) {
            Some(&v) if v.is_finite() => Joined {
                key: k.into(),
                value: v,
                matched: true,
            },
            _ => Joined {
                key: k.into(),
                value: fallback,
                matched: false,
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::Column;

    #[test]
    fn unmatched_and_nan_fall_back() {
        let t = Table::new()
            .with_column(
                "area",
                Column::Text(vec!["Downtown".into(), "Fairview".into()]),
            )
            .and_then(|t| t.with_column("rate", Column::Number(vec![4.0, f64::NAN])))
            .unwrap();
        let joined =
            join_with_fallback(["Downtown", "Fairview", "Stanley Park"], &t, "area", "rate", 0.0)
                .unwrap();
        assert_eq!(
            joined,
            vec![
                Joined {
                    key: "Downtown".into(),
                    value: 4.0,
                    matched: true
                },
                Joined {
                    key: "Fairview".into(),
                    value: 0.0,
                    matched: false
                },
                Joined {
                    key: "Stanley Park".into(),
                    value: 0.0,
                    matched: false
                },
            ]
        );
    }
}
