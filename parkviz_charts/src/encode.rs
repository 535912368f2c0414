// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-to-channel helpers shared by the mark generators.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use parkviz_transforms::{ExecutionError, Table};

use crate::scale::PositionScale;

/// Separator between the parts of a composite row key.
pub const KEY_SEPARATOR: &str = " / ";

/// Builds one identity key per row by joining the text columns `cols`.
///
/// A single column yields its values unchanged.
pub fn row_keys(table: &Table, cols: &[String]) -> Result<Vec<String>, ExecutionError> {
    let columns: Vec<&[String]> = cols
        .iter()
        .map(|c| table.text(c))
        .collect::<Result<_, _>>()?;
    Ok((0..table.row_count())
        .map(|row| {
            let mut key = String::new();
            for (i, col) in columns.iter().enumerate() {
                if i > 0 {
                    key.push_str(KEY_SEPARATOR);
                }
                key.push_str(&col[row]);
            }
            key
        })
        .collect())
}

/// Maps a column through a position scale.
///
/// Continuous scales read a numeric column; ordinal scales read a text column. Rows whose value
/// is non-finite or outside the ordinal domain map to `None`.
pub fn positions(
    scale: &PositionScale,
    table: &Table,
    col: &str,
) -> Result<Vec<Option<f64>>, ExecutionError> {
    if scale.is_ordinal() {
        Ok(table
            .text(col)?
            .iter()
            .map(|label| scale.map_label(label))
            .collect())
    } else {
        Ok(table
            .number(col)?
            .iter()
            .map(|v| v.is_finite().then(|| scale.map_number(*v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use parkviz_transforms::Column;

    use super::*;
    use crate::scale::{OrdinalDomain, ScaleContinuous, ScaleLinear, ScalePoint};

    #[test]
    fn composite_keys_join_columns() {
        let t = Table::new()
            .with_column("area", Column::Text(vec!["Downtown".into()]))
            .and_then(|t| t.with_column("slot", Column::Text(vec!["Sat AM".into()])))
            .unwrap();
        let keys = row_keys(&t, &["area".into(), "slot".into()]).unwrap();
        assert_eq!(keys, vec![String::from("Downtown / Sat AM")]);
    }

    #[test]
    fn non_finite_and_unknown_values_have_no_position() {
        let t = Table::new()
            .with_column("v", Column::Number(vec![1.0, f64::NAN]))
            .and_then(|t| t.with_column("c", Column::Text(vec!["a".into(), "zzz".into()])))
            .unwrap();
        let linear = PositionScale::Continuous(ScaleContinuous::Linear(ScaleLinear::new(
            (0.0, 2.0),
            (0.0, 100.0),
        )));
        assert_eq!(positions(&linear, &t, "v").unwrap(), vec![Some(50.0), None]);

        let domain: OrdinalDomain = ["a"].into_iter().collect();
        let point = PositionScale::Point(ScalePoint::new((0.0, 100.0), 1), domain);
        assert_eq!(positions(&point, &t, "c").unwrap(), vec![Some(50.0), None]);
    }
}
