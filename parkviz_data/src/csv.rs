// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delimited file reading.
//!
//! Every column is read as a string; typing happens afterwards through a [`crate::Schema`].

use std::fs::File;
use std::path::Path;

use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

use crate::LoadError;

/// Reads a CSV file with a header row. All columns are `String`.
pub fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_from(file)
}

/// Reads CSV from any seekable byte source. All columns are `String`.
pub fn read_csv_from<R: MmapBytesReader>(reader: R) -> Result<DataFrame, LoadError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(reader)
        .finish()?;
    Ok(df)
}

/// Returns the values of a string column, with nulls as empty strings.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, LoadError> {
    let series = df
        .column(name)
        .map_err(|_| LoadError::MissingColumn(name.to_owned()))?;
    let values = series.str()?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_default().to_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn every_column_is_read_as_text() {
        let src = "Geo Local Area,Avg_Weekday_Rate\nDowntown,4.00\nKitsilano,\n";
        let df = read_csv_from(Cursor::new(src.as_bytes().to_vec())).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            string_column(&df, "Avg_Weekday_Rate").unwrap(),
            vec!["4.00".to_owned(), String::new()]
        );
        assert!(matches!(
            string_column(&df, "METERID"),
            Err(LoadError::MissingColumn(c)) if c == "METERID"
        ));
    }

    #[test]
    fn missing_files_report_their_path() {
        let err = read_csv(Path::new("/nonexistent/parking.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { ref path, .. } if path.ends_with("parking.csv")));
    }
}
