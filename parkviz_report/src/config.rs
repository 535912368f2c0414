// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Report configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) reproduces the stock
//! charts. Command-line flags override the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parkviz_charts::{ChartConfig, Size};
use serde::Deserialize;

/// Input file names, relative to [`ReportConfig::data_dir`].
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct DataFiles {
    pub(crate) meters: String,
    pub(crate) meters_long: String,
    pub(crate) geojson: String,
    pub(crate) area_time: String,
    pub(crate) population: String,
    pub(crate) temperature: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            meters: "parking-meters_PowerQueryTrans.csv".into(),
            meters_long: "parking-meters_PowerQueryTrans-J.csv".into(),
            geojson: "vancouver.geojson".into(),
            area_time: "df_final_line.csv".into(),
            population: "population2017.csv".into(),
            temperature: "week_temperature_sf.csv".into(),
        }
    }
}

/// Which choropleth legend layout to draw.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LegendVariant {
    /// Centered under the map, one-decimal ticks, titled.
    #[default]
    BelowCentered,
    /// Bottom-right corner, default ticks.
    BottomRight,
}

/// A view size override.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub(crate) struct SizeOverride {
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Top-level report configuration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub(crate) struct ReportConfig {
    /// Directory the input files are read from.
    pub(crate) data_dir: PathBuf,
    pub(crate) files: DataFiles,
    /// Replaces every view's transition duration when set.
    pub(crate) transition_ms: Option<f64>,
    pub(crate) legend: LegendVariant,
    /// Per-view size overrides, keyed by view name (`"area-rates"`).
    pub(crate) sizes: HashMap<String, SizeOverride>,
}

impl ReportConfig {
    /// Load a report configuration from a JSON file.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config `{}`", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config `{}`", path.display()))?;
        Ok(config)
    }

    /// Resolves an input file name against the data directory.
    pub(crate) fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Applies the report-wide overrides to a view's stock configuration.
    pub(crate) fn chart(&self, view: &str, mut chart: ChartConfig) -> ChartConfig {
        if let Some(ms) = self.transition_ms {
            chart = chart.with_transition_ms(ms);
        }
        if let Some(size) = self.sizes.get(view) {
            chart.size = Size::new(size.width, size.height);
        }
        chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_stock_files() {
        let config: ReportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.files.geojson, "vancouver.geojson");
        assert_eq!(config.legend, LegendVariant::BelowCentered);
    }

    #[test]
    fn overrides_reach_the_chart_config() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "data_dir": "data",
                "files": { "population": "pop.csv" },
                "transition_ms": 0,
                "legend": "bottom_right",
                "sizes": { "area-rates": { "width": 640, "height": 400 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.path(&config.files.population), Path::new("data/pop.csv"));
        assert_eq!(config.files.meters, DataFiles::default().meters);
        assert_eq!(config.legend, LegendVariant::BottomRight);

        let chart = config.chart("area-rates", ChartConfig::new(960.0, 576.0).with_transition_ms(600.0));
        assert_eq!(chart.size, Size::new(640.0, 400.0));
        assert_eq!(chart.transition_ms, 0.0);
        let other = config.chart("meterhead", ChartConfig::new(960.0, 500.0));
        assert_eq!(other.size, Size::new(960.0, 500.0));
    }
}
