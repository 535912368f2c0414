// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mean total rate per meter head type, tallest first.

use parkviz_charts::{
    AxisSpec, BarMarkSpec, ChartConfig, Margin, OrdinalDomain, ScaleBandSpec, ScaleLinearSpec,
    sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::{MalformedPolicy, Schema};
use parkviz_transforms::{AggregateField, Program, SortOrder, Table, Transform};
use peniko::color::palette::css;

use super::{View, X_AXIS, Y_AXIS, band_scale, chart_title, continuous_scale, load_csv};
use crate::config::ReportConfig;

const METERHEAD: &str = "METERHEAD";
const TOTAL: &str = "Total_Rate";
const LAYER: u64 = 1;

/// Every column that contributes to a meter's total rate.
const RATE_COLUMNS: [&str; 7] = [
    "R_MF_9A_6P",
    "R_MF_6P_10",
    "R_SA_9A_6P",
    "R_SA_6P_10",
    "R_SU_9A_6P",
    "R_SU_6P_10",
    "RATE_MISC",
];

pub(crate) fn schema() -> Schema {
    RATE_COLUMNS
        .iter()
        .fold(Schema::new().with_text(METERHEAD), |s, col| s.with_number(*col))
        .with_policy(MalformedPolicy::Sentinel(0.0))
}

pub(crate) struct Meterhead {
    config: ChartConfig,
    meters: Table,
}

impl Meterhead {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let meters = load_csv(config, &config.files.meters, &schema())?;
        Ok(Self::new(config.chart("meterhead", Self::stock_config()), meters))
    }

    pub(crate) fn stock_config() -> ChartConfig {
        ChartConfig::new(960.0, 500.0).with_margin(Margin::new(40.0, 20.0, 100.0, 60.0))
    }

    pub(crate) fn new(config: ChartConfig, meters: Table) -> Self {
        Self { config, meters }
    }

    fn totals(&self) -> anyhow::Result<Table> {
        Ok(Program::new()
            .with(Transform::Derive {
                output: TOTAL.into(),
                inputs: RATE_COLUMNS.iter().map(|c| (*c).into()).collect(),
            })
            .with(Transform::Aggregate {
                group_by: vec![METERHEAD.into()],
                fields: vec![AggregateField::mean(TOTAL, TOTAL)],
            })
            .with(Transform::Sort {
                by: TOTAL.into(),
                order: SortOrder::Desc,
            })
            .execute(&self.meters)?)
    }
}

impl View for Meterhead {
    fn title(&self) -> &str {
        "Average Total Parking Rate by Meterhead Type"
    }

    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn keys(&self, _filter: Option<&str>) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn ids_for(&self, key: &str) -> Vec<MarkId> {
        vec![MarkId::for_key(LAYER, key)]
    }

    fn base_marks(&self, _filter: Option<&str>) -> anyhow::Result<Vec<Mark>> {
        let totals = self.totals()?;
        let plot = self.config.plot();
        let heads: OrdinalDomain = totals.text(METERHEAD)?.iter().map(String::as_str).collect();
        let x = AxisSpec::bottom(X_AXIS, ScaleBandSpec::new(heads.len()).with_uniform_padding(0.3))
            .with_categories(heads)
            .with_label_angle(-40.0);
        let domain = sanitize_domain(Some(0.0), totals.max(TOTAL)?, (0.0, 1.0));
        let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(domain).with_nice(true))
            .with_title("Average Total Rate ($)")
            .with_title_offset(self.config.margin.left - 20.0);

        let (band, categories) = band_scale(&x, plot)?;
        let mut marks = BarMarkSpec::new(
            LAYER,
            METERHEAD,
            TOTAL,
            band,
            categories,
            continuous_scale(&y, plot)?,
        )
        .with_fill(css::STEEL_BLUE)
        .marks(&totals)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(chart_title(
            plot,
            self.config.margin.top / 2.0,
            self.title(),
            18.0,
        ));
        Ok(marks)
    }
}
