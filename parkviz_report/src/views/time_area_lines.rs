// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mean rate per time slot, one line per local area, from the long-format records.

use parkviz_charts::{
    AxisSpec, CATEGORY_10, ChartConfig, LineMarkSpec, Margin, OrdinalDomain, ScaleLinearSpec,
    ScaleOrdinal, ScalePointSpec, sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::Schema;
use parkviz_transforms::{AggregateField, Program, SortOrder, Table, Transform};

use super::{View, X_AXIS, Y_AXIS, chart_title, load_csv, sorted_distinct};
use crate::config::ReportConfig;

const AREA: &str = "Geo Local Area";
const TIME: &str = "Time";
const RATE: &str = "Rate";
const LAYER: u64 = 1;

pub(crate) fn schema() -> Schema {
    Schema::new()
        .with_text(AREA)
        .with_text(TIME)
        .with_number(RATE)
}

pub(crate) struct TimeAreaLines {
    config: ChartConfig,
    records: Table,
}

impl TimeAreaLines {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let records = load_csv(config, &config.files.area_time, &schema())?;
        Ok(Self::new(config.chart("time-area-lines", Self::stock_config()), records))
    }

    pub(crate) fn stock_config() -> ChartConfig {
        ChartConfig::new(960.0, 500.0).with_margin(Margin::new(60.0, 50.0, 80.0, 80.0))
    }

    pub(crate) fn new(config: ChartConfig, records: Table) -> Self {
        Self { config, records }
    }

    /// One row per `(area, time)`, ordered by time.
    fn means(&self) -> anyhow::Result<Table> {
        Ok(Program::new()
            .with(Transform::Aggregate {
                group_by: vec![AREA.into(), TIME.into()],
                fields: vec![AggregateField::mean(RATE, RATE)],
            })
            .with(Transform::Sort {
                by: TIME.into(),
                order: SortOrder::Asc,
            })
            .execute(&self.records)?)
    }

    /// Areas take palette entries in the order they first appear in the records.
    fn color(&self) -> anyhow::Result<ScaleOrdinal> {
        let areas: OrdinalDomain = self.records.distinct(AREA)?.into_iter().collect();
        Ok(ScaleOrdinal::new(areas, CATEGORY_10))
    }
}

impl View for TimeAreaLines {
    fn title(&self) -> &str {
        "Parking Rates by Time and Area"
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
        let means = self.means()?;
        let plot = self.config.plot();
        let times: OrdinalDomain = sorted_distinct(&self.records, TIME)?.into_iter().collect();
        let x = AxisSpec::bottom(X_AXIS, ScalePointSpec::new(times.len()).with_padding(0.5))
            .with_categories(times)
            .with_label_angle(-45.0)
            .with_title("Time Slot")
            .with_title_offset(60.0);
        let domain = sanitize_domain(Some(0.0), means.max(RATE)?, (0.0, 1.0));
        let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(domain).with_nice(true))
            .with_title("Average Rate ($)")
            .with_title_offset(50.0);

        let mut marks = LineMarkSpec::new(
            LAYER,
            TIME,
            RATE,
            x.position_scale(plot),
            y.position_scale(plot),
        )
        .with_series(AREA)
        .with_color(self.color()?)
        .marks(&means)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(chart_title(plot, plot.y0 - 30.0, self.title(), 16.0));
        Ok(marks)
    }
}
