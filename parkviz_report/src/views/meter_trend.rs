// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Every time-slot rate across the meter list, one line per slot.

use kurbo::Point;
use parkviz_charts::{
    AxisSpec, CATEGORY_10, ChartConfig, LegendFlow, LegendItem, LegendSwatchesSpec,
    LineMarkSpec, Margin, OrdinalDomain, ScaleLinearSpec, ScaleOrdinal, sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::Schema;
use parkviz_transforms::{Column, FoldColumn, Program, Table, Transform};

use super::{LEGEND, View, X_AXIS, Y_AXIS, load_csv};
use crate::config::ReportConfig;

const METER_ID: &str = "METERID";
const INDEX: &str = "index";
const SLOT: &str = "slot";
const RATE: &str = "rate";
const LAYER: u64 = 1;

const SLOTS: [(&str, &str); 6] = [
    ("R_MF_9A_6P", "Weekday 9AM–6PM"),
    ("R_MF_6P_10", "Weekday 6PM–10PM"),
    ("R_SA_9A_6P", "Saturday 9AM–6PM"),
    ("R_SA_6P_10", "Saturday 6PM–10PM"),
    ("R_SU_9A_6P", "Sunday 9AM–6PM"),
    ("R_SU_6P_10", "Sunday 6PM–10PM"),
];

pub(crate) fn schema() -> Schema {
    SLOTS
        .iter()
        .fold(Schema::new().with_text(METER_ID), |s, (col, _)| {
            s.with_number(*col)
        })
}

pub(crate) struct MeterTrend {
    config: ChartConfig,
    /// Meter rows with a trailing row-index column.
    meters: Table,
}

impl MeterTrend {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let meters = load_csv(config, &config.files.meters, &schema())?;
        Self::new(config.chart("meter-trend", Self::stock_config()), meters)
    }

    pub(crate) fn stock_config() -> ChartConfig {
        ChartConfig::new(960.0, 500.0).with_margin(Margin::new(60.0, 30.0, 60.0, 60.0))
    }

    pub(crate) fn new(config: ChartConfig, mut meters: Table) -> anyhow::Result<Self> {
        let index = (0..meters.row_count()).map(|i| i as f64).collect();
        meters.push_column(INDEX, Column::Number(index))?;
        Ok(Self { config, meters })
    }

    fn series(&self) -> anyhow::Result<Table> {
        Ok(Program::new()
            .with(Transform::Fold {
                columns: SLOTS
                    .iter()
                    .map(|(col, label)| FoldColumn::new(*col, *label))
                    .collect(),
                key_output: SLOT.into(),
                value_output: RATE.into(),
                carry: vec![METER_ID.into(), INDEX.into()],
            })
            .execute(&self.meters)?)
    }

    fn color(&self) -> ScaleOrdinal {
        let labels: OrdinalDomain = SLOTS.iter().map(|(_, label)| *label).collect();
        ScaleOrdinal::new(labels, CATEGORY_10)
    }
}

impl View for MeterTrend {
    fn title(&self) -> &str {
        "Parking Rates Across Meters by Time Slot"
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
        let series = self.series()?;
        let plot = self.config.plot();
        let last = self.meters.row_count().saturating_sub(1) as f64;
        let x = AxisSpec::bottom(X_AXIS, ScaleLinearSpec::new((0.0, last))).with_tick_count(10);
        let domain = sanitize_domain(Some(0.0), series.max(RATE)?, (0.0, 1.0));
        let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(domain).with_nice(true));

        let color = self.color();
        let mut marks = LineMarkSpec::new(
            LAYER,
            INDEX,
            RATE,
            x.position_scale(plot),
            y.position_scale(plot),
        )
        .with_series(SLOT)
        .with_color(color.clone())
        .marks(&series)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));

        let items = SLOTS
            .iter()
            .filter_map(|(_, label)| Some(LegendItem::solid(*label, color.map(label)?)))
            .collect();
        marks.extend(
            LegendSwatchesSpec::new(LEGEND, items)
                .with_flow(LegendFlow::Row { item_width: 140.0 })
                .with_swatch_size(10.0)
                .with_font_size(12.0)
                .marks(Point::new(self.config.margin.left, 20.0)),
        );
        Ok(marks)
    }
}

#[cfg(test)]
mod tests {
    use parkviz_core::MarkPayload;
    use peniko::Brush;

    use super::*;
    use crate::views::fixtures::{METERS, assert_reconciles, table};

    fn view() -> MeterTrend {
        MeterTrend::new(MeterTrend::stock_config(), table(METERS, &schema())).unwrap()
    }

    #[test]
    fn one_colored_line_per_slot() {
        let v = view();
        let marks = v.base_marks(None).unwrap();
        for (i, (_, label)) in SLOTS.iter().enumerate() {
            let line = marks.iter().find(|m| m.id == v.ids_for(label)[0]).unwrap();
            match &line.payload {
                MarkPayload::Path(p) => {
                    assert_eq!(p.stroke, Brush::Solid(CATEGORY_10[i]));
                    assert_eq!(p.path.elements().len(), 3, "{label} spans all three meters");
                }
                other => panic!("expected a path, got {other:?}"),
            }
        }
        let swatches = marks
            .iter()
            .filter(|m| m.z_index == parkviz_charts::LEGEND_SWATCHES)
            .count();
        assert_eq!(swatches, SLOTS.len());
    }

    #[test]
    fn x_axis_spans_the_meter_indices() {
        let v = view();
        let series = v.series().unwrap();
        assert_eq!(series.row_count(), 3 * SLOTS.len());
        assert_eq!(series.extent(INDEX).unwrap(), Some((0.0, 2.0)));
        let plot = v.config().plot();
        let id = v.ids_for(SLOTS[0].1)[0];
        let bounds = v
            .base_marks(None)
            .unwrap()
            .into_iter()
            .find(|m| m.id == id)
            .and_then(|m| m.payload.bounds())
            .unwrap();
        assert!((bounds.x0 - plot.x0).abs() < 1e-9);
        assert!((bounds.x1 - plot.x1).abs() < 1e-9);
    }

    #[test]
    fn reconciles() {
        assert_reconciles(&view());
    }
}
