// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weekday and weekend rates per local area, as paired bars with an area filter.

use kurbo::{Point, Vec2};
use parkviz_charts::{
    AxisSpec, ChartConfig, KEY_SEPARATOR, LegendFlow, LegendItem, LegendSwatchesSpec, Margin,
    OrdinalDomain, PairedBarMarkSpec, ScaleBandSpec, ScaleLinearSpec, format_currency,
    sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::Schema;
use parkviz_transforms::{AggregateField, Predicate, Program, Table, Transform};
use peniko::Color;

use super::{
    LEGEND, View, X_AXIS, Y_AXIS, band_scale, continuous_scale, load_csv, sorted_distinct,
};
use crate::config::ReportConfig;

const AREA: &str = "Geo Local Area";
const WEEKDAY: &str = "Avg_Weekday_Rate";
const WEEKEND: &str = "Avg_Weekend_Rate";
/// Weekday bars use this layer, weekend bars the next one.
const LAYER: u64 = 1;

const WEEKDAY_FILL: Color = Color::from_rgb8(0x2e, 0x7d, 0x32);
const WEEKEND_FILL: Color = Color::from_rgb8(0xff, 0xb7, 0x4d);
const HOVER_FILL: Color = Color::from_rgb8(0x21, 0x96, 0xf3);

pub(crate) fn schema() -> Schema {
    Schema::new()
        .with_text(AREA)
        .with_number(WEEKDAY)
        .with_number(WEEKEND)
}

pub(crate) struct AreaRates {
    config: ChartConfig,
    meters: Table,
}

impl AreaRates {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let meters = load_csv(config, &config.files.meters, &schema())?;
        Ok(Self::new(config.chart("area-rates", Self::stock_config()), meters))
    }

    pub(crate) fn stock_config() -> ChartConfig {
        ChartConfig::new(960.0, 576.0)
            .with_margin(Margin::new(40.0, 30.0, 70.0, 70.0))
            .with_transition_ms(600.0)
            .with_highlight_fill(HOVER_FILL)
            .with_tooltip_offset(Vec2::new(15.0, -28.0))
    }

    pub(crate) fn new(config: ChartConfig, meters: Table) -> Self {
        Self { config, meters }
    }

    /// Per-area means of the rows selected by `filter`, in first-appearance order.
    fn means(&self, filter: Option<&str>) -> anyhow::Result<Table> {
        let mut program = Program::new();
        if let Some(area) = filter {
            program.push(Transform::Filter {
                predicate: Predicate::text_eq(AREA, area),
            });
        }
        program.push(Transform::Aggregate {
            group_by: vec![AREA.into()],
            fields: vec![
                AggregateField::mean(WEEKDAY, WEEKDAY),
                AggregateField::mean(WEEKEND, WEEKEND),
            ],
        });
        Ok(program.execute(&self.meters)?)
    }

    fn axes(&self, means: &Table) -> anyhow::Result<(AxisSpec, AxisSpec)> {
        let categories: OrdinalDomain = means.text(AREA)?.iter().map(String::as_str).collect();
        let x = AxisSpec::bottom(
            X_AXIS,
            ScaleBandSpec::new(categories.len()).with_uniform_padding(0.2),
        )
        .with_categories(categories)
        .with_label_angle(-40.0)
        .with_title("Geo Local Area")
        .with_title_offset(self.config.margin.bottom - 10.0);

        let max = match (means.max(WEEKDAY)?, means.max(WEEKEND)?) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let domain = sanitize_domain(Some(0.0), max, (0.0, 1.0));
        let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(domain).with_nice(true))
            .with_title("Average Rate ($)")
            .with_title_offset(self.config.margin.left - 15.0);
        Ok((x, y))
    }
}

/// Splits an `area / weekday` hover key.
fn split_key(key: &str) -> Option<(&str, usize)> {
    let (area, side) = key.rsplit_once(KEY_SEPARATOR)?;
    match side {
        "weekday" => Some((area, 0)),
        "weekend" => Some((area, 1)),
        _ => None,
    }
}

impl View for AreaRates {
    fn title(&self) -> &str {
        "Average Parking Rates by Local Area"
    }

    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn filters(&self) -> Vec<Option<String>> {
        let mut out = vec![None];
        if let Ok(areas) = sorted_distinct(&self.meters, AREA) {
            out.extend(areas.into_iter().map(Some));
        }
        out
    }

    fn keys(&self, filter: Option<&str>) -> anyhow::Result<Vec<String>> {
        let means = self.means(filter)?;
        Ok(means
            .text(AREA)?
            .iter()
            .flat_map(|area| {
                ["weekday", "weekend"].map(|side| format!("{area}{KEY_SEPARATOR}{side}"))
            })
            .collect())
    }

    fn ids_for(&self, key: &str) -> Vec<MarkId> {
        split_key(key)
            .map(|(area, side)| vec![MarkId::for_key(LAYER + side as u64, area)])
            .unwrap_or_default()
    }

    fn base_marks(&self, filter: Option<&str>) -> anyhow::Result<Vec<Mark>> {
        let means = self.means(filter)?;
        let plot = self.config.plot();
        let (x, y) = self.axes(&means)?;
        let (band, categories) = band_scale(&x, plot)?;
        let bars = PairedBarMarkSpec::new(
            LAYER,
            AREA,
            WEEKDAY,
            WEEKEND,
            band,
            categories,
            continuous_scale(&y, plot)?,
        )
        .with_fills(WEEKDAY_FILL, WEEKEND_FILL);

        let mut marks = bars.marks(&means)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.extend(
            LegendSwatchesSpec::new(
                LEGEND,
                vec![
                    LegendItem::solid("Weekday Rate", WEEKDAY_FILL),
                    LegendItem::solid("Weekend Rate", WEEKEND_FILL),
                ],
            )
            .with_flow(LegendFlow::Row { item_width: 150.0 })
            .with_swatch_size(15.0)
            .marks(Point::new(self.config.margin.left, 20.0)),
        );
        Ok(marks)
    }

    fn tooltip_lines(&self, filter: Option<&str>, key: &str) -> anyhow::Result<Vec<String>> {
        let Some((area, _)) = split_key(key) else {
            return Ok(Vec::new());
        };
        let means = self.means(filter)?;
        let Some(row) = means.text(AREA)?.iter().position(|a| a == area) else {
            return Ok(Vec::new());
        };
        Ok(vec![
            area.to_owned(),
            format!("Weekday Rate: {}", format_currency(means.number(WEEKDAY)?[row])),
            format!("Weekend Rate: {}", format_currency(means.number(WEEKEND)?[row])),
        ])
    }
}

#[cfg(test)]
mod tests {
    use parkviz_charts::{ChartState, UiEvent, reduce};
    use parkviz_core::{DiffCounts, MarkPayload, Scene};
    use peniko::Brush;

    use super::*;
    use crate::views::fixtures::{METERS, assert_reconciles, hovered, table};
    use crate::views::render_state;

    fn view() -> AreaRates {
        AreaRates::new(AreaRates::stock_config(), table(METERS, &schema()))
    }

    fn bars(marks: &[Mark]) -> Vec<(MarkId, f64)> {
        marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Rect(r) if m.z_index == parkviz_charts::SERIES_FILL => {
                    Some((m.id, r.rect.height()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn each_area_gets_a_weekday_and_a_weekend_bar() {
        let v = view();
        assert_eq!(
            v.filters(),
            vec![None, Some("Downtown".into()), Some("Kitsilano".into())]
        );
        let marks = v.base_marks(None).unwrap();
        let bars = bars(&marks);
        assert_eq!(bars.len(), 4);
        let weekday = v.ids_for("Downtown / weekday")[0];
        let weekend = v.ids_for("Downtown / weekend")[0];
        let height = |id| bars.iter().find(|(i, _)| *i == id).unwrap().1;
        // Downtown averages 4.00 on weekdays and 2.00 on weekends.
        assert!((height(weekday) - 2.0 * height(weekend)).abs() < 1e-9);
    }

    #[test]
    fn filtering_updates_shared_areas_and_removes_the_rest() {
        let v = view();
        let mut scene = Scene::new();
        let all = ChartState::new();
        scene.tick(render_state(&v, &all).unwrap());

        let downtown = reduce(&all, UiEvent::SelectFilter(Some("Downtown".into())));
        let diffs = scene.tick(render_state(&v, &downtown).unwrap());
        let exited: Vec<MarkId> = diffs
            .iter()
            .filter(|d| matches!(d, parkviz_core::MarkDiff::Exit { .. }))
            .map(|d| d.id())
            .collect();
        assert!(exited.contains(&v.ids_for("Kitsilano / weekday")[0]));
        assert!(exited.contains(&v.ids_for("Kitsilano / weekend")[0]));
        assert!(
            diffs.iter().any(|d| matches!(d, parkviz_core::MarkDiff::Update { id, .. }
                if *id == v.ids_for("Downtown / weekday")[0])),
            "the surviving bar is updated in place"
        );

        let back = scene.tick(render_state(&v, &all).unwrap());
        assert_eq!(DiffCounts::of(&back).exit, 0);
    }

    #[test]
    fn hover_recolors_one_bar_and_reports_both_rates() {
        let v = view();
        let state = hovered(&v, None, "Kitsilano / weekend");
        let marks = render_state(&v, &state).unwrap();
        let fill = |key: &str| {
            let id = v.ids_for(key)[0];
            marks.iter().find(|m| m.id == id).unwrap().payload.fill().clone()
        };
        assert_eq!(fill("Kitsilano / weekend"), Brush::Solid(HOVER_FILL));
        assert_eq!(fill("Kitsilano / weekday"), Brush::Solid(WEEKDAY_FILL));
        assert_eq!(
            v.tooltip_lines(None, "Kitsilano / weekend").unwrap(),
            vec!["Kitsilano", "Weekday Rate: $1.00", "Weekend Rate: $1.00"]
        );
    }

    #[test]
    fn reconciles() {
        assert_reconciles(&view());
    }
}
