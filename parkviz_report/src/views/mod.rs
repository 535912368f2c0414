// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The report's charts.
//!
//! Each view owns its loaded tables and a [`ChartConfig`]. Rendering is a projection of
//! `(tables, ChartState)`: [`render_state`] rebuilds every mark from scratch, then overlays the
//! hover highlight and tooltip.

mod area_rates;
mod choropleth;
mod meter_trend;
mod meterhead;
mod population;
mod temperature;
mod time_area_lines;
mod time_slots;

use anyhow::{Context, anyhow};
use clap::ValueEnum;
use kurbo::{Point, Rect};
use parkviz_charts::{
    AxisSpec, ChartConfig, ChartState, HeuristicTextMeasurer, OrdinalDomain, PositionScale,
    ScaleBand, ScaleContinuous, TextMarkSpec, TooltipSpec, apply_hover,
};
use parkviz_core::{Mark, MarkId, TextAnchor};
use parkviz_data::{Schema, load_table};
use parkviz_transforms::Table;

use crate::config::ReportConfig;

/// Raw id bases for guides. Data marks use hashed ids from small layer numbers.
pub(crate) const X_AXIS: u64 = 0x10_000;
pub(crate) const Y_AXIS: u64 = 0x20_000;
pub(crate) const LEGEND: u64 = 0x30_000;
pub(crate) const TITLES: u64 = 0x40_000;
pub(crate) const TOOLTIP: u64 = 0x50_000;

/// Selectable charts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub(crate) enum ViewName {
    /// Mean weekday rate per local area on a map.
    Choropleth,
    /// Paired weekday/weekend bars per local area.
    AreaRates,
    /// Six time-slot means per area, one line each.
    TimeSlots,
    /// Mean total rate per meter head type.
    Meterhead,
    /// Time-slot rates over meter index.
    MeterTrend,
    /// Mean rate per time slot and area, long format.
    TimeAreaLines,
    /// Most populous countries as horizontal bars.
    PopulationBars,
    /// Most populous countries as a dot plot.
    PopulationScatter,
    /// San Francisco temperature readings as points.
    TemperatureScatter,
    /// San Francisco temperature readings as a line.
    TemperatureLine,
}

impl ViewName {
    pub(crate) const ALL: [Self; 10] = [
        Self::Choropleth,
        Self::AreaRates,
        Self::TimeSlots,
        Self::Meterhead,
        Self::MeterTrend,
        Self::TimeAreaLines,
        Self::PopulationBars,
        Self::PopulationScatter,
        Self::TemperatureScatter,
        Self::TemperatureLine,
    ];

    /// The command-line spelling (`area-rates`).
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Choropleth => "choropleth",
            Self::AreaRates => "area-rates",
            Self::TimeSlots => "time-slots",
            Self::Meterhead => "meterhead",
            Self::MeterTrend => "meter-trend",
            Self::TimeAreaLines => "time-area-lines",
            Self::PopulationBars => "population-bars",
            Self::PopulationScatter => "population-scatter",
            Self::TemperatureScatter => "temperature-scatter",
            Self::TemperatureLine => "temperature-line",
        }
    }
}

/// One chart of the report.
pub(crate) trait View {
    fn title(&self) -> &str;

    fn config(&self) -> &ChartConfig;

    /// Filter values offered to the user. `None` shows everything.
    fn filters(&self) -> Vec<Option<String>> {
        vec![None]
    }

    /// Hoverable keys under `filter`, in drawing order.
    fn keys(&self, filter: Option<&str>) -> anyhow::Result<Vec<String>>;

    /// Marks bound to a hover key.
    fn ids_for(&self, key: &str) -> Vec<MarkId>;

    /// Data marks and guides, without any hover overlay.
    fn base_marks(&self, filter: Option<&str>) -> anyhow::Result<Vec<Mark>>;

    /// Tooltip text for a hovered key. No lines means no tooltip.
    fn tooltip_lines(&self, _filter: Option<&str>, _key: &str) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Restyles the marks bound to `key`.
    fn highlight(&self, marks: &mut [Mark], key: &str) {
        apply_hover(marks, &self.ids_for(key), &self.config().highlight);
    }
}

/// Loads the data for `name` and builds its view.
pub(crate) fn build(name: ViewName, config: &ReportConfig) -> anyhow::Result<Box<dyn View>> {
    Ok(match name {
        ViewName::Choropleth => Box::new(choropleth::Choropleth::load(config)?),
        ViewName::AreaRates => Box::new(area_rates::AreaRates::load(config)?),
        ViewName::TimeSlots => Box::new(time_slots::TimeSlots::load(config)?),
        ViewName::Meterhead => Box::new(meterhead::Meterhead::load(config)?),
        ViewName::MeterTrend => Box::new(meter_trend::MeterTrend::load(config)?),
        ViewName::TimeAreaLines => Box::new(time_area_lines::TimeAreaLines::load(config)?),
        ViewName::PopulationBars => Box::new(population::PopulationBars::load(config)?),
        ViewName::PopulationScatter => Box::new(population::PopulationScatter::load(config)?),
        ViewName::TemperatureScatter => {
            Box::new(temperature::TemperatureScatter::load(config)?)
        }
        ViewName::TemperatureLine => Box::new(temperature::TemperatureLine::load(config)?),
    })
}

/// Renders one interaction state.
pub(crate) fn render_state(view: &dyn View, state: &ChartState) -> anyhow::Result<Vec<Mark>> {
    let filter = state.filter.as_deref();
    let mut marks = view.base_marks(filter)?;
    if let Some(hover) = &state.hover {
        view.highlight(&mut marks, &hover.key);
        let lines = view.tooltip_lines(filter, &hover.key)?;
        let tooltip = TooltipSpec::for_hover(
            TOOLTIP,
            Some(hover),
            view.config().tooltip_offset,
            |_| lines,
        );
        if let Some(tooltip) = tooltip {
            marks.extend(tooltip.marks(&HeuristicTextMeasurer));
        }
    }
    Ok(marks)
}

/// Where a pointer hovering `key` would sit: the center of its first bound mark.
pub(crate) fn hover_anchor(
    view: &dyn View,
    filter: Option<&str>,
    key: &str,
) -> anyhow::Result<Option<Point>> {
    let ids = view.ids_for(key);
    Ok(view
        .base_marks(filter)?
        .iter()
        .filter(|m| ids.contains(&m.id))
        .find_map(|m| m.payload.bounds())
        .map(|b| b.center()))
}

/// A bold chart title centered over the plot, `dy` above it.
pub(crate) fn chart_title(plot: Rect, dy: f64, text: &str, font_size: f64) -> Mark {
    TextMarkSpec::title(
        MarkId::from_raw(TITLES),
        Point::new(plot.center().x, plot.y0 - dy),
        text,
    )
    .with_font_size(font_size)
    .mark()
}

/// A title at an explicit position, anchored at its start.
pub(crate) fn chart_title_at(pos: Point, text: &str) -> Mark {
    TextMarkSpec::title(MarkId::from_raw(TITLES), pos, text)
        .with_anchor(TextAnchor::Start)
        .mark()
}

/// The band scale and categories behind a band axis.
pub(crate) fn band_scale(axis: &AxisSpec, plot: Rect) -> anyhow::Result<(ScaleBand, OrdinalDomain)> {
    match axis.position_scale(plot) {
        PositionScale::Band(band, categories) => Ok((band, categories)),
        _ => Err(anyhow!("axis {:#x} is not a band axis", axis.id_base)),
    }
}

/// The continuous scale behind a linear or time axis.
pub(crate) fn continuous_scale(axis: &AxisSpec, plot: Rect) -> anyhow::Result<ScaleContinuous> {
    axis.scale_continuous(plot)
        .ok_or_else(|| anyhow!("axis {:#x} is not continuous", axis.id_base))
}

/// Loads one input file of the report.
pub(crate) fn load_csv(config: &ReportConfig, file: &str, schema: &Schema) -> anyhow::Result<Table> {
    let path = config.path(file);
    load_table(&path, schema).with_context(|| format!("failed to load `{}`", path.display()))
}

/// Returns sorted distinct values of a text column.
pub(crate) fn sorted_distinct(table: &Table, column: &str) -> anyhow::Result<Vec<String>> {
    let mut values = table.distinct(column)?;
    values.sort();
    Ok(values)
}

#[cfg(test)]
mod fixtures;

/// A small area-rates view over the shared fixtures.
#[cfg(test)]
pub(crate) fn test_view() -> Box<dyn View> {
    let meters = fixtures::table(fixtures::METERS, &area_rates::schema());
    Box::new(area_rates::AreaRates::new(
        area_rates::AreaRates::stock_config(),
        meters,
    ))
}
