// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A week of San Francisco temperature readings, as points and as a line.

use chrono::DateTime;
use kurbo::{Point, Rect};
use parkviz_charts::{
    AxisSpec, ChartConfig, Curve, LineMarkSpec, Margin, PointMarkSpec, ScaleLinearSpec,
    ScaleTimeSpec, sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::{MalformedPolicy, Schema};
use parkviz_transforms::{Column, Program, SortOrder, Table, Transform};
use peniko::color::palette::css;

use super::{View, X_AXIS, Y_AXIS, chart_title_at, load_csv};
use crate::config::ReportConfig;

const TIMESTAMP: &str = "timestamp";
const TEMPERATURE: &str = "temperature";
const READING: &str = "reading";
const LAYER: u64 = 1;
const TITLE: &str = "Historical Temperature in San Francisco";

const DAY: f64 = 86_400.0;

pub(crate) fn schema() -> Schema {
    Schema::new()
        .with_time(TIMESTAMP)
        .with_number(TEMPERATURE)
        .with_policy(MalformedPolicy::RejectRow)
}

fn stock_config() -> ChartConfig {
    ChartConfig::new(960.0, 500.0).with_margin(Margin::new(60.0, 40.0, 90.0, 150.0))
}

/// Weekday and day of month for daily ticks, hour of day otherwise.
fn time_tick(v: f64, step: f64) -> String {
    #[allow(clippy::cast_possible_truncation, reason = "tick instants fit in i64 seconds")]
    let Some(t) = DateTime::from_timestamp(v.floor() as i64, 0) else {
        return String::new();
    };
    if step >= DAY {
        t.format("%a %d").to_string()
    } else {
        t.format("%I %p").to_string()
    }
}

/// Gridded time and temperature axes; both domains are niced over the data extent.
fn axes(readings: &Table, plot: Rect) -> anyhow::Result<(AxisSpec, AxisSpec)> {
    let times = readings.extent(TIMESTAMP)?;
    let temps = readings.extent(TEMPERATURE)?;
    let time_domain = sanitize_domain(times.map(|t| t.0), times.map(|t| t.1), (0.0, DAY));
    let temp_domain = sanitize_domain(temps.map(|t| t.0), temps.map(|t| t.1), (0.0, 1.0));
    let x = AxisSpec::bottom(X_AXIS, ScaleTimeSpec::new(time_domain).with_nice(true))
        .with_tick_size(-plot.height())
        .with_tick_padding(15.0)
        .with_domain(false)
        .with_tick_formatter(time_tick)
        .with_title("Time")
        .with_title_offset(75.0);
    let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(temp_domain).with_nice(true))
        .with_tick_size(-plot.width())
        .with_tick_padding(10.0)
        .with_domain(false)
        .with_title("Temperature")
        .with_title_offset(90.0);
    Ok((x, y))
}

/// Readings in time order, each with a text key for mark identity.
fn readings(raw: &Table) -> anyhow::Result<Table> {
    let mut sorted = Program::new()
        .with(Transform::Sort {
            by: TIMESTAMP.into(),
            order: SortOrder::Asc,
        })
        .execute(raw)?;
    let keys = sorted
        .number(TIMESTAMP)?
        .iter()
        .map(|t| format!("{t}"))
        .collect();
    sorted.push_column(READING, Column::Text(keys))?;
    Ok(sorted)
}

fn load_readings(config: &ReportConfig) -> anyhow::Result<Table> {
    readings(&load_csv(config, &config.files.temperature, &schema())?)
}

pub(crate) struct TemperatureScatter {
    config: ChartConfig,
    readings: Table,
}

impl TemperatureScatter {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let readings = load_readings(config)?;
        Ok(Self::new(config.chart("temperature-scatter", stock_config()), readings))
    }

    pub(crate) fn new(config: ChartConfig, readings: Table) -> Self {
        Self { config, readings }
    }
}

impl View for TemperatureScatter {
    fn title(&self) -> &str {
        TITLE
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
        let plot = self.config.plot();
        let (x, y) = axes(&self.readings, plot)?;
        let mut marks = PointMarkSpec::new(
            LAYER,
            vec![READING.into()],
            TIMESTAMP,
            TEMPERATURE,
            x.position_scale(plot),
            y.position_scale(plot),
        )
        .with_radius(7.0)
        .with_fill(css::STEEL_BLUE)
        .marks(&self.readings)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(chart_title_at(Point::new(plot.x0, plot.y0 - 10.0), TITLE));
        Ok(marks)
    }
}

pub(crate) struct TemperatureLine {
    config: ChartConfig,
    readings: Table,
}

impl TemperatureLine {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let readings = load_readings(config)?;
        Ok(Self::new(config.chart("temperature-line", stock_config()), readings))
    }

    pub(crate) fn new(config: ChartConfig, readings: Table) -> Self {
        Self { config, readings }
    }
}

impl View for TemperatureLine {
    fn title(&self) -> &str {
        TITLE
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
        let plot = self.config.plot();
        let (x, y) = axes(&self.readings, plot)?;
        let mut marks = LineMarkSpec::new(
            LAYER,
            TIMESTAMP,
            TEMPERATURE,
            x.position_scale(plot),
            y.position_scale(plot),
        )
        .with_curve(Curve::MonotoneX)
        .with_stroke(css::STEEL_BLUE, 2.0)
        .marks(&self.readings)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(chart_title_at(Point::new(plot.x0, plot.y0 - 10.0), TITLE));
        Ok(marks)
    }
}
