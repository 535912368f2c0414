// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ten most populous countries, as horizontal bars and as a dot plot.

use kurbo::Point;
use parkviz_charts::{
    AxisSpec, BarMarkSpec, BarOrientation, ChartConfig, Margin, OrdinalDomain, PointMarkSpec,
    ScaleBandSpec, ScaleLinearSpec, ScalePointSpec, format_si, sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::{Coercion, MalformedPolicy, Schema};
use parkviz_transforms::Table;
use peniko::color::palette::css;

use super::{View, X_AXIS, Y_AXIS, band_scale, chart_title_at, continuous_scale, load_csv};
use crate::config::ReportConfig;

const COUNTRY: &str = "country";
const POPULATION: &str = "population";
const LAYER: u64 = 1;
const TITLE: &str = "Top 10 Most Populous Countries";

/// Populations are stored in thousands.
pub(crate) fn schema() -> Schema {
    Schema::new()
        .with_text(COUNTRY)
        .with(POPULATION, Coercion::Number { multiplier: 1000.0 })
        .with_policy(MalformedPolicy::RejectRow)
}

fn stock_config() -> ChartConfig {
    ChartConfig::new(960.0, 500.0).with_margin(Margin::new(50.0, 40.0, 70.0, 200.0))
}

/// The population axis shared by both charts: SI ticks, gridlines, no domain line.
fn population_axis(countries: &Table, plot: kurbo::Rect, nice: bool) -> anyhow::Result<AxisSpec> {
    let domain = sanitize_domain(Some(0.0), countries.max(POPULATION)?, (0.0, 1.0));
    Ok(
        AxisSpec::bottom(X_AXIS, ScaleLinearSpec::new(domain).with_nice(nice))
            .with_tick_size(-plot.height())
            .with_domain(false)
            .with_tick_formatter(|v, _| format_si(v))
            .with_title("Population")
            .with_title_offset(60.0),
    )
}

fn title(plot: kurbo::Rect) -> Mark {
    chart_title_at(Point::new(plot.x0, plot.y0 - 10.0), TITLE)
}

pub(crate) struct PopulationBars {
    config: ChartConfig,
    countries: Table,
}

impl PopulationBars {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let countries = load_csv(config, &config.files.population, &schema())?;
        Ok(Self::new(config.chart("population-bars", stock_config()), countries))
    }

    pub(crate) fn new(config: ChartConfig, countries: Table) -> Self {
        Self { config, countries }
    }
}

impl View for PopulationBars {
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
        let names: OrdinalDomain = self.countries.text(COUNTRY)?.iter().map(String::as_str).collect();
        let y = AxisSpec::left(Y_AXIS, ScaleBandSpec::new(names.len()).with_uniform_padding(0.1))
            .with_categories(names)
            .with_tick_size(0.0)
            .with_domain(false);
        let x = population_axis(&self.countries, plot, false)?;

        let (band, categories) = band_scale(&y, plot)?;
        let mut marks = BarMarkSpec::new(
            LAYER,
            COUNTRY,
            POPULATION,
            band,
            categories,
            continuous_scale(&x, plot)?,
        )
        .with_orientation(BarOrientation::Horizontal)
        .with_fill(css::STEEL_BLUE)
        .marks(&self.countries)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(title(plot));
        Ok(marks)
    }
}

pub(crate) struct PopulationScatter {
    config: ChartConfig,
    countries: Table,
}

impl PopulationScatter {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let countries = load_csv(config, &config.files.population, &schema())?;
        Ok(Self::new(config.chart("population-scatter", stock_config()), countries))
    }

    pub(crate) fn new(config: ChartConfig, countries: Table) -> Self {
        Self { config, countries }
    }
}

impl View for PopulationScatter {
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
        let names: OrdinalDomain = self.countries.text(COUNTRY)?.iter().map(String::as_str).collect();
        let y = AxisSpec::left(Y_AXIS, ScalePointSpec::new(names.len()).with_padding(0.5))
            .with_categories(names)
            .with_tick_size(-plot.width())
            .with_domain(false);
        let x = population_axis(&self.countries, plot, true)?;

        let mut marks = PointMarkSpec::new(
            LAYER,
            vec![COUNTRY.into()],
            POPULATION,
            COUNTRY,
            x.position_scale(plot),
            y.position_scale(plot),
        )
        .with_radius(10.0)
        .with_fill(css::STEEL_BLUE)
        .marks(&self.countries)?;
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        marks.push(title(plot));
        Ok(marks)
    }
}
