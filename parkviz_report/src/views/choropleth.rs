// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Average weekday rate per local area, as a map.

use anyhow::Context;
use kurbo::Vec2;
use parkviz_charts::{
    BLUES_7, ChartConfig, Feature, GeoMarkSpec, LegendPlacement, Margin, Mercator,
    QuantizeLegendSpec, ScaleQuantize, format_currency, sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::{Schema, load_features};
use parkviz_transforms::{
    AggregateField, Joined, Program, Table, Transform, join_with_fallback,
};
use peniko::color::palette::css;

use super::{LEGEND, View, load_csv};
use crate::config::{LegendVariant, ReportConfig};

const AREA: &str = "Geo Local Area";
const WEEKDAY: &str = "Avg_Weekday_Rate";
const WEEKEND: &str = "Avg_Weekend_Rate";
const LAYER: u64 = 1;

/// The map height; the rest of the view holds the legend.
const MAP_HEIGHT: f64 = 600.0;

pub(crate) fn schema() -> Schema {
    Schema::new()
        .with_text(AREA)
        .with_number(WEEKDAY)
        .with_number(WEEKEND)
}

/// Per-feature weekday and weekend means, zero where an area has no meters.
struct Summary {
    weekday: Vec<Joined>,
    weekend: Vec<Joined>,
    scale: ScaleQuantize,
}

pub(crate) struct Choropleth {
    config: ChartConfig,
    features: Vec<Feature>,
    meters: Table,
    legend: LegendVariant,
}

impl Choropleth {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let path = config.path(&config.files.geojson);
        let features = load_features(&path)
            .with_context(|| format!("failed to load `{}`", path.display()))?;
        let meters = load_csv(config, &config.files.meters, &schema())?;
        let chart = config.chart("choropleth", Self::stock_config(config.legend));
        Ok(Self::new(chart, features, meters, config.legend))
    }

    pub(crate) fn stock_config(legend: LegendVariant) -> ChartConfig {
        let below = match legend {
            LegendVariant::BelowCentered => 100.0,
            LegendVariant::BottomRight => 0.0,
        };
        ChartConfig::new(960.0, MAP_HEIGHT + below)
            .with_margin(Margin::new(0.0, 0.0, below, 0.0))
            .with_highlight_fill(css::GREEN)
            .with_tooltip_offset(Vec2::new(10.0, -20.0))
    }

    pub(crate) fn new(
        config: ChartConfig,
        features: Vec<Feature>,
        meters: Table,
        legend: LegendVariant,
    ) -> Self {
        Self {
            config,
            features,
            meters,
            legend,
        }
    }

    fn summary(&self) -> anyhow::Result<Summary> {
        let means = Program::new()
            .with(Transform::Aggregate {
                group_by: vec![AREA.into()],
                fields: vec![
                    AggregateField::mean(WEEKDAY, WEEKDAY),
                    AggregateField::mean(WEEKEND, WEEKEND),
                ],
            })
            .execute(&self.meters)?;
        let names = || self.features.iter().map(|f| f.name.as_str());
        let weekday = join_with_fallback(names(), &means, AREA, WEEKDAY, 0.0)?;
        let weekend = join_with_fallback(names(), &means, AREA, WEEKEND, 0.0)?;
        let domain = sanitize_domain(Some(0.0), means.max(WEEKDAY)?, (0.0, 1.0));
        Ok(Summary {
            weekday,
            weekend,
            scale: ScaleQuantize::new(domain, BLUES_7),
        })
    }

    fn legend_spec(&self, scale: ScaleQuantize) -> QuantizeLegendSpec {
        let spec = QuantizeLegendSpec::new(LEGEND, scale);
        match self.legend {
            LegendVariant::BelowCentered => spec
                .with_tick_size(20.0)
                .with_tick_decimals(1)
                .with_title("Average Rate ($)")
                .with_placement(LegendPlacement::BelowCentered {
                    y: self.config.plot().y1 + 20.0,
                }),
            LegendVariant::BottomRight => spec
                .with_tick_size(-20.0)
                .with_placement(LegendPlacement::BottomRight {
                    inset: Vec2::new(20.0, 50.0),
                }),
        }
    }
}

impl View for Choropleth {
    fn title(&self) -> &str {
        "Average Weekday Parking Rates by Local Area"
    }

    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn keys(&self, _filter: Option<&str>) -> anyhow::Result<Vec<String>> {
        Ok(self.features.iter().map(|f| f.name.clone()).collect())
    }

    fn ids_for(&self, key: &str) -> Vec<MarkId> {
        vec![MarkId::for_key(LAYER, key)]
    }

    fn base_marks(&self, _filter: Option<&str>) -> anyhow::Result<Vec<Mark>> {
        let summary = self.summary()?;
        let plot = self.config.plot();
        let projection = Mercator::fit_size(plot.width(), plot.height(), &self.features);
        let mut marks = GeoMarkSpec::new(LAYER, projection, summary.scale.clone())
            .marks(&self.features, &summary.weekday);
        marks.extend(self.legend_spec(summary.scale).marks(self.config.size));
        Ok(marks)
    }

    fn tooltip_lines(&self, _filter: Option<&str>, key: &str) -> anyhow::Result<Vec<String>> {
        if !self.features.iter().any(|f| f.name == key) {
            return Ok(Vec::new());
        }
        let summary = self.summary()?;
        let value = |joined: &[Joined]| {
            joined
                .iter()
                .find(|j| j.key == key)
                .map_or(0.0, |j| j.value)
        };
        Ok(vec![
            key.to_owned(),
            format!("Avg Weekday Rate: {}", format_currency(value(&summary.weekday))),
            format!("Avg Weekend Rate: {}", format_currency(value(&summary.weekend))),
        ])
    }
}

#[cfg(test)]
mod tests {
    use parkviz_charts::{ChartState, FALLBACK_FILL};
    use parkviz_core::MarkPayload;
    use peniko::Brush;

    use super::*;
    use crate::views::fixtures::{METERS, assert_reconciles, features, hovered, table};
    use crate::views::render_state;

    fn view(legend: LegendVariant) -> Choropleth {
        Choropleth::new(
            Choropleth::stock_config(legend),
            features(),
            table(METERS, &schema()),
            legend,
        )
    }

    fn fill_of(marks: &[Mark], name: &str) -> Brush {
        let id = MarkId::for_key(LAYER, name);
        marks
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.payload.fill().clone())
            .unwrap()
    }

    #[test]
    fn areas_without_meters_use_the_fallback() {
        let v = view(LegendVariant::BelowCentered);
        let marks = v.base_marks(None).unwrap();
        // Downtown's mean (4.00) is the domain maximum, so it takes the darkest bucket.
        assert_eq!(fill_of(&marks, "Downtown"), Brush::Solid(BLUES_7[6]));
        assert_eq!(fill_of(&marks, "Stanley Park"), Brush::Solid(FALLBACK_FILL));

        let lines = v.tooltip_lines(None, "Stanley Park").unwrap();
        assert_eq!(lines[1], "Avg Weekday Rate: $0.00");
        let lines = v.tooltip_lines(None, "Downtown").unwrap();
        assert_eq!(lines[2], "Avg Weekend Rate: $2.00");
    }

    #[test]
    fn empty_rate_cells_are_left_out_of_the_mean() {
        // Downtown's weekend cells are `2.00` and empty; zero-filling would give 1.00.
        let summary = view(LegendVariant::BelowCentered).summary().unwrap();
        let downtown = summary.weekend.iter().find(|j| j.key == "Downtown").unwrap();
        assert!(downtown.matched);
        assert_eq!(downtown.value, 2.0);
    }

    #[test]
    fn hover_fills_green_and_shows_a_tooltip() {
        let v = view(LegendVariant::BelowCentered);
        let state = hovered(&v, None, "Downtown");
        let marks = render_state(&v, &state).unwrap();
        assert_eq!(fill_of(&marks, "Downtown"), Brush::Solid(css::GREEN));
        assert!(marks.iter().any(|m| matches!(
            &m.payload,
            MarkPayload::Text(t) if t.text == "Avg Weekday Rate: $4.00"
        )));

        let base = render_state(&v, &ChartState::new()).unwrap();
        assert_eq!(fill_of(&base, "Downtown"), Brush::Solid(BLUES_7[6]));
    }

    #[test]
    fn legend_variants_differ_only_in_layout() {
        let below = view(LegendVariant::BelowCentered);
        let corner = view(LegendVariant::BottomRight);
        assert_eq!(below.config().size.height, 700.0);
        assert_eq!(corner.config().size.height, 600.0);

        let swatch = |v: &Choropleth| {
            v.base_marks(None)
                .unwrap()
                .into_iter()
                .find(|m| m.id == MarkId::from_raw(LEGEND))
                .and_then(|m| m.payload.bounds())
                .unwrap()
        };
        assert_eq!((swatch(&below).x0, swatch(&below).y0), (330.0, 620.0));
        assert_eq!((swatch(&corner).x0, swatch(&corner).y0), (640.0, 550.0));
    }

    #[test]
    fn reconciles() {
        assert_reconciles(&view(LegendVariant::BottomRight));
    }
}
