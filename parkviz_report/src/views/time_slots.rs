// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mean rate per day-and-time slot, one line per local area.

use kurbo::{Point, Vec2};
use parkviz_charts::{
    AxisSpec, CATEGORY_10, ChartConfig, Curve, HighlightStyle, KEY_SEPARATOR, LegendFlow,
    LegendItem, LegendSwatchesSpec, LineMarkSpec, Margin, OrdinalDomain, PointMarkSpec, SET_3,
    ScaleLinearSpec, ScaleOrdinal, ScalePointSpec, apply_hover, format_currency,
    sanitize_domain,
};
use parkviz_core::{Mark, MarkId};
use parkviz_data::{MalformedPolicy, Schema};
use parkviz_transforms::{
    AggregateField, FoldColumn, Predicate, Program, Table, Transform,
};
use peniko::Color;
use peniko::color::palette::css;

use super::{LEGEND, View, X_AXIS, Y_AXIS, load_csv, sorted_distinct};
use crate::config::ReportConfig;

const AREA: &str = "Geo Local Area";
const SLOT: &str = "slot";
const RATE: &str = "rate";
const ALL_AREAS: &str = "All Areas";

const LINES: u64 = 1;
const POINTS: u64 = 2;

/// Rate columns and their axis labels, in axis order.
const SLOTS: [(&str, &str); 6] = [
    ("R_MF_9A_6P", "Mon–Fri AM"),
    ("R_MF_6P_10", "Mon–Fri PM"),
    ("R_SA_9A_6P", "Sat AM"),
    ("R_SA_6P_10", "Sat PM"),
    ("R_SU_9A_6P", "Sun AM"),
    ("R_SU_6P_10", "Sun PM"),
];

pub(crate) fn schema() -> Schema {
    SLOTS
        .iter()
        .fold(Schema::new().with_text(AREA), |s, (col, _)| s.with_number(*col))
        .with_policy(MalformedPolicy::Sentinel(0.0))
}

pub(crate) struct TimeSlots {
    config: ChartConfig,
    meters: Table,
    color: ScaleOrdinal,
}

impl TimeSlots {
    pub(crate) fn load(config: &ReportConfig) -> anyhow::Result<Self> {
        let meters = load_csv(config, &config.files.meters_long, &schema())?;
        Self::new(config.chart("time-slots", Self::stock_config()), meters)
    }

    pub(crate) fn stock_config() -> ChartConfig {
        ChartConfig::new(850.0, 420.0)
            .with_margin(Margin::new(50.0, 30.0, 50.0, 60.0))
            .with_transition_ms(500.0)
            .with_tooltip_offset(Vec2::new(10.0, -20.0))
    }

    pub(crate) fn new(config: ChartConfig, meters: Table) -> anyhow::Result<Self> {
        let mut domain = OrdinalDomain::new();
        domain.push(ALL_AREAS);
        for area in sorted_distinct(&meters, AREA)? {
            domain.push(area);
        }
        let colors: Vec<Color> = CATEGORY_10.iter().chain(SET_3.iter()).copied().collect();
        Ok(Self {
            config,
            meters,
            color: ScaleOrdinal::new(domain, colors),
        })
    }

    /// Per-area slot means in long form: one row per `(area, slot)`.
    fn means(&self, filter: Option<&str>) -> anyhow::Result<Table> {
        let mut program = Program::new();
        if let Some(area) = filter {
            program.push(Transform::Filter {
                predicate: Predicate::text_eq(AREA, area),
            });
        }
        program.push(Transform::Fold {
            columns: SLOTS
                .iter()
                .map(|(col, label)| FoldColumn::new(*col, *label))
                .collect(),
            key_output: SLOT.into(),
            value_output: RATE.into(),
            carry: vec![AREA.into()],
        });
        program.push(Transform::Aggregate {
            group_by: vec![AREA.into(), SLOT.into()],
            fields: vec![AggregateField::mean(RATE, RATE)],
        });
        Ok(program.execute(&self.meters)?)
    }

    fn axes(&self, means: &Table) -> anyhow::Result<(AxisSpec, AxisSpec)> {
        let slots: OrdinalDomain = SLOTS.iter().map(|(_, label)| *label).collect();
        let x = AxisSpec::bottom(X_AXIS, ScalePointSpec::new(slots.len()).with_padding(0.5))
            .with_categories(slots)
            .with_title("Day and Time")
            .with_title_offset(40.0);
        let domain = sanitize_domain(Some(0.0), means.max(RATE)?, (0.0, 1.0));
        let y = AxisSpec::left(Y_AXIS, ScaleLinearSpec::new(domain).with_nice(true))
            .with_title("Average Rate ($)")
            .with_title_offset(40.0);
        Ok((x, y))
    }

    fn legend(&self, means: &Table) -> anyhow::Result<Vec<Mark>> {
        let items = means
            .distinct(AREA)?
            .into_iter()
            .filter_map(|area| {
                let color = self.color.map(&area)?;
                Some(LegendItem::solid(area, color))
            })
            .collect();
        let plot = self.config.plot();
        Ok(LegendSwatchesSpec::new(LEGEND, items)
            .with_flow(LegendFlow::Column)
            .with_swatch_size(12.0)
            .with_font_size(11.0)
            .marks(Point::new(plot.x1 - 120.0, plot.y0)))
    }
}

impl View for TimeSlots {
    fn title(&self) -> &str {
        "Average Rate by Day and Time"
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

    /// Area keys hover whole lines; `area / slot` keys hover single points.
    fn keys(&self, filter: Option<&str>) -> anyhow::Result<Vec<String>> {
        let means = self.means(filter)?;
        let areas = means.text(AREA)?;
        let slots = means.text(SLOT)?;
        let mut keys = means.distinct(AREA)?;
        keys.extend(
            areas
                .iter()
                .zip(slots)
                .map(|(area, slot)| format!("{area}{KEY_SEPARATOR}{slot}")),
        );
        Ok(keys)
    }

    fn ids_for(&self, key: &str) -> Vec<MarkId> {
        let layer = if key.contains(KEY_SEPARATOR) {
            POINTS
        } else {
            LINES
        };
        vec![MarkId::for_key(layer, key)]
    }

    fn base_marks(&self, filter: Option<&str>) -> anyhow::Result<Vec<Mark>> {
        let means = self.means(filter)?;
        let plot = self.config.plot();
        let (x, y) = self.axes(&means)?;
        let xs = x.position_scale(plot);
        let ys = y.position_scale(plot);

        let mut marks = LineMarkSpec::new(LINES, SLOT, RATE, xs.clone(), ys.clone())
            .with_series(AREA)
            .with_curve(Curve::MonotoneX)
            .with_color(self.color.clone())
            .marks(&means)?;
        marks.extend(
            PointMarkSpec::new(POINTS, vec![AREA.into(), SLOT.into()], SLOT, RATE, xs, ys)
                .with_radius(4.0)
                .with_color(AREA, self.color.clone())
                .marks(&means)?,
        );
        marks.extend(x.marks(plot));
        marks.extend(y.marks(plot));
        if filter.is_none() {
            marks.extend(self.legend(&means)?);
        }
        Ok(marks)
    }

    fn tooltip_lines(&self, filter: Option<&str>, key: &str) -> anyhow::Result<Vec<String>> {
        let Some((area, slot)) = key.split_once(KEY_SEPARATOR) else {
            return Ok(Vec::new());
        };
        let means = self.means(filter)?;
        let areas = means.text(AREA)?;
        let slots = means.text(SLOT)?;
        let rates = means.number(RATE)?;
        Ok((0..means.row_count())
            .find(|&row| areas[row] == area && slots[row] == slot)
            .map(|row| vec![area.to_owned(), slot.to_owned(), format_currency(rates[row])])
            .unwrap_or_default())
    }

    fn highlight(&self, marks: &mut [Mark], key: &str) {
        let style = if key.contains(KEY_SEPARATOR) {
            HighlightStyle::fill(css::ORANGE).with_radius(6.0)
        } else {
            HighlightStyle::default().with_stroke_width(4.0)
        };
        apply_hover(marks, &self.ids_for(key), &style);
    }
}

#[cfg(test)]
mod tests {
    use parkviz_core::{MarkDiff, MarkPayload, Scene};
    use peniko::Brush;

    use super::*;
    use crate::views::fixtures::{METERS, assert_reconciles, hovered, table};
    use crate::views::render_state;

    fn view() -> TimeSlots {
        TimeSlots::new(TimeSlots::stock_config(), table(METERS, &schema())).unwrap()
    }

    #[test]
    fn all_areas_draw_one_line_each_with_a_legend() {
        let v = view();
        let marks = v.base_marks(None).unwrap();
        let lines = marks
            .iter()
            .filter(|m| {
                matches!(m.payload, MarkPayload::Path(_))
                    && m.z_index == parkviz_charts::SERIES_STROKE
            })
            .count();
        assert_eq!(lines, 2);
        let points = marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Circle(_)))
            .count();
        assert_eq!(points, 12);
        assert!(marks.iter().any(|m| m.id == MarkId::from_raw(LEGEND)));

        let filtered = v.base_marks(Some("Kitsilano")).unwrap();
        assert!(filtered.iter().all(|m| m.id != MarkId::from_raw(LEGEND)));
    }

    #[test]
    fn colors_follow_the_sorted_area_list() {
        let v = view();
        // "All Areas" takes the first palette entry.
        assert_eq!(v.color.map("Downtown"), Some(CATEGORY_10[1]));
        assert_eq!(v.color.map("Kitsilano"), Some(CATEGORY_10[2]));
    }

    #[test]
    fn switching_area_keeps_the_shared_line() {
        let v = view();
        let mut scene = Scene::new();
        scene.tick(v.base_marks(None).unwrap());
        let diffs = scene.tick(v.base_marks(Some("Downtown")).unwrap());
        let line = MarkId::for_key(LINES, "Downtown");
        assert!(diffs.iter().all(|d| !matches!(d, MarkDiff::Exit { id, .. } if *id == line)));
        let gone = MarkId::for_key(LINES, "Kitsilano");
        assert!(diffs.iter().any(|d| matches!(d, MarkDiff::Exit { id, .. } if *id == gone)));
    }

    #[test]
    fn point_hover_grows_and_recolors() {
        let v = view();
        let key = "Downtown / Mon–Fri AM";
        let marks = render_state(&v, &hovered(&v, None, key)).unwrap();
        let point = marks.iter().find(|m| m.id == v.ids_for(key)[0]).unwrap();
        match &point.payload {
            MarkPayload::Circle(c) => {
                assert_eq!(c.radius, 6.0);
                assert_eq!(c.fill, Brush::Solid(css::ORANGE));
            }
            other => panic!("expected a circle, got {other:?}"),
        }
        assert_eq!(
            v.tooltip_lines(None, key).unwrap(),
            vec!["Downtown", "Mon–Fri AM", "$4.00"]
        );
    }

    #[test]
    fn line_hover_thickens_the_stroke() {
        let v = view();
        let marks = render_state(&v, &hovered(&v, None, "Kitsilano")).unwrap();
        let line = marks.iter().find(|m| m.id == v.ids_for("Kitsilano")[0]).unwrap();
        match &line.payload {
            MarkPayload::Path(p) => assert_eq!(p.stroke_width, 4.0),
            other => panic!("expected a path, got {other:?}"),
        }
        assert!(v.tooltip_lines(None, "Kitsilano").unwrap().is_empty());
    }

    #[test]
    fn axes_report_a_missing_rate_column() {
        let v = view();
        let err = v.axes(&Table::new()).unwrap_err();
        assert!(err.to_string().contains(RATE), "{err}");
        assert!(v.axes(&v.means(None).unwrap()).is_ok());
    }

    #[test]
    fn reconciles() {
        assert_reconciles(&view());
    }
}
