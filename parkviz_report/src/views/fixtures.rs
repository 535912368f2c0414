// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small in-memory inputs shared by the view tests.

use std::io::Cursor;

use kurbo::Point;
use parkviz_charts::{ChartState, Feature, UiEvent, reduce};
use parkviz_core::{DiffCounts, Scene};
use parkviz_data::{Schema, parse_features, read_csv_from};
use parkviz_transforms::Table;

use super::{View, hover_anchor, render_state};

/// Wide meter records: one row per meter, six time-slot rates plus the per-area averages.
pub(crate) const METERS: &str = "\
METERHEAD,R_MF_9A_6P,R_MF_6P_10,R_SA_9A_6P,R_SA_6P_10,R_SU_9A_6P,R_SU_6P_10,RATE_MISC,METERID,Geo Local Area,Avg_Weekday_Rate,Avg_Weekend_Rate
Twin,3.00,1.00,2.00,1.00,2.00,1.00,,570001,Downtown,3.00,2.00
Single,5.00,2.00,3.00,2.00,3.00,2.00,,570002,Downtown,5.00,
Pay Station,1.00,1.00,1.00,1.00,1.00,1.00,0.50,570003,Kitsilano,1.00,1.00
";

/// Long-format rates per area and time of day.
pub(crate) const AREA_TIME: &str = "\
Geo Local Area,Time,Rate
Downtown,18:00,2
Downtown,09:00,3
Downtown,09:00,5
Kitsilano,18:00,1
Kitsilano,09:00,abc
";

/// Populations in thousands.
pub(crate) const POPULATION: &str = "\
country,population
China,\"1,409,517\"
India,1339180
United States,324459
Atlantis,n/a
";

pub(crate) const TEMPERATURE: &str = "\
timestamp,temperature
2017-09-01 12:00:00,19.8
2017-09-01 00:00:00,14.2
2017-09-01 06:00:00,13.1
not a date,20.0
";

/// Two local areas, only one of which has meters.
pub(crate) const VANCOUVER: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "name": "Downtown" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-123.13, 49.27], [-123.10, 49.27], [-123.10, 49.29], [-123.13, 49.29], [-123.13, 49.27]]]
            }
        },
        {
            "type": "Feature",
            "properties": { "name": "Stanley Park" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-123.16, 49.29], [-123.13, 49.29], [-123.13, 49.31], [-123.16, 49.31], [-123.16, 49.29]]]
            }
        }
    ]
}"#;

pub(crate) fn table(src: &str, schema: &Schema) -> Table {
    let df = read_csv_from(Cursor::new(src.as_bytes().to_vec())).unwrap();
    schema.apply(&df).unwrap().table
}

pub(crate) fn features() -> Vec<Feature> {
    parse_features(VANCOUVER).unwrap()
}

pub(crate) fn hovered(view: &dyn View, filter: Option<&str>, key: &str) -> ChartState {
    let pointer = hover_anchor(view, filter, key)
        .unwrap()
        .unwrap_or(Point::ORIGIN);
    let state = reduce(&ChartState::new(), UiEvent::SelectFilter(filter.map(String::from)));
    reduce(
        &state,
        UiEvent::PointerEnter {
            key: key.into(),
            pointer,
        },
    )
}

/// Walks every filter of `view` through one scene and checks the reconciliation properties:
/// re-rendering a state changes nothing, and hovering then leaving restores the encoded marks.
pub(crate) fn assert_reconciles(view: &dyn View) {
    let mut scene = Scene::new();
    let mut state = ChartState::new();
    for filter in view.filters() {
        state = reduce(&state, UiEvent::SelectFilter(filter.clone()));
        scene.tick(render_state(view, &state).unwrap());
        let again = scene.tick(render_state(view, &state).unwrap());
        assert!(again.is_empty(), "re-rendering {filter:?} changed {:?}", DiffCounts::of(&again));

        let Some(key) = view.keys(filter.as_deref()).unwrap().into_iter().next() else {
            continue;
        };
        let hover = hovered(view, filter.as_deref(), &key);
        let entered = DiffCounts::of(&scene.tick(render_state(view, &hover).unwrap()));
        assert_eq!(entered.exit, 0, "hovering {key} removed marks");
        assert!(entered.update > 0, "hovering {key} restyled nothing");

        let left = reduce(&hover, UiEvent::PointerLeave);
        scene.tick(render_state(view, &left).unwrap());
        let restored = scene.tick(render_state(view, &state).unwrap());
        assert!(restored.is_empty(), "leaving {key} did not restore the encoded marks");
    }
}
