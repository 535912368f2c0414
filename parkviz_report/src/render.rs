// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a view through a sequence of interaction states.
//!
//! Every state is reconciled against the previous one in a single [`Scene`], so a filter change
//! shows up as enter/update/exit diffs rather than a redraw. The diffs feed both the settled SVG
//! document and an [`Animator`] that can be sampled part-way through the transition.

use log::debug;
use parkviz_charts::ChartState;
use parkviz_core::{Animator, DiffCounts, Scene, TransitionConfig};

use crate::svg::SvgScene;
use crate::views::{View, render_state};

/// One rendered state.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) caption: String,
    pub(crate) svg: String,
    pub(crate) counts: DiffCounts,
}

pub(crate) struct Renderer<'a> {
    view: &'a dyn View,
    scene: Scene,
    animator: Animator,
    svg: SvgScene,
    clock_ms: f64,
    /// When set, frames show the transition this far in instead of the settled state.
    sample_at_ms: Option<f64>,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(view: &'a dyn View, sample_at_ms: Option<f64>) -> Self {
        let config = view.config();
        Self {
            view,
            scene: Scene::new(),
            animator: Animator::new(TransitionConfig::new(config.transition_ms)),
            svg: SvgScene::new(config.view()),
            clock_ms: 0.0,
            sample_at_ms,
        }
    }

    /// Reconciles `state` against the previous one and serializes the result.
    pub(crate) fn render(&mut self, state: &ChartState) -> anyhow::Result<Frame> {
        let diffs = self.scene.tick(render_state(self.view, state)?);
        let counts = DiffCounts::of(&diffs);
        let caption = caption(state);
        debug!(
            "{} [{caption}]: {} enter, {} update, {} exit",
            self.view.title(),
            counts.enter,
            counts.update,
            counts.exit
        );

        self.svg.apply_diffs(&diffs);
        self.animator.apply(&diffs, self.clock_ms);
        let svg = match self.sample_at_ms {
            Some(dt) => SvgScene::from_marks(
                self.view.config().view(),
                self.animator.sample(self.clock_ms + dt),
            )
            .to_svg_string(),
            None => self.svg.to_svg_string(),
        };

        self.clock_ms += self.view.config().transition_ms;
        self.animator.prune(self.clock_ms);
        Ok(Frame {
            caption,
            svg,
            counts,
        })
    }

    /// Marks currently drawn.
    pub(crate) fn len(&self) -> usize {
        self.svg.len()
    }
}

/// Renders `states` in order through one renderer.
pub(crate) fn render_sequence(
    view: &dyn View,
    states: &[ChartState],
    sample_at_ms: Option<f64>,
) -> anyhow::Result<Vec<Frame>> {
    let mut renderer = Renderer::new(view, sample_at_ms);
    states.iter().map(|s| renderer.render(s)).collect()
}

/// A short description of an interaction state (`Downtown, hover Downtown / weekday`).
pub(crate) fn caption(state: &ChartState) -> String {
    let filter = state.filter.as_deref().unwrap_or("All");
    match &state.hover {
        Some(hover) => format!("{filter}, hover {}", hover.key),
        None => filter.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use parkviz_charts::{UiEvent, reduce};

    use super::*;
    use crate::views::test_view;

    fn filtered(filter: Option<&str>) -> ChartState {
        reduce(&ChartState::new(), UiEvent::SelectFilter(filter.map(String::from)))
    }

    #[test]
    fn filter_changes_reconcile_through_one_scene() {
        let view = test_view();
        let states = [filtered(None), filtered(Some("Kitsilano")), filtered(None)];
        let frames = render_sequence(view.as_ref(), &states, None).unwrap();

        assert_eq!(frames[0].counts.update, 0);
        assert_eq!(frames[0].counts.exit, 0);
        assert!(frames[1].counts.exit > 0, "Downtown's bars leave");
        assert!(frames[1].counts.update > 0, "Kitsilano's bars move");
        assert_eq!(frames[2].counts.exit, 0);
        assert_eq!(frames[0].svg, frames[2].svg, "returning to a state redraws it exactly");
        assert_eq!(frames[1].caption, "Kitsilano");
    }

    #[test]
    fn sampled_frames_show_the_transition_in_flight() {
        let view = test_view();
        let states = [filtered(None), filtered(Some("Kitsilano"))];
        let settled = render_sequence(view.as_ref(), &states, None).unwrap();
        let midway = render_sequence(view.as_ref(), &states, Some(100.0)).unwrap();
        assert_eq!(settled[0].svg, midway[0].svg, "nothing tweens on first render");
        assert_ne!(settled[1].svg, midway[1].svg);

        let done = view.config().transition_ms;
        let finished = render_sequence(view.as_ref(), &states, Some(done)).unwrap();
        assert_eq!(settled[1].svg, finished[1].svg);
    }

    #[test]
    fn hover_captions_name_the_key() {
        let state = reduce(
            &filtered(Some("Downtown")),
            UiEvent::PointerEnter {
                key: "Downtown / weekday".into(),
                pointer: Point::new(1.0, 2.0),
            },
        );
        assert_eq!(caption(&state), "Downtown, hover Downtown / weekday");
        assert_eq!(caption(&ChartState::new()), "All");
    }

    #[test]
    fn renderer_tracks_the_drawn_marks() {
        let view = test_view();
        let mut renderer = Renderer::new(view.as_ref(), None);
        renderer.render(&filtered(None)).unwrap();
        let all = renderer.len();
        renderer.render(&filtered(Some("Kitsilano"))).unwrap();
        assert!(renderer.len() < all);
    }
}
