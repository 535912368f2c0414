// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction state and hover highlighting.
//!
//! UI input is modeled as discrete [`UiEvent`]s folded into a [`ChartState`] by the pure
//! [`reduce`] function. Rendering is a projection of `(dataset, state)`: marks are rebuilt from
//! the current scales on every render and the hover highlight is applied on top with
//! [`apply_hover`]. Leaving a primitive therefore restores its encoded state without remembering
//! the pre-hover color.

extern crate alloc;

use alloc::string::String;

use kurbo::Point;
use peniko::Brush;
use parkviz_core::{Mark, MarkId};

/// The primitive under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverState {
    /// Key of the hovered data item (usually its category label).
    pub key: String,
    /// Last pointer position in scene coordinates.
    pub pointer: Point,
}

/// Everything a render needs besides the data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartState {
    /// Selected filter value; `None` shows everything.
    pub filter: Option<String>,
    /// Hovered item, if any. At most one tooltip is ever visible.
    pub hover: Option<HoverState>,
}

impl ChartState {
    /// The initial state: no filter, nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the item with `key` is hovered.
    pub fn is_hovered(&self, key: &str) -> bool {
        self.hover.as_ref().is_some_and(|h| h.key == key)
    }
}

/// A discrete UI input.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// The filter control changed. `None` selects everything.
    SelectFilter(Option<String>),
    /// The pointer entered the primitive bound to `key`.
    PointerEnter {
        /// Key of the entered item.
        key: String,
        /// Pointer position.
        pointer: Point,
    },
    /// The pointer moved within the hovered primitive.
    PointerMove {
        /// Pointer position.
        pointer: Point,
    },
    /// The pointer left the hovered primitive.
    PointerLeave,
}

/// Computes the next state. Never mutates its input.
///
/// Changing the filter clears the hover, since the hovered primitive may no longer exist.
/// Pointer moves without a hovered item are ignored.
pub fn reduce(state: &ChartState, event: UiEvent) -> ChartState {
    let mut next = state.clone();
    match event {
        UiEvent::SelectFilter(filter) => {
            next.filter = filter;
            next.hover = None;
        }
        UiEvent::PointerEnter { key, pointer } => {
            next.hover = Some(HoverState { key, pointer });
        }
        UiEvent::PointerMove { pointer } => {
            if let Some(h) = &mut next.hover {
                h.pointer = pointer;
            }
        }
        UiEvent::PointerLeave => next.hover = None,
    }
    next
}

/// Attributes overridden on a hovered primitive. `None` fields keep the encoded value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightStyle {
    /// Replacement fill.
    pub fill: Option<Brush>,
    /// Replacement circle radius.
    pub radius: Option<f64>,
    /// Replacement stroke width.
    pub stroke_width: Option<f64>,
}

impl HighlightStyle {
    /// A highlight that only recolors.
    pub fn fill(fill: impl Into<Brush>) -> Self {
        Self {
            fill: Some(fill.into()),
            ..Self::default()
        }
    }

    /// Sets the replacement radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the replacement stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }
}

/// Applies `style` to every mark whose id is in `targets`. Returns how many marks changed.
pub fn apply_hover(marks: &mut [Mark], targets: &[MarkId], style: &HighlightStyle) -> usize {
    let mut n = 0;
    for mark in marks.iter_mut().filter(|m| targets.contains(&m.id)) {
        if let Some(fill) = &style.fill {
            mark.payload.set_fill(fill.clone());
        }
        if let Some(radius) = style.radius {
            mark.payload.set_radius(radius);
        }
        if let Some(stroke_width) = style.stroke_width {
            mark.payload.set_stroke_width(stroke_width);
        }
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn enter_move_leave_cycle() {
        let s0 = ChartState::new();
        let s1 = reduce(
            &s0,
            UiEvent::PointerEnter {
                key: "Downtown".into(),
                pointer: Point::new(5.0, 5.0),
            },
        );
        assert!(s1.is_hovered("Downtown"));
        let s2 = reduce(&s1, UiEvent::PointerMove { pointer: Point::new(7.0, 9.0) });
        assert_eq!(s2.hover.as_ref().map(|h| h.pointer), Some(Point::new(7.0, 9.0)));
        let s3 = reduce(&s2, UiEvent::PointerLeave);
        assert_eq!(s3, s0, "leaving restores the initial state");
    }

    #[test]
    fn move_without_hover_is_ignored() {
        let s = reduce(&ChartState::new(), UiEvent::PointerMove { pointer: Point::ORIGIN });
        assert_eq!(s.hover, None);
    }

    #[test]
    fn filter_change_clears_hover() {
        let hovered = ChartState {
            filter: None,
            hover: Some(HoverState {
                key: "Downtown".into(),
                pointer: Point::ORIGIN,
            }),
        };
        let s = reduce(&hovered, UiEvent::SelectFilter(Some("Kitsilano".into())));
        assert_eq!(s.filter.as_deref(), Some("Kitsilano"));
        assert_eq!(s.hover, None);
    }

    #[test]
    fn hover_only_touches_targets() {
        let a = MarkId::from_raw(1);
        let b = MarkId::from_raw(2);
        let mut marks = vec![
            Mark::circle(a, Point::ORIGIN, 4.0).fill(css::BLUE).build(),
            Mark::circle(b, Point::ORIGIN, 4.0).fill(css::BLUE).build(),
        ];
        let style = HighlightStyle::fill(css::ORANGE).with_radius(6.0);
        assert_eq!(apply_hover(&mut marks, &[b], &style), 1);
        assert_eq!(marks[0].payload.fill(), &Brush::Solid(css::BLUE));
        assert_eq!(marks[1].payload.fill(), &Brush::Solid(css::ORANGE));
        assert_eq!(marks[1].payload.bounds().map(|r| r.width()), Some(12.0));
    }
}
