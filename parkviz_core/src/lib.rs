// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained mark scene for `parkviz`.
//!
//! A chart is rebuilt from scratch on every render as a flat list of [`Mark`]s. This crate keeps
//! the previously rendered set and reconciles it against the new one:
//! - **Identity** comes from [`MarkId`], usually derived from a category label
//!   ([`MarkId::for_key`]) so the same data item maps to the same primitive across renders.
//! - **Reconciliation** ([`Scene::tick`]) produces [`MarkDiff`]s: `Enter` for new ids, `Update`
//!   for ids whose encoded attributes changed, `Exit` for ids that are gone. Unchanged marks
//!   produce nothing, so re-rendering the same dataset is a no-op.
//! - **Transitions** ([`Animator`]) turn `Update` diffs into linear tweens sampled at an explicit
//!   clock value. There is no internal clock.
//!
//! Rendering backends (SVG, canvas) consume diffs or sampled marks; none live here.

#![no_std]

extern crate alloc;

mod id;
mod mark;
mod scene;
mod transition;

pub use id::MarkId;
pub use mark::{
    CirclePayload, Mark, MarkBuilder, MarkKind, MarkPayload, PathPayload, RectPayload,
    TextAnchor, TextBaseline, TextPayload, lerp_brush,
};
pub use scene::{DiffCounts, MarkDiff, Scene};
pub use transition::{Animator, TransitionConfig};
