// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed enter/update/exit reconciliation.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::{Mark, MarkId, MarkKind};

/// One reconciliation step for a single primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A new id appeared.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Geometric bounds, when known.
        bounds: Option<Rect>,
        /// The entering mark.
        new: Box<Mark>,
    },
    /// An existing id changed at least one encoded attribute.
    Update {
        /// Mark id.
        id: MarkId,
        /// Primitive kind (of the new mark).
        kind: MarkKind,
        /// Previous paint order.
        old_z_index: i32,
        /// New paint order.
        new_z_index: i32,
        /// Previous bounds, when known.
        old_bounds: Option<Rect>,
        /// New bounds, when known.
        new_bounds: Option<Rect>,
        /// The mark before the update.
        old: Box<Mark>,
        /// The mark after the update.
        new: Box<Mark>,
    },
    /// An id disappeared.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Last known bounds.
        bounds: Option<Rect>,
        /// The removed mark.
        old: Box<Mark>,
    },
}

impl MarkDiff {
    /// Returns the id this diff applies to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// Enter/update/exit tallies for a batch of diffs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffCounts {
    /// Number of `Enter` diffs.
    pub enter: usize,
    /// Number of `Update` diffs.
    pub update: usize,
    /// Number of `Exit` diffs.
    pub exit: usize,
}

impl DiffCounts {
    /// Tallies a batch of diffs.
    pub fn of(diffs: &[MarkDiff]) -> Self {
        let mut out = Self::default();
        for d in diffs {
            match d {
                MarkDiff::Enter { .. } => out.enter += 1,
                MarkDiff::Update { .. } => out.update += 1,
                MarkDiff::Exit { .. } => out.exit += 1,
            }
        }
        out
    }

    /// Returns `true` when the batch changed nothing.
    pub fn is_empty(&self) -> bool {
        self.enter == 0 && self.update == 0 && self.exit == 0
    }
}

/// The currently rendered primitive set.
///
/// Every mark held by the scene came from the most recent [`Scene::tick`]; there are no orphans.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rendered set with `marks` and returns the diffs that take the old set to the
    /// new one.
    ///
    /// Diffs for entering and updated marks follow input order; exits follow ascending id order.
    /// If an id occurs more than once in `marks`, the last occurrence wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let marks: Vec<Mark> = marks.into_iter().collect();
        let mut last: HashMap<MarkId, usize> = HashMap::with_capacity(marks.len());
        for (i, m) in marks.iter().enumerate() {
            last.insert(m.id, i);
        }

        let mut next: HashMap<MarkId, Mark> = HashMap::with_capacity(last.len());
        let mut diffs = Vec::new();
        for (i, mark) in marks.into_iter().enumerate() {
            if last.get(&mark.id) != Some(&i) {
                continue;
            }
            match self.marks.remove(&mark.id) {
                None => diffs.push(MarkDiff::Enter {
                    id: mark.id,
                    kind: mark.kind(),
                    z_index: mark.z_index,
                    bounds: mark.payload.bounds(),
                    new: Box::new(mark.clone()),
                }),
                Some(old) => {
                    if old != mark {
                        diffs.push(MarkDiff::Update {
                            id: mark.id,
                            kind: mark.kind(),
                            old_z_index: old.z_index,
                            new_z_index: mark.z_index,
                            old_bounds: old.payload.bounds(),
                            new_bounds: mark.payload.bounds(),
                            old: Box::new(old),
                            new: Box::new(mark.clone()),
                        });
                    }
                }
            }
            next.insert(mark.id, mark);
        }

        let mut gone: Vec<Mark> = self.marks.drain().map(|(_, m)| m).collect();
        gone.sort_by_key(|m| m.id);
        for old in gone {
            diffs.push(MarkDiff::Exit {
                id: old.id,
                kind: old.kind(),
                bounds: old.payload.bounds(),
                old: Box::new(old),
            });
        }

        self.marks = next;
        diffs
    }

    /// Removes every mark, returning the corresponding exits.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        self.tick(core::iter::empty())
    }

    /// Returns the mark with the given id, if rendered.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Returns the number of rendered marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns the rendered marks in paint order (`z_index`, then id).
    pub fn sorted(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }
}
