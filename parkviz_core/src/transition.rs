// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based transitions over reconciled marks.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{Mark, MarkDiff, MarkId};

/// Transition timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Tween length in milliseconds. Zero disables tweening.
    pub duration_ms: f64,
    /// When `true`, entering rects and circles grow from their neutral state instead of
    /// appearing at full size.
    pub enter_from_neutral: bool,
}

impl TransitionConfig {
    /// A tween of `duration_ms` that snaps entering marks.
    pub const fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            enter_from_neutral: false,
        }
    }

    /// Makes entering marks grow from their neutral state.
    pub const fn with_enter_from_neutral(mut self, enter_from_neutral: bool) -> Self {
        self.enter_from_neutral = enter_from_neutral;
        self
    }

    /// No tweening: every diff applies immediately.
    pub const fn instant() -> Self {
        Self::new(0.0)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::new(600.0)
    }
}

#[derive(Clone, Debug)]
struct Tween {
    from: Mark,
    start_ms: f64,
}

/// Samples displayed marks over time.
///
/// Apply each batch of diffs from [`crate::Scene::tick`] with the current clock value, then
/// sample at any later clock value. An `Update` that arrives while a tween is running starts a
/// new tween from the currently displayed state, so the latest target always wins. `Exit` removes
/// a mark immediately.
#[derive(Debug, Default)]
pub struct Animator {
    config: TransitionConfig,
    targets: HashMap<MarkId, Mark>,
    tweens: HashMap<MarkId, Tween>,
}

impl Animator {
    /// Creates an animator with the given timing.
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            targets: HashMap::new(),
            tweens: HashMap::new(),
        }
    }

    /// Returns the timing.
    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    /// Applies a batch of diffs at clock value `now_ms`.
    pub fn apply(&mut self, diffs: &[MarkDiff], now_ms: f64) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter { id, new, .. } => {
                    self.tweens.remove(id);
                    if self.config.enter_from_neutral && self.config.duration_ms > 0.0 {
                        if let Some(neutral) = new.payload.neutral() {
                            let mut from = (**new).clone();
                            from.payload = neutral;
                            self.tweens.insert(
                                *id,
                                Tween {
                                    from,
                                    start_ms: now_ms,
                                },
                            );
                        }
                    }
                    self.targets.insert(*id, (**new).clone());
                }
                MarkDiff::Update { id, new, old, .. } => {
                    let from = self
                        .sample_mark(*id, now_ms)
                        .unwrap_or_else(|| (**old).clone());
                    if self.config.duration_ms > 0.0 {
                        self.tweens.insert(
                            *id,
                            Tween {
                                from,
                                start_ms: now_ms,
                            },
                        );
                    } else {
                        self.tweens.remove(id);
                    }
                    self.targets.insert(*id, (**new).clone());
                }
                MarkDiff::Exit { id, .. } => {
                    self.tweens.remove(id);
                    self.targets.remove(id);
                }
            }
        }
    }

    /// Returns the displayed state of one mark at `now_ms`.
    pub fn sample_mark(&self, id: MarkId, now_ms: f64) -> Option<Mark> {
        let target = self.targets.get(&id)?;
        match self.tweens.get(&id) {
            Some(tween) => Some(tween.from.lerp(target, self.progress(tween, now_ms))),
            None => Some(target.clone()),
        }
    }

    /// Returns every displayed mark at `now_ms`, in paint order.
    pub fn sample(&self, now_ms: f64) -> Vec<Mark> {
        let mut out: Vec<Mark> = self
            .targets
            .keys()
            .filter_map(|id| self.sample_mark(*id, now_ms))
            .collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Returns `true` when no tween is still running at `now_ms`.
    pub fn is_idle(&self, now_ms: f64) -> bool {
        self.tweens
            .values()
            .all(|t| self.progress(t, now_ms) >= 1.0)
    }

    /// Drops tweens that have finished by `now_ms`.
    pub fn prune(&mut self, now_ms: f64) {
        let duration = self.config.duration_ms;
        self.tweens
            .retain(|_, t| duration > 0.0 && now_ms - t.start_ms < duration);
    }

    fn progress(&self, tween: &Tween, now_ms: f64) -> f64 {
        if self.config.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - tween.start_ms) / self.config.duration_ms).clamp(0.0, 1.0)
    }
}
