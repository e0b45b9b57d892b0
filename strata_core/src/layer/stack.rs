// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, ordering, and margin
//! management.

use alloc::vec::Vec;

use kurbo::Vec2;
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;

use super::id::LayerId;

/// Caller-supplied description of a new layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerSpec {
    /// Whether the layer receives a negative parallax margin.
    ///
    /// A padded layer's bounds are pre-expanded by its maximum translation so
    /// that movement never exposes a clipped edge. Layers that render edge
    /// bleed themselves can opt out.
    pub uses_parallax_padding: bool,
}

impl Default for LayerSpec {
    #[inline]
    fn default() -> Self {
        Self {
            uses_parallax_padding: true,
        }
    }
}

/// The set of layout changes produced by one margin pass.
///
/// [`margins`](Self::margins) holds the layers whose cached margin actually
/// moved; the host only needs margin calls (and a relayout) for those.
#[derive(Clone, Debug, Default)]
pub struct LayoutChanges {
    /// Layers whose uniform margin changed, with the new value.
    pub margins: Vec<(LayerId, f64)>,
    /// Whether the z-order changed since the last pass.
    pub order_changed: bool,
}

impl LayoutChanges {
    /// Whether this pass produced no host-visible work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.margins.is_empty() && !self.order_changed
    }
}

/// Struct-of-arrays storage for a card's layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer
/// occupies a slot in parallel arrays; removed layers are recycled via a free
/// list, and generation counters prevent stale handle access. The separate
/// `order` list carries z-order (front to back) and is the source of truth
/// for each layer's parallax index.
#[derive(Debug)]
pub struct LayerStack {
    // -- Caller properties --
    uses_padding: Vec<bool>,

    // -- Engine properties --
    margin: Vec<f64>,
    translation: Vec<Vec2>,

    // -- Allocation --
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,

    // -- Ordering --
    order: Vec<u32>,

    // -- Dirty tracking --
    dirty: DirtyTracker<u32>,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            uses_padding: Vec::new(),
            margin: Vec::new(),
            translation: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            order: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Allocation API --

    /// Adds a layer at the back of the stack and returns its handle.
    ///
    /// The layer starts with a zero margin and a zero translation. The caller
    /// is expected to follow up with a margin pass
    /// ([`recompute_margins`](Self::recompute_margins)) — adding a layer
    /// changes every layer's movement factor, not just the new one's.
    pub fn push(&mut self, spec: LayerSpec) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.uses_padding[idx as usize] = spec.uses_parallax_padding;
            self.margin[idx as usize] = 0.0;
            self.translation[idx as usize] = Vec2::ZERO;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.uses_padding.push(spec.uses_parallax_padding);
            self.margin.push(0.0);
            self.translation.push(Vec2::ZERO);
            self.generation.push(0);
            idx
        };

        self.order.push(idx);
        self.dirty.mark(idx, dirty::ORDER);

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes a layer, freeing its slot for reuse.
    ///
    /// Indices of the layers behind it shift forward; a margin pass is
    /// expected to follow.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;

        self.order.retain(|&slot| slot != idx);

        // Remove dirty tracking state, then bump generation so old handles
        // immediately fail validation.
        self.dirty.remove_key(idx);
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);

        // Every surviving layer's z-order index may have shifted.
        for &slot in &self.order {
            self.dirty.mark(slot, dirty::ORDER);
        }
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the stack holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // -- Ordering API --

    /// Returns the z-order position of a layer (0 = frontmost).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn index_of(&self, id: LayerId) -> usize {
        self.validate(id);
        self.order
            .iter()
            .position(|&slot| slot == id.idx)
            .expect("live layer is always present in the order list")
    }

    /// Returns an iterator over the layers in z-order, front to back.
    #[must_use]
    pub fn z_order(&self) -> ZOrder<'_> {
        ZOrder {
            stack: self,
            cursor: 0,
        }
    }

    // -- Property getters --

    /// Whether a layer opts into parallax padding.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn uses_parallax_padding(&self, id: LayerId) -> bool {
        self.validate(id);
        self.uses_padding[id.idx as usize]
    }

    /// The layer's cached uniform margin (zero or negative).
    ///
    /// Only valid after a margin pass has run.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn margin(&self, id: LayerId) -> f64 {
        self.validate(id);
        self.margin[id.idx as usize]
    }

    /// The layer's last commanded parallax translation.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn translation(&self, id: LayerId) -> Vec2 {
        self.validate(id);
        self.translation[id.idx as usize]
    }

    pub(crate) fn set_translation(&mut self, id: LayerId, translation: Vec2) {
        self.validate(id);
        self.translation[id.idx as usize] = translation;
    }

    // -- Margin pass --

    /// Re-derives every layer's margin and returns what changed.
    ///
    /// `factor` maps a z-order index to that layer's movement factor (the
    /// maximum translation it can receive). A padded layer's margin is the
    /// negated factor; an unpadded layer's margin is zero. The pass diffs
    /// against the cached margins through the
    /// [`MARGIN`](crate::dirty::MARGIN) channel so only layers whose value
    /// actually moved appear in the result.
    pub fn recompute_margins(&mut self, factor: impl Fn(usize) -> f64) -> LayoutChanges {
        for (index, &slot) in self.order.iter().enumerate() {
            let new_margin = if self.uses_padding[slot as usize] {
                -factor(index)
            } else {
                0.0
            };
            if self.margin[slot as usize] != new_margin {
                self.margin[slot as usize] = new_margin;
                self.dirty.mark(slot, dirty::MARGIN);
            }
        }

        let changed: Vec<u32> = self
            .dirty
            .drain(dirty::MARGIN)
            .affected()
            .deterministic()
            .run()
            .collect();

        let order_changed = self
            .dirty
            .drain(dirty::ORDER)
            .affected()
            .deterministic()
            .run()
            .count()
            > 0;

        let mut changes = LayoutChanges {
            margins: Vec::with_capacity(changed.len()),
            order_changed,
        };
        for slot in changed {
            changes.margins.push((
                LayerId {
                    idx: slot,
                    generation: self.generation[slot as usize],
                },
                self.margin[slot as usize],
            ));
        }
        changes
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len
                && self.generation[id.idx as usize] == id.generation
                && !self.free_list.contains(&id.idx),
            "stale LayerId: {id:?}"
        );
    }
}

/// An iterator over a stack's layers in z-order, front to back.
///
/// Created by [`LayerStack::z_order`]. Yields `(index, LayerId)` pairs, where
/// `index` is the layer's parallax index.
#[derive(Debug)]
pub struct ZOrder<'a> {
    stack: &'a LayerStack,
    cursor: usize,
}

impl Iterator for ZOrder<'_> {
    type Item = (usize, LayerId);

    fn next(&mut self) -> Option<(usize, LayerId)> {
        let slot = *self.stack.order.get(self.cursor)?;
        let index = self.cursor;
        self.cursor += 1;
        Some((
            index,
            LayerId {
                idx: slot,
                generation: self.stack.generation[slot as usize],
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn padded() -> LayerSpec {
        LayerSpec::default()
    }

    fn unpadded() -> LayerSpec {
        LayerSpec {
            uses_parallax_padding: false,
        }
    }

    #[test]
    fn push_and_remove() {
        let mut stack = LayerStack::new();
        let id = stack.push(padded());
        assert!(stack.is_alive(id));
        assert_eq!(stack.len(), 1);
        stack.remove(id);
        assert!(!stack.is_alive(id));
        assert!(stack.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut stack = LayerStack::new();
        let id1 = stack.push(padded());
        stack.remove(id1);
        let id2 = stack.push(padded());
        // id2 reuses the same slot but has a different generation.
        assert!(!stack.is_alive(id1));
        assert!(stack.is_alive(id2));
        assert_eq!(id1.slot(), id2.slot());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn removed_handle_panics_on_index_of() {
        let mut stack = LayerStack::new();
        let id = stack.push(padded());
        stack.remove(id);
        let _ = stack.index_of(id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn removed_handle_panics_on_margin() {
        let mut stack = LayerStack::new();
        let id = stack.push(padded());
        stack.remove(id);
        let _ = stack.margin(id);
    }

    #[test]
    fn insertion_order_is_z_order() {
        let mut stack = LayerStack::new();
        let front = stack.push(padded());
        let mid = stack.push(padded());
        let back = stack.push(padded());

        assert_eq!(stack.index_of(front), 0);
        assert_eq!(stack.index_of(mid), 1);
        assert_eq!(stack.index_of(back), 2);

        let ids: Vec<_> = stack.z_order().collect();
        assert_eq!(ids, vec![(0, front), (1, mid), (2, back)]);
    }

    #[test]
    fn removal_shifts_later_indices_forward() {
        let mut stack = LayerStack::new();
        let front = stack.push(padded());
        let mid = stack.push(padded());
        let back = stack.push(padded());

        stack.remove(mid);
        assert_eq!(stack.index_of(front), 0);
        assert_eq!(stack.index_of(back), 1);
    }

    #[test]
    fn margin_pass_reports_only_changed_layers() {
        let mut stack = LayerStack::new();
        let a = stack.push(padded());
        let b = stack.push(padded());

        let changes = stack.recompute_margins(|index| 10.0 * (1.0 - index as f64));
        // The back layer's factor is zero, so its margin never left zero and
        // only the front layer is reported.
        assert_eq!(changes.margins.len(), 1);
        assert_eq!(changes.margins[0].0, a);
        assert_eq!(changes.margins[0].1, -10.0);
        assert!(changes.order_changed);
        assert_eq!(stack.margin(a), -10.0);
        assert_eq!(stack.margin(b), 0.0);

        // Same factors again: nothing moved, nothing reported.
        let changes = stack.recompute_margins(|index| 10.0 * (1.0 - index as f64));
        assert!(changes.is_empty());
    }

    #[test]
    fn unpadded_layer_margin_stays_zero() {
        let mut stack = LayerStack::new();
        let a = stack.push(unpadded());
        let changes = stack.recompute_margins(|_| 25.0);
        // The unpadded layer's margin is already zero, so no change.
        assert!(changes.margins.is_empty());
        assert_eq!(stack.margin(a), 0.0);
    }

    #[test]
    fn margin_magnitude_equals_factor_for_padded_layers() {
        let mut stack = LayerStack::new();
        let a = stack.push(padded());
        let b = stack.push(unpadded());
        let _ = stack.recompute_margins(|index| 8.0 - index as f64);
        assert_eq!(stack.margin(a).abs(), 8.0);
        assert_eq!(stack.margin(b).abs(), 0.0);
    }

    #[test]
    fn translations_default_to_zero_and_round_trip() {
        let mut stack = LayerStack::new();
        let id = stack.push(padded());
        assert_eq!(stack.translation(id), Vec2::ZERO);
        stack.set_translation(id, Vec2::new(3.0, -4.0));
        assert_eq!(stack.translation(id), Vec2::new(3.0, -4.0));
    }

    #[test]
    fn reused_slot_resets_properties() {
        let mut stack = LayerStack::new();
        let old = stack.push(unpadded());
        stack.set_translation(old, Vec2::new(9.0, 9.0));
        let _ = stack.recompute_margins(|_| 5.0);
        stack.remove(old);

        let new = stack.push(padded());
        assert!(stack.uses_parallax_padding(new));
        assert_eq!(stack.translation(new), Vec2::ZERO);
        assert_eq!(stack.margin(new), 0.0);
    }
}
