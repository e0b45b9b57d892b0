// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity.

use core::fmt;

/// A handle to a layer in a [`LayerStack`](super::LayerStack).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a layer is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId {
    /// Slot index into the stack's arrays.
    pub(crate) idx: u32,
    /// Generation counter — must match the stack's generation for this slot.
    pub(crate) generation: u32,
}

impl LayerId {
    /// Returns the raw slot index (for diagnostics only).
    ///
    /// This is *not* the layer's z-order position; see
    /// [`LayerStack::index_of`](super::LayerStack::index_of) for that.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({}@gen{})", self.idx, self.generation)
    }
}
