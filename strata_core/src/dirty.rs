// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Strata uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! diff layer layout state against what the host last saw. The stack is flat
//! — layers have no ancestry — so no channel propagates; each one is marked
//! and drained per slot.
//!
//! - **[`MARGIN`]** — a layer's cached uniform margin changed. Marked during
//!   the eager margin pass that every configuration or layer-list mutation
//!   runs, and drained in the same pass into a
//!   [`LayoutChanges`](crate::layer::LayoutChanges) so only genuinely
//!   changed layers generate host margin calls.
//!
//! - **[`ORDER`]** — the z-order list changed (layer added or removed).
//!   Every surviving layer's index may have shifted, which is why the margin
//!   pass re-derives all factors instead of patching one.

use understory_dirty::Channel;

/// Cached uniform margin changed — the host must be told the new value.
pub const MARGIN: Channel = Channel::new(0);

/// Z-order changed — layer indices were recomputed.
pub const ORDER: Channel = Channel::new(1);
