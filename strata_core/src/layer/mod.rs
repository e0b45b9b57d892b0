// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer stack data model.
//!
//! A *layer* is one ordered entry in a card's parallax stack. Each layer has:
//!
//! - An identity ([`LayerId`]) — a generational handle that becomes stale
//!   when the layer is removed, preventing use-after-free bugs at the API
//!   level.
//! - A z-order position — index 0 is the frontmost layer; positions are
//!   recomputed whenever the stack changes (insertion order is z-order,
//!   front to back).
//! - **Caller properties**: whether the layer opts into parallax padding
//!   ([`LayerSpec::uses_parallax_padding`]).
//! - **Engine properties**: the cached uniform margin (≤ 0) and the last
//!   commanded parallax translation.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles;
//! the registry is populated only through the stack's typed API, so a
//! non-layer child can never end up inside it.
//!
//! # Dirty tracking
//!
//! Margin recomputation is eager: every mutation that can move a margin runs
//! a full pass immediately. The pass diffs each layer's newly derived margin
//! against the cached one and marks the [`MARGIN`](crate::dirty::MARGIN)
//! channel only for slots that actually moved, so the host sees the minimal
//! set of margin updates. Stack mutations additionally mark
//! [`ORDER`](crate::dirty::ORDER).

mod id;
mod stack;

pub use id::LayerId;
pub use stack::{LayerSpec, LayerStack, LayoutChanges, ZOrder};
