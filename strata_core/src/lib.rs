// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-to-transform mapping and layer stack for parallax card widgets.
//!
//! `strata_core` implements the pseudo-3D "parallax card" illusion: a card
//! surface that rotates, translates, and elevates under the finger while an
//! ordered stack of layers shifts by depth-scaled amounts. It is `no_std`
//! compatible (with `alloc`) and owns only the transform/geometry logic and
//! the gesture state machine — rendering, input plumbing, and layout
//! execution stay with the embedding.
//!
//! # Architecture
//!
//! The crate is organized around a gesture loop that turns host pointer
//! callbacks into animation and layout commands:
//!
//! ```text
//!   Host input pipeline
//!       │
//!       ▼
//!   TouchSample ──► ParallaxCard::on_touch() ──► AnimationDriver commands
//!                          │                        (animate / set / cancel)
//!                          │
//!   config / stack mutations ──► margin pass ──► LayoutHost commands
//!                                                  (margins / relayout)
//!                          ▲
//!   completion callbacks ──┘ (ParallaxCard::on_animation_complete)
//! ```
//!
//! **[`touch`]** — Touch samples and the pure position→rotation mapping
//! (normalize, clamp, center remap, mode adjustment).
//!
//! **[`card`]** — The [`ParallaxCard`](card::ParallaxCard) engine: phase
//! state machine, movement-factor interpolation, eager margin passes, and
//! the structural attach/adopt contract.
//!
//! **[`layer`]** — Struct-of-arrays layer stack with generational handles
//! and z-order bookkeeping.
//!
//! **[`dirty`]** — Margin/order dirty channels via `understory_dirty`.
//!
//! **[`host`]** — The [`AnimationDriver`](host::AnimationDriver) and
//! [`LayoutHost`](host::LayoutHost) traits that embeddings implement.
//!
//! **[`ease`]** / **[`pose`]** / **[`time`]** / **[`density`]** — Easing
//! curves, the card pose type, nanosecond time, and explicit dip-to-pixel
//! conversion.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! gesture-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod card;
pub mod density;
pub mod dirty;
pub mod ease;
pub mod error;
pub mod host;
pub mod layer;
pub mod pose;
pub mod time;
pub mod touch;
pub mod trace;
