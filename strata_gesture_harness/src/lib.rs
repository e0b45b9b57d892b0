// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic gesture playback and driver doubles for Strata.
//!
//! Production embeddings hand `strata_core` a platform animation driver and
//! feed it live pointer events. This crate replaces both ends with
//! deterministic doubles so gesture behavior can be exercised and asserted
//! without a platform:
//!
//! - [`GestureScript`] — a timed touch sequence built up front and played
//!   back sample by sample.
//! - [`ReplayDriver`] — an [`AnimationDriver`](strata_core::host::AnimationDriver)
//!   that records every command, runs a manual clock, evaluates in-flight
//!   values from the same easing curves the engine requested, and reports
//!   completions back into the card exactly when the clock passes them.
//! - [`RecordingLayout`] — a [`LayoutHost`](strata_core::host::LayoutHost)
//!   that records margin assignments and relayout requests.
//!
//! Playback can be re-emitted as trace events
//! ([`ReplayDriver::emit`]) for the sinks in `strata_debug`.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod replay;
mod script;

pub use replay::{Command, RecordingLayout, ReplayDriver};
pub use script::GestureScript;

use strata_core::time::HostTime;

/// Converts a millisecond offset into a [`HostTime`].
///
/// Scripts are usually authored in milliseconds; host time is nanoseconds.
#[inline]
#[must_use]
pub const fn at_millis(millis: u64) -> HostTime {
    HostTime(millis * 1_000_000)
}
