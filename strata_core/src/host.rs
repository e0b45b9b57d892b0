// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! Strata keeps platform work out of the core. An embedding provides the
//! following pieces:
//!
//! - **Touch source** — Produces [`TouchSample`](crate::touch::TouchSample)s
//!   from a platform event callback and feeds them to
//!   [`ParallaxCard::on_touch`](crate::card::ParallaxCard::on_touch). This is
//!   host-specific and not abstracted by a trait because event-loop setup
//!   differs fundamentally across platforms.
//!
//! - **Animation driver** — Implements [`AnimationDriver`] over whatever the
//!   platform animates with (property animators, display-link interpolation,
//!   CSS transitions). The engine issues [`AnimateCommand`]s and direct sets;
//!   the driver owns the in-flight interpolation.
//!
//! - **Layout host** — Implements [`LayoutHost`] so the engine can push the
//!   per-layer negative margins that pre-expand layer bounds against edge
//!   clipping, and schedule a relayout when any of them changed.
//!
//! - **Completion feedback** — Calls
//!   [`ParallaxCard::on_animation_complete`](crate::card::ParallaxCard::on_animation_complete)
//!   when an animation started through the driver finishes on its own.
//!
//! # Crate boundaries
//!
//! `strata_core` owns the data model, the touch mapping, and this contract
//! module. Embedding crates depend on `strata_core` and provide the platform
//! glue. `strata_gesture_harness` implements both traits as deterministic
//! test doubles.
//!
//! # Gesture loop pseudocode
//!
//! A typical touch callback wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_pointer_event(event: PlatformEvent) {
//!     let sample = to_touch_sample(&event);
//!     card.on_touch(sample, surface_size(), &mut driver);
//! }
//!
//! fn on_animator_finished(handle: AnimationHandle) {
//!     card.on_animation_complete(handle);
//! }
//! ```

use crate::ease::Easing;
use crate::layer::LayerId;
use crate::time::Duration;

/// What an animation or direct set targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimTarget {
    /// The card surface itself.
    Card,
    /// One layer in the card's stack.
    Layer(LayerId),
}

/// Which scalar property of a target is being driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimProperty {
    /// Rotation around the horizontal axis, degrees. Card only.
    RotationX,
    /// Rotation around the vertical axis, degrees. Card only.
    RotationY,
    /// Horizontal offset, device pixels.
    TranslationX,
    /// Vertical offset, device pixels.
    TranslationY,
    /// Shadow elevation, device pixels. Card only.
    Elevation,
}

/// A cancellable handle to a driver animation.
///
/// Handles are minted by the driver and are only meaningful to the driver
/// that returned them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationHandle(pub u64);

/// One property animation request issued by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimateCommand {
    /// What to animate.
    pub target: AnimTarget,
    /// Which property to animate.
    pub property: AnimProperty,
    /// Starting value (the engine's last commanded value for the property).
    pub from: f64,
    /// Final value.
    pub to: f64,
    /// Animation length.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

/// Drives property animations on behalf of the engine.
///
/// # Contract
///
/// - [`animate`](Self::animate) starts a new animation and returns a fresh
///   handle. Starting an animation on a `(target, property)` pair that
///   already has one running **replaces** the running animation; the old
///   handle becomes inert and completion is only reported for the new one.
/// - [`set`](Self::set) assigns a property directly, ending any running
///   animation on that `(target, property)` pair without completion.
/// - [`cancel`](Self::cancel) stops an animation where it currently is. No
///   completion is reported for a cancelled handle. Cancelling an unknown or
///   finished handle is a no-op.
/// - When an animation runs to its end, the host reports it back through
///   [`ParallaxCard::on_animation_complete`](crate::card::ParallaxCard::on_animation_complete).
pub trait AnimationDriver {
    /// Starts a property animation and returns its handle.
    fn animate(&mut self, cmd: &AnimateCommand) -> AnimationHandle;

    /// Assigns a property directly, without animation.
    fn set(&mut self, target: AnimTarget, property: AnimProperty, value: f64);

    /// Stops a running animation in place.
    fn cancel(&mut self, handle: AnimationHandle);
}

/// Applies engine-computed layout to the host's view of the layer stack.
pub trait LayoutHost {
    /// Sets a uniform margin (same value on all four sides) for a layer.
    ///
    /// Parallax margins are zero or negative: they pre-expand the layer's
    /// bounds by its maximum translation so movement never exposes a clipped
    /// edge.
    fn set_uniform_margin(&mut self, layer: LayerId, margin: f64);

    /// Schedules a relayout pass after one or more margins changed.
    fn request_layout(&mut self);
}
