// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch samples and the touch-to-rotation mapping.
//!
//! This module defines the types that flow from the host's input pipeline
//! into the engine, and the pure mapping that turns a touch position into a
//! rotation vector:
//!
//! - [`TouchPhase`] — where in the gesture lifecycle a sample sits
//! - [`TouchMode`] — the sign convention for rotation response
//! - [`TouchSample`] — one event: position plus phase
//! - [`rotation_point`] — position → centered vector in [-1, 1] per axis
//! - [`mode_adjust`] — applies the [`TouchMode`] sign convention
//!
//! # Mapping
//!
//! `rotation_point` first normalizes the position against the container size
//! (clamped to [0, 1]), then remaps each axis from [0.5, 1.0] onto
//! [0.0, 1.0] with [`map_range`]. The midpoint of the container becomes the
//! virtual rotation center: a touch there yields exactly zero, touches at
//! opposite edges yield ±1. Per quadrant the magnitudes look like:
//!
//! ```text
//! ___________
//! |1  0|0  1|
//! |1__0|0__1|
//! |1  0|0  1|
//! |1__0|0__1|
//! ```

use kurbo::{Point, Size, Vec2};

/// Gesture lifecycle phase of a [`TouchSample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// First contact; starts a gesture.
    Down,
    /// Contact moved while held.
    Move,
    /// Contact lifted; ends the gesture.
    Up,
    /// The host aborted the gesture (e.g. an ancestor claimed the stream).
    Cancel,
}

impl TouchPhase {
    /// Whether this phase ends the gesture.
    #[inline]
    #[must_use]
    pub const fn ends_gesture(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// Sign convention for the card's rotation response.
///
/// `Pressed` tilts the touched corner *away* from the user (the card yields
/// under the finger); `Lifted` tilts it *toward* the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TouchMode {
    /// Tilt the touched corner away from the viewer.
    #[default]
    Pressed,
    /// Tilt the touched corner toward the viewer.
    Lifted,
}

/// A single touch event in container-local coordinates.
///
/// Samples are ephemeral: the host produces one per pointer callback and the
/// engine consumes it synchronously. Nothing here is retained across events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    /// Pointer position in container-local device pixels.
    pub position: Point,
    /// Lifecycle phase of this event.
    pub phase: TouchPhase,
    /// Host timestamp of the event.
    pub timestamp: crate::time::HostTime,
}

/// Maps `value` from the `[src_min, src_max]` range onto
/// `[dst_min, dst_max]`, linearly and without clamping.
#[inline]
#[must_use]
pub fn map_range(value: f64, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> f64 {
    (value - src_min) / (src_max - src_min) * (dst_max - dst_min) + dst_min
}

/// Converts a touch position into a centered rotation vector.
///
/// Each component of the result lies in [-1, 1]: zero at the container
/// center, ±1 at the edges. Positions outside the container are clamped to
/// the nearest edge before mapping.
///
/// A container with zero (or negative, or non-finite) width or height has no
/// usable center; the result is `Vec2::ZERO` rather than the NaN a raw
/// division would produce. That state is a normal transient — a card receives
/// no meaningful touches before its first layout pass anyway.
#[must_use]
pub fn rotation_point(position: Point, size: Size) -> Vec2 {
    if size.width <= 0.0 || size.height <= 0.0 || size.width.is_nan() || size.height.is_nan() {
        return Vec2::ZERO;
    }

    let normalized_x = (position.x / size.width).clamp(0.0, 1.0);
    let normalized_y = (position.y / size.height).clamp(0.0, 1.0);

    // Remap [0.5, 1.0] onto [0.0, 1.0]: 0.5 becomes the virtual center of
    // reference, values above rotate towards, values below rotate backwards.
    Vec2::new(
        map_range(normalized_x, 0.5, 1.0, 0.0, 1.0),
        map_range(normalized_y, 0.5, 1.0, 0.0, 1.0),
    )
}

/// Applies the [`TouchMode`] sign convention to a raw rotation vector.
#[inline]
#[must_use]
pub const fn mode_adjust(v: Vec2, mode: TouchMode) -> Vec2 {
    match mode {
        TouchMode::Pressed => Vec2::new(v.x, -v.y),
        TouchMode::Lifted => Vec2::new(-v.x, v.y),
    }
}
