// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the gesture loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! gesture-loop instrumentation calls as samples and driver commands flow
//! through the engine. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! The engine itself stays silent; emission belongs to whoever drives it
//! (`strata_gesture_harness` instruments its playback loop this way), and
//! `strata_debug` provides ready-made sinks.

use crate::host::{AnimProperty, AnimTarget, AnimateCommand, AnimationHandle};
use crate::time::{Duration, HostTime};
use crate::touch::TouchPhase;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a touch sample is dispatched into the engine.
#[derive(Clone, Copy, Debug)]
pub struct TouchEvent {
    /// Host time of dispatch.
    pub at: HostTime,
    /// Lifecycle phase of the sample.
    pub phase: TouchPhase,
    /// Container-local x, device pixels.
    pub x: f64,
    /// Container-local y, device pixels.
    pub y: f64,
}

/// Emitted when the engine starts a property animation.
#[derive(Clone, Copy, Debug)]
pub struct AnimateEvent {
    /// Host time of the command.
    pub at: HostTime,
    /// What is being animated.
    pub target: AnimTarget,
    /// Which property.
    pub property: AnimProperty,
    /// Starting value.
    pub from: f64,
    /// Final value.
    pub to: f64,
    /// Animation length.
    pub duration: Duration,
    /// The handle the driver minted for this animation.
    pub handle: AnimationHandle,
}

impl AnimateEvent {
    /// Creates an `AnimateEvent` from an issued command plus the handle the
    /// driver returned for it (which the command itself does not carry).
    #[must_use]
    pub fn new(at: HostTime, cmd: &AnimateCommand, handle: AnimationHandle) -> Self {
        Self {
            at,
            target: cmd.target,
            property: cmd.property,
            from: cmd.from,
            to: cmd.to,
            duration: cmd.duration,
            handle,
        }
    }
}

/// Emitted when the engine assigns a property directly.
#[derive(Clone, Copy, Debug)]
pub struct SetEvent {
    /// Host time of the command.
    pub at: HostTime,
    /// What is being assigned.
    pub target: AnimTarget,
    /// Which property.
    pub property: AnimProperty,
    /// The assigned value.
    pub value: f64,
}

/// Emitted when the engine cancels a running animation.
#[derive(Clone, Copy, Debug)]
pub struct CancelEvent {
    /// Host time of the command.
    pub at: HostTime,
    /// The cancelled handle.
    pub handle: AnimationHandle,
}

/// Emitted when an animation runs to completion.
#[derive(Clone, Copy, Debug)]
pub struct CompleteEvent {
    /// Host time of completion.
    pub at: HostTime,
    /// The completed handle.
    pub handle: AnimationHandle,
}

/// Emitted after a margin pass that produced host-visible work.
#[derive(Clone, Copy, Debug)]
pub struct MarginBatchEvent {
    /// Host time of the pass.
    pub at: HostTime,
    /// How many layers' margins changed.
    pub changed: u32,
    /// Whether a relayout was requested.
    pub relayout: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the gesture loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a touch sample is dispatched.
    fn on_touch(&mut self, e: &TouchEvent) {
        _ = e;
    }

    /// Called when a property animation starts.
    fn on_animate(&mut self, e: &AnimateEvent) {
        _ = e;
    }

    /// Called when a property is assigned directly.
    fn on_set(&mut self, e: &SetEvent) {
        _ = e;
    }

    /// Called when an animation is cancelled.
    fn on_cancel(&mut self, e: &CancelEvent) {
        _ = e;
    }

    /// Called when an animation completes.
    fn on_complete(&mut self, e: &CompleteEvent) {
        _ = e;
    }

    /// Called after a margin pass with host-visible changes.
    fn on_margin_batch(&mut self, e: &MarginBatchEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TouchEvent`].
    #[inline]
    pub fn touch(&mut self, e: &TouchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_touch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimateEvent`].
    #[inline]
    pub fn animate(&mut self, e: &AnimateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SetEvent`].
    #[inline]
    pub fn set(&mut self, e: &SetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_set(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CancelEvent`].
    #[inline]
    pub fn cancel(&mut self, e: &CancelEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cancel(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompleteEvent`].
    #[inline]
    pub fn complete(&mut self, e: &CompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MarginBatchEvent`].
    #[inline]
    pub fn margin_batch(&mut self, e: &MarginBatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_margin_batch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
