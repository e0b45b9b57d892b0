// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording driver and layout doubles with a manual clock.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use strata_core::card::ParallaxCard;
use strata_core::host::{
    AnimProperty, AnimTarget, AnimateCommand, AnimationDriver, AnimationHandle, LayoutHost,
};
use strata_core::layer::LayerId;
use strata_core::time::HostTime;
use strata_core::touch::{TouchPhase, TouchSample};
use strata_core::trace::{
    AnimateEvent, CancelEvent, CompleteEvent, SetEvent, TouchEvent, Tracer,
};

/// One entry in the [`ReplayDriver`]'s command log.
#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// A touch sample was dispatched into the card.
    Touch {
        /// Dispatch time.
        at: HostTime,
        /// Sample phase.
        phase: TouchPhase,
        /// Container-local x.
        x: f64,
        /// Container-local y.
        y: f64,
    },
    /// The engine started an animation.
    Animate {
        /// Command time.
        at: HostTime,
        /// The full command.
        cmd: AnimateCommand,
        /// The handle minted for it.
        handle: AnimationHandle,
    },
    /// The engine assigned a property directly.
    Set {
        /// Command time.
        at: HostTime,
        /// Assignment target.
        target: AnimTarget,
        /// Assigned property.
        property: AnimProperty,
        /// Assigned value.
        value: f64,
    },
    /// The engine cancelled an animation.
    Cancel {
        /// Command time.
        at: HostTime,
        /// The cancelled handle.
        handle: AnimationHandle,
    },
    /// An animation ran to completion.
    Complete {
        /// The animation's end time.
        at: HostTime,
        /// The completed handle.
        handle: AnimationHandle,
    },
}

#[derive(Clone, Copy, Debug)]
struct ActiveAnimation {
    handle: AnimationHandle,
    cmd: AnimateCommand,
    start: HostTime,
}

impl ActiveAnimation {
    fn end(&self) -> HostTime {
        self.start + self.cmd.duration
    }

    fn value_at(&self, now: HostTime) -> f64 {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = elapsed.fraction_of(self.cmd.duration);
        self.cmd.easing.interpolate(self.cmd.from, self.cmd.to, progress)
    }
}

/// A recording [`AnimationDriver`] with a manual clock.
///
/// The driver honors the production contract — replace-on-same-property,
/// freeze-in-place on cancel, completion reported only for animations that
/// run out their full duration — and additionally records everything it is
/// asked to do, so tests can assert on the exact command stream.
///
/// Time only moves through [`advance_to`](Self::advance_to); in between,
/// [`value_of`](Self::value_of) evaluates in-flight animations at the
/// current clock using the easing each command carried.
#[derive(Debug, Default)]
pub struct ReplayDriver {
    now: HostTime,
    next_handle: u64,
    active: Vec<ActiveAnimation>,
    settled: BTreeMap<(AnimTarget, AnimProperty), f64>,
    log: Vec<Command>,
}

impl ReplayDriver {
    /// Creates a driver with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current clock value.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Advances the clock, firing completions for every animation whose end
    /// falls at or before `t`, in end-time order.
    ///
    /// Completions are reported into `card` the way a live host would call
    /// [`ParallaxCard::on_animation_complete`].
    ///
    /// # Panics
    ///
    /// Panics if `t` is behind the current clock.
    pub fn advance_to(&mut self, t: HostTime, card: &mut ParallaxCard) {
        assert!(t >= self.now, "driver clock must be monotonic");
        loop {
            let due = self
                .active
                .iter()
                .enumerate()
                .filter(|(_, a)| a.end() <= t)
                .min_by_key(|(_, a)| a.end())
                .map(|(i, _)| i);
            let Some(i) = due else { break };

            let done = self.active.swap_remove(i);
            self.settled
                .insert((done.cmd.target, done.cmd.property), done.cmd.to);
            self.log.push(Command::Complete {
                at: done.end(),
                handle: done.handle,
            });
            card.on_animation_complete(done.handle);
        }
        self.now = t;
    }

    /// The current value of a property: the in-flight animation evaluated at
    /// the clock if one is running, otherwise the last settled value
    /// (completed, directly set, frozen by cancel, or primed), otherwise 0.
    #[must_use]
    pub fn value_of(&self, target: AnimTarget, property: AnimProperty) -> f64 {
        if let Some(a) = self
            .active
            .iter()
            .find(|a| a.cmd.target == target && a.cmd.property == property)
        {
            return a.value_at(self.now);
        }
        self.settled.get(&(target, property)).copied().unwrap_or(0.0)
    }

    /// Whether an animation is currently running on the pair.
    #[must_use]
    pub fn is_animating(&self, target: AnimTarget, property: AnimProperty) -> bool {
        self.active
            .iter()
            .any(|a| a.cmd.target == target && a.cmd.property == property)
    }

    /// Number of animations currently in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Seeds a property value without logging a command (e.g. the initial
    /// elevation from [`CardChrome`](strata_core::card::CardChrome)).
    pub fn prime(&mut self, target: AnimTarget, property: AnimProperty, value: f64) {
        self.settled.insert((target, property), value);
    }

    /// The recorded command stream, oldest first.
    #[must_use]
    pub fn log(&self) -> &[Command] {
        &self.log
    }

    /// Records a dispatched touch sample (called by script playback).
    pub fn log_touch(&mut self, sample: &TouchSample) {
        self.log.push(Command::Touch {
            at: sample.timestamp,
            phase: sample.phase,
            x: sample.position.x,
            y: sample.position.y,
        });
    }

    /// Re-emits the recorded command stream as trace events.
    pub fn emit(&self, tracer: &mut Tracer<'_>) {
        for command in &self.log {
            match *command {
                Command::Touch { at, phase, x, y } => {
                    tracer.touch(&TouchEvent { at, phase, x, y });
                }
                Command::Animate { at, cmd, handle } => {
                    tracer.animate(&AnimateEvent::new(at, &cmd, handle));
                }
                Command::Set {
                    at,
                    target,
                    property,
                    value,
                } => {
                    tracer.set(&SetEvent {
                        at,
                        target,
                        property,
                        value,
                    });
                }
                Command::Cancel { at, handle } => {
                    tracer.cancel(&CancelEvent { at, handle });
                }
                Command::Complete { at, handle } => {
                    tracer.complete(&CompleteEvent { at, handle });
                }
            }
        }
    }
}

impl AnimationDriver for ReplayDriver {
    fn animate(&mut self, cmd: &AnimateCommand) -> AnimationHandle {
        // Starting on a busy (target, property) pair replaces the running
        // animation; the old handle goes inert with no completion.
        self.active
            .retain(|a| !(a.cmd.target == cmd.target && a.cmd.property == cmd.property));

        self.next_handle += 1;
        let handle = AnimationHandle(self.next_handle);
        self.active.push(ActiveAnimation {
            handle,
            cmd: *cmd,
            start: self.now,
        });
        self.log.push(Command::Animate {
            at: self.now,
            cmd: *cmd,
            handle,
        });
        handle
    }

    fn set(&mut self, target: AnimTarget, property: AnimProperty, value: f64) {
        self.active
            .retain(|a| !(a.cmd.target == target && a.cmd.property == property));
        self.settled.insert((target, property), value);
        self.log.push(Command::Set {
            at: self.now,
            target,
            property,
            value,
        });
    }

    fn cancel(&mut self, handle: AnimationHandle) {
        if let Some(i) = self.active.iter().position(|a| a.handle == handle) {
            let a = self.active.swap_remove(i);
            // Freeze in place.
            self.settled
                .insert((a.cmd.target, a.cmd.property), a.value_at(self.now));
        }
        self.log.push(Command::Cancel {
            at: self.now,
            handle,
        });
    }
}

/// A recording [`LayoutHost`].
#[derive(Debug, Default)]
pub struct RecordingLayout {
    /// Every margin assignment, in call order.
    pub margins: Vec<(LayerId, f64)>,
    /// How many relayout passes were requested.
    pub relayouts: usize,
}

impl RecordingLayout {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent margin assigned to a layer, if any.
    #[must_use]
    pub fn margin_of(&self, layer: LayerId) -> Option<f64> {
        self.margins
            .iter()
            .rev()
            .find(|(id, _)| *id == layer)
            .map(|&(_, margin)| margin)
    }
}

impl LayoutHost for RecordingLayout {
    fn set_uniform_margin(&mut self, layer: LayerId, margin: f64) {
        self.margins.push((layer, margin));
    }

    fn request_layout(&mut self) {
        self.relayouts += 1;
    }
}
