// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted touch sequences.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use strata_core::card::ParallaxCard;
use strata_core::time::HostTime;
use strata_core::touch::{TouchPhase, TouchSample};

use crate::replay::ReplayDriver;

/// A pre-authored gesture: a container size plus a time-ordered list of
/// touch samples.
///
/// Built with the consuming builder methods and played back with
/// [`run`](Self::run):
///
/// ```rust,ignore
/// let script = GestureScript::new(Size::new(200.0, 100.0))
///     .down(at_millis(0), 180.0, 90.0)
///     .move_to(at_millis(50), 100.0, 50.0)
///     .up(at_millis(400), 100.0, 50.0);
/// script.run(&mut card, &mut driver);
/// ```
#[derive(Clone, Debug)]
pub struct GestureScript {
    size: Size,
    steps: Vec<TouchSample>,
}

impl GestureScript {
    /// Starts an empty script against a container of the given size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            steps: Vec::new(),
        }
    }

    /// Appends a [`TouchPhase::Down`] sample.
    #[must_use]
    pub fn down(self, at: HostTime, x: f64, y: f64) -> Self {
        self.step(TouchPhase::Down, at, x, y)
    }

    /// Appends a [`TouchPhase::Move`] sample.
    #[must_use]
    pub fn move_to(self, at: HostTime, x: f64, y: f64) -> Self {
        self.step(TouchPhase::Move, at, x, y)
    }

    /// Appends a [`TouchPhase::Up`] sample.
    #[must_use]
    pub fn up(self, at: HostTime, x: f64, y: f64) -> Self {
        self.step(TouchPhase::Up, at, x, y)
    }

    /// Appends a [`TouchPhase::Cancel`] sample.
    #[must_use]
    pub fn cancel(self, at: HostTime, x: f64, y: f64) -> Self {
        self.step(TouchPhase::Cancel, at, x, y)
    }

    fn step(mut self, phase: TouchPhase, at: HostTime, x: f64, y: f64) -> Self {
        if let Some(last) = self.steps.last() {
            assert!(
                at >= last.timestamp,
                "script samples must be in non-decreasing time order"
            );
        }
        self.steps.push(TouchSample {
            position: Point::new(x, y),
            phase,
            timestamp: at,
        });
        self
    }

    /// The container size the script runs against.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The authored samples, in time order.
    #[must_use]
    pub fn steps(&self) -> &[TouchSample] {
        &self.steps
    }

    /// Plays the script into a card.
    ///
    /// Before each sample the driver clock advances to the sample's
    /// timestamp, firing any animation completions that fall in between —
    /// exactly the interleaving a live host produces.
    pub fn run(&self, card: &mut ParallaxCard, driver: &mut ReplayDriver) {
        for sample in &self.steps {
            driver.advance_to(sample.timestamp, card);
            driver.log_touch(sample);
            card.on_touch(*sample, self.size, driver);
        }
    }
}
