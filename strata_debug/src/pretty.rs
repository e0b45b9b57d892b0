// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use strata_core::host::{AnimProperty, AnimTarget};
use strata_core::time::HostTime;
use strata_core::trace::{
    AnimateEvent, CancelEvent, CompleteEvent, MarginBatchEvent, SetEvent, TouchEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn host_us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

fn target_name(target: AnimTarget) -> String {
    match target {
        AnimTarget::Card => "card".to_owned(),
        AnimTarget::Layer(id) => format!("layer{}", id.slot()),
    }
}

fn property_name(property: AnimProperty) -> &'static str {
    match property {
        AnimProperty::RotationX => "rot_x",
        AnimProperty::RotationY => "rot_y",
        AnimProperty::TranslationX => "tx",
        AnimProperty::TranslationY => "ty",
        AnimProperty::Elevation => "elev",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_touch(&mut self, e: &TouchEvent) {
        let _ = writeln!(
            self.writer,
            "[touch] {:?} ({:.1}, {:.1}) t={:.1}µs",
            e.phase,
            e.x,
            e.y,
            host_us(e.at),
        );
    }

    fn on_animate(&mut self, e: &AnimateEvent) {
        let _ = writeln!(
            self.writer,
            "[anim ] {}.{} {:.2} -> {:.2} over {:.1}µs handle={} t={:.1}µs",
            target_name(e.target),
            property_name(e.property),
            e.from,
            e.to,
            e.duration.nanos() as f64 / 1000.0,
            e.handle.0,
            host_us(e.at),
        );
    }

    fn on_set(&mut self, e: &SetEvent) {
        let _ = writeln!(
            self.writer,
            "[set  ] {} {}={:.2} t={:.1}µs",
            target_name(e.target),
            property_name(e.property),
            e.value,
            host_us(e.at),
        );
    }

    fn on_cancel(&mut self, e: &CancelEvent) {
        let _ = writeln!(
            self.writer,
            "[cancl] handle={} t={:.1}µs",
            e.handle.0,
            host_us(e.at),
        );
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[done ] handle={} t={:.1}µs",
            e.handle.0,
            host_us(e.at),
        );
    }

    fn on_margin_batch(&mut self, e: &MarginBatchEvent) {
        let _ = writeln!(
            self.writer,
            "[margn] changed={} relayout={} t={:.1}µs",
            e.changed,
            e.relayout,
            host_us(e.at),
        );
    }
}

#[cfg(test)]
mod tests {
    use strata_core::host::AnimationHandle;
    use strata_core::time::Duration;
    use strata_core::touch::TouchPhase;
    use strata_core::{ease::Easing, host::AnimateCommand};

    use super::*;

    #[test]
    fn lines_are_labelled_per_event() {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut sink = PrettyPrintSink::with_writer(&mut out);
            sink.on_touch(&TouchEvent {
                at: HostTime(1_000),
                phase: TouchPhase::Down,
                x: 10.0,
                y: 20.0,
            });
            sink.on_animate(&AnimateEvent::new(
                HostTime(2_000),
                &AnimateCommand {
                    target: AnimTarget::Card,
                    property: AnimProperty::RotationY,
                    from: 0.0,
                    to: 5.0,
                    duration: Duration::from_millis(300),
                    easing: Easing::Decelerate,
                },
                AnimationHandle(7),
            ));
            sink.on_cancel(&CancelEvent {
                at: HostTime(3_000),
                handle: AnimationHandle(7),
            });
        }
        let text = String::from_utf8(out).expect("output is UTF-8");
        assert!(text.contains("[touch] Down"));
        assert!(text.contains("[anim ] card"));
        assert!(text.contains("handle=7"));
        assert!(text.contains("[cancl]"));
    }
}
