// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer. Animations
//! appear as async spans (begin at the animate command, end at completion or
//! cancellation, correlated by driver handle); touches, direct sets, and
//! margin batches appear as instant events.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::time::HostTime;

use crate::recorder::{RecordedEvent, RecordedTarget, decode};

fn ts_us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

fn target_label(target: RecordedTarget) -> String {
    match target {
        RecordedTarget::Card => "card".to_owned(),
        RecordedTarget::Layer { slot, .. } => format!("layer{slot}"),
    }
}

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Touch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Touch",
                    "cat": "Gesture",
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "phase": format!("{:?}", e.phase),
                        "x": e.x,
                        "y": e.y,
                    }
                }));
            }
            RecordedEvent::Animate(e) => {
                events.push(json!({
                    "ph": "b",
                    "name": format!("{}.{:?}", target_label(e.target), e.property),
                    "cat": "Animation",
                    "id": e.handle.0,
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "from": e.from,
                        "to": e.to,
                        "duration_us": e.duration.nanos() as f64 / 1000.0,
                    }
                }));
            }
            RecordedEvent::Set(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("set {}.{:?}", target_label(e.target), e.property),
                    "cat": "Animation",
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "value": e.value,
                    }
                }));
            }
            RecordedEvent::Cancel(e) => {
                events.push(json!({
                    "ph": "e",
                    "name": "anim",
                    "cat": "Animation",
                    "id": e.handle.0,
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "outcome": "cancelled",
                    }
                }));
            }
            RecordedEvent::Complete(e) => {
                events.push(json!({
                    "ph": "e",
                    "name": "anim",
                    "cat": "Animation",
                    "id": e.handle.0,
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "outcome": "completed",
                    }
                }));
            }
            RecordedEvent::MarginBatch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "MarginBatch",
                    "cat": "Layout",
                    "ts": ts_us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "changed": e.changed,
                        "relayout": e.relayout,
                    }
                }));
            }
        }
    }

    serde_json::to_writer(&mut *writer, &events).map_err(io::Error::other)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use strata_core::ease::Easing;
    use strata_core::host::{
        AnimProperty, AnimTarget, AnimateCommand, AnimationHandle,
    };
    use strata_core::time::Duration;
    use strata_core::touch::TouchPhase;
    use strata_core::trace::{AnimateEvent, CompleteEvent, TouchEvent, TraceSink};

    use crate::recorder::RecorderSink;

    use super::*;

    #[test]
    fn export_produces_paired_async_events() {
        let mut sink = RecorderSink::new();
        sink.on_touch(&TouchEvent {
            at: HostTime(1_000),
            phase: TouchPhase::Down,
            x: 10.0,
            y: 10.0,
        });
        sink.on_animate(&AnimateEvent::new(
            HostTime(1_000),
            &AnimateCommand {
                target: AnimTarget::Card,
                property: AnimProperty::RotationY,
                from: 0.0,
                to: 5.0,
                duration: Duration::from_millis(300),
                easing: Easing::Decelerate,
            },
            AnimationHandle(3),
        ));
        sink.on_complete(&CompleteEvent {
            at: HostTime(301_000_000),
            handle: AnimationHandle(3),
        });

        let mut out: Vec<u8> = Vec::new();
        export(sink.as_bytes(), &mut out).expect("export to a Vec cannot fail");

        let parsed: Vec<serde_json::Value> =
            serde_json::from_slice(&out).expect("exporter emits valid JSON");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[1]["ph"], "b");
        assert_eq!(parsed[2]["ph"], "e");
        // Begin and end share the animation's handle as their id.
        assert_eq!(parsed[1]["id"], parsed[2]["id"]);
        assert_eq!(parsed[1]["name"], "card.RotationY");
    }

    #[test]
    fn empty_recording_exports_an_empty_array() {
        let mut out: Vec<u8> = Vec::new();
        export(&[], &mut out).expect("export to a Vec cannot fail");
        assert_eq!(out, b"[]");
    }
}
