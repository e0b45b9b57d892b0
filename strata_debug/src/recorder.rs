// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Animation targets are stored as raw slot/generation pairs
//! ([`RecordedTarget`]) because generational layer handles cannot be
//! reconstructed outside their stack — the recording outlives the layers it
//! mentions.

use strata_core::host::{AnimProperty, AnimTarget, AnimationHandle};
use strata_core::time::{Duration, HostTime};
use strata_core::touch::TouchPhase;
use strata_core::trace::{
    AnimateEvent, CancelEvent, CompleteEvent, MarginBatchEvent, SetEvent, TouchEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TOUCH: u8 = 1;
const TAG_ANIMATE: u8 = 2;
const TAG_SET: u8 = 3;
const TAG_CANCEL: u8 = 4;
const TAG_COMPLETE: u8 = 5;
const TAG_MARGIN_BATCH: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_phase(&mut self, phase: TouchPhase) {
        self.write_u8(match phase {
            TouchPhase::Down => 0,
            TouchPhase::Move => 1,
            TouchPhase::Up => 2,
            TouchPhase::Cancel => 3,
        });
    }

    fn write_target(&mut self, target: AnimTarget) {
        match target {
            AnimTarget::Card => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
            AnimTarget::Layer(id) => {
                self.write_u8(1);
                self.write_u32(id.slot());
                self.write_u32(id.generation());
            }
        }
    }

    fn write_property(&mut self, property: AnimProperty) {
        self.write_u8(match property {
            AnimProperty::RotationX => 0,
            AnimProperty::RotationY => 1,
            AnimProperty::TranslationX => 2,
            AnimProperty::TranslationY => 3,
            AnimProperty::Elevation => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_touch(&mut self, e: &TouchEvent) {
        self.write_u8(TAG_TOUCH);
        self.write_u64(e.at.nanos());
        self.write_phase(e.phase);
        self.write_f64(e.x);
        self.write_f64(e.y);
    }

    fn on_animate(&mut self, e: &AnimateEvent) {
        self.write_u8(TAG_ANIMATE);
        self.write_u64(e.at.nanos());
        self.write_target(e.target);
        self.write_property(e.property);
        self.write_f64(e.from);
        self.write_f64(e.to);
        self.write_u64(e.duration.nanos());
        self.write_u64(e.handle.0);
    }

    fn on_set(&mut self, e: &SetEvent) {
        self.write_u8(TAG_SET);
        self.write_u64(e.at.nanos());
        self.write_target(e.target);
        self.write_property(e.property);
        self.write_f64(e.value);
    }

    fn on_cancel(&mut self, e: &CancelEvent) {
        self.write_u8(TAG_CANCEL);
        self.write_u64(e.at.nanos());
        self.write_u64(e.handle.0);
    }

    fn on_complete(&mut self, e: &CompleteEvent) {
        self.write_u8(TAG_COMPLETE);
        self.write_u64(e.at.nanos());
        self.write_u64(e.handle.0);
    }

    fn on_margin_batch(&mut self, e: &MarginBatchEvent) {
        self.write_u8(TAG_MARGIN_BATCH);
        self.write_u64(e.at.nanos());
        self.write_u32(e.changed);
        self.write_u8(u8::from(e.relayout));
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// An animation target as recorded: plain slot/generation numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedTarget {
    /// The card surface.
    Card,
    /// A layer, by raw slot and generation.
    Layer {
        /// Slot index at recording time.
        slot: u32,
        /// Generation at recording time.
        generation: u32,
    },
}

/// A decoded animate record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedAnimate {
    /// Command time.
    pub at: HostTime,
    /// Animation target.
    pub target: RecordedTarget,
    /// Animated property.
    pub property: AnimProperty,
    /// Starting value.
    pub from: f64,
    /// Final value.
    pub to: f64,
    /// Animation length.
    pub duration: Duration,
    /// Driver handle.
    pub handle: AnimationHandle,
}

/// A decoded direct-set record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedSet {
    /// Command time.
    pub at: HostTime,
    /// Assignment target.
    pub target: RecordedTarget,
    /// Assigned property.
    pub property: AnimProperty,
    /// Assigned value.
    pub value: f64,
}

/// A decoded event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// Touch dispatch.
    Touch(TouchEvent),
    /// Animation start.
    Animate(RecordedAnimate),
    /// Direct set.
    Set(RecordedSet),
    /// Animation cancel.
    Cancel(CancelEvent),
    /// Animation completion.
    Complete(CompleteEvent),
    /// Margin batch.
    MarginBatch(MarginBatchEvent),
}

/// Decodes recorded bytes back into events.
///
/// Stops at the first malformed or truncated record.
pub fn decode(bytes: &[u8]) -> impl Iterator<Item = RecordedEvent> + '_ {
    Decoder { bytes, pos: 0 }
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        let end = self.pos.checked_add(4)?;
        let chunk = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(u32::from_le_bytes(chunk.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        let end = self.pos.checked_add(8)?;
        let chunk = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(u64::from_le_bytes(chunk.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_phase(&mut self) -> Option<TouchPhase> {
        Some(match self.read_u8()? {
            0 => TouchPhase::Down,
            1 => TouchPhase::Move,
            2 => TouchPhase::Up,
            3 => TouchPhase::Cancel,
            _ => return None,
        })
    }

    fn read_target(&mut self) -> Option<RecordedTarget> {
        let kind = self.read_u8()?;
        let slot = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(match kind {
            0 => RecordedTarget::Card,
            1 => RecordedTarget::Layer { slot, generation },
            _ => return None,
        })
    }

    fn read_property(&mut self) -> Option<AnimProperty> {
        Some(match self.read_u8()? {
            0 => AnimProperty::RotationX,
            1 => AnimProperty::RotationY,
            2 => AnimProperty::TranslationX,
            3 => AnimProperty::TranslationY,
            4 => AnimProperty::Elevation,
            _ => return None,
        })
    }
}

impl Iterator for Decoder<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TOUCH => {
                let at = HostTime(self.read_u64()?);
                let phase = self.read_phase()?;
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                Some(RecordedEvent::Touch(TouchEvent { at, phase, x, y }))
            }
            TAG_ANIMATE => {
                let at = HostTime(self.read_u64()?);
                let target = self.read_target()?;
                let property = self.read_property()?;
                let from = self.read_f64()?;
                let to = self.read_f64()?;
                let duration = Duration(self.read_u64()?);
                let handle = AnimationHandle(self.read_u64()?);
                Some(RecordedEvent::Animate(RecordedAnimate {
                    at,
                    target,
                    property,
                    from,
                    to,
                    duration,
                    handle,
                }))
            }
            TAG_SET => {
                let at = HostTime(self.read_u64()?);
                let target = self.read_target()?;
                let property = self.read_property()?;
                let value = self.read_f64()?;
                Some(RecordedEvent::Set(RecordedSet {
                    at,
                    target,
                    property,
                    value,
                }))
            }
            TAG_CANCEL => {
                let at = HostTime(self.read_u64()?);
                let handle = AnimationHandle(self.read_u64()?);
                Some(RecordedEvent::Cancel(CancelEvent { at, handle }))
            }
            TAG_COMPLETE => {
                let at = HostTime(self.read_u64()?);
                let handle = AnimationHandle(self.read_u64()?);
                Some(RecordedEvent::Complete(CompleteEvent { at, handle }))
            }
            TAG_MARGIN_BATCH => {
                let at = HostTime(self.read_u64()?);
                let changed = self.read_u32()?;
                let relayout = self.read_u8()? != 0;
                Some(RecordedEvent::MarginBatch(MarginBatchEvent {
                    at,
                    changed,
                    relayout,
                }))
            }
            _ => None,
        }
    }
}
