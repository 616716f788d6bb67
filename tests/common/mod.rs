//! Shared test infrastructure for pixel-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorType, Read, ReadReady, Write};
use pixel_sequencer::{Color, KeyCode, Keyboard, PixelStrip, Srgb, TouchSensor};

// ============================================================================
// Mock Strip
// ============================================================================

/// One call made on the strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StripOp {
    Fill(Color),
    Set(usize, Color),
    Show,
}

/// Mock strip that keeps a pixel buffer, every call, and every flushed frame
pub struct MockStrip {
    pixels: Vec<Color>,
    ops: Vec<StripOp>,
    frames: Vec<Vec<Color>>,
}

impl MockStrip {
    pub fn new(count: usize) -> Self {
        Self {
            pixels: vec![OFF; count],
            ops: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[StripOp] {
        &self.ops
    }

    pub fn frames(&self) -> &[Vec<Color>] {
        &self.frames
    }

    /// The last flushed frame, or all off if nothing was shown yet
    pub fn shown(&self) -> Vec<Color> {
        self.frames
            .last()
            .cloned()
            .unwrap_or_else(|| vec![OFF; self.pixels.len()])
    }

    pub fn show_count(&self) -> usize {
        self.count(|op| matches!(op, StripOp::Show))
    }

    pub fn fill_count(&self) -> usize {
        self.count(|op| matches!(op, StripOp::Fill(_)))
    }

    pub fn set_count(&self) -> usize {
        self.count(|op| matches!(op, StripOp::Set(..)))
    }

    fn count(&self, pred: impl Fn(&StripOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl PixelStrip for MockStrip {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn fill(&mut self, color: Color) {
        self.pixels.iter_mut().for_each(|p| *p = color);
        self.ops.push(StripOp::Fill(color));
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        self.pixels[index] = color;
        self.ops.push(StripOp::Set(index, color));
    }

    fn show(&mut self) {
        self.frames.push(self.pixels.clone());
        self.ops.push(StripOp::Show);
    }
}

// ============================================================================
// Mock Serial Port
// ============================================================================

/// Mock serial port: bytes queued with `feed` are read back one at a time
pub struct MockSerial {
    incoming: VecDeque<u8>,
    output: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self {
            incoming: VecDeque::new(),
            output: Vec::new(),
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_str(&self) -> &str {
        std::str::from_utf8(&self.output).unwrap()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

impl ErrorType for MockSerial {
    type Error = Infallible;
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.incoming.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.incoming.is_empty())
    }
}

impl Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ============================================================================
// Mock Touch / Keyboard / Delay
// ============================================================================

/// Touch pad that replays a fixed list of readings, then reads released
pub struct ScriptedTouch {
    readings: VecDeque<bool>,
}

impl ScriptedTouch {
    pub fn new(readings: &[bool]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
        }
    }

    pub fn idle() -> Self {
        Self::new(&[])
    }

    /// One press held for `polls` release checks
    pub fn press(polls: usize) -> Self {
        let mut readings = vec![true; polls + 1];
        readings.push(false);
        Self::new(&readings)
    }

    pub fn queue_press(&mut self, polls: usize) {
        self.readings.extend(std::iter::repeat_n(true, polls + 1));
        self.readings.push_back(false);
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl TouchSensor for ScriptedTouch {
    fn is_touched(&mut self) -> bool {
        self.readings.pop_front().unwrap_or(false)
    }
}

/// Keyboard that records every combination sent
pub struct MockKeyboard {
    sent: Vec<Vec<KeyCode>>,
}

impl MockKeyboard {
    pub fn new() -> Self {
        Self { sent: Vec::new() }
    }

    pub fn sent(&self) -> &[Vec<KeyCode>] {
        &self.sent
    }
}

impl Keyboard for MockKeyboard {
    fn send(&mut self, keys: &[KeyCode]) {
        self.sent.push(keys.to_vec());
    }
}

/// Delay that only records how long it was asked to wait
pub struct RecordingDelay {
    pub calls_ms: Vec<u32>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self {
            calls_ms: Vec::new(),
        }
    }

    pub fn total_ms(&self) -> u32 {
        self.calls_ms.iter().sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
    }
}

// ============================================================================
// Colors
// ============================================================================

pub const OFF: Color = Srgb::new(0, 0, 0);
pub const DIM_WHITE: Color = Srgb::new(1, 1, 1);
pub const LOCK_ACTIVE: Color = Srgb::new(2, 0, 0);
pub const LOCK_POST: Color = Srgb::new(20, 0, 0);
pub const ATTENTION_ACTIVE: Color = Srgb::new(2, 2, 0);
pub const ATTENTION_POST: Color = Srgb::new(20, 20, 0);
