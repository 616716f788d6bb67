//! Pattern playback with tick-based timing.
//!
//! Provides [`PatternSequencer`], which owns the active [`PatternSequence`],
//! the playback cursor and the [`LedRenderer`] it paints through. It is driven
//! by two triggers: a new command line, and a fixed-interval scheduler tick.

use crate::command::Command;
use crate::renderer::{LedRenderer, PixelStrip};
use crate::sequence::PatternSequence;
use crate::types::ColorStep;
use embedded_io::Write;

/// Text printed for the `?` command.
pub const USAGE: &str = "Usage: [? | # | B | G]\r\n\
?: this help\r\n\
B: blank pixels\r\n\
G: get current color and status\r\n\
#nnrrggbb-msec#nnrrggbb-msec\r\n\
#ff400000-1000#ff000040-1000\r\n";

/// Plays a looping sequence of color steps onto a strip.
///
/// The sequence is never empty and the cursor always points into it. Loading
/// a sequence always resets the cursor and renders exactly once.
///
/// # Type Parameters
/// * `S` - Pixel strip implementation type
/// * `N` - Maximum number of steps in sequences
pub struct PatternSequencer<S: PixelStrip, const N: usize> {
    renderer: LedRenderer<S>,
    sequence: PatternSequence<N>,
    cursor: usize,
}

impl<S: PixelStrip, const N: usize> PatternSequencer<S, N> {
    /// Creates a sequencer holding the blank sequence and renders it, so the
    /// strip starts dark.
    pub fn new(strip: S) -> Self {
        let mut sequencer = Self {
            renderer: LedRenderer::new(strip),
            sequence: PatternSequence::blank(),
            cursor: 0,
        };
        sequencer.render_current();
        sequencer
    }

    /// Replaces the running sequence and renders its first step.
    pub fn load(&mut self, sequence: PatternSequence<N>) {
        debug!("sequencer: loading {} steps", sequence.step_count());
        self.sequence = sequence;
        self.cursor = 0;
        self.render_current();
    }

    /// Replaces the running sequence with the single default step.
    pub fn blank(&mut self) {
        self.load(PatternSequence::blank());
    }

    /// Advances the active step's timer by `weight_ms`.
    ///
    /// Once the step has been held longer than its duration its timer resets
    /// and the cursor moves on, wrapping at the end. The strip is only redrawn
    /// when the cursor actually changes, so a one-step sequence is rendered
    /// once and then left alone.
    ///
    /// Returns true if the strip was redrawn.
    pub fn tick(&mut self, weight_ms: u32) -> bool {
        let len = self.sequence.step_count();
        let Some(step) = self.sequence.get_step_mut(self.cursor) else {
            return false;
        };

        step.elapsed_ms = step.elapsed_ms.saturating_add(weight_ms);
        if !step.is_expired() {
            return false;
        }
        step.elapsed_ms = 0;

        let next = (self.cursor + 1) % len;
        if next == self.cursor {
            return false;
        }

        trace!("sequencer: step {} -> {}", self.cursor, next);
        self.cursor = next;
        self.render_current();
        true
    }

    /// Applies a decoded command line.
    ///
    /// `Help` and `Status` write their reply to `out`; output errors are
    /// logged and otherwise ignored.
    pub fn handle<W: Write>(&mut self, command: Command<'_, N>, out: &mut W) {
        match command {
            Command::Pattern(sequence) => self.load(sequence),
            Command::Blank => self.blank(),
            Command::Help => {
                if out.write_all(USAGE.as_bytes()).is_err() {
                    error!("sequencer: failed to write usage");
                }
            }
            Command::Status => {
                if write!(out, "{}\r\n", self.current_step()).is_err() {
                    error!("sequencer: failed to write status");
                }
            }
            Command::Empty => {}
            Command::Unrecognized(line) => {
                error!("Unrecognized command: '{}'", line);
            }
        }
    }

    /// The step currently on display.
    pub fn current_step(&self) -> &ColorStep {
        // cursor is kept in range by load() and tick()
        &self.sequence.steps()[self.cursor]
    }

    /// Index of the step currently on display.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The loaded sequence.
    pub fn sequence(&self) -> &PatternSequence<N> {
        &self.sequence
    }

    /// Returns the strip being driven.
    pub fn strip(&self) -> &S {
        self.renderer.strip()
    }

    fn render_current(&mut self) {
        let step = *self.current_step();
        self.renderer.render(&step);
    }
}
