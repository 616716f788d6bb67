//! Scheduling loops for the two front ends.
//!
//! Each controller owns every collaborator it drives and runs one
//! cooperative loop: poll input, handle it, sleep, tick. Call
//! [`run`](SerialController::run) from `main`, or `run_once` to interleave
//! other work.

use crate::command::Command;
use crate::config::{DEFAULT_LINE_CAPACITY, DEFAULT_STEP_CAPACITY, OverlayConfig, SerialConfig};
use crate::hid::Keyboard;
use crate::line::{LineError, LineReader};
use crate::overlay::{OverlayPhase, TouchOverlay, TouchSensor, TouchSession};
use crate::renderer::PixelStrip;
use crate::sequencer::PatternSequencer;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

/// Serial command front end: line reader, parser and pattern sequencer.
///
/// # Type Parameters
/// * `P` - Serial port implementation type
/// * `S` - Pixel strip implementation type
/// * `D` - Delay implementation type
/// * `N` - Maximum number of steps in a pattern
/// * `L` - Maximum line length in bytes
pub struct SerialController<
    P,
    S,
    D,
    const N: usize = DEFAULT_STEP_CAPACITY,
    const L: usize = DEFAULT_LINE_CAPACITY,
> where
    P: Read + ReadReady + Write,
    S: PixelStrip,
    D: DelayNs,
{
    port: P,
    reader: LineReader<L>,
    sequencer: PatternSequencer<S, N>,
    delay: D,
    config: SerialConfig,
}

impl<P, S, D, const N: usize, const L: usize> SerialController<P, S, D, N, L>
where
    P: Read + ReadReady + Write,
    S: PixelStrip,
    D: DelayNs,
{
    /// Applies the configured log level and blanks the strip.
    pub fn new(port: P, strip: S, delay: D, config: SerialConfig) -> Self {
        config.log_level.apply();
        info!("type a command and hit enter (newline)");

        Self {
            port,
            reader: LineReader::new(config.echo),
            sequencer: PatternSequencer::new(strip),
            delay,
            config,
        }
    }

    /// One loop iteration: handle at most one complete line, sleep, then
    /// credit one tick to the active step.
    pub fn run_once(&mut self) {
        let Self {
            port,
            reader,
            sequencer,
            ..
        } = self;

        match reader.poll(port) {
            Ok(Some(line)) => match core::str::from_utf8(line) {
                Ok(text) => sequencer.handle(Command::parse(text), port),
                Err(_) => error!("serial: line is not utf-8, ignoring"),
            },
            Ok(None) => {}
            Err(LineError::LineTooLong) => {
                error!("serial: line longer than {} bytes discarded", L);
            }
            Err(LineError::Transport(_)) => error!("serial: port failure"),
        }

        self.delay.delay_ms(self.config.tick_interval_ms);
        self.sequencer.tick(self.config.tick_weight_ms);
    }

    /// Runs until reset.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// The pattern sequencer.
    pub fn sequencer(&self) -> &PatternSequencer<S, N> {
        &self.sequencer
    }

    /// Returns the serial port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Returns the serial port mutably.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

/// Touch front end: two pads, a keyboard and the blink overlay.
///
/// # Type Parameters
/// * `A`, `B` - Touch sensor types for the two pads
/// * `S` - Pixel strip implementation type
/// * `K` - Keyboard implementation type
/// * `D` - Delay implementation type
pub struct TouchController<A, B, S, K, D>
where
    A: TouchSensor,
    B: TouchSensor,
    S: PixelStrip,
    K: Keyboard,
    D: DelayNs,
{
    touch_a: A,
    touch_b: B,
    overlay: TouchOverlay<S, K>,
    session: TouchSession,
    delay: D,
}

impl<A, B, S, K, D> TouchController<A, B, S, K, D>
where
    A: TouchSensor,
    B: TouchSensor,
    S: PixelStrip,
    K: Keyboard,
    D: DelayNs,
{
    pub fn new(touch_a: A, touch_b: B, strip: S, keyboard: K, delay: D, config: OverlayConfig) -> Self {
        info!(
            "touch overlay: {} tick cycle, {} blank",
            config.cycle_length(),
            config.blank_length()
        );

        Self {
            touch_a,
            touch_b,
            session: TouchSession::new(&config),
            overlay: TouchOverlay::new(strip, keyboard, config),
            delay,
        }
    }

    /// One loop iteration: both pads (possibly blocking until release),
    /// sleep, then one blink tick.
    pub fn run_once(&mut self) -> OverlayPhase {
        let config = *self.overlay.config();

        self.overlay
            .on_touch(&mut self.session, &mut self.touch_a, &config.touch_a, &mut self.delay);
        self.overlay
            .on_touch(&mut self.session, &mut self.touch_b, &config.touch_b, &mut self.delay);

        if config.tick_interval_ms > 0 {
            self.delay.delay_ms(config.tick_interval_ms);
        }
        self.overlay.on_tick(&mut self.session)
    }

    /// Runs until reset.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// Current overlay state.
    pub fn session(&self) -> &TouchSession {
        &self.session
    }

    /// The overlay.
    pub fn overlay(&self) -> &TouchOverlay<S, K> {
        &self.overlay
    }

    /// Returns the delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Returns both pads mutably.
    pub fn sensors_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.touch_a, &mut self.touch_b)
    }
}
