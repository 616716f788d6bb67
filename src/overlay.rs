//! Touch-reactive overlay.
//!
//! A fixed-function front end: two touch pads each paint the strip while held
//! and send a key combination on release, and a tick-driven blink cycle runs
//! in between. It shares nothing with the pattern sequencer.
//!
//! All mutable state lives in a [`TouchSession`] owned by the caller's loop
//! and passed into each handler.

use crate::config::{OverlayConfig, TouchBinding};
use crate::hid::Keyboard;
use crate::renderer::{LedRenderer, PixelStrip};
use crate::types::{COLOR_OFF, Color, LedSelector};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

/// LEDs 0 and 2.
const EVEN_PAIR: LedSelector = LedSelector(0b0101);

/// LEDs 1 and 3.
const ODD_PAIR: LedSelector = LedSelector(0b1010);

/// Trait for abstracting a touch pad.
pub trait TouchSensor {
    /// Current level: true while something is touching the pad.
    fn is_touched(&mut self) -> bool;
}

/// [`TouchSensor`] over a digital input that reads high while touched.
pub struct PinSensor<P: InputPin> {
    pin: P,
}

impl<P: InputPin> PinSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Consumes the sensor, handing back the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> TouchSensor for PinSensor<P> {
    fn is_touched(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                error!("touch: pin read failed, treating as released");
                false
            }
        }
    }
}

/// Overlay state. Reset at boot, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSession {
    /// Color the next blink cycle uses.
    pub current_color: Color,

    /// Position in the blink cycle.
    pub tick_counter: u32,
}

impl TouchSession {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            current_color: config.default_color,
            tick_counter: 0,
        }
    }
}

/// What the blink cycle does on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverlayPhase {
    /// Clear, then light LEDs 0 and 2.
    LightEven,
    /// Add LEDs 1 and 3.
    LightOdd,
    /// Turn LEDs 0 and 2 off again.
    DimEven,
    /// Dark tail of the cycle; also restores the default color.
    Blank,
    /// Nothing changes.
    Hold,
}

impl OverlayPhase {
    /// Phase for an already-advanced tick counter. Checks are evaluated in
    /// order and the first match wins.
    pub fn at(tick: u32, config: &OverlayConfig) -> Self {
        let lit = config.lit_length();
        // lit can be close to u32::MAX
        let two_thirds = (u64::from(lit) * 2 / 3) as u32;

        if tick == 1 {
            OverlayPhase::LightEven
        } else if tick == lit / 3 {
            OverlayPhase::LightOdd
        } else if tick == two_thirds {
            OverlayPhase::DimEven
        } else if tick > lit {
            OverlayPhase::Blank
        } else {
            OverlayPhase::Hold
        }
    }
}

/// Drives the overlay's strip and keyboard.
///
/// # Type Parameters
/// * `S` - Pixel strip implementation type
/// * `K` - Keyboard implementation type
pub struct TouchOverlay<S: PixelStrip, K: Keyboard> {
    renderer: LedRenderer<S>,
    keyboard: K,
    config: OverlayConfig,
}

impl<S: PixelStrip, K: Keyboard> TouchOverlay<S, K> {
    pub fn new(strip: S, keyboard: K, config: OverlayConfig) -> Self {
        Self {
            renderer: LedRenderer::new(strip),
            keyboard,
            config,
        }
    }

    /// Handles one pad.
    ///
    /// If the pad is touched, the strip shows the binding's active color
    /// until the pad is released. This blocks the caller's loop. On release
    /// the binding's keys are sent, its post-touch color becomes the blink
    /// color and the cycle restarts.
    ///
    /// Returns true if a touch was handled.
    pub fn on_touch<T, D>(
        &mut self,
        session: &mut TouchSession,
        sensor: &mut T,
        binding: &TouchBinding,
        delay: &mut D,
    ) -> bool
    where
        T: TouchSensor,
        D: DelayNs,
    {
        if !sensor.is_touched() {
            return false;
        }

        session.current_color = binding.active_color;
        self.renderer.fill_all(session.current_color);
        self.renderer.show();

        let warn_after = self.config.release_warn_polls();
        let mut polls: u32 = 0;
        while sensor.is_touched() {
            delay.delay_ms(self.config.release_poll_ms);
            polls = polls.saturating_add(1);
            if polls == warn_after {
                warn!(
                    "touch {}: still held after {} ms",
                    binding.name, self.config.release_warn_ms
                );
            }
        }

        self.keyboard.send(binding.keys);
        session.current_color = binding.post_color;
        session.tick_counter = 0;
        info!("touch {} event", binding.name);
        true
    }

    /// Advances the blink cycle by one tick.
    pub fn on_tick(&mut self, session: &mut TouchSession) -> OverlayPhase {
        session.tick_counter = session.tick_counter.saturating_add(1) % self.config.cycle_length();

        let phase = OverlayPhase::at(session.tick_counter, &self.config);
        match phase {
            OverlayPhase::LightEven => {
                self.renderer.fill_all(COLOR_OFF);
                self.renderer.set_selected(EVEN_PAIR, session.current_color);
                self.renderer.show();
            }
            OverlayPhase::LightOdd => {
                self.renderer.set_selected(ODD_PAIR, session.current_color);
                self.renderer.show();
            }
            OverlayPhase::DimEven => {
                self.renderer.set_selected(EVEN_PAIR, COLOR_OFF);
                self.renderer.show();
            }
            OverlayPhase::Blank => {
                // repeats every tick of the tail, which keeps the strip dark
                self.renderer.clear();
                session.current_color = self.config.default_color;
            }
            OverlayPhase::Hold => {}
        }
        phase
    }

    /// The active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Returns the strip being driven.
    pub fn strip(&self) -> &S {
        self.renderer.strip()
    }

    /// Returns the keyboard.
    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }
}
