#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ColorStep`**: One selector + color + hold time entry of a pattern
//! - **`LedSelector`**: `0xFF` for every LED, otherwise a bitmask of LED indices
//! - **`PatternSequence`**: A non-empty, looping list of steps
//! - **`Command`**: A decoded serial line (`#...` pattern, `?`, `B`, `G`)
//! - **`PatternSequencer`**: Plays a sequence onto a strip, tick by tick
//! - **`PixelStrip`**: Trait to implement for your LED strip driver
//! - **`TouchOverlay`**: Touch pads with keystrokes and a blink cycle
//! - **`SerialController`** / **`TouchController`**: The two scheduling loops
//!
//! Colors are `Srgb<u8>`, exactly as they arrive on the wire.

// must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod types;
pub mod sequence;
pub mod command;
pub mod renderer;
pub mod sequencer;
pub mod line;
pub mod hid;
pub mod overlay;
pub mod config;
pub mod controller;

pub use palette::Srgb;

pub use command::{Command, parse_pattern, parse_segment};
pub use config::{ConfigError, LogLevel, OverlayConfig, SerialConfig, TouchBinding};
pub use controller::{SerialController, TouchController};
pub use hid::{HidKeyboard, KeyCode, Keyboard, ReportSink};
pub use line::{LineError, LineReader};
pub use overlay::{OverlayPhase, PinSensor, TouchOverlay, TouchSensor, TouchSession};
pub use renderer::{BufferedStrip, LedRenderer, PixelStrip};
pub use sequence::{PatternSequence, SequenceBuilder};
pub use sequencer::{PatternSequencer, USAGE};
pub use types::{COLOR_OFF, Color, ColorStep, DEFAULT_HOLD_MS, LedSelector, ParseError, SequenceError};
