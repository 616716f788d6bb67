//! Static configuration for the two front ends.
//!
//! Values are fixed at startup. Capacities (pixels, steps, line length) are
//! const generics on the controllers; everything else lives here.

use crate::hid::KeyCode;
use crate::types::Color;
use palette::Srgb;

/// Pixels driven by the serial front end. Selectors address at most eight.
pub const DEFAULT_PIXEL_COUNT: usize = 8;

/// Longest accepted serial line, terminator excluded.
pub const DEFAULT_LINE_CAPACITY: usize = 256;

/// Steps held by the serial front end. Enough for a full line of segments.
pub const DEFAULT_STEP_CAPACITY: usize = 32;

/// Pixels used by the touch overlay animation.
pub const TOUCH_PIXEL_COUNT: usize = 4;

/// Blink cycle when the overlay runs on its own.
pub const STANDALONE_CYCLE_TICKS: u32 = 600;

/// Blink cycle when a host drives each overlay iteration.
pub const TETHERED_CYCLE_TICKS: u32 = 99;

/// Errors from validating a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The overlay cycle must be at least one tick long.
    ZeroCycleLength,

    /// The blank window divisor must be non-zero.
    ZeroBlankDivisor,

    /// Each serial tick must credit some time.
    ZeroTickWeight,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroCycleLength => write!(f, "cycle length must be non-zero"),
            ConfigError::ZeroBlankDivisor => write!(f, "blank divisor must be non-zero"),
            ConfigError::ZeroTickWeight => write!(f, "tick weight must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Startup log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogLevel {
    /// Events and errors only.
    #[default]
    Info,
    /// Also every parsed segment and render.
    Debug,
}

impl LogLevel {
    /// Applies this level to the `log` facade.
    pub fn apply(self) {
        #[cfg(feature = "log")]
        log::set_max_level(match self {
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
        });
    }
}

/// Serial front end settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Sleep per loop iteration.
    pub tick_interval_ms: u32,

    /// Time credited to the active step per iteration. Larger than the sleep
    /// because it also covers time spent polling the port and rendering.
    pub tick_weight_ms: u32,

    /// Echo received bytes back to the host.
    pub echo: bool,

    /// Verbosity applied at startup.
    pub log_level: LogLevel,
}

impl SerialConfig {
    /// Validates a custom timing.
    pub fn new(tick_interval_ms: u32, tick_weight_ms: u32) -> Result<Self, ConfigError> {
        if tick_weight_ms == 0 {
            return Err(ConfigError::ZeroTickWeight);
        }
        Ok(Self {
            tick_interval_ms,
            tick_weight_ms,
            ..Self::default()
        })
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            tick_weight_ms: 50,
            echo: true,
            log_level: LogLevel::Info,
        }
    }
}

/// What one touch pad does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchBinding {
    /// Name used in logs.
    pub name: &'static str,

    /// Shown on every LED while the pad is held.
    pub active_color: Color,

    /// Blinked for the next cycle once the pad is released.
    pub post_color: Color,

    /// Keys pressed together on release.
    pub keys: &'static [KeyCode],
}

impl TouchBinding {
    /// GUI + L: lock the workstation. Red feedback.
    pub const LOCK: TouchBinding = TouchBinding {
        name: "lock",
        active_color: Srgb::new(2, 0, 0),
        post_color: Srgb::new(20, 0, 0),
        keys: &[KeyCode::LEFT_GUI, KeyCode::L],
    };

    /// Ctrl + Alt + Delete. Yellow feedback.
    pub const ATTENTION: TouchBinding = TouchBinding {
        name: "attention",
        active_color: Srgb::new(2, 2, 0),
        post_color: Srgb::new(20, 20, 0),
        keys: &[KeyCode::LEFT_CTRL, KeyCode::LEFT_ALT, KeyCode::DELETE],
    };
}

/// Touch overlay settings.
///
/// The cycle shape is only settable through [`new`](Self::new) and
/// [`with_cycle`](Self::with_cycle), so a config always has a non-zero cycle
/// length and blank divisor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    cycle_length: u32,
    blank_divisor: u32,

    /// Blink color when no pad has been touched this cycle.
    pub default_color: Color,

    /// Sleep per loop iteration. Zero when the host paces the loop.
    pub tick_interval_ms: u32,

    /// Sensor polling interval while waiting for a release.
    pub release_poll_ms: u32,

    /// A pad held longer than this is reported once. The wait continues.
    pub release_warn_ms: u32,

    /// First pad.
    pub touch_a: TouchBinding,

    /// Second pad.
    pub touch_b: TouchBinding,
}

impl OverlayConfig {
    /// Validates a custom cycle on top of the standalone preset.
    pub fn new(cycle_length: u32, blank_divisor: u32) -> Result<Self, ConfigError> {
        Self::standalone().with_cycle(cycle_length, blank_divisor)
    }

    /// Replaces the cycle shape, keeping every other setting.
    pub fn with_cycle(self, cycle_length: u32, blank_divisor: u32) -> Result<Self, ConfigError> {
        if cycle_length == 0 {
            return Err(ConfigError::ZeroCycleLength);
        }
        if blank_divisor == 0 {
            return Err(ConfigError::ZeroBlankDivisor);
        }
        Ok(Self {
            cycle_length,
            blank_divisor,
            ..self
        })
    }

    /// Device runs the loop itself with a 2 ms sleep.
    pub const fn standalone() -> Self {
        Self {
            cycle_length: STANDALONE_CYCLE_TICKS,
            blank_divisor: 3,
            default_color: Srgb::new(1, 1, 1),
            tick_interval_ms: 2,
            release_poll_ms: 100,
            release_warn_ms: 10_000,
            touch_a: TouchBinding::LOCK,
            touch_b: TouchBinding::ATTENTION,
        }
    }

    /// A host drives each iteration remotely, which is far slower, so the
    /// cycle is shorter and there is no sleep.
    pub const fn tethered() -> Self {
        Self {
            cycle_length: TETHERED_CYCLE_TICKS,
            tick_interval_ms: 0,
            ..Self::standalone()
        }
    }

    /// Ticks per blink cycle.
    #[inline]
    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// The last `cycle_length / blank_divisor` ticks of a cycle are dark.
    #[inline]
    pub fn blank_divisor(&self) -> u32 {
        self.blank_divisor
    }

    /// Release polls after which a held pad is reported. Never zero, so the
    /// report fires even when the warning time is below one poll.
    #[inline]
    pub fn release_warn_polls(&self) -> u32 {
        (self.release_warn_ms / self.release_poll_ms.max(1)).max(1)
    }

    /// Ticks at the end of each cycle during which the strip stays dark.
    #[inline]
    pub fn blank_length(&self) -> u32 {
        self.cycle_length / self.blank_divisor
    }

    /// Ticks of each cycle during which the strip may be lit.
    #[inline]
    pub fn lit_length(&self) -> u32 {
        self.cycle_length - self.blank_length()
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::standalone()
    }
}
