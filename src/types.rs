//! Core types shared by the parser, sequencer and renderer.

use core::fmt::Write as _;

use heapless::String;
use palette::Srgb;

/// An 8-bit per channel RGB color as sent on the wire.
pub type Color = Srgb<u8>;

/// All channels off.
pub const COLOR_OFF: Color = Srgb::new(0, 0, 0);

/// Hold time used when a step asks for zero milliseconds or gives none.
pub const DEFAULT_HOLD_MS: u32 = 1000;

/// Longest segment produced by [`ColorStep::to_segment`]: `LLRRGGBB-4294967295`.
pub const MAX_SEGMENT_LEN: usize = 19;

/// LED-targeting byte of a step.
///
/// `0xFF` addresses every LED on the strip. Any other value is a bitmask where
/// bit `i` selects LED index `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedSelector(pub u8);

impl LedSelector {
    /// Broadcast selector.
    pub const ALL: LedSelector = LedSelector(0xFF);

    /// Selects no LED at all.
    pub const NONE: LedSelector = LedSelector(0x00);

    /// Returns true for the broadcast value.
    #[inline]
    pub fn is_broadcast(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Iterates the selected LED indices, lowest bit first.
    ///
    /// The broadcast value is not special-cased here; it yields 0..8.
    #[inline]
    pub fn indices(self) -> SelectedLeds {
        SelectedLeds { remaining: self.0 }
    }
}

impl From<u8> for LedSelector {
    fn from(bits: u8) -> Self {
        LedSelector(bits)
    }
}

/// Bit-scan iterator over a [`LedSelector`].
#[derive(Debug, Clone)]
pub struct SelectedLeds {
    remaining: u8,
}

impl Iterator for SelectedLeds {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.remaining.trailing_zeros() as usize;
        // clear lowest set bit
        self.remaining &= self.remaining - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.remaining.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for SelectedLeds {}

/// One entry of an animation sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStep {
    /// Which LEDs this step paints.
    pub selector: LedSelector,

    /// Target color.
    pub color: Color,

    /// How long the step is held before the sequence advances.
    pub hold_duration_ms: u32,

    /// Time accumulated on this step so far.
    pub elapsed_ms: u32,
}

impl ColorStep {
    /// All LEDs off for one second. Substituted for every rejected segment.
    pub const DEFAULT: ColorStep = ColorStep::new(LedSelector::ALL, COLOR_OFF, DEFAULT_HOLD_MS);

    /// Creates a step with a fresh timer. A zero hold is normalized to
    /// [`DEFAULT_HOLD_MS`].
    pub const fn new(selector: LedSelector, color: Color, hold_duration_ms: u32) -> Self {
        let hold_duration_ms = if hold_duration_ms == 0 {
            DEFAULT_HOLD_MS
        } else {
            hold_duration_ms
        };

        Self {
            selector,
            color,
            hold_duration_ms,
            elapsed_ms: 0,
        }
    }

    /// True once the step has been held strictly longer than its duration.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.elapsed_ms > self.hold_duration_ms
    }

    /// Encodes the step back into its wire form, without the leading marker.
    pub fn to_segment(&self) -> String<MAX_SEGMENT_LEN> {
        let mut out = String::new();
        // capacity covers the widest u32, so this cannot fail
        let _ = write!(
            out,
            "{:02x}{:02x}{:02x}{:02x}-{}",
            self.selector.0, self.color.red, self.color.green, self.color.blue, self.hold_duration_ms
        );
        out
    }
}

impl Default for ColorStep {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Status line format: `(selector,(r, g, b),hold,elapsed)`.
impl core::fmt::Display for ColorStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "({},({}, {}, {}),{},{})",
            self.selector.0,
            self.color.red,
            self.color.green,
            self.color.blue,
            self.hold_duration_ms,
            self.elapsed_ms
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorStep {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "({},({}, {}, {}),{},{})",
            self.selector.0,
            self.color.red,
            self.color.green,
            self.color.blue,
            self.hold_duration_ms,
            self.elapsed_ms
        )
    }
}

/// Why a single command segment could not become a [`ColorStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The two selector characters are missing or not hex.
    InvalidSelector,

    /// The color field is not exactly eight hex digits.
    InvalidColor,

    /// The hold time after `-` is not a non-negative decimal integer.
    ///
    /// Recovered by the parser; it never drops a step.
    InvalidDuration,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::InvalidSelector => write!(f, "invalid led selector"),
            ParseError::InvalidColor => write!(f, "invalid color"),
            ParseError::InvalidDuration => write!(f, "invalid hold time"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Sequence construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// No steps provided.
    EmptySequence,

    /// Sequence capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceError::EmptySequence => {
                write!(f, "sequence must have at least one step")
            }
            SequenceError::CapacityExceeded => {
                write!(f, "sequence capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}
