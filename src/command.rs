//! Parsing of the serial line protocol.
//!
//! ```text
//! #LLRRGGBB[-DDDD]{#LLRRGGBB[-DDDD]}*
//! ```
//!
//! `#` both starts a pattern line and separates its segments. `LL` is a
//! [`LedSelector`], `RRGGBB` the color and `DDDD` an optional hold time in
//! milliseconds. Single-character lines `?`, `B` and `G` are control commands.

use crate::sequence::PatternSequence;
use crate::types::{ColorStep, LedSelector, ParseError};
use palette::Srgb;

/// Leading character of a pattern line, and the separator between segments.
pub const COMMAND_MARKER: char = '#';

/// Separates a segment's color field from its hold time.
pub const DURATION_SEPARATOR: char = '-';

/// Hex digits in a segment's color field: selector plus three channels.
const COLOR_FIELD_LEN: usize = 8;

/// A decoded input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a, const N: usize> {
    /// Replace the running sequence.
    Pattern(PatternSequence<N>),
    /// `?`: print usage.
    Help,
    /// `B`: back to the blank sequence.
    Blank,
    /// `G`: report the active step.
    Status,
    /// Nothing but a line terminator.
    Empty,
    /// Anything else.
    Unrecognized(&'a str),
}

impl<'a, const N: usize> Command<'a, N> {
    /// Decodes one line. Trailing `\r`/`\n` are ignored.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.starts_with(COMMAND_MARKER) {
            return Command::Pattern(parse_pattern(line));
        }

        match line {
            "" => Command::Empty,
            "?" => Command::Help,
            "B" => Command::Blank,
            "G" => Command::Status,
            other => Command::Unrecognized(other),
        }
    }
}

/// Builds a sequence from a pattern line.
///
/// Every non-empty segment occupies one position. Segments that fail to parse
/// are replaced by [`ColorStep::DEFAULT`], so a line with `n` segments always
/// yields `n` steps (up to capacity `N`). A line with no segments at all gives
/// the blank sequence.
pub fn parse_pattern<const N: usize>(line: &str) -> PatternSequence<N> {
    debug!("processing: {}", line);

    let mut builder = PatternSequence::<N>::builder();
    for segment in line.split(COMMAND_MARKER).filter(|s| !s.is_empty()) {
        let step = parse_segment(segment).unwrap_or_else(|err| {
            error!("{}: '{}', using default step", err, segment);
            ColorStep::DEFAULT
        });

        if builder.push(step).is_err() {
            warn!("pattern: more than {} segments, dropping the rest", N);
            break;
        }
    }

    builder.build().unwrap_or_else(|_| {
        warn!("pattern: no segments in '{}', blanking", line);
        PatternSequence::blank()
    })
}

/// Parses one `LLRRGGBB[-DDDD]` segment (without the leading marker).
///
/// A bad hold time does not reject the segment: it is logged and the step
/// falls back to the default hold.
///
/// # Errors
/// * `InvalidSelector` - The first two characters are missing or not hex
/// * `InvalidColor` - The color field is not exactly eight hex digits
pub fn parse_segment(segment: &str) -> Result<ColorStep, ParseError> {
    let (color_field, duration_field) = match segment.split_once(DURATION_SEPARATOR) {
        Some((color, duration)) => (color, Some(duration)),
        None => (segment, None),
    };

    let field = color_field.as_bytes();
    let selector = field
        .get(0..2)
        .and_then(hex_byte)
        .ok_or(ParseError::InvalidSelector)?;

    if field.len() != COLOR_FIELD_LEN {
        return Err(ParseError::InvalidColor);
    }
    let channel = |at: usize| hex_byte(&field[at..at + 2]).ok_or(ParseError::InvalidColor);
    let color = Srgb::new(channel(2)?, channel(4)?, channel(6)?);

    let hold_ms = match duration_field {
        Some(text) => parse_duration(text).unwrap_or_else(|err| {
            error!("{}: '{}', using default", err, text);
            0
        }),
        None => 0,
    };

    let step = ColorStep::new(LedSelector(selector), color, hold_ms);
    trace!("segment '{}' -> {}", segment, step);
    Ok(step)
}

/// Parses a hold time in decimal milliseconds.
///
/// # Errors
/// * `InvalidDuration` - Not a non-negative integer that fits in `u32`
pub fn parse_duration(text: &str) -> Result<u32, ParseError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidDuration)
}

/// Two ASCII hex digits to a byte. Signs and whitespace are rejected.
fn hex_byte(digits: &[u8]) -> Option<u8> {
    match digits {
        [hi, lo] => {
            let hi = char::from(*hi).to_digit(16)?;
            let lo = char::from(*lo).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        }
        _ => None,
    }
}
