//! USB-HID keystroke emission.
//!
//! [`Keyboard`] is the seam the touch overlay talks to. [`HidKeyboard`]
//! implements it on top of anything that can push a boot-protocol
//! [`KeyboardReport`], such as a `usbd_hid` HID class.

use usbd_hid::descriptor::KeyboardReport;

/// A USB HID keyboard usage id (usage page 0x07).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const L: KeyCode = KeyCode(0x0F);
    pub const DELETE: KeyCode = KeyCode(0x4C);
    pub const LEFT_CTRL: KeyCode = KeyCode(0xE0);
    pub const LEFT_SHIFT: KeyCode = KeyCode(0xE1);
    pub const LEFT_ALT: KeyCode = KeyCode(0xE2);
    /// The "Windows" key.
    pub const LEFT_GUI: KeyCode = KeyCode(0xE3);
    pub const RIGHT_CTRL: KeyCode = KeyCode(0xE4);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0xE5);
    pub const RIGHT_ALT: KeyCode = KeyCode(0xE6);
    pub const RIGHT_GUI: KeyCode = KeyCode(0xE7);

    /// Bit in the report's modifier byte, for the eight modifier usages.
    #[inline]
    pub fn modifier_bit(self) -> Option<u8> {
        match self.0 {
            0xE0..=0xE7 => Some(1 << (self.0 - 0xE0)),
            _ => None,
        }
    }
}

/// Trait for abstracting the keystroke transport.
pub trait Keyboard {
    /// Presses all `keys` together, then releases them.
    fn send(&mut self, keys: &[KeyCode]);
}

/// Builds the report for holding `keys` down.
///
/// Modifiers go into the modifier byte; up to six other keys fill the key
/// slots in order. Extra keys are dropped.
pub fn keyboard_report(keys: &[KeyCode]) -> KeyboardReport {
    let mut report = released_report();
    let mut slots = report.keycodes.iter_mut();

    for key in keys {
        match key.modifier_bit() {
            Some(bit) => report.modifier |= bit,
            None => match slots.next() {
                Some(slot) => *slot = key.0,
                None => warn!("hid: more than six keys, dropping {}", key.0),
            },
        }
    }

    report
}

/// A report with nothing held.
pub fn released_report() -> KeyboardReport {
    KeyboardReport {
        modifier: 0,
        reserved: 0,
        leds: 0,
        keycodes: [0; 6],
    }
}

/// Sink for keyboard input reports, typically a USB HID endpoint.
pub trait ReportSink {
    type Error: core::fmt::Debug;

    /// Queues one input report.
    fn push_report(&mut self, report: &KeyboardReport) -> Result<(), Self::Error>;
}

/// [`Keyboard`] implementation that emits a press report followed by a
/// release report.
pub struct HidKeyboard<R: ReportSink> {
    sink: R,
}

impl<R: ReportSink> HidKeyboard<R> {
    pub fn new(sink: R) -> Self {
        Self { sink }
    }

    /// Returns the underlying sink.
    pub fn sink(&self) -> &R {
        &self.sink
    }
}

impl<R: ReportSink> Keyboard for HidKeyboard<R> {
    fn send(&mut self, keys: &[KeyCode]) {
        if self.sink.push_report(&keyboard_report(keys)).is_err() {
            error!("hid: press report not sent");
        }
        // always release, even if the press was lost
        if self.sink.push_report(&released_report()).is_err() {
            error!("hid: release report not sent");
        }
    }
}
