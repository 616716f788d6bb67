//! Mapping color steps onto a pixel strip.
//!
//! [`PixelStrip`] is the hardware seam: implement it for your LED driver, or
//! wrap any `smart_leds` driver in a [`BufferedStrip`].

use crate::types::{COLOR_OFF, Color, ColorStep, LedSelector};
use smart_leds::{RGB8, SmartLedsWrite};

/// Trait for abstracting an addressable LED strip.
///
/// `fill` and `set_pixel` only change the pixel buffer; nothing reaches the
/// LEDs until `show` is called. Handle any hardware errors internally - these
/// methods cannot fail.
pub trait PixelStrip {
    /// Number of physical pixels on the strip.
    fn pixel_count(&self) -> usize;

    /// Sets every pixel in the buffer to `color`.
    fn fill(&mut self, color: Color);

    /// Sets one pixel. `index` is always below [`pixel_count`](Self::pixel_count).
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Pushes the buffer out to the LEDs.
    fn show(&mut self);
}

/// Renders [`ColorStep`]s onto a [`PixelStrip`].
pub struct LedRenderer<S: PixelStrip> {
    strip: S,
}

impl<S: PixelStrip> LedRenderer<S> {
    pub fn new(strip: S) -> Self {
        Self { strip }
    }

    /// Paints a step and flushes.
    ///
    /// The broadcast selector takes a single fill. Any other selector sets each
    /// selected pixel individually, then flushes once.
    pub fn render(&mut self, step: &ColorStep) {
        debug!(
            "render: selector {} color ({}, {}, {}) hold {}",
            step.selector.0,
            step.color.red,
            step.color.green,
            step.color.blue,
            step.hold_duration_ms
        );

        if step.selector.is_broadcast() {
            self.fill_all(step.color);
        } else {
            self.set_selected(step.selector, step.color);
        }
        self.strip.show();
    }

    /// Sets every pixel without flushing.
    #[inline]
    pub fn fill_all(&mut self, color: Color) {
        self.strip.fill(color);
    }

    /// Sets the pixels picked by `selector` without flushing.
    ///
    /// Bits past the end of the strip are skipped.
    pub fn set_selected(&mut self, selector: LedSelector, color: Color) {
        let count = self.strip.pixel_count();
        for index in selector.indices() {
            if index < count {
                self.strip.set_pixel(index, color);
            } else {
                warn!("render: led {} is past the end of a {} pixel strip", index, count);
            }
        }
    }

    /// Flushes the pixel buffer.
    #[inline]
    pub fn show(&mut self) {
        self.strip.show();
    }

    /// Fills the strip with black and flushes.
    pub fn clear(&mut self) {
        self.strip.fill(COLOR_OFF);
        self.strip.show();
    }

    /// Returns the underlying strip.
    pub fn strip(&self) -> &S {
        &self.strip
    }
}

/// Frame-buffered adapter for `smart_leds` drivers.
///
/// Keeps a copy of all `P` pixels and writes the whole frame on every
/// [`show`](PixelStrip::show), which is what one-wire drivers such as WS2812
/// expect.
pub struct BufferedStrip<W, const P: usize> {
    driver: W,
    frame: [RGB8; P],
}

impl<W, const P: usize> BufferedStrip<W, P>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    /// Wraps a driver with an all-off frame. Nothing is written until `show`.
    pub fn new(driver: W) -> Self {
        Self {
            driver,
            frame: [RGB8::default(); P],
        }
    }

    /// The buffered frame.
    pub fn frame(&self) -> &[RGB8; P] {
        &self.frame
    }

    /// Returns the wrapped driver.
    pub fn driver(&self) -> &W {
        &self.driver
    }
}

#[inline]
fn to_rgb8(color: Color) -> RGB8 {
    RGB8::new(color.red, color.green, color.blue)
}

impl<W, const P: usize> PixelStrip for BufferedStrip<W, P>
where
    W: SmartLedsWrite,
    W::Color: From<RGB8>,
{
    fn pixel_count(&self) -> usize {
        P
    }

    fn fill(&mut self, color: Color) {
        self.frame = [to_rgb8(color); P];
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.frame.get_mut(index) {
            *pixel = to_rgb8(color);
        }
    }

    fn show(&mut self) {
        if self.driver.write(self.frame.iter().copied()).is_err() {
            error!("strip: driver write failed");
        }
    }
}
