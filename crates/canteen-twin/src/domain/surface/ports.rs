//! Driver Ports
//!
//! The pixel-level display driver and the indicator driver are external
//! collaborators. The surface talks to them only through these traits, and
//! only while holding its lock.

use crate::domain::pool::IndicatorLevel;

/// Panel width in pixels.
pub const PANEL_WIDTH: u8 = 128;

/// Panel height in pixels.
pub const PANEL_HEIGHT: u8 = 64;

/// Width of one glyph of the panel font.
pub const GLYPH_WIDTH: u8 = 8;

/// Text display sink.
pub trait DisplayDriver: Send {
    /// Blank the back buffer.
    fn clear(&mut self);

    /// Draw the border rectangle.
    fn draw_frame(&mut self);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: u8, y: u8);

    /// Push the back buffer to the panel.
    fn commit(&mut self);

    /// Panel width, used for centering.
    fn width(&self) -> u8 {
        PANEL_WIDTH
    }
}

/// Status indicator sink.
pub trait IndicatorDriver: Send {
    /// Show `level`.
    fn set_level(&mut self, level: IndicatorLevel);
}

impl<T: DisplayDriver + ?Sized> DisplayDriver for Box<T> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_frame(&mut self) {
        (**self).draw_frame();
    }

    fn draw_text(&mut self, text: &str, x: u8, y: u8) {
        (**self).draw_text(text, x, y);
    }

    fn commit(&mut self) {
        (**self).commit();
    }

    fn width(&self) -> u8 {
        (**self).width()
    }
}

impl<T: IndicatorDriver + ?Sized> IndicatorDriver for Box<T> {
    fn set_level(&mut self, level: IndicatorLevel) {
        (**self).set_level(level);
    }
}
