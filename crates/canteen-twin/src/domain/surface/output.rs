//! Output Surface Engine

use super::ports::{DisplayDriver, IndicatorDriver, GLYPH_WIDTH};
use crate::domain::pool::{IndicatorLevel, PoolBackend, PoolSnapshot, TokenPool};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

const TITLE: &str = "Tokens";
const TITLE_Y: u8 = 5;
const TEXT_X: u8 = 5;
const TOTAL_Y: u8 = 25;
const AVAILABLE_Y: u8 = 36;
const USED_Y: u8 = 47;

/// What the last refresh put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFrame {
    /// Pool capacity
    pub total: u32,
    /// Available tokens at refresh time
    pub available: u32,
    /// Tokens in use at refresh time
    pub used: u32,
    /// Indicator category shown
    pub level: IndicatorLevel,
}

impl From<PoolSnapshot> for SurfaceFrame {
    fn from(snapshot: PoolSnapshot) -> Self {
        Self {
            total: snapshot.capacity,
            available: snapshot.available,
            used: snapshot.in_use(),
            level: snapshot.level(),
        }
    }
}

struct Drivers<D, I> {
    display: D,
    indicator: I,
    last: Option<SurfaceFrame>,
}

/// Display and indicator guarded by one exclusive lock.
pub struct OutputSurface<D, I> {
    drivers: Mutex<Drivers<D, I>>,
    refreshes: AtomicU64,
}

impl<D: DisplayDriver, I: IndicatorDriver> OutputSurface<D, I> {
    /// Take ownership of both drivers. Nothing is drawn yet.
    pub fn new(display: D, indicator: I) -> Self {
        Self {
            drivers: Mutex::new(Drivers {
                display,
                indicator,
                last: None,
            }),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Redraw everything from `snapshot`.
    pub fn refresh(&self, snapshot: PoolSnapshot) -> SurfaceFrame {
        let mut drivers = self.drivers.lock();
        self.render(&mut drivers, SurfaceFrame::from(snapshot))
    }

    /// Sample `pool` and redraw, both under the lock.
    ///
    /// Sampling inside the critical section means a frame can never be
    /// overwritten by an older one from a slower role.
    pub fn refresh_from<B: PoolBackend>(&self, pool: &TokenPool<B>) -> SurfaceFrame {
        let mut drivers = self.drivers.lock();
        let frame = SurfaceFrame::from(pool.snapshot());
        self.render(&mut drivers, frame)
    }

    fn render(&self, drivers: &mut Drivers<D, I>, frame: SurfaceFrame) -> SurfaceFrame {
        let display = &mut drivers.display;
        display.clear();
        display.draw_frame();
        let title_x = centered_x(display.width(), TITLE);
        display.draw_text(TITLE, title_x, TITLE_Y);
        display.draw_text(&format!("Total: {}", frame.total), TEXT_X, TOTAL_Y);
        display.draw_text(&format!("Available: {}", frame.available), TEXT_X, AVAILABLE_Y);
        display.draw_text(&format!("Used: {}", frame.used), TEXT_X, USED_Y);
        display.commit();

        drivers.indicator.set_level(frame.level);
        drivers.last = Some(frame);
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        frame
    }

    /// Frame from the most recent refresh.
    pub fn last_frame(&self) -> Option<SurfaceFrame> {
        self.drivers.lock().last
    }

    /// Number of completed refreshes.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Inspect the drivers under the lock.
    pub fn with_drivers<R>(&self, f: impl FnOnce(&D, &I) -> R) -> R {
        let drivers = self.drivers.lock();
        f(&drivers.display, &drivers.indicator)
    }
}

fn centered_x(width: u8, text: &str) -> u8 {
    let text_width = (text.len() as u32) * u32::from(GLYPH_WIDTH);
    (u32::from(width).saturating_sub(text_width) / 2) as u8
}
