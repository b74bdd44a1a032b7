//! Terminal Output Drivers
//!
//! Host stand-ins for the OLED panel and the RGB LED. The display keeps a
//! back buffer of positioned text and prints it as a boxed block on
//! `commit`; the indicator prints a coloured status line.
//!
//! Write errors are logged and swallowed: a broken terminal must not take a
//! role down with it.

use crate::domain::pool::IndicatorLevel;
use crate::domain::surface::{DisplayDriver, IndicatorDriver, GLYPH_WIDTH, PANEL_WIDTH};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use tracing::warn;

/// LED colour for each indicator level.
pub const fn led_color(level: IndicatorLevel) -> Color {
    match level {
        IndicatorLevel::Full => Color::Blue,
        IndicatorLevel::Empty => Color::Red,
        IndicatorLevel::Low => Color::Yellow,
        IndicatorLevel::Normal => Color::Green,
    }
}

/// Text panel rendered as a box of characters.
#[derive(Debug)]
pub struct TerminalDisplay<W> {
    out: W,
    staged: Vec<(u8, u8, String)>,
    framed: bool,
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Render to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            staged: Vec::new(),
            framed: false,
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self) -> io::Result<()> {
        let columns = usize::from(PANEL_WIDTH / GLYPH_WIDTH);
        let mut rows = std::mem::take(&mut self.staged);
        rows.sort_by_key(|(x, y, _)| (*y, *x));

        let (left, right, rule) = if self.framed {
            ("│", "│", "─".repeat(columns))
        } else {
            (" ", " ", " ".repeat(columns))
        };

        writeln!(self.out, "{}{rule}{}", corner(self.framed, '┌'), corner(self.framed, '┐'))?;
        for (x, _, text) in &rows {
            let indent = usize::from(*x / GLYPH_WIDTH);
            let line: String = format!("{:indent$}{text}", "").chars().take(columns).collect();
            writeln!(self.out, "{left}{line:<columns$}{right}")?;
        }
        writeln!(self.out, "{}{rule}{}", corner(self.framed, '└'), corner(self.framed, '┘'))?;
        self.out.flush()
    }
}

const fn corner(framed: bool, glyph: char) -> char {
    if framed {
        glyph
    } else {
        ' '
    }
}

impl<W: Write + Send> DisplayDriver for TerminalDisplay<W> {
    fn clear(&mut self) {
        self.staged.clear();
        self.framed = false;
    }

    fn draw_frame(&mut self) {
        self.framed = true;
    }

    fn draw_text(&mut self, text: &str, x: u8, y: u8) {
        self.staged.push((x, y, text.to_owned()));
    }

    fn commit(&mut self) {
        if let Err(err) = self.render() {
            warn!(%err, "terminal display write failed");
        }
    }
}

/// Status LED rendered as a coloured line.
#[derive(Debug)]
pub struct TerminalIndicator<W> {
    out: W,
}

impl<W: Write + Send> TerminalIndicator<W> {
    /// Render to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn show(&mut self, level: IndicatorLevel) -> io::Result<()> {
        self.out
            .queue(SetForegroundColor(led_color(level)))?
            .queue(Print(format!("● {level}")))?
            .queue(ResetColor)?
            .queue(Print("\n"))?;
        self.out.flush()
    }
}

impl<W: Write + Send> IndicatorDriver for TerminalIndicator<W> {
    fn set_level(&mut self, level: IndicatorLevel) {
        if let Err(err) = self.show(level) {
            warn!(%err, "terminal indicator write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_boxed_frame() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.clear();
        display.draw_frame();
        display.draw_text("Used: 5", 5, 47);
        display.draw_text("Tokens", 40, 5);
        display.commit();

        let text = String::from_utf8(display.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('┌'));
        assert!(lines[1].contains("     Tokens"), "title is indented: {text}");
        assert!(lines[2].starts_with("│Used: 5"));
        assert!(lines[3].ends_with('┘'));
    }

    #[test]
    fn test_uncommitted_frame_is_not_printed() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.clear();
        display.draw_text("Total: 8", 5, 25);
        assert!(display.into_inner().is_empty());
    }

    #[test]
    fn test_indicator_prints_level() {
        let mut indicator = TerminalIndicator::new(Vec::new());
        indicator.set_level(IndicatorLevel::Low);
        let text = String::from_utf8(indicator.into_inner()).unwrap();
        assert!(text.contains("● low"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_led_palette() {
        assert_eq!(led_color(IndicatorLevel::Full), Color::Blue);
        assert_eq!(led_color(IndicatorLevel::Empty), Color::Red);
        assert_eq!(led_color(IndicatorLevel::Low), Color::Yellow);
        assert_eq!(led_color(IndicatorLevel::Normal), Color::Green);
    }
}
