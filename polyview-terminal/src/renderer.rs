/// Blits a rendered color buffer to the terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use polyview_core::{ColorBuffer, Rgb, Viewport};
use std::io::{self, Write};

/// Character luminosity ramp for the ASCII mode (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// How buffer pixels map onto terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitMode {
    /// Two truecolor pixels per cell
    HalfBlock,
    /// One pixel per cell, drawn as a luminosity character
    Ascii,
}

impl BlitMode {
    pub fn toggled(self) -> Self {
        match self {
            BlitMode::HalfBlock => BlitMode::Ascii,
            BlitMode::Ascii => BlitMode::HalfBlock,
        }
    }

    /// Pixel viewport for a terminal of `cols` x `rows` cells
    pub fn viewport(self, cols: u16, rows: u16) -> Viewport {
        match self {
            BlitMode::HalfBlock => Viewport::new(cols as u32, rows as u32 * 2),
            BlitMode::Ascii => Viewport::new(cols as u32, rows as u32),
        }
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Pick a ramp character from perceived brightness
pub fn luminosity_char(c: Rgb) -> char {
    let luma = (0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32) / 255.0;
    let index = (luma * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Terminal renderer that writes color buffers as styled characters
pub struct TerminalRenderer {
    mode: BlitMode,
}

impl TerminalRenderer {
    pub fn new(mode: BlitMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BlitMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn draw<W: Write>(&self, buffer: &ColorBuffer, writer: &mut W) -> io::Result<()> {
        match self.mode {
            BlitMode::HalfBlock => draw_half_blocks(buffer, writer)?,
            BlitMode::Ascii => draw_ascii(buffer, writer)?,
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn draw_half_blocks<W: Write>(buffer: &ColorBuffer, writer: &mut W) -> io::Result<()> {
    let rows = buffer.height() / 2;
    for row in 0..rows {
        writer.queue(cursor::MoveTo(0, row as u16))?;
        let mut last: Option<(Rgb, Rgb)> = None;
        for x in 0..buffer.width() {
            let top = buffer.get(x, row * 2).unwrap_or_default();
            let bottom = buffer.get(x, row * 2 + 1).unwrap_or_default();
            if last != Some((top, bottom)) {
                writer.queue(SetForegroundColor(term_color(top)))?;
                writer.queue(SetBackgroundColor(term_color(bottom)))?;
                last = Some((top, bottom));
            }
            writer.queue(Print(HALF_BLOCK))?;
        }
    }
    Ok(())
}

fn draw_ascii<W: Write>(buffer: &ColorBuffer, writer: &mut W) -> io::Result<()> {
    for y in 0..buffer.height() {
        writer.queue(cursor::MoveTo(0, y as u16))?;
        let mut last = None;
        for x in 0..buffer.width() {
            let c = buffer.get(x, y).unwrap_or_default();
            if last != Some(c) {
                writer.queue(SetForegroundColor(term_color(c)))?;
                last = Some(c);
            }
            writer.queue(Print(luminosity_char(c)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminosity_ramp_ends() {
        assert_eq!(luminosity_char(Rgb::BLACK), ' ');
        assert_eq!(luminosity_char(Rgb::WHITE), '@');
    }

    #[test]
    fn test_viewport_per_mode() {
        assert_eq!(BlitMode::HalfBlock.viewport(80, 24), Viewport::new(80, 48));
        assert_eq!(BlitMode::Ascii.viewport(80, 24), Viewport::new(80, 24));
        assert_eq!(BlitMode::Ascii.toggled(), BlitMode::HalfBlock);
    }

    #[test]
    fn test_half_block_output() {
        let mut buffer = ColorBuffer::new(Viewport::new(3, 2), Rgb::BLACK);
        buffer.set(1, 0, Rgb::WHITE);

        let mut out = Vec::new();
        TerminalRenderer::new(BlitMode::HalfBlock)
            .draw(&buffer, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 3);
        assert!(text.contains("255;255;255"));
    }

    #[test]
    fn test_ascii_output() {
        let mut buffer = ColorBuffer::new(Viewport::new(2, 1), Rgb::BLACK);
        buffer.set(0, 0, Rgb::WHITE);

        let mut out = Vec::new();
        TerminalRenderer::new(BlitMode::Ascii).draw(&buffer, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('@'));
    }
}
