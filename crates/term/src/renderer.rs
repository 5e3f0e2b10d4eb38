//! TerminalRenderer: presents framebuffers on a real terminal.
//!
//! Frames are encoded into a byte buffer with crossterm commands and written
//! in one go. After the first frame only runs of changed cells are sent.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Horizontal run of changed cells on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    out: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            out: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.out.clear();
        self.out.queue(terminal::EnterAlternateScreen)?;
        self.out.queue(cursor::Hide)?;
        self.out.queue(terminal::DisableLineWrap)?;
        self.write_out()
    }

    /// Undo [`TerminalRenderer::enter`].
    pub fn exit(&mut self) -> Result<()> {
        self.out.clear();
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.queue(terminal::LeaveAlternateScreen)?;
        self.write_out()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Make the next present a full redraw (after a resize).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Present `fb` and swap it with the previously shown frame.
    ///
    /// On return `fb` holds the old frame and can be drawn into again.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.out.clear();
        match self.shown.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_changes(&prev, fb, &mut self.out)?;
                self.shown = Some(prev);
            }
            _ => {
                encode_full(fb, &mut self.out)?;
                self.shown = Some(FrameBuffer::new(fb.width(), fb.height()));
            }
        }
        self.write_out()?;
        if let Some(shown) = self.shown.as_mut() {
            std::mem::swap(shown, fb);
        }
        Ok(())
    }

    fn write_out(&mut self) -> Result<()> {
        self.stdout.write_all(&self.out)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a complete redraw of `fb` into `out`.
pub fn encode_full(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            pen.apply(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the cells of `next` that differ from `prev`.
pub fn encode_changes(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for run in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            let cell = next.get(x, run.y).unwrap_or_default();
            pen.apply(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Runs of differing cells, row by row. Frames of different size differ everywhere.
pub fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = Run> + 'a {
    let same_size = prev.width() == next.width() && prev.height() == next.height();
    let w = next.width();
    (0..next.height()).flat_map(move |y| {
        let mut x = 0u16;
        std::iter::from_fn(move || {
            if !same_size {
                if x == 0 && w > 0 {
                    x = w;
                    return Some(Run { x: 0, y, len: w });
                }
                return None;
            }
            while x < w && prev.get(x, y) == next.get(x, y) {
                x += 1;
            }
            if x >= w {
                return None;
            }
            let start = x;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            Some(Run {
                x: start,
                y,
                len: x - start,
            })
        })
    })
}

/// Tracks the terminal's current style to skip redundant escape codes.
#[derive(Default)]
struct Pen(Option<CellStyle>);

impl Pen {
    fn apply(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        if self.0 == Some(style) {
            return Ok(());
        }
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(color(style.fg)))?;
        out.queue(SetBackgroundColor(color(style.bg)))?;
        if style.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.0 = Some(style);
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
