//! Display surface: the only thing the render loop writes to.
//!
//! `TerminalSurface` drives a real terminal through crossterm.
//! `RecordingSurface` keeps every frame in memory so sessions can be
//! asserted on without a terminal.

use std::io::{self, Write};

use crossterm::cursor::{MoveTo, MoveToColumn, MoveToNextLine};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

/// Clear, position and write primitives used by the render loop.
pub trait DisplaySurface {
    /// Erase everything and put the cursor at the top-left corner.
    fn clear(&mut self) -> io::Result<()>;

    /// Current size as (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Move the cursor to `column` on the current row.
    fn move_to_column(&mut self, column: u16) -> io::Result<()>;

    /// Write `text` and move to the start of the next row.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Write `text` horizontally centered on its own row.
    fn write_centered(&mut self, text: &str) -> io::Result<()> {
        let (columns, _) = self.size()?;
        self.move_to_column(centered_column(columns, text))?;
        self.write_line(text)
    }
}

/// Column at which `text` starts when centered in `columns`.
///
/// Text wider than the surface starts at column 0.
pub fn centered_column(columns: u16, text: &str) -> u16 {
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    columns.saturating_sub(width) / 2
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Surface backed by a crossterm-capable writer (stdout by default).
///
/// Commands are queued and only reach the terminal on `flush`, so a frame
/// appears at once. Lines end with an explicit move to the next row because
/// raw mode does not translate `\n`.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn move_to_column(&mut self, column: u16) -> io::Result<()> {
        self.out.queue(MoveToColumn(column))?;
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.out.queue(Print(text))?.queue(MoveToNextLine(1))?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ============================================================================
// RECORDING
// ============================================================================

/// One primitive call made against a `RecordingSurface`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Clear,
    MoveToColumn(u16),
    WriteLine(String),
    Flush,
}

/// In-memory surface with a fixed size.
///
/// Each `clear` starts a new frame. Written lines are left-padded with
/// spaces up to the column the cursor was moved to.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    columns: u16,
    rows: u16,
    column: u16,
    ops: Vec<SurfaceOp>,
    frames: Vec<Vec<String>>,
}

impl RecordingSurface {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    /// Every call in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Completed and in-progress frames, oldest first.
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Lines of the current frame (all lines if `clear` was never called).
    pub fn lines(&self) -> Vec<String> {
        self.frames.last().cloned().unwrap_or_default()
    }

    pub fn clear_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == SurfaceOp::Clear).count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn clear(&mut self) -> io::Result<()> {
        self.ops.push(SurfaceOp::Clear);
        self.frames.push(Vec::new());
        self.column = 0;
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.columns, self.rows))
    }

    fn move_to_column(&mut self, column: u16) -> io::Result<()> {
        self.ops.push(SurfaceOp::MoveToColumn(column));
        self.column = column;
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.ops.push(SurfaceOp::WriteLine(text.to_string()));
        let line = format!("{}{}", " ".repeat(usize::from(self.column)), text);
        match self.frames.last_mut() {
            Some(frame) => frame.push(line),
            None => self.frames.push(vec![line]),
        }
        self.column = 0;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ops.push(SurfaceOp::Flush);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_column_splits_remaining_space() {
        assert_eq!(centered_column(40, "< Page 1 / 3 >"), 13);
        assert_eq!(centered_column(10, "abcd"), 3);
    }

    #[test]
    fn wide_text_starts_at_column_zero() {
        assert_eq!(centered_column(4, "much too wide"), 0);
    }

    #[test]
    fn centering_counts_display_width_not_bytes() {
        // Each CJK glyph is two columns wide but three bytes long.
        assert_eq!(centered_column(10, "日本"), 3);
    }

    #[test]
    fn recording_surface_starts_new_frame_on_clear() {
        let mut surface = RecordingSurface::new(20, 5);
        surface.clear().unwrap();
        surface.write_line("one").unwrap();
        surface.clear().unwrap();
        surface.write_line("two").unwrap();

        assert_eq!(surface.frames().len(), 2);
        assert_eq!(surface.last_frame().unwrap(), ["two".to_string()]);
        assert_eq!(surface.clear_count(), 2);
    }

    #[test]
    fn write_centered_pads_to_center() {
        let mut surface = RecordingSurface::new(10, 5);
        surface.clear().unwrap();
        surface.write_centered("ab").unwrap();
        assert_eq!(surface.lines(), vec!["    ab".to_string()]);
        assert_eq!(
            surface.ops(),
            [
                SurfaceOp::Clear,
                SurfaceOp::MoveToColumn(4),
                SurfaceOp::WriteLine("ab".to_string()),
            ]
        );
    }

    #[test]
    fn column_resets_after_each_line() {
        let mut surface = RecordingSurface::new(10, 5);
        surface.move_to_column(3).unwrap();
        surface.write_line("x").unwrap();
        surface.write_line("y").unwrap();
        assert_eq!(surface.lines(), vec!["   x".to_string(), "y".to_string()]);
    }

    #[test]
    fn terminal_surface_queues_until_flush() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.write_line("hello").unwrap();
        assert!(String::from_utf8_lossy(&surface.out).contains("hello"));
        surface.flush().unwrap();
    }
}
