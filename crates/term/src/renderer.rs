//! TerminalSurface: writes flushed cells to a real terminal.
//!
//! Writes are queued as crossterm commands into an in-memory buffer and pushed
//! to the terminal once per tick in [`OutputSurface::present`]. A cursor move
//! is only queued when the next cell is not directly after the previous one,
//! so a row-major flush of a horizontal run costs a single `MoveTo`.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{cursor, style::Print, terminal, QueueableCommand};

use tui_retro_core::OutputSurface;

pub struct TerminalSurface<W: Write = io::Stdout> {
    out: W,
    buf: Vec<u8>,
    width: u16,
    height: u16,
    square: bool,
    // Terminal position the next printed character lands on.
    cursor: Option<(u16, u16)>,
    // First queueing error, reported by the next `present`.
    error: Option<io::Error>,
}

impl TerminalSurface<io::Stdout> {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_writer(io::stdout(), width, height)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn with_writer(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(64 * 1024),
            width,
            height,
            square: false,
            cursor: None,
            error: None,
        }
    }

    /// Print every cell twice so a grid cell looks roughly square.
    pub fn square_mode(mut self, on: bool) -> Self {
        self.square = on;
        self
    }

    pub fn is_square(&self) -> bool {
        self.square
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Raw mode, alternate screen, hidden cursor and a cleared screen.
    ///
    /// The screen must start blank: the diff renderer assumes nothing is on it.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.cursor = None;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        self.buf.clear();
        Ok(())
    }

    fn record(&mut self, res: io::Result<()>) {
        if let Err(err) = res {
            self.error.get_or_insert(err);
        }
    }
}

impl<W: Write> OutputSurface for TerminalSurface<W> {
    fn write_cell(&mut self, ch: char, x: u16, y: u16) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (col, repeat) = if self.square {
            match x.checked_mul(2) {
                Some(col) => (col, 2),
                None => return,
            }
        } else {
            (x, 1)
        };

        if self.cursor != Some((col, y)) {
            let res = self.buf.queue(cursor::MoveTo(col, y)).map(|_| ());
            self.record(res);
        }
        for _ in 0..repeat {
            let res = self.buf.queue(Print(ch)).map(|_| ());
            self.record(res);
        }
        self.cursor = col.checked_add(repeat).map(|next| (next, y));
    }

    fn present(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            self.buf.clear();
            self.cursor = None;
            return Err(err);
        }
        if self.buf.is_empty() {
            return Ok(());
        }
        self.flush_buf()
    }

    fn set_title(&mut self, title: &str) {
        let res = self.buf.queue(terminal::SetTitle(title)).map(|_| ());
        self.record(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(cmds: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
        let mut out = Vec::new();
        cmds(&mut out).unwrap();
        out
    }

    #[test]
    fn adjacent_cells_share_one_cursor_move() {
        let mut term = TerminalSurface::with_writer(Vec::new(), 10, 5);
        term.write_cell('A', 2, 1);
        term.write_cell('B', 3, 1);
        term.write_cell('C', 0, 4);
        assert!(term.writer().is_empty());
        term.present().unwrap();

        let want = expected(|out| {
            out.queue(cursor::MoveTo(2, 1))?;
            out.queue(Print('A'))?;
            out.queue(Print('B'))?;
            out.queue(cursor::MoveTo(0, 4))?;
            out.queue(Print('C'))?;
            Ok(())
        });
        assert_eq!(term.writer(), &want);
    }

    #[test]
    fn square_mode_doubles_columns() {
        let mut term = TerminalSurface::with_writer(Vec::new(), 4, 1).square_mode(true);
        term.write_cell('#', 1, 0);
        term.write_cell('#', 2, 0);
        term.present().unwrap();

        let want = expected(|out| {
            out.queue(cursor::MoveTo(2, 0))?;
            for _ in 0..4 {
                out.queue(Print('#'))?;
            }
            Ok(())
        });
        assert_eq!(term.writer(), &want);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut term = TerminalSurface::with_writer(Vec::new(), 2, 2);
        term.write_cell('x', 2, 0);
        term.write_cell('x', 0, 2);
        term.present().unwrap();
        assert!(term.writer().is_empty());
    }

    #[test]
    fn title_is_queued_until_present() {
        let mut term = TerminalSurface::with_writer(Vec::new(), 2, 2);
        term.set_title("FPS: 60");
        assert!(term.writer().is_empty());
        term.present().unwrap();

        let want = expected(|out| {
            out.queue(terminal::SetTitle("FPS: 60"))?;
            Ok(())
        });
        assert_eq!(term.writer(), &want);
    }
}
