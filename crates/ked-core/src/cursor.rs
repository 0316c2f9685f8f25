//! Cursor — position tracking with tab-aware render column and sticky column.
//!
//! The `Cursor` holds four numbers:
//!
//! - `pos.line`: row index, always in `[0, row_count)`
//! - `pos.col`: char column, always in `[0, row.len()]`
//! - `rx`: render column of `pos.col`, recomputed after every mutation or
//!   vertical move
//! - `max_rx`: the sticky render column, the last intentional horizontal
//!   target
//!
//! # Sticky column
//!
//! Vertical movement maps `max_rx` back to a char column on the new row, so
//! passing through a short line (or a line full of tabs) and reaching a long
//! line again snaps back to the remembered screen column. Horizontal
//! movement and edits reset `max_rx` to the current `rx`. `End`/`LineEnd`
//! pin the sticky column to the end of whatever line the cursor lands on.
//!
//! The cursor never owns or references the buffer; the buffer is passed to
//! every method that needs it.

use crate::buffer::Buffer;
use crate::position::Position;

/// Sticky-column value that means "end of line".
const STICKY_EOL: usize = usize::MAX;

/// A cursor movement request, decoded from navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
    /// Up by one screen height.
    PageUp,
    /// Down by one screen height.
    PageDown,
    /// Start of the buffer.
    Home,
    /// End of the last line of the buffer.
    End,
    /// End of the current line.
    LineEnd,
}

/// The editing cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    rx: usize,
    max_rx: usize,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            rx: 0,
            max_rx: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current position (line, char column).
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Current line (0-indexed).
    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    /// Current char column (0-indexed).
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    /// Current render column.
    #[inline]
    #[must_use]
    pub const fn rx(&self) -> usize {
        self.rx
    }

    /// The sticky render column.
    #[inline]
    #[must_use]
    pub const fn max_rx(&self) -> usize {
        self.max_rx
    }

    // -- Direct positioning -------------------------------------------------

    /// Move to `pos` (clamped to the buffer) as an intentional horizontal
    /// placement: `rx` is recomputed and becomes the sticky column.
    pub fn place(&mut self, buf: &Buffer, pos: Position) {
        self.pos = buf.clamp(pos);
        self.rx = render_col(buf, self.pos);
        self.max_rx = self.rx;
    }

    /// Re-validate after the buffer changed underneath the cursor.
    ///
    /// Clamps the position and recomputes `rx`, leaving the sticky column
    /// alone.
    pub fn clamp(&mut self, buf: &Buffer) {
        self.pos = buf.clamp(self.pos);
        self.rx = render_col(buf, self.pos);
    }

    // -- Movement -----------------------------------------------------------

    /// Apply a movement. `page` is the number of text rows on screen, used by
    /// `PageUp`/`PageDown`.
    pub fn apply(&mut self, movement: Movement, buf: &Buffer, page: usize) {
        match movement {
            Movement::Up => self.move_up(buf),
            Movement::Down => self.move_down(buf),
            Movement::Left => self.move_left(buf),
            Movement::Right => self.move_right(buf),
            Movement::PageUp => {
                for _ in 0..page.max(1) {
                    self.move_up(buf);
                }
            }
            Movement::PageDown => {
                for _ in 0..page.max(1) {
                    self.move_down(buf);
                }
            }
            Movement::Home => self.place(buf, Position::ZERO),
            Movement::End => {
                self.pos.line = buf.last_line();
                self.move_to_line_end(buf);
            }
            Movement::LineEnd => self.move_to_line_end(buf),
        }
    }

    /// Move up one row, landing on the sticky column.
    pub fn move_up(&mut self, buf: &Buffer) {
        if self.pos.line == 0 {
            return;
        }
        self.pos.line -= 1;
        self.land_on_sticky(buf);
    }

    /// Move down one row, landing on the sticky column.
    pub fn move_down(&mut self, buf: &Buffer) {
        if self.pos.line >= buf.last_line() {
            return;
        }
        self.pos.line += 1;
        self.land_on_sticky(buf);
    }

    /// Move left one byte, wrapping to the end of the previous row.
    pub fn move_left(&mut self, buf: &Buffer) {
        self.clamp(buf);
        if self.pos.col > 0 {
            self.place(buf, Position::new(self.pos.line, self.pos.col - 1));
        } else if self.pos.line > 0 {
            let line = self.pos.line - 1;
            self.place(buf, Position::new(line, buf.row_len(line)));
        }
    }

    /// Move right one byte, wrapping to the start of the next row.
    pub fn move_right(&mut self, buf: &Buffer) {
        self.clamp(buf);
        if self.pos.col < buf.row_len(self.pos.line) {
            self.place(buf, Position::new(self.pos.line, self.pos.col + 1));
        } else if self.pos.line < buf.last_line() {
            self.place(buf, Position::new(self.pos.line + 1, 0));
        }
    }

    /// Move to the end of the current row and stick there.
    pub fn move_to_line_end(&mut self, buf: &Buffer) {
        self.place(buf, Position::new(self.pos.line, buf.row_len(self.pos.line)));
        self.max_rx = STICKY_EOL;
    }

    /// Map the sticky column onto the current row.
    fn land_on_sticky(&mut self, buf: &Buffer) {
        let line = self.pos.line.min(buf.last_line());
        let col = buf
            .row(line)
            .map_or(0, |row| row.rx_to_cx(self.max_rx, buf.tab_width()));
        self.pos = Position::new(line, col);
        self.rx = render_col(buf, self.pos);
    }
}

/// Render column of a (valid) position.
fn render_col(buf: &Buffer, pos: Position) -> usize {
    buf.row(pos.line)
        .map_or(0, |row| row.cx_to_rx(pos.col, buf.tab_width()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
