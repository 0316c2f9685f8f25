//! Mutation engine — insert and remove bytes and rows.
//!
//! Every operation takes an explicit `(line, col)` target instead of reading
//! the cursor, so history replay can aim at any coordinate. Targets out of
//! range are clamped to the nearest valid position before use.
//!
//! Operations come in two flavours that mirror the two delete keys:
//!
//! - **before** (Backspace direction): text sits to the left of / above the
//!   cursor's resting place, so the cursor ends up after an insert or at the
//!   start of what was removed
//! - **after** (Delete direction): text sits to the right of / below the
//!   cursor, which stays where it is
//!
//! # Signed lengths
//!
//! [`Buffer::remove_chars`] takes a signed length. Positive removes that
//! many bytes ending just before the target (Backspace); negative removes
//! `|len|` bytes starting at the target (Delete). A row boundary counts as
//! one byte, so removing across it joins two rows.

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::position::Position;
use crate::row::Row;

impl Buffer {
    // -- Inserts ------------------------------------------------------------

    /// Insert one byte at `(line, col)`; the cursor moves past it.
    pub fn insert_char(&mut self, line: usize, col: usize, byte: u8, cursor: &mut Cursor) {
        self.insert_before(line, col, &[byte], cursor);
    }

    /// Insert `bytes` at `(line, col)`; the cursor ends just after them.
    ///
    /// This is the inverse of a Backspace-style removal.
    pub fn insert_before(&mut self, line: usize, col: usize, bytes: &[u8], cursor: &mut Cursor) {
        let at = self.insert_after(line, col, bytes);
        cursor.place(self, Position::new(at.line, at.col + bytes.len()));
    }

    /// Insert `bytes` at `(line, col)` without touching the cursor.
    ///
    /// This is the inverse of a Delete-style removal; the caller decides
    /// where the cursor goes. Returns the clamped insertion point.
    pub fn insert_after(&mut self, line: usize, col: usize, bytes: &[u8]) -> Position {
        let at = self.clamp(Position::new(line, col));
        let tab_width = self.tab_width();
        self.rows[at.line].insert(at.col, bytes, tab_width);
        at
    }

    // -- Row splits ---------------------------------------------------------

    /// Split row `line` at `col`; the tail becomes a new row right below.
    /// The cursor is not touched. Returns the clamped split point.
    ///
    /// This is the inverse of Delete at the end of a row.
    pub fn split_row_after(&mut self, line: usize, col: usize) -> Position {
        let at = self.clamp(Position::new(line, col));
        let tab_width = self.tab_width();
        let tail = self.rows[at.line].split_off(at.col, tab_width);
        self.rows.insert(at.line + 1, Row::new(tail, tab_width));
        at
    }

    /// Split row `line` at `col` and move the cursor to the start of the new
    /// row. This is the Enter key.
    pub fn split_row_before(&mut self, line: usize, col: usize, cursor: &mut Cursor) {
        let at = self.split_row_after(line, col);
        cursor.place(self, Position::new(at.line + 1, 0));
    }

    // -- Removal ------------------------------------------------------------

    /// Remove bytes around `(line, col)`.
    ///
    /// - `len > 0`: Backspace. Removes `len` bytes ending just before the
    ///   target, joining rows when the count reaches past column 0. The
    ///   cursor lands where the removal ended. At row 0 the count is clamped
    ///   so it never reaches above the buffer start.
    /// - `len < 0`: Delete. Removes `|len|` bytes starting at the target,
    ///   pulling following rows up when the count runs past the row end. The
    ///   cursor is not moved, only re-validated. On the last row the count
    ///   is clamped to the bytes that remain.
    ///
    /// Each step that crosses a row boundary strictly reduces the remaining
    /// count, so the loop runs at most once per row spanned.
    pub fn remove_chars(&mut self, line: usize, col: usize, len: isize, cursor: &mut Cursor) {
        let at = self.clamp(Position::new(line, col));
        if len > 0 {
            let end = self.remove_backward(at, len.unsigned_abs());
            cursor.place(self, end);
        } else if len < 0 {
            self.remove_forward(at, len.unsigned_abs());
            cursor.clamp(self);
        }
    }

    /// Backspace-direction removal. Returns where the removal ended.
    fn remove_backward(&mut self, mut at: Position, mut remaining: usize) -> Position {
        let tab_width = self.tab_width();

        loop {
            if at.line == 0 {
                remaining = remaining.min(at.col);
            }
            if remaining == 0 {
                return at;
            }

            if remaining <= at.col {
                self.rows[at.line].remove(at.col - remaining, at.col, tab_width);
                return Position::new(at.line, at.col - remaining);
            }

            // Crosses the start of the row: drop everything before the
            // target, then join what is left onto the previous row.
            let row = self.rows.remove(at.line);
            let prev = &mut self.rows[at.line - 1];
            let join = prev.len();
            prev.append(&row.chars()[at.col..], tab_width);

            remaining -= at.col + 1;
            at = Position::new(at.line - 1, join);
        }
    }

    /// Delete-direction removal starting at `at`.
    fn remove_forward(&mut self, at: Position, mut remaining: usize) {
        let tab_width = self.tab_width();

        loop {
            let size = self.rows[at.line].len();
            let left = size - at.col;
            if at.line == self.last_line() {
                remaining = remaining.min(left);
            }
            if remaining == 0 {
                return;
            }

            if remaining <= left {
                self.rows[at.line].remove(at.col, at.col + remaining, tab_width);
                return;
            }

            // Runs past the end of the row: drop the rest of this row, then
            // pull the next row up onto it.
            let next = self.rows.remove(at.line + 1);
            let row = &mut self.rows[at.line];
            row.remove(at.col, size, tab_width);
            row.append(next.chars(), tab_width);

            remaining -= left + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
