//! Text buffer — the row store.
//!
//! A `Buffer` is an ordered `Vec` of [`Row`]s plus the tab width used to
//! derive each row's render form. Row order is line order.
//!
//! # Design choices
//!
//! - **Never empty.** A buffer always holds at least one row. Opening an
//!   empty or missing file yields a single empty row, so the cursor always
//!   has a valid line to sit on.
//!
//! - **Index-based access.** Rows are addressed by `usize` line index. No
//!   method hands out a reference that must survive a structural change to
//!   the row list; callers re-index after every mutation.
//!
//! - **Bytes, not chars.** Rows hold raw bytes. Each byte is one column on
//!   screen except the tab. Non-UTF-8 content loads and saves untouched.
//!
//! The mutation engine (insert/remove/split with cursor tracking) lives in
//! [`crate::edit`] as a second `impl Buffer` block.

use std::fmt;

use crate::position::Position;
use crate::row::Row;

/// Tab stop width used when none is configured.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// An ordered collection of rows.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    pub(crate) rows: Vec<Row>,
    tab_width: usize,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create a buffer holding a single empty row.
    #[must_use]
    pub fn new(tab_width: usize) -> Self {
        Self {
            rows: vec![Row::default()],
            tab_width: tab_width.max(1),
        }
    }

    /// Bulk-populate a buffer from raw lines (terminators already stripped).
    ///
    /// An empty iterator still produces one empty row.
    #[must_use]
    pub fn from_lines<I, L>(lines: I, tab_width: usize) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut buf = Self {
            rows: Vec::new(),
            tab_width: tab_width.max(1),
        };
        for line in lines {
            buf.append_row(line.as_ref());
        }
        if buf.rows.is_empty() {
            buf.rows.push(Row::default());
        }
        buf
    }

    /// Create a buffer from text, splitting on `\n` (a trailing `\r` on each
    /// line is dropped).
    #[must_use]
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        Self::from_lines(
            text.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line)),
            tab_width,
        )
    }

    // -- Access -------------------------------------------------------------

    /// Render columns per tab stop.
    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Number of rows. Always at least 1.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the last row.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.rows.len() - 1
    }

    /// Get a row by index.
    #[inline]
    #[must_use]
    pub fn row(&self, line: usize) -> Option<&Row> {
        self.rows.get(line)
    }

    /// All rows in line order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Byte length of a row, 0 if the row doesn't exist.
    #[inline]
    #[must_use]
    pub fn row_len(&self, line: usize) -> usize {
        self.rows.get(line).map_or(0, Row::len)
    }

    /// Byte at `pos`, `None` if out of range.
    #[must_use]
    pub fn byte_at(&self, pos: Position) -> Option<u8> {
        self.rows
            .get(pos.line)
            .and_then(|row| row.chars().get(pos.col).copied())
    }

    /// Raw bytes of every row, in order. Used by save.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.rows.iter().map(Row::chars)
    }

    /// Every row as a (lossily decoded) `String`.
    #[must_use]
    pub fn text_lines(&self) -> Vec<String> {
        self.lines()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Widest render length across all rows.
    #[must_use]
    pub fn max_render_len(&self) -> usize {
        self.rows.iter().map(Row::render_len).max().unwrap_or(0)
    }

    /// Clamp a position to the nearest valid one: the line to the last row,
    /// the column to the row length (the past-the-end column is valid).
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        let col = pos.col.min(self.rows[line].len());
        Position::new(line, col)
    }

    // -- Row store ----------------------------------------------------------

    /// Add a row at the end of the buffer.
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes, self.tab_width));
    }

    /// Rebuild the render form of one row.
    pub fn update_render(&mut self, line: usize) {
        let tab_width = self.tab_width;
        if let Some(row) = self.rows.get_mut(line) {
            row.update_render(tab_width);
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("rows", &self.rows)
            .field("tab_width", &self.tab_width)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_has_one_empty_row() {
        let buf = Buffer::new(4);
        assert_eq!(buf.row_count(), 1);
        assert_eq!(buf.row_len(0), 0);
        assert_eq!(buf.last_line(), 0);
    }

    #[test]
    fn from_lines_preserves_order() {
        let buf = Buffer::from_lines(["one", "two", "three"], 4);
        assert_eq!(buf.text_lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn from_lines_empty_iterator_yields_one_row() {
        let buf = Buffer::from_lines(Vec::<Vec<u8>>::new(), 4);
        assert_eq!(buf.row_count(), 1);
        assert!(buf.row(0).is_some_and(Row::is_empty));
    }

    #[test]
    fn from_text_splits_lines() {
        let buf = Buffer::from_text("ab\r\ncd\n", 4);
        assert_eq!(buf.text_lines(), vec!["ab", "cd", ""]);
    }

    #[test]
    fn zero_tab_width_is_raised_to_one() {
        assert_eq!(Buffer::new(0).tab_width(), 1);
    }

    // -- Access -------------------------------------------------------------

    #[test]
    fn row_out_of_range_is_none() {
        let buf = Buffer::from_text("a", 4);
        assert!(buf.row(1).is_none());
        assert_eq!(buf.row_len(7), 0);
    }

    #[test]
    fn byte_at() {
        let buf = Buffer::from_text("ab\ncd", 4);
        assert_eq!(buf.byte_at(Position::new(1, 1)), Some(b'd'));
        assert_eq!(buf.byte_at(Position::new(1, 2)), None);
        assert_eq!(buf.byte_at(Position::new(5, 0)), None);
    }

    #[test]
    fn lines_iterates_raw_bytes() {
        let buf = Buffer::from_text("a\tb\nc", 4);
        let lines: Vec<&[u8]> = buf.lines().collect();
        assert_eq!(lines, vec![&b"a\tb"[..], &b"c"[..]]);
    }

    #[test]
    fn renders_use_buffer_tab_width() {
        let buf = Buffer::from_text("\tx", 8);
        assert_eq!(buf.row(0).map(Row::render_len), Some(9));
        assert_eq!(buf.max_render_len(), 9);
    }

    #[test]
    fn clamp_position() {
        let buf = Buffer::from_text("hello\nhi", 4);
        assert_eq!(buf.clamp(Position::new(0, 3)), Position::new(0, 3));
        assert_eq!(buf.clamp(Position::new(0, 9)), Position::new(0, 5));
        assert_eq!(buf.clamp(Position::new(9, 9)), Position::new(1, 2));
    }

    // -- Row store ----------------------------------------------------------

    #[test]
    fn append_row_computes_render() {
        let mut buf = Buffer::new(4);
        buf.append_row(b"\tz");
        assert_eq!(buf.row_count(), 2);
        assert_eq!(buf.row(1).map(Row::render), Some(&b"    z"[..]));
    }

    #[test]
    fn update_render_out_of_range_is_noop() {
        let mut buf = Buffer::new(4);
        buf.update_render(3);
        assert_eq!(buf.row_count(), 1);
    }
}
