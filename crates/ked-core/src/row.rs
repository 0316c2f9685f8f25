//! Row — one line of text plus its tab-expanded render form.
//!
//! A row owns two byte vectors:
//!
//! - `chars`: the raw bytes exactly as loaded or typed, no line terminator
//! - `render`: `chars` with every tab replaced by 1..=`tab_width` spaces so
//!   that the column after the tab is a multiple of `tab_width`
//!
//! `render` is derived state. Every method that changes `chars` rebuilds it
//! before returning, so the two can never disagree.

use std::fmt;

use crate::column;

/// A single line of the buffer.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Create a row from raw bytes and compute its render form.
    #[must_use]
    pub fn new(chars: impl Into<Vec<u8>>, tab_width: usize) -> Self {
        let mut row = Self {
            chars: chars.into(),
            render: Vec::new(),
        };
        row.update_render(tab_width);
        row
    }

    // -- Access -------------------------------------------------------------

    /// Raw bytes of the row.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Tab-expanded bytes, ready for display.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Number of raw bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the row holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of rendered columns.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Render column of char column `col`.
    #[inline]
    #[must_use]
    pub fn cx_to_rx(&self, col: usize, tab_width: usize) -> usize {
        column::char_to_render(&self.chars, col, tab_width)
    }

    /// Char column under render column `rx`.
    #[inline]
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize, tab_width: usize) -> usize {
        column::render_to_char(&self.chars, rx, tab_width)
    }

    // -- Mutation -----------------------------------------------------------

    /// Rebuild `render` from `chars`.
    pub fn update_render(&mut self, tab_width: usize) {
        let tab_width = tab_width.max(1);
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();

        self.render.clear();
        self.render.reserve(self.chars.len() + tabs * (tab_width - 1));

        for &byte in &self.chars {
            if byte == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_width != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(byte);
            }
        }
    }

    /// Insert `bytes` at `col` (clamped to the row length).
    pub fn insert(&mut self, col: usize, bytes: &[u8], tab_width: usize) {
        let col = col.min(self.chars.len());
        self.chars.splice(col..col, bytes.iter().copied());
        self.update_render(tab_width);
    }

    /// Remove the bytes in `start..end` (both clamped) and return them.
    pub fn remove(&mut self, start: usize, end: usize, tab_width: usize) -> Vec<u8> {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        let removed = self.chars.drain(start..end).collect();
        self.update_render(tab_width);
        removed
    }

    /// Append `bytes` to the end of the row.
    pub fn append(&mut self, bytes: &[u8], tab_width: usize) {
        self.chars.extend_from_slice(bytes);
        self.update_render(tab_width);
    }

    /// Cut the row at `col`, keeping the head and returning the tail.
    #[must_use = "the split-off tail is the content of the new row"]
    pub fn split_off(&mut self, col: usize, tab_width: usize) -> Vec<u8> {
        let col = col.min(self.chars.len());
        let tail = self.chars.split_off(col);
        self.update_render(tab_width);
        tail
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({:?})", String::from_utf8_lossy(&self.chars))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
