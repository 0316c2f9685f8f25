//! Column translation — raw character index ↔ rendered screen column.
//!
//! A row stores raw bytes. On screen every byte occupies one column except
//! the tab, which expands to the next multiple of the tab width. These two
//! functions convert between the two coordinate systems:
//!
//! - **char column** (`col`): index into the row's raw bytes
//! - **render column** (`rx`): on-screen column after tab expansion
//!
//! Both are O(n) in the scanned prefix. Inputs past the end of the row are
//! clamped, never rejected.

/// Width of a tab that starts at render column `rx`.
#[inline]
#[must_use]
pub const fn tab_advance(rx: usize, tab_width: usize) -> usize {
    tab_width - (rx % tab_width)
}

/// Convert a char column to a render column.
///
/// Scans `chars[..col]`: a tab advances to the next tab stop, every other
/// byte advances by one. A `col` past the end of `chars` is clamped.
#[must_use]
pub fn char_to_render(chars: &[u8], col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    chars[..col.min(chars.len())]
        .iter()
        .fold(0, |rx, &byte| {
            if byte == b'\t' {
                rx + tab_advance(rx, tab_width)
            } else {
                rx + 1
            }
        })
}

/// Convert a render column to a char column.
///
/// Accumulates rendered width until it reaches `rx`. A tab whose expansion
/// would cross `rx` stops the scan on the tab itself, so a render column in
/// the middle of a tab maps to the tab's char column. Render columns past
/// the end of the row map to `chars.len()`.
#[must_use]
pub fn render_to_char(chars: &[u8], rx: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut cur = 0;

    for (col, &byte) in chars.iter().enumerate() {
        if cur >= rx {
            return col;
        }
        let width = if byte == b'\t' {
            tab_advance(cur, tab_width)
        } else {
            1
        };
        if cur + width > rx {
            return col;
        }
        cur += width;
    }

    chars.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- tab_advance --------------------------------------------------------

    #[test]
    fn tab_advance_from_stop() {
        assert_eq!(tab_advance(0, 4), 4);
        assert_eq!(tab_advance(4, 4), 4);
    }

    #[test]
    fn tab_advance_mid_stop() {
        assert_eq!(tab_advance(1, 4), 3);
        assert_eq!(tab_advance(3, 4), 1);
        assert_eq!(tab_advance(5, 8), 3);
    }

    // -- char_to_render -----------------------------------------------------

    #[test]
    fn plain_text_is_identity() {
        let chars = b"hello";
        for col in 0..=chars.len() {
            assert_eq!(char_to_render(chars, col, 4), col);
        }
    }

    #[test]
    fn leading_tab() {
        let chars = b"\tx";
        assert_eq!(char_to_render(chars, 0, 4), 0);
        assert_eq!(char_to_render(chars, 1, 4), 4);
        assert_eq!(char_to_render(chars, 2, 4), 5);
    }

    #[test]
    fn tab_after_text_snaps_to_stop() {
        let chars = b"ab\tc";
        assert_eq!(char_to_render(chars, 3, 4), 4);
        assert_eq!(char_to_render(chars, 4, 4), 5);
    }

    #[test]
    fn consecutive_tabs() {
        let chars = b"\t\t";
        assert_eq!(char_to_render(chars, 2, 4), 8);
        assert_eq!(char_to_render(chars, 2, 8), 16);
    }

    #[test]
    fn char_to_render_clamps_col() {
        assert_eq!(char_to_render(b"a\t", 99, 4), 4);
    }

    #[test]
    fn zero_tab_width_treated_as_one() {
        assert_eq!(char_to_render(b"\t\t", 2, 0), 2);
    }

    // -- render_to_char -----------------------------------------------------

    #[test]
    fn render_to_char_plain() {
        assert_eq!(render_to_char(b"hello", 3, 4), 3);
        assert_eq!(render_to_char(b"hello", 5, 4), 5);
    }

    #[test]
    fn render_to_char_inside_tab_stops_on_tab() {
        let chars = b"\tx";
        assert_eq!(render_to_char(chars, 1, 4), 0);
        assert_eq!(render_to_char(chars, 3, 4), 0);
        assert_eq!(render_to_char(chars, 4, 4), 1);
        assert_eq!(render_to_char(chars, 5, 4), 2);
    }

    #[test]
    fn render_to_char_past_end() {
        assert_eq!(render_to_char(b"ab", 40, 4), 2);
        assert_eq!(render_to_char(b"", 3, 4), 0);
    }

    // -- Round trip ---------------------------------------------------------

    #[test]
    fn round_trip_all_columns() {
        let rows: [&[u8]; 5] = [b"", b"plain", b"\tx", b"a\tb\t\tc", b"\t \t  \t"];
        for tab_width in [1, 2, 4, 8] {
            for chars in rows {
                for col in 0..=chars.len() {
                    let rx = char_to_render(chars, col, tab_width);
                    assert_eq!(
                        render_to_char(chars, rx, tab_width),
                        col,
                        "row {chars:?} col {col} tab {tab_width}"
                    );
                }
            }
        }
    }
}
