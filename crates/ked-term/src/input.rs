// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Handles what a plain VT-style
// terminal sends in raw mode:
//
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace as 0x7F or Ctrl-H)
// - Legacy CSI sequences (arrows, Home/End/Delete/PageUp/PageDown, with or
//   without xterm modifier parameters)
// - SS3 sequences (arrows and Home/End from terminals in application mode)
//
// Printable bytes are delivered one at a time as `Char(u8)`, high bytes
// included, so multi-byte UTF-8 reaches the buffer byte-for-byte.
//
// # Design
//
// The parser keeps a small byte buffer because an escape sequence can span
// two `read()` calls. Feed bytes with [`Parser::advance`]. When a read
// times out with bytes still pending, [`Parser::flush`] resolves them: a
// lone ESC is the Escape key, a cut-off sequence is discarded.

use std::io::{self, Read};

use bitflags::bitflags;
use tracing::debug;

/// Bytes requested per `read()`.
const READ_BUF_SIZE: usize = 256;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// Ctrl + a lowercase ASCII letter.
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::new(KeyCode::Char(letter), Modifiers::CTRL)
    }

    /// Whether this is Ctrl + `letter`.
    #[must_use]
    pub fn is_ctrl(&self, letter: u8) -> bool {
        self.code == KeyCode::Char(letter) && self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// One raw byte: ASCII printable, a UTF-8 fragment, or the letter of a
    /// Ctrl chord.
    Char(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags, in xterm's CSI encoding
    /// (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Byte-to-key parser.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` could be the Escape key or the start of a sequence. The
/// parser holds it until more bytes arrive or [`flush`](Parser::flush) is
/// called after a read timeout.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes and return every key that can be parsed. Incomplete
    /// sequences stay buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Are there unconsumed bytes waiting for the rest of a sequence?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after a read timeout.
    ///
    /// Only an incomplete escape sequence is ever pending. A lone ESC is
    /// the Escape key; a cut-off CSI or SS3 sequence is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = match self.buf.as_slice() {
            [] => Vec::new(),
            [0x1B] => vec![KeyEvent::plain(KeyCode::Escape)],
            partial => {
                debug!(?partial, "dropping unterminated escape sequence");
                Vec::new()
            }
        };
        self.buf.clear();
        keys
    }
}

/// Read once from `src` and parse what arrived.
///
/// A read that returns no bytes is a timeout (raw mode with `VTIME`): the
/// parser is flushed, so a lone ESC surfaces as Escape about one timeout
/// after it was pressed.
///
/// # Errors
///
/// Any read error other than `Interrupted` / `WouldBlock`.
pub fn read_keys(parser: &mut Parser, src: &mut impl Read) -> io::Result<Vec<KeyEvent>> {
    let mut buf = [0u8; READ_BUF_SIZE];
    let n = match src.read(&mut buf) {
        Ok(n) => n,
        Err(err)
            if matches!(err.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) =>
        {
            0
        }
        Err(err) => return Err(err),
    };
    if n == 0 {
        return Ok(parser.flush());
    }
    Ok(parser.advance(&buf[..n]))
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one key from the front of a buffer.
enum Parsed {
    Key(KeyEvent, usize),
    Incomplete,
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    let key = match first {
        0x1B => return parse_escape(buf),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::plain(KeyCode::Enter),
        b @ 0x01..=0x1A => KeyEvent::ctrl(b + b'a' - 1),
        0x00 | 0x1C..=0x1F => return Parsed::Skip(1),
        b => KeyEvent::plain(KeyCode::Char(b)),
    };
    Parsed::Key(key, 1)
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    match buf.get(1) {
        None => Parsed::Incomplete,
        Some(b'[') => parse_csi(buf),
        Some(b'O') => parse_ss3(buf),
        // Alt+printable.
        Some(&b @ 0x20..=0x7E) => Parsed::Key(KeyEvent::new(KeyCode::Char(b), Modifiers::ALT), 2),
        // Unknown byte after ESC: the ESC stands alone.
        Some(_) => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    // Scan for the final byte (0x40..=0x7E). Parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;

    if final_byte == b'~' {
        let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));
        let code = match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Key(KeyEvent::new(code, modifiers), consumed);
    }

    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));
    match letter_key(final_byte) {
        Some(code) => Parsed::Key(KeyEvent::new(code, modifiers), consumed),
        None => Parsed::Skip(consumed),
    }
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    match letter_key(b) {
        Some(code) => Parsed::Key(KeyEvent::plain(code), 3),
        None => Parsed::Skip(3),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Keys encoded by a single final letter (`CSI A`, `SS3 H`, ...).
const fn letter_key(b: u8) -> Option<KeyCode> {
    match b {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

/// Parse semicolon-separated numeric CSI parameters. Empty fields are 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
        .collect()
}

/// Decode an xterm modifier parameter (`1 + bitmask`). Only the low bits
/// carry flags.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(bytes: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(bytes)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // ── Single bytes ─────────────────────────────────────────────────

    #[test]
    fn printable_bytes() {
        assert_eq!(
            parse(b"a Z"),
            vec![
                plain(KeyCode::Char(b'a')),
                plain(KeyCode::Char(b' ')),
                plain(KeyCode::Char(b'Z')),
            ]
        );
    }

    #[test]
    fn utf8_arrives_byte_by_byte() {
        assert_eq!(
            parse("é".as_bytes()),
            vec![plain(KeyCode::Char(0xC3)), plain(KeyCode::Char(0xA9))]
        );
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse(b"\x11"), vec![KeyEvent::ctrl(b'q')]);
        assert_eq!(parse(b"\x0f"), vec![KeyEvent::ctrl(b'o')]);
        assert_eq!(parse(b"\x17"), vec![KeyEvent::ctrl(b'w')]);
        assert_eq!(parse(b"\x15"), vec![KeyEvent::ctrl(b'u')]);
        assert_eq!(parse(b"\x12"), vec![KeyEvent::ctrl(b'r')]);
        assert!(KeyEvent::ctrl(b'q').is_ctrl(b'q'));
        assert!(!plain(KeyCode::Char(b'q')).is_ctrl(b'q'));
    }

    #[test]
    fn named_control_bytes() {
        assert_eq!(parse(b"\r"), vec![plain(KeyCode::Enter)]);
        assert_eq!(parse(b"\n"), vec![plain(KeyCode::Enter)]);
        assert_eq!(parse(b"\t"), vec![plain(KeyCode::Tab)]);
        assert_eq!(parse(b"\x7f"), vec![plain(KeyCode::Backspace)]);
        assert_eq!(parse(b"\x08"), vec![plain(KeyCode::Backspace)]);
    }

    #[test]
    fn nul_is_skipped() {
        assert_eq!(parse(b"\x00a"), vec![plain(KeyCode::Char(b'a'))]);
    }

    // ── CSI / SS3 ────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![
                plain(KeyCode::Up),
                plain(KeyCode::Down),
                plain(KeyCode::Right),
                plain(KeyCode::Left),
            ]
        );
    }

    #[test]
    fn home_end_every_encoding() {
        for seq in [&b"\x1b[H"[..], b"\x1bOH", b"\x1b[1~", b"\x1b[7~"] {
            assert_eq!(parse(seq), vec![plain(KeyCode::Home)], "{seq:?}");
        }
        for seq in [&b"\x1b[F"[..], b"\x1bOF", b"\x1b[4~", b"\x1b[8~"] {
            assert_eq!(parse(seq), vec![plain(KeyCode::End)], "{seq:?}");
        }
    }

    #[test]
    fn editing_keys() {
        assert_eq!(parse(b"\x1b[3~"), vec![plain(KeyCode::Delete)]);
        assert_eq!(parse(b"\x1b[5~"), vec![plain(KeyCode::PageUp)]);
        assert_eq!(parse(b"\x1b[6~"), vec![plain(KeyCode::PageDown)]);
    }

    #[test]
    fn modifier_parameters() {
        assert_eq!(
            parse(b"\x1b[1;5C"),
            vec![KeyEvent::new(KeyCode::Right, Modifiers::CTRL)]
        );
        assert_eq!(
            parse(b"\x1b[3;2~"),
            vec![KeyEvent::new(KeyCode::Delete, Modifiers::SHIFT)]
        );
    }

    #[test]
    fn unknown_sequences_are_skipped() {
        assert_eq!(parse(b"\x1b[15~x"), vec![plain(KeyCode::Char(b'x'))]);
        assert_eq!(parse(b"\x1b[Zx"), vec![plain(KeyCode::Char(b'x'))]);
    }

    #[test]
    fn alt_printable() {
        assert_eq!(
            parse(b"\x1bx"),
            vec![KeyEvent::new(KeyCode::Char(b'x'), Modifiers::ALT)]
        );
    }

    // ── Split input / flush ──────────────────────────────────────────

    #[test]
    fn sequence_split_across_reads() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.advance(b"3~"), vec![plain(KeyCode::Delete)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn lone_escape_needs_flush() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert_eq!(p.flush(), vec![plain(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn cut_off_sequence_is_dropped_on_flush() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.flush(), Vec::<KeyEvent>::new());
        assert!(!p.has_pending());

        assert!(p.advance(b"\x1b[1;5").is_empty());
        assert_eq!(p.flush(), Vec::<KeyEvent>::new());

        assert!(p.advance(b"\x1bO").is_empty());
        assert_eq!(p.flush(), Vec::<KeyEvent>::new());

        assert_eq!(p.advance(b"a"), vec![plain(KeyCode::Char(b'a'))]);
    }

    #[test]
    fn read_keys_drops_cut_off_sequence_on_timeout() {
        let mut p = Parser::new();
        let mut src: &[u8] = b"x\x1b[";
        assert_eq!(
            read_keys(&mut p, &mut src).unwrap(),
            vec![plain(KeyCode::Char(b'x'))]
        );
        assert!(p.has_pending());
        assert!(read_keys(&mut p, &mut src).unwrap().is_empty());
        assert!(!p.has_pending());
    }

    #[test]
    fn read_keys_parses_and_flushes_on_timeout() {
        let mut p = Parser::new();
        let mut src: &[u8] = b"ab\x1b";
        assert_eq!(
            read_keys(&mut p, &mut src).unwrap(),
            vec![plain(KeyCode::Char(b'a')), plain(KeyCode::Char(b'b'))]
        );
        // Exhausted slice reads 0 bytes, like a VTIME timeout.
        assert_eq!(read_keys(&mut p, &mut src).unwrap(), vec![plain(KeyCode::Escape)]);
        assert!(read_keys(&mut p, &mut src).unwrap().is_empty());
    }

    // ── Helpers ──────────────────────────────────────────────────────

    #[test]
    fn params() {
        assert_eq!(parse_params(b""), Vec::<u16>::new());
        assert_eq!(parse_params(b"1;5"), vec![1, 5]);
        assert_eq!(parse_params(b";2"), vec![0, 2]);
    }

    #[test]
    fn modifiers_decode() {
        assert_eq!(decode_modifiers(0), Modifiers::empty());
        assert_eq!(decode_modifiers(1), Modifiers::empty());
        assert_eq!(decode_modifiers(3), Modifiers::ALT);
        assert_eq!(decode_modifiers(8), Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL);
    }
}
