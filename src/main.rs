// SPDX-License-Identifier: MIT
//
// ked — a minimal terminal text editor with coalescing undo/redo.
//
// This is the main binary that wires the two crates together:
//
//   ked-term → raw mode, key decoding, event loop, ANSI output
//   ked-core → buffer, cursor, mutation engine, history, file I/O
//
// The Editor struct implements ked-term's App trait. Each keypress flows
// through:
//
//   stdin → parser → on_key → Session method → buffer/cursor/history
//   paint → viewport scroll → rows + status + message → one write
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / save-as prompt     │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ked_core::{Movement, Options, Session};
use ked_term::ansi;
use ked_term::event_loop::{Action, App, EventLoop};
use ked_term::input::{KeyCode, KeyEvent, Modifiers};
use ked_term::terminal::Size;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long a message stays in the message bar.
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Names the log file. Without it nothing is logged: stdout is the screen.
const LOG_ENV: &str = "KED_LOG";
const DEFAULT_LOG_FILTER: &str = "ked=info,ked_core=info";

const HELP_MESSAGE: &str =
    "Ctrl-Q quit | Ctrl-O save | Ctrl-W save as | Ctrl-U undo | Ctrl-R redo";
const PROMPT_LABEL: &str = "Save as: ";
const NO_NAME: &str = "[No Name]";

/// Rows below the text area: status bar and message bar.
const CHROME_ROWS: usize = 2;

// ─── Viewport ───────────────────────────────────────────────────────────────

/// The visible window onto the buffer, in render columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Viewport {
    rowoff: usize,
    coloff: usize,
    rows: usize,
    cols: usize,
}

impl Viewport {
    fn resize(&mut self, size: Size) {
        self.rows = usize::from(size.rows).saturating_sub(CHROME_ROWS);
        self.cols = usize::from(size.cols);
    }

    /// Scroll so `(line, rx)` is visible, keeping `scroll_off` rows of
    /// context above and below when the buffer is tall enough.
    fn scroll(&mut self, line: usize, rx: usize, row_count: usize, scroll_off: usize) {
        if self.rows == 0 || row_count <= self.rows {
            self.rowoff = 0;
        } else {
            let margin = scroll_off.min((self.rows - 1) / 2);
            let max_rowoff = row_count - self.rows;
            if line < self.rowoff + margin {
                self.rowoff = line.saturating_sub(margin);
            } else if line + margin >= self.rowoff + self.rows {
                self.rowoff = line + margin + 1 - self.rows;
            }
            self.rowoff = self.rowoff.min(max_rowoff);
        }

        if rx < self.coloff {
            self.coloff = rx;
        } else if self.cols > 0 && rx >= self.coloff + self.cols {
            self.coloff = rx + 1 - self.cols;
        }
    }
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

/// Lay out `left` and `right` across exactly `cols` bytes, right-aligning
/// `right`. `left` gives way first when space runs out.
fn fit_status(left: &[u8], right: &[u8], cols: usize) -> Vec<u8> {
    let right = &right[..right.len().min(cols)];
    let room = (cols - right.len()).saturating_sub(1);
    let left = &left[..left.len().min(room)];

    let mut line = Vec::with_capacity(cols);
    line.extend_from_slice(left);
    line.resize(cols - right.len(), b' ');
    line.extend_from_slice(right);
    line
}

/// `"ked editor -- version x"`, centered, with the row's `~` in front.
fn welcome_line(cols: usize) -> Vec<u8> {
    let text = format!("ked editor -- version {VERSION}");
    let text = &text.as_bytes()[..text.len().min(cols)];

    let mut line = Vec::with_capacity(cols);
    let padding = (cols - text.len()) / 2;
    if padding > 0 {
        line.push(b'~');
        line.resize(padding, b' ');
    }
    line.extend_from_slice(text);
    line
}

// ─── Message Bar ────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Message {
    text: String,
    shown_at: Instant,
}

impl Message {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= MESSAGE_TIMEOUT
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor application state.
struct Editor {
    session: Session,
    view: Viewport,
    message: Option<Message>,

    /// File name typed so far while the save-as prompt is open.
    prompt: Option<Vec<u8>>,
}

impl Editor {
    fn new(session: Session) -> Self {
        Self {
            session,
            view: Viewport::default(),
            message: Some(Message::new(HELP_MESSAGE)),
            prompt: None,
        }
    }

    fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(Message::new(msg));
    }

    // ── Key dispatch ───────────────────────────────────────────────────

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) {
            if let KeyCode::Char(letter) = key.code {
                return self.handle_ctrl(letter);
            }
        }

        let page = self.view.rows;
        match key.code {
            KeyCode::Enter => self.session.insert_newline(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Delete => self.session.delete(),
            KeyCode::Tab => {
                self.session.insert_char(b'\t');
            }
            KeyCode::Up => self.session.move_cursor(Movement::Up, page),
            KeyCode::Down => self.session.move_cursor(Movement::Down, page),
            KeyCode::Left => self.session.move_cursor(Movement::Left, page),
            KeyCode::Right => self.session.move_cursor(Movement::Right, page),
            KeyCode::PageUp => self.session.move_cursor(Movement::PageUp, page),
            KeyCode::PageDown => self.session.move_cursor(Movement::PageDown, page),
            KeyCode::Home => self.session.move_cursor(Movement::Home, page),
            KeyCode::End => self.session.move_cursor(Movement::End, page),
            KeyCode::Char(byte) if !key.modifiers.contains(Modifiers::ALT) => {
                self.session.insert_char(byte);
            }
            KeyCode::Char(_) | KeyCode::Escape => {}
        }
        Action::Continue
    }

    fn handle_ctrl(&mut self, letter: u8) -> Action {
        match letter {
            b'q' => return Action::Quit,
            b'o' => self.save(),
            b'w' => {
                self.session.commit_history();
                self.prompt = Some(Vec::new());
            }
            b'u' => {
                if !self.session.undo() {
                    self.set_message("Already at oldest change");
                }
            }
            b'r' => {
                if !self.session.redo() {
                    self.set_message("Already at newest change");
                }
            }
            b'e' => self.session.move_cursor(Movement::LineEnd, self.view.rows),
            _ => {}
        }
        Action::Continue
    }

    // ── Saving ─────────────────────────────────────────────────────────

    fn save(&mut self) {
        let msg = match self.session.save() {
            Ok(bytes) => format!("{bytes} bytes written to disk"),
            Err(err) => format!("Can't save! {err}"),
        };
        self.set_message(msg);
    }

    fn save_as(&mut self, name: &[u8]) {
        if name.is_empty() {
            self.set_message("Save aborted: no file name");
            return;
        }
        let path = PathBuf::from(String::from_utf8_lossy(name).into_owned());
        let msg = match self.session.save_as(path) {
            Ok(bytes) => format!("{bytes} bytes written to disk"),
            Err(err) => format!("Can't save! {err}"),
        };
        self.set_message(msg);
    }

    /// Keys while the save-as prompt owns the message bar.
    fn handle_prompt(&mut self, key: &KeyEvent) -> Action {
        let Some(mut name) = self.prompt.take() else {
            return Action::Continue;
        };
        let limit = self.session.options().max_file_name;

        match key.code {
            KeyCode::Char(b'q') if key.modifiers.contains(Modifiers::CTRL) => {
                return Action::Quit;
            }
            KeyCode::Escape => {
                self.message = None;
                return Action::Continue;
            }
            KeyCode::Enter => {
                self.save_as(&name);
                return Action::Continue;
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(byte @ 0x20..=0x7E) if key.modifiers.is_empty() => {
                if name.len() >= limit {
                    self.set_message(format!("File name can not exceed {limit} characters"));
                    return Action::Continue;
                }
                name.push(byte);
            }
            _ => {}
        }
        self.prompt = Some(name);
        Action::Continue
    }

    // ── Drawing ────────────────────────────────────────────────────────

    fn draw_rows(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let buf = self.session.buffer();
        let empty_unnamed =
            self.session.file_name().is_none() && buf.row_count() == 1 && buf.row_len(0) == 0;

        for y in 0..self.view.rows {
            let line = y + self.view.rowoff;
            if let Some(row) = buf.row(line) {
                let render = row.render().get(self.view.coloff..).unwrap_or_default();
                out.write_all(&render[..render.len().min(self.view.cols)])?;
            } else if empty_unnamed && y == self.view.rows / 3 {
                out.write_all(&welcome_line(self.view.cols))?;
            } else {
                out.write_all(b"~")?;
            }
            ansi::clear_line(out)?;
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    fn draw_status_bar(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let limit = self.session.options().max_file_name;
        let name = self.session.file_name().map_or_else(
            || NO_NAME.to_string(),
            |path| path.display().to_string().chars().take(limit).collect(),
        );
        let modified = if self.session.is_dirty() { " (modified)" } else { "" };
        let left = format!(
            "{name} - {} lines{modified}",
            self.session.buffer().row_count()
        );
        let cursor = self.session.cursor();
        let right = format!("{},{}", cursor.line() + 1, cursor.rx() + 1);

        ansi::inverse(out)?;
        out.write_all(&fit_status(left.as_bytes(), right.as_bytes(), self.view.cols))?;
        ansi::reset(out)?;
        out.write_all(b"\r\n")
    }

    fn draw_message_bar(&self, out: &mut Vec<u8>) -> io::Result<()> {
        ansi::clear_line(out)?;
        let text: Vec<u8> = match (&self.prompt, &self.message) {
            (Some(name), _) => [PROMPT_LABEL.as_bytes(), name].concat(),
            (None, Some(msg)) => msg.text.as_bytes().to_vec(),
            (None, None) => return Ok(()),
        };
        out.write_all(&text[..text.len().min(self.view.cols)])
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        if self.prompt.is_some() {
            self.handle_prompt(key)
        } else {
            self.handle_key(key)
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.view.resize(size);
    }

    fn on_tick(&mut self) -> bool {
        if self.prompt.is_none()
            && self
                .message
                .as_ref()
                .is_some_and(|msg| msg.is_expired(Instant::now()))
        {
            self.message = None;
            return true;
        }
        false
    }

    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()> {
        self.view.resize(size);
        let cursor = self.session.cursor();
        self.view.scroll(
            cursor.line(),
            cursor.rx(),
            self.session.buffer().row_count(),
            self.session.options().scroll_off,
        );

        self.draw_rows(out)?;
        self.draw_status_bar(out)?;
        self.draw_message_bar(out)
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        let (x, y) = if let Some(name) = &self.prompt {
            let x = (PROMPT_LABEL.len() + name.len()).min(self.view.cols.saturating_sub(1));
            (x, self.view.rows + 1)
        } else {
            let cursor = self.session.cursor();
            (
                cursor.rx().checked_sub(self.view.coloff)?,
                cursor.line().checked_sub(self.view.rowoff)?,
            )
        };
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }
}

// ─── Command line ───────────────────────────────────────────────────────────

/// `ked [-c name=value]... [FILE]`
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    file: Option<PathBuf>,
    directives: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => {
                let directive = args
                    .next()
                    .ok_or_else(|| "-c needs a name=value argument".to_string())?;
                parsed.directives.push(directive);
            }
            "-h" | "--help" => return Err(usage()),
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(format!("unknown flag '{s}'\n{}", usage()));
            }
            _ if parsed.file.is_some() => {
                return Err(format!("only one file can be edited\n{}", usage()));
            }
            _ => parsed.file = Some(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn usage() -> String {
    "usage: ked [-c name=value]... [FILE]".to_string()
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send tracing output to the file named by `KED_LOG`, if any.
fn init_tracing() {
    let Some(path) = env::var_os(LOG_ENV) else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("ked: can't open log file {}: {err}", PathBuf::from(path).display());
            return;
        }
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("ked: {msg}");
    process::exit(1);
}

fn main() {
    init_tracing();

    let args = parse_args(env::args().skip(1)).unwrap_or_else(|msg| fail(msg));

    let mut options = Options::from_env();
    if let Err(err) = options.apply_all(&args.directives) {
        fail(err);
    }
    info!(%options, "starting");

    let session = match &args.file {
        Some(path) => Session::open(path, options)
            .unwrap_or_else(|err| fail(format!("{}: {err}", path.display()))),
        None => Session::new(options),
    };
    let mut editor = Editor::new(session);

    let mut event_loop = EventLoop::new()
        .unwrap_or_else(|err| fail(format!("failed to initialize terminal: {err}")));

    if let Err(err) = event_loop.run(&mut editor) {
        error!(%err, "terminal failure");
        fail(err);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ked_core::Buffer;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SIZE: Size = Size { cols: 40, rows: 12 };

    // ── Helpers ───────────────────────────────────────────────────────────

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn type_str(editor: &mut Editor, text: &str) {
        for byte in text.bytes() {
            editor.on_key(&key(KeyCode::Char(byte)));
        }
    }

    fn editor_with(text: &str) -> Editor {
        editor_with_options(text, Options::default())
    }

    fn editor_with_options(text: &str, options: Options) -> Editor {
        let buffer = Buffer::from_text(text, options.tab_width);
        let mut editor = Editor::new(Session::with_buffer(buffer, options));
        editor.on_resize(SIZE);
        editor
    }

    fn lines(editor: &Editor) -> Vec<String> {
        editor.session.buffer().text_lines()
    }

    fn frame(editor: &mut Editor) -> String {
        let mut out = Vec::new();
        editor.paint(&mut out, SIZE).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    // ── Key dispatch ──────────────────────────────────────────────────────

    #[test]
    fn typing_and_undo_redo_keys() {
        let mut e = editor_with("hello");
        e.on_key(&key(KeyCode::End));
        type_str(&mut e, " world");
        assert_eq!(lines(&e), vec!["hello world"]);

        e.on_key(&KeyEvent::ctrl(b'u'));
        assert_eq!(lines(&e), vec!["hello"]);
        e.on_key(&KeyEvent::ctrl(b'r'));
        assert_eq!(lines(&e), vec!["hello world"]);
    }

    #[test]
    fn undo_with_empty_history_reports() {
        let mut e = editor_with("x");
        e.on_key(&KeyEvent::ctrl(b'u'));
        assert_eq!(
            e.message.as_ref().map(|m| m.text.as_str()),
            Some("Already at oldest change")
        );
        e.on_key(&KeyEvent::ctrl(b'r'));
        assert_eq!(
            e.message.as_ref().map(|m| m.text.as_str()),
            Some("Already at newest change")
        );
    }

    #[test]
    fn enter_backspace_delete() {
        let mut e = editor_with("abcd");
        e.on_key(&key(KeyCode::Right));
        e.on_key(&key(KeyCode::Right));
        e.on_key(&key(KeyCode::Enter));
        assert_eq!(lines(&e), vec!["ab", "cd"]);

        e.on_key(&key(KeyCode::Backspace));
        assert_eq!(lines(&e), vec!["abcd"]);

        e.on_key(&key(KeyCode::Delete));
        assert_eq!(lines(&e), vec!["abd"]);
    }

    #[test]
    fn tab_is_inserted() {
        let mut e = editor_with("");
        e.on_key(&key(KeyCode::Tab));
        type_str(&mut e, "x");
        assert_eq!(lines(&e), vec!["\tx"]);
        assert_eq!(e.session.cursor().rx(), 5);
    }

    #[test]
    fn alt_chords_and_escape_do_not_edit() {
        let mut e = editor_with("");
        e.on_key(&KeyEvent::new(KeyCode::Char(b'x'), Modifiers::ALT));
        e.on_key(&key(KeyCode::Escape));
        e.on_key(&KeyEvent::ctrl(b'z'));
        assert_eq!(lines(&e), vec![""]);
        assert!(!e.session.is_dirty());
    }

    #[test]
    fn ctrl_q_quits() {
        let mut e = editor_with("");
        assert_eq!(e.on_key(&key(KeyCode::Char(b'q'))), Action::Continue);
        assert_eq!(e.on_key(&KeyEvent::ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn ctrl_e_goes_to_line_end() {
        let mut e = editor_with("abc\nx");
        e.on_key(&KeyEvent::ctrl(b'e'));
        assert_eq!(e.session.cursor().col(), 3);
        assert_eq!(e.session.cursor().line(), 0);
    }

    #[test]
    fn save_without_name_reports() {
        let mut e = editor_with("x");
        e.on_key(&KeyEvent::ctrl(b'o'));
        let msg = e.message.as_ref().map(|m| m.text.clone()).unwrap();
        assert!(msg.contains("No file name"), "{msg}");
    }

    // ── Save-as prompt ────────────────────────────────────────────────────

    #[test]
    fn prompt_escape_cancels() {
        let mut e = editor_with("x");
        e.on_key(&KeyEvent::ctrl(b'w'));
        type_str(&mut e, "abc");
        assert_eq!(e.prompt.as_deref(), Some(&b"abc"[..]));

        e.on_key(&key(KeyCode::Escape));
        assert!(e.prompt.is_none());
        assert!(e.session.file_name().is_none());
        assert_eq!(lines(&e), vec!["x"]);
    }

    #[test]
    fn prompt_backspace_edits_name() {
        let mut e = editor_with("");
        e.on_key(&KeyEvent::ctrl(b'w'));
        type_str(&mut e, "ab");
        e.on_key(&key(KeyCode::Backspace));
        e.on_key(&key(KeyCode::Tab));
        type_str(&mut e, "c");
        assert_eq!(e.prompt.as_deref(), Some(&b"ac"[..]));
    }

    #[test]
    fn prompt_enforces_name_limit() {
        let mut e = editor_with("");
        e.on_key(&KeyEvent::ctrl(b'w'));
        type_str(&mut e, &"n".repeat(40));
        assert!(e.prompt.is_some());

        type_str(&mut e, "n");
        assert!(e.prompt.is_none());
        assert_eq!(
            e.message.as_ref().map(|m| m.text.as_str()),
            Some("File name can not exceed 40 characters")
        );
    }

    #[test]
    fn prompt_enter_saves_and_binds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let options = Options {
            max_file_name: 4096,
            ..Options::default()
        };
        let mut e = editor_with_options("one\ntwo", options);
        e.on_key(&KeyEvent::ctrl(b'w'));
        type_str(&mut e, path.to_str().unwrap());
        e.on_key(&key(KeyCode::Enter));

        assert!(e.prompt.is_none());
        assert_eq!(std::fs::read(&path).unwrap(), b"one\r\ntwo");
        assert_eq!(e.session.file_name(), Some(path.as_path()));
        assert_eq!(
            e.message.as_ref().map(|m| m.text.as_str()),
            Some("8 bytes written to disk")
        );

        // Ctrl-O now writes to the bound file.
        type_str(&mut e, "!");
        e.on_key(&KeyEvent::ctrl(b'o'));
        assert_eq!(std::fs::read(&path).unwrap(), b"!one\r\ntwo");
        assert!(!e.session.is_dirty());
    }

    #[test]
    fn prompt_enter_with_empty_name_aborts() {
        let mut e = editor_with("");
        e.on_key(&KeyEvent::ctrl(b'w'));
        e.on_key(&key(KeyCode::Enter));
        assert!(e.prompt.is_none());
        assert!(e.session.file_name().is_none());
    }

    #[test]
    fn prompt_moves_cursor_to_message_bar() {
        let mut e = editor_with("");
        frame(&mut e);
        e.on_key(&KeyEvent::ctrl(b'w'));
        type_str(&mut e, "ab");
        let len = u16::try_from(PROMPT_LABEL.len()).unwrap();
        assert_eq!(e.cursor(), Some((len + 2, SIZE.rows - 1)));
    }

    // ── Viewport ──────────────────────────────────────────────────────────

    fn view(rows: usize, cols: usize) -> Viewport {
        Viewport {
            rows,
            cols,
            ..Viewport::default()
        }
    }

    #[test]
    fn short_buffer_never_scrolls() {
        let mut v = view(10, 80);
        v.rowoff = 3;
        v.scroll(5, 0, 8, 2);
        assert_eq!(v.rowoff, 0);
    }

    #[test]
    fn scroll_keeps_margin_below() {
        let mut v = view(10, 80);
        v.scroll(7, 0, 100, 2);
        assert_eq!(v.rowoff, 0);
        v.scroll(8, 0, 100, 2);
        assert_eq!(v.rowoff, 1);
        v.scroll(50, 0, 100, 2);
        assert_eq!(v.rowoff, 43);
    }

    #[test]
    fn scroll_keeps_margin_above() {
        let mut v = view(10, 80);
        v.rowoff = 40;
        v.scroll(41, 0, 100, 2);
        assert_eq!(v.rowoff, 39);
        v.scroll(1, 0, 100, 2);
        assert_eq!(v.rowoff, 0);
    }

    #[test]
    fn scroll_stops_at_buffer_end() {
        let mut v = view(10, 80);
        v.scroll(99, 0, 100, 8);
        assert_eq!(v.rowoff, 90);
    }

    #[test]
    fn margin_is_capped_by_half_screen() {
        let mut v = view(4, 80);
        v.scroll(3, 0, 100, 8);
        // Margin shrinks to 1 on a 4-row screen.
        assert_eq!(v.rowoff, 1);
    }

    #[test]
    fn horizontal_scroll() {
        let mut v = view(10, 20);
        v.scroll(0, 25, 1, 0);
        assert_eq!(v.coloff, 6);
        v.scroll(0, 10, 1, 0);
        assert_eq!(v.coloff, 6);
        v.scroll(0, 2, 1, 0);
        assert_eq!(v.coloff, 2);
    }

    #[test]
    fn resize_reserves_chrome() {
        let mut v = Viewport::default();
        v.resize(Size { cols: 80, rows: 24 });
        assert_eq!((v.rows, v.cols), (22, 80));
        v.resize(Size { cols: 1, rows: 1 });
        assert_eq!(v.rows, 0);
    }

    // ── Status bar ────────────────────────────────────────────────────────

    #[test]
    fn status_fits_both_sides() {
        assert_eq!(fit_status(b"name", b"1,1", 10), b"name   1,1".to_vec());
    }

    #[test]
    fn status_truncates_left_first() {
        assert_eq!(fit_status(b"longname", b"12,3", 8), b"lon 12,3".to_vec());
        assert_eq!(fit_status(b"name", b"12,3", 4), b"12,3".to_vec());
        assert_eq!(fit_status(b"name", b"12,3", 2), b"12".to_vec());
    }

    #[test]
    fn welcome_is_centered() {
        let line = welcome_line(60);
        let text = format!("ked editor -- version {VERSION}");
        assert!(line.starts_with(b"~ "));
        assert!(line.ends_with(text.as_bytes()));
        assert_eq!(line.len(), (60 - text.len()) / 2 + text.len());
    }

    // ── Painting ──────────────────────────────────────────────────────────

    #[test]
    fn paint_empty_unnamed_buffer() {
        let mut e = editor_with("");
        let s = frame(&mut e);
        assert!(s.contains("ked editor -- version"));
        assert!(s.contains("[No Name] - 1 lines"));
        assert!(s.contains("Ctrl-Q quit"));
        assert_eq!(s.matches("\r\n").count(), usize::from(SIZE.rows) - 1);
    }

    #[test]
    fn paint_rows_status_and_cursor() {
        let mut e = editor_with("\tab\ncd");
        e.on_key(&key(KeyCode::Right));
        let s = frame(&mut e);
        assert!(s.starts_with("    ab\x1b[K\r\ncd\x1b[K\r\n~\x1b[K\r\n"));
        assert!(!s.contains("version"));
        assert!(s.contains("1,5"));
        assert_eq!(e.cursor(), Some((4, 0)));

        type_str(&mut e, "z");
        let s = frame(&mut e);
        assert!(s.contains("2 lines (modified)"));
    }

    #[test]
    fn paint_follows_cursor_down() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut e = editor_with(&text);
        e.on_key(&key(KeyCode::End));
        let s = frame(&mut e);
        // 10 text rows on a 12-row screen: rows 20..30 are visible.
        assert!(s.starts_with("20\x1b[K\r\n"));
        assert_eq!(e.cursor(), Some((2, 9)));
    }

    #[test]
    fn expired_message_is_cleared_on_tick() {
        let mut e = editor_with("");
        assert!(!e.on_tick());
        e.message = Some(Message {
            text: "old".into(),
            shown_at: Instant::now().checked_sub(MESSAGE_TIMEOUT).unwrap(),
        });
        assert!(e.on_tick());
        assert!(e.message.is_none());
        assert!(!e.on_tick());
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(ToString::to_string))
    }

    #[test]
    fn args_file_and_directives() {
        let parsed = args(&["-c", "tw=8", "notes.txt", "-c", "so=2"]).unwrap();
        assert_eq!(parsed.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(parsed.directives, vec!["tw=8", "so=2"]);

        let mut options = Options::default();
        options.apply_all(&parsed.directives).unwrap();
        assert_eq!(options.tab_width, 8);
        assert_eq!(options.scroll_off, 2);
    }

    #[test]
    fn args_errors() {
        assert!(args(&["-c"]).is_err());
        assert!(args(&["-x"]).is_err());
        assert!(args(&["a", "b"]).is_err());
        assert_eq!(args(&[]).unwrap(), Args::default());
        assert_eq!(args(&["-"]).unwrap().file, Some(PathBuf::from("-")));
    }
}
