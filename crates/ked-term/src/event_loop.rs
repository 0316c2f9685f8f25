// SPDX-License-Identifier: MIT
//
// Event loop: the heartbeat of the editor.
//
// Single-threaded and synchronous. Each turn of the loop:
//
//   1. Pick up a pending resize (SIGWINCH sets a flag).
//   2. Give the app a tick (message expiry and the like).
//   3. Repaint if anything changed: the app writes the whole frame into a
//      byte buffer, the loop wraps it in synchronized-output markers, places
//      the cursor, and sends it in one write.
//   4. Block in read() for at most one VTIME period, decode keys, and
//      dispatch them to the app.
//
// Because raw mode uses VMIN=0/VTIME=1, step 4 returns every 100 ms even
// when the user types nothing. That doubles as the ESC timeout: a lone ESC
// left in the parser is flushed as the Escape key on the next empty read.

#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::ansi;
use crate::input::{self, KeyEvent, Parser};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ───────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ──────────────────────────────────────────────────────────────

/// What the app wants after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// The editor side of the loop.
pub trait App {
    /// Handle one key press.
    fn on_key(&mut self, key: &KeyEvent) -> Action;

    /// The terminal changed size. Called once before the first paint too.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every loop turn. Return `true` to request a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Write the whole frame, starting with the cursor at the top-left.
    ///
    /// # Errors
    ///
    /// Only whatever writing to `out` reports.
    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()>;

    /// Screen position `(x, y)` for the hardware cursor, if shown.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

/// Build one complete frame for `app` into `out`.
///
/// The cursor is hidden while drawing and shown at [`App::cursor`] at the
/// end, all inside a synchronized-output block.
///
/// # Errors
///
/// Propagates errors from [`App::paint`].
pub fn compose_frame(app: &mut impl App, size: Size, out: &mut Vec<u8>) -> io::Result<()> {
    out.clear();
    ansi::begin_sync(out)?;
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;
    app.paint(out, size)?;
    if let Some((x, y)) = app.cursor() {
        ansi::cursor_to(out, x, y)?;
        ansi::cursor_show(out)?;
    }
    ansi::end_sync(out)
}

// ─── Event Loop ─────────────────────────────────────────────────────────────

/// Owns the terminal and the key parser, drives an [`App`].
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    frame: Vec<u8>,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal handle cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            frame: Vec::with_capacity(16 * 1024),
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits, restore the terminal.
    ///
    /// # Errors
    ///
    /// Terminal setup, read, or write failures.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();
        app.on_resize(self.terminal.size());

        let result = self.run_inner(app);

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut dirty = true;

        loop {
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                debug!(cols = size.cols, rows = size.rows, "resized");
                app.on_resize(size);
                dirty = true;
            }

            if app.on_tick() {
                dirty = true;
            }

            if dirty {
                compose_frame(app, self.terminal.size(), &mut self.frame)?;
                let mut out = io::stdout().lock();
                out.write_all(&self.frame)?;
                out.flush()?;
                dirty = false;
            }

            let keys = input::read_keys(&mut self.parser, &mut reader)?;
            for key in &keys {
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }
            if !keys.is_empty() {
                dirty = true;
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
