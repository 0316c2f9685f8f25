// SPDX-License-Identifier: MIT
//
// ked-term — Terminal plumbing for the ked editor.
//
// No TUI framework: escape sequence writers, a raw-mode terminal handle
// that always restores itself, a byte-level key decoder, and a
// read-dispatch-repaint loop. Each frame is composed into a byte buffer and
// written in one go.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod terminal;

pub use event_loop::{Action, App, EventLoop};
pub use input::{KeyCode, KeyEvent, Modifiers, Parser};
pub use terminal::{Size, Terminal};
