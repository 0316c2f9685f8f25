//! Editing session — one buffer, its cursor, its history and its file.
//!
//! `Session` is the only type a front-end needs. Each key maps to one
//! method; the session records the edit in [`History`] and applies it
//! through the mutation engine, in that order, so the history always sees
//! the buffer as it was before the edit.
//!
//! Cursor movement closes the in-progress undo step: typing, moving and
//! typing again gives two steps.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::action::ActionKind;
use crate::buffer::Buffer;
use crate::cursor::{Cursor, Movement};
use crate::error::{Error, Result};
use crate::history::History;
use crate::io;
use crate::options::Options;
use crate::position::Position;

/// Whether `byte` is inserted by typing it.
#[inline]
#[must_use]
pub const fn is_insertable(byte: u8) -> bool {
    byte == b'\t' || !byte.is_ascii_control()
}

/// A single editing session.
#[derive(Debug)]
pub struct Session {
    buffer: Buffer,
    cursor: Cursor,
    history: History,
    options: Options,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    // -- Construction -------------------------------------------------------

    /// An empty, unnamed session.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_buffer(Buffer::new(options.tab_width), options)
    }

    /// An unnamed session over an existing buffer.
    #[must_use]
    pub fn with_buffer(buffer: Buffer, options: Options) -> Self {
        let history = History::new(options.max_history, options.max_action_time());
        Self {
            buffer,
            cursor: Cursor::new(),
            history,
            options,
            path: None,
            dirty: false,
        }
    }

    /// Open `path`, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file can be neither read nor created.
    pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let path = path.as_ref();
        let buffer = io::load(path, options.tab_width)?;
        let mut session = Self::with_buffer(buffer, options);
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    // -- Access -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The file this session saves to, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Modified since the last open or save.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    // -- Editing ------------------------------------------------------------

    /// Type one byte at the cursor. Control bytes other than tab are
    /// ignored; returns whether the byte was inserted.
    pub fn insert_char(&mut self, byte: u8) -> bool {
        if !is_insertable(byte) {
            return false;
        }
        let pos = self.cursor.position();
        self.history
            .record_chars(ActionKind::InsertCharBefore, &[byte], pos, Instant::now());
        self.buffer
            .insert_char(pos.line, pos.col, byte, &mut self.cursor);
        self.dirty = true;
        true
    }

    /// Split the row at the cursor (Enter).
    pub fn insert_newline(&mut self) {
        let pos = self.cursor.position();
        self.history
            .record_line(ActionKind::InsertLineBefore, pos, Instant::now());
        self.buffer
            .split_row_before(pos.line, pos.col, &mut self.cursor);
        self.dirty = true;
    }

    /// Remove the byte before the cursor, joining rows at column 0.
    pub fn backspace(&mut self) {
        let pos = self.cursor.position();
        let now = Instant::now();

        if pos.col == 0 {
            if pos.line == 0 {
                return;
            }
            let join = Position::new(pos.line - 1, self.buffer.row_len(pos.line - 1));
            self.history
                .record_line(ActionKind::RemoveLineBefore, join, now);
        } else {
            let Some(byte) = self.buffer.byte_at(Position::new(pos.line, pos.col - 1)) else {
                return;
            };
            self.history
                .record_chars(ActionKind::RemoveCharBefore, &[byte], pos, now);
        }

        self.buffer
            .remove_chars(pos.line, pos.col, 1, &mut self.cursor);
        self.dirty = true;
    }

    /// Remove the byte under the cursor, joining rows at the row end.
    pub fn delete(&mut self) {
        let pos = self.cursor.position();
        let now = Instant::now();

        if let Some(byte) = self.buffer.byte_at(pos) {
            self.history
                .record_chars(ActionKind::RemoveCharAfter, &[byte], pos, now);
        } else if pos.line < self.buffer.last_line() {
            self.history
                .record_line(ActionKind::RemoveLineAfter, pos, now);
        } else {
            return;
        }

        self.buffer
            .remove_chars(pos.line, pos.col, -1, &mut self.cursor);
        self.dirty = true;
    }

    /// Move the cursor. `page` is the screen height used by page moves.
    pub fn move_cursor(&mut self, movement: Movement, page: usize) {
        self.history.commit();
        self.cursor.apply(movement, &self.buffer, page);
    }

    /// Close the in-progress undo step.
    pub fn commit_history(&mut self) {
        self.history.commit();
    }

    /// Undo one step. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.buffer, &mut self.cursor);
        self.dirty |= done;
        done
    }

    /// Redo one step. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.buffer, &mut self.cursor);
        self.dirty |= done;
        done
    }

    // -- Files --------------------------------------------------------------

    /// Write the buffer back to its file. Returns bytes written.
    ///
    /// # Errors
    ///
    /// [`Error::NoFileName`] for an unnamed session, [`Error::FileMissing`]
    /// if the file was removed, [`Error::Io`] otherwise.
    pub fn save(&mut self) -> Result<usize> {
        let Some(path) = self.path.clone() else {
            return Err(Error::NoFileName);
        };
        let result = io::save(&path, &self.buffer);
        self.finish_save(path, result)
    }

    /// Write the buffer to `path` and bind the session to it. Returns bytes
    /// written.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be created or written. The previous
    /// file name is kept on failure.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        let path = path.into();
        let result = io::save_as(&path, &self.buffer);
        self.finish_save(path, result)
    }

    fn finish_save(&mut self, path: PathBuf, result: Result<usize>) -> Result<usize> {
        match result {
            Ok(bytes) => {
                info!(path = %path.display(), bytes, "saved");
                self.path = Some(path);
                self.dirty = false;
                Ok(bytes)
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "save failed");
                Err(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
