//! Undo/redo history — coalescing edit records with time-boxed groups.
//!
//! Every buffer edit is reported to [`History::record`]. Consecutive edits of
//! the same kind that continue each other (typing a word, holding Backspace)
//! accumulate into one in-progress [`Action`]; that record becomes one undo
//! step once it is committed.
//!
//! A commit happens when:
//!
//! - an edit of a different kind arrives, or one that does not continue the
//!   run (a different row or column)
//! - more than `max_action_time` passed since the previous record
//! - a row is split or joined (line records are never coalesced)
//! - the caller commits explicitly (cursor movement, undo)
//!
//! # Usage
//!
//! ```text
//! history.record_chars(ActionKind::InsertCharBefore, b"a", cursor_pos, now);
//! buffer.insert_char(line, col, b'a', &mut cursor);
//! // ... later
//! history.undo(&mut buffer, &mut cursor);
//! ```
//!
//! Undo and redo never create records. The popped record is replayed in
//! reverse through the mutation engine, flipped to its inverse kind and
//! pushed onto the opposite stack, so the same code path serves both.
//!
//! Any new record discards the redo stack: history is linear.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::action::{Action, ActionKind, ActionStack};
use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::position::Position;

/// Default capacity of each stack.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Default idle time after which the in-progress record is committed.
pub const DEFAULT_MAX_ACTION_TIME: Duration = Duration::from_secs(10);

/// Undo/redo history for one buffer.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: ActionStack,
    redo_stack: ActionStack,
    pending: Action,
    max_action_time: Duration,
    last_record: Option<Instant>,
}

impl History {
    /// Create an empty history. Each stack keeps at most `max_history`
    /// records; a zero `max_action_time` disables the idle commit.
    #[must_use]
    pub fn new(max_history: usize, max_action_time: Duration) -> Self {
        Self {
            undo_stack: ActionStack::new(max_history),
            redo_stack: ActionStack::new(max_history),
            pending: Action::empty(),
            max_action_time,
            last_record: None,
        }
    }

    // -- Recording ----------------------------------------------------------

    /// Record an edit about to be (or just) applied to the buffer.
    ///
    /// `length` is signed: positive for "before" kinds, negative for
    /// "after" kinds. Line kinds ignore `text` and `length` and store a
    /// one-unit sentinel.
    pub fn record(
        &mut self,
        kind: ActionKind,
        text: &[u8],
        length: isize,
        origin: Position,
        now: Instant,
    ) {
        self.redo_stack.clear();

        if self.timed_out(now) {
            debug!("idle timeout, closing undo group");
            self.commit();
        }
        self.last_record = Some(now);

        if kind.is_line() {
            self.commit();
            self.pending
                .set(kind, origin, kind.signed(1), kind.line_text());
            self.commit();
            return;
        }

        if !self.pending.is_empty() && !self.continues(kind, origin) {
            self.commit();
        }

        if self.pending.is_empty() {
            self.pending.set(kind, origin, length, text);
        } else {
            self.pending.append(text, length, 0, 0);
        }
    }

    /// Record a char edit of `bytes`, deriving the signed length from the
    /// kind.
    pub fn record_chars(&mut self, kind: ActionKind, bytes: &[u8], origin: Position, now: Instant) {
        self.record(kind, bytes, kind.signed(bytes.len()), origin, now);
    }

    /// Record a row split or join.
    pub fn record_line(&mut self, kind: ActionKind, origin: Position, now: Instant) {
        self.record(kind, kind.line_text(), kind.signed(1), origin, now);
    }

    /// Close the in-progress record and push it onto the undo stack.
    ///
    /// Backspace runs and after-cursor insert runs accumulate their bytes in
    /// the reverse of buffer order; they are flipped here so every stacked
    /// record holds its text in buffer order.
    pub fn commit(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if matches!(
            self.pending.kind(),
            ActionKind::RemoveCharBefore | ActionKind::InsertCharAfter
        ) {
            let length = self.pending.length();
            let mut text = self.pending.text().to_vec();
            text.reverse();
            self.pending
                .set(self.pending.kind(), self.pending.origin(), length, &text);
        }
        debug!(action = ?self.pending, "commit");
        self.pending.commit(&mut self.undo_stack);
    }

    /// Whether `now` is past the idle limit since the last record.
    fn timed_out(&self, now: Instant) -> bool {
        if self.max_action_time.is_zero() {
            return false;
        }
        self.last_record
            .is_some_and(|last| now.saturating_duration_since(last) >= self.max_action_time)
    }

    /// Whether a char edit of `kind` at `origin` extends the pending run.
    fn continues(&self, kind: ActionKind, origin: Position) -> bool {
        let pending = &self.pending;
        if pending.kind() != kind {
            return false;
        }
        let anchor = pending.origin();
        let n = pending.length().unsigned_abs();
        let expected = match kind {
            ActionKind::InsertCharBefore => Position::new(anchor.line, anchor.col + n),
            ActionKind::RemoveCharBefore => {
                Position::new(anchor.line, anchor.col.saturating_sub(n))
            }
            _ => anchor,
        };
        origin == expected
    }

    // -- Undo / redo --------------------------------------------------------

    /// Undo the most recent step. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self, buf: &mut Buffer, cursor: &mut Cursor) -> bool {
        self.commit();
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };
        debug!(?action, "undo");
        perform(&action, buf, cursor);
        action.flip();
        self.redo_stack.push(action);
        true
    }

    /// Redo the most recently undone step. Returns `false` if there was
    /// nothing to redo.
    ///
    /// An uncommitted edit means the buffer has moved on since the last
    /// undo: the redo stack is discarded instead.
    pub fn redo(&mut self, buf: &mut Buffer, cursor: &mut Cursor) -> bool {
        if !self.pending.is_empty() {
            self.redo_stack.clear();
            return false;
        }
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };
        debug!(?action, "redo");
        perform(&action, buf, cursor);
        action.flip();
        self.undo_stack.push(action);
        true
    }

    /// Drop everything: both stacks and the in-progress record.
    pub fn flush(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.flush();
        self.last_record = None;
    }

    // -- Queries ------------------------------------------------------------

    /// Whether there is something to undo (committed or in progress).
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.pending.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Committed undo steps.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// The in-progress record.
    #[must_use]
    pub const fn pending(&self) -> &Action {
        &self.pending
    }

    #[must_use]
    pub const fn undo_stack(&self) -> &ActionStack {
        &self.undo_stack
    }

    #[must_use]
    pub const fn max_action_time(&self) -> Duration {
        self.max_action_time
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY, DEFAULT_MAX_ACTION_TIME)
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Apply the inverse of `action` to the buffer.
fn perform(action: &Action, buf: &mut Buffer, cursor: &mut Cursor) {
    let origin = action.origin();
    let Position { line, col } = origin;
    let length = action.length();
    let n = length.unsigned_abs();

    match action.kind() {
        ActionKind::InsertCharBefore => buf.remove_chars(line, col + n, length, cursor),
        ActionKind::RemoveCharBefore => {
            buf.insert_before(line, col.saturating_sub(n), action.text(), cursor);
        }
        ActionKind::InsertCharAfter => {
            buf.remove_chars(line, col, length, cursor);
            cursor.place(buf, origin);
        }
        ActionKind::RemoveCharAfter => {
            buf.insert_after(line, col, action.text());
            cursor.place(buf, origin);
        }
        ActionKind::InsertLineBefore => buf.remove_chars(line + 1, 0, 1, cursor),
        ActionKind::RemoveLineBefore => buf.split_row_before(line, col, cursor),
        ActionKind::InsertLineAfter => {
            buf.remove_chars(line, col, -1, cursor);
            cursor.place(buf, origin);
        }
        ActionKind::RemoveLineAfter => {
            buf.split_row_after(line, col);
            cursor.place(buf, origin);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
