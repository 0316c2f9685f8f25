//! Action model — invertible edit records and the bounded stacks that hold
//! them.
//!
//! An [`Action`] describes one edit precisely enough to replay its inverse:
//! what kind of edit it was, where it is anchored, how many bytes it covers
//! and which bytes those were. Undo and redo move the same record between
//! two [`ActionStack`]s, flipping its kind and re-anchoring it on each trip.
//!
//! # Kinds
//!
//! Eight kinds: {insert, remove} × {char, line} × {before, after}.
//!
//! - **before**: the text sits left of / above where the cursor rests
//!   (typing, Backspace). Lengths are positive.
//! - **after**: the text sits right of / below the cursor (Delete).
//!   Lengths are negative.
//!
//! # Anchors
//!
//! | Kind               | anchor                                   |
//! |--------------------|------------------------------------------|
//! | `InsertCharBefore` | start of the inserted run                |
//! | `RemoveCharBefore` | end of the removed run                   |
//! | `InsertCharAfter`  | cursor; the text lies to its right       |
//! | `RemoveCharAfter`  | cursor; the removed text lay to its right|
//! | line kinds         | the split / join point                   |
//!
//! Only the two "before" char kinds change anchor when they flip, because
//! the start of an inserted run is the end of the same run once removed.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::position::Position;

/// Text of a line-insert record.
pub const LINE_INSERT_TEXT: &[u8] = b"\n";

/// Text of a line-remove record.
pub const LINE_REMOVE_TEXT: &[u8] = b"\x08";

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// What an [`Action`] did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    InsertCharBefore,
    InsertCharAfter,
    RemoveCharBefore,
    RemoveCharAfter,
    InsertLineBefore,
    InsertLineAfter,
    RemoveLineBefore,
    RemoveLineAfter,
}

impl ActionKind {
    /// The kind that undoes this one: insert ↔ remove, same unit and side.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::InsertCharBefore => Self::RemoveCharBefore,
            Self::InsertCharAfter => Self::RemoveCharAfter,
            Self::RemoveCharBefore => Self::InsertCharBefore,
            Self::RemoveCharAfter => Self::InsertCharAfter,
            Self::InsertLineBefore => Self::RemoveLineBefore,
            Self::InsertLineAfter => Self::RemoveLineAfter,
            Self::RemoveLineBefore => Self::InsertLineBefore,
            Self::RemoveLineAfter => Self::InsertLineAfter,
        }
    }

    /// Row splits and joins.
    #[must_use]
    pub const fn is_line(self) -> bool {
        matches!(
            self,
            Self::InsertLineBefore
                | Self::InsertLineAfter
                | Self::RemoveLineBefore
                | Self::RemoveLineAfter
        )
    }

    /// Backspace-direction kinds (positive lengths).
    #[must_use]
    pub const fn is_before(self) -> bool {
        matches!(
            self,
            Self::InsertCharBefore
                | Self::RemoveCharBefore
                | Self::InsertLineBefore
                | Self::RemoveLineBefore
        )
    }

    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(
            self,
            Self::InsertCharBefore
                | Self::InsertCharAfter
                | Self::InsertLineBefore
                | Self::InsertLineAfter
        )
    }

    /// Length of a record of this kind covering `count` bytes.
    #[must_use]
    pub fn signed(self, count: usize) -> isize {
        let count = isize::try_from(count).unwrap_or(isize::MAX);
        if self.is_before() { count } else { -count }
    }

    /// Text stored by line records.
    #[must_use]
    pub const fn line_text(self) -> &'static [u8] {
        if self.is_insert() {
            LINE_INSERT_TEXT
        } else {
            LINE_REMOVE_TEXT
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One invertible edit.
///
/// `length == 0` marks the empty record; an empty record carries no text.
#[derive(Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
    origin: Position,
    length: isize,
    text: Vec<u8>,
}

impl Action {
    /// The empty record.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            kind: ActionKind::InsertCharBefore,
            origin: Position::ZERO,
            length: 0,
            text: Vec::new(),
        }
    }

    // -- Access -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Anchor coordinate (see the module table).
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Signed byte count: positive for "before" kinds, negative for "after".
    #[inline]
    #[must_use]
    pub const fn length(&self) -> isize {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    // -- Mutation -----------------------------------------------------------

    /// Overwrite this record with fresh content.
    pub fn set(&mut self, kind: ActionKind, origin: Position, length: isize, text: &[u8]) {
        self.kind = kind;
        self.origin = origin;
        self.length = length;
        self.text.clear();
        self.text.extend_from_slice(text);
    }

    /// Grow the record by `bytes`, add `dlength` to its length and shift its
    /// anchor by `(dx, dy)`. With no bytes and zero `dlength` this only
    /// re-anchors.
    pub fn append(&mut self, bytes: &[u8], dlength: isize, dx: isize, dy: isize) {
        self.text.extend_from_slice(bytes);
        self.length += dlength;
        self.origin = self.origin.offset(dx, dy);
    }

    /// Change the kind, leaving anchor, length and text alone.
    pub const fn convert(&mut self, kind: ActionKind) {
        self.kind = kind;
    }

    /// Anchor shift that goes with flipping this record to its inverse.
    #[must_use]
    pub const fn flip_shift(&self) -> isize {
        match self.kind {
            ActionKind::InsertCharBefore => self.length,
            ActionKind::RemoveCharBefore => -self.length,
            _ => 0,
        }
    }

    /// Flip to the inverse kind and move the anchor to match.
    pub fn flip(&mut self) {
        let dx = self.flip_shift();
        self.convert(self.kind.inverse());
        self.append(&[], 0, dx, 0);
    }

    /// Reset to the empty record.
    pub fn flush(&mut self) {
        self.length = 0;
        self.origin = Position::ZERO;
        self.text.clear();
    }

    /// Push a copy onto `stack` and reset. Does nothing when empty.
    pub fn commit(&mut self, stack: &mut ActionStack) {
        if self.is_empty() {
            return;
        }
        stack.push(self.clone());
        self.flush();
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{:?}[{}]{:?}",
            self.kind,
            self.origin,
            self.length,
            String::from_utf8_lossy(&self.text)
        )
    }
}

// ---------------------------------------------------------------------------
// ActionStack
// ---------------------------------------------------------------------------

/// A bounded stack of committed records.
///
/// Pushing onto a full stack evicts the oldest record. A stack with zero
/// capacity keeps nothing. Storage grows on demand, so `capacity` is only
/// a limit.
#[derive(Debug, Clone)]
pub struct ActionStack {
    items: VecDeque<Action>,
    capacity: usize,
}

impl ActionStack {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Push on top, evicting from the bottom at capacity.
    pub fn push(&mut self, action: Action) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            if let Some(evicted) = self.items.pop_front() {
                debug!(?evicted, "history full, evicting oldest");
            }
        }
        self.items.push_back(action);
    }

    /// Take the top record.
    pub fn pop(&mut self) -> Option<Action> {
        self.items.pop_back()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Action> {
        self.items.back()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Action> + '_ {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
