//! # ked-core — Editor core for ked
//!
//! Everything that edits text, with no terminal in sight:
//!
//! - **[`column`]** — char column ↔ render column translation around tabs
//! - **[`row`]** — `Row`, raw bytes plus their tab-expanded render form
//! - **[`position`]** — `Position` (line, col), 0-indexed
//! - **[`buffer`]** — `Buffer`, the row store
//! - **[`edit`]** — the mutation engine: inserts, splits, multi-row removal
//! - **[`cursor`]** — `Cursor` with tab-aware sticky column and `Movement`
//! - **[`action`]** — invertible edit records and bounded stacks
//! - **[`history`]** — coalescing undo/redo on top of the mutation engine
//! - **[`session`]** — `Session`, the buffer + cursor + history + file bundle
//! - **[`io`]** — file load/save
//! - **[`options`]** — option defaults, environment and `name=value` parsing
//! - **[`error`]** — `Error` and `Result`

pub mod action;
pub mod buffer;
pub mod column;
pub mod cursor;
pub mod edit;
pub mod error;
pub mod history;
pub mod io;
pub mod options;
pub mod position;
pub mod row;
pub mod session;

pub use buffer::Buffer;
pub use cursor::{Cursor, Movement};
pub use error::{Error, Result};
pub use options::Options;
pub use position::Position;
pub use session::Session;
