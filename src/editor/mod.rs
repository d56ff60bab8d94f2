//! In-place text editing for block fields.
//!
//! Provides a string-backed field with caret management, designed for
//! integration into the TEA architecture: the controller builds a field from
//! stored content, applies one edit, and writes the text back.

mod field;

pub use field::{Cursor, TextField, cursor_at, offset_at};
