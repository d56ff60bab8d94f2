//! Documents and the transform engine.
//!
//! This module handles:
//! - The document type and its serialized form
//! - Pure structural transforms over a document's block list
//! - Detection of the slash and markdown typing triggers

mod shortcuts;
pub mod transform;
mod types;

pub use shortcuts::{detect_markdown_shortcut, detect_slash_trigger};
pub use transform::{
    append_block, delete_block, duplicate_block, insert_block_after, set_block_variant, set_icon,
    set_title, toggle_checked, toggle_expanded, update_block_content, update_detail_text,
};
pub use types::{DEFAULT_ICON, Document, DocumentId, UNTITLED};
