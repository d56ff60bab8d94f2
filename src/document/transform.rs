//! Pure document transforms.
//!
//! Every function takes the current document by reference and returns a new
//! one. Unknown ids never fail: the result is simply equal to the input.
//! Timestamps are left alone; the controller stamps them when it commits.

use crate::block::{Block, BlockId, Variant};

use super::Document;

/// Insert an empty text block right after `after`.
///
/// When `after` is not in the document the block is appended at the end.
/// Returns the new document and the id of the inserted block.
pub fn insert_block_after(doc: &Document, after: &BlockId) -> (Document, BlockId) {
    let mut next = doc.clone();
    let block = Block::text();
    let id = block.id.clone();
    let at = doc.block_index(after).map_or(next.blocks.len(), |i| i + 1);
    next.blocks.insert(at, block);
    (next, id)
}

/// Append an empty text block at the end.
pub fn append_block(doc: &Document) -> (Document, BlockId) {
    let mut next = doc.clone();
    let block = Block::text();
    let id = block.id.clone();
    next.blocks.push(block);
    (next, id)
}

/// Remove a block.
///
/// The only empty block of a document is never removed.
pub fn delete_block(doc: &Document, id: &BlockId) -> Document {
    if is_sole_empty_block(doc) {
        return doc.clone();
    }
    let mut next = doc.clone();
    next.blocks.retain(|b| &b.id != id);
    next
}

fn is_sole_empty_block(doc: &Document) -> bool {
    matches!(doc.blocks.as_slice(), [only] if only.content.is_empty())
}

/// Copy a block under a new id, placing it right after the source.
pub fn duplicate_block(doc: &Document, id: &BlockId) -> (Document, Option<BlockId>) {
    let Some(idx) = doc.block_index(id) else {
        return (doc.clone(), None);
    };
    let mut next = doc.clone();
    let copy = next.blocks[idx].duplicate();
    let new_id = copy.id.clone();
    next.blocks.insert(idx + 1, copy);
    (next, Some(new_id))
}

/// Convert a block to `variant`, optionally replacing its content.
///
/// Conversion keeps dormant variant state; see [`Block::convert`].
pub fn set_block_variant(
    doc: &Document,
    id: &BlockId,
    variant: Variant,
    content_override: Option<&str>,
) -> Document {
    with_block(doc, id, |block| {
        block.convert(variant);
        if let Some(content) = content_override {
            block.content = content.to_string();
        }
    })
}

pub fn update_block_content(doc: &Document, id: &BlockId, text: &str) -> Document {
    with_block(doc, id, |block| block.content = text.to_string())
}

/// Replace a toggle's detail text. Other variants are left alone.
pub fn update_detail_text(doc: &Document, id: &BlockId, text: &str) -> Document {
    with_block(doc, id, |block| {
        block.set_detail_text(text);
    })
}

pub fn toggle_checked(doc: &Document, id: &BlockId) -> Document {
    with_block(doc, id, |block| {
        block.toggle_checked();
    })
}

pub fn toggle_expanded(doc: &Document, id: &BlockId) -> Document {
    with_block(doc, id, |block| {
        block.toggle_expanded();
    })
}

pub fn set_title(doc: &Document, text: &str) -> Document {
    let mut next = doc.clone();
    next.title = text.to_string();
    next
}

pub fn set_icon(doc: &Document, glyph: &str) -> Document {
    let mut next = doc.clone();
    next.icon = glyph.to_string();
    next
}

fn with_block(doc: &Document, id: &BlockId, f: impl FnOnce(&mut Block)) -> Document {
    let mut next = doc.clone();
    if let Some(block) = next.block_mut(id) {
        f(block);
    }
    next
}
