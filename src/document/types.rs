//! Core document types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::{Block, BlockId};

/// Glyph used for documents that never picked an icon.
pub const DEFAULT_ICON: &str = "📄";

/// Shown in place of an empty title.
pub const UNTITLED: &str = "Untitled";

/// Stable identifier of a document in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project page: metadata plus an ordered list of blocks.
///
/// Block order is the vector order; there is no separate position field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub last_modified_at: DateTime<Utc>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Document {
    /// A fresh, untitled document holding a single empty text block.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: DocumentId::new(),
            title: String::new(),
            icon: default_icon(),
            last_modified_at: now,
            blocks: vec![Block::text()],
        }
    }

    /// Build a document from existing parts.
    pub fn from_parts(
        title: impl Into<String>,
        icon: impl Into<String>,
        blocks: Vec<Block>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            title: title.into(),
            icon: icon.into(),
            last_modified_at: now,
            blocks,
        }
    }

    /// The title, or a placeholder when it is empty.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub(crate) fn block_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| &b.id == id)
    }

    pub fn block_index(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.block_index(id).is_some()
    }

    /// The block directly before `id`, if any.
    pub fn previous_block(&self, id: &BlockId) -> Option<&Block> {
        let idx = self.block_index(id)?;
        idx.checked_sub(1).and_then(|prev| self.blocks.get(prev))
    }

    /// The block directly after `id`, if any.
    pub fn next_block(&self, id: &BlockId) -> Option<&Block> {
        let idx = self.block_index(id)?;
        self.blocks.get(idx + 1)
    }

    pub fn first_block(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Refresh the modification timestamp.
    pub const fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified_at = now;
    }
}
