//! Block model.
//!
//! A [`Block`] is one unit of page content: an id, a [`BlockKind`] carrying
//! the variant tag plus any variant-specific state, and the text payload.
//!
//! State that belongs to a variant the block is *not* currently in (a todo's
//! check mark, a toggle's hidden detail text) is kept on the block as dormant
//! data. It is not rendered, but converting back to that variant restores it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a block within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generate a fresh, never-reused id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of block kinds, without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletItem,
    NumberedItem,
    TodoItem,
    Quote,
    Toggle,
}

impl Variant {
    pub const ALL: [Self; 9] = [
        Self::Text,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::BulletItem,
        Self::NumberedItem,
        Self::TodoItem,
        Self::Quote,
        Self::Toggle,
    ];

    pub const fn is_heading(self) -> bool {
        matches!(self, Self::Heading1 | Self::Heading2 | Self::Heading3)
    }
}

/// Variant tag plus the state only that variant uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletItem,
    NumberedItem,
    TodoItem {
        checked: bool,
    },
    Quote,
    Toggle {
        expanded: bool,
        #[serde(default)]
        detail: String,
    },
}

impl BlockKind {
    /// A valid default kind for `variant`.
    pub const fn default_for(variant: Variant) -> Self {
        match variant {
            Variant::Text => Self::Text,
            Variant::Heading1 => Self::Heading1,
            Variant::Heading2 => Self::Heading2,
            Variant::Heading3 => Self::Heading3,
            Variant::BulletItem => Self::BulletItem,
            Variant::NumberedItem => Self::NumberedItem,
            Variant::TodoItem => Self::TodoItem { checked: false },
            Variant::Quote => Self::Quote,
            Variant::Toggle => Self::Toggle {
                expanded: true,
                detail: String::new(),
            },
        }
    }

    pub const fn variant(&self) -> Variant {
        match self {
            Self::Text => Variant::Text,
            Self::Heading1 => Variant::Heading1,
            Self::Heading2 => Variant::Heading2,
            Self::Heading3 => Variant::Heading3,
            Self::BulletItem => Variant::BulletItem,
            Self::NumberedItem => Variant::NumberedItem,
            Self::TodoItem { .. } => Variant::TodoItem,
            Self::Quote => Variant::Quote,
            Self::Toggle { .. } => Variant::Toggle,
        }
    }
}

/// Variant state parked while the block is some other variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Dormant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Dormant {
    const fn is_empty(&self) -> bool {
        self.checked.is_none() && self.detail.is_none()
    }
}

/// A single content unit of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    kind: BlockKind,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Dormant::is_empty")]
    dormant: Dormant,
}

impl Block {
    /// Create a block with a fresh id and empty content.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::new(),
            kind,
            content: String::new(),
            dormant: Dormant::default(),
        }
    }

    /// An empty plain text block.
    pub fn text() -> Self {
        Self::new(BlockKind::Text)
    }

    /// A default block for `variant`.
    pub fn default_for(variant: Variant) -> Self {
        Self::new(BlockKind::default_for(variant))
    }

    /// Builder-style content setter, mostly for seed data and tests.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub const fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub const fn variant(&self) -> Variant {
        self.kind.variant()
    }

    /// Check state, only for todo items.
    pub const fn checked(&self) -> Option<bool> {
        match self.kind {
            BlockKind::TodoItem { checked } => Some(checked),
            _ => None,
        }
    }

    /// Expansion state, only for toggles.
    pub const fn expanded(&self) -> Option<bool> {
        match self.kind {
            BlockKind::Toggle { expanded, .. } => Some(expanded),
            _ => None,
        }
    }

    /// Hidden detail text, only for toggles.
    pub fn detail_text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Toggle { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Whether the block carries any detail text, active or dormant.
    pub fn has_detail_text(&self) -> bool {
        let active = self.detail_text().is_some_and(|d| !d.is_empty());
        let dormant = self.dormant.detail.as_deref().is_some_and(|d| !d.is_empty());
        active || dormant
    }

    /// Change the variant in place.
    ///
    /// `content` is never touched. Entering a toggle always expands it and
    /// brings back parked detail text; entering a todo restores its parked
    /// check state.
    pub fn convert(&mut self, variant: Variant) {
        match std::mem::replace(&mut self.kind, BlockKind::Text) {
            BlockKind::TodoItem { checked } => self.dormant.checked = Some(checked),
            BlockKind::Toggle { detail, .. } => self.dormant.detail = Some(detail),
            _ => {}
        }
        self.kind = match variant {
            Variant::TodoItem => BlockKind::TodoItem {
                checked: self.dormant.checked.take().unwrap_or(false),
            },
            Variant::Toggle => BlockKind::Toggle {
                expanded: true,
                detail: self.dormant.detail.take().unwrap_or_default(),
            },
            other => BlockKind::default_for(other),
        };
    }

    /// Consuming form of [`Block::convert`].
    #[must_use]
    pub fn converted(mut self, variant: Variant) -> Self {
        self.convert(variant);
        self
    }

    /// Flip the check mark. Returns `false` when the block is not a todo.
    pub fn toggle_checked(&mut self) -> bool {
        if let BlockKind::TodoItem { checked } = &mut self.kind {
            *checked = !*checked;
            return true;
        }
        false
    }

    /// Flip the expansion state. Returns `false` when the block is not a toggle.
    pub fn toggle_expanded(&mut self) -> bool {
        if let BlockKind::Toggle { expanded, .. } = &mut self.kind {
            *expanded = !*expanded;
            return true;
        }
        false
    }

    /// Replace the detail text. Returns `false` when the block is not a toggle.
    pub fn set_detail_text(&mut self, text: impl Into<String>) -> bool {
        if let BlockKind::Toggle { detail, .. } = &mut self.kind {
            *detail = text.into();
            return true;
        }
        false
    }

    /// Structural copy under a new id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: BlockId::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_is_empty_with_unique_id() {
        let a = Block::text();
        let b = Block::text();
        assert!(a.content.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.variant(), Variant::Text);
    }

    #[test]
    fn test_default_kinds_match_variant() {
        for variant in Variant::ALL {
            assert_eq!(BlockKind::default_for(variant).variant(), variant);
        }
    }

    #[test]
    fn test_variant_specific_accessors() {
        let todo = Block::default_for(Variant::TodoItem);
        assert_eq!(todo.checked(), Some(false));
        assert_eq!(todo.expanded(), None);
        assert_eq!(todo.detail_text(), None);

        let toggle = Block::default_for(Variant::Toggle);
        assert_eq!(toggle.checked(), None);
        assert_eq!(toggle.expanded(), Some(true));
        assert_eq!(toggle.detail_text(), Some(""));
    }

    #[test]
    fn test_convert_preserves_content() {
        let block = Block::text().with_content("Hello").converted(Variant::Heading2);
        assert_eq!(block.variant(), Variant::Heading2);
        assert_eq!(block.content, "Hello");
    }

    #[test]
    fn test_convert_to_toggle_expands() {
        let mut block = Block::default_for(Variant::Toggle);
        block.toggle_expanded();
        assert_eq!(block.expanded(), Some(false));
        block.convert(Variant::Toggle);
        assert_eq!(block.expanded(), Some(true));
    }

    #[test]
    fn test_toggle_detail_survives_round_trip() {
        let mut block = Block::default_for(Variant::Toggle).with_content("Title");
        block.set_detail_text("hidden");
        block.convert(Variant::Text);
        assert_eq!(block.detail_text(), None);
        assert!(block.has_detail_text());

        block.convert(Variant::Toggle);
        assert_eq!(block.detail_text(), Some("hidden"));
        assert_eq!(block.content, "Title");
    }

    #[test]
    fn test_todo_check_survives_round_trip() {
        let mut block = Block::default_for(Variant::TodoItem);
        block.toggle_checked();
        block.convert(Variant::BulletItem);
        assert_eq!(block.checked(), None);
        block.convert(Variant::TodoItem);
        assert_eq!(block.checked(), Some(true));
    }

    #[test]
    fn test_flag_toggles_ignore_other_variants() {
        let mut block = Block::text();
        assert!(!block.toggle_checked());
        assert!(!block.toggle_expanded());
        assert!(!block.set_detail_text("x"));
        assert_eq!(block, block.clone());
    }

    #[test]
    fn test_duplicate_gets_new_id_same_fields() {
        let mut block = Block::default_for(Variant::TodoItem).with_content("Buy domain");
        block.toggle_checked();
        let copy = block.duplicate();
        assert_ne!(copy.id, block.id);
        assert_eq!(copy.content, block.content);
        assert_eq!(copy.kind(), block.kind());
    }

    #[test]
    fn test_serde_shape_is_flat() {
        let block = Block::default_for(Variant::TodoItem)
            .with_id("b4")
            .with_content("Set up SSL");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["id"], "b4");
        assert_eq!(json["type"], "todo_item");
        assert_eq!(json["checked"], false);
        assert_eq!(json["content"], "Set up SSL");
        assert!(json.get("dormant").is_none());

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_serde_keeps_dormant_detail() {
        let mut block = Block::default_for(Variant::Toggle);
        block.set_detail_text("kept");
        block.convert(Variant::Quote);
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
        assert!(back.has_detail_text());
    }
}
