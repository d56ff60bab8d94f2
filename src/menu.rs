//! Command surfaces: the insertion (slash) menu, the block options menu and
//! the page icon picker.
//!
//! A [`MenuState`] is transient overlay state owned by the controller. The
//! menu itself never touches a document; choosing a row yields a
//! [`MenuChoice`] that the controller turns into transforms.

use crate::block::{BlockId, Variant};

/// Screen anchor reported by the shell. Opaque to the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuPosition {
    pub x: u16,
    pub y: u16,
}

impl MenuPosition {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuKind {
    /// Opened by typing `/` into a block.
    Insertion { block_id: BlockId },
    /// Opened from a block's handle.
    Options { block_id: BlockId },
    /// Opened from the page header.
    IconPicker,
}

/// One row of the insertion menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionItem {
    pub variant: Variant,
    pub label: &'static str,
    pub description: &'static str,
}

pub const INSERTION_ITEMS: [InsertionItem; 9] = [
    InsertionItem {
        variant: Variant::Text,
        label: "Text",
        description: "Just start writing with plain text.",
    },
    InsertionItem {
        variant: Variant::Heading1,
        label: "Heading 1",
        description: "Big section heading.",
    },
    InsertionItem {
        variant: Variant::Heading2,
        label: "Heading 2",
        description: "Medium section heading.",
    },
    InsertionItem {
        variant: Variant::Heading3,
        label: "Heading 3",
        description: "Small section heading.",
    },
    InsertionItem {
        variant: Variant::BulletItem,
        label: "Bulleted list",
        description: "Create a simple bulleted list.",
    },
    InsertionItem {
        variant: Variant::NumberedItem,
        label: "Numbered list",
        description: "Create a list with numbering.",
    },
    InsertionItem {
        variant: Variant::TodoItem,
        label: "To-do list",
        description: "Track tasks with a to-do list.",
    },
    InsertionItem {
        variant: Variant::Toggle,
        label: "Toggle list",
        description: "Toggles can hide and show content inside.",
    },
    InsertionItem {
        variant: Variant::Quote,
        label: "Quote",
        description: "Capture a quote.",
    },
];

/// An entry of the block options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAction {
    Duplicate,
    Delete,
    Convert(Variant),
}

impl OptionAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Duplicate => "Duplicate",
            Self::Delete => "Delete",
            Self::Convert(variant) => variant_label(variant),
        }
    }
}

pub const OPTION_ACTIONS: [OptionAction; 9] = [
    OptionAction::Duplicate,
    OptionAction::Delete,
    OptionAction::Convert(Variant::Text),
    OptionAction::Convert(Variant::Heading1),
    OptionAction::Convert(Variant::Heading2),
    OptionAction::Convert(Variant::Heading3),
    OptionAction::Convert(Variant::BulletItem),
    OptionAction::Convert(Variant::TodoItem),
    OptionAction::Convert(Variant::Quote),
];

/// Index of the first conversion row in [`OPTION_ACTIONS`].
pub const OPTION_CONVERT_START: usize = 2;

/// Glyph palette offered by the icon picker.
pub const ICON_CHOICES: [&str; 48] = [
    "🚀", "💡", "📅", "✅", "🔥", "🎨", "📝", "📊", "📈", "📉", "💰", "💎", "🏠", "🏢", "🏫", "🎓",
    "💻", "📱", "⌚", "📷", "🎥", "🎧", "🎤", "🎮", "🎲", "🧩", "🎯", "🎹", "🎸", "🎬", "🚗", "🌍",
    "⛺", "🏃", "🧘", "🚴", "🧠", "⭐", "🌟", "⚡", "🌈", "🌙", "💧", "🍎", "🍕", "☕", "🐶", "🐱",
];

/// Icons per picker row.
pub const ICON_COLUMNS: usize = 8;

pub const fn variant_label(variant: Variant) -> &'static str {
    match variant {
        Variant::Text => "Text",
        Variant::Heading1 => "Heading 1",
        Variant::Heading2 => "Heading 2",
        Variant::Heading3 => "Heading 3",
        Variant::BulletItem => "Bulleted list",
        Variant::NumberedItem => "Numbered list",
        Variant::TodoItem => "To-do list",
        Variant::Quote => "Quote",
        Variant::Toggle => "Toggle list",
    }
}

/// What picking the highlighted row means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Insert { block_id: BlockId, variant: Variant },
    Option { block_id: BlockId, action: OptionAction },
    Icon(&'static str),
}

/// The single open overlay menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub kind: MenuKind,
    pub position: MenuPosition,
    pub highlighted: usize,
}

impl MenuState {
    pub const fn insertion(block_id: BlockId, position: MenuPosition) -> Self {
        Self {
            kind: MenuKind::Insertion { block_id },
            position,
            highlighted: 0,
        }
    }

    pub const fn options(block_id: BlockId, position: MenuPosition) -> Self {
        Self {
            kind: MenuKind::Options { block_id },
            position,
            highlighted: 0,
        }
    }

    pub const fn icon_picker(position: MenuPosition) -> Self {
        Self {
            kind: MenuKind::IconPicker,
            position,
            highlighted: 0,
        }
    }

    /// The block the menu is anchored to, if any.
    pub const fn block_id(&self) -> Option<&BlockId> {
        match &self.kind {
            MenuKind::Insertion { block_id } | MenuKind::Options { block_id } => Some(block_id),
            MenuKind::IconPicker => None,
        }
    }

    pub const fn is_insertion(&self) -> bool {
        matches!(self.kind, MenuKind::Insertion { .. })
    }

    pub const fn item_count(&self) -> usize {
        match self.kind {
            MenuKind::Insertion { .. } => INSERTION_ITEMS.len(),
            MenuKind::Options { .. } => OPTION_ACTIONS.len(),
            MenuKind::IconPicker => ICON_CHOICES.len(),
        }
    }

    /// Rows move by one entry, the icon grid by a whole row.
    const fn vertical_step(&self) -> usize {
        match self.kind {
            MenuKind::IconPicker => ICON_COLUMNS,
            _ => 1,
        }
    }

    pub fn move_up(&mut self) {
        let step = self.vertical_step();
        if self.highlighted >= step {
            self.highlighted -= step;
        } else if step == 1 {
            self.highlighted = self.item_count() - 1;
        }
    }

    pub fn move_down(&mut self) {
        let step = self.vertical_step();
        let next = self.highlighted + step;
        if next < self.item_count() {
            self.highlighted = next;
        } else if step == 1 {
            self.highlighted = 0;
        }
    }

    /// Horizontal movement, only meaningful in the icon grid.
    pub const fn move_left(&mut self) {
        if matches!(self.kind, MenuKind::IconPicker) && self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    pub const fn move_right(&mut self) {
        if matches!(self.kind, MenuKind::IconPicker) && self.highlighted + 1 < self.item_count() {
            self.highlighted += 1;
        }
    }

    /// Highlight a row directly; out-of-range indices are ignored.
    pub const fn highlight(&mut self, index: usize) {
        if index < self.item_count() {
            self.highlighted = index;
        }
    }

    pub fn choice(&self) -> Option<MenuChoice> {
        self.choice_at(self.highlighted)
    }

    pub fn choice_at(&self, index: usize) -> Option<MenuChoice> {
        match &self.kind {
            MenuKind::Insertion { block_id } => {
                INSERTION_ITEMS.get(index).map(|item| MenuChoice::Insert {
                    block_id: block_id.clone(),
                    variant: item.variant,
                })
            }
            MenuKind::Options { block_id } => {
                OPTION_ACTIONS.get(index).map(|action| MenuChoice::Option {
                    block_id: block_id.clone(),
                    action: *action,
                })
            }
            MenuKind::IconPicker => ICON_CHOICES.get(index).copied().map(MenuChoice::Icon),
        }
    }
}
