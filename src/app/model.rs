use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use ratatui::layout::Rect;

use crate::block::BlockId;
use crate::document::Document;
use crate::gallery::Gallery;
use crate::menu::{MenuPosition, MenuState};
use crate::ui::layout::ScreenLayout;
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which text region of a block holds the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Content,
    /// The hidden text of an expanded toggle.
    Detail,
}

/// The active element and caret position.
///
/// `caret` is a byte offset that sits on a char boundary of the focused text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Title {
        caret: usize,
    },
    Block {
        block_id: BlockId,
        field: Field,
        caret: usize,
    },
}

impl Focus {
    pub const fn content(block_id: BlockId, caret: usize) -> Self {
        Self::Block {
            block_id,
            field: Field::Content,
            caret,
        }
    }

    pub const fn detail(block_id: BlockId, caret: usize) -> Self {
        Self::Block {
            block_id,
            field: Field::Detail,
            caret,
        }
    }

    pub const fn block_id(&self) -> Option<&BlockId> {
        match self {
            Self::Block { block_id, .. } => Some(block_id),
            Self::Title { .. } => None,
        }
    }

    pub const fn caret(&self) -> usize {
        match self {
            Self::Title { caret } | Self::Block { caret, .. } => *caret,
        }
    }

    pub const fn field(&self) -> Option<Field> {
        match self {
            Self::Block { field, .. } => Some(*field),
            Self::Title { .. } => None,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The open document
/// is reached through the gallery by id; the model never holds a copy.
pub struct Model {
    pub gallery: Gallery,
    /// Active element; `None` when nothing is focused
    pub focus: Option<Focus>,
    /// The single open overlay menu
    pub menu: Option<MenuState>,
    /// Scroll state of the open page
    pub viewport: Viewport,
    /// Geometry recorded by the last render
    pub layout: ScreenLayout,
    /// Whether remote store watching is enabled
    pub watch_enabled: bool,
    /// Store file shown in help
    pub store_path: Option<PathBuf>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Full terminal size
    screen: (u16, u16),
    revision: u64,
    dirty: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("documents", &self.gallery.len())
            .field("active", &self.gallery.active_id())
            .field("focus", &self.focus)
            .field("menu", &self.menu)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Vec::new(), (80, 24))
    }
}

impl Model {
    /// Create a model over a document collection.
    pub fn new(documents: Vec<Document>, terminal_size: (u16, u16)) -> Self {
        Self {
            gallery: Gallery::new(documents),
            focus: None,
            menu: None,
            viewport: Viewport::new(terminal_size.0, terminal_size.1.saturating_sub(1), 0),
            layout: ScreenLayout::default(),
            watch_enabled: false,
            store_path: None,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            should_quit: false,
            screen: terminal_size,
            revision: 0,
            dirty: false,
            toast: None,
        }
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.gallery.active()
    }

    /// Bumped on every change to the collection.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the collection changed since it was last persisted.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) const fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(super) const fn note_change(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    /// A change that came from the store; nothing to write back.
    pub(super) const fn note_remote_change(&mut self) {
        self.revision += 1;
    }

    /// Install a transformed version of the active document.
    ///
    /// Stamps the modification time and marks the collection dirty, but only
    /// when the document actually changed.
    pub(super) fn commit(&mut self, mut next: Document) -> bool {
        let Some(current) = self.gallery.active() else {
            return false;
        };
        if current.id != next.id || *current == next {
            return false;
        }
        next.touch(Utc::now());
        self.gallery.replace(next);
        self.note_change();
        true
    }

    pub const fn screen_size(&self) -> (u16, u16) {
        self.screen
    }

    pub(super) const fn set_screen_size(&mut self, width: u16, height: u16) {
        self.screen = (width, height);
    }

    /// The full terminal area.
    pub fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.screen.0, self.screen.1)
    }

    pub fn focused_block_id(&self) -> Option<&BlockId> {
        self.focus.as_ref().and_then(Focus::block_id)
    }

    /// Where a menu opened from `id` should appear.
    pub fn menu_anchor(&self, id: &BlockId) -> MenuPosition {
        self.layout
            .page
            .as_ref()
            .and_then(|page| page.anchor_below(id, self.viewport.offset()))
            .unwrap_or_default()
    }

    pub fn icon_anchor(&self) -> MenuPosition {
        self.layout
            .page
            .as_ref()
            .map(|page| page.icon_anchor(self.viewport.offset()))
            .unwrap_or_default()
    }

    /// Drop or clamp focus that no longer points into the active document.
    pub(super) fn sanitize_focus(&mut self) {
        let Some(doc) = self.gallery.active() else {
            self.focus = None;
            self.menu = None;
            return;
        };
        let fixed = match self.focus.take() {
            Some(Focus::Title { caret }) => Some(Focus::Title {
                caret: clamp_caret(&doc.title, caret),
            }),
            Some(Focus::Block {
                block_id,
                field,
                caret,
            }) => doc.block(&block_id).map(|block| {
                let detail = block
                    .detail_text()
                    .filter(|_| block.expanded() == Some(true));
                match (field, detail) {
                    (Field::Detail, Some(text)) => {
                        Focus::detail(block_id.clone(), clamp_caret(text, caret))
                    }
                    // The detail region closed under the caret
                    (Field::Detail, None) => Focus::content(block_id.clone(), block.content.len()),
                    (Field::Content, _) => {
                        Focus::content(block_id.clone(), clamp_caret(&block.content, caret))
                    }
                }
            }),
            None => None,
        };
        self.focus = fixed;
        if let Some(menu) = &self.menu
            && menu.block_id().is_some_and(|id| !doc.contains_block(id))
        {
            self.menu = None;
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

fn clamp_caret(text: &str, caret: usize) -> usize {
    crate::editor::TextField::new(text, caret).caret()
}
