//! Screen geometry recorded by the renderer.
//!
//! The renderer fills a [`ScreenLayout`] every frame; mouse handling and
//! menu anchoring read it back. Page rows are counted from the top of the
//! page, before scrolling.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::block::BlockId;
use crate::document::DocumentId;
use crate::menu::MenuPosition;

/// Rows of a toggle's detail region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRegion {
    pub top: usize,
    pub lines: usize,
    pub x: u16,
}

/// Where one block landed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRegion {
    pub block_id: BlockId,
    pub top: usize,
    pub lines: usize,
    pub prefix_x: u16,
    pub content_x: u16,
    pub detail: Option<DetailRegion>,
}

/// What a pointer press on the page landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageHit {
    Icon,
    Title { col: usize },
    Prefix(BlockId),
    Content { block_id: BlockId, line: usize, col: usize },
    Detail { block_id: BlockId, line: usize, col: usize },
    AddRow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    /// Screen area the page body was drawn into.
    pub area: Rect,
    pub icon_x: u16,
    pub icon_width: u16,
    pub title_x: u16,
    pub title_row: usize,
    pub blocks: Vec<BlockRegion>,
    pub add_row: usize,
    /// Page row and column of the caret, when something is focused.
    pub cursor: Option<(usize, u16)>,
}

impl PageLayout {
    pub fn region(&self, id: &BlockId) -> Option<&BlockRegion> {
        self.blocks.iter().find(|r| &r.block_id == id)
    }

    /// Screen row of a page row, if it is on screen.
    pub fn screen_row(&self, page_row: usize, scroll: usize) -> Option<u16> {
        let rel = page_row.checked_sub(scroll)?;
        let rel = u16::try_from(rel).ok()?;
        (rel < self.area.height).then(|| self.area.y + rel)
    }

    /// Anchor for a menu opened from `id`: just below the block.
    pub fn anchor_below(&self, id: &BlockId, scroll: usize) -> Option<MenuPosition> {
        let region = self.region(id)?;
        let last = region.top + region.lines.max(1) - 1;
        let row = self
            .screen_row(last, scroll)
            .map_or(self.area.y, |r| r.saturating_add(1));
        Some(MenuPosition::new(self.area.x + region.content_x, row))
    }

    pub fn icon_anchor(&self, scroll: usize) -> MenuPosition {
        let row = self
            .screen_row(self.title_row, scroll)
            .map_or(self.area.y, |r| r.saturating_add(1));
        MenuPosition::new(self.area.x + self.icon_x, row)
    }

    /// Resolve a screen position to the page element under it.
    pub fn hit(&self, column: u16, row: u16, scroll: usize) -> Option<PageHit> {
        if !point_in_rect(column, row, self.area) {
            return None;
        }
        let page_row = scroll + usize::from(row - self.area.y);
        let x = column - self.area.x;

        if page_row == self.title_row {
            if x >= self.icon_x && x < self.icon_x + self.icon_width {
                return Some(PageHit::Icon);
            }
            if x >= self.title_x {
                return Some(PageHit::Title {
                    col: usize::from(x - self.title_x),
                });
            }
            return None;
        }
        if page_row == self.add_row {
            return Some(PageHit::AddRow);
        }

        for region in &self.blocks {
            if page_row >= region.top && page_row < region.top + region.lines.max(1) {
                if x < region.content_x {
                    return (x >= region.prefix_x).then(|| PageHit::Prefix(region.block_id.clone()));
                }
                return Some(PageHit::Content {
                    block_id: region.block_id.clone(),
                    line: page_row - region.top,
                    col: usize::from(x - region.content_x),
                });
            }
            if let Some(detail) = &region.detail
                && page_row >= detail.top
                && page_row < detail.top + detail.lines.max(1)
            {
                return Some(PageHit::Detail {
                    block_id: region.block_id.clone(),
                    line: page_row - detail.top,
                    col: usize::from(x.saturating_sub(detail.x)),
                });
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryLayout {
    pub cards: Vec<(DocumentId, Rect)>,
}

impl GalleryLayout {
    pub fn card_at(&self, column: u16, row: u16) -> Option<&DocumentId> {
        self.cards
            .iter()
            .find(|(_, rect)| point_in_rect(column, row, *rect))
            .map(|(id, _)| id)
    }
}

/// Geometry of the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub page: Option<PageLayout>,
    pub gallery: GalleryLayout,
}

pub const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Terminal columns taken by `text`.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Byte offset into `text` for a click at display column `col` of `line`.
///
/// Clicks past the end of a line land at its end; clicks below the last
/// line land on the last line.
pub fn offset_for_column(text: &str, line: usize, col: usize) -> usize {
    let mut start = 0;
    let mut lines = text.split('\n').peekable();
    let mut current = 0;
    while let Some(content) = lines.next() {
        if current == line || lines.peek().is_none() {
            let mut used = 0;
            for (idx, ch) in content.char_indices() {
                let w = ch.width().unwrap_or(0);
                if used + w > col {
                    return start + idx;
                }
                used += w;
            }
            return start + content.len();
        }
        start += content.len() + 1;
        current += 1;
    }
    0
}

/// Display column of a byte offset within its line.
pub fn column_for_offset(text: &str, offset: usize) -> (usize, usize) {
    let cursor = crate::editor::cursor_at(text, offset);
    let line_text = text.split('\n').nth(cursor.line).unwrap_or_default();
    let col = line_text
        .chars()
        .take(cursor.col)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    (cursor.line, col)
}
