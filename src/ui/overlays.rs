use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::menu::{
    ICON_CHOICES, ICON_COLUMNS, INSERTION_ITEMS, MenuKind, MenuState, OPTION_ACTIONS,
    OPTION_CONVERT_START, OptionAction,
};

use super::layout::point_in_rect;
use super::style::Theme;

/// Columns taken by one glyph in the icon grid.
const ICON_CELL_WIDTH: u16 = 4;

// Item counts are small constants
#[allow(clippy::cast_possible_truncation)]
const fn menu_size(kind: &MenuKind) -> (u16, u16) {
    match kind {
        MenuKind::Insertion { .. } => (58, INSERTION_ITEMS.len() as u16 + 2),
        MenuKind::Options { .. } => (30, OPTION_ACTIONS.len() as u16 + 2),
        MenuKind::IconPicker => (
            ICON_COLUMNS as u16 * ICON_CELL_WIDTH + 2,
            ICON_CHOICES.len().div_ceil(ICON_COLUMNS) as u16 + 2,
        ),
    }
}

/// Where a menu is drawn: at its anchor, pushed back inside `area`.
pub fn menu_rect(menu: &MenuState, area: Rect) -> Rect {
    let (width, height) = menu_size(&menu.kind);
    let width = width.min(area.width);
    let height = height.min(area.height);
    let right = area.x + area.width;
    let bottom = area.y + area.height;
    let x = menu.position.x.clamp(area.x, right - width);
    let y = if menu.position.y + height <= bottom {
        menu.position.y.max(area.y)
    } else {
        // Flip above the anchor row when there is no room below
        menu.position
            .y
            .saturating_sub(height + 1)
            .clamp(area.y, bottom - height)
    };
    Rect::new(x, y, width, height)
}

/// Index of the menu entry under a screen position.
pub fn menu_item_at(menu: &MenuState, area: Rect, column: u16, row: u16) -> Option<usize> {
    let rect = menu_rect(menu, area);
    let inner = Rect::new(
        rect.x + 1,
        rect.y + 1,
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    );
    if !point_in_rect(column, row, inner) {
        return None;
    }
    let line = usize::from(row - inner.y);
    let index = match menu.kind {
        MenuKind::IconPicker => {
            let cell = usize::from((column - inner.x) / ICON_CELL_WIDTH);
            if cell >= ICON_COLUMNS {
                return None;
            }
            line * ICON_COLUMNS + cell
        }
        MenuKind::Insertion { .. } | MenuKind::Options { .. } => line,
    };
    (index < menu.item_count()).then_some(index)
}

pub fn render_menu(menu: &MenuState, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup = menu_rect(menu, area);
    let row_style = |index: usize| {
        if index == menu.highlighted {
            theme.menu_highlight
        } else {
            theme.menu
        }
    };

    let (title, lines): (&str, Vec<Line>) = match menu.kind {
        MenuKind::Insertion { .. } => (
            "Basic blocks",
            INSERTION_ITEMS
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    Line::from(vec![
                        Span::styled(format!(" {:<14}", item.label), row_style(index)),
                        Span::styled(
                            item.description,
                            row_style(index).add_modifier(Modifier::DIM),
                        ),
                    ])
                })
                .collect(),
        ),
        MenuKind::Options { .. } => (
            "Block",
            OPTION_ACTIONS
                .iter()
                .enumerate()
                .map(|(index, action)| {
                    let label = match action {
                        OptionAction::Convert(_) => format!(" Turn into {}", action.label()),
                        OptionAction::Duplicate | OptionAction::Delete => {
                            format!(" {}", action.label())
                        }
                    };
                    let style = if index >= OPTION_CONVERT_START {
                        row_style(index)
                    } else {
                        row_style(index).add_modifier(Modifier::BOLD)
                    };
                    Line::styled(label, style)
                })
                .collect(),
        ),
        MenuKind::IconPicker => (
            "Icon",
            ICON_CHOICES
                .chunks(ICON_COLUMNS)
                .enumerate()
                .map(|(row, glyphs)| {
                    Line::from(
                        glyphs
                            .iter()
                            .enumerate()
                            .map(|(col, glyph)| {
                                Span::styled(
                                    format!(" {glyph} "),
                                    row_style(row * ICON_COLUMNS + col),
                                )
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect(),
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(theme.menu);
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    let store = model
        .store_path
        .as_ref()
        .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Gallery", section_style));
    lines.push(Line::raw("  j/k or arrows       Move between projects"));
    lines.push(Line::raw("  Enter / click       Open project"));
    lines.push(Line::raw("  n                   New project"));
    lines.push(Line::raw("  d / Delete          Delete project"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editing", section_style));
    lines.push(Line::raw("  Enter               New block below"));
    lines.push(Line::raw("  Shift/Alt+Enter     Line break in block"));
    lines.push(Line::raw("  Backspace           Delete an empty block"));
    lines.push(Line::raw("  Arrows, Home/End    Move the caret"));
    lines.push(Line::raw("  Tab / Shift+Tab     Into / out of a toggle"));
    lines.push(Line::raw("  Esc                 Back to gallery"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Blocks", section_style));
    lines.push(Line::raw("  /                   Insert menu"));
    lines.push(Line::raw("  # ## ### - * 1. [] > then Space"));
    lines.push(Line::raw("  Ctrl-o / right click Block options"));
    lines.push(Line::raw("  Ctrl-d              Duplicate block"));
    lines.push(Line::raw("  Ctrl-t              Check / open-close"));
    lines.push(Line::raw("  Ctrl-Shift-7        Turn into toggle"));
    lines.push(Line::raw("  Ctrl-e              Pick icon"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style));
    lines.push(Line::raw("  w / Ctrl-w          Toggle watch"));
    lines.push(Line::raw("  q / Ctrl-c / Ctrl-q Quit"));
    lines.push(Line::raw("  ? / F1              Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Store: {store}")));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(lines), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;
    use crate::menu::MenuPosition;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn test_menu_rect_sits_at_anchor() {
        let menu = MenuState::options(BlockId::from("a"), MenuPosition::new(10, 5));
        let rect = menu_rect(&menu, area());
        assert_eq!((rect.x, rect.y), (10, 5));
        assert_eq!(rect.height, OPTION_ACTIONS.len() as u16 + 2);
    }

    #[test]
    fn test_menu_rect_is_pushed_inside_area() {
        let menu = MenuState::insertion(BlockId::from("a"), MenuPosition::new(90, 28));
        let rect = menu_rect(&menu, area());
        assert!(rect.x + rect.width <= 100);
        assert!(rect.y + rect.height <= 30);
        assert!(rect.y < 28, "menu should flip above the anchor");
    }

    #[test]
    fn test_menu_item_at_rows() {
        let menu = MenuState::options(BlockId::from("a"), MenuPosition::new(10, 5));
        assert_eq!(menu_item_at(&menu, area(), 12, 6), Some(0));
        assert_eq!(menu_item_at(&menu, area(), 12, 8), Some(2));
        assert_eq!(menu_item_at(&menu, area(), 10, 6), None, "border");
        assert_eq!(menu_item_at(&menu, area(), 5, 6), None, "outside");
    }

    #[test]
    fn test_menu_item_at_icon_grid() {
        let menu = MenuState::icon_picker(MenuPosition::new(0, 0));
        assert_eq!(menu_item_at(&menu, area(), 1, 1), Some(0));
        assert_eq!(menu_item_at(&menu, area(), 1 + ICON_CELL_WIDTH, 2), Some(ICON_COLUMNS + 1));
    }
}
