use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{Field, Focus, Model};
use crate::block::Variant;
use crate::document::{Document, UNTITLED};
use crate::gallery::{CardSummary, format_date};

use super::layout::{
    BlockRegion, DetailRegion, GalleryLayout, PageLayout, column_for_offset, display_width,
};
use super::style::Theme;
use super::{PAGE_LEFT_PADDING, overlays, status};

/// Extra indent of a toggle's detail region past its content column.
const DETAIL_INDENT: u16 = 2;
const CARD_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 7;
/// Header lines above the card grid.
const GALLERY_HEADER_ROWS: u16 = 3;

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let theme = Theme::detect();

    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);
    let body = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    frame.render_widget(Clear, body);
    if model.active_document().is_some() {
        render_page(model, frame, body, &theme);
    } else {
        render_gallery(model, frame, body, &theme);
    }

    if toast_active && area.height >= 2 {
        let toast_area = Rect {
            y: status_area.y - 1,
            height: 1,
            ..area
        };
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area, &theme);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(menu) = &model.menu {
        overlays::render_menu(menu, frame, area, &theme);
    }
}

fn render_page(model: &mut Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let Some(doc) = model.active_document() else {
        return;
    };
    let (lines, mut layout) = build_page(doc, model.focus.as_ref(), theme);
    layout.area = area;

    model.viewport.resize(area.width, area.height);
    model.viewport.set_total_lines(lines.len());

    // Follow the caret only when it moved, so wheel scrolling sticks.
    let previous = model.layout.page.as_ref().and_then(|page| page.cursor);
    if let Some((row, _)) = layout.cursor
        && layout.cursor != previous
    {
        model.viewport.ensure_visible(row);
    }

    let offset = model.viewport.offset();
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(offset)
        .take(usize::from(area.height))
        .collect();
    frame.render_widget(Paragraph::new(visible), area);

    if !model.help_visible
        && let Some((row, x)) = layout.cursor
        && x < area.width
        && let Some(y) = layout.screen_row(row, offset)
    {
        frame.set_cursor_position(Position::new(area.x + x, y));
    }

    model.layout.page = Some(layout);
    model.layout.gallery = GalleryLayout::default();
}

/// Lay the page out as rows and record where each element went.
fn build_page(
    doc: &Document,
    focus: Option<&Focus>,
    theme: &Theme,
) -> (Vec<Line<'static>>, PageLayout) {
    let pad = " ".repeat(usize::from(PAGE_LEFT_PADDING));
    let mut lines: Vec<Line<'static>> = Vec::new();

    let icon_width = to_u16(display_width(&doc.icon));
    let mut layout = PageLayout {
        icon_x: PAGE_LEFT_PADDING,
        icon_width,
        title_x: PAGE_LEFT_PADDING + icon_width + 1,
        title_row: 0,
        ..PageLayout::default()
    };

    let title = if doc.title.is_empty() {
        Span::styled(UNTITLED, theme.placeholder.add_modifier(Modifier::BOLD))
    } else {
        Span::styled(doc.title.clone(), theme.title)
    };
    lines.push(Line::from(vec![
        Span::raw(pad.clone()),
        Span::raw(doc.icon.clone()),
        Span::raw(" "),
        title,
    ]));
    lines.push(Line::styled(
        format!(
            "{pad}Edited {} · {} blocks",
            format_date(doc.last_modified_at),
            doc.block_count()
        ),
        theme.info,
    ));
    lines.push(Line::raw(""));

    let mut number = 0;
    for (index, block) in doc.blocks.iter().enumerate() {
        let variant = block.variant();
        number = if variant == Variant::NumberedItem {
            number + 1
        } else {
            0
        };
        let prefix = block_prefix(variant, number, block.checked(), block.expanded());
        let content_x = PAGE_LEFT_PADDING + to_u16(display_width(&prefix));
        let text_style = if block.checked() == Some(true) {
            theme.checked
        } else {
            theme.for_variant(variant)
        };

        let top = lines.len();
        if block.content.is_empty() {
            lines.push(Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled(prefix, theme.prefix),
                Span::styled(placeholder(variant, index), theme.placeholder),
            ]));
        } else {
            let indent = " ".repeat(usize::from(content_x));
            for (i, text) in block.content.split('\n').enumerate() {
                let mut spans = if i == 0 {
                    vec![
                        Span::raw(pad.clone()),
                        Span::styled(prefix.clone(), theme.prefix),
                    ]
                } else {
                    vec![Span::raw(indent.clone())]
                };
                spans.push(Span::styled(text.to_string(), text_style));
                lines.push(Line::from(spans));
            }
        }
        let content_lines = lines.len() - top;

        let detail = if block.expanded() == Some(true) {
            let x = content_x + DETAIL_INDENT;
            let detail_top = lines.len();
            let indent = " ".repeat(usize::from(x));
            match block.detail_text().filter(|text| !text.is_empty()) {
                Some(text) => lines.extend(
                    text.split('\n')
                        .map(|line| Line::raw(format!("{indent}{line}"))),
                ),
                None => lines.push(Line::from(vec![
                    Span::raw(indent),
                    Span::styled("Hidden content...", theme.placeholder),
                ])),
            }
            Some(DetailRegion {
                top: detail_top,
                lines: lines.len() - detail_top,
                x,
            })
        } else {
            None
        };

        layout.blocks.push(BlockRegion {
            block_id: block.id.clone(),
            top,
            lines: content_lines,
            prefix_x: PAGE_LEFT_PADDING,
            content_x,
            detail,
        });
    }

    layout.add_row = lines.len();
    lines.push(Line::styled(
        format!("{pad}+ Click to add a block"),
        theme.placeholder,
    ));

    layout.cursor = focus.and_then(|focus| cursor_cell(doc, &layout, focus));
    (lines, layout)
}

fn block_prefix(
    variant: Variant,
    number: usize,
    checked: Option<bool>,
    expanded: Option<bool>,
) -> String {
    match variant {
        Variant::BulletItem => "• ".to_string(),
        Variant::NumberedItem => format!("{number}. "),
        Variant::TodoItem if checked == Some(true) => "[x] ".to_string(),
        Variant::TodoItem => "[ ] ".to_string(),
        Variant::Toggle if expanded == Some(true) => "▾ ".to_string(),
        Variant::Toggle => "▸ ".to_string(),
        Variant::Quote => "│ ".to_string(),
        Variant::Text | Variant::Heading1 | Variant::Heading2 | Variant::Heading3 => {
            String::new()
        }
    }
}

fn placeholder(variant: Variant, index: usize) -> &'static str {
    match variant {
        Variant::Heading1 => "Heading 1",
        Variant::Heading2 => "Heading 2",
        Variant::Heading3 => "Heading 3",
        Variant::Quote => "Quote...",
        Variant::Toggle => "Toggle title...",
        _ if index == 0 => "Write something...",
        _ => "Type '/' for commands",
    }
}

/// Page row and column of the caret.
fn cursor_cell(doc: &Document, layout: &PageLayout, focus: &Focus) -> Option<(usize, u16)> {
    match focus {
        Focus::Title { caret } => {
            let (_, col) = column_for_offset(&doc.title, *caret);
            Some((layout.title_row, layout.title_x.saturating_add(to_u16(col))))
        }
        Focus::Block {
            block_id,
            field,
            caret,
        } => {
            let block = doc.block(block_id)?;
            let region = layout.region(block_id)?;
            match field {
                Field::Content => {
                    let (line, col) = column_for_offset(&block.content, *caret);
                    Some((region.top + line, region.content_x.saturating_add(to_u16(col))))
                }
                Field::Detail => {
                    let detail = region.detail.as_ref()?;
                    let (line, col) = column_for_offset(block.detail_text()?, *caret);
                    Some((detail.top + line, detail.x.saturating_add(to_u16(col))))
                }
            }
        }
    }
}

fn render_gallery(model: &mut Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    model.layout.page = None;

    let header = Paragraph::new(vec![
        Line::styled("  Projects", theme.title),
        Line::styled(
            "  Select a project to open it, or press n to start a new one.",
            theme.info,
        ),
    ]);
    frame.render_widget(header, Rect {
        height: area.height.min(2),
        ..area
    });

    let grid = Rect {
        x: area.x + PAGE_LEFT_PADDING.min(area.width),
        y: area.y + GALLERY_HEADER_ROWS.min(area.height),
        width: area.width.saturating_sub(PAGE_LEFT_PADDING * 2),
        height: area.height.saturating_sub(GALLERY_HEADER_ROWS),
    };

    let summaries = model.gallery.summaries();
    if summaries.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No projects yet. Press n to create one.",
                theme.placeholder,
            )),
            grid,
        );
        model.layout.gallery = GalleryLayout::default();
        return;
    }

    let columns = usize::from((grid.width / CARD_WIDTH).max(1));
    let visible_rows = usize::from((grid.height / CARD_HEIGHT).max(1));
    let selected = model.gallery.selected_index();
    // Scroll whole rows so the selected card stays on screen
    let first_row = (selected / columns).saturating_sub(visible_rows - 1);
    let first = first_row * columns;

    let mut cards = Vec::new();
    for (index, summary) in summaries
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_rows * columns)
    {
        let slot = index - first;
        let rect = Rect::new(
            grid.x + to_u16(slot % columns) * CARD_WIDTH,
            grid.y + to_u16(slot / columns) * CARD_HEIGHT,
            CARD_WIDTH - 1,
            CARD_HEIGHT,
        )
        .intersection(grid);
        if rect.is_empty() {
            continue;
        }
        render_card(summary, index == selected, frame, rect, theme);
        cards.push((summary.id.clone(), rect));
    }
    model.layout.gallery = GalleryLayout { cards };
}

fn render_card(summary: &CardSummary, selected: bool, frame: &mut Frame, rect: Rect, theme: &Theme) {
    let (border_style, title_style) = if selected {
        (theme.selected.add_modifier(Modifier::BOLD), theme.selected)
    } else {
        (theme.info, theme.title)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} {} ", summary.icon, summary.title),
            title_style,
        ));

    let mut lines = vec![Line::styled(
        format!("Updated {}", summary.updated),
        theme.info,
    )];
    lines.extend(summary.previews.iter().map(|preview| Line::raw(preview.clone())));
    lines.push(Line::styled(
        format!("{} blocks", summary.block_count),
        theme.info,
    ));

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
