use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::model::{Field, Focus};
use crate::app::{App, Message, Model};
use crate::block::{BlockId, Variant};
use crate::menu::{MenuKind, MenuPosition, MenuState};
use crate::ui::layout::{PageHit, offset_for_column, point_in_rect};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.active_document().is_some() && !model.help_visible => {
                Some(Message::InsertStr(text.clone()))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }
        if key.code == KeyCode::F(1) {
            return Some(Message::ToggleHelp);
        }

        if model.active_document().is_none() {
            return gallery_key(key, model);
        }

        if let Some(menu) = &model.menu
            && let Some(msg) = menu_key(key, menu)
        {
            return msg;
        }

        if is_toggle_chord(key) {
            return Some(Message::ToggleChord);
        }
        if ctrl {
            return page_command(key, model);
        }

        let focused = model.focused_block_id().cloned();
        match key.code {
            KeyCode::Esc => match model.focus.as_ref().and_then(Focus::field) {
                Some(Field::Detail) => Some(Message::LeaveDetail),
                _ => Some(Message::DeselectDocument),
            },
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                Some(Message::InsertNewline)
            }
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::MoveLeft),
            KeyCode::Right => Some(Message::MoveRight),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::Up | KeyCode::Down if model.focus.is_none() => Some(Message::FocusTitle),
            KeyCode::Up => Some(Message::MoveUp),
            KeyCode::Down => Some(Message::MoveDown),
            KeyCode::Tab if focused.is_some() => Some(Message::EnterDetail),
            KeyCode::BackTab => Some(Message::LeaveDetail),
            KeyCode::PageUp => model
                .viewport
                .can_scroll_up()
                .then_some(Message::PageUp),
            KeyCode::PageDown => model
                .viewport
                .can_scroll_down()
                .then_some(Message::PageDown),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::InsertChar(c))
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return matches!(mouse.kind, MouseEventKind::Down(_)).then_some(Message::HideHelp);
        }

        if let Some(menu) = &model.menu {
            return menu_mouse(mouse, menu, model);
        }

        if model.active_document().is_none() {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => model
                    .layout
                    .gallery
                    .card_at(mouse.column, mouse.row)
                    .map(|id| Message::SelectDocument(id.clone())),
                MouseEventKind::ScrollDown => Some(Message::GalleryDown),
                MouseEventKind::ScrollUp => Some(Message::GalleryUp),
                _ => None,
            };
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => {
                return model
                    .viewport
                    .can_scroll_down()
                    .then_some(Message::ScrollDown(3));
            }
            MouseEventKind::ScrollUp => {
                return model
                    .viewport
                    .can_scroll_up()
                    .then_some(Message::ScrollUp(3));
            }
            _ => {}
        }

        let page = model.layout.page.as_ref()?;
        let hit = page.hit(mouse.column, mouse.row, model.viewport.offset())?;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => page_click(hit, model),
            MouseEventKind::Down(MouseButton::Right) => hit_block(&hit).map(|id| {
                Message::OpenOptionsMenu(id.clone(), MenuPosition::new(mouse.column, mouse.row))
            }),
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn gallery_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let highlighted = || model.gallery.selected_id().cloned();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => Some(Message::GalleryDown),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => Some(Message::GalleryUp),
        KeyCode::Enter => highlighted().map(Message::SelectDocument),
        KeyCode::Char('d') | KeyCode::Delete => highlighted().map(Message::DeleteDocument),
        KeyCode::Char('n') => Some(Message::CreateDocument),
        KeyCode::Char('w') => Some(Message::ToggleWatch),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
        _ => None,
    }
}

/// Keys an open menu consumes. `None` lets the key through to the page;
/// `Some(None)` swallows it.
fn menu_key(key: KeyEvent, menu: &MenuState) -> Option<Option<Message>> {
    let msg = match key.code {
        KeyCode::Up => Message::MenuUp,
        KeyCode::Down => Message::MenuDown,
        KeyCode::Enter => Message::MenuSelect,
        KeyCode::Esc => Message::CloseMenus,
        // The insertion menu stays open while typing continues in the block
        _ if menu.is_insertion() => return None,
        KeyCode::Left => Message::MenuLeft,
        KeyCode::Right => Message::MenuRight,
        KeyCode::Tab => Message::MenuDown,
        KeyCode::BackTab => Message::MenuUp,
        _ => return Some(None),
    };
    Some(Some(msg))
}

/// Ctrl+Shift+7. Terminals report it as `7` or as `&` depending on layout.
fn is_toggle_chord(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && match key.code {
            KeyCode::Char('7') => key.modifiers.contains(KeyModifiers::SHIFT),
            KeyCode::Char('&') => true,
            _ => false,
        }
}

fn page_command(key: KeyEvent, model: &Model) -> Option<Message> {
    let focused = model.focused_block_id().cloned();
    match key.code {
        KeyCode::Char('o') => {
            let id = focused?;
            let position = model.menu_anchor(&id);
            Some(Message::OpenOptionsMenu(id, position))
        }
        KeyCode::Char('e') => Some(Message::OpenIconPicker(model.icon_anchor())),
        KeyCode::Char('d') => focused.map(Message::DuplicateBlock),
        KeyCode::Char('t') => {
            let id = focused?;
            flip_message(model, id)
        }
        KeyCode::Char('w') => Some(Message::ToggleWatch),
        KeyCode::Home => Some(Message::FocusTitle),
        _ => None,
    }
}

/// Check a todo or open/close a toggle.
fn flip_message(model: &Model, id: BlockId) -> Option<Message> {
    let variant = model.active_document()?.block(&id)?.variant();
    match variant {
        Variant::TodoItem => Some(Message::ToggleChecked(id)),
        Variant::Toggle => Some(Message::ToggleExpanded(id)),
        _ => None,
    }
}

fn menu_mouse(mouse: MouseEvent, menu: &MenuState, model: &Model) -> Option<Message> {
    let area = model.screen_area();
    let item = crate::ui::menu_item_at(menu, area, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match item {
            Some(index) => Some(Message::MenuSelectAt(index)),
            None if point_in_rect(mouse.column, mouse.row, crate::ui::menu_rect(menu, area)) => {
                None
            }
            None => Some(Message::CloseMenus),
        },
        MouseEventKind::Down(_) => Some(Message::CloseMenus),
        MouseEventKind::Moved => item
            .filter(|index| *index != menu.highlighted)
            .map(Message::MenuHighlight),
        MouseEventKind::ScrollDown if !matches!(menu.kind, MenuKind::Insertion { .. }) => {
            Some(Message::MenuDown)
        }
        MouseEventKind::ScrollUp if !matches!(menu.kind, MenuKind::Insertion { .. }) => {
            Some(Message::MenuUp)
        }
        _ => None,
    }
}

fn hit_block(hit: &PageHit) -> Option<&BlockId> {
    match hit {
        PageHit::Prefix(block_id)
        | PageHit::Content { block_id, .. }
        | PageHit::Detail { block_id, .. } => Some(block_id),
        PageHit::Icon | PageHit::Title { .. } | PageHit::AddRow => None,
    }
}

fn page_click(hit: PageHit, model: &Model) -> Option<Message> {
    let doc = model.active_document()?;
    match hit {
        PageHit::Icon => Some(Message::OpenIconPicker(model.icon_anchor())),
        PageHit::Title { col } => Some(Message::SetFocus(Some(Focus::Title {
            caret: offset_for_column(&doc.title, 0, col),
        }))),
        PageHit::Prefix(block_id) => match doc.block(&block_id)?.variant() {
            Variant::TodoItem | Variant::Toggle => flip_message(model, block_id),
            _ => Some(Message::SetFocus(Some(Focus::content(block_id, 0)))),
        },
        PageHit::Content {
            block_id,
            line,
            col,
        } => {
            let caret = offset_for_column(&doc.block(&block_id)?.content, line, col);
            Some(Message::SetFocus(Some(Focus::content(block_id, caret))))
        }
        PageHit::Detail {
            block_id,
            line,
            col,
        } => {
            let detail = doc.block(&block_id)?.detail_text()?;
            let caret = offset_for_column(detail, line, col);
            Some(Message::SetFocus(Some(Focus::detail(block_id, caret))))
        }
        PageHit::AddRow => Some(Message::AppendBlock),
    }
}
