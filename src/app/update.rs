use chrono::Utc;

use crate::app::model::{Field, Focus, Model};
use crate::block::{BlockId, Variant};
use crate::document::{self, Document, DocumentId};
use crate::editor::{TextField, offset_at};
use crate::menu::{MenuChoice, MenuPosition, MenuState, OptionAction};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Gallery
    /// Create a document and open it
    CreateDocument,
    /// Remove a document from the collection
    DeleteDocument(DocumentId),
    /// Open a document
    SelectDocument(DocumentId),
    /// Close the open document and return to the gallery
    DeselectDocument,
    /// Move the gallery highlight back
    GalleryUp,
    /// Move the gallery highlight forward
    GalleryDown,

    // Document
    /// Replace the title of the open document
    UpdateTitle(String),
    /// Replace the icon of the open document
    UpdateIcon(String),
    /// Replace a block's content, running slash and shortcut detection
    UpdateBlockContent(BlockId, String),
    /// Replace a toggle's hidden text
    UpdateDetailText(BlockId, String),
    /// Flip a todo's check mark
    ToggleChecked(BlockId),
    /// Open or close a toggle
    ToggleExpanded(BlockId),
    /// Insert an empty block after the given one and focus it
    InsertBlockAfter(BlockId),
    /// Append an empty block at the end of the page
    AppendBlock,
    DeleteBlock(BlockId),
    DuplicateBlock(BlockId),
    /// Convert a block, keeping its content
    SetBlockVariant(BlockId, Variant),
    /// Force the focused block into a toggle
    ToggleChord,

    // Menus
    /// Open the insertion menu for a block
    OpenInsertionMenu(BlockId, MenuPosition),
    /// Open the options menu for a block
    OpenOptionsMenu(BlockId, MenuPosition),
    /// Open the icon picker of the open document
    OpenIconPicker(MenuPosition),
    CloseMenus,
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    /// Highlight a menu row (e.g. pointer hover)
    MenuHighlight(usize),
    /// Pick the highlighted row
    MenuSelect,
    /// Pick a row directly (pointer press)
    MenuSelectAt(usize),

    // Editing
    /// Insert a character at the caret
    InsertChar(char),
    /// Insert pasted text at the caret
    InsertStr(String),
    /// Insert a literal line break (Shift+Enter)
    InsertNewline,
    /// Enter: split into a new block, or a line break inside a detail region
    SplitLine,
    /// Delete before the caret, removing an empty block
    DeleteBack,
    /// Delete after the caret
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    /// Caret up a line, or to the field above
    MoveUp,
    /// Caret down a line, or to the field below
    MoveDown,
    /// Move the caret into an expanded toggle's hidden text
    EnterDetail,
    /// Move the caret from hidden text back to the toggle's content
    LeaveDetail,
    /// Set the active element directly (e.g. from a mouse click)
    SetFocus(Option<Focus>),
    /// Put the caret at the end of the title
    FocusTitle,

    // Window
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Terminal resized
    Resize(u16, u16),
    /// Toggle remote store watching
    ToggleWatch,
    /// The store was written by someone else; reloaded in effects
    StoreChanged,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function; persistence of the
/// changes it makes is handled by the effects layer.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Gallery
        Message::CreateDocument => {
            model.gallery.create(Utc::now());
            model.note_change();
            model.menu = None;
            model.viewport.go_to_top();
            model.focus = model
                .active_document()
                .and_then(Document::first_block)
                .map(|block| Focus::content(block.id.clone(), 0));
        }
        Message::DeleteDocument(id) => {
            if model.gallery.delete(&id) {
                model.note_change();
                if model.active_document().is_none() {
                    model.menu = None;
                }
            }
        }
        Message::SelectDocument(id) => {
            if model.gallery.select(&id) {
                model.menu = None;
                model.viewport.go_to_top();
                model.focus = model.active_document().map(|doc| {
                    doc.first_block().map_or_else(
                        || Focus::Title {
                            caret: doc.title.len(),
                        },
                        |block| Focus::content(block.id.clone(), block.content.len()),
                    )
                });
            }
        }
        Message::DeselectDocument => {
            model.gallery.deselect();
            model.focus = None;
            model.menu = None;
        }
        Message::GalleryUp => model.gallery.select_previous(),
        Message::GalleryDown => model.gallery.select_next(),

        // Document
        Message::UpdateTitle(text) => {
            commit_with(&mut model, |doc| document::set_title(doc, &text));
        }
        Message::UpdateIcon(glyph) => {
            commit_with(&mut model, |doc| document::set_icon(doc, &glyph));
            if model.menu.as_ref().is_some_and(|m| m.block_id().is_none()) {
                model.menu = None;
            }
        }
        Message::UpdateBlockContent(id, text) => apply_content(&mut model, &id, &text),
        Message::UpdateDetailText(id, text) => {
            commit_with(&mut model, |doc| document::update_detail_text(doc, &id, &text));
        }
        Message::ToggleChecked(id) => {
            commit_with(&mut model, |doc| document::toggle_checked(doc, &id));
        }
        Message::ToggleExpanded(id) => {
            commit_with(&mut model, |doc| document::toggle_expanded(doc, &id));
        }
        Message::InsertBlockAfter(id) => {
            if let Some(doc) = model.active_document() {
                let (next, new_id) = document::insert_block_after(doc, &id);
                model.commit(next);
                model.menu = None;
                model.focus = Some(Focus::content(new_id, 0));
            }
        }
        Message::AppendBlock => append_and_focus(&mut model),
        Message::DeleteBlock(id) => remove_block(&mut model, &id),
        Message::DuplicateBlock(id) => {
            commit_with(&mut model, |doc| document::duplicate_block(doc, &id).0);
        }
        Message::SetBlockVariant(id, variant) => {
            commit_with(&mut model, |doc| {
                document::set_block_variant(doc, &id, variant, None)
            });
        }
        Message::ToggleChord => {
            if let Some(id) = model.focused_block_id().cloned() {
                model.menu = None;
                commit_with(&mut model, |doc| {
                    document::set_block_variant(doc, &id, Variant::Toggle, None)
                });
            }
        }

        // Menus
        Message::OpenInsertionMenu(id, position) => {
            if model.active_document().is_some_and(|d| d.contains_block(&id)) {
                model.menu = Some(MenuState::insertion(id, position));
            }
        }
        Message::OpenOptionsMenu(id, position) => {
            if model.active_document().is_some_and(|d| d.contains_block(&id)) {
                model.menu = Some(MenuState::options(id, position));
            }
        }
        Message::OpenIconPicker(position) => {
            if model.active_document().is_some() {
                model.menu = Some(MenuState::icon_picker(position));
            }
        }
        Message::CloseMenus => model.menu = None,
        Message::MenuUp => {
            if let Some(menu) = &mut model.menu {
                menu.move_up();
            }
        }
        Message::MenuDown => {
            if let Some(menu) = &mut model.menu {
                menu.move_down();
            }
        }
        Message::MenuLeft => {
            if let Some(menu) = &mut model.menu {
                menu.move_left();
            }
        }
        Message::MenuRight => {
            if let Some(menu) = &mut model.menu {
                menu.move_right();
            }
        }
        Message::MenuHighlight(index) => {
            if let Some(menu) = &mut model.menu {
                menu.highlight(index);
            }
        }
        Message::MenuSelect => {
            if let Some(choice) = model.menu.as_ref().and_then(MenuState::choice) {
                apply_choice(&mut model, choice);
            }
        }
        Message::MenuSelectAt(index) => {
            if let Some(choice) = model.menu.as_ref().and_then(|m| m.choice_at(index)) {
                apply_choice(&mut model, choice);
            }
        }

        // Editing
        Message::InsertChar(ch) => {
            if ch == '\n' && matches!(model.focus, Some(Focus::Title { .. })) {
                return finish(model);
            }
            edit_focused(&mut model, |input| {
                input.insert_char(ch);
                true
            });
        }
        Message::InsertStr(text) => {
            let text = if matches!(model.focus, Some(Focus::Title { .. })) {
                text.replace(['\r', '\n'], " ")
            } else {
                text.replace("\r\n", "\n")
            };
            edit_focused(&mut model, |input| {
                input.insert_str(&text);
                !text.is_empty()
            });
        }
        Message::InsertNewline => {
            if !matches!(model.focus, Some(Focus::Title { .. })) {
                edit_focused(&mut model, |input| {
                    input.insert_char('\n');
                    true
                });
            }
        }
        Message::SplitLine => split_line(&mut model),
        Message::DeleteBack => delete_back(&mut model),
        Message::DeleteForward => edit_focused(&mut model, TextField::delete_forward),
        Message::MoveLeft => move_caret(&mut model, TextField::move_left),
        Message::MoveRight => move_caret(&mut model, TextField::move_right),
        Message::MoveHome => move_caret(&mut model, |input| {
            input.move_home();
            true
        }),
        Message::MoveEnd => move_caret(&mut model, |input| {
            input.move_end();
            true
        }),
        Message::MoveUp => move_vertical(&mut model, false),
        Message::MoveDown => move_vertical(&mut model, true),
        Message::EnterDetail => {
            if let Some(Focus::Block {
                block_id,
                field: Field::Content,
                ..
            }) = &model.focus
                && let Some(block) = model.active_document().and_then(|d| d.block(block_id))
                && block.expanded() == Some(true)
                && let Some(detail) = block.detail_text()
            {
                model.focus = Some(Focus::detail(block_id.clone(), detail.len()));
            }
        }
        Message::LeaveDetail => {
            if let Some(Focus::Block {
                block_id,
                field: Field::Detail,
                ..
            }) = &model.focus
                && let Some(block) = model.active_document().and_then(|d| d.block(block_id))
            {
                model.focus = Some(Focus::content(block_id.clone(), block.content.len()));
            }
        }
        Message::SetFocus(focus) => model.focus = focus,
        Message::FocusTitle => {
            model.focus = model.active_document().map(|doc| Focus::Title {
                caret: doc.title.len(),
            });
        }

        // Window
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::Resize(width, height) => {
            model.set_screen_size(width, height);
            model.viewport.resize(width, height.saturating_sub(1));
        }
        Message::ToggleWatch => model.watch_enabled = !model.watch_enabled,
        // StoreChanged: handled in effects (side effect)
        Message::StoreChanged => {}
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        // Application
        Message::Quit => model.should_quit = true,
    }
    finish(model)
}

fn finish(mut model: Model) -> Model {
    model.sanitize_focus();
    model
}

/// Run a transform over the open document and install the result.
fn commit_with(model: &mut Model, transform: impl FnOnce(&Document) -> Document) -> bool {
    let Some(doc) = model.active_document() else {
        return false;
    };
    let next = transform(doc);
    model.commit(next)
}

/// Write new content to a block, then react to what was typed.
///
/// A lone `/` opens the insertion menu. Once the content stops starting with
/// `/` an open insertion menu closes and markdown shortcuts are matched.
fn apply_content(model: &mut Model, id: &BlockId, text: &str) {
    if !model.active_document().is_some_and(|d| d.contains_block(id)) {
        return;
    }
    commit_with(model, |doc| document::update_block_content(doc, id, text));

    if document::detect_slash_trigger(text) {
        let position = model.menu_anchor(id);
        model.menu = Some(MenuState::insertion(id.clone(), position));
        return;
    }
    if text.starts_with('/') {
        return;
    }
    if model.menu.as_ref().is_some_and(MenuState::is_insertion) {
        model.menu = None;
    }
    if let Some(variant) = document::detect_markdown_shortcut(text) {
        tracing::debug!(?variant, "markdown shortcut");
        commit_with(model, |doc| {
            document::set_block_variant(doc, id, variant, Some(""))
        });
        if model.focused_block_id() == Some(id) {
            model.focus = Some(Focus::content(id.clone(), 0));
        }
    }
}

fn apply_choice(model: &mut Model, choice: MenuChoice) {
    model.menu = None;
    match choice {
        MenuChoice::Insert { block_id, variant } => {
            commit_with(model, |doc| {
                document::set_block_variant(doc, &block_id, variant, Some(""))
            });
            model.focus = Some(Focus::content(block_id, 0));
        }
        MenuChoice::Option { block_id, action } => match action {
            OptionAction::Duplicate => {
                commit_with(model, |doc| document::duplicate_block(doc, &block_id).0);
            }
            OptionAction::Delete => remove_block(model, &block_id),
            OptionAction::Convert(variant) => {
                commit_with(model, |doc| {
                    document::set_block_variant(doc, &block_id, variant, None)
                });
            }
        },
        MenuChoice::Icon(glyph) => {
            commit_with(model, |doc| document::set_icon(doc, glyph));
        }
    }
}

/// Delete a block. When it held the caret, the caret moves to the end of
/// the previous block, or nowhere if it was the first.
fn remove_block(model: &mut Model, id: &BlockId) {
    let Some(doc) = model.active_document() else {
        return;
    };
    let previous = doc
        .previous_block(id)
        .map(|block| Focus::content(block.id.clone(), block.content.len()));
    let next = document::delete_block(doc, id);
    if model.commit(next) && model.focused_block_id() == Some(id) {
        model.focus = previous;
    }
}

fn append_and_focus(model: &mut Model) {
    if let Some(doc) = model.active_document() {
        let (next, new_id) = document::append_block(doc);
        model.commit(next);
        model.menu = None;
        model.focus = Some(Focus::content(new_id, 0));
    }
}

fn split_line(model: &mut Model) {
    match model.focus.clone() {
        Some(Focus::Block {
            block_id,
            field: Field::Content,
            ..
        }) => {
            if let Some(doc) = model.active_document() {
                let (next, new_id) = document::insert_block_after(doc, &block_id);
                model.commit(next);
                model.menu = None;
                model.focus = Some(Focus::content(new_id, 0));
            }
        }
        Some(Focus::Block {
            field: Field::Detail,
            ..
        }) => edit_focused(model, |input| {
            input.insert_char('\n');
            true
        }),
        Some(Focus::Title { .. }) => {
            let first = model
                .active_document()
                .and_then(Document::first_block)
                .map(|block| Focus::content(block.id.clone(), 0));
            match first {
                Some(focus) => model.focus = Some(focus),
                None => append_and_focus(model),
            }
        }
        None => {
            if model.active_document().is_some_and(|d| d.blocks.is_empty()) {
                append_and_focus(model);
            }
        }
    }
}

/// Backspace: an empty block without hidden text is removed, anything else
/// loses the character before the caret.
fn delete_back(model: &mut Model) {
    if let Some(Focus::Block {
        block_id,
        field: Field::Content,
        ..
    }) = model.focus.clone()
        && model
            .active_document()
            .and_then(|d| d.block(&block_id))
            .is_some_and(|b| b.content.is_empty() && !b.has_detail_text())
    {
        remove_block(model, &block_id);
        return;
    }
    edit_focused(model, TextField::delete_back);
}

/// The focused text as an editable field.
fn focused_input(model: &Model) -> Option<TextField> {
    let doc = model.active_document()?;
    match model.focus.as_ref()? {
        Focus::Title { caret } => Some(TextField::new(doc.title.as_str(), *caret)),
        Focus::Block {
            block_id,
            field,
            caret,
        } => field_text(doc, block_id, *field).map(|text| TextField::new(text, *caret)),
    }
}

fn field_text<'a>(doc: &'a Document, id: &BlockId, field: Field) -> Option<&'a str> {
    let block = doc.block(id)?;
    match field {
        Field::Content => Some(block.content.as_str()),
        Field::Detail => block.detail_text(),
    }
}

fn set_caret(model: &mut Model, caret: usize) {
    if let Some(Focus::Title { caret: slot } | Focus::Block { caret: slot, .. }) =
        model.focus.as_mut()
    {
        *slot = caret;
    }
}

fn move_caret(model: &mut Model, step: impl FnOnce(&mut TextField) -> bool) {
    if let Some(mut input) = focused_input(model)
        && step(&mut input)
    {
        set_caret(model, input.caret());
    }
}

/// Apply an edit to the focused field and write the text back.
fn edit_focused(model: &mut Model, edit: impl FnOnce(&mut TextField) -> bool) {
    let Some(mut input) = focused_input(model) else {
        return;
    };
    if !edit(&mut input) {
        return;
    }
    set_caret(model, input.caret());
    match model.focus.clone() {
        Some(Focus::Title { .. }) => {
            commit_with(model, |doc| document::set_title(doc, input.text()));
        }
        Some(Focus::Block {
            block_id,
            field: Field::Content,
            ..
        }) => apply_content(model, &block_id, input.text()),
        Some(Focus::Block {
            block_id,
            field: Field::Detail,
            ..
        }) => {
            commit_with(model, |doc| {
                document::update_detail_text(doc, &block_id, input.text())
            });
        }
        None => {}
    }
}

/// A place the caret can rest, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Stop {
    Title,
    Block(BlockId, Field),
}

fn stops(doc: &Document) -> Vec<Stop> {
    let mut stops = Vec::with_capacity(doc.blocks.len() + 1);
    stops.push(Stop::Title);
    for block in &doc.blocks {
        stops.push(Stop::Block(block.id.clone(), Field::Content));
        if block.expanded() == Some(true) {
            stops.push(Stop::Block(block.id.clone(), Field::Detail));
        }
    }
    stops
}

/// Move a line within the field, or to the neighbouring field keeping the
/// character column.
fn move_vertical(model: &mut Model, down: bool) {
    let Some(mut input) = focused_input(model) else {
        return;
    };
    let moved = if down {
        input.move_down()
    } else {
        input.move_up()
    };
    if moved {
        set_caret(model, input.caret());
        return;
    }

    let col = input.cursor().col;
    let (Some(doc), Some(focus)) = (model.active_document(), model.focus.as_ref()) else {
        return;
    };
    let here = match focus {
        Focus::Title { .. } => Stop::Title,
        Focus::Block {
            block_id, field, ..
        } => Stop::Block(block_id.clone(), *field),
    };
    let stops = stops(doc);
    let Some(idx) = stops.iter().position(|s| *s == here) else {
        return;
    };
    let target = if down {
        stops.get(idx + 1)
    } else {
        idx.checked_sub(1).and_then(|i| stops.get(i))
    };
    let next = match target {
        Some(Stop::Title) => Some(Focus::Title {
            caret: offset_at(&doc.title, 0, col),
        }),
        Some(Stop::Block(id, field)) => field_text(doc, id, *field).map(|text| {
            let line = if down { 0 } else { text.split('\n').count() - 1 };
            Focus::Block {
                block_id: id.clone(),
                field: *field,
                caret: offset_at(text, line, col),
            }
        }),
        None => None,
    };
    if let Some(focus) = next {
        model.focus = Some(focus);
    }
}
