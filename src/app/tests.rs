use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::{Value, json};
use tempfile::tempdir;

use crate::block::{Block, BlockId, Variant};
use crate::document::Document;
use crate::menu::{ICON_CHOICES, MenuKind, MenuPosition};
use crate::store::{self, JsonFileStore, MemoryStore, PROJECTS_KEY, StoreError, ValueStore};

use super::event_loop::ResizeDebouncer;
use super::{App, Field, Focus, Message, Model, ToastLevel, update};

fn create_page_model(blocks: Vec<Block>) -> Model {
    let doc = Document::from_parts("Plans", "📘", blocks, Utc::now());
    let id = doc.id.clone();
    update(Model::new(vec![doc], (80, 24)), Message::SelectDocument(id))
}

fn create_text_model() -> Model {
    create_page_model(vec![
        Block::text().with_content("first").with_id("a"),
        Block::text().with_content("second").with_id("b"),
    ])
}

fn active(model: &Model) -> &Document {
    model.active_document().unwrap()
}

fn content(model: &Model, id: &str) -> String {
    active(model).block(&BlockId::from(id)).unwrap().content.clone()
}

fn type_text(model: Model, text: &str) -> Model {
    text.chars()
        .fold(model, |model, ch| update(model, Message::InsertChar(ch)))
}

fn focus_on(model: Model, id: &str, caret: usize) -> Model {
    update(
        model,
        Message::SetFocus(Some(Focus::content(BlockId::from(id), caret))),
    )
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(column: u16, row: u16, button: MouseButton) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(button),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn draw(model: &mut Model) {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| App::view(model, frame)).unwrap();
}

fn memory_app() -> App {
    App::new(Box::new(MemoryStore::new())).with_seed(false)
}

fn stored_documents(app: &App) -> Vec<Document> {
    store::read(&*app.store, PROJECTS_KEY, Vec::new())
}

// Gallery

#[test]
fn test_create_document_opens_and_focuses_first_block() {
    let model = update(Model::new(Vec::new(), (80, 24)), Message::CreateDocument);

    let doc = active(&model);
    assert_eq!(doc.block_count(), 1);
    assert_eq!(model.focus, Some(Focus::content(doc.blocks[0].id.clone(), 0)));
    assert!(model.is_dirty());
}

#[test]
fn test_select_document_focuses_end_of_first_block() {
    let model = create_text_model();
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 5)));
    assert_eq!(model.viewport.offset(), 0);
    assert!(!model.is_dirty());
}

#[test]
fn test_select_empty_document_focuses_title() {
    let model = create_page_model(Vec::new());
    assert_eq!(model.focus, Some(Focus::Title { caret: 5 }));
}

#[test]
fn test_deselect_returns_to_gallery() {
    let model = update(create_text_model(), Message::DeselectDocument);
    assert!(model.active_document().is_none());
    assert!(model.focus.is_none());
    assert!(model.menu.is_none());
    assert_eq!(model.gallery.len(), 1);
}

#[test]
fn test_delete_open_document_closes_it() {
    let model = create_text_model();
    let id = active(&model).id.clone();
    let model = update(model, Message::DeleteDocument(id));
    assert!(model.gallery.is_empty());
    assert!(model.active_document().is_none());
    assert!(model.focus.is_none());
    assert!(model.is_dirty());
}

// Editing

#[test]
fn test_typing_updates_block_and_caret() {
    let model = type_text(create_text_model(), "ly");
    assert_eq!(content(&model, "a"), "firstly");
    assert_eq!(model.focus.as_ref().map(Focus::caret), Some(7));
    assert!(model.is_dirty());
    assert_eq!(model.revision(), 2);
}

#[test]
fn test_unchanged_content_is_not_a_change() {
    let model = update(
        create_text_model(),
        Message::UpdateBlockContent(BlockId::from("a"), "first".into()),
    );
    assert!(!model.is_dirty());
    assert_eq!(model.revision(), 0);
}

#[test]
fn test_update_for_missing_block_is_ignored() {
    let model = update(
        create_text_model(),
        Message::UpdateBlockContent(BlockId::from("zz"), "x".into()),
    );
    assert!(!model.is_dirty());
    assert_eq!(active(&model).block_count(), 2);
}

#[test]
fn test_title_rejects_line_breaks() {
    let model = update(create_text_model(), Message::FocusTitle);
    let model = update(model, Message::InsertChar('\n'));
    let model = update(model, Message::InsertStr("a\nb".into()));
    assert_eq!(active(&model).title, "Plansa b");
}

#[test]
fn test_paste_normalizes_crlf_in_blocks() {
    let model = update(create_text_model(), Message::InsertStr("\r\nx".into()));
    assert_eq!(content(&model, "a"), "first\nx");
}

#[test]
fn test_split_line_inserts_block_after_and_focuses_it() {
    let model = update(create_text_model(), Message::SplitLine);
    let doc = active(&model);
    assert_eq!(doc.block_count(), 3);
    let new_id = doc.blocks[1].id.clone();
    assert_eq!(doc.blocks[1].content, "");
    assert_eq!(model.focus, Some(Focus::content(new_id, 0)));
}

#[test]
fn test_newline_stays_inside_block() {
    let model = update(create_text_model(), Message::InsertNewline);
    assert_eq!(content(&model, "a"), "first\n");
    assert_eq!(active(&model).block_count(), 2);
}

#[test]
fn test_enter_in_title_moves_to_first_block() {
    let model = update(create_text_model(), Message::FocusTitle);
    let model = update(model, Message::SplitLine);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 0)));
    assert_eq!(active(&model).block_count(), 2);
}

#[test]
fn test_backspace_removes_empty_block_and_refocuses_previous() {
    let model = update(create_text_model(), Message::SplitLine);
    let model = update(model, Message::DeleteBack);
    assert_eq!(active(&model).block_count(), 2);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 5)));
}

#[test]
fn test_backspace_on_sole_empty_block_keeps_it() {
    let model = create_page_model(vec![Block::text().with_id("only")]);
    let model = update(model, Message::DeleteBack);
    assert_eq!(active(&model).block_count(), 1);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("only"), 0)));
    assert!(!model.is_dirty());
}

#[test]
fn test_backspace_deletes_character_before_caret() {
    let model = update(create_text_model(), Message::DeleteBack);
    assert_eq!(content(&model, "a"), "firs");
}

#[test]
fn test_delete_unfocused_block_keeps_focus() {
    let model = update(create_text_model(), Message::DeleteBlock(BlockId::from("b")));
    assert_eq!(active(&model).block_count(), 1);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 5)));
}

// Slash menu and shortcuts

#[test]
fn test_slash_opens_insertion_menu_for_block() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "/");

    let menu = model.menu.as_ref().unwrap();
    assert!(menu.is_insertion());
    assert_eq!(menu.block_id(), Some(&BlockId::from("a")));
}

#[test]
fn test_slash_menu_anchors_below_block() {
    let mut model = create_page_model(vec![Block::text().with_id("a")]);
    draw(&mut model);
    let model = type_text(model, "/");

    let region_row = 3;
    let menu = model.menu.as_ref().unwrap();
    assert_eq!(menu.position, MenuPosition::new(2, region_row + 1));
}

#[test]
fn test_slash_after_text_does_not_open_menu() {
    let model = type_text(create_text_model(), "/");
    assert!(model.menu.is_none());
    assert_eq!(content(&model, "a"), "first/");
}

#[test]
fn test_clearing_slash_closes_menu() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "/");
    let model = update(model, Message::DeleteBack);
    assert!(model.menu.is_none());
    assert_eq!(content(&model, "a"), "");
}

#[test]
fn test_insertion_menu_choice_converts_and_clears() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "/");
    let model = update(model, Message::MenuDown);
    let model = update(model, Message::MenuSelect);

    let block = active(&model).block(&BlockId::from("a")).unwrap();
    assert_eq!(block.variant(), Variant::Heading1);
    assert_eq!(block.content, "");
    assert!(model.menu.is_none());
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 0)));
}

#[test]
fn test_markdown_shortcut_converts_block() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "# ");

    let block = active(&model).block(&BlockId::from("a")).unwrap();
    assert_eq!(block.variant(), Variant::Heading1);
    assert_eq!(block.content, "");
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("a"), 0)));
}

#[test]
fn test_todo_shortcut_then_check() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "[] buy milk");
    assert_eq!(content(&model, "a"), "buy milk");

    let model = update(model, Message::ToggleChecked(BlockId::from("a")));
    let block = active(&model).block(&BlockId::from("a")).unwrap();
    assert_eq!(block.checked(), Some(true));
}

#[test]
fn test_shortcut_inside_text_is_plain_text() {
    let model = type_text(create_text_model(), " # ");
    assert_eq!(
        active(&model).block(&BlockId::from("a")).unwrap().variant(),
        Variant::Text
    );
}

// Options, icon picker and chords

#[test]
fn test_options_menu_duplicate_and_delete() {
    let model = create_text_model();
    let model = update(
        model,
        Message::OpenOptionsMenu(BlockId::from("b"), MenuPosition::new(3, 3)),
    );
    let model = update(model, Message::MenuSelectAt(0));
    assert_eq!(active(&model).block_count(), 3);
    assert_eq!(active(&model).blocks[2].content, "second");
    assert!(model.menu.is_none());

    let model = update(
        model,
        Message::OpenOptionsMenu(BlockId::from("b"), MenuPosition::new(3, 3)),
    );
    let model = update(model, Message::MenuSelectAt(1));
    assert_eq!(active(&model).block_count(), 2);
    assert!(!active(&model).contains_block(&BlockId::from("b")));
}

#[test]
fn test_options_menu_convert_keeps_content() {
    let model = create_text_model();
    let model = update(
        model,
        Message::OpenOptionsMenu(BlockId::from("a"), MenuPosition::default()),
    );
    let model = update(model, Message::MenuHighlight(4));
    let model = update(model, Message::MenuSelect);

    let block = active(&model).block(&BlockId::from("a")).unwrap();
    assert_ne!(block.variant(), Variant::Text);
    assert_eq!(block.content, "first");
}

#[test]
fn test_options_menu_for_missing_block_stays_closed() {
    let model = update(
        create_text_model(),
        Message::OpenOptionsMenu(BlockId::from("zz"), MenuPosition::default()),
    );
    assert!(model.menu.is_none());
}

#[test]
fn test_icon_picker_sets_icon() {
    let model = update(create_text_model(), Message::OpenIconPicker(MenuPosition::default()));
    assert!(matches!(
        model.menu.as_ref().map(|m| &m.kind),
        Some(MenuKind::IconPicker)
    ));
    let model = update(model, Message::MenuSelectAt(3));
    assert_eq!(active(&model).icon, ICON_CHOICES[3]);
    assert!(model.menu.is_none());
}

#[test]
fn test_toggle_chord_converts_focused_block() {
    let model = update(create_text_model(), Message::ToggleChord);
    let block = active(&model).block(&BlockId::from("a")).unwrap();
    assert_eq!(block.variant(), Variant::Toggle);
    assert_eq!(block.content, "first");
    assert_eq!(block.expanded(), Some(true));
}

// Navigation

#[test]
fn test_move_up_from_first_block_reaches_title() {
    let model = focus_on(create_text_model(), "a", 2);
    let model = update(model, Message::MoveUp);
    assert_eq!(model.focus, Some(Focus::Title { caret: 2 }));
}

#[test]
fn test_move_down_keeps_column() {
    let model = focus_on(create_text_model(), "a", 3);
    let model = update(model, Message::MoveDown);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("b"), 3)));
}

#[test]
fn test_move_down_enters_open_toggle_detail() {
    let mut toggle = Block::default_for(Variant::Toggle)
        .with_content("Why")
        .with_id("t");
    toggle.set_detail_text("because");
    let model = create_page_model(vec![toggle, Block::text().with_id("z")]);
    let model = update(model, Message::MoveDown);

    let focus = model.focus.as_ref().unwrap();
    assert_eq!(focus.field(), Some(Field::Detail));
    assert_eq!(focus.block_id(), Some(&BlockId::from("t")));

    let model = update(model, Message::MoveDown);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("z"), 0)));
}

#[test]
fn test_enter_and_leave_detail() {
    let toggle = Block::default_for(Variant::Toggle)
        .with_content("Why")
        .with_id("t");
    let model = create_page_model(vec![toggle]);
    let model = update(model, Message::EnterDetail);
    assert_eq!(model.focus, Some(Focus::detail(BlockId::from("t"), 0)));

    let model = type_text(model, "line");
    let model = update(model, Message::SplitLine);
    let block = active(&model).block(&BlockId::from("t")).unwrap();
    assert_eq!(block.detail_text(), Some("line\n"));
    assert_eq!(block.content, "Why");

    let model = update(model, Message::LeaveDetail);
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("t"), 3)));
}

#[test]
fn test_collapsing_toggle_moves_caret_out_of_detail() {
    let toggle = Block::default_for(Variant::Toggle)
        .with_content("Why")
        .with_id("t");
    let model = create_page_model(vec![toggle]);
    let model = update(model, Message::EnterDetail);
    let model = update(model, Message::ToggleExpanded(BlockId::from("t")));
    assert_eq!(model.focus, Some(Focus::content(BlockId::from("t"), 3)));
}

#[test]
fn test_scroll_down_updates_viewport() {
    let blocks = (0..60)
        .map(|i| Block::text().with_content(format!("row {i}")))
        .collect();
    let mut model = create_page_model(blocks);
    draw(&mut model);
    let model = update(model, Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
}

#[test]
fn test_resize_updates_viewport() {
    let model = update(create_text_model(), Message::Resize(120, 40));
    assert_eq!(model.screen_size(), (120, 40));
    assert_eq!(model.viewport.width(), 120);
    assert_eq!(model.viewport.height(), 39);
}

#[test]
fn test_resize_debouncer_waits_for_quiet_period() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 0);

    assert!(debouncer.take_ready(50).is_none());
    assert_eq!(debouncer.take_ready(100), Some((120, 40)));
}

#[test]
fn test_resize_debouncer_keeps_latest_size() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(120, 40, 0);
    debouncer.queue(140, 50, 20);

    assert!(debouncer.take_ready(80).is_none());
    assert_eq!(debouncer.take_ready(120), Some((140, 50)));
}

// Input mapping

#[test]
fn test_ctrl_c_quits() {
    let model = create_text_model();
    let msg = App::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &model);
    assert_eq!(msg, Some(Message::Quit));
}

#[test]
fn test_gallery_enter_opens_highlighted_project() {
    let model = update(create_text_model(), Message::DeselectDocument);
    let id = model.gallery.selected_id().cloned();
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        id.map(Message::SelectDocument)
    );
    assert_eq!(App::handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
}

#[test]
fn test_page_keys_edit_text() {
    let model = create_text_model();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::InsertChar('/'))
    );
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::SplitLine));
    assert_eq!(
        App::handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT), &model),
        Some(Message::InsertNewline)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::DeselectDocument)
    );
}

#[test]
fn test_toggle_chord_key_variants() {
    let model = create_text_model();
    let shifted = KeyEvent::new(
        KeyCode::Char('7'),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    );
    let ampersand = KeyEvent::new(KeyCode::Char('&'), KeyModifiers::CONTROL);
    assert_eq!(App::handle_key(shifted, &model), Some(Message::ToggleChord));
    assert_eq!(App::handle_key(ampersand, &model), Some(Message::ToggleChord));
}

#[test]
fn test_insertion_menu_lets_typing_through() {
    let model = create_page_model(vec![Block::text().with_id("a")]);
    let model = type_text(model, "/");
    assert_eq!(
        App::handle_key(key(KeyCode::Char('h')), &model),
        Some(Message::InsertChar('h'))
    );
    assert_eq!(App::handle_key(key(KeyCode::Down), &model), Some(Message::MenuDown));
}

#[test]
fn test_options_menu_swallows_typing() {
    let model = update(
        create_text_model(),
        Message::OpenOptionsMenu(BlockId::from("a"), MenuPosition::default()),
    );
    assert_eq!(App::handle_key(key(KeyCode::Char('h')), &model), None);
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::CloseMenus));
}

#[test]
fn test_click_on_add_row_appends_block() {
    let mut model = create_text_model();
    draw(&mut model);
    let add_row = model.layout.page.as_ref().unwrap().add_row;
    let row = u16::try_from(add_row).unwrap();

    let msg = App::handle_mouse(click(6, row, MouseButton::Left), &model);
    assert_eq!(msg, Some(Message::AppendBlock));
}

#[test]
fn test_click_in_content_places_caret() {
    let mut model = create_text_model();
    draw(&mut model);

    let msg = App::handle_mouse(click(5, 4, MouseButton::Left), &model);
    assert_eq!(
        msg,
        Some(Message::SetFocus(Some(Focus::content(BlockId::from("b"), 3))))
    );
}

#[test]
fn test_right_click_opens_options_menu() {
    let mut model = create_text_model();
    draw(&mut model);

    let msg = App::handle_mouse(click(4, 3, MouseButton::Right), &model);
    assert_eq!(
        msg,
        Some(Message::OpenOptionsMenu(
            BlockId::from("a"),
            MenuPosition::new(4, 3)
        ))
    );
}

#[test]
fn test_click_outside_menu_closes_it() {
    let model = update(
        create_text_model(),
        Message::OpenOptionsMenu(BlockId::from("a"), MenuPosition::new(10, 5)),
    );
    let msg = App::handle_mouse(click(70, 20, MouseButton::Left), &model);
    assert_eq!(msg, Some(Message::CloseMenus));
}

// Modification time

fn stale_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn create_stale_model(blocks: Vec<Block>) -> Model {
    let doc = Document::from_parts("Plans", "📘", blocks, stale_time());
    let id = doc.id.clone();
    update(Model::new(vec![doc], (80, 24)), Message::SelectDocument(id))
}

#[test]
fn test_every_document_change_refreshes_modified_time() {
    let changes = [
        Message::InsertBlockAfter(BlockId::from("a")),
        Message::DeleteBlock(BlockId::from("a")),
        Message::DuplicateBlock(BlockId::from("a")),
        Message::SetBlockVariant(BlockId::from("a"), Variant::Heading1),
        Message::UpdateTitle("Renamed".to_string()),
        Message::UpdateIcon("🚀".to_string()),
    ];
    for msg in changes {
        let model = create_stale_model(vec![
            Block::text().with_content("first").with_id("a"),
            Block::text().with_content("second").with_id("b"),
        ]);
        let model = update(model, msg.clone());
        assert!(
            active(&model).last_modified_at > stale_time(),
            "{msg:?} did not refresh the modified time"
        );
        assert!(model.is_dirty(), "{msg:?} did not mark the model dirty");
    }
}

#[test]
fn test_rejected_change_keeps_modified_time() {
    let model = create_stale_model(vec![Block::text().with_id("only")]);
    let model = update(model, Message::DeleteBlock(BlockId::from("only")));
    let model = update(model, Message::DeleteBlock(BlockId::from("missing")));

    assert_eq!(active(&model).block_count(), 1);
    assert_eq!(active(&model).last_modified_at, stale_time());
    assert!(!model.is_dirty());
}

// Side effects

#[test]
fn test_dirty_model_is_persisted() {
    let mut app = memory_app();
    let mut model = app.initial_model((80, 24));
    assert!(model.gallery.is_empty());

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);

    assert!(!model.is_dirty());
    let stored = stored_documents(&app);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, active(&model).id);
}

#[test]
fn test_clean_model_is_not_written() {
    let mut app = memory_app();
    let mut model = app.initial_model((80, 24));
    let msg = Message::ToggleHelp;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);
    assert!(app.store.load(PROJECTS_KEY).unwrap().is_none());
}

#[test]
fn test_empty_store_is_seeded() {
    let mut app = App::new(Box::new(MemoryStore::new()));
    let model = app.initial_model((80, 24));
    assert!(!model.gallery.is_empty());
    assert_eq!(stored_documents(&app).len(), model.gallery.len());
}

#[test]
fn test_stored_empty_collection_is_not_reseeded() {
    let mut store = MemoryStore::new();
    store::write(&mut store, PROJECTS_KEY, &Vec::<Document>::new()).unwrap();
    let mut app = App::new(Box::new(store));
    let model = app.initial_model((80, 24));
    assert!(model.gallery.is_empty());
}

#[test]
fn test_store_changed_reloads_remote_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let mut app = App::new(Box::new(JsonFileStore::open(&path).unwrap()));
    let mut model = app.initial_model((80, 24));
    assert!(!model.gallery.is_empty());
    assert_eq!(model.store_path.as_deref(), Some(path.as_path()));

    let remote = Document::from_parts("Remote", "🌍", vec![Block::text()], Utc::now());
    let mut other = JsonFileStore::open(&path).unwrap();
    store::write(&mut other, PROJECTS_KEY, &vec![remote.clone()]).unwrap();

    let revision = model.revision();
    app.handle_message_side_effects(&mut model, &mut None, &Message::StoreChanged);

    assert_eq!(model.gallery.len(), 1);
    assert_eq!(model.gallery.documents()[0].title, "Remote");
    assert_eq!(model.revision(), revision + 1);
    assert!(!model.is_dirty());
    assert_eq!(
        model.active_toast(),
        Some(("Projects updated", ToastLevel::Info))
    );
}

#[test]
fn test_own_write_is_not_reloaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let mut app = App::new(Box::new(JsonFileStore::open(&path).unwrap())).with_seed(false);
    let mut model = app.initial_model((80, 24));

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);
    let revision = model.revision();

    app.handle_message_side_effects(&mut model, &mut None, &Message::StoreChanged);
    assert_eq!(model.revision(), revision);
    assert!(model.active_toast().is_none());
}

#[test]
fn test_remote_delete_of_open_document_returns_to_gallery() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let mut app = App::new(Box::new(JsonFileStore::open(&path).unwrap())).with_seed(false);
    let mut model = app.initial_model((80, 24));
    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);

    let mut other = JsonFileStore::open(&path).unwrap();
    store::write(&mut other, PROJECTS_KEY, &Vec::<Document>::new()).unwrap();
    app.handle_message_side_effects(&mut model, &mut None, &Message::StoreChanged);

    assert!(model.active_document().is_none());
    assert!(model.focus.is_none());
}

/// Store that can be told to fail reads or writes.
struct FailingStore {
    stored: Option<Value>,
    fail_load: bool,
    fail_save: bool,
}

impl FailingStore {
    fn io_error() -> StoreError {
        StoreError::io(
            Path::new("/readonly/projects.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        )
    }
}

impl ValueStore for FailingStore {
    fn load(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        if self.fail_load {
            return Err(Self::io_error());
        }
        Ok(self.stored.clone())
    }

    fn save(&mut self, _key: &str, value: Value) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(Self::io_error());
        }
        self.stored = Some(value);
        Ok(())
    }
}

#[test]
fn test_failed_save_keeps_model_and_shows_error() {
    let store = FailingStore {
        stored: Some(json!([])),
        fail_load: false,
        fail_save: true,
    };
    let mut app = App::new(Box::new(store));
    let mut model = app.initial_model((80, 24));

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);

    let (message, level) = model.active_toast().unwrap();
    assert!(message.starts_with("Save failed: "), "{message}");
    assert_eq!(level, ToastLevel::Error);
    assert_eq!(model.gallery.len(), 1);
    assert!(model.active_document().is_some());
    assert!(!model.is_dirty());
}

fn collection_with_bad_block() -> Value {
    let good = Document::from_parts(
        "Keep me",
        "📘",
        vec![Block::text().with_content("safe")],
        Utc::now(),
    );
    let mut bad = serde_json::to_value(Document::from_parts(
        "Broken",
        "📕",
        vec![Block::text()],
        Utc::now(),
    ))
    .unwrap();
    bad["blocks"][0]["type"] = json!("h1");
    json!([serde_json::to_value(good).unwrap(), bad])
}

#[test]
fn test_unreadable_project_is_skipped_and_kept_aside() {
    let raw = collection_with_bad_block();
    let mut store = MemoryStore::new();
    store.save(PROJECTS_KEY, raw.clone()).unwrap();
    let mut app = App::new(Box::new(store));

    let mut model = app.initial_model((80, 24));
    assert_eq!(model.gallery.len(), 1);
    assert_eq!(model.gallery.documents()[0].title, "Keep me");
    let (message, level) = model.active_toast().unwrap();
    assert!(message.contains("unreadable"), "{message}");
    assert_eq!(level, ToastLevel::Error);

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);

    let stored = stored_documents(&app);
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|doc| doc.title == "Keep me"));
    assert_eq!(
        app.store.load(&store::unreadable_key(PROJECTS_KEY)).unwrap(),
        Some(raw)
    );
}

#[test]
fn test_unreadable_store_pauses_saving() {
    let store = FailingStore {
        stored: None,
        fail_load: true,
        fail_save: false,
    };
    let mut app = App::new(Box::new(store));
    let mut model = app.initial_model((80, 24));
    assert!(model.gallery.is_empty());
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);

    assert_eq!(
        model.active_toast(),
        Some((
            "Saving paused: stored projects could not be read",
            ToastLevel::Error
        ))
    );
    assert_eq!(model.gallery.len(), 1);
}

#[test]
fn test_malformed_remote_write_keeps_local_projects() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let mut app = App::new(Box::new(JsonFileStore::open(&path).unwrap()));
    let mut model = app.initial_model((80, 24));
    let titles: Vec<String> = model
        .gallery
        .documents()
        .iter()
        .map(|doc| doc.title.clone())
        .collect();
    assert!(!titles.is_empty());

    let mut other = JsonFileStore::open(&path).unwrap();
    other.save(PROJECTS_KEY, json!({"oops": true})).unwrap();
    let revision = model.revision();
    app.handle_message_side_effects(&mut model, &mut None, &Message::StoreChanged);

    let kept: Vec<String> = model
        .gallery
        .documents()
        .iter()
        .map(|doc| doc.title.clone())
        .collect();
    assert_eq!(kept, titles);
    assert_eq!(model.revision(), revision);
    let (message, level) = model.active_toast().unwrap();
    assert!(message.starts_with("Reload failed: "), "{message}");
    assert_eq!(level, ToastLevel::Error);
    assert_eq!(
        app.store.load(&store::unreadable_key(PROJECTS_KEY)).unwrap(),
        Some(json!({"oops": true}))
    );

    let msg = Message::CreateDocument;
    model = update(model, msg.clone());
    app.handle_message_side_effects(&mut model, &mut None, &msg);
    assert_eq!(stored_documents(&app).len(), titles.len() + 1);
}
