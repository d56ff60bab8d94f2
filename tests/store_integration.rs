use chrono::{TimeZone, Utc};
use serde_json::json;

use blockpad::block::{Block, Variant};
use blockpad::document::{self, Document};
use blockpad::store::{self, JsonFileStore, PROJECTS_KEY, StoreError, ValueStore};

fn sample_collection() -> Vec<Document> {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let mut todo = Block::default_for(Variant::TodoItem).with_content("Book venue");
    todo.toggle_checked();
    let mut toggle = Block::default_for(Variant::Toggle).with_content("Details");
    toggle.set_detail_text("Second floor\nBring badge");
    vec![
        Document::from_parts(
            "Offsite",
            "🏕️",
            vec![
                Block::default_for(Variant::Heading1).with_content("Plan"),
                todo,
                toggle,
            ],
            now,
        ),
        Document::from_parts("", "📄", vec![Block::text()], now),
    ]
}

#[test]
fn test_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("projects.json");
    let documents = sample_collection();

    let mut first = JsonFileStore::open(&path).unwrap();
    store::write(&mut first, PROJECTS_KEY, &documents).unwrap();

    let second = JsonFileStore::open(&path).unwrap();
    let loaded: Vec<Document> = store::read(&second, PROJECTS_KEY, Vec::new());
    assert_eq!(loaded, documents);
}

#[test]
fn test_dormant_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let doc = sample_collection().remove(0);
    let toggle_id = doc.blocks[2].id.clone();
    let parked = document::set_block_variant(&doc, &toggle_id, Variant::Text, None);

    let mut store = JsonFileStore::open(&path).unwrap();
    store::write(&mut store, PROJECTS_KEY, &vec![parked]).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    let loaded: Vec<Document> = store::read(&reopened, PROJECTS_KEY, Vec::new());
    let restored = document::set_block_variant(&loaded[0], &toggle_id, Variant::Toggle, None);
    assert_eq!(
        restored.block(&toggle_id).unwrap().detail_text(),
        Some("Second floor\nBring badge")
    );
}

#[test]
fn test_hand_written_collection_decodes() {
    let value = json!([{
        "id": "doc-1",
        "title": "Groceries",
        "icon": "🛒",
        "lastModifiedAt": "2024-01-05T10:00:00Z",
        "blocks": [
            { "id": "b1", "type": "heading2", "content": "Market" },
            { "id": "b2", "type": "todo_item", "checked": true, "content": "Apples" },
            { "id": "b3", "type": "toggle", "expanded": false, "content": "Notes" }
        ]
    }]);
    let documents: Vec<Document> = serde_json::from_value(value).unwrap();

    let doc = &documents[0];
    assert_eq!(doc.title, "Groceries");
    assert_eq!(doc.blocks[0].variant(), Variant::Heading2);
    assert_eq!(doc.blocks[1].checked(), Some(true));
    assert_eq!(doc.blocks[2].expanded(), Some(false));
    assert_eq!(doc.blocks[2].detail_text(), Some(""));
}

#[test]
fn test_non_object_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::NotAnObject { .. }));
}

#[test]
fn test_refresh_sees_other_writer_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let mut ours = JsonFileStore::open(&path).unwrap();
    store::write(&mut ours, PROJECTS_KEY, &sample_collection()).unwrap();
    assert!(!ours.refresh().unwrap());

    let mut theirs = JsonFileStore::open(&path).unwrap();
    store::write(&mut theirs, PROJECTS_KEY, &Vec::<Document>::new()).unwrap();

    assert!(ours.refresh().unwrap());
    assert!(!ours.refresh().unwrap());
    let loaded: Vec<Document> = store::read(&ours, PROJECTS_KEY, sample_collection());
    assert!(loaded.is_empty());
}
