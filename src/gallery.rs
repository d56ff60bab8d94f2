//! Project gallery: the document collection and which document is open.

use chrono::{DateTime, Utc};

use crate::block::{Block, Variant};
use crate::document::{Document, DocumentId};

/// Number of block previews shown on a card.
pub const PREVIEW_BLOCKS: usize = 3;

/// Preview text for blocks with no content.
pub const EMPTY_PREVIEW: &str = "...";

/// Display format for card and info bar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything a gallery card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    pub id: DocumentId,
    pub icon: String,
    pub title: String,
    pub updated: String,
    pub previews: Vec<String>,
    pub block_count: usize,
}

/// Owns the document collection.
///
/// The open document is tracked by id only and looked up on every access.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    documents: Vec<Document>,
    active: Option<DocumentId>,
    /// Highlighted card while browsing.
    selected: usize,
}

impl Gallery {
    pub const fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            active: None,
            selected: 0,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Add a fresh document at the end and open it.
    pub fn create(&mut self, now: DateTime<Utc>) -> DocumentId {
        let doc = Document::new(now);
        let id = doc.id.clone();
        self.documents.push(doc);
        self.selected = self.documents.len() - 1;
        self.active = Some(id.clone());
        id
    }

    /// Remove a document. Closes it if it was open.
    pub fn delete(&mut self, id: &DocumentId) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| &d.id != id);
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        self.clamp_selection();
        self.documents.len() != before
    }

    /// Open a document. Unknown ids are ignored.
    pub fn select(&mut self, id: &DocumentId) -> bool {
        let Some(idx) = self.documents.iter().position(|d| &d.id == id) else {
            return false;
        };
        self.active = Some(id.clone());
        self.selected = idx;
        true
    }

    pub fn deselect(&mut self) {
        self.active = None;
    }

    pub const fn active_id(&self) -> Option<&DocumentId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Document> {
        self.get(self.active.as_ref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        let id = self.active.as_ref()?;
        self.documents.iter_mut().find(|d| &d.id == id)
    }

    /// Swap in a new version of a document with the same id.
    pub fn replace(&mut self, doc: Document) -> bool {
        match self.documents.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => {
                *slot = doc;
                true
            }
            None => false,
        }
    }

    /// Replace the whole collection, e.g. after a remote write.
    pub fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        if let Some(id) = &self.active
            && !self.documents.iter().any(|d| &d.id == id)
        {
            self.active = None;
        }
        self.clamp_selection();
    }

    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&DocumentId> {
        self.documents.get(self.selected).map(|d| &d.id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.documents.len() {
            self.selected += 1;
        }
    }

    pub const fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.documents.len().saturating_sub(1));
    }

    pub fn summaries(&self) -> Vec<CardSummary> {
        self.documents.iter().map(summarize).collect()
    }
}

pub fn summarize(doc: &Document) -> CardSummary {
    CardSummary {
        id: doc.id.clone(),
        icon: doc.icon.clone(),
        title: doc.display_title().to_string(),
        updated: format_date(doc.last_modified_at),
        previews: doc
            .blocks
            .iter()
            .take(PREVIEW_BLOCKS)
            .map(|b| preview_line(&b.content))
            .collect(),
        block_count: doc.block_count(),
    }
}

fn preview_line(content: &str) -> String {
    content
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .map_or_else(|| EMPTY_PREVIEW.to_string(), str::to_string)
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// Starter collection for a store that has never been written.
pub fn sample_documents(now: DateTime<Utc>) -> Vec<Document> {
    let mut bought = Block::default_for(Variant::TodoItem).with_content("Buy domain");
    bought.toggle_checked();

    vec![
        Document::from_parts(
            "Website launch",
            "🚀",
            vec![
                Block::default_for(Variant::Heading1).with_content("Launch plan"),
                Block::text().with_content("Goal: ship the new landing page in Q4."),
                Block::default_for(Variant::Heading2).with_content("Main tasks"),
                bought,
                Block::default_for(Variant::TodoItem).with_content("Set up SSL"),
                Block::default_for(Variant::BulletItem).with_content("Review analytics"),
            ],
            now,
        ),
        Document::from_parts(
            "Content ideas",
            "💡",
            vec![
                Block::default_for(Variant::Heading1).with_content("Video ideas for October"),
                Block::default_for(Variant::BulletItem).with_content("React tutorial"),
                Block::default_for(Variant::BulletItem).with_content("Productivity vlog"),
            ],
            now,
        ),
    ]
}
