//! Editor controller
//!
//! The boundary between the command layer and whatever widget owns the text.
//! The host application keeps a reference to a controller and hands it to the
//! dispatcher; nothing reaches the editor through global state.

use crate::extract::Selection;
use crate::schema::SchemaSlot;
use std::sync::Arc;
use tracing::debug;

/// Read access to an editor plus the two hooks the console needs
pub trait EditorController: Send + Sync {
    /// Full buffer contents right now
    fn document(&self) -> String;

    /// Main selection (character offsets)
    fn selection(&self) -> Selection;

    /// Swap the autocomplete dictionary for a new table list
    fn dispatch_schema_change(&self, table_names: &[String]);

    /// Whether the completion popup is currently open
    fn is_completion_active(&self) -> bool;

    /// Selected text, or the statement under the cursor
    fn operative_text(&self) -> String {
        self.selection().extract(&self.document())
    }
}

/// In-memory editor used by the CLI and tests
#[derive(Debug, Default)]
pub struct BufferEditor {
    document: String,
    selection: Selection,
    completion_active: bool,
    schema: Arc<SchemaSlot>,
}

impl BufferEditor {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            ..Self::default()
        }
    }

    /// Share an existing schema slot instead of owning a fresh one
    pub fn with_schema(mut self, schema: Arc<SchemaSlot>) -> Self {
        self.schema = schema;
        self
    }

    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
        let len = self.document.chars().count();
        self.selection = Selection::new(self.selection.anchor.min(len), self.selection.head.min(len));
    }

    /// Move the selection; offsets are clamped to the document length
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.document.chars().count();
        self.selection = Selection::new(selection.anchor.min(len), selection.head.min(len));
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(Selection::cursor(pos));
    }

    pub fn set_completion_active(&mut self, active: bool) {
        self.completion_active = active;
    }

    pub fn schema(&self) -> &Arc<SchemaSlot> {
        &self.schema
    }
}

impl EditorController for BufferEditor {
    fn document(&self) -> String {
        self.document.clone()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn dispatch_schema_change(&self, table_names: &[String]) {
        debug!("Schema change requested with {} tables", table_names.len());
        self.schema.update(table_names);
    }

    fn is_completion_active(&self) -> bool {
        self.completion_active
    }
}
