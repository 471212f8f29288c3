#![allow(dead_code)]

pub mod mock_backend;
pub mod mock_executor;
pub mod mock_server;

use sqlconsole::{BufferEditor, Selection};

/// Editor holding `doc` with the caret at `cursor`
pub fn editor_at(doc: &str, cursor: usize) -> BufferEditor {
    let mut editor = BufferEditor::new(doc);
    editor.set_cursor(cursor);
    editor
}

/// Editor holding `doc` with `from..to` selected
pub fn editor_selecting(doc: &str, from: usize, to: usize) -> BufferEditor {
    let mut editor = BufferEditor::new(doc);
    editor.set_selection(Selection::new(from, to));
    editor
}
