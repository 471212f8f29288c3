//! SQL Console Library
//!
//! Editor-side core of the SQL console: statement extraction at the cursor,
//! key dispatch for run/commit/rollback, schema-aware completion, and clients
//! for the console backend.

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod executor;
pub mod extract;
pub mod keys;
pub mod schema;

pub use commands::{Command, Dispatcher, Keymap, Outcome};
pub use config::{Config, EnterKeyBehavior};
pub use editor::{BufferEditor, EditorController};
pub use error::{ConsoleError, ConsoleResult};
pub use executor::{BackendExecutor, ExecEvent, Executor, Intent};
pub use extract::{extract, statement_bounds, Selection};
pub use keys::KeyChord;
pub use schema::SchemaSlot;
