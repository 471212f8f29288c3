//! Command dispatch
//!
//! Maps key chords to console commands and forwards the operative text to the
//! executor.

use crate::config::{Config, EnterKeyBehavior};
use crate::editor::EditorController;
use crate::error::{ConsoleError, ConsoleResult};
use crate::executor::{Executor, Intent};
use crate::keys::{Key, KeyChord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Something a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Run the selection or the statement under the cursor
    Execute,
    Commit,
    Rollback,
    /// Accept a completion, or fall back to newline/execute
    Enter,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Execute => "execute",
            Command::Commit => "commit",
            Command::Rollback => "rollback",
            Command::Enter => "enter",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "execute" | "exec" | "run" => Ok(Command::Execute),
            "commit" => Ok(Command::Commit),
            "rollback" => Ok(Command::Rollback),
            "enter" => Ok(Command::Enter),
            other => Err(ConsoleError::UnknownCommand(other.to_string())),
        }
    }
}

/// What the host should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Key consumed; the intent was forwarded to the executor
    Submitted(Intent),
    /// Key consumed; the host should accept the highlighted completion
    AcceptCompletion,
    /// Not ours; the host applies its default handling (e.g. newline)
    Unhandled,
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Outcome::Unhandled)
    }
}

/// Chord to command table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<KeyChord, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.bind(KeyChord::ctrl(Key::Enter), Command::Execute);
        keymap.bind(KeyChord::plain(Key::Enter), Command::Enter);
        keymap.bind(KeyChord::ctrl(Key::Char('[')), Command::Commit);
        keymap.bind(KeyChord::ctrl(Key::Char(']')), Command::Rollback);
        keymap
    }
}

impl Keymap {
    /// Default bindings with the config's overrides applied on top
    pub fn from_config(config: &Config) -> ConsoleResult<Self> {
        let mut keymap = Self::default();
        for (chord, command) in &config.keybindings {
            let chord = KeyChord::parse(chord)?;
            let command: Command = command.parse()?;
            debug!("  {} -> {}", chord, command);
            keymap.bind(chord, command);
        }
        Ok(keymap)
    }

    /// Add a binding, replacing whatever the chord did before
    pub fn bind(&mut self, chord: KeyChord, command: Command) {
        self.bindings.insert(chord, command);
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<Command> {
        self.bindings.remove(chord)
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<Command> {
        self.bindings.get(chord).copied()
    }

    /// Chords bound to `command`, in display order
    pub fn chords_for(&self, command: Command) -> Vec<KeyChord> {
        let mut chords: Vec<KeyChord> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| *k)
            .collect();
        chords.sort_by_key(|k| k.to_string());
        chords
    }
}

/// Routes key presses to the executor
pub struct Dispatcher {
    editor: Arc<dyn EditorController>,
    executor: Arc<dyn Executor>,
    keymap: Keymap,
    enter_behavior: EnterKeyBehavior,
}

impl Dispatcher {
    pub fn new(
        editor: Arc<dyn EditorController>,
        executor: Arc<dyn Executor>,
        keymap: Keymap,
        enter_behavior: EnterKeyBehavior,
    ) -> Self {
        Self {
            editor,
            executor,
            keymap,
            enter_behavior,
        }
    }

    /// Build from config; fails on a bad keybinding override
    pub fn from_config(
        config: &Config,
        editor: Arc<dyn EditorController>,
        executor: Arc<dyn Executor>,
    ) -> ConsoleResult<Self> {
        let keymap = Keymap::from_config(config)?;
        info!(
            "⌨️ Dispatcher ready (enter = {:?}, {} bindings)",
            config.enter_key_behavior,
            keymap.bindings.len()
        );
        Ok(Self::new(editor, executor, keymap, config.enter_key_behavior))
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn enter_behavior(&self) -> EnterKeyBehavior {
        self.enter_behavior
    }

    /// Handle a key press from the host
    pub fn handle_key(&self, chord: &KeyChord) -> Outcome {
        match self.keymap.lookup(chord) {
            Some(command) => {
                debug!("🎯 {} -> {}", chord, command);
                self.run(command)
            }
            None => Outcome::Unhandled,
        }
    }

    /// Run a command directly (toolbar buttons, CLI)
    pub fn run(&self, command: Command) -> Outcome {
        match command {
            Command::Execute => self.execute(),
            Command::Commit => self.signal(Intent::Commit),
            Command::Rollback => self.signal(Intent::Rollback),
            Command::Enter => self.enter(),
        }
    }

    fn execute(&self) -> Outcome {
        let text = self.editor.operative_text();
        if text.trim().is_empty() {
            debug!("No statement at cursor");
        }
        self.executor.submit(&text, Intent::Exec);
        Outcome::Submitted(Intent::Exec)
    }

    fn signal(&self, intent: Intent) -> Outcome {
        self.executor.submit("", intent);
        Outcome::Submitted(intent)
    }

    fn enter(&self) -> Outcome {
        if self.editor.is_completion_active() {
            return Outcome::AcceptCompletion;
        }
        match self.enter_behavior {
            EnterKeyBehavior::Newline => Outcome::Unhandled,
            EnterKeyBehavior::Execute => self.execute(),
        }
    }
}
