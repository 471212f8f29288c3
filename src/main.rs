//! SQL Console - command line front end
//!
//! Drives the editor core from the terminal: extract the statement at a
//! cursor, run it against the backend, send commit/rollback, and manage users.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sqlconsole::api::{ConsoleClient, Role, SqlBackend, SqlResult, User};
use sqlconsole::{
    BackendExecutor, BufferEditor, Command, Config, Dispatcher, EditorController, ExecEvent,
    KeyChord, Outcome, SchemaSlot, Selection,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target database id (overrides config)
    #[arg(long, global = true)]
    db: Option<i64>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the statement at a cursor (or the selected range)
    Extract {
        #[arg(short, long)]
        file: PathBuf,
        /// Cursor / selection start (character offset)
        #[arg(short, long)]
        cursor: usize,
        /// Selection end (character offset)
        #[arg(short, long)]
        end: Option<usize>,
    },
    /// Execute the statement at a cursor
    Run {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        cursor: usize,
        #[arg(short, long)]
        end: Option<usize>,
    },
    /// Simulate a key press in the editor
    Key {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        cursor: usize,
        /// Chord such as "Ctrl-Enter"
        chord: String,
        /// Pretend the completion popup is open
        #[arg(long)]
        completing: bool,
    },
    /// Commit the session transaction
    Commit,
    /// Roll back the session transaction
    Rollback,
    /// List tables of the target database
    Tables,
    /// Autocomplete suggestions for a prefix
    Complete { prefix: String },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand, Debug)]
enum UserAction {
    List,
    Get {
        id: i64,
    },
    Create {
        username: String,
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    Update {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    Delete {
        id: i64,
    },
    /// Replace the databases a user may access
    Grant {
        id: i64,
        dbs: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if args.db.is_some() {
        config.default_db_id = args.db;
    }

    // Setup logging
    let level = if args.verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("SQL Console v{} ({})", env!("CARGO_PKG_VERSION"), config.server_url);

    match args.command {
        Cmd::Extract { file, cursor, end } => {
            let editor = load_editor(&file, cursor, end)?;
            println!("{}", editor.operative_text());
        }
        Cmd::Run { file, cursor, end } => {
            let editor = load_editor(&file, cursor, end)?;
            dispatch(&config, editor, |d| d.run(Command::Execute)).await?;
        }
        Cmd::Key {
            file,
            cursor,
            chord,
            completing,
        } => {
            let chord = KeyChord::parse(&chord)?;
            let mut editor = load_editor(&file, cursor, None)?;
            editor.set_completion_active(completing);
            dispatch(&config, editor, |d| d.handle_key(&chord)).await?;
        }
        Cmd::Commit => {
            dispatch(&config, BufferEditor::default(), |d| d.run(Command::Commit)).await?;
        }
        Cmd::Rollback => {
            dispatch(&config, BufferEditor::default(), |d| d.run(Command::Rollback)).await?;
        }
        Cmd::Tables => {
            let client = ConsoleClient::from_config(&config)?;
            for table in client.tables(require_db(&config)?).await? {
                println!("{}", table);
            }
        }
        Cmd::Complete { prefix } => {
            let slot = SchemaSlot::new(config.upper_case_keywords);
            if let Some(db_id) = config.default_db_id {
                let client = ConsoleClient::from_config(&config)?;
                slot.update(&client.tables(db_id).await?);
            }
            for c in slot.complete(&prefix, config.completion_limit) {
                println!("{:<8} {}", format!("{:?}", c.kind).to_lowercase(), c.label);
            }
        }
        Cmd::Users { action } => users(&config, action).await?,
    }

    Ok(())
}

fn load_editor(file: &Path, cursor: usize, end: Option<usize>) -> Result<BufferEditor> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut editor = BufferEditor::new(text);
    editor.set_selection(Selection::new(cursor, end.unwrap_or(cursor)));
    Ok(editor)
}

fn require_db(config: &Config) -> Result<i64> {
    config
        .default_db_id
        .context("No database selected (use --db or set default_db_id)")
}

/// Wire an editor to the backend, run one command and report its result
async fn dispatch(
    config: &Config,
    editor: BufferEditor,
    press: impl FnOnce(&Dispatcher) -> Outcome,
) -> Result<()> {
    let client = Arc::new(ConsoleClient::from_config(config)?);
    let (executor, mut events) =
        BackendExecutor::new(client, Handle::current(), config.default_db_id);
    let dispatcher = Dispatcher::from_config(config, Arc::new(editor), Arc::new(executor))?;

    match press(&dispatcher) {
        Outcome::Submitted(intent) => debug!("Submitted {}", intent),
        Outcome::AcceptCompletion => {
            println!("(completion accepted)");
            return Ok(());
        }
        Outcome::Unhandled => {
            println!("(key not handled by console)");
            return Ok(());
        }
    }

    match events.recv().await {
        Some(ExecEvent::Completed { intent, result }) => {
            info!("✅ {} finished", intent);
            print_result(&result);
            Ok(())
        }
        Some(ExecEvent::Failed { intent, message }) => bail!("{} failed: {}", intent, message),
        Some(ExecEvent::Skipped { intent, reason }) => bail!("{} skipped: {}", intent, reason),
        None => bail!("executor stopped before reporting a result"),
    }
}

fn print_result(result: &SqlResult) {
    println!(
        "{:?} [{}] {}",
        result.status,
        result
            .tx_status
            .map(|t| format!("{:?}", t).to_uppercase())
            .unwrap_or_default(),
        result.message.as_deref().unwrap_or("")
    );

    let (Some(columns), Some(rows)) = (&result.columns, &result.rows) else {
        return;
    };
    println!("{}", columns.join("\t"));
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match row.get(c) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => "NULL".to_string(),
                Some(v) => v.to_string(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}

async fn users(config: &Config, action: UserAction) -> Result<()> {
    let client = ConsoleClient::from_config(config)?;
    let users = client.users();

    match action {
        UserAction::List => {
            for u in users.list().await? {
                println!("{}\t{}\t{}", u.id.unwrap_or_default(), u.username, u.role);
            }
        }
        UserAction::Get { id } => {
            println!("{}", serde_json::to_string_pretty(&users.get(id).await?)?);
        }
        UserAction::Create {
            username,
            password,
            role,
        } => {
            let created = users.create(&User::new(username, password, role)).await?;
            println!("{}", created.id.unwrap_or_default());
        }
        UserAction::Update {
            id,
            username,
            password,
            role,
        } => {
            let mut user = users.get(id).await?;
            if let Some(username) = username {
                user.username = username;
            }
            if let Some(role) = role {
                user.role = role;
            }
            user.password = password;
            users.update(id, &user).await?;
        }
        UserAction::Delete { id } => users.delete(id).await?,
        UserAction::Grant { id, dbs } => users.assign_databases(id, &dbs).await?,
    }
    Ok(())
}
