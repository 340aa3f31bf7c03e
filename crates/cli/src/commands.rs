//! Sub-command parsing and execution.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use vieweditor_core::editor_state::ViewEditorState;
use vieweditor_core::session::ViewEditor;
use vieweditor_core::source_path;
use vieweditor_db::models::editor_state::SaveEditorState;
use vieweditor_db::repositories::EditorStateRepo;

use crate::config::CliConfig;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "vieweditor", about = "Inspect, undo and store view editor states")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Summarize a saved editor state
    Inspect {
        /// Editor state JSON file
        file: PathBuf,
    },
    /// Undo the last edits and print the resulting state
    Undo {
        /// Editor state JSON file
        file: PathBuf,

        /// Number of edits to undo
        #[arg(default_value_t = 1)]
        steps: usize,
    },
    /// Store an editor state in the database
    Import {
        /// Editor state JSON file
        file: PathBuf,
    },
    /// Print a stored editor state
    Export {
        /// State id
        id: String,
    },
    /// List stored editor states
    List,
    /// Delete a stored editor state
    Delete {
        /// State id
        id: String,
    },
}

impl CliCommand {
    /// Whether the command talks to the database.
    pub fn needs_database(&self) -> bool {
        matches!(
            self,
            CliCommand::Import { .. }
                | CliCommand::Export { .. }
                | CliCommand::List
                | CliCommand::Delete { .. }
        )
    }
}

/// Execute a command and return what should be printed.
pub async fn run(command: CliCommand, config: &CliConfig) -> anyhow::Result<String> {
    match command {
        CliCommand::Inspect { file } => {
            let state = read_state(&file)?;
            Ok(render_report(&ViewEditor::from_state(state))?)
        }
        CliCommand::Undo { file, steps } => {
            let state = read_state(&file)?;
            let state = undo_steps(state, steps)?;
            render_json(&state.to_json(), config.pretty)
        }
        CliCommand::Import { file } => {
            let state = read_state(&file)?;
            let pool = connect(config).await?;
            let row = EditorStateRepo::save_state(&pool, &SaveEditorState::from(&state)).await?;
            Ok(format!("Saved {} at {}", row.id, row.updated_at.to_rfc3339()))
        }
        CliCommand::Export { id } => {
            let pool = connect(config).await?;
            let state = EditorStateRepo::load_state(&pool, &id).await?;
            render_json(&state.to_json(), config.pretty)
        }
        CliCommand::List => {
            let pool = connect(config).await?;
            let states = EditorStateRepo::list_states(&pool).await?;
            let mut out = String::new();
            for s in states {
                writeln!(
                    out,
                    "{}\t{}\t{} edits\t{}",
                    s.id,
                    s.view_name.unwrap_or_default(),
                    s.history_length,
                    s.updated_at.to_rfc3339()
                )?;
            }
            Ok(out.trim_end().to_string())
        }
        CliCommand::Delete { id } => {
            let pool = connect(config).await?;
            if EditorStateRepo::delete_state(&pool, &id).await? {
                Ok(format!("Deleted {id}"))
            } else {
                bail!("No editor state with id {id}")
            }
        }
    }
}

fn read_state(file: &Path) -> anyhow::Result<ViewEditorState> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let state = ViewEditorState::from_json_str(&text)
        .with_context(|| format!("failed to decode {}", file.display()))?;
    Ok(state)
}

async fn connect(config: &CliConfig) -> anyhow::Result<vieweditor_db::DbPool> {
    let url = config.require_database_url()?;
    let pool = vieweditor_db::create_pool(url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;
    vieweditor_db::health_check(&pool)
        .await
        .context("database health check failed")?;
    vieweditor_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;
    tracing::debug!("Database ready");
    Ok(pool)
}

fn render_json(value: &Value, pretty: bool) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Undo up to `steps` edits of a saved state and snapshot the result.
pub fn undo_steps(state: ViewEditorState, steps: usize) -> anyhow::Result<ViewEditorState> {
    let mut editor = ViewEditor::from_state(state);
    for step in 0..steps {
        if !editor.can_undo() {
            tracing::warn!(requested = steps, done = step, "History exhausted");
            break;
        }
        editor.undo()?;
    }
    Ok(editor.snapshot()?)
}

/// Human-readable summary of a session.
pub fn render_report(editor: &ViewEditor) -> Result<String, std::fmt::Error> {
    let view = editor.view_definition();
    let mut out = String::new();
    writeln!(out, "State:       {}", editor.state_id())?;
    writeln!(out, "View:        {}", view.name())?;
    if !view.description().is_empty() {
        writeln!(out, "Description: {}", view.description())?;
    }
    writeln!(out, "Sources:")?;
    for path in view.source_paths() {
        match (
            source_path::source_type(path),
            source_path::source_name(path),
            source_path::connection_name(path),
        ) {
            (Some(kind), Some(name), Some(connection)) => {
                writeln!(out, "  - {path}  [{kind} {name} on {connection}]")?
            }
            _ => writeln!(out, "  - {path}")?,
        }
    }
    if !view.compositions().is_empty() {
        writeln!(out, "Compositions:")?;
        for composition in view.compositions() {
            writeln!(out, "  - {composition}")?;
        }
    }
    let messages = view.validation_messages();
    if messages.is_empty() {
        writeln!(out, "Complete:    yes")?;
    } else {
        writeln!(out, "Complete:    no")?;
        for message in messages {
            writeln!(out, "  ! {message}")?;
        }
    }
    let history = editor.undo_manager().to_array();
    writeln!(out, "History:     {} edits", history.len())?;
    for (index, undoable) in history.iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, undoable.redo_command().name())?;
    }
    write!(out, "Next:        {}", editor.undo_label())?;
    Ok(out)
}
