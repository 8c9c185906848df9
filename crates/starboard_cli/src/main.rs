//! Terminal front end for the goal board.
//!
//! # Responsibility
//! - Parse commands and configuration (flags, env, JSON config file).
//! - Drive `BoardService` the same way a pointer UI would.
//! - Print results as text or JSON.

use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use starboard_core::db::open_db;
use starboard_core::{
    default_log_level, init_logging, sqlite_store, BoardCommand, BoardConfig, BoardEvent,
    BoardService, Connection, CreateGoalRequest, Goal, GoalStore, Position,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

const DEFAULT_DB_FILE_NAME: &str = "starboard.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "starboard", version, about = "Goal constellation board")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "STARBOARD_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "STARBOARD_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON file with board tuning (`capture_radius`, `spawn_area`, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a goal.
    Add(AddArgs),
    /// List goals on the board (or in the archive).
    List {
        #[arg(long)]
        archived: bool,
    },
    /// List connections that can be drawn right now.
    Connections {
        /// Include orphaned connections and links into the archive.
        #[arg(long)]
        all: bool,
    },
    /// Move a goal to a new position.
    Move { id: Uuid, x: f64, y: f64 },
    /// Toggle a goal's completed flag.
    Complete { id: Uuid },
    /// Connect two goals (source -> target).
    Connect { source: Uuid, target: Uuid },
    /// Delete a connection by id.
    Disconnect { id: Uuid },
    /// Send a goal into the black hole.
    Archive { id: Uuid },
    /// Bring an archived goal back, at a position or a random spot.
    Restore {
        id: Uuid,
        #[arg(long, requires = "y")]
        x: Option<f64>,
        #[arg(long, requires = "x")]
        y: Option<f64>,
    },
    /// Delete a goal permanently.
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
struct AddArgs {
    title: String,
    #[arg(long)]
    description: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    due: Option<String>,
    #[arg(long, requires = "y")]
    x: Option<f64>,
    #[arg(long, requires = "x")]
    y: Option<f64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("starboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = load_config(cli.config.as_deref())?;
    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let conn = open_db(&db_path)?;
    let store = sqlite_store(&conn, &config)?;
    let mut board = BoardService::open(store, config)?;
    info!("event=cli_run module=cli status=start");

    let event = match cli.command {
        Command::List { archived } => {
            let goals = if archived {
                &board.state().archived_goals
            } else {
                &board.state().goals
            };
            return print_goals(goals, cli.json);
        }
        Command::Connections { all } => {
            let connections: Vec<&Connection> = if all {
                board.state().connections.iter().collect()
            } else {
                board.state().renderable_connections()
            };
            return print_connections(&connections, cli.json);
        }
        Command::Add(args) => board.dispatch(BoardCommand::CreateGoal(CreateGoalRequest {
            title: args.title,
            description: args.description,
            due_date: args.due,
            position: args.x.zip(args.y).map(|(x, y)| Position::new(x, y)),
        }))?,
        Command::Move { id, x, y } => move_goal(&mut board, id, Position::new(x, y))?,
        Command::Complete { id } => board.dispatch(BoardCommand::ToggleComplete(id))?,
        Command::Connect { source, target } => {
            board.dispatch(BoardCommand::StartConnection(source))?;
            board.dispatch(BoardCommand::CompleteConnection(target))?
        }
        Command::Disconnect { id } => board.dispatch(BoardCommand::DeleteConnection(id))?,
        Command::Archive { id } => board.dispatch(BoardCommand::Archive(id))?,
        Command::Restore { id, x, y } => match x.zip(y) {
            Some((x, y)) => board.dispatch(BoardCommand::RestoreAtPosition {
                goal_id: id,
                position: Position::new(x, y),
            })?,
            None => board.dispatch(BoardCommand::Restore(id))?,
        },
        Command::Delete { id } => board.dispatch(BoardCommand::DeletePermanently(id))?,
    };

    print_event(&event, cli.json)
}

/// Replays a full press/drag/release so the move goes through the same
/// archive-capture and click rules as pointer input.
fn move_goal<S: GoalStore>(
    board: &mut BoardService<S>,
    id: Uuid,
    target: Position,
) -> Result<BoardEvent, Box<dyn Error>> {
    let start = board
        .state()
        .goal(id)
        .map(|goal| goal.position)
        .ok_or_else(|| format!("goal not on board: {id}"))?;
    board.dispatch(BoardCommand::StartDrag {
        goal_id: id,
        pointer: start,
    })?;
    board.dispatch(BoardCommand::UpdateDrag { pointer: target })?;
    Ok(board.dispatch(BoardCommand::EndDrag { pointer: target })?)
}

fn load_config(path: Option<&Path>) -> Result<BoardConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
            serde_json::from_str::<BoardConfig>(&raw)?
        }
        None => BoardConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_goals(goals: &[Goal], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        return print_json(&goals);
    }
    if goals.is_empty() {
        println!("No goals.");
    }
    for goal in goals {
        println!("{}", describe_goal(goal));
    }
    Ok(())
}

fn print_connections(connections: &[&Connection], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        return print_json(&connections);
    }
    if connections.is_empty() {
        println!("No connections.");
    }
    for connection in connections {
        println!(
            "{}  {} -> {}",
            connection.id, connection.source_id, connection.target_id
        );
    }
    Ok(())
}

fn print_event(event: &BoardEvent, json: bool) -> Result<(), Box<dyn Error>> {
    match event {
        BoardEvent::GoalCreated(goal)
        | BoardEvent::GoalMoved(goal)
        | BoardEvent::GoalUpdated(goal)
        | BoardEvent::GoalRestored(goal) => {
            if json {
                print_json(goal)
            } else {
                println!("{}", describe_goal(goal));
                Ok(())
            }
        }
        BoardEvent::ConnectionCreated(connection) => {
            if json {
                print_json(connection)
            } else {
                println!(
                    "{}  {} -> {}",
                    connection.id, connection.source_id, connection.target_id
                );
                Ok(())
            }
        }
        other if json => print_json(&EventRecord::from_event(other)),
        other => {
            println!("{}", describe_event(other));
            Ok(())
        }
    }
}

/// JSON shape for events that carry no full record.
#[derive(Debug, PartialEq, Serialize)]
struct EventRecord {
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
}

impl EventRecord {
    fn from_event(event: &BoardEvent) -> Self {
        let (name, id) = match event {
            BoardEvent::Unchanged => ("unchanged", None),
            BoardEvent::Selected(id) => ("selected", Some(*id)),
            BoardEvent::SelectionCleared => ("selection_cleared", None),
            BoardEvent::GoalCreated(goal) => ("goal_created", Some(goal.id)),
            BoardEvent::DragStarted(id) => ("drag_started", Some(*id)),
            BoardEvent::DragTracked { goal_id, .. } => ("drag_tracked", Some(*goal_id)),
            BoardEvent::GoalMoved(goal) => ("goal_moved", Some(goal.id)),
            BoardEvent::GoalUpdated(goal) => ("goal_updated", Some(goal.id)),
            BoardEvent::DetailsOpened(id) => ("details_opened", Some(*id)),
            BoardEvent::DetailsClosed => ("details_closed", None),
            BoardEvent::ConnectionPending(id) => ("connection_pending", Some(*id)),
            BoardEvent::ConnectionCreated(connection) => {
                ("connection_created", Some(connection.id))
            }
            BoardEvent::ConnectionCancelled => ("connection_cancelled", None),
            BoardEvent::ConnectionDeleted(id) => ("connection_deleted", Some(*id)),
            BoardEvent::GoalArchived(id) => ("goal_archived", Some(*id)),
            BoardEvent::GoalRestored(goal) => ("goal_restored", Some(goal.id)),
            BoardEvent::GoalDeleted(id) => ("goal_deleted", Some(*id)),
            BoardEvent::ArchiveOpened => ("archive_opened", None),
            BoardEvent::ArchiveClosed => ("archive_closed", None),
            BoardEvent::ArchivedDragStarted(id) => ("archived_drag_started", Some(*id)),
            BoardEvent::ArchivedDragTracked(drag) => ("archived_drag_tracked", Some(drag.goal_id)),
            BoardEvent::ArchivedDragAbandoned(id) => ("archived_drag_abandoned", Some(*id)),
        };
        Self { event: name, id }
    }
}

fn describe_goal(goal: &Goal) -> String {
    let mark = if goal.completed { "[x]" } else { "[ ]" };
    let due = goal
        .due_date
        .as_deref()
        .map(|due| format!(" due {due}"))
        .unwrap_or_default();
    format!(
        "{} {mark} {}{due} @ ({:.0}, {:.0})",
        goal.id, goal.title, goal.position.x, goal.position.y
    )
}

fn describe_event(event: &BoardEvent) -> String {
    match event {
        BoardEvent::GoalArchived(id) => format!("archived {id}"),
        BoardEvent::GoalDeleted(id) => format!("deleted {id}"),
        BoardEvent::ConnectionDeleted(id) => format!("disconnected {id}"),
        BoardEvent::ConnectionCancelled => "connection cancelled".to_string(),
        BoardEvent::DetailsOpened(id) => format!("no move: {id} stayed within click distance"),
        BoardEvent::Unchanged => "nothing to do".to_string(),
        other => format!("{other:?}"),
    }
}
