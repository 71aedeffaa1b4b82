use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leaddash_types::{NotificationKind, unread_count};
use leaddash_util::{NotificationStore, ReseedPolicy, UserPreferences, app_file_path, open_or_in_memory, relative_age};
use tracing::{info, warn};

/// Environment variable overriding where the TUI writes its log file.
const LOG_PATH_ENV: &str = "LEADDASH_LOG_PATH";
const LOG_FILE_NAME: &str = "leaddash.log";

#[derive(Debug, Parser)]
#[command(name = "leaddash", version, about = "Lead dashboard notifications")]
struct Cli {
    /// Path of the notification storage file (defaults to LEADDASH_STORE_PATH or the config directory).
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Keep the collection empty after `clear` instead of restoring the welcome notifications.
    #[arg(long, global = true)]
    stay_empty_after_clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive dashboard (default).
    Tui,
    #[command(flatten)]
    Store(StoreCommand),
}

/// One-shot operations against the notification store.
#[derive(Debug, Subcommand)]
enum StoreCommand {
    /// List notifications, newest first.
    List {
        /// Print the raw records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the number of unread notifications.
    Unread,
    /// Mark one notification as read.
    Read { id: String },
    /// Mark every notification as read.
    ReadAll,
    /// Delete one notification.
    Delete { id: String },
    /// Remove every notification.
    Clear,
    /// Add a notification at the top of the list.
    Push {
        #[arg(long, default_value = "info")]
        kind: NotificationKind,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);
    match &command {
        Command::Tui => init_file_tracing()?,
        _ => init_tracing(),
    }

    let policy = if cli.stay_empty_after_clear {
        ReseedPolicy::StayEmpty
    } else {
        ReseedPolicy::from_env()
    };
    info!(?policy, "Notification re-seed policy");
    let store = NotificationStore::open(open_or_in_memory(cli.store), policy);

    match command {
        Command::Tui => run_tui(store),
        Command::Store(command) => run_command(store, command),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// While the TUI owns the terminal, logs go to a file instead of stderr.
fn init_file_tracing() -> Result<()> {
    let path = app_file_path(LOG_PATH_ENV, LOG_FILE_NAME);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn run_tui(store: NotificationStore) -> Result<()> {
    let preferences = UserPreferences::new().unwrap_or_else(|error| {
        warn!(error = %error, "Failed to load preferences; using in-memory defaults");
        UserPreferences::ephemeral()
    });
    leaddash_tui::run(
        store,
        preferences,
        Box::new(|notification| info!(id = %notification.id, "Guided tour requested")),
    )
}

fn run_command(mut store: NotificationStore, command: StoreCommand) -> Result<()> {
    match command {
        StoreCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.notifications())?);
                return Ok(());
            }
            if store.is_empty() {
                println!("No notifications");
                return Ok(());
            }
            let now = store.now();
            for notification in store.notifications() {
                let marker = if notification.read { " " } else { "●" };
                println!(
                    "{marker} {icon} [{id}] {title} ({age})\n    {message}",
                    icon = notification.kind.icon(),
                    id = notification.id,
                    title = notification.title,
                    age = relative_age(notification.created_at, now),
                    message = notification.message,
                );
            }
        }
        StoreCommand::Unread => println!("{}", unread_count(store.notifications())),
        StoreCommand::Read { id } => {
            report_unknown(&store, &id);
            store.mark_read(&id);
        }
        StoreCommand::ReadAll => store.mark_all_read(),
        StoreCommand::Delete { id } => {
            report_unknown(&store, &id);
            store.delete(&id);
        }
        StoreCommand::Clear => store.clear_all(),
        StoreCommand::Push { kind, title, message } => {
            let id = store.push(kind, title, message);
            println!("{id}");
        }
    }

    if let Some(error) = store.last_persistence_error() {
        warn!(error, "Notification changes were applied but not saved");
        eprintln!("warning: changes were not saved: {error}");
    }
    Ok(())
}

fn report_unknown(store: &NotificationStore, id: &str) {
    if store.get(id).is_none() {
        eprintln!("No notification with id '{id}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn store_subcommands_parse_flat() {
        let cli = Cli::try_parse_from(["leaddash", "read", "welcome"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Store(StoreCommand::Read { id })) if id == "welcome"));

        let cli = Cli::try_parse_from(["leaddash", "push", "--kind", "success", "--title", "t", "--message", "m"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Store(StoreCommand::Push { kind: NotificationKind::Success, .. }))
        ));
    }

    #[test]
    fn tui_is_explicit_or_default() {
        let cli = Cli::try_parse_from(["leaddash", "tui"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tui)));

        let cli = Cli::try_parse_from(["leaddash", "--stay-empty-after-clear"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.stay_empty_after_clear);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["leaddash", "push", "--kind", "promo", "--title", "t", "--message", "m"]).is_err());
    }
}
