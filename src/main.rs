//! Command-line front end.
//!
//! A thin shim over the library: it loads configuration, installs tracing,
//! builds a [`Session`](applytrack::Session), and maps each subcommand onto one
//! store, form, or editor operation.
//!
//! # Commands
//!
//! - `login <email> [--password P]`: exchange credentials for a token
//! - `logout`: forget the stored token
//! - `list [--search Q] [--status S]`: show the filtered dashboard
//! - `add --company C --position P --date D [--status S] [--notes N]`
//! - `edit <id> [--company C] [--position P] [--date D] [--status S] [--notes N]`
//! - `delete <id> [--yes]`: delete after confirmation

use anyhow::{bail, Context};
use applytrack::app::{ConfirmPrompt, Removal};
use applytrack::{
    initialize, observability, ApplicationStatus, Config, EditCoordinator, Field,
    NewApplicationForm, StatusFilter,
};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "applytrack", version, about = "Track job applications against a remote store")]
struct Cli {
    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the bearer token.
    Login {
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored token.
    Logout,
    /// List applications.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "All")]
        status: StatusFilter,
    },
    /// Create an application.
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        /// Applied date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "Applied")]
        status: ApplicationStatus,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change fields of an application.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an application.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl FieldArgs {
    fn changes(&self) -> Vec<(Field, &str)> {
        [
            (Field::Company, &self.company),
            (Field::Position, &self.position),
            (Field::AppliedDate, &self.date),
            (Field::Status, &self.status),
            (Field::Notes, &self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{message} [y/N] ");
            let _ = std::io::stdout().flush();
            let mut answer = String::new();
            if std::io::stdin().lock().read_line(&mut answer).is_err() {
                return false;
            }
            matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let default_path = dirs::config_dir().map(|dir| dir.join("applytrack").join("config.toml"));
    let config = match (path, default_path) {
        (Some(path), _) => Config::from_file(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        (None, Some(path)) if path.exists() => Config::from_file(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        _ => Config::default(),
    };
    Ok(config.with_env())
}

fn read_password() -> anyhow::Result<String> {
    print!("Password: ");
    std::io::stdout().flush()?;
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    observability::init_tracing(&config);

    let mut session = initialize(&config)?;

    match cli.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            session.auth.login(&email, &password).await?;
            println!("Logged in as {email}");
        }
        Command::Logout => {
            session.auth.logout()?;
            println!("Logged out");
        }
        Command::List { search, status } => {
            session.store.load().await.context("failed to load applications")?;
            session.dashboard.set_search_query(search, tokio::time::Instant::now());
            session.dashboard.commit_search();
            session.dashboard.set_status_filter(status);
            let vm = session
                .store
                .with_applications(|apps| session.dashboard.compute_viewmodel(apps));
            applytrack::ui::render(&vm);
        }
        Command::Add {
            company,
            position,
            date,
            status,
            notes,
        } => {
            let mut form = NewApplicationForm::new();
            form.set_field(Field::Company, &company)?;
            form.set_field(Field::Position, &position)?;
            form.set_field(Field::AppliedDate, &date)?;
            form.set_field(Field::Status, status.as_str())?;
            form.set_field(Field::Notes, &notes)?;
            let created = form.submit(&session.store).await.context("failed to add application")?;
            println!("Added application {}", created.id.unwrap_or_default());
        }
        Command::Edit { id, fields } => {
            let changes = fields.changes();
            if changes.is_empty() {
                bail!("nothing to change; pass at least one field");
            }
            session.store.load().await.context("failed to load applications")?;
            let record = session
                .store
                .get(id)
                .with_context(|| format!("no application with id {id}"))?;

            let mut editor = EditCoordinator::new();
            editor.begin(&record)?;
            for (field, value) in changes {
                editor.set_field(field, value)?;
            }
            let updated = editor.submit(&session.store).await.context("failed to update application")?;
            println!("Updated application {}", updated.id.unwrap_or(id));
        }
        Command::Delete { id, yes } => {
            let removal = if yes {
                session.store.remove(id, &|_: &str| true).await
            } else {
                session.store.remove(id, &StdinPrompt).await
            }
            .context("failed to delete application")?;
            match removal {
                Removal::Removed | Removal::Superseded => println!("Deleted application {id}"),
                Removal::Declined => println!("Kept application {id}"),
            }
        }
    }

    Ok(())
}
