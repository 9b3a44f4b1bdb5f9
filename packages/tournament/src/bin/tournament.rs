//! Command-line front end for the tournament backend.
//!
//! Every command drives the same intents a UI would dispatch and prints
//! the resulting store snapshot as JSON.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tournament_core::config::Config;
use tournament_core::domains::tournament::{EditTournamentForm, Tournament, User};
use tournament_core::kernel::TournamentKernel;

#[derive(Parser)]
#[command(name = "tournament")]
#[command(about = "Manage tournaments on the tournament backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every tournament
    List,

    /// Create a tournament
    Create {
        #[arg(long)]
        name: String,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Organizer display name
        #[arg(long)]
        organizer: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Edit an existing tournament
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        organizer: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tournament_core=debug,saga=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(stage = ?config.stage, backend_url = %config.backend_url, "tournament client");

    let kernel = TournamentKernel::from_config(&config);
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::List => {
            kernel.request_tournaments()?.wait().await?;
        }
        Commands::Create {
            name,
            from,
            to,
            organizer,
            description,
        } => {
            let user = User::new(config.require_user_email()?);
            let mut form = EditTournamentForm::new(None, &user, today);
            form.set_name(name);
            form.set_dates(from.or(Some(today)), to);
            form.set_organizer(organizer);
            form.set_description(description.unwrap_or_default());

            let draft = form.draft().context("Invalid tournament")?;
            kernel.create_tournament(draft)?.wait().await?;
        }
        Commands::Update {
            id,
            name,
            from,
            to,
            organizer,
            description,
        } => {
            let user = User::new(config.require_user_email()?);

            kernel.request_tournaments()?.wait().await?;
            let Some(base) = kernel.snapshot().get(&id).cloned() else {
                bail!("Tournament {} not found", id);
            };

            let mut form = EditTournamentForm::new(Some(&base), &user, today);
            if let Some(name) = name {
                form.set_name(name);
            }
            if from.is_some() || to.is_some() {
                let current = form.values().clone();
                form.set_dates(from.or(current.from), to.or(current.to));
            }
            if let Some(organizer) = organizer {
                form.set_organizer(organizer);
            }
            if let Some(description) = description {
                form.set_description(description);
            }

            let draft = form.draft().context("Invalid tournament")?;
            let tournament = Tournament::try_from(draft)?;
            kernel.update_tournament(tournament)?.wait().await?;
        }
    }

    let snapshot = kernel.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
