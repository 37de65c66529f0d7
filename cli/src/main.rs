use std::path::PathBuf;

use chrono::Duration;
use clap::{Parser, Subcommand, ValueEnum};
use quizlog::auth::{OwnerClaims, issue_token};
use quizlog::model::entity::AttemptStatus;
use quizlog::model::{DbConnection, ListWindow, ModelManager};
use quizlog::quiz::stats;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "Operator tool for the quizlog database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mint a token for an owner id, the way the identity service would
    Token {
        /// Owner id; a fresh one is generated when omitted
        #[arg(long)]
        user: Option<Uuid>,
        #[arg(long, env = "QUIZLOG_JWT")]
        secret: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },

    /// Apply migrations
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[arg(long, default_value = "./migrations")]
        dir: PathBuf,
    },

    /// List an owner's attempts
    Attempts {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[arg(long)]
        user: Uuid,
        #[arg(long, value_enum, default_value_t = StatusArg::Completed)]
        status: StatusArg,
        #[arg(long, default_value_t = ListWindow::DEFAULT_LIMIT)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Print dashboard totals for an owner
    Stats {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    Ongoing,
    Completed,
}

impl From<StatusArg> for AttemptStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Ongoing => AttemptStatus::Ongoing,
            StatusArg::Completed => AttemptStatus::Completed,
        }
    }
}

fn model_manager(database_url: &str) -> quizlog::error::AppResult<ModelManager> {
    let db_con = DbConnection::connect(database_url)?;
    Ok(ModelManager::postgres(db_con))
}

#[tokio::main]
async fn main() -> quizlog::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    match args.command {
        Commands::Token { user, secret, hours } => {
            let owner = user.unwrap_or_else(Uuid::new_v4);
            let token = issue_token(&OwnerClaims::new(owner, Duration::hours(hours)), secret)?;
            println!("owner: {owner}");
            println!("{token}");
        }

        Commands::Migrate { database_url, dir } => {
            let db_con = DbConnection::connect(&database_url)?;
            db_con.migrate(&dir).await?;
            println!("Migrations applied from {}", dir.display());
        }

        Commands::Attempts {
            database_url,
            user,
            status,
            limit,
            offset,
        } => {
            let mm = model_manager(&database_url)?;
            let window = ListWindow::new(limit, offset)?;
            let attempts = mm
                .attempts()
                .list_by_owner_and_status(user, status.into(), Some(window))
                .await?;
            println!("{}", serde_json::to_string_pretty(&attempts)?);
        }

        Commands::Stats { database_url, user } => {
            let mm = model_manager(&database_url)?;
            let stats = stats::dashboard_stats(&mm, user).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
