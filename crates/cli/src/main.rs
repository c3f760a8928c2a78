use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use designer_ext_api::{ApiClient, ClientConfig};
use designer_ext_core::env_config::data_dir;
use designer_ext_core::{AuthSession, ScriptLocation};
use designer_ext_service::{SessionService, SessionStore};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "designer-ext")]
#[command(about = "Manage site custom code and inspect designer elements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange a designer ID token for a session, or print the authorize URL
    Login {
        #[arg(long)]
        id_token: Option<String>,
        #[arg(long)]
        site: Option<String>,
    },
    Logout,
    Whoami,
    Sites,
    #[command(subcommand)]
    Scripts(ScriptsCommand),
    /// Apply a registered script to a site or to pages of it
    Apply {
        #[arg(long)]
        script: String,
        #[arg(long)]
        site: String,
        /// Page IDs; the script goes on the site itself when omitted
        #[arg(long, value_delimiter = ',')]
        pages: Vec<String>,
        #[arg(long, default_value = "header")]
        location: ScriptLocation,
    },
    /// Application status of a script on a site and its pages
    Status {
        #[arg(long)]
        script: Option<String>,
        #[arg(long)]
        site: String,
        #[arg(long, value_delimiter = ',')]
        pages: Vec<String>,
        /// Print the raw status payload of every script instead
        #[arg(long, conflicts_with = "script")]
        batch: bool,
    },
    /// Map an element tree from a designer snapshot file
    Inspect {
        snapshot: PathBuf,
        /// Element to select instead of the snapshot root
        #[arg(long)]
        element: Option<String>,
    },
}

#[derive(Subcommand)]
enum ScriptsCommand {
    List {
        #[arg(long)]
        site: String,
    },
    Register {
        #[arg(long)]
        site: String,
        /// Hosted script URL or inline source
        #[arg(long)]
        code: String,
        #[arg(long)]
        hosted: bool,
    },
}

pub(crate) fn api_client() -> Result<Arc<ApiClient>> {
    let config = ClientConfig::from_env()?;
    Ok(Arc::new(ApiClient::new(config)?))
}

pub(crate) fn session_store() -> SessionStore {
    SessionStore::new(data_dir())
}

pub(crate) fn session_service(api: Arc<ApiClient>) -> SessionService {
    SessionService::new(api, session_store())
}

/// Restored session, or an error asking the user to log in.
pub(crate) fn require_session() -> Result<AuthSession> {
    session_store()
        .restore()?
        .context("not logged in; run `designer-ext login --id-token <token>`")
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { id_token, site } => {
            commands::auth::run_login(id_token.as_deref(), site.as_deref()).await?;
        },
        Commands::Logout => commands::auth::run_logout()?,
        Commands::Whoami => commands::auth::run_whoami()?,
        Commands::Sites => commands::auth::run_sites().await?,
        Commands::Scripts(ScriptsCommand::List { site }) => {
            commands::scripts::run_list(&site).await?;
        },
        Commands::Scripts(ScriptsCommand::Register { site, code, hosted }) => {
            commands::scripts::run_register(&site, &code, hosted).await?;
        },
        Commands::Apply { script, site, pages, location } => {
            commands::scripts::run_apply(&script, &site, &pages, location).await?;
        },
        Commands::Status { script, site, pages, batch } => {
            if batch {
                commands::status::run_batch_status(&site, &pages).await?;
            } else {
                let script = script.context("--script is required unless --batch is given")?;
                commands::status::run_status(&script, &site, &pages).await?;
            }
        },
        Commands::Inspect { snapshot, element } => {
            commands::inspect::run_inspect(&snapshot, element.as_deref()).await?;
        },
    }

    Ok(())
}
