//! Hostdeck CLI - Operator console for the hosting catalog.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from stdin or HOSTDECK_PASSWORD)
//! echo "$PASSWORD" | hostdeck login -u admin --password-stdin
//!
//! # Inspect categories and the fields a plan of that type shows
//! hostdeck categories list
//! hostdeck categories fields ssd_shared
//!
//! # Validate, then create a plan from a YAML draft
//! hostdeck plans check plan.yaml
//! hostdeck plans create plan.yaml
//!
//! # Delete without the interactive prompt
//! hostdeck plans delete 42 --yes
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session management
//! - `categories` - List, inspect and edit plan categories
//! - `plans` - List, validate and edit hosting plans
//! - `company` - Show or replace company info
//! - `content` / `promos` / `status` / `contact` - Public endpoints

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hostdeck_admin::ConsoleConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "hostdeck")]
#[command(author, version, about = "Hostdeck hosting catalog console")]
struct Cli {
    /// Print JSON instead of YAML
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Read the password from stdin instead of `HOSTDECK_PASSWORD`
        #[arg(long)]
        password_stdin: bool,
    },
    /// Forget the persisted session
    Logout,
    /// Show whether the persisted session is still valid
    Whoami,
    /// Manage plan categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage hosting plans
    Plans {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Show or replace company info
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    /// Show terms of service or the privacy policy
    Content {
        /// `terms` or `privacy`
        document: String,
    },
    /// List promo codes visible at a placement
    Promos {
        #[arg(short, long, default_value = "pricing")]
        placement: String,
    },
    /// Show the service status board
    Status,
    /// Send a contact message from a YAML file
    Contact {
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories in display order
    List,
    /// Show one category
    Show {
        /// Category ID or plan type key (e.g. `ssd_shared`)
        category: String,
    },
    /// List the editor fields for a plan type
    Fields {
        /// Plan type key (e.g. `standard_vps`)
        plan_type: String,
    },
    /// Create a category from a YAML draft
    Create {
        file: PathBuf,
    },
    /// Replace a category from a YAML draft
    Update {
        id: String,
        file: PathBuf,
    },
    /// Permanently delete a category
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// List plans
    List {
        /// Only plans of this plan type key
        #[arg(short = 't', long = "type")]
        plan_type: Option<String>,
    },
    /// Show one plan as an editable draft
    Show {
        id: String,
    },
    /// Validate a YAML draft without sending it
    Check {
        file: PathBuf,

        /// Validate as an update of an existing plan
        #[arg(long)]
        update: bool,
    },
    /// Create a plan from a YAML draft
    Create {
        file: PathBuf,
    },
    /// Update a plan from a YAML draft
    Update {
        id: String,
        file: PathBuf,
    },
    /// Permanently delete a plan
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CompanyAction {
    /// Show company info
    Show,
    /// Replace company info from a YAML file
    Update {
        file: PathBuf,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors and warnings become Sentry events, info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hostdeck_admin=info,hostdeck_cli=info".into());

    // JSON for log shippers, human-readable on stderr otherwise
    let is_json = std::env::var("HOSTDECK_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ConsoleConfig) -> Result<(), commands::CliError> {
    let console = commands::Console::connect(config, cli.json)?;

    match cli.command {
        Commands::Login {
            username,
            password_stdin,
        } => commands::session::login(&console, &username, password_stdin).await?,
        Commands::Logout => commands::session::logout(&console).await,
        Commands::Whoami => commands::session::whoami(&console).await?,
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::categories::list(&console).await?,
            CategoryAction::Show { category } => {
                commands::categories::show(&console, &category).await?;
            }
            CategoryAction::Fields { plan_type } => {
                commands::categories::fields(&console, &plan_type).await?;
            }
            CategoryAction::Create { file } => commands::categories::create(&console, &file).await?,
            CategoryAction::Update { id, file } => {
                commands::categories::update(&console, &id, &file).await?;
            }
            CategoryAction::Delete { id, yes } => {
                commands::categories::delete(&console, &id, yes).await?;
            }
        },
        Commands::Plans { action } => match action {
            PlanAction::List { plan_type } => {
                commands::plans::list(&console, plan_type.as_deref()).await?;
            }
            PlanAction::Show { id } => commands::plans::show(&console, &id).await?,
            PlanAction::Check { file, update } => {
                commands::plans::check(&console, &file, update).await?;
            }
            PlanAction::Create { file } => commands::plans::create(&console, &file).await?,
            PlanAction::Update { id, file } => commands::plans::update(&console, &id, &file).await?,
            PlanAction::Delete { id, yes } => commands::plans::delete(&console, &id, yes).await?,
        },
        Commands::Company { action } => match action {
            CompanyAction::Show => commands::company::show(&console).await?,
            CompanyAction::Update { file } => commands::company::update(&console, &file).await?,
        },
        Commands::Content { document } => commands::public::content(&console, &document).await?,
        Commands::Promos { placement } => commands::public::promos(&console, &placement).await?,
        Commands::Status => commands::public::status(&console).await?,
        Commands::Contact { file } => commands::public::contact(&console, &file).await?,
    }
    Ok(())
}
