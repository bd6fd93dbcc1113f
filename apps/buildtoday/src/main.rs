use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use sea_orm_migration::MigratorTrait;
use std::path::PathBuf;
use std::sync::Arc;

use checkins::config::CheckInsConfig;
use checkins::contract::{client::CheckInsApi, error::CheckInsError, model::Identity, model::User};
use checkins::domain::ports::SystemClock;
use checkins::domain::service::Service;
use checkins::gateways::local::CheckInsLocalClient;
use checkins::infra::{
    auth::StaticIdentityProvider,
    events::TracingEventPublisher,
    storage::{migrations::Migrator, SeaOrmCheckInsRepository},
};
use checkins::SessionContext;

mod db;
mod render;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CHECKINS_MODULE: &str = "checkins";
const NO_IDENTITY: &str = "Not signed in: pass --user <id> or set modules.checkins.identity";

/// BuildToday - one check-in a day, keep the streak alive
#[derive(Parser)]
#[command(name = "buildtoday")]
#[command(about = "BuildToday - daily habit check-ins with streaks and power")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sign in as this identity (overrides modules.checkins.identity)
    #[arg(short, long)]
    user: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Show streak, power and whether today is done (default)
    Status,
    /// Record today's check-in
    CheckIn,
    /// Start a session for the configured identity
    SignIn,
    /// Show every day since sign-up, newest first
    Timeline {
        /// Only show the newest N days
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// End the session; data commands refuse to run until the next sign-in
    SignOut,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if let Some(user) = &cli.user {
        config.set_module_value(CHECKINS_MODULE, "identity", user.clone().into());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::debug!(home = %config.home.home_dir, "BuildToday starting");

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Check => check_config(&config),
        command => {
            let app = App::open(&config).await?;
            let result = app.run(command).await;
            app.close().await;
            result
        }
    }
}

fn module_config(config: &AppConfig) -> Result<CheckInsConfig> {
    CheckInsConfig::from_value(config.module(CHECKINS_MODULE))
        .context("Invalid modules.checkins configuration")
}

fn identity_from(cfg: &CheckInsConfig) -> Option<Identity> {
    let id = cfg.identity.trim();
    (!id.is_empty()).then(|| Identity {
        user_id: id.into(),
        email: cfg.email.clone(),
    })
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = &config.database {
        let backend = db::detect_from_dsn(db)?;
        println!("Database backend: {backend:?}");
    } else {
        println!("Database: not configured");
    }
    let module = module_config(config)?;
    match identity_from(&module) {
        Some(identity) => println!("Identity: {}", identity.user_id),
        None => println!("Identity: not configured"),
    }

    println!("Configuration check passed");
    Ok(())
}

/// Wired check-ins stack plus the signed-in session.
struct App {
    api: Arc<dyn CheckInsApi>,
    auth: Arc<StaticIdentityProvider>,
    session: SessionContext,
}

impl App {
    async fn open(config: &AppConfig) -> Result<Self> {
        let module = module_config(config)?;
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("Database is not configured"))?;

        let conn = db::connect(db_config, &config.home_dir()).await?;
        Migrator::up(&conn, None)
            .await
            .context("Failed to run migrations")?;

        let service = Service::new(
            Arc::new(SeaOrmCheckInsRepository::new(conn)),
            Arc::new(TracingEventPublisher),
            Arc::new(SystemClock),
        );
        let api: Arc<dyn CheckInsApi> = Arc::new(CheckInsLocalClient::new(Arc::new(service)));
        let auth = Arc::new(
            StaticIdentityProvider::new(identity_from(&module))
                .with_signed_out_marker(config.home_dir().join("session").join("signed_out")),
        );
        let session = SessionContext::start(auth.clone(), api.clone());

        Ok(Self { api, auth, session })
    }

    async fn sign_in(&self) -> Result<User> {
        self.session
            .sign_in()
            .await?
            .ok_or_else(|| anyhow!(NO_IDENTITY))
    }

    /// The session user for data commands; an explicit sign-out sticks.
    async fn signed_in_user(&self) -> Result<User> {
        if self.auth.is_signed_out() {
            return Err(anyhow!(
                "Not signed in: run `buildtoday sign-in` to start a new session"
            ));
        }
        self.sign_in().await
    }

    async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Status => {
                let user = self.signed_in_user().await?;
                let status = self.api.status(&user.id).await?;
                print!("{}", render::status(&status));
            }
            Commands::CheckIn => {
                let user = self.signed_in_user().await?;
                match self.api.check_in(&user.id).await {
                    Ok(outcome) => print!("{}", render::check_in(&outcome)),
                    Err(CheckInsError::AlreadyCheckedIn { date }) => {
                        println!("Already checked in for {date}. Come back tomorrow.");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Commands::Timeline { limit } => {
                let user = self.signed_in_user().await?;
                let days = self.api.timeline(&user.id).await?;
                print!("{}", render::timeline(&days, limit));
            }
            Commands::SignIn => {
                let user = self.sign_in().await?;
                println!("Signed in as {}.", user.id);
            }
            Commands::SignOut => {
                self.session.sign_out().await?;
                println!("Signed out.");
            }
            // handled before the database is opened
            Commands::Check => {}
        }
        Ok(())
    }

    async fn close(self) {
        self.session.shutdown().await;
    }
}
