use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use clap::Parser;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use validator::Validate;

mod auth;
mod config;
mod db;
mod middleware;
mod models;
pub mod observability;
mod reports;
mod routes;
pub mod services;

#[cfg(test)]
mod tests;

/// Config file used when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "labelhub.toml";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::LabelhubConfig>,
    pub db: Arc<db::DbPool>,
    pub services: services::Services,
}

impl AppState {
    /// Open the configured database, migrate it if asked to, and build services.
    pub async fn new(config: config::LabelhubConfig) -> Result<Self, db::DbError> {
        let pool = db::DbPool::from_config(&config.database).await?;
        if config.database.run_migrations() {
            pool.run_migrations().await?;
        }
        Ok(Self::from_pool(config, Arc::new(pool)))
    }

    pub fn from_pool(config: config::LabelhubConfig, db: Arc<db::DbPool>) -> Self {
        let services = services::Services::new(db.clone(), config.reports.clone());
        Self {
            config: Arc::new(config),
            db,
            services,
        }
    }
}

/// CLI arguments for labelhub
#[derive(Parser, Debug)]
#[command(version, about = "Warranty and label management backend", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (defaults to ./labelhub.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Create a super admin account and print a token for it
    BootstrapAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Print a fresh token for an existing active account
    Token {
        #[arg(long)]
        email: String,
    },
}

pub fn build_app(config: &config::LabelhubConfig, state: AppState) -> Router {
    let admin_routes = routes::admin::admin_routes().route_layer(
        axum::middleware::from_fn_with_state(state.clone(), middleware::admin_auth_middleware),
    );

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health/live", get(routes::health::liveness))
        .route("/health/ready", get(routes::health::readiness))
        .nest("/admin", admin_routes)
        .nest("/public", routes::public::public_routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware));

    // Layers are applied in reverse order, so CORS runs before the request id
    if let Some(cors_layer) = config.server.cors.clone().into_layer() {
        app = app.layer(cors_layer);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Some(Command::Migrate) => run_migrate(args.config.as_deref()).await,
        Some(Command::BootstrapAdmin { name, email }) => {
            run_bootstrap_admin(args.config.as_deref(), name, email).await
        }
        Some(Command::Token { email }) => run_token(args.config.as_deref(), &email).await,
        Some(Command::Serve) | None => run_server(args.config.as_deref()).await,
    }
}

/// Print to stderr and exit with status 1. CLI failures before and after the
/// subscriber is installed both end up on the terminal this way.
fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1)
}

fn load_config(explicit_config_path: Option<&str>) -> (PathBuf, config::LabelhubConfig) {
    let config_path = PathBuf::from(explicit_config_path.unwrap_or(DEFAULT_CONFIG_PATH));
    let config = config::LabelhubConfig::from_file(&config_path).unwrap_or_else(|e| {
        exit_with(format_args!(
            "failed to load config from {}: {e}",
            config_path.display()
        ))
    });
    if let Err(e) = observability::init_tracing(&config.observability) {
        exit_with(e);
    }
    (config_path, config)
}

/// Build application state, requiring a configured database.
async fn connect(config: config::LabelhubConfig) -> AppState {
    if config.database.is_none() {
        exit_with("no [database] section in the config file");
    }
    AppState::new(config).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to initialize application state");
        exit_with(format_args!("failed to open the label store: {e}"))
    })
}

async fn run_server(explicit_config_path: Option<&str>) {
    let (config_path, config) = load_config(explicit_config_path);
    tracing::info!(config_file = %config_path.display(), "Starting labelhub");

    if config.server.cors.enabled && config.server.cors.allowed_origins.is_empty() {
        tracing::warn!("CORS is enabled with no allowed origins; browsers will be refused");
    }

    let state = connect(config.clone()).await;
    let app = build_app(&config, state);

    let bind_addr = (config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| {
            exit_with(format_args!(
                "cannot listen on {}:{}: {e}",
                bind_addr.0, bind_addr.1
            ))
        });
    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "Accepting admin and public requests");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down, finishing in-flight requests");
}

async fn run_migrate(explicit_config_path: Option<&str>) {
    let (_, config) = load_config(explicit_config_path);
    if config.database.is_none() {
        exit_with("no [database] section in the config file; nothing to migrate");
    }

    let pool = db::DbPool::from_config(&config.database)
        .await
        .unwrap_or_else(|e| exit_with(format_args!("failed to open the label store: {e}")));
    if let Err(e) = pool.run_migrations().await {
        tracing::error!(error = %e, "Migrations failed");
        exit_with(format_args!("migrations failed: {e}"));
    }
}

fn print_token(config: &config::LabelhubConfig, account: &models::Account) {
    match auth::issue_token(&config.auth, account) {
        Ok(token) => println!("{token}"),
        Err(e) => exit_with(format_args!("failed to issue token: {e}")),
    }
}

async fn run_bootstrap_admin(explicit_config_path: Option<&str>, name: String, email: String) {
    let (_, config) = load_config(explicit_config_path);
    let state = connect(config).await;

    let input = models::CreateAccount {
        name,
        email,
        role: models::AccountRole::SuperAdmin,
        associated_id: None,
    };
    if let Err(e) = input.validate() {
        exit_with(format_args!("invalid account: {e}"));
    }

    match state.services.accounts.create(input).await {
        Ok(account) => {
            eprintln!("Created super admin {} ({})", account.email, account.id);
            print_token(&state.config, &account);
        }
        Err(e) => exit_with(format_args!("failed to create account: {e}")),
    }
}

async fn run_token(explicit_config_path: Option<&str>, email: &str) {
    let (_, config) = load_config(explicit_config_path);
    let state = connect(config).await;

    match state.services.accounts.get_by_email(email).await {
        Ok(Some(account)) if account.is_active() => print_token(&state.config, &account),
        Ok(Some(_)) => exit_with(format_args!("account {email} is not active")),
        Ok(None) => exit_with(format_args!("no account with email {email}")),
        Err(e) => exit_with(format_args!("failed to look up account: {e}")),
    }
}
