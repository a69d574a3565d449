use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension, Path as UrlPath},
    http::{header, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use accounts::gateways::{ReviewerGate, SessionGate};
use accounts::infra::storage::SeaOrmAccountsRepository;
use accounts::{AccountsConfig, AccountsService};
use catalog::contract::model::ProductLine;
use catalog::domain::ports::SessionVerifier;
use catalog::infra::media::LocalMediaStore;
use catalog::infra::storage::SeaOrmProductRepository;
use catalog::{CatalogConfig, CatalogService};
use runtime::{AppConfig, CliArgs};

mod openapi;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push_str("?mode=rwc");
    if let Some(q) = query {
        out.push('&');
        out.push_str(q);
    }
    Ok(out)
}

/// Storefront Server - catalog and reviews backend
#[derive(Parser)]
#[command(name = "storefront-server")]
#[command(about = "Storefront Server - catalog and reviews backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging = config.logging.clone().unwrap_or_default();
    runtime::init_logging(&logging, Path::new(&config.server.home_dir))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => check(&config).await,
        Commands::Run => run(config).await,
    }
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("database configuration is required"))?;

    let url = if db_config.url.starts_with("sqlite:") {
        absolutize_sqlite_dsn(&db_config.url, Path::new(&config.server.home_dir), true)?
    } else {
        db_config.url.clone()
    };

    let mut opts = ConnectOptions::new(url);
    if let Some(max_conns) = db_config.max_conns {
        opts.max_connections(max_conns);
    }
    Database::connect(opts)
        .await
        .context("failed to connect to database")
}

/// Fetch one module's config from the bag, defaulting when absent.
fn module_config<T: DeserializeOwned + Default>(config: &AppConfig, name: &str) -> Result<T> {
    match config.module_config(name) {
        Some(value) => serde_json::from_value(value.clone())
            .with_context(|| format!("invalid {name} module config")),
        None => Ok(T::default()),
    }
}

async fn check(config: &AppConfig) -> Result<()> {
    let _catalog: CatalogConfig = module_config(config, "catalog")?;
    let _accounts: AccountsConfig = module_config(config, "accounts")?;
    let db = connect_db(config).await?;
    db.ping().await.context("database ping failed")?;
    info!("Configuration and database check passed");
    Ok(())
}

async fn run(config: AppConfig) -> Result<()> {
    let db = connect_db(&config).await?;
    catalog::Migrator::up(&db, None)
        .await
        .context("catalog migrations failed")?;
    accounts::Migrator::up(&db, None)
        .await
        .context("accounts migrations failed")?;

    let catalog_config: CatalogConfig = module_config(&config, "catalog")?;
    let accounts_config: AccountsConfig = module_config(&config, "accounts")?;
    let max_image_bytes = catalog_config.max_image_bytes;

    let media = Arc::new(LocalMediaStore::new(config.media_root(), "/media"));

    let accounts_service = Arc::new(AccountsService::new(
        Arc::new(SeaOrmAccountsRepository::new(db.clone())),
        media.clone(),
        accounts_config,
    ));
    accounts_service
        .ensure_bootstrap_admin()
        .await
        .context("failed to bootstrap admin account")?;

    let repo = Arc::new(SeaOrmProductRepository::new(db));
    let reviewers = Arc::new(ReviewerGate::new(accounts_service.clone()));
    let books = Arc::new(CatalogService::new(
        ProductLine::Books,
        repo.clone(),
        media.clone(),
        reviewers.clone(),
        catalog_config.clone(),
    ));
    let clothing = Arc::new(CatalogService::new(
        ProductLine::Clothing,
        repo,
        media.clone(),
        reviewers,
        catalog_config,
    ));

    let verifier: Arc<dyn SessionVerifier> = Arc::new(SessionGate::new(accounts_service.clone()));

    let app = Router::new()
        .nest("/api/v1/books", catalog::api::rest::routes::router(books))
        .nest(
            "/api/v1/clothing",
            catalog::api::rest::routes::router(clothing),
        )
        .nest(
            "/api/v1/users",
            accounts::api::rest::routes::router(accounts_service),
        )
        .route("/healthz", get(health_check))
        .route("/openapi.json", get(openapi::serve))
        .route("/media/{id}", get(serve_media))
        .layer(Extension(verifier))
        .layer(Extension(media))
        .layer(TraceLayer::new_for_http())
        // multipart creates carry up to five images
        .layer(DefaultBodyLimit::max(6 * max_image_bytes));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(addr = %addr, "Storefront server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

fn content_type_for(storage_id: &str) -> &'static str {
    match storage_id.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a stored media asset by its storage id.
async fn serve_media(
    Extension(media): Extension<Arc<LocalMediaStore>>,
    UrlPath(id): UrlPath<String>,
) -> Result<([(header::HeaderName, &'static str); 1], Vec<u8>), StatusCode> {
    let path = media.path_for(&id).map_err(|_| StatusCode::NOT_FOUND)?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type_for(&id))], bytes)),
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}
