use actix_cors::Cors;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::config::{Config, LogFormat, StorageBackend};
use blog_service::db::{self, MemoryStore, PgStore};
use blog_service::services::AuthService;
use blog_service::{routes, AppState};
use std::io::{self, BufRead};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Build the store selected by configuration, running migrations when asked.
async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(AppState::memory(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database)
                .await
                .context("Failed to create database pool")?;
            if config.database.run_migrations {
                db::run_migrations(&pool)
                    .await
                    .context("Failed to apply migrations")?;
            }
            Ok(AppState::postgres(PgStore::new(pool)))
        }
    }
}

async fn create_user(config: &Config, username: &str) -> anyhow::Result<()> {
    if !config.storage.is_persistent() {
        anyhow::bail!("create-user needs persistent storage; set STORAGE_BACKEND=postgres");
    }
    let state = build_state(config).await?;

    eprint!("Password for {}: ", username);
    let mut password = String::new();
    io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let password = password.trim_end_matches(['\r', '\n']);

    let user = AuthService::new(state.credentials.clone())
        .create_user(username, password)
        .await?;
    println!("Created user {} (id {})", user.username, user.id);

    Ok(())
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;
    Ok(())
}

async fn healthcheck(config: &Config) -> anyhow::Result<()> {
    let url = format!("http://127.0.0.1:{}/api/v1/health/", config.app.port);
    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .context("healthcheck HTTP error")?;
    anyhow::ensure!(
        resp.status().is_success(),
        "healthcheck HTTP status: {}",
        resp.status()
    );
    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let bind_address = config.app.bind_address();
    let allowed_origins = config.cors.allowed_origins.clone();

    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(NormalizePath::new(TrailingSlash::Always))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .disable_signals()
    .run();

    let handle = server.handle();
    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            handle.stop(true).await;
        }
    }

    tracing::info!("Blog-service shutting down");
    Ok(())
}

/// Blog Service
///
/// REST backend for posts and comments.
///
/// # Usage
///
/// - `blog-service` - serve the HTTP API
/// - `blog-service migrate` - apply database migrations and exit
/// - `blog-service create-user <username>` - provision a user, password on stdin
/// - `blog-service healthcheck` - check the local health endpoint (container healthchecks)
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    let args: Vec<String> = std::env::args().skip(1).collect();

    if matches!(args.first().map(String::as_str), Some("healthcheck")) {
        return healthcheck(&config).await;
    }

    init_tracing(config.log.format);
    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match args.first().map(String::as_str) {
        None | Some("serve") => serve(config).await,
        Some("migrate") => migrate(&config).await,
        Some("create-user") => {
            let username = args
                .get(1)
                .context("usage: blog-service create-user <username>")?;
            create_user(&config, username).await
        }
        Some(other) => anyhow::bail!(
            "unknown command '{}'; expected serve, migrate, create-user or healthcheck",
            other
        ),
    }
}
