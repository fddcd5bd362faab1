use std::sync::Arc;

use axum::{middleware::from_fn, Router};
use census_registry::app::{api_router, AppServices};
use census_registry::core::config::{BootstrapConfig, Config, DatabaseConfig};
use census_registry::core::openapi::{ApiDoc, SwaggerInfoModifier};
use census_registry::core::{database, middleware};
use census_registry::features::auth::TokenService;
use census_registry::features::users::{ProvisionOutcome, UserService};
use census_registry::modules::storage::build_photo_store;
use clap::{Parser, Subcommand};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Household census registration backend
#[derive(Parser)]
#[command(name = "census-registry")]
#[command(about = "Household census registration backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Create the super-user from SUPERUSER_* variables if it does not exist
    ProvisionSuperuser,
    /// Insert the reference provinces that are missing
    SeedProvinces,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        // Load .env file BEFORE initializing logger so RUST_LOG is available
        let _ = dotenvy::dotenv();

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        match cli.command.unwrap_or(Commands::Serve) {
            Commands::Serve => serve(worker_threads).await,
            Commands::ProvisionSuperuser => provision_superuser().await,
            Commands::SeedProvinces => seed_provinces().await,
        }
    })
}

/// Pool with migrations applied, for the maintenance commands
async fn migrated_pool(config: &DatabaseConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = database::create_pool(config).await?;
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    Ok(pool)
}

async fn provision_superuser() -> anyhow::Result<()> {
    let database = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let bootstrap = BootstrapConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let users = UserService::new(migrated_pool(&database).await?);
    users.seed_provinces().await?;

    match users.provision_superuser(&bootstrap).await? {
        ProvisionOutcome::Created(id) => {
            tracing::info!("Super-user '{}' created (id {})", bootstrap.username, id)
        }
        ProvisionOutcome::AlreadyPresent(id) => {
            tracing::info!("Super-user '{}' already present (id {})", bootstrap.username, id)
        }
    }

    Ok(())
}

async fn seed_provinces() -> anyhow::Result<()> {
    let database = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let users = UserService::new(migrated_pool(&database).await?);

    let inserted = users.seed_provinces().await?;
    tracing::info!("{} province(s) inserted", inserted);

    Ok(())
}

async fn serve(worker_threads: usize) -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    let photos = build_photo_store(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize photo storage: {}", e))?;

    let tokens = Arc::new(TokenService::new(&config.auth));
    tracing::info!(
        "Token service initialized (issuer: {}, ttl: {}s)",
        config.auth.issuer,
        config.auth.token_ttl.as_secs()
    );

    let services = AppServices::new(pool, tokens, photos);
    services.users.seed_provinces().await?;
    tracing::info!("Services initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let app = Router::new()
        .merge(swagger)
        .merge(api_router(&services, config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
