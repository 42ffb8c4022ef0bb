mod core;
mod features;
mod modules;
mod shared;

use crate::core::app::{api_router, AppDeps};
use crate::core::config::{Config, StorageBackend};
use crate::core::middleware::SharedSecret;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::modules::image_gen::{CloudflareImageGenerator, ImageGenerator};
use crate::modules::notifier::DiscordNotifier;
use crate::modules::storage::{MinIOClient, PublicObjectStore};
use crate::modules::store::{BoardStore, MemoryBoardStore, PgBoardStore};
use crate::shared::validation::ContentFilter;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
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

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
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

    // Storage backend
    let store: Arc<dyn BoardStore> = match (config.storage, &config.database) {
        (StorageBackend::Postgres, Some(db_config)) => {
            let pool = database::create_pool(db_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(PgBoardStore::new(pool))
        }
        (StorageBackend::Postgres, None) => {
            return Err(anyhow::anyhow!("DATABASE_URL must be set for postgres storage"));
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Arc::new(MemoryBoardStore::new())
        }
    };

    // Discord webhook (best effort)
    let notifier = DiscordNotifier::new(&config.webhook)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Discord notifier: {}", e))?;
    if notifier.is_enabled() {
        tracing::info!("Discord notifications enabled");
    } else {
        tracing::info!("Discord notifications disabled (no webhook configured)");
    }

    // Image generation and its object storage only matter together
    let (image_generator, image_store): (
        Option<Arc<dyn ImageGenerator>>,
        Option<Arc<dyn PublicObjectStore>>,
    ) = match config.image_gen.clone() {
        Some(image_config) => {
            let generator = CloudflareImageGenerator::new(image_config)
                .map_err(|e| anyhow::anyhow!("Failed to initialize image generator: {}", e))?;
            let minio_client = MinIOClient::connect(config.minio.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?;
            tracing::info!(
                "AI image generation enabled (bucket: {})",
                config.minio.bucket
            );
            (Some(Arc::new(generator)), Some(Arc::new(minio_client)))
        }
        None => {
            tracing::info!("AI image generation disabled (no Cloudflare credentials)");
            (None, None)
        }
    };

    let api = api_router(AppDeps {
        store,
        filter: ContentFilter::new(config.content.blocklist.clone()),
        notifier,
        ledger: config.ledger,
        image_generator,
        image_store,
        admin_key: SharedSecret::new(config.moderation.admin_key.clone()),
        queue_token: SharedSecret::new(config.moderation.queue_token.clone()),
    });

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
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
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(config.app.max_request_body_size))
                .layer(middleware::request_timeout_layer(config.app.request_timeout)),
        )
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

    // Start server
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
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
