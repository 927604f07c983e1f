mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{
    routes as auth_routes, AuthService, GoogleIdentityProvider, InMemoryProfileStore, JwksClient,
    SessionStore,
};
use crate::features::reports::{
    routes as reports_routes, InMemoryReportRepository, PresentationService, ReportRepository,
    ReportService,
};
use crate::features::submissions::{routes as submissions_routes, DraftService, SubmissionService};
use crate::modules::geolocation::{FixedLocator, Geocoder, NominatimGeocoder};
use crate::modules::storage::InlinePhotoStore;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
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

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded (tokio_worker_threads={}, pid={})",
        worker_threads,
        std::process::id()
    );

    // Report store, seeded from the bundled mock data
    let repository: Arc<dyn ReportRepository> = Arc::new(
        InMemoryReportRepository::seeded().map_err(|e| anyhow::anyhow!("Seed data: {}", e))?,
    );
    let report_service = Arc::new(ReportService::new(Arc::clone(&repository)));
    let presentation_service = Arc::new(PresentationService::new(Arc::clone(&repository)));
    tracing::info!("Report services initialized");

    // Auth
    let jwks_client = Arc::new(JwksClient::new(
        &config.auth.google_jwks_url,
        config.auth.jwks_cache_ttl,
    ));
    let identity = Arc::new(GoogleIdentityProvider::new(
        jwks_client,
        config.auth.google_client_id.clone(),
        config.auth.jwt_leeway,
    ));
    let sessions = Arc::new(SessionStore::new(
        config.auth.session_ttl,
        config.auth.admin_emails.clone(),
    ));
    tracing::info!(
        "Auth initialized ({} admin account(s))",
        config.auth.admin_emails.len()
    );

    // Submissions
    let geocoder: Option<Arc<dyn Geocoder>> = match config.location.geocoder_url.as_deref() {
        Some(url) => {
            let geocoder = NominatimGeocoder::new(url)
                .map_err(|e| anyhow::anyhow!("Failed to create geocoder: {}", e))?;
            tracing::info!("Geocoding enabled via {}", url);
            Some(Arc::new(geocoder))
        }
        None => {
            tracing::info!("Geocoding disabled (no GEOCODER_URL configured)");
            None
        }
    };
    let submission_service = Arc::new(SubmissionService::new(Arc::clone(&repository), geocoder));
    let draft_service = Arc::new(DraftService::new(
        Arc::clone(&submission_service),
        Arc::new(InlinePhotoStore::new(config.uploads.max_photo_bytes)),
        Arc::new(FixedLocator::new(config.location.device_position)),
        config.auth.session_ttl,
    ));
    tracing::info!("Submission services initialized");

    // Signing out drops the resident's unsent drafts
    let auth_service = Arc::new(
        AuthService::new(
            identity,
            Arc::new(InMemoryProfileStore::new()),
            Arc::clone(&sessions),
        )
        .on_sign_out(draft_service.clone()),
    );

    // Periodic eviction of expired sessions and abandoned drafts
    {
        let sessions = Arc::clone(&sessions);
        let draft_service = Arc::clone(&draft_service);
        let period = config.auth.cleanup_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let expired = sessions.evict_expired().await;
                let stale = draft_service.evict_stale().await;
                tracing::debug!(
                    "Cleanup sweep removed {} session(s) and {} draft(s)",
                    expired,
                    stale
                );
            }
        });
    }

    // Build application router with dynamic swagger config
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

    // Protected routes (require a session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(reports_routes::admin_routes(
            Arc::clone(&report_service),
            Arc::clone(&presentation_service),
        ))
        .merge(submissions_routes::routes(
            submission_service,
            draft_service,
            config.uploads.max_photo_bytes,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            sessions,
            middleware::session_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(reports_routes::routes(report_service, presentation_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
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

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
