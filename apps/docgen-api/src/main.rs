//! docgen-api: HTTP surface for the document generation service (C10).
//!
//! Binds the render orchestrator, document cache, and job queue to a
//! REST API: template registry introspection, validation, synchronous
//! and asynchronous rendering, and content analysis.

mod config;
mod error;
mod handlers;
mod middleware;
mod state;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use state::AppState;

/// Command-line overrides for the `HOST`/`PORT` environment variables
/// (§6); everything else is environment-only, per the config table.
#[derive(Parser, Debug)]
#[command(name = "docgen-api")]
#[command(about = "HTTP surface for the document generation service")]
struct Args {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("docgen_api=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(host = %config.host, port = config.port, "starting docgen-api");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::new(config).await);
    state.warm_up_compiler().await;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(86_400));

    let app = Router::new()
        .route("/", get(handlers::misc::banner))
        .route("/health", get(handlers::misc::health))
        .route("/metrics", get(handlers::misc::metrics))
        .route("/templates", get(handlers::templates::list_all))
        .route("/templates/:doc_type", get(handlers::templates::list_for_type))
        .route(
            "/template-info/:doc_type/:name",
            get(handlers::templates::template_info),
        )
        .route("/schema/:doc_type", get(handlers::templates::schema))
        .route("/validate", post(handlers::validate::validate))
        .route("/generate", post(handlers::generate::generate))
        .route("/generate-yaml", post(handlers::generate::generate_yaml))
        .route("/generate/async", post(handlers::generate::generate_async))
        .route("/jobs/:id", get(handlers::jobs::status))
        .route("/jobs/:id/download", get(handlers::jobs::download))
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/analyze-pdf", post(handlers::analyze::analyze_pdf))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::enforce,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
