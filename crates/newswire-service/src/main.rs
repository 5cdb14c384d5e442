use newswire_service::{
    DefaultAppState,
    config::Config,
    db,
    routes::create_router,
    shutdown::{DrainLayer, ShutdownState},
    upstream::NewsApiClient,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newswire_service=debug".parse().unwrap()),
        )
        .init();

    let config = Config::from_env().unwrap_or_else(|err| {
        error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    });

    let connection = db::establish_connection(&config.database_url).unwrap_or_else(|err| {
        error!(database_url = %config.database_url, error = %err, "Failed to open database");
        std::process::exit(1);
    });
    info!(database_url = %config.database_url, "Connected to database");

    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; country news requests will fail");
    }

    let provider = NewsApiClient::new(config.news_api_base_url.clone(), config.news_api_key.clone())
        .unwrap_or_else(|err| {
            error!(error = %err, "Failed to build news provider client");
            std::process::exit(1);
        });

    let app_state = DefaultAppState::new(Arc::new(Mutex::new(connection)), provider)
        .with_category_hints(config.category_hints);
    let shutdown_state = ShutdownState::new();

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DrainLayer::new(shutdown_state.clone()))
                .layer(TimeoutLayer::new(Duration::from_secs(15))),
        )
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %config.bind_address, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(bind_address = %config.bind_address, "Server running");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown_state));

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal(shutdown_state: ShutdownState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        in_flight = shutdown_state.in_flight_count(),
        "Shutdown signal received, draining requests"
    );
    let drained = shutdown_state.completed();
    shutdown_state.start_shutdown();

    drained.await;
    info!("Graceful shutdown completed");
}
