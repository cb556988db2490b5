mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod repos;
mod services;
mod state;
mod stores;
#[cfg(test)]
mod test_utils;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{Router, http};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Config,
    repos::{PgFavoriteRepo, PgPhonicsRepo, Repos},
    services::{
        FirebaseTokenIssuer, OpenAiStoryGenerator, UnkeyIdentityProvider, openai, unkey,
    },
    state::AppState,
    stores::{RedisRateLimiter, RedisStoryStore, Stores},
};

#[derive(Parser)]
#[command(name = "api")]
#[command(about = "Phonicsville API server")]
struct Args {
    /// Run database migrations and exit
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider before any TLS operations
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    let args = Args::parse();
    let config = envy::prefixed("PHONICSVILLE_").from_env::<Config>()?;

    // Sentry guard must stay alive for the lifetime of the process
    let _sentry_guard = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(config.env.clone().into()),
                ..Default::default()
            },
        ))
    });

    // Set up tracing: JSON in production, human-readable otherwise
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }

    let database = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&database).await?;
        tracing::info!("Migrations complete");
        return Ok(());
    }

    let redis = redis::Client::open(config.redis_url.as_str())?;

    let repos = Repos {
        phonics: Arc::new(PgPhonicsRepo::new(database.clone())),
        favorites: Arc::new(PgFavoriteRepo::new(database)),
    };

    let stores = Stores {
        stories: Arc::new(RedisStoryStore::new(redis.clone())),
        rate_limiter: Arc::new(RedisRateLimiter::new(redis)),
    };

    let identity = UnkeyIdentityProvider::new(unkey::Client::new(&config.unkey_root_key));
    let generator = OpenAiStoryGenerator::new(
        openai::Client::new(&config.openai_api_key, &config.openai_base_url),
        &config.openai_model,
    );
    let storage_tokens = FirebaseTokenIssuer::new(
        &config.firebase_client_email,
        &config.firebase_private_key_pem(),
    )?;

    let state = AppState {
        config: config.clone(),
        repos,
        stores,
        identity: Arc::new(identity),
        generator: Arc::new(generator),
        storage_tokens: Arc::new(storage_tokens),
    };

    let x_request_id = http::HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(handlers::story::router())
        .merge(handlers::stories::router())
        .merge(handlers::storage_token::router())
        .merge(handlers::wordbank::router());

    let app = Router::new()
        .nest("/health", handlers::health::router())
        .nest("/api", api)
        .with_state(state)
        // Request ID: generate UUID, include in logs, return in response
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &http::Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB limit

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
