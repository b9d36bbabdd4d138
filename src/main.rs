//! game-ratings-back binary entrypoint wiring configuration, storage and the REST layer.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use game_ratings_back::{
    config::{AppConfig, StoreBackend},
    dao::rating_store::memory::MemoryRatingStore,
    routes,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);
    install_store(&app_state, StoreBackend::from_env()).await?;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the in-memory store directly, or spawn a supervisor for remote backends.
async fn install_store(state: &SharedState, backend: StoreBackend) -> anyhow::Result<()> {
    info!(?backend, "selecting rating store backend");
    match backend {
        StoreBackend::Memory => {
            state
                .install_rating_store(Arc::new(MemoryRatingStore::new()))
                .await;
            Ok(())
        }
        StoreBackend::Mongo => spawn_mongo_supervisor(state),
        StoreBackend::Couch => spawn_couch_supervisor(state),
    }
}

#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(state: &SharedState) -> anyhow::Result<()> {
    use game_ratings_back::{
        dao::{
            rating_store::{
                RatingStore,
                mongodb::{MongoConfig, MongoRatingStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    tokio::spawn(storage_supervisor::run(state.clone(), || async {
        let config = MongoConfig::from_env().await?;
        let store = MongoRatingStore::connect(config).await?;
        Ok::<_, StorageError>(Arc::new(store) as Arc<dyn RatingStore>)
    }));
    Ok(())
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_mongo_supervisor(_state: &SharedState) -> anyhow::Result<()> {
    anyhow::bail!("binary built without the `mongo-store` feature")
}

#[cfg(feature = "couch-store")]
fn spawn_couch_supervisor(state: &SharedState) -> anyhow::Result<()> {
    use game_ratings_back::{
        dao::{
            rating_store::{
                RatingStore,
                couchdb::{CouchConfig, CouchRatingStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    tokio::spawn(storage_supervisor::run(state.clone(), || async {
        let config = CouchConfig::from_env()?;
        let store = CouchRatingStore::connect(config).await?;
        Ok::<_, StorageError>(Arc::new(store) as Arc<dyn RatingStore>)
    }));
    Ok(())
}

#[cfg(not(feature = "couch-store"))]
fn spawn_couch_supervisor(_state: &SharedState) -> anyhow::Result<()> {
    anyhow::bail!("binary built without the `couch-store` feature")
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
