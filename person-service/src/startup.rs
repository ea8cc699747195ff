use crate::config::{PersonConfig, StoreBackend};
use crate::handlers;
use crate::services::{InMemoryPersonStore, MongoDb, PersonStore};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersonStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/addPerson", post(handlers::add_person))
        .route("/persons", get(handlers::list_burrito_lovers))
        .route("/person", get(handlers::get_person_by_name))
        .route("/person/:id", get(handlers::get_person_by_id))
        .route("/updatePerson", put(handlers::update_person))
        .route("/deletePerson", delete(handlers::delete_person))
        .route("/deletePerson/:id", delete(handlers::delete_person))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Builds the configured store. Only an unusable connection string is fatal:
/// an unreachable database is logged and the service starts anyway.
pub async fn build_store(config: &PersonConfig) -> Result<Arc<dyn PersonStore>, AppError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory person store; data is lost on restart");
            Ok(Arc::new(InMemoryPersonStore::new()))
        }
        StoreBackend::Mongo => {
            let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
            match db.health_check().await {
                Ok(()) => tracing::info!("Connected to database"),
                Err(e) => tracing::error!("Database unreachable at startup: {}", e),
            }
            Ok(Arc::new(db))
        }
    }
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    pub async fn build(config: PersonConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Serves the router over an already constructed store.
    pub async fn build_with_store(
        config: PersonConfig,
        store: Arc<dyn PersonStore>,
    ) -> Result<Self, AppError> {
        let app = build_router(AppState::new(store));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server is up and running on port {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(async move { server.await }),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
