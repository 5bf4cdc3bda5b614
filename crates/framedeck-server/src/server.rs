//! Connection bootstrap and HTTP server lifecycle

use crate::config::ServerConfig;
use crate::routes;
use framedeck_store::{DemoStore, SharedStore, SqliteStore, StoreError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Open the configured store and verify it answers before serving traffic.
///
/// # Errors
/// - `StoreError` if the database cannot be opened, migrated or queried
pub async fn bootstrap(config: &ServerConfig) -> Result<SharedStore, StoreError> {
    let store = SqliteStore::open(&config.database, config.pool)?;
    if let Err(e) = store.ping().await {
        tracing::error!(error = %e, "unable to connect to the database");
        return Err(e);
    }
    tracing::info!("connection to the database has been established");
    Ok(Arc::new(store))
}

/// A server bound and running in the background
#[derive(Debug)]
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl RunningServer {
    /// Bind `addr` and serve the API on a spawned task
    ///
    /// # Errors
    /// - `warp::Error` if the address cannot be bound
    pub fn start(addr: SocketAddr, store: SharedStore) -> Result<Self, warp::Error> {
        let (tx, rx) = oneshot::channel::<()>();
        let (bound, server) = warp::serve(routes::api(store))
            .try_bind_with_graceful_shutdown(addr, async move {
                let _ = rx.await;
            })?;

        tracing::info!(addr = %bound, "listening");
        Ok(Self {
            addr: bound,
            shutdown: Some(tx),
            handle: tokio::spawn(server),
        })
    }

    /// Address actually bound (resolves port 0)
    #[inline]
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for HTTP clients
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!(error = %e, "server task ended abnormally");
        }
        tracing::info!(addr = %self.addr, "server stopped");
    }

    /// Run until `signal` resolves, then shut down
    pub async fn run_until<F>(self, signal: F)
    where
        F: std::future::Future<Output = ()>,
    {
        signal.await;
        self.shutdown().await;
    }
}
