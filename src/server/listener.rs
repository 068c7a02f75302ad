use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::handler::Handler;
use crate::http::connection::Connection;

/// Pause after a failed accept (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    handler: Arc<Handler>,
}

impl Server {
    /// Binds the configured address. Failure here is fatal for the process.
    pub async fn bind(config: Arc<Config>) -> anyhow::Result<Self> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Listening on {}", listener.local_addr()?);

        let handler = Arc::new(Handler::new(&config));
        Ok(Self {
            listener,
            config,
            handler,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` completes, then stops accepting,
    /// lets open connections finish within the grace period, and returns.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (socket, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!("accept failed: {e}");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };
                    debug!("Accepted connection from {}", peer);

                    let handler = Arc::clone(&self.handler);
                    let shutdown_rx = shutdown_rx.clone();
                    connections.spawn(async move {
                        let mut conn = Connection::new(socket, handler, shutdown_rx);
                        if let Err(e) = conn.run().await {
                            debug!("Connection error from {}: {}", peer, e);
                        }
                    });
                }

                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        error!("connection task failed: {e}");
                    }
                }

                _ = &mut shutdown => break,
            }
        }

        drop(self.listener);
        shutdown_tx.send_replace(true);

        let grace = self.config.shutdown_grace();
        let drained = tokio::time::timeout(grace, async {
            while connections.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = connections.len(),
                "grace period elapsed, dropping open connections"
            );
            connections.abort_all();
        }

        info!("Server stopped");
        Ok(())
    }
}
