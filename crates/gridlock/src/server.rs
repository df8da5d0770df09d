//! Server builder and accept loop.

use std::sync::Arc;

use gridlock_transport::WsListener;

use crate::connection::handle_connection;
use crate::{GridlockError, SessionRouter};

/// Builder for configuring and starting a Gridlock server.
///
/// # Example
///
/// ```rust,no_run
/// use gridlock::GridlockServerBuilder;
///
/// # async fn run() -> Result<(), gridlock::GridlockError> {
/// let server = GridlockServerBuilder::new().bind("0.0.0.0:50051").build().await?;
/// server.run().await
/// # }
/// ```
pub struct GridlockServerBuilder {
    bind_addr: String,
}

impl GridlockServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:50051".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server.
    pub async fn build(self) -> Result<GridlockServer, GridlockError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        Ok(GridlockServer {
            listener,
            router: Arc::new(SessionRouter::new()),
        })
    }
}

impl Default for GridlockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Gridlock server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridlockServer {
    listener: WsListener,
    router: Arc<SessionRouter>,
}

impl GridlockServer {
    /// Creates a new builder.
    pub fn builder() -> GridlockServerBuilder {
        GridlockServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop: one handler task per connection, until the
    /// process is terminated.
    ///
    /// A failed accept is logged and survived; a connection that ends with
    /// an error only ever takes itself (and, by the abort protocol, its
    /// opponent's match) down.
    pub async fn run(mut self) -> Result<(), GridlockError> {
        tracing::info!("gridlock server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let router = Arc::clone(&self.router);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, router).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
