use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error as ThisError;
use tokio::net::{UnixListener, UnixStream};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, instrument, warn};

use crate::backend::Backend;
use crate::codec::CodecError;
use crate::commands::dispatch;
use crate::config::Config;
use crate::connection::Connection;
use crate::reply::Action;

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Failures that stop the server process.
#[derive(Debug, ThisError)]
pub enum LifecycleError {
    #[error("failed to remove stale socket {path}: {source}")]
    StaleSocket { path: PathBuf, source: io::Error },
    #[error("failed to bind {path}: {source}")]
    Bind { path: PathBuf, source: io::Error },
    #[error("failed to remove socket {path}: {source}")]
    Cleanup { path: PathBuf, source: io::Error },
}

/// State shared by every connection.
pub struct Context<B> {
    pub backend: B,
    started_at: Instant,
}

impl<B: Backend> Context<B> {
    pub fn new(backend: B) -> Context<B> {
        Context {
            backend,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// The listening socket plus everything needed to drain it on shutdown.
pub struct Server<B> {
    listener: UnixListener,
    socket_path: PathBuf,
    ctx: Arc<Context<B>>,
    max_line_length: usize,
    shutdown: CancellationToken,
    connections: TaskTracker,
}

impl<B: Backend> Server<B> {
    /// Binds the listening socket, first removing a socket file left behind by a previous run.
    pub fn bind(config: &Config, backend: B) -> Result<Server<B>, LifecycleError> {
        let path = config.socket_path.clone();

        match std::fs::remove_file(&path) {
            Ok(()) => info!("Removed stale socket {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(LifecycleError::StaleSocket { path, source }),
        }

        let listener = match UnixListener::bind(&path) {
            Ok(listener) => listener,
            Err(source) => return Err(LifecycleError::Bind { path, source }),
        };

        Ok(Server {
            listener,
            socket_path: path,
            ctx: Arc::new(Context::new(backend)),
            max_line_length: config.max_line_length,
            shutdown: CancellationToken::new(),
            connections: TaskTracker::new(),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Cancelling this token has the same effect as a client sending `shutdown`.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Accepts connections until a client sends `shutdown` or `signal` completes. Then stops
    /// accepting, closes and awaits every open connection and removes the socket file.
    pub async fn run(self, signal: impl Future) -> Result<(), LifecycleError> {
        let Server {
            listener,
            socket_path,
            ctx,
            max_line_length,
            shutdown,
            connections,
        } = self;

        info!(
            "Listening on {} (backend {})",
            socket_path.display(),
            ctx.backend.describe()
        );

        let mut signal = pin!(signal);
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let ctx = ctx.clone();
                        let shutdown = shutdown.clone();
                        connections.spawn(async move {
                            if let Err(e) =
                                handle_connection(stream, ctx, shutdown, max_line_length).await
                            {
                                warn!("Connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
                _ = shutdown.cancelled() => break,
                _ = &mut signal => {
                    info!("Received termination signal");
                    break;
                }
            }
        }

        info!("Shutting down...");
        drop(listener);
        shutdown.cancel();
        connections.close();
        connections.wait().await;

        if let Err(source) = std::fs::remove_file(&socket_path) {
            if source.kind() != io::ErrorKind::NotFound {
                return Err(LifecycleError::Cleanup {
                    path: socket_path,
                    source,
                });
            }
        }

        info!("Server shut down.");
        Ok(())
    }
}

/// Binds according to `config` and serves until shutdown.
pub async fn run<B: Backend>(
    config: &Config,
    backend: B,
    signal: impl Future,
) -> Result<(), LifecycleError> {
    Server::bind(config, backend)?.run(signal).await
}

#[instrument(name = "connection", skip_all, fields(connection_id))]
async fn handle_connection<B: Backend>(
    stream: UnixStream,
    ctx: Arc<Context<B>>,
    shutdown: CancellationToken,
    max_line_length: usize,
) -> Result<(), CodecError> {
    let mut conn = Connection::new(stream, max_line_length);

    tracing::Span::current().record("connection_id", tracing::field::display(conn.id));
    info!("Client connected");

    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("Closing connection, server is shutting down");
                break;
            }
            line = conn.read_line() => line?,
        };

        let Some(line) = line else {
            break;
        };

        debug!("Received: {:?}", line);
        let reply = dispatch(&line, &ctx).await;
        debug!("Sending: {:?}", reply.text());

        conn.write_reply(&reply).await?;

        match reply.action() {
            Action::Continue => {}
            Action::Close => break,
            Action::Shutdown => {
                info!("Client requested server shutdown");
                shutdown.cancel();
                break;
            }
        }
    }

    info!("Client disconnected");
    Ok(())
}
