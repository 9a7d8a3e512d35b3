//! TCP Server
//!
//! Accepts connections and dispatches them to handler threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Dictionary;
use crate::error::{LexiError, Result};

use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for LexiKV
///
/// Single acceptor thread; each accepted connection runs on its own handler
/// thread, capped by `max_connections`. The listener is non-blocking so the
/// accept loop can poll the shutdown flag.
pub struct Server {
    /// Server configuration
    config: Config,

    /// Shared dictionary service
    dict: Arc<Dictionary>,

    /// Bound listener
    listener: TcpListener,

    /// Live connection count
    active: Arc<AtomicUsize>,

    /// Set to request a graceful stop of the accept loop
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Create a server bound to the configured listen address
    pub fn new(config: Config, dict: Arc<Dictionary>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            LexiError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            dict,
            listener,
            active: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the server is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Into::into)
    }

    /// A handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking)
    ///
    /// Runs the accept loop until the shutdown flag is set. Handler threads
    /// for connections accepted before shutdown keep running until their
    /// clients disconnect or time out.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "listening on {} (max {} connections)",
            self.local_addr()?,
            self.config.max_connections
        );

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if self.active.load(Ordering::Relaxed) >= self.config.max_connections {
                        tracing::warn!("connection limit reached, refusing {}", addr);
                        drop(stream);
                        continue;
                    }

                    // The accepted socket inherits non-blocking mode on some
                    // platforms; handlers expect blocking I/O with timeouts.
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("failed to configure socket for {}: {}", addr, e);
                        continue;
                    }

                    self.spawn_handler(stream);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::error!("accept failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    /// Spawn a handler thread for an accepted connection
    fn spawn_handler(&self, stream: std::net::TcpStream) {
        let dict = Arc::clone(&self.dict);
        let active = Arc::clone(&self.active);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        active.fetch_add(1, Ordering::Relaxed);

        thread::spawn(move || {
            match Connection::new(stream, dict) {
                Ok(mut conn) => {
                    if let Err(e) = conn.set_timeouts(read_ms, write_ms) {
                        tracing::warn!("failed to set timeouts for {}: {}", conn.peer_addr(), e);
                    } else if let Err(e) = conn.handle() {
                        tracing::warn!("connection {} ended with error: {}", conn.peer_addr(), e);
                    }
                }
                Err(e) => tracing::warn!("failed to set up connection: {}", e),
            }

            active.fetch_sub(1, Ordering::Relaxed);
        });
    }
}
