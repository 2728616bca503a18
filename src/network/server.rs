//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::NetworkConfig;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::network::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

const TOO_MANY_CONNECTIONS: &[u8] = b"ERR too many connections\n";

/// Requests a running server to stop accepting connections
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Decrements the live connection count when a connection thread ends
struct ConnectionSlot {
    active: Arc<AtomicUsize>,
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// TCP server for WalKV
pub struct Server {
    config: NetworkConfig,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the listen address
    pub fn bind(config: &NetworkConfig, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            KvError::Network(format!("cannot listen on {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config: config.clone(),
            engine,
            listener,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping [`run`](Server::run) from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Start the server (blocking until shutdown is requested)
    pub fn run(&self) -> Result<()> {
        tracing::info!(addr = %self.local_addr()?, "server listening");

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => self.dispatch(stream, peer),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!(
            open_connections = self.active_connections(),
            "server stopped accepting connections"
        );
        Ok(())
    }

    fn dispatch(&self, mut stream: TcpStream, peer: SocketAddr) {
        let previous = self.active.fetch_add(1, Ordering::SeqCst);
        let slot = ConnectionSlot {
            active: Arc::clone(&self.active),
        };

        if previous >= self.config.max_connections {
            tracing::warn!(%peer, limit = self.config.max_connections, "rejecting connection");
            let _ = stream.write_all(TOO_MANY_CONNECTIONS);
            return;
        }

        let engine = Arc::clone(&self.engine);
        let config = self.config.clone();
        let spawned = thread::Builder::new()
            .name(format!("walkv-conn-{}", peer))
            .spawn(move || {
                let _slot = slot;
                if let Err(e) = serve(stream, engine, &config) {
                    tracing::debug!(%peer, error = %e, "connection ended with error");
                }
            });

        if let Err(e) = spawned {
            tracing::error!(%peer, error = %e, "failed to spawn connection thread");
        }
    }
}

fn serve(stream: TcpStream, engine: Arc<Engine>, config: &NetworkConfig) -> Result<()> {
    // Accepted sockets may inherit the listener's non-blocking mode
    stream.set_nonblocking(false)?;
    let mut connection = Connection::new(stream, engine, config.max_message_size)?;
    connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
    connection.handle()
}
