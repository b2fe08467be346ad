use log::{debug, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use crate::client::{ClientRegistry, DisconnectReason, Session, SharedRegistry, TcpSession, serve};
use crate::config::ServerConfig;
use crate::error::handlers::handle_error;
use crate::error::ChatServerError;
use crate::middleware::logging::log_server_running;
use crate::server::handshake::read_name;

pub struct Server {
    client_registry: SharedRegistry,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listening socket. Failing to bind is fatal for the server.
    pub async fn bind(config: ServerConfig) -> Result<Self, ChatServerError> {
        let addr = config.listen_addr();

        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(source) => return Err(ChatServerError::Bind { addr, source }),
        };

        Ok(Self {
            client_registry: ClientRegistry::shared(),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the server is actually listening on
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the registry of connected clients
    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.client_registry)
    }

    /// Accepts connections until the process is killed.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await;
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Accept errors are logged and the loop carries on. Returning stops
    /// new connections only: live sessions still end solely through their
    /// own reads, so when the runtime is torn down after this returns they
    /// are dropped mid-read, without cleanup or a disconnect line. Their
    /// sockets close with the process.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        match self.listener.local_addr() {
            Ok(addr) => log_server_running(&addr),
            Err(e) => warn!("Could not read listening address: {}", e),
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let client_registry = Arc::clone(&self.client_registry);
                        let config = Arc::clone(&self.config);

                        // Spawn a task for each client so accept loop doesn't block
                        tokio::spawn(async move {
                            match handle_new_client(stream, addr, client_registry, config).await {
                                Ok(reason) => debug!("Client {} served: {}", addr, reason),
                                Err(e) => handle_error(&e),
                            }
                        });
                    }
                    Err(e) => handle_error(&ChatServerError::Accept(e)),
                }
            }
        }
    }
}

/// Handles a new client: reads its name, registers it, and serves it.
///
/// A failed handshake drops the connection without registering anything.
async fn handle_new_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: SharedRegistry,
    config: Arc<ServerConfig>,
) -> Result<DisconnectReason, ChatServerError> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let name = read_name(&mut reader, config.max_name_length).await?;

    let session: TcpSession =
        Session::register(client_registry, name, Some(client_addr), reader, write_half).await;

    Ok(serve(session).await)
}
