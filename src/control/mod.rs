mod codec;

pub use codec::{ReplyCodec, ReplyProtocol, REPLY_END};

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, info};
use tokio::net::UnixStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

use crate::config::BirdConfig;
use crate::error::{Error, Result};

/// Client for BIRD's control socket. Every `execute` uses a fresh connection,
/// closed when the call returns.
#[derive(Debug, Clone)]
pub struct BirdClient {
    socket: PathBuf,
    timeout: Duration,
}

impl BirdClient {
    pub fn new<P: Into<PathBuf>>(socket: P, timeout: Duration) -> Self {
        Self {
            socket: socket.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BirdConfig) -> Self {
        Self::new(&config.socket, config.timeout())
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Send one command and wait (up to the configured deadline) for the full reply
    pub async fn execute(&self, command: &str) -> Result<String> {
        info!("Connecting to BIRD socket {}", self.socket.display());
        let stream = UnixStream::connect(&self.socket)
            .await
            .map_err(|err| self.connection_error(err))?;
        let mut protocol: ReplyProtocol = Framed::new(stream, ReplyCodec::new());

        debug!("Sending BIRD command: {}", command);
        protocol
            .send(command.to_string())
            .await
            .map_err(|err| self.connection_error(err))?;

        let reply = match timeout(self.timeout, protocol.next()).await {
            Err(_) => return Err(Error::Timeout(self.timeout)),
            Ok(Some(reply)) => reply.map_err(|err| self.connection_error(err))?,
            Ok(None) => {
                return Err(self.connection_error(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before reply",
                )))
            }
        };
        debug!("Received {} bytes from BIRD", reply.len());
        Ok(reply)
    }

    fn connection_error(&self, source: io::Error) -> Error {
        Error::Connection {
            path: self.socket.clone(),
            source,
        }
    }
}
