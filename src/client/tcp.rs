use super::transport::{Reply, Transport};
use super::wire::tcp_message;
use crate::errors::{Error, TransportError};
use crate::request::Request;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use socket2::{SockRef, TcpKeepalive};
use std::io;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};

/// Settings for [`TcpTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    /// Host name or IP address of the PWI server.
    ///
    /// Defaults to `127.0.0.1`.
    pub host: String,
    /// TCP port of the PWI server.
    ///
    /// Defaults to 8220.
    pub port: u16,
    /// How long to wait for the socket to become readable.
    ///
    /// Also bounds connecting. Defaults to 5 seconds.
    pub poll_timeout: Duration,
    /// Budget for a whole exchange, from sending the request to the end of the reply.
    ///
    /// Defaults to 10 seconds.
    pub total_timeout: Duration,
    /// Silence after which a status reply is considered complete.
    ///
    /// Defaults to 500 milliseconds.
    pub status_idle_timeout: Duration,
    /// TCP keepalive idle time, if any.
    ///
    /// Defaults to 60 seconds.
    pub keepalive: Option<Duration>,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8220,
            poll_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(10),
            status_idle_timeout: Duration::from_millis(500),
            keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// How the end of a reply is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// Up to and including the first `\n`.
    Line,
    /// Up to a blank line, EOF, or a quiet period after data started arriving.
    Status,
}

impl Framing {
    /// Length of the complete reply at the start of `buf`, if it's all there.
    fn complete_len(self, buf: &[u8]) -> Option<usize> {
        match self {
            Self::Line => buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1),
            Self::Status => {
                let lf = buf.windows(2).position(|w| w == b"\n\n").map(|pos| pos + 2);
                let crlf = buf
                    .windows(3)
                    .position(|w| w == b"\n\r\n")
                    .map(|pos| pos + 3);
                lf.into_iter().chain(crlf).min()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Nothing received yet.
    AwaitingReadability,
    /// At least one byte received.
    Draining,
}

/// Persistent, line-oriented TCP transport.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    config: TcpConfig,
    /// Bytes received past the end of the previous reply.
    pending: Vec<u8>,
    /// Framing of a reply that timed out and may still arrive.
    owed: Option<Framing>,
}

impl TcpTransport {
    /// Connect to the server described by `config`.
    #[tracing::instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: TcpConfig) -> Result<Self, Error> {
        let stream = timeout(
            config.poll_timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_elapsed| TransportError::Timeout {
            after: config.poll_timeout,
            partial: String::new(),
        })?
        .map_err(TransportError::from)?;

        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: TcpStream, config: TcpConfig) -> Result<Self, Error> {
        stream.set_nodelay(true).map_err(TransportError::from)?;
        if let Some(keepalive) = config.keepalive {
            SockRef::from(&stream)
                .set_tcp_keepalive(&TcpKeepalive::new().with_time(keepalive))
                .map_err(TransportError::from)?;
        }
        tracing::debug!(peer = ?stream.peer_addr().ok(), "Connected");

        Ok(Self {
            stream,
            config,
            pending: Vec::new(),
            owed: None,
        })
    }

    /// Tell the server we're done and shut the socket down.
    ///
    /// No reply is expected. Bounded by `total_timeout`.
    pub async fn close(mut self) -> Result<(), Error> {
        let deadline = Instant::now() + self.config.total_timeout;
        self.send(b"close\n", deadline).await?;
        timeout_at(deadline, self.stream.shutdown())
            .await
            .map_err(|_elapsed| TransportError::Timeout {
                after: self.config.total_timeout,
                partial: String::new(),
            })?
            .map_err(TransportError::from)?;
        Ok(())
    }

    async fn send(&mut self, message: &[u8], deadline: Instant) -> Result<(), TransportError> {
        timeout_at(deadline, self.stream.write_all(message))
            .await
            .map_err(|_elapsed| TransportError::Timeout {
                after: self.config.total_timeout,
                partial: String::new(),
            })?
            .map_err(TransportError::from)
    }

    /// Wait for the reply to a request that previously timed out, and drop it.
    ///
    /// If it doesn't show up within `total_timeout` it's assumed lost.
    async fn catch_up(&mut self, framing: Framing) -> Result<(), TransportError> {
        match self.read_reply(framing, Instant::now()).await {
            Ok(late) => {
                tracing::warn!(
                    late = %String::from_utf8_lossy(&late),
                    "Discarding late reply to a timed out request"
                );
                Ok(())
            }
            Err(TransportError::Timeout { partial, .. }) => {
                tracing::warn!(%partial, "Reply to a timed out request never arrived");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Drop anything already sitting in the socket so it isn't taken for the next reply.
    fn discard_stale(&mut self) -> Result<(), TransportError> {
        let mut stale = std::mem::take(&mut self.pending);
        let mut chunk = [0_u8; 1024];

        loop {
            match self.stream.try_read(&mut chunk) {
                Ok(0) => {
                    return Err(TransportError::Closed {
                        partial: String::from_utf8_lossy(&stale).into_owned(),
                    });
                }
                Ok(len) => stale.extend_from_slice(&chunk[..len]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err.into()),
            }
        }

        if !stale.is_empty() {
            tracing::warn!(
                stale = %String::from_utf8_lossy(&stale),
                "Discarding unsolicited data received before request"
            );
        }
        Ok(())
    }

    async fn read_reply(
        &mut self,
        framing: Framing,
        started: Instant,
    ) -> Result<Vec<u8>, TransportError> {
        let deadline = started + self.config.total_timeout;
        let mut buf = Vec::new();
        let mut state = ReadState::AwaitingReadability;
        let mut chunk = [0_u8; 1024];

        loop {
            if let Some(len) = framing.complete_len(&buf) {
                self.pending = buf.split_off(len);
                return Ok(buf);
            }

            let wait = match (framing, state) {
                (Framing::Status, ReadState::Draining) => self.config.status_idle_timeout,
                _ => self.config.poll_timeout,
            };
            let wait_until = deadline.min(Instant::now() + wait);

            match timeout_at(wait_until, self.stream.readable()).await {
                Ok(ready) => ready?,
                Err(_elapsed) => {
                    if framing == Framing::Status
                        && state == ReadState::Draining
                        && wait_until < deadline
                    {
                        tracing::trace!(len = buf.len(), "Status reply went quiet, treating as complete");
                        return Ok(buf);
                    }
                    return Err(TransportError::Timeout {
                        after: started.elapsed(),
                        partial: String::from_utf8_lossy(&buf).into_owned(),
                    });
                }
            }

            match self.stream.try_read(&mut chunk) {
                Ok(0) => {
                    if framing == Framing::Status && state == ReadState::Draining {
                        return Ok(buf);
                    }
                    return Err(TransportError::Closed {
                        partial: String::from_utf8_lossy(&buf).into_owned(),
                    });
                }
                Ok(len) => {
                    buf.extend_from_slice(&chunk[..len]);
                    state = ReadState::Draining;
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exchange(&mut self, request: &Request) -> Result<Reply, Error> {
        let message = tcp_message(request)?;

        if let Some(framing) = self.owed.take() {
            self.catch_up(framing).await?;
        }
        self.discard_stale()?;

        let started = Instant::now();
        tracing::trace!(%message, "Sending message");
        self.send(message.as_bytes(), started + self.config.total_timeout)
            .await?;

        let framing = if request.command.is_status() {
            Framing::Status
        } else {
            Framing::Line
        };
        let reply = match self.read_reply(framing, started).await {
            Ok(reply) => reply,
            Err(err) => {
                if matches!(err, TransportError::Timeout { .. }) {
                    self.owed = Some(framing);
                }
                return Err(err.into());
            }
        };

        if framing == Framing::Status {
            return Ok(if reply.trim_ascii().is_empty() {
                Reply::Empty
            } else {
                Reply::Status(reply.into())
            });
        }

        let line = String::from_utf8_lossy(&reply).trim_end().to_owned();

        if line.starts_with("ERROR") {
            return Err(TransportError::Rejected { reply: line }.into());
        }

        Ok(if line.is_empty() {
            Reply::Empty
        } else {
            Reply::Line(line)
        })
    }
}
