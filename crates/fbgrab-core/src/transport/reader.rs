//! Framebuffer capture over TCP.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpSocket, TcpStream};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::params::ConnectionParams;
use crate::{Error, Result, FRAME_BYTES};

/// How the read loop ended.
#[derive(Debug)]
pub enum StreamEnd {
    /// Peer closed the connection.
    Closed,
    /// A read failed.
    Fault(io::Error),
    /// No bytes arrived within the idle timeout.
    IdleTimeout(Duration),
}

impl StreamEnd {
    /// Returns true if the peer closed the connection normally.
    pub fn is_clean(&self) -> bool {
        matches!(self, StreamEnd::Closed)
    }
}

impl std::fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamEnd::Closed => write!(f, "connection closed by peer"),
            StreamEnd::Fault(e) => write!(f, "read error: {}", e),
            StreamEnd::IdleTimeout(t) => write!(f, "no data for {:?}", t),
        }
    }
}

/// Bytes received from one capture and how the transfer ended.
#[derive(Debug)]
pub struct Capture {
    /// Received bytes, in arrival order.
    pub data: Vec<u8>,
    /// Read loop termination.
    pub end: StreamEnd,
}

impl Capture {
    /// Returns the captured bytes if they can be decoded.
    ///
    /// A clean close always hands the data over; length is checked by the
    /// decoder. A fault or idle timeout is tolerated only once at least
    /// `expected` bytes have arrived.
    pub fn into_frame(self, expected: usize) -> Result<Vec<u8>> {
        let received = self.data.len();
        match self.end {
            StreamEnd::Closed => Ok(self.data),
            end if received >= expected => {
                warn!(
                    "Transfer ended abnormally ({}) after a full frame, continuing",
                    end
                );
                Ok(self.data)
            }
            end => Err(Error::TransferFault {
                received,
                expected,
                reason: end.to_string(),
            }),
        }
    }
}

/// Requests a framebuffer dump and reads it until the stream ends.
///
/// Opens exactly one socket, to the first resolved address, and closes it
/// before returning on every path. Connect and request failures are errors;
/// anything that ends the read loop is reported in [`Capture::end`]. The
/// device normally ends with a connection reset, since it never reads the
/// request token.
pub async fn capture(params: &ConnectionParams) -> Result<Capture> {
    params.validate()?;

    let mut stream = connect(params).await?;
    send_request(&mut stream, params).await?;

    let capture = drain(
        &mut stream,
        params.chunk_size,
        params.idle_timeout,
        FRAME_BYTES,
    )
    .await;

    info!(
        "Capture finished: {} bytes from {} ({})",
        capture.data.len(),
        params.addr(),
        capture.end
    );
    Ok(capture)
}

/// Reads `reader` in `chunk_size` pieces until it ends, fails or goes idle.
///
/// `capacity` pre-sizes the buffer. Bytes read before a failure are kept.
pub async fn drain<R>(
    reader: &mut R,
    chunk_size: usize,
    idle_timeout: Option<Duration>,
    capacity: usize,
) -> Capture
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::with_capacity(capacity);
    // A zero-length buffer would read as end-of-stream
    let mut chunk = vec![0u8; chunk_size.max(1)];

    let end = loop {
        let read = match idle_timeout {
            Some(limit) => match timeout(limit, reader.read(&mut chunk)).await {
                Ok(read) => read,
                Err(_) => break StreamEnd::IdleTimeout(limit),
            },
            None => reader.read(&mut chunk).await,
        };

        match read {
            Ok(0) => break StreamEnd::Closed,
            Ok(n) => {
                data.extend_from_slice(&chunk[..n]);
                debug!("Read {} bytes ({} total)", n, data.len());
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break StreamEnd::Fault(e),
        }
    };

    Capture { data, end }
}

/// Connects to the first address `host` resolves to.
///
/// Only one socket is created per call; other resolved addresses are not
/// tried.
async fn connect(params: &ConnectionParams) -> Result<TcpStream> {
    let target = resolve(params).await?;
    debug!("Connecting to {}", target);

    let socket = socket_for(target, params)?;
    match timeout(params.connect_timeout, socket.connect(target)).await {
        Ok(Ok(stream)) => {
            info!("Connected to {}", target);
            Ok(stream)
        }
        Ok(Err(source)) => Err(Error::ConnectionFailure {
            addr: target.to_string(),
            source,
        }),
        Err(_) => Err(Error::ConnectTimeout {
            addr: target.to_string(),
            timeout: params.connect_timeout,
        }),
    }
}

/// Resolves the device endpoint to a single socket address.
async fn resolve(params: &ConnectionParams) -> Result<SocketAddr> {
    let addr = params.addr();
    let lookup = lookup_host((params.host.as_str(), params.port));

    let mut targets = match timeout(params.connect_timeout, lookup).await {
        Ok(Ok(targets)) => targets,
        Ok(Err(source)) => return Err(Error::ConnectionFailure { addr, source }),
        Err(_) => {
            return Err(Error::ConnectTimeout {
                addr,
                timeout: params.connect_timeout,
            })
        }
    };

    targets.next().ok_or_else(|| Error::ConnectionFailure {
        addr,
        source: io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses"),
    })
}

/// Creates an unconnected socket for `target` with `SO_REUSEADDR` applied.
fn socket_for(target: SocketAddr, params: &ConnectionParams) -> Result<TcpSocket> {
    let failure = |source: io::Error| Error::ConnectionFailure {
        addr: target.to_string(),
        source,
    };

    let socket = if target.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(failure)?;

    socket.set_reuseaddr(params.reuse_address).map_err(failure)?;
    Ok(socket)
}

async fn send_request(stream: &mut TcpStream, params: &ConnectionParams) -> Result<()> {
    let write = stream.write_all(&params.token);
    let sent = match params.idle_timeout {
        Some(limit) => timeout(limit, write).await.unwrap_or_else(|_| {
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("request not sent within {:?}", limit),
            ))
        }),
        None => write.await,
    };
    sent.map_err(Error::Request)?;

    debug!("Sent request token ({} bytes)", params.token.len());
    Ok(())
}
