//! Minimal HTTP/1.1 listener exposing the news routes as JSON.

pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::{NewsError, Result};
use crate::news::NewsService;

pub use routes::{NewsResponse, NewsType};

const MAX_HEADER_LINES: usize = 100;
const MAX_HEAD_BYTES: u64 = 8 * 1024;
const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NewsServer {
    listener: TcpListener,
    service: Arc<NewsService>,
    head_timeout: Duration,
}

impl NewsServer {
    pub async fn bind(addr: &str, service: Arc<NewsService>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            service,
            head_timeout: HEAD_TIMEOUT,
        })
    }

    /// How long a client may take to send its request head.
    pub fn with_head_timeout(mut self, head_timeout: Duration) -> Self {
        self.head_timeout = head_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process exits.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. Connections already accepted finish
    /// on their own tasks.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, "news server listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("news server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    let service = Arc::clone(&self.service);
                    let head_timeout = self.head_timeout;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &service, head_timeout).await {
                            debug!(%peer, error = %e, "connection closed with error");
                        }
                    });
                }
            }
        }
    }
}

/// Read the request line of an HTTP head, consuming at most
/// `MAX_HEAD_BYTES`. Headers are read and ignored; every route is a
/// bodiless GET.
async fn read_request_line<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<String> {
    let mut reader = BufReader::new(reader.take(MAX_HEAD_BYTES));

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(request_line);
    }

    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }
    Ok(request_line)
}

async fn handle_connection(
    stream: TcpStream,
    service: &NewsService,
    head_timeout: Duration,
) -> Result<()> {
    let (mut reader, mut writer) = stream.into_split();

    let request_line =
        match tokio::time::timeout(head_timeout, read_request_line(&mut reader)).await {
            Ok(line) => line?,
            Err(_) => return Err(NewsError::Timeout(head_timeout)),
        };
    if request_line.is_empty() {
        return Ok(());
    }

    let mut parts = request_line.split_whitespace();
    let (status, body) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => {
            debug!(method, target, "request");
            routes::dispatch(service, method, target).await
        }
        _ => (
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"error":"malformed request line","articles":[],"count":0}"#
                .to_string(),
        ),
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        body.len(),
        body
    );
    writer.write_all(response.as_bytes()).await?;
    writer.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_line_skips_headers() {
        let raw: &[u8] = b"GET /news?type=hot HTTP/1.1\r\nHost: x\r\n\r\n";
        let line = read_request_line(raw).await.unwrap();
        assert_eq!(line, "GET /news?type=hot HTTP/1.1\r\n");
    }

    #[tokio::test]
    async fn request_line_is_capped() {
        let raw = vec![b'A'; 64 * 1024];
        let line = read_request_line(&raw[..]).await.unwrap();
        assert_eq!(line.len() as u64, MAX_HEAD_BYTES);
    }
}
