//! Background POST of the export payload to the persistence server.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use tagline_core::reply_success;

#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}")]
    Status { status: u16 },
}

/// What the server said about an accepted export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitReport {
    pub status: u16,
    /// The reply's `success` field, when it had a boolean one
    pub success: Option<bool>,
}

pub type TransmitResult = Result<TransmitReport, TransmitError>;

/// Fires export requests on the runtime and collects their results.
///
/// Requests are independent: a second export while one is in flight sends
/// a second request.
pub struct Transmitter {
    client: Client,
    url: String,
    handle: Handle,
    tx: UnboundedSender<TransmitResult>,
    rx: UnboundedReceiver<TransmitResult>,
}

impl Transmitter {
    pub fn new(url: impl Into<String>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: Client::new(),
            url: url.into(),
            handle,
            tx,
            rx,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start sending `payload` without waiting for the answer
    pub fn send(&self, payload: String) {
        let client = self.client.clone();
        let url = self.url.clone();
        let tx = self.tx.clone();
        debug!(%url, bytes = payload.len(), "sending export");
        self.handle.spawn(async move {
            let result = post_export(&client, &url, payload).await;
            match &result {
                Ok(report) => info!(status = report.status, success = ?report.success, "export stored"),
                Err(err) => warn!(error = %err, "export transmission failed"),
            }
            // The receiver only goes away on shutdown
            let _ = tx.send(result);
        });
    }

    /// Next finished transmission, if any
    pub fn poll(&mut self) -> Option<TransmitResult> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished transmission
    #[cfg(test)]
    pub(crate) async fn next_result(&mut self) -> Option<TransmitResult> {
        self.rx.recv().await
    }
}

/// POST `payload` as JSON to `url`
pub async fn post_export(client: &Client, url: &str, payload: String) -> TransmitResult {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TransmitError::Status {
            status: status.as_u16(),
        });
    }

    Ok(TransmitReport {
        status: status.as_u16(),
        success: reply_success(&body),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one HTTP request, headers and body
    pub(crate) async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8(buf).unwrap()
    }

    pub(crate) async fn respond(stream: &mut TcpStream, status: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    }

    /// Accept one connection, return its request, answer with `status` and `body`
    pub(crate) async fn serve_once(listener: TcpListener, status: &str, body: &str) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        respond(&mut stream, status, body).await;
        request
    }

    pub(crate) fn body_of(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
    }

    #[tokio::test]
    async fn test_post_reads_success_flag() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exportData/json", listener.local_addr().unwrap());
        let server = tokio::spawn(serve_once(listener, "200 OK", r#"{"success":true}"#));

        let report = post_export(&Client::new(), &url, r#"{"pages":[]}"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            report,
            TransmitReport {
                status: 200,
                success: Some(true)
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /exportData/json"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"pages":[]}"#));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exportData/json", listener.local_addr().unwrap());
        let server = tokio::spawn(serve_once(listener, "500 Internal Server Error", "oops"));

        let err = post_export(&Client::new(), &url, "{}".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, TransmitError::Status { status: 500 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = post_export(&Client::new(), &format!("http://{}/x", addr), "{}".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, TransmitError::Http(_)));
    }

    #[tokio::test]
    async fn test_second_send_while_first_in_flight() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exportData/json", listener.local_addr().unwrap());

        // Hold the first answer back until the second request has arrived
        let server = tokio::spawn(async move {
            let (mut first, _) = listener.accept().await.unwrap();
            let first_request = read_request(&mut first).await;
            let (mut second, _) = listener.accept().await.unwrap();
            let second_request = read_request(&mut second).await;
            respond(&mut first, "200 OK", r#"{"success":true}"#).await;
            respond(&mut second, "200 OK", r#"{"success":false}"#).await;
            let mut bodies = vec![
                body_of(&first_request).to_string(),
                body_of(&second_request).to_string(),
            ];
            bodies.sort();
            bodies
        });

        let mut transmitter = Transmitter::new(url, Handle::current());
        transmitter.send(r#"{"n":1}"#.to_string());
        transmitter.send(r#"{"n":2}"#.to_string());

        assert_eq!(server.await.unwrap(), vec![r#"{"n":1}"#, r#"{"n":2}"#]);

        let mut flags = vec![
            transmitter.next_result().await.unwrap().unwrap().success,
            transmitter.next_result().await.unwrap().unwrap().success,
        ];
        flags.sort();
        assert_eq!(flags, vec![Some(false), Some(true)]);
        assert!(transmitter.poll().is_none());
    }
}
