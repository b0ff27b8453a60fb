//! Test doubles: a one-shot HTTP stub server and scripted seams.

use crate::error::{FetchError, InsightError};
use crate::insight::LanguageModel;
use crate::models::OrderRecord;
use crate::store::OrderSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line, e.g. `GET /path?x=1 HTTP/1.1`.
    pub request_line: String,
    /// Header lines with names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Serves exactly one canned response and records the request.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl StubServer {
    pub async fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    /// Wait for the served request.
    pub async fn request(self) -> CapturedRequest {
        self.handle.await.unwrap()
    }
}

/// A local URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Language model returning a fixed reply, or failing when none is set.
pub struct ScriptedModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, InsightError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(InsightError::NoChoices)
    }
}

/// Order source returning a fixed batch or a fixed failure.
pub struct StaticSource {
    result: Mutex<Option<Result<Vec<OrderRecord>, FetchError>>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn with_orders(orders: Vec<OrderRecord>) -> Self {
        Self {
            result: Mutex::new(Some(Ok(orders))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            result: Mutex::new(Some(Err(err))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSource for StaticSource {
    fn store_url(&self) -> &str {
        "https://shop.test"
    }

    async fn fetch_orders(&self, _since: DateTime<Utc>) -> Result<Vec<OrderRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
