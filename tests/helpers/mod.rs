//! Test helpers: a loopback HTTP responder and recording fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use gate_sniper::sniper::TransactionSubmitter;
use gate_sniper::{PurchaseReceipt, SubmissionError};
use solana_sdk::signature::Keypair;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the stub answers one route.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Complete JSON response with the given status
    Json(u16, String),
    /// Read the request, then close without answering
    Hangup,
    /// Promise a longer body than is sent, then close
    Truncated(String),
}

/// Minimal HTTP/1.1 server answering GETs from a fixed route table.
/// Unknown paths get a 404. Every requested path is recorded.
pub struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        Self::start_with(
            routes
                .into_iter()
                .map(|(path, status, body)| (path, Reply::Json(status, body.to_string())))
                .collect(),
        )
        .await
    }

    pub async fn start_with(routes: Vec<(&str, Reply)>) -> Self {
        let routes: Arc<HashMap<String, Reply>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub server");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = tokio::spawn({
            let hits = hits.clone();
            async move {
                loop {
                    let Ok((stream, _)) = listener.accept().await else {
                        break;
                    };
                    let routes = routes.clone();
                    let hits = hits.clone();
                    tokio::spawn(async move {
                        let _ = respond(stream, routes, hits).await;
                    });
                }
            }
        });

        Self {
            base_url,
            hits,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, prefix: &str) -> usize {
        self.hits().iter().filter(|p| p.starts_with(prefix)).count()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    mut stream: tokio::net::TcpStream,
    routes: Arc<HashMap<String, Reply>>,
    hits: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&request);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    let reply = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| Reply::Json(404, r#"{"error":"not found"}"#.to_string()));

    let (status, body, declared_len) = match reply {
        Reply::Hangup => return stream.shutdown().await,
        Reply::Json(status, body) => {
            let len = body.len();
            (status, body, len)
        }
        Reply::Truncated(body) => {
            let len = body.len() + 64;
            (200, body, len)
        }
    };
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status, reason, declared_len, body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Submitter fake that records every call and fails for selected destinations.
#[derive(Default)]
pub struct RecordingSubmitter {
    calls: Mutex<Vec<(String, u64)>>,
    failing: HashSet<String>,
}

impl RecordingSubmitter {
    pub fn failing_for(destinations: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: destinations.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<(String, u64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        _sender: &Keypair,
        destination: &str,
        lamports: u64,
    ) -> Result<PurchaseReceipt, SubmissionError> {
        self.calls
            .lock()
            .unwrap()
            .push((destination.to_string(), lamports));

        if self.failing.contains(destination) {
            return Err(SubmissionError::Ledger("blockhash not found".to_string()));
        }

        Ok(PurchaseReceipt {
            signature: format!("sig-{}", destination),
            lamports_spent: lamports,
            destination: destination.to_string(),
            submitted_at: chrono::Utc::now(),
        })
    }
}
