//! Test utilities: a scripted in-memory game service and a tiny canned-response HTTP server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tilerecall::backend::{BackendError, GameBackend};
use tilerecall::game::LeaderboardEntry;

/// In-memory service. Queued sequences are handed out in order; an exhausted queue or
/// `fail_*` flag turns the call into a transport error.
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedBackend {
    pub sequences: Mutex<VecDeque<Vec<usize>>>,
    pub points: u32,
    pub fail_points: bool,
    pub fail_submit: bool,
    pub fail_leaderboard: bool,
    pub board: Vec<LeaderboardEntry>,
    pub submissions: Mutex<Vec<(String, u32, u32)>>,
    pub sequence_requests: Mutex<Vec<(u32, usize)>>,
}

#[allow(dead_code)]
impl ScriptedBackend {
    pub fn with_sequences(sequences: Vec<Vec<usize>>, points: u32) -> Self {
        Self {
            sequences: Mutex::new(sequences.into()),
            points,
            ..Default::default()
        }
    }

    pub fn submissions(&self) -> Vec<(String, u32, u32)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn sequence_requests(&self) -> Vec<(u32, usize)> {
        self.sequence_requests.lock().unwrap().clone()
    }
}

fn down() -> BackendError {
    BackendError::Transport("connection refused".to_string())
}

impl GameBackend for ScriptedBackend {
    async fn tile_sequence(&self, level: u32, tile_count: usize) -> Result<Vec<usize>, BackendError> {
        self.sequence_requests.lock().unwrap().push((level, tile_count));
        self.sequences.lock().unwrap().pop_front().ok_or_else(down)
    }

    async fn points_for_level(&self, _tile_count: usize, completed: bool) -> Result<u32, BackendError> {
        if self.fail_points {
            return Err(down());
        }
        Ok(if completed { self.points } else { 0 })
    }

    async fn submit_score(&self, name: &str, score: u32, level: u32) -> Result<bool, BackendError> {
        if self.fail_submit {
            return Err(down());
        }
        self.submissions
            .lock()
            .unwrap()
            .push((name.to_string(), score, level));
        Ok(true)
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        if self.fail_leaderboard {
            return Err(down());
        }
        Ok(self.board.clone())
    }
}

#[allow(dead_code)]
pub fn entries(n: usize) -> Vec<LeaderboardEntry> {
    (0..n)
        .map(|i| LeaderboardEntry {
            name: format!("player{i}"),
            score: 1000 - i as u32,
        })
        .collect()
}

/// A canned response for requests whose target contains `path`.
#[allow(dead_code)]
#[derive(Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

/// Serve canned responses on 127.0.0.1 until the test ends. Returns the base URL and a log
/// of `(request line, body)` pairs.
#[allow(dead_code)]
pub async fn stub_server(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<(String, String)>>>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                let header_end = loop {
                    let n = match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                };
                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let content_length = head
                    .lines()
                    .filter_map(|l| l.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while buf.len() < header_end + content_length {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
                seen.lock().unwrap().push((request_line.clone(), body));

                let target = request_line.split_whitespace().nth(1).unwrap_or_default();
                let (status, body) = routes
                    .iter()
                    .find(|r| target.contains(r.path))
                    .map(|r| (r.status, r.body.clone()))
                    .unwrap_or((404, "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{}/MemoryGame", addr), log)
}
