//! Scriptable mock vendor server for integration tests
//!
//! Every request is recorded and answered with the reply registered for its
//! path, so one server can play any vendor: chat, streamed chat, embeddings,
//! model listing and the IAM token endpoint.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use futures_util::{StreamExt, stream};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Scripted answer for one path
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body with a status code
    Json { status: StatusCode, body: Value },
    /// Plain text body with a status code
    Text { status: StatusCode, body: String },
    /// Event stream written piece by piece
    Stream {
        pieces: Vec<String>,
        /// Pause before each piece
        delay: Duration,
        /// Keep the connection open after the last piece
        hold_open: bool,
    },
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Self::Json {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self::Json {
            status: StatusCode::from_u16(status).unwrap(),
            body,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::Text {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_owned(),
        }
    }

    /// Stream the raw pieces exactly as given
    pub fn sse<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream {
            pieces: pieces.into_iter().map(Into::into).collect(),
            delay: Duration::ZERO,
            hold_open: false,
        }
    }

    #[must_use]
    pub fn with_delay(self, millis: u64) -> Self {
        match self {
            Self::Stream { pieces, hold_open, .. } => Self::Stream {
                pieces,
                delay: Duration::from_millis(millis),
                hold_open,
            },
            other => other,
        }
    }

    #[must_use]
    pub fn hold_open(self) -> Self {
        match self {
            Self::Stream { pieces, delay, .. } => Self::Stream {
                pieces,
                delay,
                hold_open: true,
            },
            other => other,
        }
    }
}

/// Format one event line
pub fn data(payload: &Value) -> String {
    format!("data: {payload}\n\n")
}

/// Chunk carrying a content delta
pub fn content_chunk(text: &str) -> String {
    data(&serde_json::json!({"choices": [{"index": 0, "delta": {"content": text}}]}))
}

/// One received request
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Mock vendor listening on a random local port
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockVendor {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Register the reply for `path`
    pub fn on(&self, path: &str, reply: Reply) -> &Self {
        self.state.replies.lock().unwrap().insert(path.to_owned(), reply);
        self
    }

    /// Server root, e.g. `http://127.0.0.1:1234`
    pub fn root_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Root plus `/v1`, the shape `OpenAI`-style base URLs take
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Paths of every request received so far, in arrival order
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let reply = state.replies.lock().unwrap().get(uri.path()).cloned();

    match reply {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(Reply::Json { status, body }) => (status, axum::Json(body)).into_response(),
        Some(Reply::Text { status, body }) => (status, body).into_response(),
        Some(Reply::Stream {
            pieces,
            delay,
            hold_open,
        }) => {
            let written = stream::iter(pieces).then(move |piece| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok::<_, Infallible>(Bytes::from(piece))
            });

            let body = if hold_open {
                Body::from_stream(written.chain(stream::pending()))
            } else {
                Body::from_stream(written)
            };

            (StatusCode::OK, [(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
        }
    }
}
