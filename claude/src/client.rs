use std::pin::Pin;
use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;

use crate::error::Error;
use crate::messages::{Reply, Request};
use crate::sse::{Failure, SseBuffer, StreamEvent};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Model used when neither the client nor the request names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, Error>> + Send>>;

/// Handle to the Messages API. Cheap to clone.
#[derive(Clone)]
pub struct Claude {
    http: reqwest::Client,
    key: String,
    model: String,
    base_url: String,
}

/// Wire body: the caller's request plus the fields the client owns.
#[derive(Serialize)]
struct Payload<'a> {
    model: &'a str,
    stream: bool,
    #[serde(flatten)]
    request: &'a Request,
}

impl Claude {
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| Error::Setup(e.to_string()))?;

        Ok(Self {
            http,
            key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE.to_string(),
        })
    }

    /// Build a client from `ANTHROPIC_API_KEY`. Blank values count as missing.
    pub fn from_env() -> Result<Self, Error> {
        let key = std::env::var(API_KEY_ENV).unwrap_or_default();
        match key.trim() {
            "" => Err(Error::MissingKey),
            key => Self::new(key),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send requests to another API root, e.g. a proxy or a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `request` and wait for the whole reply.
    pub async fn complete(&self, request: &Request) -> Result<Reply, Error> {
        let payload = self.payload(request, false);
        tracing::debug!(model = payload.model, max_tokens = request.max_tokens, "messages call");

        self.send(&payload)
            .await?
            .json::<Reply>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// Send `request` and yield events as the reply streams in.
    pub async fn stream(&self, request: &Request) -> Result<EventStream, Error> {
        let payload = self.payload(request, true);
        tracing::debug!(model = payload.model, "messages stream");

        let mut sse = SseBuffer::default();
        let events = self.send(&payload).await?.bytes_stream().flat_map(move |chunk| {
            let batch = match chunk {
                Ok(bytes) => sse.push(&bytes),
                Err(e) => vec![Err(Error::Transport(e.to_string()))],
            };
            futures::stream::iter(batch)
        });

        Ok(Box::pin(events))
    }

    fn payload<'a>(&'a self, request: &'a Request, stream: bool) -> Payload<'a> {
        Payload {
            model: request.model.as_deref().unwrap_or(&self.model),
            stream,
            request,
        }
    }

    async fn send(&self, payload: &Payload<'_>) -> Result<reqwest::Response, Error> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.key)
            .header("anthropic-version", API_VERSION)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "messages call rejected");
        Err(Error::Status {
            code: status.as_u16(),
            detail: error_detail(&body),
        })
    }
}

/// The `error.message` of an API error body, or the body itself.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Failure,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}
