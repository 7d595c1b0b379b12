use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracedeck_core::config::Config;
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::model::span::SpanRecord;
use tracedeck_core::model::tool::ToolSchema;
use tracedeck_core::model::turn::{ConversationSummary, ConversationTraces, Neighbors};
use tracedeck_core::source::TraceSource;
use tracedeck_core::{Result, TraceDeckError};

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl From<&Config> for HttpSourceConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            base_url: cfg.source_url.clone(),
            api_prefix: cfg.api_prefix.clone(),
            headers: cfg.source_headers.clone(),
            timeout: cfg.request_timeout,
        }
    }
}

/// Reads traces from the dashboard backend's JSON API.
#[derive(Debug, Clone)]
pub struct HttpTraceSource {
    client: Client,
    endpoint: String,
}

// The listing endpoint has shipped both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConversationList {
    Wrapped { conversations: Vec<ConversationSummary> },
    Bare(Vec<ConversationSummary>),
}

impl HttpTraceSource {
    pub fn new(cfg: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .default_headers(build_http_headers(&cfg.headers))
            .build()
            .map_err(|e| TraceDeckError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: join_endpoint(&cfg.base_url, &cfg.api_prefix),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{path}", self.endpoint);
        tracing::debug!(%url, "trace source request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TraceDeckError::fetch(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TraceDeckError::fetch_status(
                status.as_u16(),
                format!("GET {url}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TraceDeckError::fetch(format!("GET {url}: undecodable body: {e}")))
    }
}

impl TraceSource for HttpTraceSource {
    async fn conversations(&self) -> Result<Vec<ConversationSummary>> {
        let list: ConversationList = self.get_json("conversations").await?;
        Ok(match list {
            ConversationList::Wrapped { conversations } => conversations,
            ConversationList::Bare(conversations) => conversations,
        })
    }

    async fn conversation_traces(&self, id: &ConversationId) -> Result<ConversationTraces> {
        self.get_json(&format!("conversations/{id}/traces")).await
    }

    async fn conversation_neighbors(&self, id: &ConversationId) -> Result<Neighbors> {
        self.get_json(&format!("conversations/{id}/neighbors")).await
    }

    async fn trace_spans(&self, id: &TraceId) -> Result<Vec<SpanRecord>> {
        self.get_json(&format!("traces/{id}/spans")).await
    }

    async fn trace_neighbors(&self, id: &TraceId) -> Result<Neighbors> {
        self.get_json(&format!("traces/{id}/neighbors")).await
    }

    async fn tools(&self) -> Result<Vec<ToolSchema>> {
        self.get_json("tools").await
    }
}

fn join_endpoint(base_url: &str, api_prefix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{prefix}")
    }
}

fn build_http_headers(headers: &[(String, String)]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (k, v) in headers {
        let name = HeaderName::try_from(k.as_str());
        let value = HeaderValue::try_from(v.as_str());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                out.insert(name, value);
            }
            _ => {
                tracing::warn!(header = %k, "ignored invalid trace source header");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_prefix() {
        assert_eq!(
            join_endpoint("http://127.0.0.1:8099/", "/api/frontend/"),
            "http://127.0.0.1:8099/api/frontend"
        );
        assert_eq!(join_endpoint("http://h", ""), "http://h");
    }

    #[test]
    fn invalid_headers_are_skipped() {
        let headers = build_http_headers(&[
            ("x-tenant".to_string(), "dev".to_string()),
            ("bad header".to_string(), "x".to_string()),
        ]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-tenant").unwrap(), "dev");
    }

    #[test]
    fn listing_accepts_both_shapes() {
        let wrapped: ConversationList =
            serde_json::from_str(r#"{"conversations":[{"group_id":"g1"}]}"#).unwrap();
        assert!(matches!(wrapped, ConversationList::Wrapped { conversations } if conversations.len() == 1));

        let bare: ConversationList = serde_json::from_str(r#"[{"id":"g1"},{"id":"g2"}]"#).unwrap();
        assert!(matches!(bare, ConversationList::Bare(conversations) if conversations.len() == 2));
    }
}
