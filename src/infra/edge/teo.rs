//! Tencent EdgeOne adapter: translates purge requests into signed
//! `CreatePurgeTask` calls.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::EdgeSettingsRepo;
use crate::config::EdgeClientSettings;
use crate::domain::error::PurgeError;
use crate::domain::purge::{PurgeKind, PurgeMethod, PurgeReceipt, PurgeRequest};
use crate::domain::settings::EdgeSettingsRecord;

use super::EdgePurgeClient;
use super::sign::{self, SigningInput};

const ACTION: &str = "CreatePurgeTask";
const VERSION: &str = "2022-09-01";
const SERVICE: &str = "teo";

/// Wire form of a `CreatePurgeTask` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreatePurgeTask<'a> {
    zone_id: &'a str,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encode_url: Option<bool>,
}

/// Response envelope; every field is optional so an unexpected shape never
/// turns an accepted purge into a client-side failure.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "Response", default)]
    response: Option<ResponseBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseBody {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    error: Option<ApiFault>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiFault {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Concrete adapter against the remote purge endpoint.
///
/// Credentials are read from the settings repository on every call, so an
/// operator can fix them between purges without a restart.
pub struct TeoEdgeClient {
    http: reqwest::Client,
    endpoint: Url,
    host: String,
    settings: Arc<dyn EdgeSettingsRepo>,
    encode_urls: bool,
}

impl TeoEdgeClient {
    /// Build an adapter from static configuration. Fails when the endpoint
    /// is disabled or malformed, or when the HTTP client cannot be built;
    /// callers are expected to degrade to [`super::UnavailableClient`].
    pub fn new(
        config: &EdgeClientSettings,
        settings: Arc<dyn EdgeSettingsRepo>,
    ) -> Result<Self, PurgeError> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            PurgeError::unavailable(
                "no edge endpoint configured; set `edge.endpoint` to enable purging",
            )
        })?;
        let endpoint = Url::parse(endpoint)
            .map_err(|err| PurgeError::unavailable(format!("invalid edge endpoint: {err}")))?;
        let host = endpoint
            .host_str()
            .ok_or_else(|| PurgeError::unavailable("edge endpoint has no host"))?
            .to_string();
        let http = reqwest::Client::builder()
            .user_agent(concat!("spurgo/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|err| PurgeError::unavailable(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            endpoint,
            host,
            settings,
            encode_urls: config.encode_urls,
        })
    }

    /// Load settings and refuse to touch the network while credentials are
    /// incomplete.
    async fn ready(&self) -> Result<EdgeSettingsRecord, PurgeError> {
        let record = self.settings.load().await.map_err(|err| {
            PurgeError::unavailable(format!("failed to load edge settings: {err}"))
        })?;
        if let Some(field) = record.first_missing_field() {
            return Err(PurgeError::config_incomplete(field));
        }
        Ok(record)
    }

    async fn submit(&self, request: &PurgeRequest) -> Result<PurgeReceipt, PurgeError> {
        let record = self.ready().await?;
        let task = CreatePurgeTask {
            zone_id: &record.zone_id,
            kind: wire_type(request.kind),
            targets: (!request.targets.is_empty()).then_some(request.targets.as_slice()),
            method: request.method.map(PurgeMethod::as_str),
            // The remote API wants URL targets percent-encoded by default.
            encode_url: (request.kind == PurgeKind::Url).then_some(self.encode_urls),
        };
        let body = serde_json::to_string(&task)
            .map_err(|err| PurgeError::api(format!("failed to encode request: {err}")))?;

        let timestamp = OffsetDateTime::now_utc().unix_timestamp();
        let authorization = sign::authorization(&SigningInput {
            secret_id: &record.secret_id,
            secret_key: &record.secret_key,
            host: &self.host,
            service: SERVICE,
            action: ACTION,
            timestamp,
            payload: &body,
        });

        debug!(
            target = "spurgo::edge",
            kind = request.kind.as_str(),
            targets = request.targets.len(),
            "submitting purge task"
        );

        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, sign::CONTENT_TYPE)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", VERSION)
            .header("X-TC-Timestamp", timestamp.to_string())
            .body(body)
            .send()
            .await
            .map_err(|err| PurgeError::api(format!("request failed: {err}")))?;
        histogram!("spurgo_edge_request_ms").record(started.elapsed().as_secs_f64() * 1000.0);

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| PurgeError::api(format!("failed to read response: {err}")))?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(PurgeError::api(format!("status {status}: {text}")));
        }

        // The purge may have been accepted even when the response shape is
        // unexpected; fall back to empty identifiers instead of failing.
        let envelope: Envelope = serde_json::from_slice(&bytes).unwrap_or_default();
        let body = envelope.response.unwrap_or_default();
        if let Some(fault) = body.error {
            let code = fault.code.unwrap_or_else(|| "UnknownError".to_string());
            let message = fault.message.unwrap_or_default();
            return Err(PurgeError::api(format!("{code}: {message}")));
        }

        Ok(PurgeReceipt {
            request_id: body.request_id.unwrap_or_default(),
            task_id: body.job_id.or(body.task_id).unwrap_or_default(),
        })
    }
}

fn wire_type(kind: PurgeKind) -> &'static str {
    match kind {
        PurgeKind::Url => "purge_url",
        PurgeKind::Host => "purge_host",
        PurgeKind::All => "purge_all",
    }
}

#[async_trait]
impl EdgePurgeClient for TeoEdgeClient {
    async fn purge_urls(&self, urls: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
        let request = PurgeRequest::urls(urls)?;
        self.submit(&request).await
    }

    async fn purge_hosts(&self, hosts: Vec<String>) -> Result<PurgeReceipt, PurgeError> {
        let request = PurgeRequest::hosts(hosts)?;
        self.submit(&request).await
    }

    async fn purge_all(&self) -> Result<PurgeReceipt, PurgeError> {
        self.submit(&PurgeRequest::all()).await
    }
}
