//! HTTP client for Kinesis Data Streams (JSON 1.1 protocol).
//!
//! Each operation is a signed `POST /` whose `X-Amz-Target` header names the
//! operation. Record payloads travel base64-encoded in the `Data` field.

use super::credentials::Credentials;
use super::signer::Signer;
use super::{PutRecordAck, StreamClient, StreamStatus};
use crate::error::{StartupError, StreamError};
use crate::region::Region;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{debug, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "kinesis";
const TARGET_PREFIX: &str = "Kinesis_20131202";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

const THROTTLING_ERRORS: &[&str] = &[
    "ProvisionedThroughputExceededException",
    "LimitExceededException",
    "ThrottlingException",
];

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStreamRequest<'a> {
    stream_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStreamResponse {
    stream_description: StreamDescription,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StreamDescription {
    stream_status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutRecordRequest<'a> {
    stream_name: &'a str,
    partition_key: &'a str,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutRecordResponse {
    shard_id: String,
    sequence_number: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

/// Signed HTTP client for one region (or one emulator endpoint).
pub struct KinesisClient {
    http: reqwest::Client,
    url: Url,
    host: String,
    signer: Signer,
    max_attempts: u32,
}

impl KinesisClient {
    /// Creates a client for `region`, optionally pointed at a custom endpoint.
    ///
    /// # Errors
    ///
    /// * `StartupError::Client` if the endpoint is not a valid URL or the
    ///   HTTP client cannot be built.
    pub fn new(
        region: &Region,
        credentials: Credentials,
        endpoint: Option<&str>,
    ) -> Result<Self, StartupError> {
        let endpoint = endpoint
            .map(str::to_string)
            .unwrap_or_else(|| region.kinesis_endpoint());
        let url = Url::parse(&endpoint)
            .map_err(|e| StartupError::Client(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(StartupError::Client(format!(
                    "endpoint '{}' has no host",
                    endpoint
                )))
            }
        };
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StartupError::Client(e.to_string()))?;

        Ok(Self {
            http,
            url,
            host,
            signer: Signer::new(credentials, region.as_str(), SERVICE),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Sets how many times a retryable request is attempted (at least once).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn get_endpoint(&self) -> &Url {
        &self.url
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, StreamError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(request)?;
        let mut attempt = 1;
        loop {
            match self.call_once(operation, &body).await {
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                    warn!(
                        "{} attempt {} failed ({}), retrying in {:?}",
                        operation, attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
                Ok(bytes) => return Ok(serde_json::from_slice(&bytes)?),
            }
        }
    }

    async fn call_once(&self, operation: &str, body: &[u8]) -> Result<Vec<u8>, StreamError> {
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let headers = [
            ("content-type", CONTENT_TYPE),
            ("host", self.host.as_str()),
            ("x-amz-target", target.as_str()),
        ];
        let auth = self
            .signer
            .sign("POST", self.url.path(), &headers, body, chrono::Utc::now())?;

        let mut request = self
            .http
            .post(self.url.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target);
        for (name, value) in auth {
            request = request.header(name, value);
        }

        debug!("{} -> {}", target, self.url);
        let response = request.body(body.to_vec()).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(service_error(status.as_u16(), &bytes))
        }
    }
}

#[async_trait]
impl StreamClient for KinesisClient {
    async fn describe_stream_status(&self, stream_name: &str) -> Result<StreamStatus, StreamError> {
        let response: DescribeStreamResponse = self
            .call("DescribeStream", &DescribeStreamRequest { stream_name })
            .await?;
        Ok(StreamStatus::from(
            response.stream_description.stream_status.as_str(),
        ))
    }

    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<PutRecordAck, StreamError> {
        let request = PutRecordRequest {
            stream_name,
            partition_key,
            data: BASE64.encode(data),
        };
        let response: PutRecordResponse = self.call("PutRecord", &request).await?;
        Ok(PutRecordAck {
            shard_id: response.shard_id,
            sequence_number: response.sequence_number,
        })
    }
}

fn service_error(status: u16, body: &[u8]) -> StreamError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    // `__type` may carry a namespace prefix: "com.amazon...#ResourceNotFoundException"
    let kind = parsed
        .kind
        .rsplit('#')
        .next()
        .unwrap_or_default()
        .to_string();
    let message = if parsed.message.is_empty() {
        String::from_utf8_lossy(body).into_owned()
    } else {
        parsed.message
    };
    StreamError::Service {
        status,
        kind,
        message,
    }
}

fn is_retryable(error: &StreamError) -> bool {
    match error {
        StreamError::Transport(_) => true,
        StreamError::Service { status, kind, .. } => {
            *status >= 500 || THROTTLING_ERRORS.contains(&kind.as_str())
        }
        StreamError::Decode(_) | StreamError::Signing(_) => false,
    }
}
