//! In-memory stream client for tests.
//!
//! Streams are declared with a status up front. Puts are recorded in call
//! order, and individual streams can be made to fail or to hang.

use super::{PutRecordAck, StreamClient, StreamStatus};
use crate::error::StreamError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One record accepted (or attempted) by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub stream_name: String,
    pub partition_key: String,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct Inner {
    streams: HashMap<String, StreamStatus>,
    failing_describes: HashSet<String>,
    failing_puts: HashSet<String>,
    stalled_puts: HashSet<String>,
    attempts: Vec<PublishedRecord>,
    records: Vec<PublishedRecord>,
    describe_calls: Vec<String>,
}

#[derive(Default)]
pub struct MemoryStreamClient {
    inner: Mutex<Inner>,
}

impl MemoryStreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a stream with the given status.
    pub fn with_stream(self, name: &str, status: StreamStatus) -> Self {
        self.lock().streams.insert(name.to_string(), status);
        self
    }

    /// Makes `DescribeStream` on `name` fail with a transport error.
    pub fn fail_describe(self, name: &str) -> Self {
        self.lock().failing_describes.insert(name.to_string());
        self
    }

    /// Makes every put on `name` fail with a transport error.
    pub fn fail_puts(self, name: &str) -> Self {
        self.lock().failing_puts.insert(name.to_string());
        self
    }

    /// Makes every put on `name` wait forever.
    pub fn stall_puts(self, name: &str) -> Self {
        self.lock().stalled_puts.insert(name.to_string());
        self
    }

    /// Records stored successfully, in call order.
    pub fn records(&self) -> Vec<PublishedRecord> {
        self.lock().records.clone()
    }

    /// Records stored successfully on one stream.
    pub fn records_for(&self, stream_name: &str) -> Vec<PublishedRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.stream_name == stream_name)
            .cloned()
            .collect()
    }

    /// Every put call, including failed and stalled ones.
    pub fn put_attempts(&self) -> Vec<PublishedRecord> {
        self.lock().attempts.clone()
    }

    pub fn describe_calls(&self) -> Vec<String> {
        self.lock().describe_calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock only happens inside a failing test.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StreamClient for MemoryStreamClient {
    async fn describe_stream_status(&self, stream_name: &str) -> Result<StreamStatus, StreamError> {
        let mut inner = self.lock();
        inner.describe_calls.push(stream_name.to_string());
        if inner.failing_describes.contains(stream_name) {
            return Err(StreamError::Transport(format!(
                "connection refused while describing {}",
                stream_name
            )));
        }
        inner
            .streams
            .get(stream_name)
            .cloned()
            .ok_or_else(|| StreamError::Service {
                status: 400,
                kind: "ResourceNotFoundException".to_string(),
                message: format!("Stream {} not found", stream_name),
            })
    }

    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<PutRecordAck, StreamError> {
        let record = PublishedRecord {
            stream_name: stream_name.to_string(),
            partition_key: partition_key.to_string(),
            data,
        };

        let stalled = {
            let mut inner = self.lock();
            inner.attempts.push(record.clone());
            if inner.failing_puts.contains(stream_name) {
                return Err(StreamError::Transport(format!(
                    "connection reset while writing to {}",
                    stream_name
                )));
            }
            if !inner.streams.contains_key(stream_name) {
                return Err(StreamError::Service {
                    status: 400,
                    kind: "ResourceNotFoundException".to_string(),
                    message: format!("Stream {} not found", stream_name),
                });
            }
            inner.stalled_puts.contains(stream_name)
        };
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut inner = self.lock();
        let sequence_number = inner.records.len().to_string();
        inner.records.push(record);
        Ok(PutRecordAck {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number,
        })
    }
}
