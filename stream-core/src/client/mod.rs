//! Abstraction over the streaming service.
//!
//! The producer only needs two calls: the status of a stream, and appending
//! one record to it. Any retry policy lives inside the implementation.

pub mod credentials;
pub mod kinesis;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod signer;

use crate::error::StreamError;
use async_trait::async_trait;
use std::fmt;

pub use credentials::Credentials;
pub use kinesis::KinesisClient;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStreamClient;

/// Lifecycle state reported by `DescribeStream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    Creating,
    Deleting,
    Active,
    Updating,
    /// Any status this client does not know about.
    Unknown(String),
}

impl StreamStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StreamStatus::Creating => "CREATING",
            StreamStatus::Deleting => "DELETING",
            StreamStatus::Active => "ACTIVE",
            StreamStatus::Updating => "UPDATING",
            StreamStatus::Unknown(s) => s,
        }
    }

    /// Only an `ACTIVE` stream accepts writes.
    pub fn is_active(&self) -> bool {
        self.as_str() == "ACTIVE"
    }
}

impl From<&str> for StreamStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATING" => StreamStatus::Creating,
            "DELETING" => StreamStatus::Deleting,
            "ACTIVE" => StreamStatus::Active,
            "UPDATING" => StreamStatus::Updating,
            other => StreamStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement of an appended record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecordAck {
    pub shard_id: String,
    pub sequence_number: String,
}

/// Client for an append-only, partition-keyed streaming service.
#[async_trait]
pub trait StreamClient: Send + Sync {
    /// Fetch the current status of a stream.
    async fn describe_stream_status(&self, stream_name: &str) -> Result<StreamStatus, StreamError>;

    /// Append one record to a stream.
    ///
    /// Records with the same `partition_key` go to the same shard.
    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<PutRecordAck, StreamError>;
}

#[async_trait]
impl<C: StreamClient + ?Sized> StreamClient for std::sync::Arc<C> {
    async fn describe_stream_status(&self, stream_name: &str) -> Result<StreamStatus, StreamError> {
        (**self).describe_stream_status(stream_name).await
    }

    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<PutRecordAck, StreamError> {
        (**self).put_record(stream_name, partition_key, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(StreamStatus::from("ACTIVE"), StreamStatus::Active);
        assert_eq!(StreamStatus::from("CREATING"), StreamStatus::Creating);
        assert_eq!(
            StreamStatus::from("FROZEN"),
            StreamStatus::Unknown("FROZEN".to_string())
        );
    }

    #[test]
    fn test_only_active_is_ready() {
        assert!(StreamStatus::Active.is_active());
        assert!(!StreamStatus::Updating.is_active());
        assert!(!StreamStatus::from("active").is_active());
    }
}
