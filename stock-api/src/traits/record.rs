//! Defines the `Record` trait shared by every entity published to a stream.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// An entity that is published as one JSON payload on one stream.
pub trait Record: Serialize + DeserializeOwned {
    /// The key the streaming service uses to pick a shard.
    ///
    /// Records sharing a key land in the same shard and keep their relative order.
    fn partition_key(&self) -> &str;

    /// Returns the name of the first field JSON cannot represent, if any.
    fn non_finite_field(&self) -> Option<&'static str> {
        None
    }
}
