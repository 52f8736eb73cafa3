//! # Stream Core Library
//!
//! Everything the order/trade producer needs besides the record model.
//!
//! ## Modules
//! - `args`: Command-line arguments.
//! - `region`: Region validation and default endpoints.
//! - `client`: The `StreamClient` abstraction and its Kinesis implementation.
//! - `producer`: Stream readiness gate, publish operation and the paced loop.
//! - `error`: Client and startup error types.

pub mod args;
pub mod client;
pub mod error;
pub mod producer;
pub mod region;

pub use args::{usage_exit_code, ProducerArgs};
pub use client::{KinesisClient, StreamClient, StreamStatus};
pub use error::{StartupError, StreamError};
pub use producer::shutdown::{Shutdown, ShutdownTrigger};
pub use producer::{publish, validate_stream_ready, Producer, PUBLISH_INTERVAL};
pub use region::Region;
