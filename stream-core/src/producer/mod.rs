//! The order/trade producer.
//!
//! Startup checks that both streams are `ACTIVE`, then the loop publishes one
//! freshly generated order and its trade every cycle. A failed record is
//! logged and dropped; only the startup gate can stop the process.

pub mod shutdown;

use crate::client::StreamClient;
use crate::error::StartupError;
use log::{error, info, warn};
use shutdown::Shutdown;
use std::time::Duration;
use stock::{OrderSource, OrderTrade, Record};

/// Pause between two cycles.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(100);

/// Checks that a stream exists and accepts writes.
///
/// One describe call, no retry: anything but `ACTIVE` is fatal.
///
/// # Errors
///
/// * `StartupError::StreamNotActive` if the stream reports another status.
/// * `StartupError::DescribeFailed` if the describe call itself fails.
pub async fn validate_stream_ready<C>(client: &C, stream_name: &str) -> Result<(), StartupError>
where
    C: StreamClient + ?Sized,
{
    match client.describe_stream_status(stream_name).await {
        Ok(status) if status.is_active() => {
            info!("Stream {} is {}", stream_name, status);
            Ok(())
        }
        Ok(status) => Err(StartupError::StreamNotActive {
            stream: stream_name.to_string(),
            status: status.to_string(),
        }),
        Err(source) => Err(StartupError::DescribeFailed {
            stream: stream_name.to_string(),
            source,
        }),
    }
}

enum Delivery {
    Stored,
    Failed,
    Unencodable,
    Interrupted,
}

/// Serializes a record and puts it on `stream_name`, keyed by its ticker.
async fn put<C, R>(
    client: &C,
    stream_name: &str,
    record: &R,
    label: &str,
    shutdown: &mut Shutdown,
) -> Delivery
where
    C: StreamClient + ?Sized,
    R: Record + std::fmt::Display,
{
    let bytes = match stock::to_json_bytes(record) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not get JSON bytes for stock {}: {}", label, e);
            return Delivery::Unencodable;
        }
    };

    info!("Putting {}: {}", label, record);
    // Prefer a completed put over a signal that raced it.
    tokio::select! {
        biased;
        result = client.put_record(stream_name, record.partition_key(), bytes) => match result {
            Ok(_) => Delivery::Stored,
            Err(e) => {
                error!(
                    "Exception while sending data to stream {}. Will try again next cycle. Cause: {}",
                    stream_name, e
                );
                Delivery::Failed
            }
        },
        _ = shutdown.wait() => {
            info!("Interrupted, assuming shutdown.");
            Delivery::Interrupted
        }
    }
}

/// Publishes an order and its trade to their streams.
///
/// The order goes first. If the order cannot be encoded, the trade is skipped
/// as well. A failed order put does not stop the trade; a shutdown signal
/// does.
pub async fn publish<C>(
    pair: OrderTrade,
    client: &C,
    order_stream: &str,
    trade_stream: &str,
    shutdown: &mut Shutdown,
) where
    C: StreamClient + ?Sized,
{
    let (order, trade) = pair.into_parts();

    match put(client, order_stream, &order, "order", shutdown).await {
        Delivery::Stored | Delivery::Failed => {}
        Delivery::Unencodable | Delivery::Interrupted => return,
    }

    put(client, trade_stream, &trade, "trade", shutdown).await;
}

/// Drives the publish loop for one pair of streams.
pub struct Producer<C, S> {
    client: C,
    source: S,
    order_stream: String,
    trade_stream: String,
}

impl<C, S> Producer<C, S>
where
    C: StreamClient,
    S: OrderSource,
{
    pub fn new(
        client: C,
        source: S,
        order_stream: impl Into<String>,
        trade_stream: impl Into<String>,
    ) -> Self {
        Self {
            client,
            source,
            order_stream: order_stream.into(),
            trade_stream: trade_stream.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validates the order stream, then the trade stream.
    pub async fn validate(&self) -> Result<(), StartupError> {
        validate_stream_ready(&self.client, &self.order_stream).await?;
        validate_stream_ready(&self.client, &self.trade_stream).await
    }

    /// Publishes until `shutdown` fires. Returns the number of cycles run.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> u64 {
        info!(
            "Publishing orders to {} and trades to {} every {:?}",
            self.order_stream, self.trade_stream, PUBLISH_INTERVAL
        );
        let mut cycles = 0;

        while !shutdown.is_triggered() {
            let pair = self.source.next_order();
            publish(
                pair,
                &self.client,
                &self.order_stream,
                &self.trade_stream,
                &mut shutdown,
            )
            .await;
            cycles += 1;

            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                _ = tokio::time::sleep(PUBLISH_INTERVAL) => {}
            }
        }

        info!("Producer stopped after {} cycles.", cycles);
        cycles
    }

    /// Validates both streams, then runs until `shutdown` fires.
    ///
    /// A signal during validation stops the producer before the first cycle
    /// and returns `Ok(0)`.
    pub async fn start(mut self, shutdown: Shutdown) -> Result<u64, StartupError> {
        let mut signal = shutdown.clone();
        tokio::select! {
            biased;
            result = self.validate() => result?,
            _ = signal.wait() => {
                info!("Interrupted during stream validation, assuming shutdown.");
                return Ok(0);
            }
        }
        Ok(self.run(shutdown).await)
    }
}

#[cfg(test)]
mod tests;
