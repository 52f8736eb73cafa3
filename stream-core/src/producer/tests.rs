use super::shutdown::{self, Shutdown, ShutdownTrigger};
use super::*;
use crate::client::{MemoryStreamClient, StreamStatus};
use std::sync::Arc;
use stock::{StockOrder, StockTrade, TradeType};

const ORDERS: &str = "orders";
const TRADES: &str = "trades";

fn active_client() -> MemoryStreamClient {
    MemoryStreamClient::new()
        .with_stream(ORDERS, StreamStatus::Active)
        .with_stream(TRADES, StreamStatus::Active)
}

fn pair(ticker: &str, order_id: i64) -> OrderTrade {
    let order = StockOrder::new(ticker, 125.50, order_id, TradeType::Buy);
    let trade = StockTrade::new(ticker, order_id, order_id * 10, 1255.0, 125.50, 10);
    OrderTrade::new(order, trade)
}

/// Hands out pairs with increasing ids, firing the trigger on the last one.
struct LimitedSource {
    next_id: i64,
    limit: i64,
    trigger: Option<ShutdownTrigger>,
}

impl LimitedSource {
    fn new(limit: i64, trigger: ShutdownTrigger) -> Self {
        Self {
            next_id: 0,
            limit,
            trigger: Some(trigger),
        }
    }
}

impl OrderSource for LimitedSource {
    fn next_order(&mut self) -> OrderTrade {
        self.next_id += 1;
        if self.next_id >= self.limit {
            if let Some(trigger) = self.trigger.take() {
                trigger.trigger();
            }
        }
        pair("AMZN", self.next_id)
    }
}

/// Answers puts normally but never answers a describe.
struct UnresponsiveClient {
    inner: MemoryStreamClient,
}

#[async_trait::async_trait]
impl StreamClient for UnresponsiveClient {
    async fn describe_stream_status(
        &self,
        stream_name: &str,
    ) -> Result<StreamStatus, crate::error::StreamError> {
        self.inner.describe_stream_status(stream_name).await?;
        std::future::pending().await
    }

    async fn put_record(
        &self,
        stream_name: &str,
        partition_key: &str,
        data: Vec<u8>,
    ) -> Result<crate::client::PutRecordAck, crate::error::StreamError> {
        self.inner.put_record(stream_name, partition_key, data).await
    }
}

struct EndlessSource;

impl OrderSource for EndlessSource {
    fn next_order(&mut self) -> OrderTrade {
        pair("MSFT", 1)
    }
}

#[tokio::test]
async fn test_validate_active_stream() {
    let client = active_client();
    validate_stream_ready(&client, ORDERS).await.unwrap();
    assert_eq!(client.describe_calls(), vec![ORDERS.to_string()]);
}

#[tokio::test]
async fn test_validate_inactive_stream() {
    let client = MemoryStreamClient::new().with_stream(ORDERS, StreamStatus::Creating);
    let err = validate_stream_ready(&client, ORDERS).await.unwrap_err();

    match &err {
        StartupError::StreamNotActive { stream, status } => {
            assert_eq!(stream, ORDERS);
            assert_eq!(status, "CREATING");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Stream orders is not active. Please wait a few moments and try again."
    );
}

#[tokio::test]
async fn test_validate_describe_failure() {
    let client = active_client().fail_describe(TRADES);
    let err = validate_stream_ready(&client, TRADES).await.unwrap_err();

    assert!(matches!(err, StartupError::DescribeFailed { ref stream, .. } if stream == TRADES));
    assert!(err
        .to_string()
        .starts_with("Error found while describing the stream trades"));
}

#[tokio::test]
async fn test_validate_missing_stream() {
    let client = MemoryStreamClient::new();
    let err = validate_stream_ready(&client, ORDERS).await.unwrap_err();
    assert!(err.to_string().contains("ResourceNotFoundException"));
}

#[tokio::test]
async fn test_publish_routes_by_ticker() {
    let client = active_client();
    publish(pair("AMZN", 1), &client, ORDERS, TRADES, &mut Shutdown::never()).await;

    let records = client.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].stream_name, ORDERS);
    assert_eq!(records[0].partition_key, "AMZN");
    assert_eq!(records[1].stream_name, TRADES);
    assert_eq!(records[1].partition_key, "AMZN");

    let order = StockOrder::from_json_bytes(&records[0].data).unwrap();
    assert_eq!(order, StockOrder::new("AMZN", 125.50, 1, TradeType::Buy));
    let trade = StockTrade::from_json_bytes(&records[1].data).unwrap();
    assert_eq!(trade.get_trade_id(), 10);

    let value: serde_json::Value = serde_json::from_slice(&records[0].data).unwrap();
    assert!(value.get("tradeId").is_none());
}

#[tokio::test]
async fn test_unencodable_order_skips_both_records() {
    let client = active_client();
    let order = StockOrder::new("AMZN", f64::NAN, 1, TradeType::Sell);
    let trade = StockTrade::new("AMZN", 1, 2, 10.0, 10.0, 1);

    publish(
        OrderTrade::new(order, trade),
        &client,
        ORDERS,
        TRADES,
        &mut Shutdown::never(),
    )
    .await;

    assert!(client.put_attempts().is_empty());
}

#[tokio::test]
async fn test_failed_order_put_still_publishes_trade() {
    let client = active_client().fail_puts(ORDERS);
    publish(pair("AMZN", 1), &client, ORDERS, TRADES, &mut Shutdown::never()).await;

    let attempts = client.put_attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].stream_name, ORDERS);
    assert!(client.records_for(ORDERS).is_empty());
    assert_eq!(client.records_for(TRADES).len(), 1);
}

#[tokio::test]
async fn test_unencodable_trade_is_skipped() {
    let client = active_client();
    let order = StockOrder::new("AMZN", 10.0, 1, TradeType::Buy);
    let trade = StockTrade::new("AMZN", 1, 2, 10.0, f64::INFINITY, 1);

    publish(
        OrderTrade::new(order, trade),
        &client,
        ORDERS,
        TRADES,
        &mut Shutdown::never(),
    )
    .await;

    assert_eq!(client.records_for(ORDERS).len(), 1);
    assert!(client
        .put_attempts()
        .iter()
        .all(|r| r.stream_name != TRADES));
}

#[tokio::test]
async fn test_interrupted_order_put_skips_trade() {
    let client = active_client().stall_puts(ORDERS);
    let (trigger, mut shutdown) = shutdown::channel();
    trigger.trigger();

    publish(pair("AMZN", 1), &client, ORDERS, TRADES, &mut shutdown).await;

    let attempts = client.put_attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].stream_name, ORDERS);
    assert!(client.records().is_empty());
}

#[tokio::test]
async fn test_start_fails_without_publishing() {
    let client = Arc::new(
        MemoryStreamClient::new()
            .with_stream(ORDERS, StreamStatus::Active)
            .with_stream(TRADES, StreamStatus::Updating),
    );
    let producer = Producer::new(client.clone(), EndlessSource, ORDERS, TRADES);

    let result = producer.start(Shutdown::never()).await;

    assert!(matches!(result, Err(StartupError::StreamNotActive { .. })));
    assert_eq!(client.describe_calls(), vec![ORDERS, TRADES]);
    assert!(client.put_attempts().is_empty());
}

#[tokio::test]
async fn test_start_stops_at_first_bad_stream() {
    let client = Arc::new(active_client().fail_describe(ORDERS));
    let producer = Producer::new(client.clone(), EndlessSource, ORDERS, TRADES);

    let result = producer.start(Shutdown::never()).await;

    assert!(matches!(result, Err(StartupError::DescribeFailed { .. })));
    assert_eq!(client.describe_calls(), vec![ORDERS]);
}

#[tokio::test(start_paused = true)]
async fn test_each_cycle_publishes_a_fresh_pair() {
    let (trigger, shutdown) = shutdown::channel();
    let mut producer = Producer::new(active_client(), LimitedSource::new(3, trigger), ORDERS, TRADES);

    let started = tokio::time::Instant::now();
    let cycles = producer.run(shutdown).await;
    let elapsed = started.elapsed();

    assert_eq!(cycles, 3);
    // Two full pauses; the third is cut short by the signal.
    assert!(elapsed >= PUBLISH_INTERVAL * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < PUBLISH_INTERVAL * 3, "elapsed {:?}", elapsed);

    let orders: Vec<i64> = producer
        .client()
        .records_for(ORDERS)
        .iter()
        .map(|r| StockOrder::from_json_bytes(&r.data).unwrap().get_order_id())
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let streams: Vec<String> = producer
        .client()
        .records()
        .into_iter()
        .map(|r| r.stream_name)
        .collect();
    assert_eq!(streams, vec![ORDERS, TRADES, ORDERS, TRADES, ORDERS, TRADES]);
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_the_loop() {
    let (trigger, shutdown) = shutdown::channel();
    let client = active_client().fail_puts(ORDERS).fail_puts(TRADES);
    let mut producer = Producer::new(client, LimitedSource::new(4, trigger), ORDERS, TRADES);

    assert_eq!(producer.run(shutdown).await, 4);
    assert_eq!(producer.client().put_attempts().len(), 8);
    assert!(producer.client().records().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_pause() {
    let (trigger, shutdown) = shutdown::channel();
    let mut producer = Producer::new(active_client(), EndlessSource, ORDERS, TRADES);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.trigger();
    });

    let started = tokio::time::Instant::now();
    let cycles = producer.run(shutdown).await;

    assert_eq!(cycles, 1);
    assert!(started.elapsed() < PUBLISH_INTERVAL);
}

#[tokio::test]
async fn test_run_returns_immediately_when_already_stopped() {
    let (trigger, shutdown) = shutdown::channel();
    trigger.trigger();
    let mut producer = Producer::new(active_client(), EndlessSource, ORDERS, TRADES);

    assert_eq!(producer.run(shutdown).await, 0);
    assert!(producer.client().put_attempts().is_empty());
}

#[tokio::test]
async fn test_shutdown_interrupts_validation() {
    let client = Arc::new(UnresponsiveClient {
        inner: active_client(),
    });
    let (trigger, shutdown) = shutdown::channel();
    let producer = Producer::new(client.clone(), EndlessSource, ORDERS, TRADES);

    let handle = tokio::spawn(producer.start(shutdown));
    tokio::time::sleep(Duration::from_millis(50)).await;
    trigger.trigger();

    let cycles = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("start should return once shutdown fires")
        .unwrap()
        .unwrap();

    assert_eq!(cycles, 0);
    assert_eq!(client.inner.describe_calls(), vec![ORDERS]);
    assert!(client.inner.put_attempts().is_empty());
}
