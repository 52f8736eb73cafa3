//! Publishes random stock orders and trades to two streams.
//!
//! Usage: `order-feed <ORDER_STREAM> <TRADE_STREAM> <REGION> [--endpoint URL]`
//!
//! Both streams must be `ACTIVE` before anything is published. Afterwards an
//! order and its trade are published every 100 ms until the process is
//! interrupted.

mod generator;

use anyhow::Result;
use generator::RandomOrderGenerator;
use log::info;
use std::process::ExitCode;
use stream_core::client::Credentials;
use stream_core::producer::shutdown;
use stream_core::{KinesisClient, Producer, ProducerArgs, Region};

async fn run(args: ProducerArgs) -> Result<()> {
    let region: Region = args.get_region().parse()?;
    let credentials = Credentials::resolve()?;
    let client = KinesisClient::new(&region, credentials, args.get_endpoint())?;
    info!("Using endpoint {}", client.get_endpoint());

    let (trigger, shutdown) = shutdown::channel();
    shutdown::spawn_ctrl_c_listener(trigger);

    let producer = Producer::new(
        client,
        RandomOrderGenerator::new(),
        args.get_order_stream(),
        args.get_trade_stream(),
    );
    producer.start(shutdown).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ProducerArgs::parse_or_exit();

    let result = run(args).await;
    if let Err(e) = &result {
        eprintln!("{}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// Interruption after startup is a clean exit; every startup failure is 1.
fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
