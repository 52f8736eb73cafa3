//! Random order/trade generator.
//!
//! Picks a stock from a fixed table, moves its price up to 25% away from the
//! reference, and fills the whole order in a single trade.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock::{OrderSource, OrderTrade, StockOrder, StockTrade, TradeType};

/// Reference prices, in dollars.
const STOCK_PRICES: &[(&str, f64)] = &[
    ("AAPL", 119.72),
    ("AMZN", 125.50),
    ("BAC", 34.14),
    ("CSCO", 49.52),
    ("GOOG", 136.21),
    ("INTC", 35.16),
    ("JPM", 148.77),
    ("MSFT", 327.89),
    ("NFLX", 431.16),
    ("NVDA", 456.68),
    ("ORCL", 107.52),
    ("TSLA", 252.08),
    ("VZ", 33.12),
    ("WMT", 159.65),
    ("XOM", 110.21),
];

const MAX_DEVIATION: f64 = 0.25;
const MAX_QUANTITY: i64 = 1000;

pub struct RandomOrderGenerator {
    rng: StdRng,
    next_order_id: i64,
    next_trade_id: i64,
}

impl RandomOrderGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator, for tests.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            next_order_id: 1,
            next_trade_id: 1,
        }
    }
}

impl Default for RandomOrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSource for RandomOrderGenerator {
    fn next_order(&mut self) -> OrderTrade {
        let (ticker, reference) = STOCK_PRICES[self.rng.gen_range(0..STOCK_PRICES.len())];

        let trade_type = if self.rng.gen_bool(0.5) {
            TradeType::Buy
        } else {
            TradeType::Sell
        };

        let deviation = self.rng.gen_range(-MAX_DEVIATION..=MAX_DEVIATION);
        let price = round_cents(reference * (1.0 + deviation));
        let quantity = self.rng.gen_range(1..=MAX_QUANTITY);
        let amount = round_cents(price * quantity as f64);

        let order_id = self.next_order_id;
        let trade_id = self.next_trade_id;
        self.next_order_id += 1;
        self.next_trade_id += 1;

        OrderTrade::new(
            StockOrder::new(ticker, amount, order_id, trade_type),
            StockTrade::new(ticker, order_id, trade_id, amount, price, quantity),
        )
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
