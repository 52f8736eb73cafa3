//! Stock order records.

use crate::traits::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "BUY",
            TradeType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instruction to buy or sell a stock, published on the order stream.
///
/// The order carries no trade: the trade filling it is a sibling record
/// published on its own stream (see [`OrderTrade`](crate::OrderTrade)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOrder {
    ticker_symbol: String,
    amount: f64,
    order_id: i64,
    trade_type: TradeType,
}

impl StockOrder {
    /// Creates a new StockOrder.
    ///
    /// # Arguments
    ///
    /// * `ticker_symbol` - The stock symbol, also used as the partition key.
    /// * `amount` - Monetary value of the order.
    /// * `order_id` - Caller-assigned identifier. Uniqueness is not checked.
    /// * `trade_type` - Buy or sell.
    pub fn new(
        ticker_symbol: impl Into<String>,
        amount: f64,
        order_id: i64,
        trade_type: TradeType,
    ) -> Self {
        Self {
            ticker_symbol: ticker_symbol.into(),
            amount,
            order_id,
            trade_type,
        }
    }

    pub fn get_ticker_symbol(&self) -> &str {
        &self.ticker_symbol
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_order_id(&self) -> i64 {
        self.order_id
    }

    pub fn get_trade_type(&self) -> TradeType {
        self.trade_type
    }

    /// Encodes the order as a JSON payload.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, crate::CodecError> {
        crate::codec::to_json_bytes(self)
    }

    /// Decodes an order payload, ignoring unknown fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, crate::CodecError> {
        crate::codec::from_json_bytes(bytes)
    }
}

impl Record for StockOrder {
    fn partition_key(&self) -> &str {
        &self.ticker_symbol
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        (!self.amount.is_finite()).then_some("amount")
    }
}

impl fmt::Display for StockOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderId: {} ticker: {} type: {} amount: ${:.2}",
            self.order_id, self.ticker_symbol, self.trade_type, self.amount
        )
    }
}
