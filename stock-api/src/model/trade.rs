//! Stock trade records.

use crate::traits::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fill against an order, published on the trade stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTrade {
    /// The traded symbol. Matches the originating order by convention.
    ticker_symbol: String,
    /// The originating order. Not checked against any order.
    order_id: i64,
    trade_id: i64,
    /// Price per share.
    price: f64,
    /// Total value of the trade.
    amount: f64,
    /// Number of shares.
    quantity: i64,
}

impl StockTrade {
    pub fn new(
        ticker_symbol: impl Into<String>,
        order_id: i64,
        trade_id: i64,
        amount: f64,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            ticker_symbol: ticker_symbol.into(),
            order_id,
            trade_id,
            price,
            amount,
            quantity,
        }
    }

    pub fn get_ticker_symbol(&self) -> &str {
        &self.ticker_symbol
    }

    pub fn get_order_id(&self) -> i64 {
        self.order_id
    }

    pub fn get_trade_id(&self) -> i64 {
        self.trade_id
    }

    pub fn get_price(&self) -> f64 {
        self.price
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_quantity(&self) -> i64 {
        self.quantity
    }

    /// Encodes the trade as a JSON payload.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, crate::CodecError> {
        crate::codec::to_json_bytes(self)
    }

    /// Decodes a trade payload, ignoring unknown fields.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, crate::CodecError> {
        crate::codec::from_json_bytes(bytes)
    }
}

impl Record for StockTrade {
    fn partition_key(&self) -> &str {
        &self.ticker_symbol
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        if !self.price.is_finite() {
            Some("price")
        } else if !self.amount.is_finite() {
            Some("amount")
        } else {
            None
        }
    }
}

impl fmt::Display for StockTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "orderId: {} tradeId: {} {} shares of {} for price ${:.2} with total ${:.2}",
            self.order_id, self.trade_id, self.quantity, self.ticker_symbol, self.price, self.amount
        )
    }
}
