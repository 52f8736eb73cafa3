//! Defines the `OrderSource` trait for order/trade generators.
//!
//! The producer loop pulls one pair per cycle from an `OrderSource` and never
//! keeps it past the publish call, so implementors must hand out a fresh pair
//! every time.

use crate::model::order_trade::OrderTrade;

/// A trait for components that produce orders and the trades filling them.
///
/// # Examples
///
/// ```
/// use stock::{OrderSource, OrderTrade, StockOrder, StockTrade, TradeType};
///
/// struct FixedSource {
///     next_id: i64,
/// }
///
/// impl OrderSource for FixedSource {
///     fn next_order(&mut self) -> OrderTrade {
///         self.next_id += 1;
///         let order = StockOrder::new("AMZN", 125.5, self.next_id, TradeType::Buy);
///         let trade = StockTrade::new("AMZN", self.next_id, self.next_id, 125.5, 125.5, 1);
///         OrderTrade::new(order, trade)
///     }
/// }
///
/// let mut source = FixedSource { next_id: 0 };
/// assert_eq!(source.next_order().order.get_order_id(), 1);
/// ```
pub trait OrderSource {
    /// Produces the next order and its trade.
    fn next_order(&mut self) -> OrderTrade;
}

impl OrderSource for Box<dyn OrderSource + Send> {
    fn next_order(&mut self) -> OrderTrade {
        (**self).next_order()
    }
}
