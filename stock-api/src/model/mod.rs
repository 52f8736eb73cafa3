pub mod order;
pub mod order_trade;
pub mod trade;
