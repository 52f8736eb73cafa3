pub mod order_source;
pub mod record;
