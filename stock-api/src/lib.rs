pub mod codec;
pub mod model;
pub mod traits;

pub use codec::{CodecError, from_json_bytes, to_json_bytes};
pub use model::order::{StockOrder, TradeType};
pub use model::order_trade::OrderTrade;
pub use model::trade::StockTrade;
pub use traits::order_source::OrderSource;
pub use traits::record::Record;

pub mod prelude {
    pub use crate::model::order::{StockOrder, TradeType};
    pub use crate::model::order_trade::OrderTrade;
    pub use crate::model::trade::StockTrade;
    pub use crate::traits::order_source::OrderSource;
}
