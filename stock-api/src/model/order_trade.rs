use super::{order::StockOrder, trade::StockTrade};

/// An order together with the trade that filled it.
///
/// The two are independent values with no ownership between them; they are
/// produced together and published as sibling records.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTrade {
    pub order: StockOrder,
    pub trade: StockTrade,
}

impl OrderTrade {
    pub fn new(order: StockOrder, trade: StockTrade) -> Self {
        Self { order, trade }
    }

    pub fn into_parts(self) -> (StockOrder, StockTrade) {
        (self.order, self.trade)
    }
}
