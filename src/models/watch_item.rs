/// A security being watched and the price it was bought at.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchItem {
    pub ticker: String,
    pub reference_price: f64,
}

impl WatchItem {
    pub fn new(ticker: impl Into<String>, reference_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            reference_price,
        }
    }
}
