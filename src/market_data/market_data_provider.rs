use async_trait::async_trait;

use super::market_data_errors::MarketDataError;
use super::market_data_model::LiveQuote;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_latest_quote(&self, symbol: &str) -> Result<LiveQuote, MarketDataError>;
}
