use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::LiveQuote;
use crate::market_data::market_data_provider::MarketDataProvider;

const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

// Conservative bound for a single quote lookup; expiry counts as a failed lookup.
const QUOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Quote provider backed by the Financial Modeling Prep API.
pub struct FmpProvider {
    client: Client,
    api_key: String,
}

/// One element of the FMP `/quote/{symbol}` response array.
#[derive(Debug, Deserialize)]
struct FmpQuote {
    symbol: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
}

impl FmpProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = Client::builder().timeout(QUOTE_REQUEST_TIMEOUT).build()?;

        Ok(FmpProvider {
            client,
            api_key: api_key.into(),
        })
    }

    /// Builds a provider from the `FMP_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, MarketDataError> {
        let api_key = std::env::var("FMP_API_KEY").map_err(|_| {
            MarketDataError::MissingConfiguration("FMP_API_KEY is not set".to_string())
        })?;
        Self::new(api_key)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Vec<FmpQuote>, MarketDataError> {
        let url = format!("{}/quote/{}?apikey={}", FMP_BASE_URL, symbol, self.api_key);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout(format!("Quote request for {} timed out", symbol))
            } else {
                MarketDataError::NetworkError(e)
            }
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(MarketDataError::Unauthorized(format!(
                    "FMP rejected the API key for {}",
                    symbol
                )));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(MarketDataError::RateLimitExceeded),
            status if !status.is_success() => {
                return Err(MarketDataError::ProviderError(format!(
                    "FMP returned status {} for {}",
                    status, symbol
                )));
            }
            _ => {}
        }

        let body = response.text().await?;
        serde_json::from_str::<Vec<FmpQuote>>(&body)
            .map_err(|e| MarketDataError::ParsingError(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    fn name(&self) -> &'static str {
        "FMP"
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<LiveQuote, MarketDataError> {
        let quotes = self.fetch_quote(symbol).await?;

        let quote = quotes
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::NotFound(format!("No quote found for {}", symbol)))?;

        Ok(LiveQuote {
            symbol: quote.symbol.unwrap_or_else(|| symbol.to_string()),
            price: quote.price,
            change: quote.change,
            change_percent: quote.changes_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FmpQuote;

    #[test]
    fn parses_the_fmp_quote_payload() {
        let body = r#"[{
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 155.0,
            "changesPercentage": 3.33,
            "change": 5.0,
            "dayLow": 150.1,
            "dayHigh": 156.2,
            "marketCap": 2500000000,
            "exchange": "NASDAQ"
        }]"#;

        let quotes: Vec<FmpQuote> = serde_json::from_str(body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol.as_deref(), Some("AAPL"));
        assert_eq!(quotes[0].price, Some(155.0));
        assert_eq!(quotes[0].change, Some(5.0));
        assert_eq!(quotes[0].changes_percentage, Some(3.33));
    }

    #[test]
    fn tolerates_null_and_missing_fields() {
        let body = r#"[{"symbol": "AAPL", "price": null, "change": null}]"#;

        let quotes: Vec<FmpQuote> = serde_json::from_str(body).unwrap();
        assert_eq!(quotes[0].price, None);
        assert_eq!(quotes[0].change, None);
        assert_eq!(quotes[0].changes_percentage, None);
    }
}
