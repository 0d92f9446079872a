pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_provider;
pub(crate) mod providers;

// Re-export the public interface
pub use market_data_model::LiveQuote;
pub use market_data_provider::MarketDataProvider;
pub use providers::FmpProvider;

// Re-export error types for convenience
pub use market_data_errors::MarketDataError;
