pub(crate) mod fmp_provider;

pub use fmp_provider::FmpProvider;
