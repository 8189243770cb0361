use std::sync::Arc;

/// Provider-specific symbol (e.g. "SPY", "BTC-USD", "000001.SS")
pub type ProviderSymbol = Arc<str>;
