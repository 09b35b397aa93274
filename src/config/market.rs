//! Binance-specific configuration constants and types for the reference
//! price series.

/// Configuration for the Binance REST API client
/// (This is the runtime struct used by the Http Client)
pub struct MarketApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for MarketApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: MARKET.client.timeout_ms,
            retries: MARKET.client.retries,
            backoff_ms: MARKET.client.backoff_ms,
        }
    }
}

/// Configuration for REST API Limits
pub struct RestLimits {
    /// Limit for number of klines returned in a single request
    pub klines_limit: i32,
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

/// The Master Configuration Struct
pub struct MarketConfig {
    /// The reference asset whose weekly closes anchor the chart.
    pub symbol: &'static str,
    pub limits: RestLimits,
    pub client: ClientDefaults,
}

pub const MARKET: MarketConfig = MarketConfig {
    symbol: "BTCUSDT",
    limits: RestLimits {
        // Theoretical limit is 1000; one batch covers ~19 years of weeks
        klines_limit: 1000,
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 5,
        backoff_ms: 5000,
    },
};
