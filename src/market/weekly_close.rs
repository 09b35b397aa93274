// Std library crates
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

// External crates
use anyhow::{Result, bail};
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};
use chrono::{DateTime, NaiveDate, NaiveTime};

// Local crates
use crate::collect::politeness_sleep;
use crate::config::market::{MARKET, MarketApiConfig};
use crate::domain::WeekKey;
use crate::series::WeeklyPrices;
use crate::utils::TimeUtils;
use crate::utils::time_utils;

/// One weekly kline, reduced to the two fields this pipeline reads.
#[derive(Debug, PartialEq)]
pub struct WeeklyKline {
    pub open_timestamp_ms: i64,
    pub close_price: Option<f64>,
}

// Custom error type for kline handling for better error messages.
#[derive(Debug)]
pub enum KlineError {
    InvalidLength,
    InvalidType(String),
    ConnectionFailed(String),
}

impl fmt::Display for KlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            KlineError::InvalidLength => write!(f, "Invalid length"),
            KlineError::InvalidType(field) => write!(f, "Invalid type: {}", field),
            KlineError::ConnectionFailed(msg) => {
                write!(f, "Market API connection failed: {}.", msg)
            }
        }
    }
}

impl Error for KlineError {}

// Extract an f64 from the heterogeneous kline item enum: Some only when the
// item was the String variant and that string parsed.
fn kline_field_to_float(item: Option<KlinesItemInner>) -> Option<f64> {
    item.and_then(|inner| {
        if let KlinesItemInner::String(s) = inner {
            s.parse::<f64>().ok()
        } else {
            None
        }
    })
}

impl TryFrom<Vec<KlinesItemInner>> for WeeklyKline {
    type Error = KlineError;

    fn try_from(items: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        debug_assert_eq!(12, items.len());

        let mut items = items.into_iter();
        let open_timestamp_ms = match items.next().ok_or(KlineError::InvalidLength)? {
            KlinesItemInner::Integer(ts) => ts,
            _ => return Err(KlineError::InvalidType("open_time".to_string())),
        };

        // open, high and low are not needed for a weekly close series
        let _ = items.next();
        let _ = items.next();
        let _ = items.next();
        let close_price = kline_field_to_float(items.next());

        Ok(WeeklyKline {
            open_timestamp_ms,
            close_price,
        })
    }
}

async fn configure_market_client() -> Result<RestApi> {
    let config = MarketApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    let rest_client = SpotRestApi::production(rest_conf);
    Ok(rest_client)
}

async fn fetch_weekly_batch(
    rest_client: &RestApi,
    start_time: Option<i64>,
) -> Result<Vec<Vec<KlinesItemInner>>> {
    // Pagination walks forward from start_time; the end is always "now"
    const END_TIME: Option<i64> = None;

    let params = KlinesParams::builder(
        MARKET.symbol.to_string(),
        KlinesIntervalEnum::Interval1w,
    )
    .limit(MARKET.limits.klines_limit)
    .start_time(start_time)
    .end_time(END_TIME)
    .build()?;

    match rest_client.klines(params).await {
        Ok(r) => Ok(r.data().await?),
        Err(e) => {
            if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                match conn_err {
                    connection_error::ConnectorClientError(msg) => {
                        log::error!("{} client error: check request parameters. {}", MARKET.symbol, msg);
                    }
                    connection_error::TooManyRequestsError(msg) => {
                        log::error!("{} rate limit exceeded. {}", MARKET.symbol, msg);
                    }
                    connection_error::RateLimitBanError(msg) => {
                        log::error!("{} IP banned due to excessive rate limits. {}", MARKET.symbol, msg);
                    }
                    errors::ConnectorError::ServerError { msg, status_code } => {
                        log::error!("{} server error: {} (status code: {:?})", MARKET.symbol, msg, status_code);
                    }
                    errors::ConnectorError::NetworkError(msg) => {
                        log::error!("{} network error: check the internet connection. {}", MARKET.symbol, msg);
                    }
                    errors::ConnectorError::NotFoundError(msg) => {
                        log::error!("{} not found. {}", MARKET.symbol, msg);
                    }
                    connection_error::BadRequestError(msg) => {
                        log::error!("{} bad request: verify input parameters. {}", MARKET.symbol, msg);
                    }
                    other => {
                        log::error!("Unexpected ConnectorError variant: {:?}", other);
                    }
                }
                Err(anyhow::Error::new(KlineError::ConnectionFailed(conn_err.to_string()))
                    .context(format!("klines call failed for {}", MARKET.symbol)))
            } else {
                log::error!("An unexpected error occurred for {}: {:#}", MARKET.symbol, e);
                Err(anyhow::Error::new(KlineError::ConnectionFailed(e.to_string()))
                    .context(format!("unexpected error during klines call for {}", MARKET.symbol)))
            }
        }
    }
}

async fn load_weekly_klines(start_date: NaiveDate) -> Result<WeeklyPrices> {
    let rest_client = configure_market_client().await?;

    let mut start_time =
        Some(start_date.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
    let mut all_klines: Vec<WeeklyKline> = Vec::new();

    loop {
        let batch = fetch_weekly_batch(&rest_client, start_time).await?;
        let batch_len = batch.len();

        let klines = batch
            .into_iter()
            .map(Vec::try_into)
            .collect::<Result<Vec<WeeklyKline>, KlineError>>()?;
        let last_open = klines.last().map(|k| k.open_timestamp_ms);
        all_klines.extend(klines);

        // A short batch means the provider ran out of weeks
        if batch_len < MARKET.limits.klines_limit as usize {
            break;
        }
        match last_open {
            Some(open_ms) => start_time = Some(open_ms + TimeUtils::MS_IN_W),
            None => break,
        }
        politeness_sleep().await;
    }

    if all_klines.is_empty() {
        bail!("no weekly klines returned for {}", MARKET.symbol);
    }

    let prices = weekly_prices_from_klines(all_klines);
    if prices.is_empty() {
        bail!("all weekly klines for {} were unusable", MARKET.symbol);
    }
    Ok(prices)
}

/// Key each kline by the Monday of the week its open timestamp falls in.
/// The provider's own week-start convention is deliberately not trusted
/// here; whatever day the kline opens on, it is floored to Monday.
fn weekly_prices_from_klines(klines: Vec<WeeklyKline>) -> WeeklyPrices {
    let mut prices = WeeklyPrices::new();
    for kline in klines {
        let Some(close_price) = kline.close_price else {
            log::warn!(
                "{} kline at {} has no usable close price; skipped",
                MARKET.symbol,
                time_utils::epoch_ms_to_utc(kline.open_timestamp_ms)
            );
            continue;
        };
        let Some(open) = DateTime::from_timestamp_millis(kline.open_timestamp_ms) else {
            log::warn!(
                "{} kline has out-of-range open timestamp {}; skipped",
                MARKET.symbol,
                kline.open_timestamp_ms
            );
            continue;
        };
        prices.insert(WeekKey::from_date(open.date_naive()), close_price);
    }
    prices
}

/// Weekly closes for the reference asset from `start_date` to now. Returns
/// an empty map on any failure; the aligner treats that as the terminal
/// nothing-to-render condition.
pub async fn fetch_weekly_closes(start_date: NaiveDate) -> WeeklyPrices {
    log::info!(
        "Fetching weekly {} closes from {} onwards",
        MARKET.symbol,
        start_date
    );
    match load_weekly_klines(start_date).await {
        Ok(prices) => {
            log::info!("Fetched {} weekly closes for {}", prices.len(), MARKET.symbol);
            prices
        }
        Err(e) => {
            log::error!("Reference series fetch failed: {:#}", e);
            WeeklyPrices::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use chrono::Datelike;

    fn ms_for(y: i32, m: u32, d: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
    }

    #[test]
    fn test_kline_conversion_reads_open_time_and_close() {
        let raw = vec![
            KlinesItemInner::Integer(ms_for(2024, 6, 10)),
            KlinesItemInner::String("100.0".to_string()), // open
            KlinesItemInner::String("120.0".to_string()), // high
            KlinesItemInner::String("90.0".to_string()),  // low
            KlinesItemInner::String("110.5".to_string()), // close
            KlinesItemInner::String("1.0".to_string()),
            KlinesItemInner::Integer(0),
            KlinesItemInner::String("1.0".to_string()),
            KlinesItemInner::Integer(0),
            KlinesItemInner::String("0".to_string()),
            KlinesItemInner::String("0".to_string()),
            KlinesItemInner::String("0".to_string()),
        ];
        let kline = WeeklyKline::try_from(raw).unwrap();
        assert_eq!(kline.open_timestamp_ms, ms_for(2024, 6, 10));
        assert_eq!(kline.close_price, Some(110.5));
    }

    #[test]
    fn test_kline_conversion_rejects_non_integer_open_time() {
        let raw: Vec<KlinesItemInner> = (0..12)
            .map(|_| KlinesItemInner::String("oops".to_string()))
            .collect();
        assert!(WeeklyKline::try_from(raw).is_err());
    }

    #[test]
    fn test_week_keys_are_renormalized_to_monday() {
        // A kline opening on a Thursday must land on that week's Monday
        let klines = vec![
            WeeklyKline {
                open_timestamp_ms: ms_for(2024, 6, 13), // Thursday
                close_price: Some(50.0),
            },
            WeeklyKline {
                open_timestamp_ms: ms_for(2024, 6, 17), // Monday already
                close_price: Some(60.0),
            },
        ];
        let prices = weekly_prices_from_klines(klines);

        let monday_1 = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let monday_2 = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
        assert_eq!(prices.get(&monday_1), Some(&50.0));
        assert_eq!(prices.get(&monday_2), Some(&60.0));
        assert!(prices.keys().all(|k| k.monday().weekday() == Weekday::Mon));
    }

    #[test]
    fn test_klines_without_close_are_skipped() {
        let klines = vec![WeeklyKline {
            open_timestamp_ms: ms_for(2024, 6, 10),
            close_price: None,
        }];
        assert!(weekly_prices_from_klines(klines).is_empty());
    }
}
