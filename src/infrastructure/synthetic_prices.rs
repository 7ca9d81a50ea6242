//! Deterministic fallback price history for when no price file is available.

use crate::domain::market::price_series::{Bar, PriceSeries};
use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};

pub const DEFAULT_SYNTHETIC_BARS: usize = 252;

/// `bars` daily bars ending today (UTC midnight) with a gentle linear uptrend
/// starting at 100.
pub fn synthetic_series(bars: usize) -> Result<PriceSeries> {
    let end = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let start = end - Duration::days(bars.saturating_sub(1) as i64);

    let bars = (0..bars)
        .map(|i| {
            let close = 100.0 + 0.05 * i as f64;
            Bar {
                timestamp: (start + Duration::days(i as i64)).timestamp(),
                open: close * 0.999,
                high: close * 1.002,
                low: close * 0.998,
                close,
                volume: Some(1_000_000.0),
            }
        })
        .collect();

    Ok(PriceSeries::new(bars)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_series_shape() {
        let series = synthetic_series(DEFAULT_SYNTHETIC_BARS).unwrap();
        assert_eq!(series.len(), 252);
        let closes = series.closes();
        assert_eq!(closes[0], 100.0);
        assert!((closes[251] - 112.55).abs() < 1e-9);
        let ts = series.timestamps();
        assert!(ts.windows(2).all(|w| w[1] - w[0] == 86_400));
    }

    #[test]
    fn test_zero_bars_is_empty() {
        assert!(synthetic_series(0).unwrap().is_empty());
    }
}
