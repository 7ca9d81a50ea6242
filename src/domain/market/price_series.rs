use crate::domain::errors::SeriesError;
use serde::{Deserialize, Serialize};

/// One daily OHLC bar. Timestamps are Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// Bar whose open/high/low all equal the close.
    pub fn flat(timestamp: i64, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }
}

/// Chronologically ordered bars.
///
/// Construction enforces strictly increasing timestamps (which also rules out
/// duplicates) and finite, non-negative closes. Everything downstream relies
/// on these holding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close < 0.0 {
                return Err(SeriesError::InvalidClose {
                    index,
                    value: bar.close,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp <= previous {
                    return Err(SeriesError::NonIncreasingTimestamp {
                        index,
                        timestamp: bar.timestamp,
                        previous,
                    });
                }
            }
        }
        Ok(Self { bars })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from `(timestamp, close)` pairs.
    pub fn from_closes(points: &[(i64, f64)]) -> Result<Self, SeriesError> {
        Self::new(points.iter().map(|&(ts, c)| Bar::flat(ts, c)).collect())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
