//! CSV ingestion for daily bars.
//!
//! Expected header: `timestamp,open,high,low,close[,volume]`. The timestamp
//! may be Unix seconds, `YYYY-MM-DD`, or RFC 3339. Rows missing any OHLC
//! value are dropped.

use crate::domain::market::price_series::{Bar, PriceSeries};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct BarRecord {
    #[serde(alias = "date", alias = "Date", alias = "Timestamp")]
    timestamp: String,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

pub fn load_price_series(path: &Path) -> Result<PriceSeries> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open price file {:?}", path))?;
    let series = read_price_series(file)?;
    info!("Loaded {} bars from {:?}", series.len(), path);
    Ok(series)
}

pub fn read_price_series<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for (line, result) in rdr.deserialize::<BarRecord>().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV row {}", line + 1))?;
        let timestamp = parse_timestamp(&record.timestamp)
            .with_context(|| format!("Bad timestamp on row {}", line + 1))?;

        match (record.open, record.high, record.low, record.close) {
            (Some(open), Some(high), Some(low), Some(close)) => bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: record.volume,
            }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {} rows with missing OHLC values", dropped);
    }
    PriceSeries::new(bars).context("Price series failed validation")
}

fn parse_timestamp(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }
    bail!("Unrecognised timestamp '{}'", raw)
}
