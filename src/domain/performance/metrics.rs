use super::stats::Stats;
use serde::{Deserialize, Serialize};

/// Floor on the number of years used by CAGR.
pub const MIN_YEARS: f64 = 1e-9;

/// Std-dev below which Sharpe is reported as exactly 0.0.
pub const MIN_STD: f64 = 1e-9;

/// Return-based risk metrics for one period-by-period return sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub cagr: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}

impl RiskMetrics {
    pub fn from_returns(returns: &[f64], periods_per_year: f64, risk_free_rate: f64) -> Self {
        Self {
            cagr: cagr(returns, periods_per_year),
            sharpe: sharpe_ratio(returns, risk_free_rate, periods_per_year),
            max_drawdown: max_drawdown(returns),
        }
    }
}

/// Compounded equity starting at `start`; one element longer than `returns`.
pub fn equity_curve(returns: &[f64], start: f64) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len() + 1);
    curve.push(start);
    let mut equity = start;
    for r in returns {
        equity *= 1.0 + r;
        curve.push(equity);
    }
    curve
}

/// Compound annual growth rate implied by the equity curve.
///
/// Always finite: growth too large to annualise saturates at `f64::MAX`, and
/// a wiped-out curve reports -1.0.
pub fn cagr(returns: &[f64], periods_per_year: f64) -> f64 {
    let curve = equity_curve(returns, 1.0);
    let years = (returns.len() as f64 / periods_per_year).max(MIN_YEARS);
    let first = curve[0];
    let last = curve[curve.len() - 1];
    let growth = last / first;
    if growth.is_nan() || growth <= 0.0 {
        return -1.0;
    }
    let annualised = growth.powf(1.0 / years) - 1.0;
    if annualised.is_finite() {
        annualised
    } else {
        f64::MAX
    }
}

/// Annualised Sharpe ratio of excess returns.
///
/// A (near-)constant sequence has no meaningful risk-adjusted return and
/// yields exactly 0.0.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let per_period_rf = risk_free_rate / periods_per_year;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_period_rf).collect();
    let std = Stats::std_dev(&excess);
    if std.is_nan() || std < MIN_STD {
        return 0.0;
    }
    periods_per_year.sqrt() * Stats::mean(&excess) / std
}

/// Most negative peak-to-trough decline of the equity curve (<= 0).
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let curve = equity_curve(returns, 1.0);
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for equity in curve {
        peak = peak.max(equity);
        if peak > 0.0 {
            worst = worst.min((equity - peak) / peak);
        }
    }
    worst
}
