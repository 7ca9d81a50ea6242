//! Attribution fallback chain configuration.

use super::env_parse::parse_or;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// When false the perturbation method is skipped and the chain starts
    /// at the coefficient fallback
    pub perturbation_enabled: bool,
    /// Upper bound on background rows averaged over by the perturbation method
    pub max_background_rows: usize,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            perturbation_enabled: true,
            max_background_rows: 200,
        }
    }
}

impl AttributionConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            perturbation_enabled: std::env::var("ENABLE_SHAP")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(d.perturbation_enabled),
            max_background_rows: parse_or("ATTRIBUTION_MAX_BACKGROUND", d.max_background_rows)?,
        })
    }
}
