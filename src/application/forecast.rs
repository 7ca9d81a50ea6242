use crate::application::explain::attribution::AttributionExplainer;
use crate::application::ml::model::Model;
use crate::domain::attribution::Attribution;
use crate::domain::errors::{AttributionFailure, ModelError};
use crate::domain::ml::dataset::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NO_DATA: &str = "no data";

/// Next-period return forecast for the most recent feature row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub predicted_return: f64,
    pub as_of: String,
    pub attribution: Attribution,
}

impl Forecast {
    fn no_data() -> Self {
        Self {
            predicted_return: 0.0,
            as_of: NO_DATA.to_string(),
            attribution: Attribution::Unavailable(AttributionFailure::NoData),
        }
    }
}

/// Predicts from the latest row and explains that prediction against the
/// trailing labeled rows.
pub fn forecast(
    model: &Model,
    dataset: &Dataset,
    explainer: &AttributionExplainer,
) -> Result<Forecast, ModelError> {
    if dataset.is_empty() {
        return Ok(Forecast::no_data());
    }
    let Some((timestamp, row)) = dataset.latest() else {
        return Ok(Forecast::no_data());
    };

    let predicted_return = model.predict(&[row])?.first().copied().unwrap_or(0.0);
    let attribution = explainer.explain(model, &dataset.features, &row);

    Ok(Forecast {
        predicted_return,
        as_of: format_timestamp(timestamp),
        attribution,
    })
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}
