use super::errors::AttributionFailure;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Which strategy of the fallback chain produced the values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    Perturbation,
    Coefficients,
    FeatureImportances,
}

/// Per-feature importance for one prediction, or the reason none exists.
///
/// Serialises as `{ok: true, values: {feature: score}}` or
/// `{ok: false, values: {error: message}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    Explained {
        method: AttributionMethod,
        values: Vec<(String, f64)>,
    },
    Unavailable(AttributionFailure),
}

impl Attribution {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Explained { .. })
    }

    pub fn method(&self) -> Option<AttributionMethod> {
        match self {
            Self::Explained { method, .. } => Some(*method),
            Self::Unavailable(_) => None,
        }
    }

    pub fn value(&self, feature: &str) -> Option<f64> {
        match self {
            Self::Explained { values, .. } => values
                .iter()
                .find(|(name, _)| name == feature)
                .map(|(_, v)| *v),
            Self::Unavailable(_) => None,
        }
    }
}

struct Values<'a>(&'a Attribution);

impl Serialize for Values<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Attribution::Explained { values, .. } => {
                let mut map = serializer.serialize_map(Some(values.len()))?;
                for (name, value) in values {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Attribution::Unavailable(failure) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &failure.to_string())?;
                map.end()
            }
        }
    }
}

impl Serialize for Attribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Attribution", 2)?;
        record.serialize_field("ok", &self.is_ok())?;
        record.serialize_field("values", &Values(self))?;
        record.end()
    }
}
