use super::feature_registry::FeatureVector;

/// Aligned feature matrix (X) and forward-return labels (y).
///
/// `features[i]` and `labels[i]` share `timestamps[i]`; `labels[i]` is the
/// return realised over the following period. The final bar of the source
/// series has no label, so its features are kept apart in `pending`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub timestamps: Vec<i64>,
    pub features: Vec<FeatureVector>,
    pub labels: Vec<f64>,
    pub pending: Option<(i64, FeatureVector)>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Most recent feature row: the unlabeled final bar if present, else the
    /// last labeled row.
    pub fn latest(&self) -> Option<(i64, FeatureVector)> {
        self.pending.or_else(|| {
            let last = self.features.last()?;
            let ts = self.timestamps.last()?;
            Some((*ts, *last))
        })
    }
}
