use indexmap::IndexMap;
use tips_core::HealthMetric;

/// Metrics partitioned by `metric_type`, keys in first-seen order.
///
/// Input order is preserved inside each key, so callers that pass
/// newest-first data get newest-first series back.
#[derive(Debug, Default)]
pub struct MetricGroups<'a> {
    by_type: IndexMap<&'a str, Vec<&'a HealthMetric>>,
}

impl<'a> MetricGroups<'a> {
    pub fn new(metrics: &'a [HealthMetric]) -> Self {
        let mut by_type: IndexMap<&'a str, Vec<&'a HealthMetric>> = IndexMap::new();
        for metric in metrics {
            by_type
                .entry(metric.metric_type.as_str())
                .or_default()
                .push(metric);
        }
        Self { by_type }
    }

    pub fn get(&self, metric_type: &str) -> &[&'a HealthMetric] {
        self.by_type
            .get(metric_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Concatenates the series of several aliases, in alias order.
    pub fn series(&self, metric_types: &[&str]) -> Vec<&'a HealthMetric> {
        metric_types
            .iter()
            .flat_map(|metric_type| self.get(metric_type).iter().copied())
            .collect()
    }

    pub fn types(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_type.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
