//! Caller-side helpers: JSON intake, metric ordering and the response envelope.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tips_core::{AppointmentSuggestion, HealthMetric, HealthSuggestion, TipsError};

use crate::{Clock, TipsEngine};

/// Body returned to clients, suggestions most urgent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TipsResponse {
    pub success: bool,
    pub suggestions: Vec<AppointmentSuggestion>,
}

impl TipsResponse {
    pub fn from_suggestions(mut suggestions: Vec<AppointmentSuggestion>) -> Self {
        rank_by_danger(&mut suggestions);
        Self {
            success: true,
            suggestions,
        }
    }
}

/// Body returned for lifestyle tips, in shuffled order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthTipsResponse {
    pub success: bool,
    pub suggestions: Vec<HealthSuggestion>,
}

/// Parse metrics from a JSON string.
pub fn parse_metrics_str(metrics_json: &str) -> Result<Vec<HealthMetric>, TipsError> {
    let value: Value =
        serde_json::from_str(metrics_json).map_err(|err| TipsError::Parse(err.to_string()))?;
    parse_metrics_value(&value)
}

/// Accepts a bare array, or an object carrying a `metrics` or `rows` array.
pub fn parse_metrics_value(value: &Value) -> Result<Vec<HealthMetric>, TipsError> {
    let rows = match value {
        Value::Array(_) => value,
        Value::Object(map) => map
            .get("metrics")
            .or_else(|| map.get("rows"))
            .filter(|rows| rows.is_array())
            .ok_or(TipsError::MissingData)?,
        _ => return Err(TipsError::MissingData),
    };

    Vec::<HealthMetric>::deserialize(rows).map_err(|err| TipsError::Parse(err.to_string()))
}

/// Stable sort, newest `metric_date` first.
pub fn sort_newest_first(metrics: &mut [HealthMetric]) {
    metrics.sort_by(|a, b| b.metric_date.cmp(&a.metric_date));
}

/// Stable sort, highest danger level first.
pub fn rank_by_danger(suggestions: &mut [AppointmentSuggestion]) {
    suggestions.sort_by(|a, b| b.danger_level.cmp(&a.danger_level));
}

/// Full caller pipeline: order metrics, run the engine, rank the result.
pub fn respond<C, R>(
    engine: &mut TipsEngine<C, R>,
    mut metrics: Vec<HealthMetric>,
    user_id: i64,
) -> TipsResponse
where
    C: Clock,
    R: Rng,
{
    sort_newest_first(&mut metrics);
    TipsResponse::from_suggestions(engine.generate(&metrics, user_id))
}

/// Lifestyle-tip counterpart of [`respond`].
pub fn respond_health_tips<C, R>(
    engine: &mut TipsEngine<C, R>,
    mut metrics: Vec<HealthMetric>,
    user_id: i64,
) -> HealthTipsResponse
where
    C: Clock,
    R: Rng,
{
    sort_newest_first(&mut metrics);
    HealthTipsResponse {
        success: true,
        suggestions: engine.health_tips(&metrics, user_id),
    }
}
