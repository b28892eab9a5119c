//! Bridge WASM <-> JavaScript cho engine gợi ý lịch hẹn.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use tips_core::{EngineConfig, HealthMetric, TipsError};
use tips_engine::{parse_metrics_value, respond, respond_health_tips, TipsEngine};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
struct JsEngineConfig {
    #[serde(default)]
    high_priority_timeframe: Option<String>,
    #[serde(default)]
    medium_priority_timeframe: Option<String>,
    #[serde(default)]
    low_priority_timeframe: Option<String>,
    #[serde(default)]
    max_suggestions: Option<usize>,
    #[serde(default)]
    max_health_tips: Option<usize>,
}

impl From<JsEngineConfig> for EngineConfig {
    fn from(cfg: JsEngineConfig) -> Self {
        let mut base = EngineConfig::default();
        if let Some(text) = cfg.high_priority_timeframe {
            base.timeframes.high = text;
        }
        if let Some(text) = cfg.medium_priority_timeframe {
            base.timeframes.medium = text;
        }
        if let Some(text) = cfg.low_priority_timeframe {
            base.timeframes.low = text;
        }
        if let Some(max) = cfg.max_suggestions {
            base.max_suggestions = max;
        }
        if let Some(max) = cfg.max_health_tips {
            base.max_health_tips = max;
        }
        base
    }
}

/// `metrics` là mảng chỉ số, hoặc object có trường `metrics`/`rows`.
/// Trả về `{ success, suggestions }`, gợi ý khẩn cấp nhất đứng đầu.
#[wasm_bindgen]
pub fn generate_appointment_tips(
    metrics: JsValue,
    user_id: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (metrics, cfg) = read_inputs(metrics, config)?;
    let mut engine = TipsEngine::new(cfg);
    let response = respond(&mut engine, metrics, user_id as i64);

    to_value(&response)
        .map_err(|err| JsValue::from_str(&format!("Không serialize danh sách gợi ý: {err}")))
}

/// Lời khuyên lối sống từ cùng dữ liệu chỉ số, tối đa `max_health_tips` mục.
#[wasm_bindgen]
pub fn generate_health_tips(
    metrics: JsValue,
    user_id: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (metrics, cfg) = read_inputs(metrics, config)?;
    let mut engine = TipsEngine::new(cfg);
    let response = respond_health_tips(&mut engine, metrics, user_id as i64);

    to_value(&response)
        .map_err(|err| JsValue::from_str(&format!("Không serialize danh sách lời khuyên: {err}")))
}

fn read_inputs(
    metrics: JsValue,
    config: Option<JsValue>,
) -> Result<(Vec<HealthMetric>, EngineConfig), JsValue> {
    let metrics_value = from_value::<serde_json::Value>(metrics)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON chỉ số: {err}")))?;
    let metrics = parse_metrics_value(&metrics_value)
        .map_err(|err| JsValue::from_str(&format_tips_error(err)))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsEngineConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            EngineConfig::from(cfg)
        }
        None => EngineConfig::default(),
    };
    Ok((metrics, cfg))
}

fn format_tips_error(err: TipsError) -> String {
    format!("Tips error: {err}")
}
