use std::fs;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tips_core::EngineConfig;
use tips_engine::response::sort_newest_first;
use tips_engine::{parse_metrics_str, FixedClock, Seed, TipsEngine, TipsResponse};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn urgent_blood_pressure_matches_golden() {
    let rows = fs::read_to_string(fixture_path("urgent_bp_metrics.json"))
        .expect("Không đọc được dữ liệu chỉ số mẫu");
    let mut metrics = parse_metrics_str(&rows).expect("Không parse được chỉ số");
    sort_newest_first(&mut metrics);

    // Wednesday 2024-03-06 08:00 UTC; seed 7 adds no supplementary items.
    let now = Utc.with_ymd_and_hms(2024, 3, 6, 8, 0, 0).unwrap();
    let mut engine = TipsEngine::new(EngineConfig::default())
        .with_clock(FixedClock::from_utc(now))
        .with_rng(StdRng::seed_from_u64(11));

    let suggestions = engine.generate_with_seed(&metrics, Seed::new(7));
    let id = &suggestions[0].id;
    assert!(id.starts_with("bp_1709712000000_"), "unexpected id {id}");
    assert_eq!(id.len(), "bp_1709712000000_".len() + 9);
    assert_eq!(suggestions[0].created_at, now);

    let response = TipsResponse::from_suggestions(suggestions);
    let mut actual = serde_json::to_value(response).expect("Không serialize response");
    normalize_dynamic_fields(&mut actual);

    let expected = fs::read_to_string(fixture_path("urgent_bp_tips.json"))
        .expect("Không đọc được golden response");
    let expected_value: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected_value);
}

fn normalize_dynamic_fields(value: &mut Value) {
    let Some(suggestions) = value.get_mut("suggestions").and_then(Value::as_array_mut) else {
        return;
    };
    for suggestion in suggestions {
        if let Some(obj) = suggestion.as_object_mut() {
            obj.insert("id".to_string(), Value::String("__DYNAMIC_ID__".to_string()));
            obj.insert(
                "created_at".to_string(),
                Value::String("__DYNAMIC_TIMESTAMP__".to_string()),
            );
        }
    }
}
