//! Mô hình dữ liệu lõi cho gợi ý lịch khám: chỉ số sức khỏe, gợi ý, cấu hình.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Định dạng hiển thị của một khung giờ đề xuất (`YYYY-MM-DD HH:MM`).
pub const SLOT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Nhãn thời hạn hiển thị cho từng mức độ nguy hiểm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeframeConfig {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl Default for TimeframeConfig {
    fn default() -> Self {
        Self {
            high: "within 7 days".to_string(),
            medium: "within 2 weeks".to_string(),
            low: "within 4-6 weeks".to_string(),
        }
    }
}

/// Cấu hình điều chỉnh engine gợi ý.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    pub timeframes: TimeframeConfig,
    /// Số gợi ý tối đa trả về sau khi xáo trộn.
    pub max_suggestions: usize,
    /// Số ngày hoãn mặc định khi người dùng chọn "snooze".
    pub default_snooze_days: u32,
    /// Số lời khuyên sức khỏe tối đa trả về.
    pub max_health_tips: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeframes: TimeframeConfig::default(),
            max_suggestions: 4,
            default_snooze_days: 7,
            max_health_tips: 5,
        }
    }
}

impl EngineConfig {
    pub const HIGH_PRIORITY_ENV: &'static str = "HIGH_PRIORITY_TIMEFRAME";
    pub const MEDIUM_PRIORITY_ENV: &'static str = "MEDIUM_PRIORITY_TIMEFRAME";
    pub const LOW_PRIORITY_ENV: &'static str = "LOW_PRIORITY_TIMEFRAME";

    /// Đọc cấu hình từ biến môi trường, giữ giá trị mặc định khi thiếu.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Dựng cấu hình từ một hàm tra cứu khóa bất kỳ (env, file, test).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let pick = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(high) = pick(Self::HIGH_PRIORITY_ENV) {
            config.timeframes.high = high;
        }
        if let Some(medium) = pick(Self::MEDIUM_PRIORITY_ENV) {
            config.timeframes.medium = medium;
        }
        if let Some(low) = pick(Self::LOW_PRIORITY_ENV) {
            config.timeframes.low = low;
        }
        config
    }

    /// Nhãn thời hạn tương ứng với mức độ nguy hiểm.
    pub fn timeframe_for(&self, level: DangerLevel) -> &str {
        match level {
            DangerLevel::Urgent => &self.timeframes.high,
            DangerLevel::Elevated => &self.timeframes.medium,
            DangerLevel::Routine => &self.timeframes.low,
        }
    }
}

/// Mức độ nguy hiểm của một gợi ý; 3 là khẩn cấp nhất.
///
/// Được serialize dưới dạng số nguyên 1, 2 hoặc 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub enum DangerLevel {
    Routine = 1,
    Elevated = 2,
    Urgent = 3,
}

impl DangerLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<DangerLevel> for u8 {
    fn from(level: DangerLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for DangerLevel {
    type Error = TipsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Routine),
            2 => Ok(Self::Elevated),
            3 => Ok(Self::Urgent),
            other => Err(TipsError::InvalidDangerLevel(other)),
        }
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Một lần đo chỉ số sức khỏe của người dùng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de::metric_date")]
    pub metric_date: NaiveDate,
    pub metric_type: String,
    #[serde(default, deserialize_with = "de::optional_number")]
    pub value_numeric: Option<f64>,
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl HealthMetric {
    /// Tạo nhanh một chỉ số dạng số (dùng cho caller và test).
    pub fn numeric(metric_type: impl Into<String>, metric_date: NaiveDate, value: f64) -> Self {
        Self {
            id: None,
            metric_date,
            metric_type: metric_type.into(),
            value_numeric: Some(value),
            value_text: None,
            unit: None,
        }
    }

    /// Giá trị số, hoặc `fallback` khi không có (0 cũng bị coi là không có).
    pub fn numeric_or(&self, fallback: f64) -> f64 {
        match self.value_numeric {
            Some(value) if value != 0.0 && !value.is_nan() => value,
            _ => fallback,
        }
    }
}

/// Gợi ý lịch khám sinh ra cho một lần gọi engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentSuggestion {
    pub id: String,
    pub title: String,
    pub specialty: String,
    pub danger_level: DangerLevel,
    pub timeframe: String,
    pub proposed_slots: Vec<String>,
    pub reason: String,
    pub decline_consequence: String,
    pub no_show_consequence: String,
    pub related_metrics: Vec<String>,
    #[serde(serialize_with = "ser::utc_millis")]
    pub created_at: DateTime<Utc>,
}

/// Mức ưu tiên của một lời khuyên sức khỏe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lời khuyên lối sống sinh ra từ lịch sử chỉ số, không kèm lịch hẹn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthSuggestion {
    pub id: String,
    pub suggestion_text: String,
    pub category: String,
    pub priority: Priority,
    pub related_metrics: Vec<String>,
    #[serde(serialize_with = "ser::utc_millis")]
    pub created_at: DateTime<Utc>,
}

/// Trạng thái của gợi ý sau khi được lưu lại ở phía caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Snoozed,
}

impl SuggestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Snoozed => "snoozed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lỗi chung của engine gợi ý và các lớp biên.
#[derive(Debug, thiserror::Error)]
pub enum TipsError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Mức độ nguy hiểm không hợp lệ: {0}")]
    InvalidDangerLevel(u8),
    #[error("Không thể {action} gợi ý đang ở trạng thái {from}")]
    InvalidTransition {
        from: SuggestionStatus,
        action: &'static str,
    },
    #[error("Cần chọn khung giờ để chấp nhận gợi ý")]
    MissingSlot,
    #[error("Lỗi khác: {0}")]
    Other(String),
}

mod ser {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    /// ISO 8601 với mili giây và hậu tố `Z`, ví dụ `2024-03-06T08:00:00.000Z`.
    pub(crate) fn utc_millis<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

mod de {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub(crate) fn metric_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let day = raw.trim().get(..10).unwrap_or(raw.trim());
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|err| D::Error::custom(format!("metric_date {raw:?}: {err}")))
    }

    pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<f64>()
                    .map(Some)
                    .map_err(|err| D::Error::custom(format!("value_numeric {text:?}: {err}")))
            }
        }
    }
}
