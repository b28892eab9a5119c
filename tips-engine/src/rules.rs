//! Threshold tables and per-metric analyzers.
//!
//! Every analyzer is pure: it reads a newest-first series of readings and
//! returns at most one [`Finding`]. Stamping a finding with an id, slots and
//! timestamps is the engine's job.

use tips_core::{DangerLevel, HealthMetric};

use crate::grouping::MetricGroups;

/// Readings of one metric family, newest first.
pub type Series<'a> = [&'a HealthMetric];

pub const SYSTOLIC_BP: &str = "systolic_bp";
pub const DIASTOLIC_BP: &str = "diastolic_bp";
pub const GLUCOSE_TYPES: [&str; 2] = ["blood_glucose", "glucose"];
pub const HBA1C: &str = "hba1c";
pub const CHOLESTEROL_TYPES: [&str; 3] = ["ldl_cholesterol", "cholesterol", "cholesterol_ldl"];
pub const WEIGHT: &str = "weight";
pub const BMI: &str = "bmi";
pub const OXYGEN_TYPES: [&str; 2] = ["spo2", "oxygen_saturation"];
pub const HEART_RATE: &str = "heart_rate";
pub const TEMPERATURE: &str = "temperature";

/// How the engine builds the id of a stamped suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStyle {
    /// `{key}_{millis}`
    Timestamp,
    /// `{key}_{millis}_{random base-36 suffix}`
    Salted,
    /// `{key}_{millis}_{seed}`
    Seeded(i64),
}

/// Suggestion content before it is stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub key: &'static str,
    pub id_style: IdStyle,
    pub danger_level: DangerLevel,
    pub specialty: &'static str,
    pub title: &'static str,
    pub reason: String,
    pub decline_consequence: &'static str,
    pub no_show_consequence: &'static str,
    pub related_metrics: Vec<String>,
}

/// One row of a single-value decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub level: DangerLevel,
    pub at_least: f64,
    pub specialty: &'static str,
    pub title: &'static str,
    /// Phrase completing the reason sentence.
    pub finding: &'static str,
    pub decline: &'static str,
    pub no_show: &'static str,
}

/// Ordered decision table, most severe row first.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub key: &'static str,
    pub id_style: IdStyle,
    pub related_metrics: &'static [&'static str],
    pub rules: &'static [ThresholdRule],
    pub describe: fn(f64, &str) -> String,
}

impl RuleSet {
    pub fn matching(&self, value: f64) -> Option<&ThresholdRule> {
        self.rules.iter().find(|rule| value >= rule.at_least)
    }

    fn evaluate(&self, value: f64) -> Option<Finding> {
        let rule = self.matching(value)?;
        Some(Finding {
            key: self.key,
            id_style: self.id_style,
            danger_level: rule.level,
            specialty: rule.specialty,
            title: rule.title,
            reason: (self.describe)(value, rule.finding),
            decline_consequence: rule.decline,
            no_show_consequence: rule.no_show,
            related_metrics: owned(self.related_metrics),
        })
    }
}

/// Blood pressure rows fire when either average reaches its bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodPressureRule {
    pub level: DangerLevel,
    pub systolic: f64,
    pub diastolic: f64,
    pub specialty: &'static str,
    pub title: &'static str,
    pub finding: &'static str,
    pub decline: &'static str,
    pub no_show: &'static str,
}

pub const BLOOD_PRESSURE_RULES: [BloodPressureRule; 3] = [
    BloodPressureRule {
        level: DangerLevel::Urgent,
        systolic: 160.0,
        diastolic: 100.0,
        specialty: "Cardiology",
        title: "Urgent Blood Pressure Management",
        finding: "severe hypertension requiring immediate attention",
        decline: "Uncontrolled hypertension significantly increases stroke and heart attack risk.",
        no_show: "Continued high risk; emergency symptoms may be missed.",
    },
    BloodPressureRule {
        level: DangerLevel::Elevated,
        systolic: 140.0,
        diastolic: 90.0,
        specialty: "General Practice",
        title: "Blood Pressure Management",
        finding: "hypertension that needs management",
        decline: "Hypertension can damage heart, kidneys, and eyes over time.",
        no_show: "Risk persists; medication and monitoring may be delayed.",
    },
    BloodPressureRule {
        level: DangerLevel::Routine,
        systolic: 130.0,
        diastolic: 80.0,
        specialty: "General Practice",
        title: "Blood Pressure Monitoring",
        finding: "elevated blood pressure",
        decline: "May progress to hypertension without lifestyle changes.",
        no_show: "Elevated blood pressure may worsen without monitoring.",
    },
];

const BLOOD_PRESSURE_METRICS: [&str; 3] = ["systolic_bp", "diastolic_bp", "blood_pressure"];

pub const GLUCOSE_RULES: RuleSet = RuleSet {
    key: "glucose",
    id_style: IdStyle::Salted,
    related_metrics: &["blood_glucose", "glucose", "fasting_glucose"],
    rules: &[
        ThresholdRule {
            level: DangerLevel::Urgent,
            at_least: 180.0,
            specialty: "Endocrinology",
            title: "Urgent Diabetes Management",
            finding: "severe hyperglycemia requiring immediate attention",
            decline: "High risk of acute diabetic complications and organ damage.",
            no_show: "Poor glucose control can lead to neuropathy, kidney, and eye disease.",
        },
        ThresholdRule {
            level: DangerLevel::Elevated,
            at_least: 126.0,
            specialty: "Endocrinology",
            title: "Diabetes Management",
            finding: "diabetes that needs management",
            decline: "Diabetes progression likely without proper treatment adjustment.",
            no_show: "Uncontrolled diabetes increases risk of serious complications.",
        },
        ThresholdRule {
            level: DangerLevel::Routine,
            at_least: 100.0,
            specialty: "General Practice",
            title: "Prediabetes Consultation",
            finding: "prediabetes",
            decline: "Prediabetes may progress to diabetes without lifestyle changes.",
            no_show: "Missed opportunity for diabetes prevention strategies.",
        },
    ],
    describe: describe_glucose,
};

pub const HBA1C_RULES: RuleSet = RuleSet {
    key: "hba1c",
    id_style: IdStyle::Timestamp,
    related_metrics: &["hba1c", "hemoglobin_a1c"],
    rules: &[
        ThresholdRule {
            level: DangerLevel::Urgent,
            at_least: 8.5,
            specialty: "Endocrinology",
            title: "Critical Diabetes Management",
            finding: "poor long-term glucose control requiring immediate intervention",
            decline: "High risk of acute complications and accelerated organ damage.",
            no_show: "Poor control can lead to severe neuropathy, kidney, and eye disease.",
        },
        ThresholdRule {
            level: DangerLevel::Elevated,
            at_least: 7.0,
            specialty: "Endocrinology",
            title: "Diabetes Management Review",
            finding: "suboptimal diabetes control",
            decline: "Diabetes progression likely without treatment adjustment.",
            no_show: "Continued poor control increases complication risk.",
        },
        ThresholdRule {
            level: DangerLevel::Routine,
            at_least: 5.7,
            specialty: "General Practice",
            title: "Prediabetes Management",
            finding: "prediabetes",
            decline: "Prediabetes may progress without lifestyle intervention.",
            no_show: "Missed diabetes prevention opportunity.",
        },
    ],
    describe: describe_hba1c,
};

pub const CHOLESTEROL_RULES: RuleSet = RuleSet {
    key: "cholesterol",
    id_style: IdStyle::Timestamp,
    related_metrics: &["ldl_cholesterol", "cholesterol", "total_cholesterol"],
    rules: &[
        ThresholdRule {
            level: DangerLevel::Elevated,
            at_least: 190.0,
            specialty: "Cardiology",
            title: "High Cholesterol Management",
            finding: "very high and requires medical attention",
            decline: "Elevated cardiovascular disease risk; statin therapy may be needed.",
            no_show: "Continued high cholesterol increases heart attack and stroke risk.",
        },
        ThresholdRule {
            level: DangerLevel::Routine,
            at_least: 160.0,
            specialty: "General Practice",
            title: "Cholesterol Review",
            finding: "borderline high",
            decline: "Cardiovascular risk may increase without intervention.",
            no_show: "Missed opportunity for cardiovascular risk reduction.",
        },
    ],
    describe: describe_cholesterol,
};

pub const OBESITY_BMI: f64 = 30.0;
pub const UNDERWEIGHT_BMI: f64 = 18.5;
/// Monthly weight change, in percent, that warrants a review.
pub const WEIGHT_CHANGE_PERCENT: f64 = 5.0;
pub const LOW_OXYGEN: f64 = 90.0;
pub const TACHYCARDIA_BPM: f64 = 100.0;
pub const BRADYCARDIA_BPM: f64 = 50.0;
pub const FEVER_CELSIUS: f64 = 38.0;

/// Runs every analyzer in its fixed order.
pub fn analyze_all(groups: &MetricGroups<'_>) -> Vec<Finding> {
    [
        analyze_blood_pressure(&groups.series(&[SYSTOLIC_BP]), &groups.series(&[DIASTOLIC_BP])),
        analyze_glucose(&groups.series(&GLUCOSE_TYPES)),
        analyze_hba1c(&groups.series(&[HBA1C])),
        analyze_cholesterol(&groups.series(&CHOLESTEROL_TYPES)),
        analyze_weight(&groups.series(&[WEIGHT]), &groups.series(&[BMI])),
        OXYGEN_TYPES
            .iter()
            .find_map(|alias| analyze_oxygen(groups.get(alias))),
        analyze_heart_rate(&groups.series(&[HEART_RATE])),
        analyze_temperature(&groups.series(&[TEMPERATURE])),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Averages up to three newest systolic and diastolic readings independently.
pub fn analyze_blood_pressure(systolic: &Series<'_>, diastolic: &Series<'_>) -> Option<Finding> {
    if systolic.is_empty() && diastolic.is_empty() {
        return None;
    }

    let avg_systolic = recent_average(systolic, 3);
    let avg_diastolic = recent_average(diastolic, 3);

    let rule = BLOOD_PRESSURE_RULES
        .iter()
        .find(|rule| avg_systolic >= rule.systolic || avg_diastolic >= rule.diastolic)?;

    Some(Finding {
        key: "bp",
        id_style: IdStyle::Salted,
        danger_level: rule.level,
        specialty: rule.specialty,
        title: rule.title,
        reason: format!(
            "Your blood pressure readings average {}/{} mmHg, indicating {}.",
            avg_systolic.round() as i64,
            avg_diastolic.round() as i64,
            rule.finding
        ),
        decline_consequence: rule.decline,
        no_show_consequence: rule.no_show,
        related_metrics: owned(&BLOOD_PRESSURE_METRICS),
    })
}

/// Judges the newest glucose reading across all glucose aliases.
pub fn analyze_glucose(readings: &Series<'_>) -> Option<Finding> {
    latest_against(readings, &GLUCOSE_RULES)
}

pub fn analyze_hba1c(readings: &Series<'_>) -> Option<Finding> {
    latest_against(readings, &HBA1C_RULES)
}

pub fn analyze_cholesterol(readings: &Series<'_>) -> Option<Finding> {
    latest_against(readings, &CHOLESTEROL_RULES)
}

/// BMI bands first, then the monthly-normalized change between the two newest
/// weights. A zero-day gap skips the change check.
pub fn analyze_weight(weights: &Series<'_>, bmis: &Series<'_>) -> Option<Finding> {
    if weights.is_empty() && bmis.is_empty() {
        return None;
    }

    let bmi = bmis
        .first()
        .and_then(|metric| metric.value_numeric)
        .filter(|value| *value != 0.0);

    let (level, title, reason, decline, no_show) = match bmi {
        Some(bmi) if bmi >= OBESITY_BMI => (
            DangerLevel::Routine,
            "Weight Management Consultation",
            format!("Your BMI of {bmi:.1} indicates obesity."),
            "Higher risk for diabetes, hypertension, and joint problems.",
            "Continued health risks from obesity without intervention.",
        ),
        Some(bmi) if bmi < UNDERWEIGHT_BMI => (
            DangerLevel::Elevated,
            "Underweight Assessment",
            format!("Your BMI of {bmi:.1} indicates you are underweight."),
            "Could indicate malnutrition or underlying illness.",
            "Potential underlying health issues may go undiagnosed.",
        ),
        _ => {
            let change = monthly_weight_change(weights)?;
            if change.abs() < WEIGHT_CHANGE_PERCENT {
                return None;
            }
            let (level, direction) = if change > 0.0 {
                (DangerLevel::Routine, "gain")
            } else {
                (DangerLevel::Elevated, "loss")
            };
            (
                level,
                "Significant Weight Change Review",
                format!(
                    "You've experienced a {:.1}% monthly weight {direction}.",
                    change.abs()
                ),
                "Rapid weight changes may indicate underlying health issues.",
                "Potential medical causes of weight change may be missed.",
            )
        }
    };

    Some(Finding {
        key: "weight",
        id_style: IdStyle::Timestamp,
        danger_level: level,
        specialty: "General Practice",
        title,
        reason,
        decline_consequence: decline,
        no_show_consequence: no_show,
        related_metrics: owned(&[WEIGHT, BMI]),
    })
}

/// Percent change between the two newest weights, scaled to a 30-day month.
pub fn monthly_weight_change(weights: &Series<'_>) -> Option<f64> {
    let [latest, previous, ..] = weights else {
        return None;
    };

    let days = (latest.metric_date - previous.metric_date).num_days() as f64;
    let previous_value = previous.numeric_or(0.0);
    if days <= 0.0 || previous_value <= 0.0 {
        return None;
    }

    let latest_value = latest.numeric_or(0.0);
    Some((latest_value - previous_value) / previous_value * 100.0 * (30.0 / days))
}

/// Fires only when two consecutive readings sit at or below the low bound.
/// `readings` must come from a single alias; pairs never span two series.
pub fn analyze_oxygen(readings: &Series<'_>) -> Option<Finding> {
    let pair = readings.windows(2).find(|pair| {
        pair.iter()
            .all(|metric| metric.numeric_or(100.0) <= LOW_OXYGEN)
    })?;

    let average = pair.iter().map(|metric| metric.numeric_or(0.0)).sum::<f64>() / 2.0;

    Some(Finding {
        key: "oxygen",
        id_style: IdStyle::Timestamp,
        danger_level: DangerLevel::Urgent,
        specialty: "Emergency Medicine",
        title: "Urgent Oxygen Saturation Assessment",
        reason: format!(
            "Your oxygen saturation readings of {average:.1}% are critically low and require immediate evaluation."
        ),
        decline_consequence: "Hypoxemia can be a medical emergency.",
        no_show_consequence: "Life-threatening respiratory issues may go untreated.",
        related_metrics: owned(&OXYGEN_TYPES),
    })
}

pub fn analyze_heart_rate(readings: &Series<'_>) -> Option<Finding> {
    if readings.is_empty() {
        return None;
    }

    let average = recent_average(readings, 3);
    let rounded = average.round() as i64;

    let (key, title, reason, decline, no_show) = if average > TACHYCARDIA_BPM {
        (
            "hr_high",
            "Elevated Heart Rate Assessment",
            format!(
                "Your average resting heart rate of {rounded} bpm is elevated and should be evaluated."
            ),
            "Persistent tachycardia may indicate underlying cardiac issues.",
            "Potential heart rhythm disorders may go undiagnosed.",
        )
    } else if average < BRADYCARDIA_BPM {
        (
            "hr_low",
            "Low Heart Rate Evaluation",
            format!("Your average resting heart rate of {rounded} bpm is unusually low."),
            "Bradycardia may indicate medication effects or cardiac conduction issues.",
            "Underlying causes of slow heart rate may be missed.",
        )
    } else {
        return None;
    };

    Some(Finding {
        key,
        id_style: IdStyle::Timestamp,
        danger_level: DangerLevel::Elevated,
        specialty: "Cardiology",
        title,
        reason,
        decline_consequence: decline,
        no_show_consequence: no_show,
        related_metrics: owned(&[HEART_RATE]),
    })
}

/// Both of the two newest readings must be febrile.
pub fn analyze_temperature(readings: &Series<'_>) -> Option<Finding> {
    let recent = &readings[..readings.len().min(2)];
    let fevers: Vec<f64> = recent
        .iter()
        .map(|metric| metric.numeric_or(0.0))
        .filter(|value| *value >= FEVER_CELSIUS)
        .collect();

    if fevers.len() < 2 {
        return None;
    }

    let average = fevers.iter().sum::<f64>() / fevers.len() as f64;

    Some(Finding {
        key: "fever",
        id_style: IdStyle::Timestamp,
        danger_level: DangerLevel::Elevated,
        specialty: "General Practice",
        title: "Persistent Fever Evaluation",
        reason: format!(
            "You've had persistent fever averaging {average:.1}°C that requires medical evaluation."
        ),
        decline_consequence: "Ongoing fever may indicate serious infection or other medical conditions.",
        no_show_consequence: "Underlying cause of fever may worsen without treatment.",
        related_metrics: owned(&[TEMPERATURE]),
    })
}

fn describe_glucose(value: f64, finding: &str) -> String {
    format!("Your latest fasting glucose reading of {value} mg/dL indicates {finding}.")
}

fn describe_hba1c(value: f64, finding: &str) -> String {
    format!("Your HbA1c of {value}% indicates {finding}.")
}

fn describe_cholesterol(value: f64, finding: &str) -> String {
    format!("Your LDL cholesterol of {value} mg/dL is {finding}.")
}

fn latest_against(readings: &Series<'_>, rules: &RuleSet) -> Option<Finding> {
    let latest = readings.first()?;
    rules.evaluate(latest.numeric_or(0.0))
}

/// Mean of up to `window` newest readings; missing values count as zero.
pub(crate) fn recent_average(readings: &Series<'_>, window: usize) -> f64 {
    let recent = &readings[..readings.len().min(window)];
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().map(|metric| metric.numeric_or(0.0)).sum::<f64>() / recent.len() as f64
}

pub(crate) fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn readings(metric_type: &str, values: &[f64]) -> Vec<HealthMetric> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| HealthMetric::numeric(metric_type, day(28 - i as u32), *value))
            .collect()
    }

    fn refs(metrics: &[HealthMetric]) -> Vec<&HealthMetric> {
        metrics.iter().collect()
    }

    fn bp_level(systolic: f64, diastolic: f64) -> Option<DangerLevel> {
        let sys = readings(SYSTOLIC_BP, &[systolic]);
        let dia = readings(DIASTOLIC_BP, &[diastolic]);
        analyze_blood_pressure(&refs(&sys), &refs(&dia)).map(|f| f.danger_level)
    }

    #[test]
    fn blood_pressure_boundaries() {
        assert_eq!(bp_level(129.0, 79.0), None);
        assert_eq!(bp_level(130.0, 79.0), Some(DangerLevel::Routine));
        assert_eq!(bp_level(139.0, 89.0), Some(DangerLevel::Routine));
        assert_eq!(bp_level(120.0, 80.0), Some(DangerLevel::Routine));
        assert_eq!(bp_level(140.0, 70.0), Some(DangerLevel::Elevated));
        assert_eq!(bp_level(120.0, 90.0), Some(DangerLevel::Elevated));
        assert_eq!(bp_level(160.0, 70.0), Some(DangerLevel::Urgent));
        assert_eq!(bp_level(120.0, 100.0), Some(DangerLevel::Urgent));
    }

    #[test]
    fn blood_pressure_averages_three_newest() {
        let sys = readings(SYSTOLIC_BP, &[150.0, 140.0, 130.0, 200.0]);
        let finding = analyze_blood_pressure(&refs(&sys), &[]).unwrap();

        assert_eq!(finding.danger_level, DangerLevel::Elevated);
        assert_eq!(
            finding.reason,
            "Your blood pressure readings average 140/0 mmHg, indicating hypertension that needs management."
        );
    }

    #[test]
    fn urgent_blood_pressure_goes_to_cardiology() {
        let sys = readings(SYSTOLIC_BP, &[165.0]);
        let dia = readings(DIASTOLIC_BP, &[105.0]);
        let finding = analyze_blood_pressure(&refs(&sys), &refs(&dia)).unwrap();

        assert_eq!(finding.title, "Urgent Blood Pressure Management");
        assert_eq!(finding.specialty, "Cardiology");
        assert_eq!(finding.related_metrics, ["systolic_bp", "diastolic_bp", "blood_pressure"]);
    }

    #[test]
    fn glucose_hba1c_and_cholesterol_boundaries() {
        let level = |rules: &RuleSet, value: f64| rules.matching(value).map(|rule| rule.level);

        assert_eq!(level(&GLUCOSE_RULES, 99.9), None);
        assert_eq!(level(&GLUCOSE_RULES, 100.0), Some(DangerLevel::Routine));
        assert_eq!(level(&GLUCOSE_RULES, 126.0), Some(DangerLevel::Elevated));
        assert_eq!(level(&GLUCOSE_RULES, 180.0), Some(DangerLevel::Urgent));

        assert_eq!(level(&HBA1C_RULES, 5.6), None);
        assert_eq!(level(&HBA1C_RULES, 5.7), Some(DangerLevel::Routine));
        assert_eq!(level(&HBA1C_RULES, 7.0), Some(DangerLevel::Elevated));
        assert_eq!(level(&HBA1C_RULES, 8.5), Some(DangerLevel::Urgent));

        assert_eq!(level(&CHOLESTEROL_RULES, 159.0), None);
        assert_eq!(level(&CHOLESTEROL_RULES, 160.0), Some(DangerLevel::Routine));
        assert_eq!(level(&CHOLESTEROL_RULES, 190.0), Some(DangerLevel::Elevated));
        assert_eq!(level(&CHOLESTEROL_RULES, 400.0), Some(DangerLevel::Elevated));
    }

    #[test]
    fn glucose_reason_keeps_reading_as_entered() {
        let metrics = readings("blood_glucose", &[131.0, 90.0]);
        let finding = analyze_glucose(&refs(&metrics)).unwrap();
        assert_eq!(
            finding.reason,
            "Your latest fasting glucose reading of 131 mg/dL indicates diabetes that needs management."
        );
        assert_eq!(finding.specialty, "Endocrinology");
    }

    #[test]
    fn hba1c_reason_keeps_decimal() {
        let metrics = readings(HBA1C, &[7.2]);
        let finding = analyze_hba1c(&refs(&metrics)).unwrap();
        assert_eq!(finding.reason, "Your HbA1c of 7.2% indicates suboptimal diabetes control.");
    }

    #[test]
    fn bmi_bands_take_precedence_over_weight_change() {
        let bmi = readings(BMI, &[31.24]);
        let finding = analyze_weight(&[], &refs(&bmi)).unwrap();
        assert_eq!(finding.danger_level, DangerLevel::Routine);
        assert_eq!(finding.reason, "Your BMI of 31.2 indicates obesity.");

        let bmi = readings(BMI, &[17.0]);
        let finding = analyze_weight(&[], &refs(&bmi)).unwrap();
        assert_eq!(finding.danger_level, DangerLevel::Elevated);
        assert_eq!(finding.title, "Underweight Assessment");
    }

    #[test]
    fn weight_change_is_normalized_to_a_month() {
        let weights = vec![
            HealthMetric::numeric(WEIGHT, day(16), 84.0),
            HealthMetric::numeric(WEIGHT, day(1), 80.0),
        ];
        // 5% over 15 days is 10% per month.
        let change = monthly_weight_change(&refs(&weights)).unwrap();
        assert!((change - 10.0).abs() < 1e-9);

        let finding = analyze_weight(&refs(&weights), &[]).unwrap();
        assert_eq!(finding.danger_level, DangerLevel::Routine);
        assert_eq!(finding.reason, "You've experienced a 10.0% monthly weight gain.");

        let losing = vec![
            HealthMetric::numeric(WEIGHT, day(31), 72.0),
            HealthMetric::numeric(WEIGHT, day(1), 80.0),
        ];
        let finding = analyze_weight(&refs(&losing), &[]).unwrap();
        assert_eq!(finding.danger_level, DangerLevel::Elevated);
        assert!(finding.reason.ends_with("monthly weight loss."));
    }

    #[test]
    fn same_day_weights_skip_change_check() {
        let weights = vec![
            HealthMetric::numeric(WEIGHT, day(5), 95.0),
            HealthMetric::numeric(WEIGHT, day(5), 70.0),
        ];
        assert_eq!(monthly_weight_change(&refs(&weights)), None);
        assert!(analyze_weight(&refs(&weights), &[]).is_none());
    }

    #[test]
    fn single_low_oxygen_reading_is_ignored() {
        let metrics = readings("spo2", &[97.0, 85.0, 96.0, 98.0]);
        assert!(analyze_oxygen(&refs(&metrics)).is_none());
    }

    #[test]
    fn consecutive_low_oxygen_readings_are_urgent() {
        let metrics = readings("spo2", &[97.0, 89.0, 88.0]);
        let finding = analyze_oxygen(&refs(&metrics)).unwrap();

        assert_eq!(finding.danger_level, DangerLevel::Urgent);
        assert_eq!(finding.specialty, "Emergency Medicine");
        assert!(finding.reason.contains("88.5%"));
    }

    #[test]
    fn oxygen_pairs_never_span_aliases() {
        let metrics = vec![
            HealthMetric::numeric("spo2", day(14), 97.0),
            HealthMetric::numeric("spo2", day(1), 88.0),
            HealthMetric::numeric("oxygen_saturation", day(14), 89.0),
            HealthMetric::numeric("oxygen_saturation", day(13), 98.0),
        ];
        let findings = analyze_all(&MetricGroups::new(&metrics));
        assert!(findings.iter().all(|f| f.key != "oxygen"));
    }

    #[test]
    fn oxygen_saturation_alias_is_analyzed() {
        let metrics = readings("oxygen_saturation", &[89.0, 87.0]);
        let findings = analyze_all(&MetricGroups::new(&metrics));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, "Urgent Oxygen Saturation Assessment");
        assert_eq!(findings[0].related_metrics, ["spo2", "oxygen_saturation"]);
        assert!(findings[0].reason.contains("88.0%"));
    }

    #[test]
    fn every_cholesterol_alias_is_analyzed() {
        for alias in CHOLESTEROL_TYPES {
            let metrics = readings(alias, &[195.0]);
            let findings = analyze_all(&MetricGroups::new(&metrics));

            assert_eq!(findings.len(), 1, "{alias}");
            assert_eq!(findings[0].title, "High Cholesterol Management");
            assert_eq!(findings[0].danger_level, DangerLevel::Elevated);
        }
    }

    #[test]
    fn blood_glucose_wins_over_glucose() {
        let metrics = vec![
            HealthMetric::numeric("glucose", day(28), 200.0),
            HealthMetric::numeric("blood_glucose", day(20), 95.0),
        ];
        assert!(analyze_all(&MetricGroups::new(&metrics)).is_empty());

        let metrics = vec![
            HealthMetric::numeric("glucose", day(28), 90.0),
            HealthMetric::numeric("blood_glucose", day(20), 130.0),
        ];
        let findings = analyze_all(&MetricGroups::new(&metrics));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, "Diabetes Management");
        assert!(findings[0].reason.contains("130 mg/dL"));
    }

    #[test]
    fn normal_bmi_falls_through_to_weight_change() {
        let bmi = readings(BMI, &[24.0]);
        let weights = vec![
            HealthMetric::numeric(WEIGHT, day(16), 84.0),
            HealthMetric::numeric(WEIGHT, day(1), 80.0),
        ];
        let finding = analyze_weight(&refs(&weights), &refs(&bmi)).unwrap();
        assert_eq!(finding.title, "Significant Weight Change Review");
        assert_eq!(finding.danger_level, DangerLevel::Routine);

        let steady = vec![
            HealthMetric::numeric(WEIGHT, day(16), 80.5),
            HealthMetric::numeric(WEIGHT, day(1), 80.0),
        ];
        assert!(analyze_weight(&refs(&steady), &refs(&bmi)).is_none());
    }

    #[test]
    fn heart_rate_flags_both_extremes() {
        let fast = readings(HEART_RATE, &[110.0, 104.0, 99.0]);
        let finding = analyze_heart_rate(&refs(&fast)).unwrap();
        assert_eq!(finding.key, "hr_high");
        assert_eq!(finding.danger_level, DangerLevel::Elevated);

        let slow = readings(HEART_RATE, &[45.0, 48.0]);
        assert_eq!(analyze_heart_rate(&refs(&slow)).unwrap().key, "hr_low");

        let normal = readings(HEART_RATE, &[100.0, 50.0]);
        assert!(analyze_heart_rate(&refs(&normal)).is_none());
    }

    #[test]
    fn fever_requires_both_recent_readings() {
        let single = readings(TEMPERATURE, &[38.5, 37.0, 39.0]);
        assert!(analyze_temperature(&refs(&single)).is_none());

        let persistent = readings(TEMPERATURE, &[38.0, 38.6]);
        let finding = analyze_temperature(&refs(&persistent)).unwrap();
        assert_eq!(finding.danger_level, DangerLevel::Elevated);
        assert_eq!(
            finding.reason,
            "You've had persistent fever averaging 38.3°C that requires medical evaluation."
        );
    }
}
