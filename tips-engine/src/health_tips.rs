//! Lifestyle tips drawn from the same metric history as the appointment
//! suggestions: per-metric advice plus seeded rotations of general tips.
//!
//! Tips carry a [`Priority`] and a category instead of a danger level, and
//! never propose appointment slots.

use chrono::{DateTime, FixedOffset, Utc};
use tips_core::{HealthMetric, HealthSuggestion, Priority};

use crate::grouping::MetricGroups;
use crate::rules::{
    owned, recent_average, Series, BMI, DIASTOLIC_BP, GLUCOSE_TYPES, HEART_RATE, SYSTOLIC_BP,
    WEIGHT,
};
use crate::seed::Seed;

pub const WELLNESS_TIPS: [&str; 10] = [
    "Stay hydrated by drinking at least 8 glasses of water daily.",
    "Aim for 7-9 hours of quality sleep each night for optimal health.",
    "Take short breaks every hour if you work at a desk to reduce strain.",
    "Practice deep breathing exercises for 5 minutes daily to reduce stress.",
    "Include more colorful fruits and vegetables in your daily meals.",
    "Consider taking a daily multivitamin to support overall nutrition.",
    "Limit screen time before bed to improve sleep quality.",
    "Practice good posture throughout the day to prevent back pain.",
    "Consider meditation or mindfulness practices for mental well-being.",
    "Wash your hands frequently to prevent illness.",
];

pub const EXERCISE_TIPS: [&str; 8] = [
    "Aim for at least 150 minutes of moderate-intensity aerobic activity per week.",
    "Include strength training exercises at least 2 days per week.",
    "Try taking a 10-minute walk after meals to help with digestion and blood sugar control.",
    "Consider yoga or stretching routines to improve flexibility and reduce stress.",
    "Take the stairs instead of elevators when possible for extra daily activity.",
    "Try high-intensity interval training (HIIT) for efficient cardiovascular workouts.",
    "Include balance exercises in your routine to prevent falls as you age.",
    "Find physical activities you enjoy to make exercise feel less like a chore.",
];

pub const NUTRITION_TIPS: [&str; 8] = [
    "Follow the Mediterranean diet pattern for heart and brain health.",
    "Limit processed foods and choose whole, unprocessed options when possible.",
    "Include omega-3 rich foods like fish, walnuts, and flaxseeds in your diet.",
    "Practice portion control by using smaller plates and eating slowly.",
    "Limit added sugars to less than 10% of your daily caloric intake.",
    "Include probiotic foods like yogurt and fermented vegetables for gut health.",
    "Plan your meals in advance to make healthier food choices.",
    "Read nutrition labels to make informed food choices.",
];

pub const LIFESTYLE_TIPS: [&str; 8] = [
    "Maintain social connections as they're important for mental and physical health.",
    "Spend time in nature regularly to reduce stress and improve mood.",
    "Limit alcohol consumption to moderate levels for better health outcomes.",
    "Avoid smoking and secondhand smoke to protect your lungs and heart.",
    "Practice stress management techniques like journaling or hobbies you enjoy.",
    "Consider regular health screenings appropriate for your age and risk factors.",
    "Create a relaxing bedtime routine to improve sleep quality.",
    "Practice gratitude by writing down three things you're thankful for each day.",
];

/// Weight change between the two newest readings, in kg, worth a tip.
pub const WEIGHT_CHANGE_KG: f64 = 2.0;
pub const OVERWEIGHT_BMI: f64 = 25.0;

const BLOOD_PRESSURE: &str = "Blood Pressure";
const WEIGHT_MANAGEMENT: &str = "Weight Management";
const CARDIOVASCULAR: &str = "Cardiovascular Health";
const BLOOD_SUGAR: &str = "Blood Sugar";

/// Tip content before it is stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub key: &'static str,
    /// Position inside a multi-tip rotation, appended to the id.
    pub index: Option<usize>,
    pub text: String,
    pub category: &'static str,
    pub priority: Priority,
    pub related_metrics: Vec<String>,
}

impl Tip {
    fn new(
        key: &'static str,
        text: impl Into<String>,
        category: &'static str,
        priority: Priority,
        related_metrics: &[&str],
    ) -> Self {
        Self {
            key,
            index: None,
            text: text.into(),
            category,
            priority,
            related_metrics: owned(related_metrics),
        }
    }

    /// `{key}_{millis}`, or `{key}_{millis}_{index}` inside a rotation.
    pub fn stamp(self, now: DateTime<FixedOffset>) -> HealthSuggestion {
        let millis = now.timestamp_millis();
        let id = match self.index {
            Some(index) => format!("{}_{millis}_{index}", self.key),
            None => format!("{}_{millis}", self.key),
        };
        HealthSuggestion {
            id,
            suggestion_text: self.text,
            category: self.category.to_string(),
            priority: self.priority,
            related_metrics: self.related_metrics,
            created_at: now.with_timezone(&Utc),
        }
    }
}

/// Every tip for `metrics` (newest first per type) before shuffling.
pub fn collect_tips(groups: &MetricGroups<'_>, seed: Seed) -> Vec<Tip> {
    let mut tips = vec![blood_pressure_tip(
        &groups.series(&[SYSTOLIC_BP]),
        &groups.series(&[DIASTOLIC_BP]),
    )];
    tips.extend(weight_tips(&groups.series(&[WEIGHT]), &groups.series(&[BMI])));
    tips.extend(heart_rate_tip(&groups.series(&[HEART_RATE]), seed));
    tips.extend(glucose_tip(&groups.series(&GLUCOSE_TYPES), seed));
    tips.extend(wellness_tips(seed));
    tips.extend(exercise_tip(seed));
    tips.extend(nutrition_tip(seed));
    tips.extend(lifestyle_tip(seed));
    tips
}

/// Collects, stamps, shuffles with the seed and keeps the first `limit`.
pub fn generate_health_tips(
    metrics: &[HealthMetric],
    seed: Seed,
    now: DateTime<FixedOffset>,
    limit: usize,
) -> Vec<HealthSuggestion> {
    let groups = MetricGroups::new(metrics);
    let mut tips: Vec<HealthSuggestion> = collect_tips(&groups, seed)
        .into_iter()
        .map(|tip| tip.stamp(now))
        .collect();
    tracing::debug!(collected = tips.len(), seed = seed.value(), "health tips collected");

    seed.shuffle(&mut tips);
    tips.truncate(limit);
    tips
}

/// Always one tip: a tracking nudge without readings, otherwise a band
/// from the averages of the three newest readings.
pub fn blood_pressure_tip(systolic: &Series<'_>, diastolic: &Series<'_>) -> Tip {
    if systolic.is_empty() && diastolic.is_empty() {
        return Tip::new(
            "bp_track",
            "Start tracking your blood pressure regularly to monitor cardiovascular health.",
            BLOOD_PRESSURE,
            Priority::Medium,
            &["blood_pressure"],
        );
    }

    let avg_systolic = recent_average(systolic, 3);
    let avg_diastolic = recent_average(diastolic, 3);
    let related = [SYSTOLIC_BP, DIASTOLIC_BP];

    if avg_systolic >= 140.0 || avg_diastolic >= 90.0 {
        Tip::new(
            "bp_high",
            "Your blood pressure readings are elevated. Consider reducing sodium intake, increasing physical activity, and managing stress.",
            BLOOD_PRESSURE,
            Priority::High,
            &related,
        )
    } else if avg_systolic >= 130.0 || avg_diastolic >= 80.0 {
        Tip::new(
            "bp_borderline",
            "Your blood pressure is in the elevated range. Focus on regular exercise, a heart-healthy diet, and stress management.",
            BLOOD_PRESSURE,
            Priority::Medium,
            &related,
        )
    } else {
        Tip::new(
            "bp_good",
            "Great job maintaining healthy blood pressure! Keep up with regular exercise and a balanced diet.",
            BLOOD_PRESSURE,
            Priority::Low,
            &related,
        )
    }
}

/// Up to two tips: absolute change between the two newest weights, then
/// the newest BMI band.
pub fn weight_tips(weights: &Series<'_>, bmis: &Series<'_>) -> Vec<Tip> {
    if weights.is_empty() && bmis.is_empty() {
        return vec![Tip::new(
            "weight_track",
            "Consider tracking your weight and BMI regularly to monitor overall health trends.",
            WEIGHT_MANAGEMENT,
            Priority::Medium,
            &[WEIGHT, BMI],
        )];
    }

    let mut tips = Vec::new();

    if let [latest, previous, ..] = weights {
        let change = latest.numeric_or(0.0) - previous.numeric_or(0.0);
        if change.abs() >= WEIGHT_CHANGE_KG {
            let (direction, advice) = if change > 0.0 {
                ("gain", "reviewing your diet and exercise routine")
            } else {
                (
                    "loss",
                    "ensuring adequate nutrition and consulting a healthcare provider if unintentional",
                )
            };
            tips.push(Tip::new(
                "weight_change",
                format!(
                    "You've had a {direction} of {:.1}kg. Consider {advice}.",
                    change.abs()
                ),
                WEIGHT_MANAGEMENT,
                Priority::Medium,
                &[WEIGHT],
            ));
        }
    }

    let bmi = bmis.first().map(|metric| metric.numeric_or(0.0)).unwrap_or(0.0);
    let band = if bmi == 0.0 {
        None
    } else if bmi >= 30.0 {
        Some((
            "bmi_obese",
            "Your BMI indicates obesity. Consider consulting a nutritionist and incorporating regular physical activity into your routine.",
            Priority::High,
        ))
    } else if bmi >= OVERWEIGHT_BMI {
        Some((
            "bmi_overweight",
            "Your BMI is in the overweight range. Focus on portion control, balanced nutrition, and regular exercise.",
            Priority::Medium,
        ))
    } else if bmi < 18.5 {
        Some((
            "bmi_underweight",
            "Your BMI indicates you're underweight. Consider increasing caloric intake with nutrient-dense foods and consulting a healthcare provider.",
            Priority::Medium,
        ))
    } else {
        None
    };

    if let Some((key, text, priority)) = band {
        tips.push(Tip::new(key, text, WEIGHT_MANAGEMENT, priority, &[BMI, WEIGHT]));
    }
    tips
}

/// Without readings, a tracking nudge on one seed in three.
pub fn heart_rate_tip(readings: &Series<'_>, seed: Seed) -> Option<Tip> {
    if readings.is_empty() {
        return (seed.residue(3) == 0).then(|| {
            Tip::new(
                "hr_track",
                "Consider tracking your resting heart rate to monitor cardiovascular fitness improvements over time.",
                CARDIOVASCULAR,
                Priority::Low,
                &[HEART_RATE],
            )
        });
    }

    let average = recent_average(readings, 3);
    if average > 100.0 {
        Some(Tip::new(
            "hr_high",
            "Your resting heart rate is elevated. Practice relaxation techniques, ensure adequate sleep, and consider consulting a healthcare provider.",
            CARDIOVASCULAR,
            Priority::Medium,
            &[HEART_RATE],
        ))
    } else if (60.0..=80.0).contains(&average) {
        Some(Tip::new(
            "hr_good",
            "Your heart rate is in a healthy range! Regular cardio exercise can help improve your cardiovascular fitness further.",
            CARDIOVASCULAR,
            Priority::Low,
            &[HEART_RATE],
        ))
    } else {
        None
    }
}

/// Judges the first reading of the merged glucose series; without readings,
/// an awareness nudge on one seed in four.
pub fn glucose_tip(readings: &Series<'_>, seed: Seed) -> Option<Tip> {
    let Some(latest) = readings.first() else {
        return (seed.residue(4) == 0).then(|| {
            Tip::new(
                "glucose_awareness",
                "Consider periodic blood glucose monitoring, especially if you have risk factors for diabetes.",
                BLOOD_SUGAR,
                Priority::Low,
                &["blood_glucose"],
            )
        });
    };

    let value = latest.numeric_or(0.0);
    if value >= 126.0 {
        Some(Tip::new(
            "glucose_high",
            "Your blood glucose levels are elevated. Focus on low-glycemic foods, regular exercise, and consider consulting an endocrinologist.",
            BLOOD_SUGAR,
            Priority::High,
            &GLUCOSE_TYPES,
        ))
    } else if value >= 100.0 {
        Some(Tip::new(
            "glucose_prediabetic",
            "Your blood glucose is in the prediabetic range. Adopt a low-sugar diet, increase physical activity, and maintain a healthy weight.",
            BLOOD_SUGAR,
            Priority::Medium,
            &GLUCOSE_TYPES,
        ))
    } else {
        None
    }
}

/// `seed % 2 + 1` consecutive tips starting at `seed % 10`.
pub fn wellness_tips(seed: Seed) -> Vec<Tip> {
    let start = seed.rotation_index(WELLNESS_TIPS.len());
    (0..seed.residue(2) + 1)
        .map(|offset| {
            let text = WELLNESS_TIPS[(start + offset) % WELLNESS_TIPS.len()];
            Tip {
                index: Some(offset),
                ..Tip::new("wellness", text, "General Wellness", Priority::Low, &[])
            }
        })
        .collect()
}

pub fn exercise_tip(seed: Seed) -> Option<Tip> {
    rotating_tip(seed, 3, 0, "exercise", &EXERCISE_TIPS, "Exercise & Fitness", Priority::Medium)
}

pub fn nutrition_tip(seed: Seed) -> Option<Tip> {
    rotating_tip(seed, 4, 1, "nutrition", &NUTRITION_TIPS, "Nutrition", Priority::Medium)
}

pub fn lifestyle_tip(seed: Seed) -> Option<Tip> {
    rotating_tip(seed, 5, 2, "lifestyle", &LIFESTYLE_TIPS, "Lifestyle", Priority::Low)
}

/// One tip indexed by `seed % tips.len()` when `seed % divisor == residue`.
fn rotating_tip(
    seed: Seed,
    divisor: i64,
    residue: usize,
    key: &'static str,
    tips: &[&str],
    category: &'static str,
    priority: Priority,
) -> Option<Tip> {
    if seed.residue(divisor) != residue {
        return None;
    }
    let text = tips[seed.rotation_index(tips.len())];
    Some(Tip::new(key, text, category, priority, &[]))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn refs(metrics: &[HealthMetric]) -> Vec<&HealthMetric> {
        metrics.iter().collect()
    }

    fn keys(tips: &[Tip]) -> Vec<&str> {
        tips.iter().map(|tip| tip.key).collect()
    }

    #[test]
    fn blood_pressure_bands() {
        let band = |systolic: f64, diastolic: f64| {
            let sys = vec![HealthMetric::numeric(SYSTOLIC_BP, day(9), systolic)];
            let dia = vec![HealthMetric::numeric(DIASTOLIC_BP, day(9), diastolic)];
            let tip = blood_pressure_tip(&refs(&sys), &refs(&dia));
            (tip.key, tip.priority)
        };

        assert_eq!(band(142.0, 70.0), ("bp_high", Priority::High));
        assert_eq!(band(120.0, 85.0), ("bp_borderline", Priority::Medium));
        assert_eq!(band(118.0, 76.0), ("bp_good", Priority::Low));

        let track = blood_pressure_tip(&[], &[]);
        assert_eq!(track.key, "bp_track");
        assert_eq!(track.related_metrics, ["blood_pressure"]);
    }

    #[test]
    fn weight_change_and_bmi_band_can_both_fire() {
        let weights = vec![
            HealthMetric::numeric(WEIGHT, day(9), 78.0),
            HealthMetric::numeric(WEIGHT, day(2), 80.5),
        ];
        let bmi = vec![HealthMetric::numeric(BMI, day(9), 26.1)];
        let tips = weight_tips(&refs(&weights), &refs(&bmi));

        assert_eq!(keys(&tips), ["weight_change", "bmi_overweight"]);
        assert_eq!(
            tips[0].text,
            "You've had a loss of 2.5kg. Consider ensuring adequate nutrition and consulting a healthcare provider if unintentional."
        );
    }

    #[test]
    fn small_weight_change_and_normal_bmi_are_quiet() {
        let weights = vec![
            HealthMetric::numeric(WEIGHT, day(9), 81.0),
            HealthMetric::numeric(WEIGHT, day(2), 80.0),
        ];
        let bmi = vec![HealthMetric::numeric(BMI, day(9), 22.0)];
        assert!(weight_tips(&refs(&weights), &refs(&bmi)).is_empty());
        assert_eq!(keys(&weight_tips(&[], &[])), ["weight_track"]);
    }

    #[test]
    fn heart_rate_only_speaks_outside_the_gap() {
        let tip = |values: &[f64]| {
            let metrics: Vec<_> = values
                .iter()
                .map(|value| HealthMetric::numeric(HEART_RATE, day(9), *value))
                .collect();
            heart_rate_tip(&refs(&metrics), Seed::new(1)).map(|tip| tip.key)
        };

        assert_eq!(tip(&[105.0, 102.0]), Some("hr_high"));
        assert_eq!(tip(&[72.0]), Some("hr_good"));
        assert_eq!(tip(&[90.0]), None);
        assert_eq!(tip(&[55.0]), None);

        assert!(heart_rate_tip(&[], Seed::new(9)).is_some());
        assert!(heart_rate_tip(&[], Seed::new(10)).is_none());
    }

    #[test]
    fn glucose_uses_first_merged_reading() {
        let metrics = vec![
            HealthMetric::numeric("blood_glucose", day(2), 130.0),
            HealthMetric::numeric("glucose", day(9), 90.0),
        ];
        let groups = MetricGroups::new(&metrics);
        let tip = glucose_tip(&groups.series(&GLUCOSE_TYPES), Seed::new(1)).unwrap();
        assert_eq!(tip.key, "glucose_high");
        assert_eq!(tip.priority, Priority::High);

        assert!(glucose_tip(&[], Seed::new(8)).is_some());
        assert!(glucose_tip(&[], Seed::new(9)).is_none());
    }

    #[test]
    fn seeded_rotations() {
        // 9 % 2 + 1 = 2 tips starting at 9 % 10.
        let wellness = wellness_tips(Seed::new(9));
        assert_eq!(wellness.len(), 2);
        assert_eq!(wellness[0].text, WELLNESS_TIPS[9]);
        assert_eq!(wellness[1].text, WELLNESS_TIPS[0]);
        assert_eq!(wellness[1].index, Some(1));

        // 15: exercise (15 % 3 == 0) at 15 % 8 = 7, no nutrition or lifestyle.
        assert_eq!(exercise_tip(Seed::new(15)).unwrap().text, EXERCISE_TIPS[7]);
        assert!(nutrition_tip(Seed::new(15)).is_none());
        assert!(lifestyle_tip(Seed::new(15)).is_none());

        // 17: nutrition (17 % 4 == 1) at 1, lifestyle (17 % 5 == 2) at 1.
        assert_eq!(nutrition_tip(Seed::new(17)).unwrap().text, NUTRITION_TIPS[1]);
        assert_eq!(lifestyle_tip(Seed::new(17)).unwrap().priority, Priority::Low);
        assert!(exercise_tip(Seed::new(17)).is_none());
    }

    #[test]
    fn generated_tips_are_stamped_shuffled_and_capped() {
        let now = Utc
            .with_ymd_and_hms(2024, 4, 10, 7, 0, 0)
            .unwrap()
            .fixed_offset();
        // Seed 15 with no data: bp_track, weight_track, hr_track,
        // two wellness tips, exercise.
        let groups = MetricGroups::new(&[]);
        assert_eq!(
            keys(&collect_tips(&groups, Seed::new(15))),
            ["bp_track", "weight_track", "hr_track", "wellness", "wellness", "exercise"]
        );

        let tips = generate_health_tips(&[], Seed::new(15), now, 5);
        assert_eq!(tips.len(), 5);
        assert!(tips.iter().all(|tip| tip.id.contains("_1712732400000")));
        assert!(tips.iter().all(|tip| tip.created_at == now.with_timezone(&Utc)));

        let again = generate_health_tips(&[], Seed::new(15), now, 5);
        assert_eq!(tips, again);
    }
}
