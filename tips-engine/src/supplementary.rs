//! Suggestions that do not depend on metrics: preventive care rotation,
//! specialist rotation, mental health check and the umbrella review.

use tips_core::{AppointmentSuggestion, DangerLevel};

use crate::rules::{Finding, IdStyle};
use crate::seed::Seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub specialty: &'static str,
    pub reason: &'static str,
}

pub const PREVENTIVE_CARE: [CatalogEntry; 5] = [
    CatalogEntry {
        key: "preventive_annual_physical",
        title: "Annual Physical Examination",
        specialty: "General Practice",
        reason: "Regular comprehensive health screenings help detect issues early and maintain optimal health.",
    },
    CatalogEntry {
        key: "preventive_dental",
        title: "Dental Cleaning & Checkup",
        specialty: "Dentistry",
        reason: "Regular dental care prevents gum disease and maintains oral health, which impacts overall wellness.",
    },
    CatalogEntry {
        key: "preventive_eye_exam",
        title: "Eye Examination",
        specialty: "Ophthalmology",
        reason: "Annual eye exams detect vision changes and eye diseases like glaucoma early.",
    },
    CatalogEntry {
        key: "preventive_skin_screening",
        title: "Dermatology Screening",
        specialty: "Dermatology",
        reason: "Annual skin cancer screening is important for early detection of suspicious moles or lesions.",
    },
    CatalogEntry {
        key: "preventive_vaccines",
        title: "Vaccination Update",
        specialty: "General Practice",
        reason: "Ensure your immunizations are up-to-date including flu shot and other recommended vaccines.",
    },
];

pub const SPECIALISTS: [CatalogEntry; 4] = [
    CatalogEntry {
        key: "specialist",
        title: "Nutritionist Consultation",
        specialty: "Nutrition",
        reason: "A nutritionist can help optimize your diet for better health outcomes and energy levels.",
    },
    CatalogEntry {
        key: "specialist",
        title: "Physical Therapy Assessment",
        specialty: "Physical Therapy",
        reason: "Evaluate posture, movement patterns, and address any musculoskeletal concerns.",
    },
    CatalogEntry {
        key: "specialist",
        title: "Sleep Study Consultation",
        specialty: "Sleep Medicine",
        reason: "Poor sleep quality can significantly impact your overall health and well-being.",
    },
    CatalogEntry {
        key: "specialist",
        title: "Stress Management Consultation",
        specialty: "Psychology",
        reason: "Learn effective stress management techniques to improve your mental and physical health.",
    },
];

pub const UMBRELLA_TITLE: &str = "Comprehensive Health Review";

/// `seed % 2 + 1` consecutive entries of the rotation, starting at `seed % 5`.
pub fn preventive_care(seed: Seed) -> Vec<Finding> {
    let start = seed.rotation_index(PREVENTIVE_CARE.len());
    (0..seed.preventive_count())
        .map(|offset| &PREVENTIVE_CARE[(start + offset) % PREVENTIVE_CARE.len()])
        .map(|entry| {
            routine(
                entry,
                "Preventive care helps catch health issues before they become serious problems.",
                "Missing preventive care may lead to undetected health conditions.",
            )
        })
        .collect()
}

pub fn specialist_consultation(seed: Seed) -> Finding {
    let entry = &SPECIALISTS[seed.rotation_index(SPECIALISTS.len())];
    routine(
        entry,
        "Specialized care can provide targeted improvements to your health.",
        "Missing specialized consultation may limit health optimization opportunities.",
    )
}

pub fn mental_health_check() -> Finding {
    routine(
        &CatalogEntry {
            key: "mental_health",
            title: "Mental Health Wellness Check",
            specialty: "Psychology",
            reason: "Regular mental health check-ins support emotional well-being and stress management.",
        },
        "Mental health is as important as physical health for overall wellness.",
        "Neglecting mental health can impact physical health and quality of life.",
    )
}

/// Review covering every existing suggestion; `None` for fewer than two.
pub fn comprehensive_review(existing: &[AppointmentSuggestion], seed: Seed) -> Option<Finding> {
    if existing.len() < 2 {
        return None;
    }

    let danger_level = existing.iter().map(|s| s.danger_level).max()?;
    let conditions = existing
        .iter()
        .map(|s| s.title.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ");

    Some(Finding {
        key: "umbrella",
        id_style: IdStyle::Seeded(seed.value()),
        danger_level,
        specialty: "General Practice",
        title: UMBRELLA_TITLE,
        reason: format!(
            "Multiple health concerns detected: {conditions}. A comprehensive review would address all issues together."
        ),
        decline_consequence: "Multiple health risks may compound without coordinated care.",
        no_show_consequence: "Missed opportunity for comprehensive health assessment and coordinated treatment plan.",
        related_metrics: existing
            .iter()
            .flat_map(|s| s.related_metrics.iter().cloned())
            .collect(),
    })
}

fn routine(
    entry: &CatalogEntry,
    decline_consequence: &'static str,
    no_show_consequence: &'static str,
) -> Finding {
    Finding {
        key: entry.key,
        id_style: IdStyle::Timestamp,
        danger_level: DangerLevel::Routine,
        specialty: entry.specialty,
        title: entry.title,
        reason: entry.reason.to_string(),
        decline_consequence,
        no_show_consequence,
        related_metrics: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.title).collect()
    }

    #[test]
    fn preventive_rotation_wraps() {
        // 9 % 2 + 1 = 2 items starting at 9 % 5 = 4.
        assert_eq!(
            titles(&preventive_care(Seed::new(9))),
            ["Vaccination Update", "Annual Physical Examination"]
        );
        // 12 % 2 + 1 = 1 item at 12 % 5 = 2.
        assert_eq!(titles(&preventive_care(Seed::new(12))), ["Eye Examination"]);
    }

    #[test]
    fn supplementary_items_are_routine() {
        for finding in preventive_care(Seed::new(3))
            .into_iter()
            .chain([specialist_consultation(Seed::new(3)), mental_health_check()])
        {
            assert_eq!(finding.danger_level, DangerLevel::Routine);
            assert!(finding.related_metrics.is_empty());
        }
    }

    #[test]
    fn specialist_indexed_by_seed() {
        assert_eq!(specialist_consultation(Seed::new(8)).title, "Nutritionist Consultation");
        assert_eq!(specialist_consultation(Seed::new(10)).title, "Sleep Study Consultation");
    }
}
