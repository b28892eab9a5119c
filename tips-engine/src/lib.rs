//! Rule-based appointment suggestions derived from a user's health-metric history.
//!
//! The engine groups metrics by type, runs one analyzer per metric family,
//! tops the list up with seed-driven preventive/specialist items, adds an
//! umbrella review when several concerns surface, then shuffles and truncates.
//! [`health_tips`] runs a lighter pass over the same groups for lifestyle advice.

pub mod grouping;
pub mod health_tips;
pub mod lifecycle;
pub mod reminders;
pub mod response;
pub mod rules;
pub mod seed;
pub mod slots;
pub mod supplementary;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use rand::rngs::ThreadRng;
use rand::Rng;
use tips_core::{AppointmentSuggestion, EngineConfig, HealthMetric, HealthSuggestion};

pub use grouping::MetricGroups;
pub use lifecycle::{ActionOutcome, AppointmentDraft, SuggestionAction, TrackedSuggestion};
pub use health_tips::generate_health_tips;
pub use response::{
    parse_metrics_str, parse_metrics_value, respond, respond_health_tips, HealthTipsResponse,
    TipsResponse,
};
pub use rules::{Finding, IdStyle};
pub use seed::Seed;
pub use slots::generate_proposed_slots;

/// Source of the current wall-clock time, with the caller's local offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at.with_timezone(&Utc.fix()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;
const SEED_JITTER: u32 = 1000;

/// Suggestion engine with an injectable clock and random source.
pub struct TipsEngine<C = SystemClock, R = ThreadRng> {
    config: EngineConfig,
    clock: C,
    rng: R,
}

impl TipsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
            rng: rand::thread_rng(),
        }
    }
}

impl Default for TipsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: Clock, R: Rng> TipsEngine<C, R> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TipsEngine<C2, R> {
        TipsEngine {
            config: self.config,
            clock,
            rng: self.rng,
        }
    }

    pub fn with_rng<R2: Rng>(self, rng: R2) -> TipsEngine<C, R2> {
        TipsEngine {
            config: self.config,
            clock: self.clock,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Suggestions for `metrics` (newest first per type). The seed mixes the
    /// user id, the clock and a random jitter, so repeated calls differ.
    pub fn generate(&mut self, metrics: &[HealthMetric], user_id: i64) -> Vec<AppointmentSuggestion> {
        let now = self.clock.now();
        let jitter = self.rng.gen_range(0..SEED_JITTER);
        let seed = Seed::derive(user_id, now.timestamp_millis(), jitter);
        self.finish(metrics, seed, now)
    }

    /// Same pipeline as [`generate`](Self::generate) with the seed pinned.
    pub fn generate_with_seed(
        &mut self,
        metrics: &[HealthMetric],
        seed: Seed,
    ) -> Vec<AppointmentSuggestion> {
        let now = self.clock.now();
        self.finish(metrics, seed, now)
    }

    /// Lifestyle tips for `metrics`, seeded the same way as [`generate`](Self::generate).
    pub fn health_tips(&mut self, metrics: &[HealthMetric], user_id: i64) -> Vec<HealthSuggestion> {
        let now = self.clock.now();
        let jitter = self.rng.gen_range(0..SEED_JITTER);
        let seed = Seed::derive(user_id, now.timestamp_millis(), jitter);
        generate_health_tips(metrics, seed, now, self.config.max_health_tips)
    }

    pub fn health_tips_with_seed(
        &mut self,
        metrics: &[HealthMetric],
        seed: Seed,
    ) -> Vec<HealthSuggestion> {
        generate_health_tips(metrics, seed, self.clock.now(), self.config.max_health_tips)
    }

    /// Every suggestion before shuffling and truncation; an umbrella review,
    /// when present, sits at index 0.
    pub fn draft(&mut self, metrics: &[HealthMetric], seed: Seed) -> Vec<AppointmentSuggestion> {
        let now = self.clock.now();
        self.draft_at(metrics, seed, now)
    }

    /// Turns a finding into a suggestion generated at `now`.
    pub fn stamp(&mut self, finding: Finding, now: DateTime<FixedOffset>) -> AppointmentSuggestion {
        let millis = now.timestamp_millis();
        let id = match finding.id_style {
            IdStyle::Timestamp => format!("{}_{millis}", finding.key),
            IdStyle::Salted => format!("{}_{millis}_{}", finding.key, self.id_suffix()),
            IdStyle::Seeded(seed) => format!("{}_{millis}_{seed}", finding.key),
        };

        AppointmentSuggestion {
            id,
            title: finding.title.to_string(),
            specialty: finding.specialty.to_string(),
            danger_level: finding.danger_level,
            timeframe: self.config.timeframe_for(finding.danger_level).to_string(),
            proposed_slots: generate_proposed_slots(finding.danger_level, now.naive_local()),
            reason: finding.reason,
            decline_consequence: finding.decline_consequence.to_string(),
            no_show_consequence: finding.no_show_consequence.to_string(),
            related_metrics: finding.related_metrics,
            created_at: now.with_timezone(&Utc),
        }
    }

    fn finish(
        &mut self,
        metrics: &[HealthMetric],
        seed: Seed,
        now: DateTime<FixedOffset>,
    ) -> Vec<AppointmentSuggestion> {
        let mut suggestions = self.draft_at(metrics, seed, now);
        seed.shuffle(&mut suggestions);
        suggestions.truncate(self.config.max_suggestions);

        tracing::debug!(returned = suggestions.len(), "appointment tips generated");
        suggestions
    }

    fn draft_at(
        &mut self,
        metrics: &[HealthMetric],
        seed: Seed,
        now: DateTime<FixedOffset>,
    ) -> Vec<AppointmentSuggestion> {
        let groups = MetricGroups::new(metrics);
        tracing::debug!(
            readings = metrics.len(),
            metric_types = groups.len(),
            seed = seed.value(),
            preventive = seed.includes_preventive(),
            specialist = seed.includes_specialist(),
            mental_health = seed.includes_mental_health(),
            "analyzing health metrics"
        );

        let mut suggestions = Vec::new();
        for finding in rules::analyze_all(&groups) {
            tracing::debug!(
                title = finding.title,
                danger_level = %finding.danger_level,
                "analyzer fired"
            );
            suggestions.push(self.stamp(finding, now));
        }

        if seed.includes_preventive() || suggestions.is_empty() {
            for finding in supplementary::preventive_care(seed) {
                suggestions.push(self.stamp(finding, now));
            }
        }

        if seed.includes_specialist() && suggestions.len() < 3 {
            let finding = supplementary::specialist_consultation(seed);
            suggestions.push(self.stamp(finding, now));
        }

        if seed.includes_mental_health() && suggestions.len() < 4 {
            let finding = supplementary::mental_health_check();
            suggestions.push(self.stamp(finding, now));
        }

        if let Some(review) = supplementary::comprehensive_review(&suggestions, seed) {
            tracing::debug!(
                covered = suggestions.len(),
                danger_level = %review.danger_level,
                "umbrella review added"
            );
            let review = self.stamp(review, now);
            suggestions.insert(0, review);
        }

        suggestions
    }

    fn id_suffix(&mut self) -> String {
        (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Suggestions using the system clock, thread RNG and default configuration.
pub fn generate_appointment_tips(metrics: &[HealthMetric], user_id: i64) -> Vec<AppointmentSuggestion> {
    TipsEngine::new(EngineConfig::default()).generate(metrics, user_id)
}
