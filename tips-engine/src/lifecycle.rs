//! What happens to a suggestion after the user sees it.

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tips_core::{AppointmentSuggestion, EngineConfig, SuggestionStatus, TipsError, SLOT_FORMAT};

use crate::reminders::reminder_schedule;

/// Action requested by the user, shaped like the request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SuggestionAction {
    Accept {
        #[serde(default)]
        selected_slot: Option<String>,
    },
    Decline {
        #[serde(default, rename = "decline_reason")]
        reason: Option<String>,
    },
    Snooze {
        #[serde(default, rename = "snooze_days")]
        days: Option<u32>,
    },
}

impl SuggestionAction {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "accept",
            Self::Decline { .. } => "decline",
            Self::Snooze { .. } => "snooze",
        }
    }
}

/// Appointment to be created when a suggestion is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDraft {
    pub title: String,
    pub appointment_at: NaiveDateTime,
    pub location: String,
    pub doctor_name: String,
    pub notes: String,
    pub status: String,
    pub reminders: Vec<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Accepted(AppointmentDraft),
    Declined { reason: String },
    Snoozed { until: NaiveDateTime },
}

/// A stored suggestion together with its user-facing state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedSuggestion {
    #[serde(flatten)]
    pub suggestion: AppointmentSuggestion,
    pub status: SuggestionStatus,
    pub decline_reason: Option<String>,
    pub snooze_until: Option<NaiveDateTime>,
    pub accepted_slot: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TrackedSuggestion {
    pub fn new(suggestion: AppointmentSuggestion) -> Self {
        Self {
            suggestion,
            status: SuggestionStatus::Pending,
            decline_reason: None,
            snooze_until: None,
            accepted_slot: None,
            updated_at: None,
        }
    }

    /// Applies `action` at local time `now`. Accepted and declined suggestions
    /// no longer take actions.
    pub fn apply(
        &mut self,
        action: SuggestionAction,
        now: NaiveDateTime,
        config: &EngineConfig,
    ) -> Result<ActionOutcome, TipsError> {
        if self.status.is_terminal() {
            return Err(TipsError::InvalidTransition {
                from: self.status,
                action: action.verb(),
            });
        }

        let outcome = match action {
            SuggestionAction::Accept { selected_slot } => {
                let slot = selected_slot
                    .as_deref()
                    .map(str::trim)
                    .filter(|slot| !slot.is_empty())
                    .ok_or(TipsError::MissingSlot)?;
                let appointment_at = parse_slot(slot)?;
                let draft = self.draft_appointment(appointment_at, now);

                self.status = SuggestionStatus::Accepted;
                self.accepted_slot = Some(appointment_at);
                ActionOutcome::Accepted(draft)
            }
            SuggestionAction::Decline { reason } => {
                let reason = reason
                    .filter(|reason| !reason.trim().is_empty())
                    .unwrap_or_else(|| "No reason provided".to_string());

                self.status = SuggestionStatus::Declined;
                self.decline_reason = Some(reason.clone());
                ActionOutcome::Declined { reason }
            }
            SuggestionAction::Snooze { days } => {
                let days = days
                    .filter(|days| *days != 0)
                    .unwrap_or(config.default_snooze_days);
                let until = Duration::try_days(i64::from(days))
                    .and_then(|delta| now.checked_add_signed(delta))
                    .ok_or_else(|| TipsError::Other(format!("snooze_days {days} is out of range")))?;

                self.status = SuggestionStatus::Snoozed;
                self.snooze_until = Some(until);
                ActionOutcome::Snoozed { until }
            }
        };

        self.updated_at = Some(now);
        tracing::debug!(
            suggestion = %self.suggestion.id,
            status = %self.status,
            "suggestion action applied"
        );
        Ok(outcome)
    }

    fn draft_appointment(&self, appointment_at: NaiveDateTime, now: NaiveDateTime) -> AppointmentDraft {
        let suggestion = &self.suggestion;
        AppointmentDraft {
            title: format!("{} - {}", suggestion.specialty, suggestion.title),
            appointment_at,
            location: "To be confirmed".to_string(),
            doctor_name: "To be assigned".to_string(),
            notes: format!(
                "Appointment created from health suggestion: {}",
                suggestion.reason
            ),
            status: "scheduled".to_string(),
            reminders: reminder_schedule(appointment_at, suggestion.danger_level, now),
        }
    }
}

/// Parses `YYYY-MM-DD HH:MM`, or an RFC 3339 timestamp in its own offset.
pub fn parse_slot(slot: &str) -> Result<NaiveDateTime, TipsError> {
    NaiveDateTime::parse_from_str(slot, SLOT_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(slot).map(|at| at.naive_local()))
        .map_err(|err| TipsError::Parse(format!("slot {slot:?}: {err}")))
}
