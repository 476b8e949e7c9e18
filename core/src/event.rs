//! Assessment events: what each mutation reports back.
//!
//! RULE: Mutations never notify anyone themselves.
//! They return an event; the presentation layer decides how to show it
//! (usually as a transient notice).

use crate::{
    error::AssessError,
    types::{FactorId, Score, Weight},
};
use serde::{Deserialize, Serialize};

/// Every state change an assessment session can make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssessmentEvent {
    // ── Selection ──────────────────────────────────
    OptionSelected {
        factor_id: FactorId,
        value: String,
        score: Score,
    },

    // ── Manual edits (edit mode) ───────────────────
    WeightChanged {
        factor_id: FactorId,
        old_weight: Weight,
        new_weight: Weight,
    },
    ScoreOverridden {
        factor_id: FactorId,
        old_score: Score,
        new_score: Score,
    },
    FactorRenamed {
        factor_id: FactorId,
        name: String,
    },

    // ── Factor collection ──────────────────────────
    FactorAdded {
        factor_id: FactorId,
        name: String,
    },
    FactorUpdated {
        factor_id: FactorId,
    },
    FactorDeleted {
        factor_id: FactorId,
    },

    // ── Session ────────────────────────────────────
    EditModeChanged {
        enabled: bool,
    },
    ClientUpdated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A transient notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}

impl From<&AssessError> for Notice {
    fn from(err: &AssessError) -> Self {
        Notice::error(err.to_string())
    }
}

impl AssessmentEvent {
    /// Notice to surface for this event, if it warrants one.
    /// Plain form edits (selection, weights, scores) stay silent.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AssessmentEvent::FactorAdded { .. } => {
                Some(Notice::success("New risk factor added successfully"))
            }
            AssessmentEvent::FactorUpdated { .. } => {
                Some(Notice::success("Risk factor updated successfully"))
            }
            AssessmentEvent::FactorDeleted { .. } => {
                Some(Notice::success("Risk factor deleted successfully"))
            }
            _ => None,
        }
    }

    /// The factor this event concerns, if any.
    pub fn factor_id(&self) -> Option<&str> {
        match self {
            AssessmentEvent::OptionSelected { factor_id, .. }
            | AssessmentEvent::WeightChanged { factor_id, .. }
            | AssessmentEvent::ScoreOverridden { factor_id, .. }
            | AssessmentEvent::FactorRenamed { factor_id, .. }
            | AssessmentEvent::FactorAdded { factor_id, .. }
            | AssessmentEvent::FactorUpdated { factor_id }
            | AssessmentEvent::FactorDeleted { factor_id } => Some(factor_id.as_str()),
            AssessmentEvent::EditModeChanged { .. } | AssessmentEvent::ClientUpdated => None,
        }
    }
}
