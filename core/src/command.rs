use crate::{
    assessment::{Assessment, ClientInfo},
    error::AssessResult,
    event::AssessmentEvent,
    factor::{FactorDraft, RiskFactor},
    types::{FactorId, Score, Weight},
};
use serde::{Deserialize, Serialize};

/// All commands a front end can issue against an assessment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    // ── Queries / control ─────────────────────────
    GetState,
    Quit,

    // ── Form input ────────────────────────────────
    Select {
        factor_id: FactorId,
        value: String,
    },
    SetClient {
        client: ClientInfo,
    },
    SetEditMode {
        enabled: bool,
    },

    // ── Edit mode ─────────────────────────────────
    SetWeight {
        factor_id: FactorId,
        weight: Weight,
    },
    OverrideScore {
        factor_id: FactorId,
        score: Score,
    },
    Rename {
        factor_id: FactorId,
        name: String,
    },
    AddFactor {
        draft: FactorDraft,
    },
    UpdateFactor {
        factor: RiskFactor,
    },
    DeleteFactor {
        factor_id: FactorId,
    },
}

impl SessionCommand {
    /// Apply to the session. Queries and `Quit` change nothing and
    /// return `None`.
    pub fn apply(self, assessment: &mut Assessment) -> AssessResult<Option<AssessmentEvent>> {
        let event = match self {
            SessionCommand::GetState | SessionCommand::Quit => return Ok(None),
            SessionCommand::Select { factor_id, value } => {
                assessment.select_option(&factor_id, &value)?
            }
            SessionCommand::SetClient { client } => assessment.set_client(client),
            SessionCommand::SetEditMode { enabled } => assessment.set_edit_mode(enabled),
            SessionCommand::SetWeight { factor_id, weight } => {
                assessment.set_weight(&factor_id, weight)?
            }
            SessionCommand::OverrideScore { factor_id, score } => {
                assessment.override_score(&factor_id, score)?
            }
            SessionCommand::Rename { factor_id, name } => {
                assessment.rename_factor(&factor_id, &name)?
            }
            SessionCommand::AddFactor { draft } => assessment.add_factor(draft)?,
            SessionCommand::UpdateFactor { factor } => assessment.update_factor(factor)?,
            SessionCommand::DeleteFactor { factor_id } => assessment.delete_factor(&factor_id)?,
        };
        Ok(Some(event))
    }
}
