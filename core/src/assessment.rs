//! Assessment session: the in-memory form state and its mutations.
//!
//! This module:
//!   1. Seeds the factor list from a catalog
//!   2. Applies selections (score derived from the option table)
//!   3. Applies edit-mode changes: weights, score overrides, names
//!   4. Adds, updates and deletes factors while keeping ids unique
//!   5. Scores the current state on demand
//!
//! Score overrides are independent of the option table;
//! a selected value may carry a score that no option lists.

use crate::{
    config::FactorCatalog,
    error::{AssessError, AssessResult},
    event::AssessmentEvent,
    factor::{FactorDraft, RiskFactor},
    scoring::{compute_risk_score, RiskScoreResult},
    types::{FactorId, Score, Weight},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record metadata for the assessed client. Never feeds scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub assessment_date: NaiveDate,
    /// Free text as typed; not parsed.
    pub facility_amount: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            assessment_date: chrono::Local::now().date_naive(),
            facility_amount: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub client: ClientInfo,
    factors: Vec<RiskFactor>,
    edit_mode: bool,
}

impl Assessment {
    pub fn new(catalog: &FactorCatalog) -> Self {
        Self {
            client: ClientInfo::default(),
            factors: catalog.factors.clone(),
            edit_mode: false,
        }
    }

    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.client = client;
        self
    }

    pub fn factors(&self) -> &[RiskFactor] {
        &self.factors
    }

    pub fn factor(&self, id: &str) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.id == id)
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Current verdict for the factor list.
    pub fn score(&self) -> RiskScoreResult {
        compute_risk_score(&self.factors)
    }

    // ── Session ────────────────────────────────────────────────────

    pub fn set_edit_mode(&mut self, enabled: bool) -> AssessmentEvent {
        self.edit_mode = enabled;
        log::debug!("assessment: edit mode {}", if enabled { "on" } else { "off" });
        AssessmentEvent::EditModeChanged { enabled }
    }

    pub fn toggle_edit_mode(&mut self) -> AssessmentEvent {
        self.set_edit_mode(!self.edit_mode)
    }

    pub fn set_client(&mut self, client: ClientInfo) -> AssessmentEvent {
        self.client = client;
        AssessmentEvent::ClientUpdated
    }

    // ── Selection ──────────────────────────────────────────────────

    /// Select an option for a factor. Allowed in any mode.
    pub fn select_option(&mut self, factor_id: &str, value: &str) -> AssessResult<AssessmentEvent> {
        let factor = self.factor_mut(factor_id)?;
        let score = factor.select(value);

        log::info!("assessment: {factor_id} = '{value}' (score {score})");
        Ok(AssessmentEvent::OptionSelected {
            factor_id: factor_id.to_string(),
            value: value.to_string(),
            score,
        })
    }

    // ── Edit mode ──────────────────────────────────────────────────

    pub fn set_weight(&mut self, factor_id: &str, weight: Weight) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("change weights")?;
        let factor = self.factor_mut(factor_id)?;
        let old_weight = std::mem::replace(&mut factor.weight, weight);

        log::info!("assessment: {factor_id} weight {old_weight:.2} -> {weight:.2}");
        Ok(AssessmentEvent::WeightChanged {
            factor_id: factor_id.to_string(),
            old_weight,
            new_weight: weight,
        })
    }

    /// Set a score directly, bypassing the option table. The selected
    /// value is left as-is.
    pub fn override_score(&mut self, factor_id: &str, score: Score) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("override scores")?;
        let factor = self.factor_mut(factor_id)?;
        let old_score = std::mem::replace(&mut factor.score, score);

        log::info!("assessment: {factor_id} score overridden {old_score} -> {score}");
        Ok(AssessmentEvent::ScoreOverridden {
            factor_id: factor_id.to_string(),
            old_score,
            new_score: score,
        })
    }

    pub fn rename_factor(&mut self, factor_id: &str, name: &str) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("rename factors")?;
        let factor = self.factor_mut(factor_id)?;
        factor.name = name.to_string();

        Ok(AssessmentEvent::FactorRenamed {
            factor_id: factor_id.to_string(),
            name: name.to_string(),
        })
    }

    /// Append a custom factor built from the draft. Custom factors get a
    /// generated `custom_` id and are always deletable.
    pub fn add_factor(&mut self, draft: FactorDraft) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("add factors")?;
        let id = self.next_custom_id();
        let factor = draft.into_factor(id)?;
        let event = AssessmentEvent::FactorAdded {
            factor_id: factor.id.clone(),
            name: factor.name.clone(),
        };

        log::info!("assessment: added factor {} ('{}')", factor.id, factor.name);
        self.factors.push(factor);
        Ok(event)
    }

    /// Replace a factor with an edited copy, matched by id. The stored
    /// `editable` flag wins over whatever the copy carries.
    pub fn update_factor(&mut self, mut edited: RiskFactor) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("edit factors")?;
        edited.validate()?;
        let factor = self.factor_mut(&edited.id)?;
        edited.editable = factor.editable;
        *factor = edited;

        log::info!("assessment: updated factor {}", factor.id);
        Ok(AssessmentEvent::FactorUpdated {
            factor_id: factor.id.clone(),
        })
    }

    pub fn delete_factor(&mut self, factor_id: &str) -> AssessResult<AssessmentEvent> {
        self.require_edit_mode("delete factors")?;
        let factor = self.factor_mut(factor_id)?;
        if !factor.editable {
            return Err(AssessError::BuiltInFactor {
                id: factor_id.to_string(),
            });
        }
        self.factors.retain(|f| f.id != factor_id);

        log::info!("assessment: deleted factor {factor_id}");
        Ok(AssessmentEvent::FactorDeleted {
            factor_id: factor_id.to_string(),
        })
    }

    // ── Internals ──────────────────────────────────────────────────

    fn factor_mut(&mut self, factor_id: &str) -> AssessResult<&mut RiskFactor> {
        self.factors
            .iter_mut()
            .find(|f| f.id == factor_id)
            .ok_or_else(|| AssessError::UnknownFactor {
                id: factor_id.to_string(),
            })
    }

    fn require_edit_mode(&self, action: &'static str) -> AssessResult<()> {
        if self.edit_mode {
            Ok(())
        } else {
            Err(AssessError::EditModeRequired { action })
        }
    }

    fn next_custom_id(&self) -> FactorId {
        loop {
            let id = format!("custom_{}", uuid::Uuid::new_v4().simple());
            if self.factor(&id).is_none() {
                return id;
            }
        }
    }
}
