//! Risk factors, their option tables, and the draft used to build custom ones.

use crate::{
    error::{AssessError, AssessResult},
    types::{FactorId, Score, Weight, DEFAULT_CUSTOM_WEIGHT, DEFAULT_SCORE},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One selectable answer for a risk factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorOption {
    pub value: String,
    pub score: Score,
    pub label: String,
}

impl FactorOption {
    pub fn new(value: impl Into<String>, score: Score, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            score,
            label: label.into(),
        }
    }

    /// The empty row a new option starts as in the factor dialogs.
    pub fn blank() -> Self {
        Self::new("", DEFAULT_SCORE, "")
    }
}

/// Which column of an option row is being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "to", rename_all = "snake_case")]
pub enum OptionField {
    Value(String),
    Score(Score),
    Label(String),
}

/// Colour band of the score badge next to each factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,      // 1-2
    Moderate, // 3
    Elevated, // 4+
}

impl ScoreBand {
    pub fn for_score(score: Score) -> Self {
        if score <= 2 {
            ScoreBand::Low
        } else if score <= 3 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Elevated
        }
    }
}

/// One evaluable dimension of AML risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub id: FactorId,
    pub name: String,
    /// Selected option key. Empty means unselected.
    #[serde(default)]
    pub value: String,
    pub score: Score,
    pub weight: Weight,
    pub options: Vec<FactorOption>,
    /// Built-in factors are not editable and can never be deleted.
    #[serde(default)]
    pub editable: bool,
}

impl RiskFactor {
    pub fn is_selected(&self) -> bool {
        !self.value.is_empty()
    }

    pub fn option(&self, value: &str) -> Option<&FactorOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn selected_option(&self) -> Option<&FactorOption> {
        if self.is_selected() {
            self.option(&self.value)
        } else {
            None
        }
    }

    /// Select an option and derive the score from it.
    /// A value with no matching option falls back to DEFAULT_SCORE.
    pub fn select(&mut self, value: &str) -> Score {
        self.score = self.option(value).map_or(DEFAULT_SCORE, |o| o.score);
        self.value = value.to_string();
        self.score
    }

    /// Contribution of this factor to the total: score × weight.
    pub fn weighted_score(&self) -> f64 {
        f64::from(self.score) * self.weight
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score)
    }

    pub fn add_option(&mut self) {
        self.options.push(FactorOption::blank());
    }

    pub fn update_option(&mut self, index: usize, field: OptionField) -> AssessResult<()> {
        update_option_at(&mut self.options, index, field)
    }

    pub fn remove_option(&mut self, index: usize) -> AssessResult<()> {
        remove_option_at(&mut self.options, index)
    }

    /// Structural checks applied whenever a factor enters an assessment
    /// from outside (catalog file, edit dialog).
    pub fn validate(&self) -> AssessResult<()> {
        validate_options(&self.name, &self.options)
    }
}

/// The "add new risk factor" form before it becomes a RiskFactor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDraft {
    pub name: String,
    pub weight: Weight,
    pub options: Vec<FactorOption>,
}

impl Default for FactorDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: DEFAULT_CUSTOM_WEIGHT,
            options: vec![FactorOption::blank()],
        }
    }
}

impl FactorDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    /// Replace the option table. An empty list is kept as-is and
    /// rejected later by `into_factor`.
    pub fn with_options(mut self, options: Vec<FactorOption>) -> Self {
        self.options = options;
        self
    }

    pub fn add_option(&mut self) {
        self.options.push(FactorOption::blank());
    }

    pub fn update_option(&mut self, index: usize, field: OptionField) -> AssessResult<()> {
        update_option_at(&mut self.options, index, field)
    }

    pub fn remove_option(&mut self, index: usize) -> AssessResult<()> {
        remove_option_at(&mut self.options, index)
    }

    /// Turn the draft into a deletable custom factor with the given id.
    /// Requires a name and a label on the first option. A zero or NaN
    /// weight falls back to DEFAULT_CUSTOM_WEIGHT.
    pub fn into_factor(self, id: FactorId) -> AssessResult<RiskFactor> {
        let first_label = self.options.first().map(|o| o.label.trim());
        if self.name.trim().is_empty() || first_label.map_or(true, str::is_empty) {
            return Err(AssessError::MissingRequiredFields);
        }
        validate_options(&self.name, &self.options)?;

        Ok(RiskFactor {
            id,
            name: self.name,
            value: String::new(),
            score: DEFAULT_SCORE,
            weight: custom_weight(self.weight),
            options: self.options,
            editable: true,
        })
    }
}

fn custom_weight(weight: Weight) -> Weight {
    if weight == 0.0 || weight.is_nan() {
        DEFAULT_CUSTOM_WEIGHT
    } else {
        weight
    }
}

fn update_option_at(
    options: &mut [FactorOption],
    index: usize,
    field: OptionField,
) -> AssessResult<()> {
    let len = options.len();
    let option = options
        .get_mut(index)
        .ok_or(AssessError::OptionIndexOutOfRange { index, len })?;
    match field {
        OptionField::Value(v) => option.value = v,
        OptionField::Score(s) => option.score = s,
        OptionField::Label(l) => option.label = l,
    }
    Ok(())
}

fn remove_option_at(options: &mut Vec<FactorOption>, index: usize) -> AssessResult<()> {
    if index >= options.len() {
        return Err(AssessError::OptionIndexOutOfRange {
            index,
            len: options.len(),
        });
    }
    if options.len() <= 1 {
        return Err(AssessError::LastOption);
    }
    options.remove(index);
    Ok(())
}

fn validate_options(factor: &str, options: &[FactorOption]) -> AssessResult<()> {
    if options.is_empty() {
        return Err(AssessError::NoOptions {
            factor: factor.to_string(),
        });
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.value.as_str()) {
            return Err(AssessError::DuplicateOptionValue {
                factor: factor.to_string(),
                value: option.value.clone(),
            });
        }
    }
    Ok(())
}
