//! Risk scoring engine: weighted aggregation, tiering, due-diligence mapping.
//!
//!   total      = Σ score × weight
//!   percentage = total / MAX_FACTOR_SCORE × 100
//!
//!   percentage >= 70  → HIGH   / EDD
//!   percentage >= 40  → MEDIUM / CDD
//!   otherwise         → LOW    / SDD
//!
//! Weights are not renormalized. When they do not sum to 1 the percentage
//! drifts accordingly; scores outside 1..=5 can push it past 100 or below 0.

use crate::{factor::RiskFactor, types::MAX_FACTOR_SCORE};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds are half-open; the highest one reached wins.
    /// NaN reaches neither and lands in Low.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if percentage >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueDiligence {
    /// Simplified Due Diligence
    SDD,
    /// Customer Due Diligence
    CDD,
    /// Enhanced Due Diligence
    EDD,
}

impl DueDiligence {
    pub fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => DueDiligence::SDD,
            RiskLevel::Medium => DueDiligence::CDD,
            RiskLevel::High => DueDiligence::EDD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DueDiligence::SDD => "SDD",
            DueDiligence::CDD => "CDD",
            DueDiligence::EDD => "EDD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DueDiligence::SDD => "Simplified Due Diligence",
            DueDiligence::CDD => "Customer Due Diligence",
            DueDiligence::EDD => "Enhanced Due Diligence",
        }
    }
}

impl fmt::Display for DueDiligence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict for one set of factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub total_weighted_score: f64,
    pub risk_level: RiskLevel,
    pub risk_percentage: f64,
    pub due_diligence: DueDiligence,
}

impl RiskScoreResult {
    /// Total as displayed: two decimals.
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total_weighted_score)
    }

    /// Percentage as displayed: one decimal, no percent sign.
    pub fn formatted_percentage(&self) -> String {
        format!("{:.1}", self.risk_percentage)
    }
}

/// Score an ordered collection of factors. Total over any input,
/// including an empty one.
pub fn compute_risk_score(factors: &[RiskFactor]) -> RiskScoreResult {
    // An empty f64 `sum()` is -0.0; start from +0.0.
    let total_weighted_score = factors
        .iter()
        .map(RiskFactor::weighted_score)
        .fold(0.0, |acc, w| acc + w);
    let risk_percentage = (total_weighted_score / MAX_FACTOR_SCORE) * 100.0;
    let risk_level = RiskLevel::from_percentage(risk_percentage);

    RiskScoreResult {
        total_weighted_score,
        risk_level,
        risk_percentage,
        due_diligence: DueDiligence::for_level(risk_level),
    }
}
