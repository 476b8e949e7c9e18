//! Shared primitive types used across the assessment and the build tooling.

/// A stable, unique identifier for a risk factor.
pub type FactorId = String;

/// Integer severity of a factor selection. Conventionally 1..=5.
pub type Score = i32;

/// Contribution multiplier of a factor. Conventionally 0.0..=1.0.
pub type Weight = f64;

/// Highest attainable per-factor score; the normalization constant
/// used to turn a weighted total into a percentage.
pub const MAX_FACTOR_SCORE: f64 = 5.0;

/// Score a factor falls back to when nothing (or an unknown value) is selected.
pub const DEFAULT_SCORE: Score = 1;

/// Weight a freshly drafted custom factor starts with.
pub const DEFAULT_CUSTOM_WEIGHT: Weight = 0.05;
