//! Scoring engine tests: aggregation, tiers, due-diligence mapping.

use aml_risk_core::{
    config::FactorCatalog,
    factor::RiskFactor,
    scoring::{compute_risk_score, DueDiligence, RiskLevel},
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

fn factor(id: &str, score: i32, weight: f64) -> RiskFactor {
    RiskFactor {
        id: id.into(),
        name: id.into(),
        value: String::new(),
        score,
        weight,
        options: vec![],
        editable: false,
    }
}

/// Scores 1..=5 and weights in eighths keep every sum exact,
/// so reordering can be compared with plain equality.
fn random_factors(rng: &mut Pcg64Mcg, n: usize) -> Vec<RiskFactor> {
    (0..n)
        .map(|i| {
            let score = rng.gen_range(1..=5);
            let weight = f64::from(rng.gen_range(1..=8u32)) / 8.0;
            factor(&format!("f-{i}"), score, weight)
        })
        .collect()
}

#[test]
fn low_and_high_scores_average_to_medium() {
    let result = compute_risk_score(&[factor("a", 1, 0.5), factor("b", 5, 0.5)]);

    assert_eq!(result.formatted_total(), "3.00");
    assert_eq!(result.formatted_percentage(), "60.0");
    assert!((result.risk_percentage - 60.0).abs() < 1e-9);
    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.due_diligence, DueDiligence::CDD);
}

#[test]
fn maximum_scores_with_unit_weights_are_high() {
    let factors = [factor("a", 5, 0.25), factor("b", 5, 0.25), factor("c", 5, 0.5)];
    let result = compute_risk_score(&factors);

    assert_eq!(result.risk_percentage, 100.0);
    assert_eq!(result.formatted_percentage(), "100.0");
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.due_diligence, DueDiligence::EDD);
}

#[test]
fn minimum_scores_are_low() {
    let result = compute_risk_score(&[factor("a", 1, 0.5), factor("b", 1, 0.5)]);

    assert!((result.risk_percentage - 20.0).abs() < 1e-9);
    assert_eq!(result.formatted_percentage(), "20.0");
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.due_diligence, DueDiligence::SDD);
}

#[test]
fn empty_factor_list_scores_zero() {
    let result = compute_risk_score(&[]);

    assert_eq!(result.total_weighted_score, 0.0);
    assert_eq!(result.risk_percentage, 0.0);
    assert!(result.total_weighted_score.is_sign_positive());
    assert_eq!(result.formatted_total(), "0.00");
    assert_eq!(result.formatted_percentage(), "0.0");
    assert_eq!(serde_json::to_string(&result.total_weighted_score).unwrap(), "0.0");
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.due_diligence, DueDiligence::SDD);
}

#[test]
fn tier_boundaries_are_half_open() {
    assert_eq!(RiskLevel::from_percentage(70.0), RiskLevel::High);
    assert_eq!(RiskLevel::from_percentage(69.999), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_percentage(40.0), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_percentage(39.999), RiskLevel::Low);
    assert_eq!(RiskLevel::from_percentage(39.999_999_999), RiskLevel::Low);
    assert_eq!(RiskLevel::from_percentage(250.0), RiskLevel::High);
    assert_eq!(RiskLevel::from_percentage(-10.0), RiskLevel::Low);
}

#[test]
fn exact_forty_percent_total_is_medium() {
    let result = compute_risk_score(&[factor("a", 4, 0.5)]);
    assert_eq!(result.formatted_percentage(), "40.0");
    assert_eq!(result.risk_level, RiskLevel::Medium);
}

#[test]
fn due_diligence_follows_level() {
    assert_eq!(DueDiligence::for_level(RiskLevel::Low), DueDiligence::SDD);
    assert_eq!(DueDiligence::for_level(RiskLevel::Medium), DueDiligence::CDD);
    assert_eq!(DueDiligence::for_level(RiskLevel::High), DueDiligence::EDD);
}

#[test]
fn reordering_factors_never_changes_the_result() {
    let mut rng = Pcg64Mcg::seed_from_u64(0xA11_5C0E);

    for round in 0..200 {
        let mut factors = random_factors(&mut rng, 1 + round % 12);
        let baseline = compute_risk_score(&factors);

        factors.shuffle(&mut rng);
        assert_eq!(
            compute_risk_score(&factors),
            baseline,
            "round {round}: shuffled factors scored differently"
        );

        factors.reverse();
        assert_eq!(compute_risk_score(&factors), baseline);
    }
}

#[test]
fn percentage_is_monotonic_in_each_score() {
    let mut rng = Pcg64Mcg::seed_from_u64(7);

    for _ in 0..200 {
        let mut factors = random_factors(&mut rng, 6);
        let idx = rng.gen_range(0..factors.len());
        let before = compute_risk_score(&factors).risk_percentage;

        factors[idx].score += 1;
        let after = compute_risk_score(&factors).risk_percentage;

        assert!(
            after >= before,
            "raising factor {idx} score lowered percentage: {before} -> {after}"
        );
    }
}

#[test]
fn out_of_scale_scores_are_not_clamped() {
    let result = compute_risk_score(&[factor("custom", 10, 1.0)]);
    assert!((result.risk_percentage - 200.0).abs() < 1e-9);
    assert_eq!(result.risk_level, RiskLevel::High);

    let result = compute_risk_score(&[factor("custom", -5, 1.0)]);
    assert!((result.risk_percentage + 100.0).abs() < 1e-9);
    assert_eq!(result.risk_level, RiskLevel::Low);
}

/// Non-numeric input propagates: the verdict falls through to LOW and
/// the display shows NaN.
#[test]
fn nan_weight_propagates_to_display() {
    let result = compute_risk_score(&[factor("a", 3, f64::NAN), factor("b", 5, 0.5)]);

    assert!(result.risk_percentage.is_nan());
    assert_eq!(result.formatted_percentage(), "NaN");
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.due_diligence, DueDiligence::SDD);
}

/// The seeded catalog with nothing selected sits at 24%: weights sum
/// to 1.07 and two factors start at score 2.
#[test]
fn builtin_catalog_defaults_score_low() {
    let catalog = FactorCatalog::builtin();
    let result = compute_risk_score(&catalog.factors);

    assert!((result.total_weighted_score - 1.20).abs() < 1e-9);
    assert_eq!(result.formatted_total(), "1.20");
    assert_eq!(result.formatted_percentage(), "24.0");
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!((catalog.total_weight() - 1.07).abs() < 1e-9);
}

#[test]
fn levels_serialize_in_upper_case() {
    let result = compute_risk_score(&[factor("a", 5, 1.0)]);
    let json = serde_json::to_value(result).unwrap();

    assert_eq!(json["risk_level"], "HIGH");
    assert_eq!(json["due_diligence"], "EDD");
    assert_eq!(result.risk_level.to_string(), "HIGH");
    assert_eq!(result.due_diligence.description(), "Enhanced Due Diligence");
}
