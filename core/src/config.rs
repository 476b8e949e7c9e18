use crate::{
    factor::{FactorOption, RiskFactor},
    types::{Score, Weight},
};
use serde::Deserialize;
use std::collections::HashSet;

/// Environment variable holding the CDN base URL for image rewriting.
pub const CDN_PREFIX_VAR: &str = "CDN_IMG_PREFIX";
/// Environment variable that turns on per-reference rewrite logging when "1".
pub const CDN_DEBUG_VAR: &str = "CDN_IMG_DEBUG";

// ── Factor catalog ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    factors: Vec<RiskFactor>,
}

/// The seeded list of built-in risk factors an assessment starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorCatalog {
    pub factors: Vec<RiskFactor>,
}

impl FactorCatalog {
    /// Load from the data/ directory.
    /// Without a data directory, use FactorCatalog::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/factors/builtin_factors.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: CatalogFile = serde_json::from_str(&content)?;

        let mut ids = HashSet::new();
        let mut factors = Vec::with_capacity(file.factors.len());
        for mut factor in file.factors {
            if !ids.insert(factor.id.clone()) {
                anyhow::bail!("{path}: duplicate factor id '{}'", factor.id);
            }
            factor
                .validate()
                .map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
            // Anything shipped in the catalog counts as built in.
            factor.editable = false;
            factors.push(factor);
        }

        log::debug!("catalog: loaded {} factors from {path}", factors.len());
        Ok(Self { factors })
    }

    /// Load from `data_dir` when its catalog file exists, else fall back
    /// to the compiled-in list.
    pub fn load_or_builtin(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/factors/builtin_factors.json");
        if std::path::Path::new(&path).is_file() {
            Self::load(data_dir)
        } else {
            log::debug!("catalog: {path} not found, using built-in factors");
            Ok(Self::builtin())
        }
    }

    /// Catalog with hardcoded defaults. Same content as data/factors.
    pub fn builtin() -> Self {
        let factors = vec![
            seeded(
                "facility_amount",
                "Facility Amount",
                1,
                0.08,
                &[
                    ("low", 1, "Under $500K"),
                    ("medium", 2, "$500K - $2M"),
                    ("high", 3, "Over $2M"),
                ],
            ),
            seeded(
                "business_relationship",
                "Nature of Business Relationship",
                1,
                0.03,
                &[
                    ("long_standing", 1, "Long-standing (>3 years)"),
                    ("established", 2, "Established (1-3 years)"),
                    ("new", 3, "New relationship (<1 year)"),
                ],
            ),
            seeded(
                "operating_history",
                "Company Operating History",
                1,
                0.03,
                &[
                    ("mature", 1, ">5 years"),
                    ("established", 2, "2-5 years"),
                    ("new", 3, "<2 years"),
                ],
            ),
            seeded(
                "legal_entity",
                "Legal Entity Type",
                2,
                0.05,
                &[
                    ("public_company", 1, "Public Company"),
                    ("private_company", 2, "Private Company"),
                    ("partnership", 3, "Partnership"),
                    ("sole_proprietorship", 4, "Sole Proprietorship"),
                ],
            ),
            seeded(
                "industry_sector",
                "Industry / Sector Risk",
                1,
                0.05,
                &[
                    ("low_risk", 1, "Low Risk (Manufacturing, Technology)"),
                    ("medium_risk", 2, "Medium Risk (Construction, Trading)"),
                    ("high_risk", 3, "High Risk (Cash-intensive, MSB)"),
                ],
            ),
            seeded(
                "travel_destination",
                "Travel Destination Risk",
                2,
                0.08,
                &[
                    ("low_risk", 1, "Low risk regions only"),
                    ("mixed", 2, "Mixed travel including moderate-risk regions"),
                    ("high_risk", 3, "High-risk or sanctioned regions"),
                ],
            ),
            seeded(
                "sanctions",
                "Sanctions & Whitelist Checks",
                1,
                0.25,
                &[
                    ("no_hits", 1, "No Hits"),
                    ("minor_hits", 2, "Minor/Historical Hits"),
                    ("moderate_hits", 3, "Moderate Concerns"),
                    ("significant_hits", 4, "Significant Hits"),
                    ("major_hits", 5, "Major Sanctions/Blacklist"),
                ],
            ),
            seeded(
                "peps",
                "Politically Exposed Persons (PEPs) & Related Parties",
                1,
                0.25,
                &[
                    ("no_pep", 1, "No PEP involvement"),
                    ("minor_pep", 2, "Minor PEP connection"),
                    ("moderate_pep", 3, "Moderate PEP involvement"),
                    ("significant_pep", 4, "Significant PEP involvement"),
                    ("major_pep", 5, "Major PEP/High-risk political exposure"),
                ],
            ),
            seeded(
                "adverse_media",
                "Negative Media & Reputation Check",
                1,
                0.10,
                &[
                    ("clean", 1, "Clean media profile"),
                    ("minor_negative", 2, "Minor negative coverage"),
                    ("moderate_negative", 3, "Moderate concerns"),
                    ("significant_negative", 4, "Significant negative media"),
                    ("major_negative", 5, "Major scandals/investigations"),
                ],
            ),
            seeded(
                "ubo_transparency",
                "UBO Transparency",
                1,
                0.10,
                &[
                    ("fully_disclosed", 1, "UBOs fully disclosed and verified"),
                    ("mostly_disclosed", 2, "Most UBOs disclosed"),
                    ("partially_disclosed", 3, "Partial disclosure"),
                    ("limited_disclosure", 4, "Limited transparency"),
                ],
            ),
            seeded(
                "ownership_complexity",
                "Ownership Structure Complexity",
                1,
                0.05,
                &[
                    ("simple", 1, "Simple direct ownership"),
                    ("moderate", 2, "Moderate complexity"),
                    ("complex", 3, "Complex multi-layered structure"),
                ],
            ),
        ];

        Self { factors }
    }

    pub fn get(&self, id: &str) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.id == id)
    }

    /// Sum of all catalog weights. Not required to be 1.0.
    pub fn total_weight(&self) -> Weight {
        self.factors.iter().map(|f| f.weight).sum()
    }
}

fn seeded(
    id: &str,
    name: &str,
    score: Score,
    weight: Weight,
    options: &[(&str, Score, &str)],
) -> RiskFactor {
    RiskFactor {
        id: id.into(),
        name: name.into(),
        value: String::new(),
        score,
        weight,
        options: options
            .iter()
            .map(|&(value, score, label)| FactorOption::new(value, score, label))
            .collect(),
        editable: false,
    }
}

// ── CDN image rewriting ────────────────────────────────────────────

/// Build-time settings for the image CDN rewriter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdnConfig {
    /// None disables rewriting entirely.
    pub cdn_base: Option<String>,
    pub debug: bool,
}

impl CdnConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(CDN_PREFIX_VAR).ok(),
            std::env::var(CDN_DEBUG_VAR).ok(),
        )
    }

    /// Build from raw variable values. An empty prefix counts as unset.
    pub fn from_vars(prefix: Option<String>, debug: Option<String>) -> Self {
        Self {
            cdn_base: prefix.filter(|p| !p.is_empty()),
            debug: debug.as_deref() == Some("1"),
        }
    }

    pub fn with_cdn(cdn_base: impl Into<String>) -> Self {
        Self {
            cdn_base: Some(cdn_base.into()),
            debug: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cdn_base.is_some()
    }
}
