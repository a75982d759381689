//! # Study Configuration
//!
//! [`TwfConfig`] is the explicit configuration object threaded through every
//! component call: the study years with their CPI values, the numeric
//! tolerances, Monte Carlo and path settings, and the sector classification.
//!
//! ## Design
//!
//! - Every field has a documented default, so a YAML document only needs
//!   `study_years`.
//! - Parsing and validation are separate steps; [`TwfConfig::from_yaml_str`]
//!   and [`TwfConfig::from_json_str`] run both.
//! - Deflators are derived on demand from CPI values, never cached.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sector::SectorClassifier;

/// Denominators below this value are replaced by `1.0`.
pub const DEFAULT_SAFE_DIVIDE_FLOOR: f64 = 0.001;

// ---------------------------------------------------------------------------
// StudyYear
// ---------------------------------------------------------------------------

/// One study year and its price data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyYear {
    /// Short label used everywhere in results (e.g. "2015").
    pub label: String,
    /// Fiscal year of the IO table (e.g. "2015-16").
    #[serde(default)]
    pub io_year: String,
    /// Consumer price index for the IO year.
    pub cpi: f64,
    /// INR per EUR, used to convert EUR-denominated water coefficients.
    #[serde(default)]
    pub eur_inr: Option<f64>,
}

impl StudyYear {
    /// Create a study year with no exchange rate.
    pub fn new(label: impl Into<String>, io_year: impl Into<String>, cpi: f64) -> Self {
        Self {
            label: label.into(),
            io_year: io_year.into(),
            cpi,
            eur_inr: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerances
// ---------------------------------------------------------------------------

/// Numeric tolerances. Percentages are in percent, not fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Allowed deviation of `sum(x)` from `sum(q)`.
    pub conservation_pct: f64,
    /// Allowed deviation of `sum(x)` from `sum(colsum(Z) + y)`.
    pub output_balance_pct: f64,
    /// Allowed loss or gain when mapping category demand onto products.
    pub demand_mapping_pct: f64,
    /// Safe-divide floor.
    pub safe_divide_floor: f64,
    /// Entries above `-negative_noise` count as non-negative.
    pub negative_noise: f64,
    /// Year-on-year shift in an A column sum that is flagged.
    pub a_drift_threshold_pct: f64,
    /// Decomposition residual allowed, as percent of the absolute change.
    pub sda_residual_pct: f64,
    /// Reciprocal condition number below which `I - A` is treated as singular.
    pub singular_rcond: f64,
    /// Year-on-year shift in per-tourist-day intensity that is flagged.
    pub intensity_shift_pct: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            conservation_pct: 1.0,
            output_balance_pct: 1.0,
            demand_mapping_pct: 2.0,
            safe_divide_floor: DEFAULT_SAFE_DIVIDE_FLOOR,
            negative_noise: 1e-9,
            a_drift_threshold_pct: 30.0,
            sda_residual_pct: 0.1,
            singular_rcond: 1e-12,
            intensity_shift_pct: 30.0,
        }
    }
}

/// Monte Carlo sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloSettings {
    /// Number of draws.
    pub draws: usize,
    /// RNG seed.
    pub seed: u64,
    /// Bounds applied to normal-derived multipliers, `[low, high]`.
    pub normal_clamp: [f64; 2],
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            draws: 10_000,
            seed: 42,
            normal_clamp: [0.1, 3.0],
        }
    }
}

impl MonteCarloSettings {
    /// Settings for the study year at `index` in configuration order.
    ///
    /// The first year keeps `seed`; later years XOR their index into it, so
    /// every year draws its own stream and appending a year leaves the
    /// earlier years' draws unchanged.
    pub fn for_year(&self, index: usize) -> Self {
        Self {
            seed: self.seed ^ index as u64,
            ..self.clone()
        }
    }
}

/// Supply-chain path settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Number of pathways kept.
    pub top_k: usize,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self { top_k: 50 }
    }
}

// ---------------------------------------------------------------------------
// TwfConfig
// ---------------------------------------------------------------------------

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwfConfig {
    /// Study years in chronological order.
    pub study_years: Vec<StudyYear>,
    /// Label of the deflator base year; first study year when absent.
    #[serde(default)]
    pub base_price_year: Option<String>,
    /// Numeric tolerances.
    #[serde(default)]
    pub tolerances: Tolerances,
    /// Monte Carlo settings.
    #[serde(default)]
    pub monte_carlo: MonteCarloSettings,
    /// Path ranking settings.
    #[serde(default)]
    pub paths: PathSettings,
    /// Product → source-group table.
    #[serde(default)]
    pub classification: SectorClassifier,
}

impl TwfConfig {
    /// Configuration with default settings for the given years.
    pub fn new(study_years: Vec<StudyYear>) -> Self {
        Self {
            study_years,
            base_price_year: None,
            tolerances: Tolerances::default(),
            monte_carlo: MonteCarloSettings::default(),
            paths: PathSettings::default(),
            classification: SectorClassifier::default(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.study_years.is_empty() {
            return Err(ConfigError::NoStudyYears);
        }

        let mut seen = HashSet::new();
        for year in &self.study_years {
            if !seen.insert(year.label.as_str()) {
                return Err(ConfigError::DuplicateYear(year.label.clone()));
            }
            if !(year.cpi.is_finite() && year.cpi > 0.0) {
                return Err(ConfigError::InvalidCpi {
                    year: year.label.clone(),
                    value: year.cpi,
                });
            }
            if let Some(rate) = year.eur_inr {
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(invalid("eur_inr", format!("{}: must be positive, got {rate}", year.label)));
                }
            }
        }

        if let Some(base) = &self.base_price_year {
            if !seen.contains(base.as_str()) {
                return Err(ConfigError::UnknownBaseYear(base.clone()));
            }
        }

        let [low, high] = self.monte_carlo.normal_clamp;
        if !(low < high) {
            return Err(invalid(
                "monte_carlo.normal_clamp",
                format!("lower bound {low} must be below upper bound {high}"),
            ));
        }
        // Percentiles and rank correlations need at least two draws.
        if self.monte_carlo.draws < 2 {
            return Err(invalid("monte_carlo.draws", "must be at least 2".to_string()));
        }
        if self.paths.top_k == 0 {
            return Err(invalid("paths.top_k", "must be at least 1".to_string()));
        }
        if !(self.tolerances.safe_divide_floor > 0.0) {
            return Err(invalid("tolerances.safe_divide_floor", "must be positive".to_string()));
        }
        Ok(())
    }

    /// Look up a study year by label.
    pub fn year(&self, label: &str) -> Result<&StudyYear, ConfigError> {
        self.study_years
            .iter()
            .find(|y| y.label == label)
            .ok_or_else(|| ConfigError::UnknownYear(label.to_string()))
    }

    /// The deflator base year.
    pub fn base_year(&self) -> Result<&StudyYear, ConfigError> {
        match &self.base_price_year {
            Some(label) => self
                .year(label)
                .map_err(|_| ConfigError::UnknownBaseYear(label.clone())),
            None => self.study_years.first().ok_or(ConfigError::NoStudyYears),
        }
    }

    /// `CPI[year] / CPI[base]`. Nominal values divided by this are in base-year prices.
    pub fn deflator(&self, label: &str) -> Result<f64, ConfigError> {
        let year = self.year(label)?;
        let base = self.base_year()?;
        Ok(year.cpi / base.cpi)
    }

    /// Study-year labels in configured order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.study_years.iter().map(|y| y.label.as_str())
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::InvalidSetting {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_years() -> TwfConfig {
        TwfConfig::new(vec![
            StudyYear::new("2015", "2015-16", 100.0),
            StudyYear::new("2019", "2019-20", 125.0),
            StudyYear::new("2022", "2021-22", 150.0),
        ])
    }

    #[test]
    fn yaml_with_only_years_gets_defaults() {
        let yaml = r#"
study_years:
  - label: "2015"
    io_year: "2015-16"
    cpi: 100.0
  - label: "2022"
    io_year: "2021-22"
    cpi: 150.0
    eur_inr: 84.0
"#;
        let config = TwfConfig::from_yaml_str(yaml).expect("valid config");
        assert_eq!(config.tolerances, Tolerances::default());
        assert_eq!(config.monte_carlo.draws, 10_000);
        assert_eq!(config.monte_carlo.seed, 42);
        assert_eq!(config.paths.top_k, 50);
        assert_eq!(config.study_years[1].eur_inr, Some(84.0));
        assert_eq!(config.classification, SectorClassifier::default());
    }

    #[test]
    fn partial_tolerances_keep_other_defaults() {
        let json = r#"{
            "study_years": [{"label": "2015", "cpi": 100.0}],
            "tolerances": {"a_drift_threshold_pct": 20.0}
        }"#;
        let config = TwfConfig::from_json_str(json).expect("valid config");
        assert_eq!(config.tolerances.a_drift_threshold_pct, 20.0);
        assert_eq!(config.tolerances.conservation_pct, 1.0);
    }

    #[test]
    fn deflator_uses_first_year_by_default() {
        let config = three_years();
        assert_eq!(config.deflator("2015").unwrap(), 1.0);
        assert_eq!(config.deflator("2022").unwrap(), 1.5);
    }

    #[test]
    fn deflator_respects_explicit_base() {
        let mut config = three_years();
        config.base_price_year = Some("2022".into());
        config.validate().unwrap();
        assert_eq!(config.deflator("2022").unwrap(), 1.0);
        assert!((config.deflator("2015").unwrap() - 100.0 / 150.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_year_is_an_error() {
        let config = three_years();
        assert_eq!(
            config.deflator("1999"),
            Err(ConfigError::UnknownYear("1999".into()))
        );
    }

    #[test]
    fn validation_rejects_bad_configs() {
        assert_eq!(TwfConfig::new(vec![]).validate(), Err(ConfigError::NoStudyYears));

        let mut dup = three_years();
        dup.study_years.push(StudyYear::new("2015", "", 101.0));
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateYear("2015".into())));

        let mut cpi = three_years();
        cpi.study_years[1].cpi = 0.0;
        assert!(matches!(cpi.validate(), Err(ConfigError::InvalidCpi { .. })));

        let mut base = three_years();
        base.base_price_year = Some("2011".into());
        assert_eq!(base.validate(), Err(ConfigError::UnknownBaseYear("2011".into())));

        let mut clamp = three_years();
        clamp.monte_carlo.normal_clamp = [3.0, 0.1];
        assert!(matches!(clamp.validate(), Err(ConfigError::InvalidSetting { .. })));

        let mut draws = three_years();
        draws.monte_carlo.draws = 0;
        assert!(matches!(draws.validate(), Err(ConfigError::InvalidSetting { .. })));

        let mut top = three_years();
        top.paths.top_k = 0;
        assert!(matches!(top.validate(), Err(ConfigError::InvalidSetting { .. })));
    }

    #[test]
    fn each_year_gets_its_own_seed() {
        let mc = MonteCarloSettings::default();
        assert_eq!(mc.for_year(0), mc);
        let seeds: Vec<u64> = (0..4).map(|i| mc.for_year(i).seed).collect();
        assert_eq!(seeds, vec![42, 43, 40, 41]);
        assert_eq!(mc.for_year(2).draws, mc.draws);
    }

    #[test]
    fn single_draw_is_rejected() {
        let mut config = three_years();
        config.monte_carlo.draws = 1;
        match config.validate() {
            Err(ConfigError::InvalidSetting { field, reason }) => {
                assert_eq!(field, "monte_carlo.draws");
                assert!(reason.contains("at least 2"));
            }
            other => panic!("expected invalid draws, got {other:?}"),
        }

        config.monte_carlo.draws = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = TwfConfig::from_yaml_str("study_years: [not, a, year");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn labels_preserve_order() {
        let config = three_years();
        assert_eq!(config.labels().collect::<Vec<_>>(), vec!["2015", "2019", "2022"]);
    }
}
