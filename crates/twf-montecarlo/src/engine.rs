//! # Sampling and Evaluation
//!
//! ## Reproducibility
//!
//! All samples are drawn up front, one parameter after another, from a
//! single [`ChaCha8Rng`] seeded with the configured seed. Evaluation then
//! reads draw `i` from every parameter's column, so running it on the
//! rayon pool cannot reorder or reseed the stream. The same seed, draw
//! count and inputs give bit-identical draws and percentiles.
//!
//! ## Evaluation
//!
//! The indirect footprint is linear in W, so a draw's indirect water is
//! `Σ_g m_g · C_g` where `C_g` is source group `g`'s base contribution to
//! `W · L · Y` and `m_g` the product of the water multipliers drawn for
//! `g`. Direct water re-evaluates the activity formulas with the drawn
//! coefficient and volume multipliers.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use twf_core::{Advisory, MonteCarloSettings, SectorClassifier, SourceGroup};
use twf_footprint::{
    direct_water, source_contributions, ActivityData, DirectCoefficients, DirectMultipliers, DirectWater, Scenario,
};
use twf_linalg::{Matrix, Vector};

use crate::stats::{spearman, Percentiles};
use crate::{Distribution, MonteCarloError, Parameter, ParameterTarget};

/// Activity data and coefficients for the direct-water term.
#[derive(Debug, Clone, Copy)]
pub struct DirectInputs<'a> {
    /// Activity volumes.
    pub activity: &'a ActivityData,
    /// Per-activity coefficients; the base scenario is perturbed.
    pub coefficients: &'a DirectCoefficients,
}

/// Base inputs for one year.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloInputs<'a> {
    /// Water intensities.
    pub w: &'a Vector,
    /// Leontief inverse.
    pub l: &'a Matrix,
    /// Tourism demand.
    pub y: &'a Vector,
    /// Product → source group table.
    pub classifier: &'a SectorClassifier,
    /// Direct-water inputs, if available for the year.
    pub direct: Option<DirectInputs<'a>>,
}

/// Footprint components of one draw, m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    /// Indirect (supply-chain) water.
    pub indirect: f64,
    /// Direct (on-site) water.
    pub direct: f64,
    /// `indirect + direct`.
    pub total: f64,
}

/// Every sampled value of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSamples {
    /// Parameter name.
    pub name: String,
    /// What it scales.
    pub target: ParameterTarget,
    /// Its distribution.
    pub distribution: Distribution,
    /// Sampled multipliers, in draw order.
    pub values: Vec<f64>,
    /// Draws that hit a clamp bound.
    pub clamped: usize,
}

/// Rank-correlation attribution for one parameter.
///
/// `variance_share_pct = 100 · ρ²` measures monotonic association. It is an
/// approximation to a variance share and the rows need not sum to 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceShare {
    /// Parameter name.
    pub parameter: String,
    /// Spearman ρ against the total, `None` if either series is constant.
    pub spearman_rho: Option<f64>,
    /// `100 · ρ²`.
    pub variance_share_pct: Option<f64>,
}

/// Result of a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// RNG seed used.
    pub seed: u64,
    /// Number of draws.
    pub draws: usize,
    /// Unperturbed footprint.
    pub base: Draw,
    /// Every draw, in draw order.
    pub samples: Vec<Draw>,
    /// Every sampled parameter value.
    pub parameters: Vec<ParameterSamples>,
    /// Percentile band of the total.
    pub percentiles: Percentiles,
    /// `100 · (p95 − p5) / p50`.
    pub range_pct: Option<f64>,
    /// Attribution rows, largest `|ρ|` first.
    pub variance: Vec<VarianceShare>,
    /// Parameter with the largest `|ρ|`.
    pub top_parameter: Option<String>,
    /// Clamping advisories.
    pub advisories: Vec<Advisory>,
}

impl MonteCarloResult {
    /// Total footprint of every draw.
    pub fn totals(&self) -> Vec<f64> {
        self.samples.iter().map(|d| d.total).collect()
    }
}

/// Per-draw multipliers gathered from the parameter columns.
#[derive(Debug, Clone, Copy)]
struct DrawMultipliers {
    water: [f64; SourceGroup::COUNT],
    direct: DirectMultipliers,
}

fn multipliers_at(parameters: &[ParameterSamples], i: usize) -> DrawMultipliers {
    let mut water = [1.0; SourceGroup::COUNT];
    let mut direct = DirectMultipliers::default();
    for p in parameters {
        let v = p.values[i];
        match p.target {
            ParameterTarget::WaterGroup(g) => water[g.ordinal()] *= v,
            ParameterTarget::Hotel => direct.hotel *= v,
            ParameterTarget::Restaurant => direct.restaurant *= v,
            ParameterTarget::Rail => direct.rail *= v,
            ParameterTarget::Air => direct.air *= v,
            ParameterTarget::DomesticVolume => direct.domestic_volume *= v,
            ParameterTarget::InboundVolume => direct.inbound_volume *= v,
        }
    }
    DrawMultipliers { water, direct }
}

fn sample_parameters(
    parameters: &[Parameter],
    draws: usize,
    seed: u64,
) -> Result<(Vec<ParameterSamples>, Vec<Advisory>), MonteCarloError> {
    let samplers = parameters
        .iter()
        .map(|p| p.distribution.sampler(&p.name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut advisories = Vec::new();
    let mut columns = Vec::with_capacity(parameters.len());

    for (p, sampler) in parameters.iter().zip(&samplers) {
        let mut values = Vec::with_capacity(draws);
        let mut clamped = 0;
        for _ in 0..draws {
            let (v, was_clamped) = sampler.draw(&mut rng);
            values.push(v);
            clamped += usize::from(was_clamped);
        }
        if clamped > 0 {
            if let Distribution::Normal { clamp: Some([lower, upper]), .. } = p.distribution {
                advisories.push(Advisory::SamplesClamped {
                    parameter: p.name.clone(),
                    count: clamped,
                    lower,
                    upper,
                });
            }
        }
        columns.push(ParameterSamples {
            name: p.name.clone(),
            target: p.target,
            distribution: p.distribution,
            values,
            clamped,
        });
    }
    Ok((columns, advisories))
}

/// Run `settings.draws` perturbed footprints.
pub fn run_monte_carlo(
    inputs: MonteCarloInputs<'_>,
    parameters: &[Parameter],
    settings: &MonteCarloSettings,
) -> Result<MonteCarloResult, MonteCarloError> {
    let draws = settings.draws;
    if draws == 0 {
        return Err(MonteCarloError::ZeroDraws);
    }
    if draws < 2 {
        return Err(MonteCarloError::TooFewDraws { got: draws });
    }

    let contributions = source_contributions(inputs.w, inputs.l, inputs.y)?;
    let mut group_water = [0.0; SourceGroup::COUNT];
    for (c, g) in contributions.iter().zip(inputs.classifier.groups_for(contributions.len())) {
        group_water[g.ordinal()] += c;
    }

    let direct_at = |m: &DirectMultipliers| match inputs.direct {
        Some(d) => DirectWater::evaluate(d.activity, d.coefficients, Scenario::Base, m).total,
        None => 0.0,
    };
    let base_direct = match inputs.direct {
        Some(d) => direct_water(d.activity, d.coefficients, Scenario::Base, &DirectMultipliers::default())?.total,
        None => 0.0,
    };
    let base_indirect: f64 = group_water.iter().sum();
    let base = Draw {
        indirect: base_indirect,
        direct: base_direct,
        total: base_indirect + base_direct,
    };

    let (columns, advisories) = sample_parameters(parameters, draws, settings.seed)?;
    for advisory in &advisories {
        advisory.emit(None);
    }

    let samples: Vec<Draw> = (0..draws)
        .into_par_iter()
        .map(|i| {
            let m = multipliers_at(&columns, i);
            let indirect: f64 = group_water.iter().zip(&m.water).map(|(c, f)| c * f).sum();
            let direct = direct_at(&m.direct);
            Draw {
                indirect,
                direct,
                total: indirect + direct,
            }
        })
        .collect();

    let totals: Vec<f64> = samples.iter().map(|d| d.total).collect();
    let percentiles = Percentiles::of(&totals).ok_or(MonteCarloError::ZeroDraws)?;

    let mut variance = columns
        .iter()
        .map(|c| {
            let rho = spearman(&c.values, &totals)?;
            Ok(VarianceShare {
                parameter: c.name.clone(),
                spearman_rho: rho,
                variance_share_pct: rho.map(|r| 100.0 * r * r),
            })
        })
        .collect::<Result<Vec<_>, MonteCarloError>>()?;
    variance.sort_by(|a, b| {
        let key = |v: &VarianceShare| v.spearman_rho.map_or(-1.0, f64::abs);
        key(b).total_cmp(&key(a))
    });
    let top_parameter = variance
        .first()
        .filter(|v| v.spearman_rho.is_some())
        .map(|v| v.parameter.clone());

    tracing::info!(
        draws,
        seed = settings.seed,
        base = base.total,
        p5 = percentiles.p5,
        p50 = percentiles.p50,
        p95 = percentiles.p95,
        top = top_parameter.as_deref().unwrap_or("-"),
        "monte carlo complete"
    );

    Ok(MonteCarloResult {
        seed: settings.seed,
        draws,
        base,
        samples,
        parameters: columns,
        range_pct: percentiles.range_pct(),
        percentiles,
        variance,
        top_parameter,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_parameters;
    use approx::assert_relative_eq;
    use twf_core::GroupRange;
    use twf_footprint::ScenarioValues;

    struct Fixture {
        w: Vector,
        l: Matrix,
        y: Vector,
        classifier: SectorClassifier,
        activity: ActivityData,
        coefficients: DirectCoefficients,
    }

    fn fixture() -> Fixture {
        Fixture {
            w: Vector::from_vec(vec![5000.0, 0.0, 0.0]),
            l: twf_linalg::from_rows(&[
                vec![1.2, 0.8, 0.1],
                vec![0.3, 1.5, 0.2],
                vec![0.4, 0.6, 1.3],
            ])
            .unwrap(),
            y: Vector::from_vec(vec![0.0, 150.0, 300.0]),
            classifier: SectorClassifier {
                ranges: vec![GroupRange { first: 1, last: 1, group: SourceGroup::Agriculture }],
                fallback: SourceGroup::Services,
            },
            activity: ActivityData {
                classified_rooms: 1000.0,
                occupancy_rate: 0.5,
                nights_per_year: 360.0,
                domestic_tourists_m: 2.0,
                inbound_tourists_m: 0.5,
                avg_stay_days_dom: 2.0,
                avg_stay_days_inb: 10.0,
                meals_per_tourist_day: 2.0,
                rail_pkm_b: 1.0,
                tourist_rail_share: 0.1,
                air_pax_m: 1.0,
                tourist_air_share: 0.5,
            },
            coefficients: DirectCoefficients {
                hotel: ScenarioValues::new(1000.0, 1500.0, 2000.0),
                restaurant: ScenarioValues::new(10.0, 20.0, 30.0),
                rail: ScenarioValues::new(2.0, 3.0, 4.0),
                air: ScenarioValues::new(10.0, 20.0, 30.0),
            },
        }
    }

    impl Fixture {
        fn inputs(&self, with_direct: bool) -> MonteCarloInputs<'_> {
            MonteCarloInputs {
                w: &self.w,
                l: &self.l,
                y: &self.y,
                classifier: &self.classifier,
                direct: with_direct.then_some(DirectInputs {
                    activity: &self.activity,
                    coefficients: &self.coefficients,
                }),
            }
        }
    }

    fn settings(draws: usize, seed: u64) -> MonteCarloSettings {
        MonteCarloSettings {
            draws,
            seed,
            normal_clamp: [0.1, 3.0],
        }
    }

    #[test]
    fn same_seed_gives_identical_results() {
        let f = fixture();
        let params = default_parameters([0.1, 3.0]);
        let a = run_monte_carlo(f.inputs(true), &params, &settings(2000, 42)).unwrap();
        let b = run_monte_carlo(f.inputs(true), &params, &settings(2000, 42)).unwrap();
        assert_eq!(a.samples, b.samples);
        assert_eq!(a.percentiles, b.percentiles);
        let c = run_monte_carlo(f.inputs(true), &params, &settings(2000, 43)).unwrap();
        assert_ne!(a.samples, c.samples);
    }

    #[test]
    fn base_matches_deterministic_footprint() {
        let f = fixture();
        let r = run_monte_carlo(f.inputs(true), &default_parameters([0.1, 3.0]), &settings(100, 1)).unwrap();
        assert_relative_eq!(r.base.indirect, 750_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.base.direct, 940_000.0, epsilon = 1e-6);
        assert_eq!(r.samples.len(), 100);
        assert_eq!(r.parameters.len(), 7);
        assert!(r.parameters.iter().all(|p| p.values.len() == 100));
    }

    #[test]
    fn draw_recomputes_perturbed_water_vector() {
        let f = fixture();
        let params = default_parameters([0.1, 3.0]);
        let r = run_monte_carlo(f.inputs(false), &params, &settings(50, 9)).unwrap();
        for (i, draw) in r.samples.iter().enumerate() {
            let mult = r.parameters[0].values[i];
            let w = Vector::from_vec(vec![5000.0 * mult, 0.0, 0.0]);
            let expected = twf_footprint::total_footprint(&w, &f.l, &f.y).unwrap();
            assert_relative_eq!(draw.indirect, expected, max_relative = 1e-12);
            assert_eq!(draw.direct, 0.0);
        }
    }

    #[test]
    fn only_water_parameter_drives_indirect_only_run() {
        let f = fixture();
        let r = run_monte_carlo(f.inputs(false), &default_parameters([0.1, 3.0]), &settings(500, 42)).unwrap();
        assert_eq!(r.top_parameter.as_deref(), Some("agriculture_water"));
        let top = &r.variance[0];
        assert_relative_eq!(top.spearman_rho.unwrap(), 1.0, epsilon = 1e-12);
        assert!(r.percentiles.p5 < r.percentiles.p50 && r.percentiles.p50 < r.percentiles.p95);
        assert!(r.range_pct.unwrap() > 0.0);
    }

    #[test]
    fn clamping_is_reported() {
        let f = fixture();
        let params = vec![Parameter::new(
            "wide_rail",
            ParameterTarget::Rail,
            Distribution::Normal { mean: 1.0, sd: 2.0, clamp: Some([0.1, 3.0]) },
        )];
        let r = run_monte_carlo(f.inputs(true), &params, &settings(1000, 42)).unwrap();
        assert_eq!(r.advisories.len(), 1);
        assert!(matches!(
            &r.advisories[0],
            Advisory::SamplesClamped { parameter, count, .. } if parameter == "wide_rail" && *count > 0
        ));
    }

    #[test]
    fn degenerate_settings_are_rejected() {
        let f = fixture();
        let params = default_parameters([0.1, 3.0]);
        assert_eq!(
            run_monte_carlo(f.inputs(true), &params, &settings(0, 1)),
            Err(MonteCarloError::ZeroDraws)
        );
        assert_eq!(
            run_monte_carlo(f.inputs(true), &params, &settings(1, 1)),
            Err(MonteCarloError::TooFewDraws { got: 1 })
        );
    }
}
