//! One study year, end to end.

use twf_core::{Advisory, DimensionError, StudyYear, TwfConfig};
use twf_footprint::{
    category_footprints, category_intensity, eur_million_to_crore, propagate, sensitivity, split_footprint,
    structural_views, CategoryFootprint, CategoryIntensity, DirectScenarios, Propagation,
    Reconciliation, SensitivityRange, SplitFootprint, StructuralViews, TouristDayIntensity,
    DEFAULT_SENSITIVITY_GROUPS,
};
use twf_iotable::{build_io, ConservationCheck, IoSummary, IoTable};
use twf_linalg::Vector;
use twf_montecarlo::{default_parameters, run_monte_carlo, DirectInputs, MonteCarloInputs, MonteCarloResult};
use twf_paths::{hem, rank_pull, HemRow, PathRanking};

use crate::inputs::required;
use crate::{PipelineError, RunOptions, YearInputs};

/// Direct water and per-tourist-day intensity for a year with activity data.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectResult {
    /// Low, base and high scenarios.
    pub scenarios: DirectScenarios,
    /// Litres per tourist-day, indirect plus base direct water.
    pub tourist_intensity: TouristDayIntensity,
}

/// Everything computed for one successful study year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearResult {
    /// Study year.
    pub year: StudyYear,
    /// Built IO system.
    pub table: IoTable,
    /// Headline IO numbers.
    pub io_summary: IoSummary,
    /// Water intensities used, product space.
    pub w: Vector,
    /// Tourism demand used, product space.
    pub y: Vector,
    /// Demand mapping conservation, when demand came through a concordance.
    pub demand_mapping: Option<ConservationCheck>,
    /// WL, TWF and the pull matrix.
    pub propagation: Propagation,
    /// Destination and origin views.
    pub views: StructuralViews,
    /// View consistency against the footprint, when categories exist.
    pub reconciliation: Option<Reconciliation>,
    /// Per-category footprints.
    pub category_footprints: Vec<CategoryFootprint>,
    /// Per-category intensities.
    pub category_intensity: Vec<CategoryIntensity>,
    /// ±20% coefficient sensitivity.
    pub sensitivity: Vec<SensitivityRange>,
    /// Inbound vs domestic, when both segment vectors are given.
    pub split: Option<SplitFootprint>,
    /// Direct water, when activity data is given.
    pub direct: Option<DirectResult>,
    /// Uncertainty band, unless disabled.
    pub monte_carlo: Option<MonteCarloResult>,
    /// Top supply-chain paths.
    pub paths: PathRanking,
    /// Tourism dependency per product.
    pub hem: Vec<HemRow>,
    /// Every advisory raised for this year.
    pub advisories: Vec<Advisory>,
}

impl YearResult {
    /// Indirect plus base-scenario direct water, m³.
    pub fn total_water(&self) -> f64 {
        self.propagation.total + self.direct.as_ref().map_or(0.0, |d| d.scenarios.base.total)
    }
}

struct Mapped {
    values: Vector,
    conservation: Option<ConservationCheck>,
}

fn product_vector(year: &str, context: &'static str, values: &[f64], n: usize) -> Result<Vector, PipelineError> {
    DimensionError::check_len(context, n, values.len()).map_err(|source| PipelineError::Dimension {
        year: year.to_string(),
        source,
    })?;
    Ok(Vector::from_column_slice(values))
}

fn resolve_water(
    study_year: &StudyYear,
    inputs: &YearInputs,
    n: usize,
    advisories: &mut Vec<Advisory>,
) -> Result<Vector, PipelineError> {
    let year = study_year.label.as_str();
    if let Some(w) = &inputs.water_coefficients {
        return product_vector(year, "water_coefficients", w, n);
    }
    let source = required(year, "water_coefficients", &inputs.source_water_coefficients)?;
    let concordance = required(year, "concordance", &inputs.concordance)?;
    let converted: Vec<f64> = match study_year.eur_inr {
        Some(rate) => source.iter().map(|&c| eur_million_to_crore(c, rate)).collect(),
        None => source.clone(),
    };
    let mapped = concordance.map_coefficients(&converted, n);
    advisories.extend(mapped.advisories);
    Ok(mapped.values)
}

fn resolve_demand(
    year: &str,
    inputs: &YearInputs,
    n: usize,
    tolerance_pct: f64,
    advisories: &mut Vec<Advisory>,
) -> Result<Mapped, PipelineError> {
    if let Some(y) = &inputs.tourism_demand {
        return Ok(Mapped {
            values: product_vector(year, "tourism_demand", y, n)?,
            conservation: None,
        });
    }
    let source = required(year, "tourism_demand", &inputs.source_tourism_demand)?;
    let concordance = required(year, "concordance", &inputs.concordance)?;
    let mapped = concordance.map_demand(source, n, tolerance_pct);
    advisories.extend(mapped.advisories);
    Ok(Mapped {
        values: mapped.values,
        conservation: mapped.conservation,
    })
}

/// Build and analyse one study year.
pub fn process_year(
    config: &TwfConfig,
    study_year: &StudyYear,
    inputs: Option<&YearInputs>,
    options: &RunOptions,
) -> Result<YearResult, PipelineError> {
    let year = study_year.label.as_str();
    let inputs = inputs.ok_or_else(|| PipelineError::MissingInput {
        year: year.to_string(),
        input: "year inputs",
    })?;
    let footprint_err = |source| PipelineError::Footprint {
        year: year.to_string(),
        source,
    };

    let table = build_io(&inputs.supply_use(year)?, &config.tolerances).map_err(|source| PipelineError::IoTable {
        year: year.to_string(),
        source,
    })?;
    let n = table.n_products();
    let mut advisories = table.advisories();

    let w = resolve_water(study_year, inputs, n, &mut advisories)?;
    let demand = resolve_demand(year, inputs, n, config.tolerances.demand_mapping_pct, &mut advisories)?;
    let y = demand.values;

    let propagation = propagate(&w, &table.l, &y).map_err(footprint_err)?;

    let categories = inputs.demand_categories();
    let views = structural_views(&propagation.pull, &categories, &config.classification);
    advisories.extend(views.advisories.iter().cloned());
    let reconciliation = (!categories.is_empty()).then(|| {
        let r = views.reconcile(propagation.total, config.tolerances.conservation_pct);
        if let Some(a) = r.advisory() {
            a.emit(Some(year));
            advisories.push(a);
        }
        r
    });
    let footprints = category_footprints(&propagation, &y, &categories);
    let intensity = category_intensity(&footprints);

    let sensitivity = sensitivity(&w, &table.l, &y, &config.classification, &DEFAULT_SENSITIVITY_GROUPS)
        .map_err(footprint_err)?;

    let split = match (&inputs.inbound_demand, &inputs.domestic_demand) {
        (Some(inb), Some(dom)) => {
            let inb = product_vector(year, "inbound_demand", inb, n)?;
            let dom = product_vector(year, "domestic_demand", dom, n)?;
            Some(split_footprint(&w, &table.l, &inb, &dom).map_err(footprint_err)?)
        }
        _ => None,
    };

    let direct_inputs = match (&inputs.activity, &inputs.direct_coefficients) {
        (Some(activity), Some(coefficients)) => Some(DirectInputs { activity, coefficients }),
        _ => None,
    };
    let direct = match direct_inputs {
        Some(d) => {
            let scenarios = DirectScenarios::compute(d.activity, d.coefficients).map_err(footprint_err)?;
            let days = d.activity.tourist_days();
            let tourist_intensity =
                TouristDayIntensity::from_total(propagation.total + scenarios.base.total, days);
            Some(DirectResult {
                scenarios,
                tourist_intensity,
            })
        }
        None => None,
    };

    let monte_carlo = if options.monte_carlo {
        let mc_inputs = MonteCarloInputs {
            w: &w,
            l: &table.l,
            y: &y,
            classifier: &config.classification,
            direct: direct_inputs,
        };
        let params = default_parameters(config.monte_carlo.normal_clamp);
        let index = config.study_years.iter().position(|y| y.label == year).unwrap_or(0);
        let settings = config.monte_carlo.for_year(index);
        let result = run_monte_carlo(mc_inputs, &params, &settings).map_err(|source| {
            PipelineError::MonteCarlo {
                year: year.to_string(),
                source,
            }
        })?;
        advisories.extend(result.advisories.iter().cloned());
        Some(result)
    } else {
        None
    };

    let paths_err = |source| PipelineError::Paths {
        year: year.to_string(),
        source,
    };
    let paths = rank_pull(&propagation.pull, &config.classification, config.paths.top_k).map_err(paths_err)?;
    let hem = hem(&w, &table.l, &y, &config.classification).map_err(paths_err)?;

    let deflator = config.deflator(year)?;
    let io_summary = IoSummary::from_table(year, &table, deflator);

    tracing::info!(
        year,
        products = n,
        indirect = propagation.total,
        direct = direct.as_ref().map_or(0.0, |d| d.scenarios.base.total),
        pseudo_inverse = table.inversion.is_degraded(),
        advisories = advisories.len(),
        "study year complete"
    );

    Ok(YearResult {
        year: study_year.clone(),
        table,
        io_summary,
        w,
        y,
        demand_mapping: demand.conservation,
        propagation,
        views,
        reconciliation,
        category_footprints: footprints,
        category_intensity: intensity,
        sensitivity,
        split,
        direct,
        monte_carlo,
        paths,
        hem,
        advisories,
    })
}
