//! # twf-footprint — Footprint Propagator
//!
//! Given a water-intensity vector W, a Leontief inverse L and a tourism
//! demand vector Y (all in product space), computes
//!
//! ```text
//! WL         = W · L                 water multiplier per unit of final demand
//! TWF        = WL ⊙ Y                footprint per destination product
//! pull[i, j] = W[i] · L[i, j] · Y[j] water drawn at i for demand at j
//! ```
//!
//! and the analyses built on those objects.
//!
//! ## Two views of the pull matrix
//!
//! The destination view ([`views`]) answers *where tourism money is spent*:
//! columns of the pull matrix summed per demand category. The origin view
//! answers *where water is physically drawn*: the destination rows summed
//! per source group. The two are not interchangeable. A food category with
//! 0% agricultural water in the destination sense is expected; its
//! agricultural water shows up in the origin view.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`propagate`] | WL, TWF, pull matrix, per-source contributions |
//! | [`views`] | destination and origin views, reconciliation |
//! | [`concordance`] | category → product mapping of demand and coefficients |
//! | [`direct`] | activity-based on-site water and per-tourist-day intensity |
//! | [`sensitivity`] | one-at-a-time ±20% on coefficient groups |
//! | [`split`] | inbound vs domestic footprints |
//! | [`intensity`] | per-category water intensity |
//! | [`multiplier`] | cross-year multiplier trend classification |

pub mod concordance;
pub mod direct;
pub mod error;
pub mod intensity;
pub mod multiplier;
pub mod propagate;
pub mod sensitivity;
pub mod split;
pub mod views;

pub use concordance::{eur_million_to_crore, Concordance, ConcordanceRow, DuplicateAssignment, MappedVector};
pub use direct::{
    direct_water, ActivityData, DirectCoefficients, DirectMultipliers, DirectScenarios, DirectWater, Scenario,
    ScenarioValues, TouristDayIntensity, TouristDays,
};
pub use error::FootprintError;
pub use intensity::{category_footprints, category_intensity, CategoryFootprint, CategoryIntensity};
pub use multiplier::{classify_trend, compare_multipliers, MultiplierComparison, MultiplierReport, MultiplierTrend};
pub use propagate::{propagate, source_contributions, total_footprint, Propagation};
pub use sensitivity::{sensitivity, SensitivityRange, SensitivityRow, DEFAULT_SENSITIVITY_GROUPS};
pub use split::{split_footprint, SegmentFootprint, SplitFootprint};
pub use views::{structural_views, DestinationRow, GroupShare, OriginRow, Reconciliation, StructuralViews};
