//! Uncertain parameters and the default parameter table.

use serde::{Deserialize, Serialize};
use twf_core::SourceGroup;

use crate::Distribution;

/// What a sampled multiplier scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "group", rename_all = "snake_case")]
pub enum ParameterTarget {
    /// Water coefficients of every product in a source group.
    WaterGroup(SourceGroup),
    /// Hotel litres per room-night.
    Hotel,
    /// Restaurant litres per meal.
    Restaurant,
    /// Rail litres per passenger-km.
    Rail,
    /// Air litres per passenger.
    Air,
    /// Domestic tourist volume.
    DomesticVolume,
    /// Inbound tourist volume.
    InboundVolume,
}

/// One uncertain parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name used in results.
    pub name: String,
    /// What the multiplier scales.
    pub target: ParameterTarget,
    /// Distribution of the multiplier.
    pub distribution: Distribution,
}

impl Parameter {
    /// Build a parameter.
    pub fn new(name: impl Into<String>, target: ParameterTarget, distribution: Distribution) -> Self {
        Self {
            name: name.into(),
            target,
            distribution,
        }
    }
}

/// The default parameter table.
///
/// | Parameter | Distribution |
/// |---|---|
/// | agricultural water coefficients | ln N(0, 0.30) |
/// | hotel coefficient | ln N(0, 0.25) |
/// | restaurant coefficient | N(1, 0.15), clamped |
/// | domestic tourist volume | N(1, 0.08), clamped |
/// | inbound tourist volume | N(1, 0.05), clamped |
/// | rail coefficient | N(1, 0.20), clamped |
/// | air coefficient | N(1, 0.20), clamped |
///
/// Normal multipliers are clamped to `normal_clamp` (by default
/// `[0.1, 3.0]`) so no draw turns a volume negative.
pub fn default_parameters(normal_clamp: [f64; 2]) -> Vec<Parameter> {
    let clamped = |sd| Distribution::Normal {
        mean: 1.0,
        sd,
        clamp: Some(normal_clamp),
    };
    vec![
        Parameter::new(
            "agriculture_water",
            ParameterTarget::WaterGroup(SourceGroup::Agriculture),
            Distribution::LogNormal { mu: 0.0, sigma: 0.30 },
        ),
        Parameter::new(
            "hotel_coefficient",
            ParameterTarget::Hotel,
            Distribution::LogNormal { mu: 0.0, sigma: 0.25 },
        ),
        Parameter::new("restaurant_coefficient", ParameterTarget::Restaurant, clamped(0.15)),
        Parameter::new("domestic_volume", ParameterTarget::DomesticVolume, clamped(0.08)),
        Parameter::new("inbound_volume", ParameterTarget::InboundVolume, clamped(0.05)),
        Parameter::new("rail_coefficient", ParameterTarget::Rail, clamped(0.20)),
        Parameter::new("air_coefficient", ParameterTarget::Air, clamped(0.20)),
    ]
}
