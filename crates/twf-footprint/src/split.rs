//! Inbound vs domestic footprints from separate demand vectors.

use serde::{Deserialize, Serialize};
use twf_core::numeric::ratio_or_zero;
use twf_linalg::{Matrix, Vector};

use crate::propagate::{check_intensity, total_footprint};
use crate::FootprintError;

/// Footprint of one visitor segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentFootprint {
    /// `W · L · Y_segment`, m³.
    pub footprint: f64,
    /// `sum(Y_segment)`, crore.
    pub demand: f64,
    /// m³ per crore, zero when there is no demand.
    pub intensity: f64,
}

impl SegmentFootprint {
    fn new(footprint: f64, demand: f64) -> Self {
        Self {
            footprint,
            demand,
            intensity: ratio_or_zero(footprint, demand),
        }
    }
}

/// Inbound, domestic and combined footprints for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitFootprint {
    /// Inbound visitors.
    pub inbound: SegmentFootprint,
    /// Domestic visitors.
    pub domestic: SegmentFootprint,
    /// Both segments together.
    pub combined: SegmentFootprint,
    /// Inbound intensity over domestic intensity, `None` without domestic intensity.
    pub inbound_to_domestic_ratio: Option<f64>,
}

/// Propagate the two segment demand vectors through the same W and L.
pub fn split_footprint(
    w: &Vector,
    l: &Matrix,
    y_inbound: &Vector,
    y_domestic: &Vector,
) -> Result<SplitFootprint, FootprintError> {
    check_intensity(w)?;
    let inbound = SegmentFootprint::new(total_footprint(w, l, y_inbound)?, y_inbound.sum());
    let domestic = SegmentFootprint::new(total_footprint(w, l, y_domestic)?, y_domestic.sum());
    let combined = SegmentFootprint::new(
        inbound.footprint + domestic.footprint,
        inbound.demand + domestic.demand,
    );
    let inbound_to_domestic_ratio = (domestic.intensity > 0.0).then(|| inbound.intensity / domestic.intensity);

    tracing::debug!(
        inbound = inbound.footprint,
        domestic = domestic.footprint,
        ratio = ?inbound_to_domestic_ratio,
        "segment footprints"
    );

    Ok(SplitFootprint {
        inbound,
        domestic,
        combined,
        inbound_to_domestic_ratio,
    })
}
