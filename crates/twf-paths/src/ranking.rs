//! Top-K ranking of pull-matrix cells.

use serde::{Deserialize, Serialize};
use twf_core::numeric::share_pct;
use twf_core::sector::product_id;
use twf_core::{ProductId, SectorClassifier, SourceGroup};
use twf_footprint::propagate;
use twf_linalg::{Matrix, Vector};

use crate::PathsError;

/// One (source, destination) water pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRow {
    /// 1-based rank, largest water first.
    pub rank: usize,
    /// Product where the water is drawn.
    pub source: ProductId,
    /// Product whose final demand pulls it.
    pub destination: ProductId,
    /// Group of the source product.
    pub source_group: SourceGroup,
    /// Group of the destination product.
    pub destination_group: SourceGroup,
    /// `W[i] · L[i, j] · Y[j]`, m³.
    pub water: f64,
    /// Share of the total footprint, percent.
    pub share_pct: f64,
}

/// Water of the ranked paths summed by source group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGroupSubtotal {
    /// Source group.
    pub group: SourceGroup,
    /// Water of the ranked paths drawn in this group, m³.
    pub water: f64,
    /// Share of the ranked paths' water, percent.
    pub pct: f64,
}

/// Result of ranking a pull matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRanking {
    /// The top `k` paths.
    pub rows: Vec<PathRow>,
    /// Strictly positive cells considered.
    pub positive_cells: usize,
    /// Sum of the whole pull matrix, m³.
    pub total_footprint: f64,
}

impl PathRanking {
    /// Water of the ranked paths.
    pub fn ranked_water(&self) -> f64 {
        self.rows.iter().map(|r| r.water).sum()
    }

    /// Share of the total footprint covered by the ranked paths, percent.
    pub fn coverage_pct(&self) -> f64 {
        share_pct(self.ranked_water(), self.total_footprint)
    }

    /// Ranked water by source group, largest first. Groups with no ranked
    /// path are omitted.
    pub fn by_source_group(&self) -> Vec<PathGroupSubtotal> {
        let mut water = [0.0; SourceGroup::COUNT];
        for row in &self.rows {
            water[row.source_group.ordinal()] += row.water;
        }
        let ranked = self.ranked_water();
        let mut out: Vec<PathGroupSubtotal> = SourceGroup::all()
            .iter()
            .filter(|g| water[g.ordinal()] > 0.0)
            .map(|&group| PathGroupSubtotal {
                group,
                water: water[group.ordinal()],
                pct: share_pct(water[group.ordinal()], ranked),
            })
            .collect();
        out.sort_by(|a, b| b.water.total_cmp(&a.water));
        out
    }
}

/// Rank the cells of an existing pull matrix.
///
/// Every strictly positive cell is a candidate; none are dropped before
/// sorting. Equal values keep row-major order.
pub fn rank_pull(pull: &Matrix, classifier: &SectorClassifier, k: usize) -> Result<PathRanking, PathsError> {
    if k == 0 {
        return Err(PathsError::ZeroTopK);
    }
    let total_footprint = pull.sum();

    let mut cells: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..pull.nrows() {
        for j in 0..pull.ncols() {
            let v = pull[(i, j)];
            if v > 0.0 {
                cells.push((i, j, v));
            }
        }
    }
    let positive_cells = cells.len();
    cells.sort_by(|a, b| b.2.total_cmp(&a.2));
    cells.truncate(k);

    let rows: Vec<PathRow> = cells
        .into_iter()
        .enumerate()
        .map(|(r, (i, j, water))| {
            let (source, destination) = (product_id(i), product_id(j));
            PathRow {
                rank: r + 1,
                source,
                destination,
                source_group: classifier.group_of(source),
                destination_group: classifier.group_of(destination),
                water,
                share_pct: share_pct(water, total_footprint),
            }
        })
        .collect();

    if let Some(top) = rows.first() {
        tracing::debug!(
            positive_cells,
            kept = rows.len(),
            top_source = top.source,
            top_destination = top.destination,
            top_share_pct = top.share_pct,
            "supply-chain paths ranked"
        );
    }

    Ok(PathRanking {
        rows,
        positive_cells,
        total_footprint,
    })
}

/// Build the pull matrix for `(W, L, Y)` and rank its top `k` cells.
pub fn rank_paths(
    w: &Vector,
    l: &Matrix,
    y: &Vector,
    classifier: &SectorClassifier,
    k: usize,
) -> Result<PathRanking, PathsError> {
    let propagation = propagate(w, l, y)?;
    rank_pull(&propagation.pull, classifier, k)
}
