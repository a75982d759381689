//! # Sector Classification
//!
//! Products are identified by a 1-based [`ProductId`] in the economy-wide
//! numbering of the supply-use tables; vector index `i` is product `i + 1`.
//!
//! [`SectorClassifier`] assigns each product to a broad [`SourceGroup`].
//! The classification is reference data, but it is load-bearing: a wrong
//! range silently moves water between source groups in every origin view,
//! path table and sensitivity scenario. The workspace therefore has exactly
//! one classifier type, and its ranges are checked in order with the first
//! match winning so that nested ranges (Petroleum inside Manufacturing,
//! Electricity as a single ID) are unambiguous.

use serde::{Deserialize, Serialize};

/// 1-based product identifier.
pub type ProductId = u32;

/// Convert a 0-based vector index to its product ID.
#[inline]
pub fn product_id(index: usize) -> ProductId {
    (index + 1) as ProductId
}

/// Convert a product ID to its 0-based vector index, if it is in `1..=n`.
#[inline]
pub fn product_index(id: ProductId, n: usize) -> Option<usize> {
    let idx = (id as usize).checked_sub(1)?;
    (idx < n).then_some(idx)
}

// ---------------------------------------------------------------------------
// SourceGroup
// ---------------------------------------------------------------------------

/// Broad group of the sector where water is physically drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceGroup {
    /// Crops, livestock, forestry, fishing.
    Agriculture,
    /// Coal, ores, crude extraction.
    Mining,
    /// Manufacturing other than petroleum refining.
    Manufacturing,
    /// Petroleum products.
    Petroleum,
    /// Electricity generation and distribution.
    Electricity,
    /// Everything else, including hospitality and transport.
    Services,
}

impl SourceGroup {
    /// All groups in report order.
    pub fn all() -> &'static [SourceGroup] {
        &[
            Self::Agriculture,
            Self::Mining,
            Self::Manufacturing,
            Self::Petroleum,
            Self::Electricity,
            Self::Services,
        ]
    }

    /// Number of groups.
    pub const COUNT: usize = 6;

    /// Stable position of this group in [`SourceGroup::all`].
    pub fn ordinal(self) -> usize {
        match self {
            Self::Agriculture => 0,
            Self::Mining => 1,
            Self::Manufacturing => 2,
            Self::Petroleum => 3,
            Self::Electricity => 4,
            Self::Services => 5,
        }
    }

    /// String representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agriculture => "agriculture",
            Self::Mining => "mining",
            Self::Manufacturing => "manufacturing",
            Self::Petroleum => "petroleum",
            Self::Electricity => "electricity",
            Self::Services => "services",
        }
    }
}

impl std::fmt::Display for SourceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SectorClassifier
// ---------------------------------------------------------------------------

/// An inclusive range of product IDs assigned to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRange {
    /// First product ID in the range.
    pub first: ProductId,
    /// Last product ID in the range (inclusive).
    pub last: ProductId,
    /// Group assigned to products in the range.
    pub group: SourceGroup,
}

impl GroupRange {
    /// Whether `id` falls in this range.
    pub fn contains(&self, id: ProductId) -> bool {
        (self.first..=self.last).contains(&id)
    }
}

/// Ordered product-ID → source-group table. First matching range wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorClassifier {
    /// Ranges checked in order.
    pub ranges: Vec<GroupRange>,
    /// Group for products no range matches.
    #[serde(default = "default_fallback")]
    pub fallback: SourceGroup,
}

fn default_fallback() -> SourceGroup {
    SourceGroup::Services
}

impl Default for SectorClassifier {
    /// The 140-product SUT table: 1–29 Agriculture, 30–40 Mining,
    /// 114 Electricity, 71–80 Petroleum, 41–113 Manufacturing, rest Services.
    fn default() -> Self {
        let r = |first, last, group| GroupRange { first, last, group };
        Self {
            ranges: vec![
                r(1, 29, SourceGroup::Agriculture),
                r(30, 40, SourceGroup::Mining),
                r(114, 114, SourceGroup::Electricity),
                r(71, 80, SourceGroup::Petroleum),
                r(41, 113, SourceGroup::Manufacturing),
            ],
            fallback: SourceGroup::Services,
        }
    }
}

impl SectorClassifier {
    /// Group of a single product.
    pub fn group_of(&self, id: ProductId) -> SourceGroup {
        self.ranges
            .iter()
            .find(|r| r.contains(id))
            .map(|r| r.group)
            .unwrap_or(self.fallback)
    }

    /// Group of every product in an `n`-product economy, by vector index.
    pub fn groups_for(&self, n: usize) -> Vec<SourceGroup> {
        (0..n).map(|i| self.group_of(product_id(i))).collect()
    }

    /// Boolean mask (by vector index) of products in `group`.
    pub fn mask(&self, group: SourceGroup, n: usize) -> Vec<bool> {
        (0..n).map(|i| self.group_of(product_id(i)) == group).collect()
    }
}

// ---------------------------------------------------------------------------
// DemandCategory
// ---------------------------------------------------------------------------

/// A tourism spending category and the products its demand lands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandCategory {
    /// Category identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Broad type (e.g. "Food", "Transport", "Accommodation").
    #[serde(default)]
    pub category_type: String,
    /// Destination products for this category's demand.
    pub products: Vec<ProductId>,
}
