//! Flat exact nearest-neighbor index.

use crate::distance::{dot_product, normalize};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// A flat inner-product index over unit-normalized vectors.
///
/// Rows are stored contiguously in insertion order. Search is an exact
/// scan: every row is compared against the query, so results carry no
/// approximation error. Positions are 0-based and never reused; callers
/// that need deletion rebuild the index from source data.
///
/// Every stored row has unit L2 norm (or is the zero row), so the inner
/// product of a row with a normalized query equals cosine similarity.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimensions: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Create an empty index for vectors of the given width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::InvalidIndex(
                "dimensions must be positive".to_string(),
            ));
        }
        Ok(Self {
            dimensions,
            data: Vec::new(),
        })
    }

    /// Reassemble an index from its persisted parts.
    pub(crate) fn from_parts(dimensions: usize, data: Vec<f32>) -> Result<Self> {
        if dimensions == 0 || data.len() % dimensions != 0 {
            return Err(Error::InvalidIndex(format!(
                "{} values do not form whole rows of width {}",
                data.len(),
                dimensions
            )));
        }
        Ok(Self { dimensions, data })
    }

    /// The fixed vector width of this index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append rows, normalizing each to unit length.
    ///
    /// The whole batch is validated before anything is inserted: on a
    /// width mismatch the index is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if any row's width differs
    /// from the index width.
    pub fn add(&mut self, rows: &[Vec<f32>]) -> Result<usize> {
        for row in rows {
            if row.len() != self.dimensions {
                return Err(Error::DimensionMismatch {
                    expected: self.dimensions,
                    actual: row.len(),
                });
            }
        }

        self.data.reserve(rows.len() * self.dimensions);
        for row in rows {
            let offset = self.data.len();
            self.data.extend_from_slice(row);
            normalize(&mut self.data[offset..]);
        }

        Ok(rows.len())
    }

    /// Exact k-nearest search by inner product.
    ///
    /// The query is normalized to unit length before scoring, so scores
    /// are cosine similarities in `[-1, 1]`. Results come back as
    /// `(position, score)` pairs ranked by descending score; ties break
    /// by ascending insertion position.
    ///
    /// `k == 0` or an empty index yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the query width differs
    /// from the index width.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut normalized = query.to_vec();
        normalize(&mut normalized);

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(position, row)| (position, dot_product(&normalized, row)))
            .collect();

        // Stable sort keeps ascending insertion order for equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// A stored row by position.
    pub fn row(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimensions)?;
        self.data.get(start..start + self.dimensions)
    }

    /// The raw row data, for persistence.
    pub(crate) fn data(&self) -> &[f32] {
        &self.data
    }
}
