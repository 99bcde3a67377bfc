//! Correlation injection via Cholesky factorization
//!
//! Each usable correlation block is factorized once (`R = L Lᵀ`). For every
//! iteration the block's independent standard normals `z` are replaced by
//! `L z`, which has correlation matrix `R`. Blocks that cannot be used are
//! skipped with a [`BlockWarning`]; their parameters fall back to independent
//! sampling.

use nalgebra::{Cholesky, DMatrix, DVector};
use rustc_hash::FxHashMap;

use crate::error::{BlockWarning, SkipReason};
use crate::model::CorrelationBlock;

/// Tolerance for symmetry and unit-diagonal checks
const MATRIX_TOLERANCE: f64 = 1e-8;

/// A correlation block that passed validation and factorization
#[derive(Debug, Clone)]
pub struct ResolvedBlock {
    pub name: String,
    /// Positions of the block's parameters in the parameter table
    pub columns: Vec<usize>,
    /// Lower Cholesky factor of the correlation matrix
    pub lower: DMatrix<f64>,
}

impl ResolvedBlock {
    /// Correlate the block's columns of `independent` (indexed by parameter
    /// position, one standard-normal draw per iteration).
    ///
    /// Returns one column per block parameter, in block order. Row `i` of the
    /// output depends only on row `i` of the input.
    #[must_use]
    pub fn correlate(&self, independent: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let k = self.columns.len();
        let n = self
            .columns
            .first()
            .map_or(0, |&c| independent[c].len());

        let mut out = vec![Vec::with_capacity(n); k];
        let mut z = DVector::<f64>::zeros(k);
        for i in 0..n {
            for (slot, &column) in self.columns.iter().enumerate() {
                z[slot] = independent[column][i];
            }
            let correlated = &self.lower * &z;
            for (slot, column) in out.iter_mut().enumerate() {
                column.push(correlated[slot]);
            }
        }
        out
    }
}

/// Validate a correlation matrix and return its lower Cholesky factor
pub fn cholesky_lower(corr: &[Vec<f64>], dimension: usize) -> Result<DMatrix<f64>, SkipReason> {
    let rows = corr.len();
    let columns = corr.iter().map(Vec::len).max().unwrap_or(0);
    if rows != dimension || corr.iter().any(|row| row.len() != dimension) {
        return Err(SkipReason::DimensionMismatch {
            parameters: dimension,
            rows,
            columns,
        });
    }

    for (i, row) in corr.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(SkipReason::NotCorrelationMatrix("non-finite entry"));
            }
            if i == j && (value - 1.0).abs() > MATRIX_TOLERANCE {
                return Err(SkipReason::NotCorrelationMatrix("diagonal must be 1"));
            }
            if value.abs() > 1.0 + MATRIX_TOLERANCE {
                return Err(SkipReason::NotCorrelationMatrix(
                    "entries must lie in [-1, 1]",
                ));
            }
            if (value - corr[j][i]).abs() > MATRIX_TOLERANCE {
                return Err(SkipReason::NotCorrelationMatrix("matrix is not symmetric"));
            }
        }
    }

    let matrix = DMatrix::from_fn(dimension, dimension, |i, j| corr[i][j]);
    Cholesky::new(matrix)
        .map(|c| c.l())
        .ok_or(SkipReason::NotPositiveDefinite)
}

/// Resolve blocks against the parameter table.
///
/// A parameter may belong to at most one block; a later block that reuses a
/// parameter claimed by an earlier usable block is skipped. Skipped blocks are
/// logged and returned as warnings.
pub fn resolve_blocks(
    blocks: &[CorrelationBlock],
    index: &FxHashMap<&str, usize>,
) -> (Vec<ResolvedBlock>, Vec<BlockWarning>) {
    let mut resolved = Vec::new();
    let mut warnings = Vec::new();
    let mut claimed: FxHashMap<usize, &str> = FxHashMap::default();

    for block in blocks {
        match resolve_block(block, index, &claimed) {
            Ok(r) => {
                for &column in &r.columns {
                    claimed.insert(column, block.name.as_str());
                }
                tracing::debug!(
                    block = %block.name,
                    parameters = r.columns.len(),
                    "correlation block factorized"
                );
                resolved.push(r);
            }
            Err(reason) => {
                let warning = BlockWarning {
                    block: block.name.clone(),
                    reason,
                };
                tracing::warn!("{warning}; parameters sampled independently");
                warnings.push(warning);
            }
        }
    }

    (resolved, warnings)
}

fn resolve_block(
    block: &CorrelationBlock,
    index: &FxHashMap<&str, usize>,
    claimed: &FxHashMap<usize, &str>,
) -> Result<ResolvedBlock, SkipReason> {
    let mut columns = Vec::with_capacity(block.params.len());
    for name in &block.params {
        let &column = index
            .get(name.as_str())
            .ok_or_else(|| SkipReason::UnknownParameter(name.clone()))?;
        if columns.contains(&column) {
            return Err(SkipReason::DuplicateParameter(name.clone()));
        }
        if let Some(owner) = claimed.get(&column) {
            return Err(SkipReason::AlreadyCorrelated {
                parameter: name.clone(),
                block: (*owner).to_string(),
            });
        }
        columns.push(column);
    }

    let lower = cholesky_lower(&block.corr, columns.len())?;
    Ok(ResolvedBlock {
        name: block.name.clone(),
        columns,
        lower,
    })
}
