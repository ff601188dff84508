// Copyright 2025 Lars Brubaker
// Derived tables: facet adjacency, barycentric transforms, vertex stars.

use std::collections::HashMap;

use ndarray::{Array2, Array3};

use super::{PointIdx, SimplexIdx, INVALID};
use crate::error::{Error, Result};
use crate::geom::{invert, Real};

/// Compressed vertex→vertex adjacency (CSR): the neighbors of point `p` are
/// `indices[indptr[p]..indptr[p + 1]]`, sorted ascending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexNeighbors {
    indptr: Vec<usize>,
    indices: Vec<PointIdx>,
}

impl VertexNeighbors {
    /// Collect every pair of points that share a simplex. In 2-D these are
    /// exactly the triangulation edges.
    pub fn from_simplices(simplices: &Array2<PointIdx>, npoints: usize) -> Self {
        let mut star: Vec<Vec<PointIdx>> = vec![Vec::new(); npoints];
        for row in simplices.rows() {
            for &a in row.iter() {
                for &b in row.iter() {
                    if a != b {
                        star[a as usize].push(b);
                    }
                }
            }
        }

        let mut indptr = Vec::with_capacity(npoints + 1);
        let mut indices = Vec::new();
        indptr.push(0);
        for mut adj in star {
            adj.sort_unstable();
            adj.dedup();
            indices.extend_from_slice(&adj);
            indptr.push(indices.len());
        }
        VertexNeighbors { indptr, indices }
    }

    pub fn of(&self, p: PointIdx) -> &[PointIdx] {
        let p = p as usize;
        &self.indices[self.indptr[p]..self.indptr[p + 1]]
    }

    pub fn indptr(&self) -> &[usize] { &self.indptr }
    pub fn indices(&self) -> &[PointIdx] { &self.indices }
}

/// Match facets between simplices. Each facet key is the sorted list of its
/// D point indices; a key seen twice links the two simplices, a key seen
/// once is a hull facet. A key seen three times means the input is not a
/// manifold tessellation.
pub fn derive_neighbors(simplices: &Array2<PointIdx>) -> Result<Array2<SimplexIdx>> {
    let (nsimplex, nvert) = simplices.dim();
    let mut neighbors = Array2::from_elem((nsimplex, nvert), INVALID);
    // facet -> (first simplex, its opposite vertex, already paired)
    let mut facets: HashMap<Vec<PointIdx>, (SimplexIdx, usize, bool)> = HashMap::new();

    for s in 0..nsimplex {
        for k in 0..nvert {
            let mut key: Vec<PointIdx> = (0..nvert)
                .filter(|&j| j != k)
                .map(|j| simplices[[s, j]])
                .collect();
            key.sort_unstable();

            match facets.get_mut(&key) {
                None => {
                    facets.insert(key, (s as SimplexIdx, k, false));
                }
                Some((other, other_k, paired)) => {
                    if *paired {
                        return Err(Error::invalid(
                            "simplices",
                            format!("{:?}", key),
                            "facet shared by more than two simplices",
                        ));
                    }
                    *paired = true;
                    neighbors[[s, k]] = *other;
                    neighbors[[*other as usize, *other_k]] = s as SimplexIdx;
                }
            }
        }
    }
    Ok(neighbors)
}

/// Compute the per-simplex Cartesian→barycentric maps.
///
/// For simplex s with points p_0..p_D, T has columns `p_j - p_D` and the
/// stored block is `[T^-1; p_D]`. Degenerate simplices (singular or badly
/// conditioned T) get an all-NaN block so that no point ever lands in them.
pub fn barycentric_transforms(points: &Array2<Real>, simplices: &Array2<PointIdx>) -> Array3<Real> {
    let ndim = points.ncols();
    let nsimplex = simplices.nrows();
    let mut out = Array3::from_elem((nsimplex, ndim + 1, ndim), Real::NAN);
    let mut t = vec![0.0; ndim * ndim];

    for s in 0..nsimplex {
        let last = simplices[[s, ndim]] as usize;
        for i in 0..ndim {
            for j in 0..ndim {
                let pj = simplices[[s, j]] as usize;
                t[i * ndim + j] = points[[pj, i]] - points[[last, i]];
            }
        }
        if let Some(inv) = invert(&t, ndim) {
            for i in 0..ndim {
                for j in 0..ndim {
                    out[[s, i, j]] = inv[i * ndim + j];
                }
            }
            for j in 0..ndim {
                out[[s, ndim, j]] = points[[last, j]];
            }
        }
    }
    out
}
