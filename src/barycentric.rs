// Copyright 2025 Lars Brubaker
// Cartesian -> barycentric conversion through the precomputed transforms.
//
// c[i] = sum_j Tinv[i][j] * (x[j] - r[j])   for i < D
// c[D] = 1 - sum_i c[i]
//
// The last weight is defined by the others, so the D+1 weights always sum to
// one exactly. A NaN transform (degenerate simplex) produces NaN weights,
// which every inside test rejects.

use crate::geom::Real;
use crate::triangulation::{SimplexIdx, Triangulation};

/// Fill `c` (length D+1) with the barycentric coordinates of `x` in `s`.
pub fn barycentric_coordinates(tri: &Triangulation, s: SimplexIdx, x: &[Real], c: &mut [Real]) {
    let ndim = tri.ndim();
    debug_assert_eq!(x.len(), ndim);
    debug_assert_eq!(c.len(), ndim + 1);
    let t = tri.transform(s);

    c[ndim] = 1.0;
    for i in 0..ndim {
        let mut ci = 0.0;
        for j in 0..ndim {
            ci += t[[i, j]] * (x[j] - t[[ndim, j]]);
        }
        c[i] = ci;
        c[ndim] -= ci;
    }
}

/// Allocating convenience wrapper around [`barycentric_coordinates`].
pub fn barycentric(tri: &Triangulation, s: SimplexIdx, x: &[Real]) -> Vec<Real> {
    let mut c = vec![0.0; tri.ndim() + 1];
    barycentric_coordinates(tri, s, x, &mut c);
    c
}

/// True if every weight lies in `[-eps, 1 + eps]`. NaN fails.
#[inline]
pub fn is_inside(c: &[Real], eps: Real) -> bool {
    c.iter().all(|&ci| ci >= -eps && ci <= 1.0 + eps)
}

/// Index and value of the most negative weight. NaN weights are reported as
/// NaN so the caller can tell a degenerate simplex from a real direction.
pub fn most_negative(c: &[Real]) -> (usize, Real) {
    let mut best = (0, c[0]);
    for (k, &ck) in c.iter().enumerate() {
        if ck.is_nan() {
            return (k, ck);
        }
        if ck < best.1 {
            best = (k, ck);
        }
    }
    best
}
