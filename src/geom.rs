// Copyright 2025 Lars Brubaker
// License: MIT
//
// Small dense helpers for the triangulation tables and the gradient solver.
// Matrices are flat row-major slices; D is small.

pub type Real = f64;

/// Reciprocal condition number below which a simplex is treated as
/// degenerate and its barycentric transform is filled with NaN.
pub const RCOND_LIMIT: Real = 1000.0 * Real::EPSILON;

/// Max-norm of a vector.
#[inline]
pub fn norm_inf(v: &[Real]) -> Real {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

/// Induced 1-norm (max absolute column sum) of an n×n row-major matrix.
pub fn matrix_norm_1(a: &[Real], n: usize) -> Real {
    (0..n)
        .map(|j| (0..n).map(|i| a[i * n + j].abs()).sum::<Real>())
        .fold(0.0, Real::max)
}

/// Inverts an n×n row-major matrix with Gauss-Jordan elimination and partial
/// pivoting. Returns `None` if a pivot is exactly zero or the result is
/// ill-conditioned (reciprocal 1-norm condition number below `RCOND_LIMIT`).
pub fn invert(a: &[Real], n: usize) -> Option<Vec<Real>> {
    debug_assert_eq!(a.len(), n * n);
    let mut m = a.to_vec();
    let mut inv = vec![0.0; n * n];
    for i in 0..n {
        inv[i * n + i] = 1.0;
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| m[r1 * n + col].abs().total_cmp(&m[r2 * n + col].abs()))?;
        let pivot = m[pivot_row * n + col];
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        if pivot_row != col {
            for j in 0..n {
                m.swap(pivot_row * n + j, col * n + j);
                inv.swap(pivot_row * n + j, col * n + j);
            }
        }
        for j in 0..n {
            m[col * n + j] /= pivot;
            inv[col * n + j] /= pivot;
        }
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[row * n + col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[row * n + j] -= factor * m[col * n + j];
                inv[row * n + j] -= factor * inv[col * n + j];
            }
        }
    }

    let rcond = 1.0 / (matrix_norm_1(a, n) * matrix_norm_1(&inv, n));
    if !(rcond >= RCOND_LIMIT) {
        return None;
    }
    Some(inv)
}

/// Solves the 2×2 system `q · r = s` by Cramer's rule.
/// A singular `q` yields non-finite output; callers only hand in systems
/// assembled from non-degenerate edges.
#[inline]
pub fn solve_2x2(q: [[Real; 2]; 2], s: [Real; 2]) -> [Real; 2] {
    let det = q[0][0] * q[1][1] - q[0][1] * q[1][0];
    [
        (q[1][1] * s[0] - q[0][1] * s[1]) / det,
        (-q[1][0] * s[0] + q[0][0] * s[1]) / det,
    ]
}

/// Arithmetic mean of a set of points. Each row is anything iterable over
/// its coordinates (a slice, an `ndarray` row view).
pub fn centroid<'a, I, R>(rows: I, ndim: usize) -> Vec<Real>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'a Real>,
{
    let mut c = vec![0.0; ndim];
    let mut count = 0usize;
    for row in rows {
        for (acc, x) in c.iter_mut().zip(row) {
            *acc += x;
        }
        count += 1;
    }
    if count > 0 {
        let inv = 1.0 / count as Real;
        c.iter_mut().for_each(|x| *x *= inv);
    }
    c
}
