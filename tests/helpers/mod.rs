// Copyright 2025 Lars Brubaker
// Shared test utilities for simplex-interp tests.

#![allow(dead_code)]

use ndarray::{Array2, ArrayD, Axis, IxDyn};
use simplex_interp::Triangulation;

/// Small deterministic xorshift generator so tests need no seed plumbing.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// (n+1)×(n+1) lattice over [0, n]², each cell split along its main
/// diagonal. Interior points are shifted by up to `jitter` in each axis;
/// boundary points stay put so the hull is the square.
pub fn grid_triangulation(n: usize, jitter: f64, seed: u64) -> Triangulation {
    let mut rng = XorShift::new(seed);
    let mut points = Vec::with_capacity((n + 1) * (n + 1) * 2);
    for j in 0..=n {
        for i in 0..=n {
            let interior = i > 0 && i < n && j > 0 && j < n;
            let (dx, dy) = if interior {
                (rng.range(-jitter, jitter), rng.range(-jitter, jitter))
            } else {
                (0.0, 0.0)
            };
            points.push(i as f64 + dx);
            points.push(j as f64 + dy);
        }
    }
    let idx = |i: usize, j: usize| j * (n + 1) + i;
    let mut simplices = Vec::with_capacity(n * n * 6);
    for j in 0..n {
        for i in 0..n {
            simplices.extend([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
            simplices.extend([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    let np = points.len() / 2;
    let ns = simplices.len() / 3;
    Triangulation::from_simplices(
        Array2::from_shape_vec((np, 2), points).unwrap(),
        Array2::from_shape_vec((ns, 3), simplices).unwrap(),
    )
    .unwrap()
}

/// Sample `f` at every triangulation point as a single value column.
pub fn sample(tri: &Triangulation, f: impl Fn(&[f64]) -> f64) -> Array2<f64> {
    tri.points()
        .map_axis(Axis(1), |p| f(&p.to_vec()))
        .insert_axis(Axis(1))
}

/// Random query points inside [lo, hi]², shape (n, 2).
pub fn random_queries(n: usize, lo: f64, hi: f64, seed: u64) -> ArrayD<f64> {
    let mut rng = XorShift::new(seed);
    let data: Vec<f64> = (0..2 * n).map(|_| rng.range(lo, hi)).collect();
    ArrayD::from_shape_vec(IxDyn(&[n, 2]), data).unwrap()
}

pub fn assert_close(got: f64, want: f64, tol: f64, what: &str) {
    assert!(
        (got - want).abs() <= tol * want.abs().max(1.0),
        "{}: got {}, want {} (tol {})",
        what,
        got,
        want,
        tol
    );
}
