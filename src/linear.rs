// Copyright 2025 Lars Brubaker
// Piecewise-linear evaluation: barycentric weighted sum of vertex values.

use ndarray::ArrayView2;

use crate::locate::Location;
use crate::scalar::Scalar;
use crate::triangulation::Triangulation;

/// Write one value per column of `values` (P×M) into `out` (length M).
/// `None` writes `fill` everywhere.
pub fn linear_interpolate<T: Scalar>(
    tri: &Triangulation,
    location: Option<&Location>,
    values: ArrayView2<'_, T>,
    fill: T,
    out: &mut [T],
) {
    debug_assert_eq!(out.len(), values.ncols());
    let Some(loc) = location else {
        out.iter_mut().for_each(|o| *o = fill);
        return;
    };

    out.iter_mut().for_each(|o| *o = T::zero());
    for (k, &w) in loc.barycentric.iter().enumerate() {
        let row = values.row(tri.vertex(loc.simplex, k) as usize);
        for (o, &v) in out.iter_mut().zip(row.iter()) {
            *o = *o + v * w;
        }
    }
}
