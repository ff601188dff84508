// Copyright 2025 Lars Brubaker
// Value types the interpolants can carry.
//
// Real and complex data share every code path. The only place that has to
// look inside a scalar is the gradient solver, which works on real numbers
// and therefore runs once per part (re, im) and reassembles the result.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;
use num_traits::Zero;

use crate::geom::Real;

pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<Real, Output = Self>
    + Div<Real, Output = Self>
    + 'static
{
    /// Number of real components (1 for `f64`, 2 for `Complex64`).
    const PARTS: usize;

    /// Real component `k` (`k < PARTS`).
    fn part(self, k: usize) -> Real;

    /// Inverse of [`Scalar::part`]; `parts.len() == PARTS`.
    fn from_parts(parts: &[Real]) -> Self;

    /// Default fill value for points outside the hull.
    fn nan() -> Self;
}

impl Scalar for f64 {
    const PARTS: usize = 1;

    #[inline]
    fn part(self, _k: usize) -> Real {
        self
    }

    #[inline]
    fn from_parts(parts: &[Real]) -> Self {
        parts[0]
    }

    #[inline]
    fn nan() -> Self {
        f64::NAN
    }
}

impl Scalar for Complex64 {
    const PARTS: usize = 2;

    #[inline]
    fn part(self, k: usize) -> Real {
        if k == 0 {
            self.re
        } else {
            self.im
        }
    }

    #[inline]
    fn from_parts(parts: &[Real]) -> Self {
        Complex64::new(parts[0], parts[1])
    }

    #[inline]
    fn nan() -> Self {
        Complex64::new(f64::NAN, f64::NAN)
    }
}
