// simplex-interp: scattered-data interpolation over a simplicial tessellation
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod barycentric;
pub mod clough_tocher;
pub mod error;
pub mod geom;
pub mod gradient;
pub mod interpolator;
pub mod linear;
pub mod locate;
pub mod maybe_rayon;
pub mod scalar;
pub mod triangulation;

pub use error::{Error, Result};
pub use gradient::{estimate_gradients_2d, Convergence, GradientOptions, GradientReport};
pub use interpolator::{
    CloughTocher2DInterpolator, InterpolatorConfig, LinearInterpolator, ScatteredInterpolator,
};
pub use locate::{FallbackReason, LocateOptions, LocateStats, Location, SimplexLocator};
pub use scalar::Scalar;
pub use triangulation::{PointIdx, SimplexIdx, Triangulation, INVALID};
