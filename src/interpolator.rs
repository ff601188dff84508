// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public interpolants. Both own their triangulation and value table and are
// immutable after construction, so one instance can serve many threads.
//
// Query batches are broadcast: `xi` has shape (..., D) and the result has
// shape (..., M). Points are flattened and split into chunks; each chunk
// walks with its own hint (the previous point's simplex), which is what
// makes nearby consecutive queries cheap.

use log::debug;
use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayViewD};

use crate::clough_tocher::{continuity_coefficients, CloughTocherPatch};
use crate::error::{Error, Result};
use crate::geom::Real;
use crate::gradient::{estimate_gradients_2d, GradientOptions, GradientReport};
use crate::linear::linear_interpolate;
use crate::locate::{LocateOptions, Location, SimplexLocator};
use crate::maybe_rayon::*;
use crate::scalar::Scalar;
use crate::triangulation::{SimplexIdx, Triangulation};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InterpolatorConfig<T> {
    /// Written to every output column for queries outside the convex hull.
    pub fill_value: T,
    pub locate: LocateOptions,
    /// Only used by the cubic interpolant.
    pub gradient: GradientOptions,
}

impl<T: Scalar> Default for InterpolatorConfig<T> {
    fn default() -> Self {
        InterpolatorConfig {
            fill_value: T::nan(),
            locate: LocateOptions::default(),
            gradient: GradientOptions::default(),
        }
    }
}

impl<T: Scalar> InterpolatorConfig<T> {
    pub fn with_fill_value(mut self, fill_value: T) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn with_eps(mut self, eps: Real) -> Self {
        self.locate.eps = eps;
        self
    }

    pub fn with_gradient(mut self, gradient: GradientOptions) -> Self {
        self.gradient = gradient;
        self
    }
}

fn check_values<T>(tri: &Triangulation, values: &Array2<T>) -> Result<()> {
    if values.nrows() != tri.npoints() {
        return Err(Error::ShapeMismatch {
            context: "values rows vs points",
            expected: tri.npoints(),
            actual: values.nrows(),
        });
    }
    Ok(())
}

/// Behavior shared by the interpolants: everything except what to do with a
/// located point.
pub trait ScatteredInterpolator<T: Scalar>: Sync {
    fn triangulation(&self) -> &Triangulation;

    /// Value written to every column for queries outside the hull.
    fn fill_value(&self) -> T;

    fn locate_options(&self) -> LocateOptions;

    /// Number of value columns M.
    fn nvalues(&self) -> usize;

    /// Write the M outputs for a query inside the hull.
    fn evaluate_located(&self, location: &Location, out: &mut [T]);

    /// Dispatch on the locate result: inside goes to
    /// [`Self::evaluate_located`], outside writes [`Self::fill_value`].
    fn write_outputs(&self, location: Option<&Location>, out: &mut [T]) {
        match location {
            Some(loc) => self.evaluate_located(loc, out),
            None => out.fill(self.fill_value()),
        }
    }

    /// Evaluate a single point, starting the walk at `hint`.
    fn evaluate_point(&self, x: &[Real], hint: Option<SimplexIdx>) -> Result<Vec<T>> {
        let tri = self.triangulation();
        if x.len() != tri.ndim() {
            return Err(Error::ShapeMismatch {
                context: "query coordinates vs ndim",
                expected: tri.ndim(),
                actual: x.len(),
            });
        }
        let locator = SimplexLocator::new(tri, self.locate_options());
        let (location, _) = locator.walk(x, hint);
        let mut out = vec![T::zero(); self.nvalues()];
        self.write_outputs(location.as_ref(), &mut out);
        Ok(out)
    }

    /// Evaluate a batch of shape (..., D); the result has shape (..., M).
    fn evaluate(&self, xi: ArrayViewD<'_, Real>) -> Result<ArrayD<T>> {
        let tri = self.triangulation();
        let ndim = tri.ndim();
        let shape = xi.shape();
        let last = shape.last().copied().unwrap_or(0);
        if shape.is_empty() || last != ndim {
            return Err(Error::ShapeMismatch {
                context: "xi last axis vs ndim",
                expected: ndim,
                actual: last,
            });
        }
        let lead = &shape[..shape.len() - 1];
        let npts: usize = lead.iter().product();
        let flat = xi.to_shape((npts, ndim))?;
        let flat = flat.view();

        let m = self.nvalues();
        let locator = SimplexLocator::new(tri, self.locate_options());
        let chunks: Vec<(Vec<T>, usize)> = chunk_ranges(npts, CHUNK_POINTS)
            .into_par_iter()
            .map(|(start, end)| evaluate_chunk(self, &locator, flat, start, end, m))
            .collect();

        let mut data = Vec::with_capacity(npts * m);
        let mut scans = 0;
        for (values, fallbacks) in chunks {
            data.extend(values);
            scans += fallbacks;
        }
        if scans > 0 {
            debug!("evaluate: {} of {} queries needed a full scan", scans, npts);
        }

        let mut out_shape = lead.to_vec();
        out_shape.push(m);
        Ok(ArrayD::from_shape_vec(out_shape, data)?)
    }
}

fn evaluate_chunk<T, I>(
    interp: &I,
    locator: &SimplexLocator<'_>,
    xi: ArrayView2<'_, Real>,
    start: usize,
    end: usize,
    m: usize,
) -> (Vec<T>, usize)
where
    T: Scalar,
    I: ScatteredInterpolator<T> + ?Sized,
{
    let mut buf = vec![T::zero(); (end - start) * m];
    let mut x = vec![0.0; xi.ncols()];
    let mut hint = None;
    let mut fallbacks = 0;
    for (i, out) in (start..end).zip(0..) {
        for (xj, &v) in x.iter_mut().zip(xi.row(i)) {
            *xj = v;
        }
        let (location, stats) = locator.walk(&x, hint);
        if stats.fell_back_to_scan() {
            fallbacks += 1;
        }
        if let Some(loc) = &location {
            hint = Some(loc.simplex);
        }
        interp.write_outputs(location.as_ref(), &mut buf[out * m..(out + 1) * m]);
    }
    (buf, fallbacks)
}

// ─────── Linear ─────────────────────────────────────────────────────────────

/// Piecewise-linear interpolant over a triangulation of any dimension.
#[derive(Clone, Debug)]
pub struct LinearInterpolator<T> {
    tri: Triangulation,
    values: Array2<T>,
    config: InterpolatorConfig<T>,
}

impl<T: Scalar> LinearInterpolator<T> {
    /// `values` is P×M: one row per triangulation point.
    pub fn new(tri: Triangulation, values: Array2<T>, config: InterpolatorConfig<T>) -> Result<Self> {
        config.locate.validate()?;
        check_values(&tri, &values)?;
        Ok(LinearInterpolator { tri, values, config })
    }

    pub fn values(&self) -> ArrayView2<'_, T> {
        self.values.view()
    }

    pub fn config(&self) -> &InterpolatorConfig<T> {
        &self.config
    }
}

impl<T: Scalar> ScatteredInterpolator<T> for LinearInterpolator<T> {
    fn triangulation(&self) -> &Triangulation {
        &self.tri
    }

    fn fill_value(&self) -> T {
        self.config.fill_value
    }

    fn locate_options(&self) -> LocateOptions {
        self.config.locate
    }

    fn nvalues(&self) -> usize {
        self.values.ncols()
    }

    fn evaluate_located(&self, location: &Location, out: &mut [T]) {
        linear_interpolate(&self.tri, Some(location), self.values.view(), self.config.fill_value, out);
    }
}

// ─────── Clough-Tocher ──────────────────────────────────────────────────────

/// C¹ piecewise-cubic interpolant on a 2-D triangulation.
///
/// Vertex gradients are estimated once, at construction. The estimator may
/// run out of sweeps; that is reported through [`Self::gradient_report`]
/// and a log warning, not as an error.
#[derive(Clone, Debug)]
pub struct CloughTocher2DInterpolator<T> {
    tri: Triangulation,
    values: Array2<T>,
    gradients: Array3<T>,
    report: GradientReport,
    config: InterpolatorConfig<T>,
}

impl<T: Scalar> CloughTocher2DInterpolator<T> {
    pub fn new(tri: Triangulation, values: Array2<T>, config: InterpolatorConfig<T>) -> Result<Self> {
        if tri.ndim() != 2 {
            return Err(Error::invalid(
                "ndim",
                tri.ndim(),
                "the Clough-Tocher interpolant is only defined in 2-D",
            ));
        }
        config.locate.validate()?;
        check_values(&tri, &values)?;
        let (gradients, report) = estimate_gradients_2d(&tri, values.view(), &config.gradient)?;
        debug!(
            "Clough-Tocher: {} points, {} simplices, {} columns, gradients {} after {} sweeps",
            tri.npoints(),
            tri.nsimplex(),
            values.ncols(),
            if report.converged() { "converged" } else { "did not converge" },
            report.sweeps()
        );
        Ok(CloughTocher2DInterpolator {
            tri,
            values,
            gradients,
            report,
            config,
        })
    }

    pub fn values(&self) -> ArrayView2<'_, T> {
        self.values.view()
    }

    /// Estimated vertex gradients, P×M×2.
    pub fn gradients(&self) -> &Array3<T> {
        &self.gradients
    }

    pub fn gradient_report(&self) -> &GradientReport {
        &self.report
    }

    pub fn config(&self) -> &InterpolatorConfig<T> {
        &self.config
    }
}

impl<T: Scalar> ScatteredInterpolator<T> for CloughTocher2DInterpolator<T> {
    fn triangulation(&self) -> &Triangulation {
        &self.tri
    }

    fn fill_value(&self) -> T {
        self.config.fill_value
    }

    fn locate_options(&self) -> LocateOptions {
        self.config.locate
    }

    fn nvalues(&self) -> usize {
        self.values.ncols()
    }

    fn evaluate_located(&self, loc: &Location, out: &mut [T]) {
        let s = loc.simplex;
        let verts: [usize; 3] = std::array::from_fn(|k| self.tri.vertex(s, k) as usize);
        let p: [[Real; 2]; 3] = std::array::from_fn(|k| {
            let row = self.tri.point(verts[k] as u32);
            [row[0], row[1]]
        });
        let g = continuity_coefficients(&self.tri, s);

        for (col, o) in out.iter_mut().enumerate() {
            let f = verts.map(|v| self.values[[v, col]]);
            let df = verts.map(|v| [self.gradients[[v, col, 0]], self.gradients[[v, col, 1]]]);
            *o = CloughTocherPatch::from_geometry(p, g, f, df).evaluate(&loc.barycentric);
        }
    }
}
