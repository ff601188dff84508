// Copyright 2025 Lars Brubaker
// License: MIT
//
// Global gradient estimation on a 2-D triangulation.
//
// Each vertex gradient is chosen so that the cubic surface built from it
// approximately minimizes integrated curvature along the triangulation
// edges (Nielson's global method). For vertex v and every edge (v, w) of its
// star, with e = p_w - p_v, L = |e|:
//
//   Q += 4 e e^T / L^3
//   s += (6 (f_v - f_w) - 2 df_w) e / L^3,   df_w = -e . grad_w
//
// and the new gradient is -Q^-1 s. Sweeps update vertices in place
// (Gauss-Seidel), so the visiting order is part of the result and this phase
// must stay sequential.

use log::{debug, trace, warn};
use ndarray::{Array3, ArrayView2};

use crate::error::{Error, Result};
use crate::geom::{norm_inf, solve_2x2, Real};
use crate::scalar::Scalar;
use crate::triangulation::Triangulation;

pub const DEFAULT_TOL: Real = 1e-6;
pub const DEFAULT_MAXITER: usize = 400;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientOptions {
    /// Stop once the largest relative per-vertex change of a sweep is below this.
    pub tol: Real,
    /// Hard cap on the number of sweeps.
    pub maxiter: usize,
}

impl Default for GradientOptions {
    fn default() -> Self {
        GradientOptions {
            tol: DEFAULT_TOL,
            maxiter: DEFAULT_MAXITER,
        }
    }
}

impl GradientOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            return Err(Error::invalid("tol", self.tol, "must be finite and positive"));
        }
        if self.maxiter == 0 {
            return Err(Error::invalid("maxiter", self.maxiter, "must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of solving one real-valued column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Convergence {
    Converged { sweeps: usize },
    NotConverged { sweeps: usize, err: Real },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Summary over all value columns (and real/imaginary parts).
#[derive(Clone, Debug, PartialEq)]
pub struct GradientReport {
    /// One entry per value column and real part, column-major:
    /// `per_part[col * T::PARTS + part]`.
    pub per_part: Vec<Convergence>,
}

impl GradientReport {
    pub fn converged(&self) -> bool {
        self.per_part.iter().all(Convergence::is_converged)
    }

    /// Largest sweep count any part needed (or used up).
    pub fn sweeps(&self) -> usize {
        self.per_part
            .iter()
            .map(|c| match *c {
                Convergence::Converged { sweeps } | Convergence::NotConverged { sweeps, .. } => sweeps,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Solve one real column in place. `grad` holds the starting estimate (the
/// global method starts from zero) and receives the result.
pub fn estimate_gradients_2d_column(
    tri: &Triangulation,
    data: &[Real],
    grad: &mut [[Real; 2]],
    opts: &GradientOptions,
) -> Convergence {
    let points = tri.points();
    let npoints = tri.npoints();
    debug_assert_eq!(data.len(), npoints);
    debug_assert_eq!(grad.len(), npoints);

    let mut err = Real::INFINITY;
    for sweep in 0..opts.maxiter {
        err = 0.0;
        for v in 0..npoints {
            let star = tri.vertex_neighbors(v as u32);
            if star.is_empty() {
                // Not referenced by any simplex: nothing constrains it.
                continue;
            }

            let mut q = [[0.0; 2]; 2];
            let mut s = [0.0; 2];
            for &w in star {
                let w = w as usize;
                let ex = points[[w, 0]] - points[[v, 0]];
                let ey = points[[w, 1]] - points[[v, 1]];
                let l = (ex * ex + ey * ey).sqrt();
                let l3 = l * l * l;

                let f1 = data[v];
                let f2 = data[w];
                let df2 = -ex * grad[w][0] - ey * grad[w][1];

                q[0][0] += 4.0 * ex * ex / l3;
                q[0][1] += 4.0 * ex * ey / l3;
                q[1][1] += 4.0 * ey * ey / l3;

                let rhs = 6.0 * (f1 - f2) - 2.0 * df2;
                s[0] += rhs * ex / l3;
                s[1] += rhs * ey / l3;
            }
            q[1][0] = q[0][1];

            let r = solve_2x2(q, s);
            let change = norm_inf(&[grad[v][0] + r[0], grad[v][1] + r[1]]);
            grad[v] = [-r[0], -r[1]];

            let change = change / norm_inf(&r).max(1.0);
            err = err.max(change);
        }

        trace!("gradient sweep {}: err = {:e}", sweep + 1, err);
        if err < opts.tol {
            return Convergence::Converged { sweeps: sweep + 1 };
        }
    }
    Convergence::NotConverged {
        sweeps: opts.maxiter,
        err,
    }
}

/// Estimate gradients for every value column. `values` is P×M; the result is
/// P×M×2. Complex columns are solved as two independent real problems.
///
/// Non-convergence is not an error: the best estimate is returned, a warning
/// is logged, and the report says which parts ran out of sweeps.
pub fn estimate_gradients_2d<T: Scalar>(
    tri: &Triangulation,
    values: ArrayView2<'_, T>,
    opts: &GradientOptions,
) -> Result<(Array3<T>, GradientReport)> {
    opts.validate()?;
    if tri.ndim() != 2 {
        return Err(Error::invalid(
            "ndim",
            tri.ndim(),
            "gradient estimation is only defined for 2-D triangulations",
        ));
    }
    let (npoints, ncols) = values.dim();
    if npoints != tri.npoints() {
        return Err(Error::ShapeMismatch {
            context: "values rows vs points",
            expected: tri.npoints(),
            actual: npoints,
        });
    }

    let mut out = Array3::<T>::zeros((npoints, ncols, 2));
    let mut per_part = Vec::with_capacity(ncols * T::PARTS);
    let mut data = vec![0.0; npoints];
    let mut grads: Vec<Vec<[Real; 2]>> = vec![vec![[0.0; 2]; npoints]; T::PARTS];

    for col in 0..ncols {
        for (part, grad) in grads.iter_mut().enumerate() {
            for (d, &v) in data.iter_mut().zip(values.column(col).iter()) {
                *d = v.part(part);
            }
            grad.iter_mut().for_each(|g| *g = [0.0; 2]);

            let outcome = estimate_gradients_2d_column(tri, &data, grad, opts);
            match outcome {
                Convergence::Converged { sweeps } => {
                    debug!("gradient column {} part {} converged in {} sweeps", col, part, sweeps);
                }
                Convergence::NotConverged { sweeps, err } => {
                    warn!(
                        "gradient estimation did not converge for column {} part {} after {} sweeps (err {:e}); results may be inaccurate",
                        col, part, sweeps, err
                    );
                }
            }
            per_part.push(outcome);
        }

        let mut parts = vec![0.0; T::PARTS];
        for v in 0..npoints {
            for axis in 0..2 {
                for (p, g) in parts.iter_mut().zip(&grads) {
                    *p = g[v][axis];
                }
                out[[v, col, axis]] = T::from_parts(&parts);
            }
        }
    }

    Ok((out, GradientReport { per_part }))
}
