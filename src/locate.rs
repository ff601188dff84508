// Copyright 2025 Lars Brubaker
// License: MIT
//
// Point location by directed simplex walk.
//
// Starting from a hint simplex, the walk repeatedly computes the query's
// barycentric weights and steps across the facet with the most negative
// weight (the "most outside" direction). Crossing a hull facet means the
// point lies outside the convex hull.
//
// Near-cocircular or degenerate configurations can make the walk cycle, so it
// is bounded to 2·S transitions. When the bound is hit, or a simplex with a
// NaN transform is met, the walk is abandoned for an exhaustive scan. That
// fallback is part of the contract, not a performance shortcut.

use log::debug;

use crate::barycentric::{barycentric_coordinates, is_inside, most_negative};
use crate::error::{Error, Result};
use crate::geom::Real;
use crate::triangulation::{SimplexIdx, Triangulation};

/// Default acceptance tolerance for barycentric weights.
pub const DEFAULT_EPS: Real = 100.0 * Real::EPSILON;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocateOptions {
    /// How far below zero a weight may be and still count as inside.
    pub eps: Real,
}

impl Default for LocateOptions {
    fn default() -> Self {
        LocateOptions { eps: DEFAULT_EPS }
    }
}

impl LocateOptions {
    /// Tolerance of the second brute-force pass, applied to hull facets only.
    pub fn eps_broad(&self) -> Real {
        self.eps.sqrt()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.eps >= 0.0 && self.eps.is_finite()) {
            return Err(Error::invalid("eps", self.eps, "must be finite and non-negative"));
        }
        Ok(())
    }
}

/// A located query point.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub simplex: SimplexIdx,
    /// D+1 weights, summing to one.
    pub barycentric: Vec<Real>,
}

/// Why the directed walk gave up and the scan ran instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// 2·S transitions without reaching a containing simplex.
    StepLimit,
    /// The walk entered a simplex whose transform is NaN.
    DegenerateSimplex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocateStats {
    pub start: SimplexIdx,
    pub walk_steps: usize,
    pub fallback: Option<FallbackReason>,
}

impl LocateStats {
    pub fn fell_back_to_scan(&self) -> bool {
        self.fallback.is_some()
    }
}

enum WalkState {
    Walking(SimplexIdx),
    Found(SimplexIdx),
    Outside,
    Exhausted(FallbackReason),
}

pub struct SimplexLocator<'a> {
    tri: &'a Triangulation,
    opts: LocateOptions,
}

impl<'a> SimplexLocator<'a> {
    pub fn new(tri: &'a Triangulation, opts: LocateOptions) -> Self {
        SimplexLocator { tri, opts }
    }

    pub fn options(&self) -> LocateOptions {
        self.opts
    }

    /// Locate `x`, starting the walk at `hint` (or simplex 0). `Ok(None)`
    /// means the point is outside the convex hull.
    pub fn locate(&self, x: &[Real], hint: Option<SimplexIdx>) -> Result<Option<Location>> {
        Ok(self.locate_with_stats(x, hint)?.0)
    }

    /// Like [`Self::locate`], also reporting how the walk went.
    ///
    /// Fails with `ShapeMismatch` if `x` does not have one coordinate per
    /// dimension.
    pub fn locate_with_stats(
        &self,
        x: &[Real],
        hint: Option<SimplexIdx>,
    ) -> Result<(Option<Location>, LocateStats)> {
        self.check_query(x)?;
        Ok(self.walk(x, hint))
    }

    fn check_query(&self, x: &[Real]) -> Result<()> {
        if x.len() != self.tri.ndim() {
            return Err(Error::ShapeMismatch {
                context: "query coordinates vs ndim",
                expected: self.tri.ndim(),
                actual: x.len(),
            });
        }
        Ok(())
    }

    /// The walk itself. `x` must already have `ndim` coordinates.
    pub(crate) fn walk(&self, x: &[Real], hint: Option<SimplexIdx>) -> (Option<Location>, LocateStats) {
        let tri = self.tri;
        let nsimplex = tri.nsimplex();
        let start = match hint {
            Some(s) if (s as usize) < nsimplex => s,
            _ => 0,
        };
        let mut stats = LocateStats {
            start,
            walk_steps: 0,
            fallback: None,
        };
        let mut c = vec![0.0; tri.ndim() + 1];

        if nsimplex == 0 || !tri.within_bounds(x, self.opts.eps) {
            return (None, stats);
        }

        let max_steps = 2 * nsimplex;
        let mut state = WalkState::Walking(start);
        while let WalkState::Walking(s) = state {
            barycentric_coordinates(tri, s, x, &mut c);
            let (k, weight) = most_negative(&c);
            state = if weight.is_nan() {
                WalkState::Exhausted(FallbackReason::DegenerateSimplex)
            } else if weight >= -self.opts.eps {
                WalkState::Found(s)
            } else {
                match tri.neighbor(s, k) {
                    None => WalkState::Outside,
                    Some(_) if stats.walk_steps >= max_steps => {
                        WalkState::Exhausted(FallbackReason::StepLimit)
                    }
                    Some(next) => {
                        stats.walk_steps += 1;
                        WalkState::Walking(next)
                    }
                }
            };
        }

        let found = match state {
            WalkState::Found(s) => Some(s),
            WalkState::Outside => None,
            WalkState::Exhausted(reason) => {
                debug!(
                    "locate: walk from simplex {} gave up after {} steps ({:?}), scanning {} simplices",
                    start, stats.walk_steps, reason, nsimplex
                );
                stats.fallback = Some(reason);
                self.scan(x, &mut c)
            }
            WalkState::Walking(_) => unreachable!(),
        };

        let location = found.map(|simplex| {
            barycentric_coordinates(tri, simplex, x, &mut c);
            Location {
                simplex,
                barycentric: c,
            }
        });
        (location, stats)
    }

    /// Exhaustive scan. The first pass accepts the first simplex with every
    /// weight >= -eps. If none qualifies, a second pass widens the tolerance
    /// to `eps_broad`, but only across hull facets: a weight below -eps on an
    /// interior facet means a neighbor owns the point instead.
    ///
    /// `c` is scratch space for D+1 weights.
    pub fn find_bruteforce(&self, x: &[Real], c: &mut [Real]) -> Result<Option<SimplexIdx>> {
        self.check_query(x)?;
        if c.len() != self.tri.ndim() + 1 {
            return Err(Error::ShapeMismatch {
                context: "weight buffer vs ndim + 1",
                expected: self.tri.ndim() + 1,
                actual: c.len(),
            });
        }
        Ok(self.scan(x, c))
    }

    fn scan(&self, x: &[Real], c: &mut [Real]) -> Option<SimplexIdx> {
        let tri = self.tri;
        let eps = self.opts.eps;
        let eps_broad = self.opts.eps_broad();
        let nsimplex = tri.nsimplex() as SimplexIdx;

        for s in 0..nsimplex {
            barycentric_coordinates(tri, s, x, c);
            if c.iter().all(|&ci| ci >= -eps) {
                return Some(s);
            }
        }

        if eps_broad > eps {
            for s in 0..nsimplex {
                barycentric_coordinates(tri, s, x, c);
                if !is_inside(c, eps_broad) {
                    continue;
                }
                let only_hull_facets = c
                    .iter()
                    .enumerate()
                    .all(|(k, &ck)| ck >= -eps || tri.neighbor(s, k).is_none());
                if only_hull_facets {
                    return Some(s);
                }
            }
        }
        None
    }
}
