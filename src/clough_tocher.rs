// Copyright 2025 Lars Brubaker
// License: MIT
//
// Clough-Tocher cubic patch on one triangle.
//
// The triangle is implicitly split at its centroid into three cubic
// sub-patches that join C¹ inside the triangle and, given consistent vertex
// gradients, C¹ across edges to the neighbors. Coefficients are indexed by
// their Bernstein multi-index over (b1, b2, b3, b4), where b4 is the
// centroid direction:
//
//   c3000 c0300 c0030         corners (vertex values)
//   c2100 c1200 c0210 ...     first ring (values + edge derivatives)
//   c2001 c0201 c0021         center-adjacent
//   c0111 c1011 c1101         interior, fixed by the cross-edge condition
//   c1002 c0102 c0012         innermost
//   c0003                     centroid
//
// Nothing here is cached; coefficients are rebuilt per query and dropped.

use crate::barycentric::barycentric;
use crate::geom::Real;
use crate::scalar::Scalar;
use crate::triangulation::{SimplexIdx, Triangulation};

/// Continuity coefficient used for a hull edge that has no neighbor to take
/// the cross-boundary direction from. Kept at -2/3 for compatibility with
/// reference implementations.
pub const BOUNDARY_CONTINUITY: Real = -2.0 / 3.0;

/// Cross-edge continuity coefficients g[k] for the three edges of `s`
/// (edge k is opposite vertex k).
///
/// The derivative across edge k is taken towards the neighbor's centroid;
/// with `c` the barycentric coordinates of that centroid in `s`:
///
///   g0 = (2 c2 + c1 - 1) / (2 - 3 c2 - 3 c1)   and cyclically.
pub fn continuity_coefficients(tri: &Triangulation, s: SimplexIdx) -> [Real; 3] {
    let mut g = [BOUNDARY_CONTINUITY; 3];
    for (k, gk) in g.iter_mut().enumerate() {
        let Some(other) = tri.neighbor(s, k) else {
            continue;
        };
        let y = tri.simplex_centroid(other);
        let c = barycentric(tri, s, &y);
        *gk = match k {
            0 => (2.0 * c[2] + c[1] - 1.0) / (2.0 - 3.0 * c[2] - 3.0 * c[1]),
            1 => (2.0 * c[0] + c[2] - 1.0) / (2.0 - 3.0 * c[0] - 3.0 * c[2]),
            _ => (2.0 * c[1] + c[0] - 1.0) / (2.0 - 3.0 * c[1] - 3.0 * c[0]),
        };
    }
    g
}

/// Bernstein-Bézier coefficients of one Clough-Tocher patch.
#[derive(Clone, Debug, PartialEq)]
pub struct CloughTocherPatch<T> {
    pub c3000: T,
    pub c0300: T,
    pub c0030: T,
    pub c2100: T,
    pub c2010: T,
    pub c1200: T,
    pub c0210: T,
    pub c1020: T,
    pub c0120: T,
    pub c2001: T,
    pub c0201: T,
    pub c0021: T,
    pub c0111: T,
    pub c1011: T,
    pub c1101: T,
    pub c1002: T,
    pub c0102: T,
    pub c0012: T,
    pub c0003: T,
}

impl<T: Scalar> CloughTocherPatch<T> {
    /// Build the patch of simplex `s` from its vertex values `f` and vertex
    /// gradients `df` (both in simplex vertex order).
    pub fn new(tri: &Triangulation, s: SimplexIdx, f: [T; 3], df: [[T; 2]; 3]) -> Self {
        let p: [[Real; 2]; 3] = std::array::from_fn(|k| {
            let row = tri.point(tri.vertex(s, k));
            [row[0], row[1]]
        });
        let g = continuity_coefficients(tri, s);
        Self::from_geometry(p, g, f, df)
    }

    /// Build from explicit vertex positions and continuity coefficients.
    pub fn from_geometry(p: [[Real; 2]; 3], g: [Real; 3], f: [T; 3], df: [[T; 2]; 3]) -> Self {
        let e12 = [p[1][0] - p[0][0], p[1][1] - p[0][1]];
        let e23 = [p[2][0] - p[1][0], p[2][1] - p[1][1]];
        let e31 = [p[0][0] - p[2][0], p[0][1] - p[2][1]];

        // Gradients projected on the edges, oriented away from each corner.
        let along = |grad: [T; 2], e: [Real; 2]| grad[0] * e[0] + grad[1] * e[1];
        let df12 = along(df[0], e12);
        let df21 = -along(df[1], e12);
        let df23 = along(df[1], e23);
        let df32 = -along(df[2], e23);
        let df31 = along(df[2], e31);
        let df13 = -along(df[0], e31);

        let c3000 = f[0];
        let c2100 = (df12 + c3000 * 3.0) / 3.0;
        let c2010 = (df13 + c3000 * 3.0) / 3.0;
        let c0300 = f[1];
        let c1200 = (df21 + c0300 * 3.0) / 3.0;
        let c0210 = (df23 + c0300 * 3.0) / 3.0;
        let c0030 = f[2];
        let c1020 = (df31 + c0030 * 3.0) / 3.0;
        let c0120 = (df32 + c0030 * 3.0) / 3.0;

        let c2001 = (c2100 + c2010 + c3000) / 3.0;
        let c0201 = (c1200 + c0300 + c0210) / 3.0;
        let c0021 = (c1020 + c0120 + c0030) / 3.0;

        // The derivative across each edge, towards the neighbor, must be
        // linear along that edge.
        let c0111 = ((-c0300 + c0210 * 3.0 - c0120 * 3.0 + c0030) * g[0]
            + (-c0300 + c0210 * 2.0 - c0120 + c0021 + c0201))
            / 2.0;
        let c1011 = ((-c0030 + c1020 * 3.0 - c2010 * 3.0 + c3000) * g[1]
            + (-c0030 + c1020 * 2.0 - c2010 + c2001 + c0021))
            / 2.0;
        let c1101 = ((-c3000 + c2100 * 3.0 - c1200 * 3.0 + c0300) * g[2]
            + (-c3000 + c2100 * 2.0 - c1200 + c2001 + c0201))
            / 2.0;

        let c1002 = (c1101 + c1011 + c2001) / 3.0;
        let c0102 = (c1101 + c0111 + c0201) / 3.0;
        let c0012 = (c1011 + c0111 + c0021) / 3.0;

        let c0003 = (c1002 + c0102 + c0012) / 3.0;

        CloughTocherPatch {
            c3000,
            c0300,
            c0030,
            c2100,
            c2010,
            c1200,
            c0210,
            c1020,
            c0120,
            c2001,
            c0201,
            c0021,
            c0111,
            c1011,
            c1101,
            c1002,
            c0102,
            c0012,
            c0003,
        }
    }

    /// Evaluate at barycentric weights `b` (three entries, summing to one).
    ///
    /// The weights may carry small negative round-off from the locator.
    /// Subtracting the smallest weight from all three and carrying the removed
    /// mass as a fourth coordinate b4 = 3·min gives an equivalent point with
    /// nonnegative coordinates in the sub-triangle that contains it, so the
    /// cubic stays continuous across edges. This is intentional; do not clamp
    /// the weights instead.
    pub fn evaluate(&self, b: &[Real]) -> T {
        let minval = b[0].min(b[1]).min(b[2]);
        let b1 = b[0] - minval;
        let b2 = b[1] - minval;
        let b3 = b[2] - minval;
        let b4 = 3.0 * minval;

        // Cubic Bernstein sum in (b1, b2, b3, b4). The b1·b2·b3 monomial is
        // absent: at least one of b1, b2, b3 is zero after the shift.
        self.c3000 * (b1 * b1 * b1)
            + self.c2100 * (3.0 * b1 * b1 * b2)
            + self.c2010 * (3.0 * b1 * b1 * b3)
            + self.c2001 * (3.0 * b1 * b1 * b4)
            + self.c1200 * (3.0 * b1 * b2 * b2)
            + self.c1101 * (6.0 * b1 * b2 * b4)
            + self.c1020 * (3.0 * b1 * b3 * b3)
            + self.c1011 * (6.0 * b1 * b3 * b4)
            + self.c1002 * (3.0 * b1 * b4 * b4)
            + self.c0300 * (b2 * b2 * b2)
            + self.c0210 * (3.0 * b2 * b2 * b3)
            + self.c0201 * (3.0 * b2 * b2 * b4)
            + self.c0120 * (3.0 * b2 * b3 * b3)
            + self.c0111 * (6.0 * b2 * b3 * b4)
            + self.c0102 * (3.0 * b2 * b4 * b4)
            + self.c0030 * (b3 * b3 * b3)
            + self.c0021 * (3.0 * b3 * b3 * b4)
            + self.c0012 * (3.0 * b3 * b4 * b4)
            + self.c0003 * (b4 * b4 * b4)
    }
}
