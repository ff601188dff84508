// Copyright 2025 Lars Brubaker
// License: MIT
//
// Read-only view of a simplicial tessellation built elsewhere (normally by
// qhull or another Delaunay builder).
//
// Layout:
//   - points     P×D       coordinates
//   - simplices  S×(D+1)   point indices per simplex
//   - neighbors  S×(D+1)   neighbors[s][k] is the simplex across the facet
//                          opposite vertex k, INVALID on the hull boundary
//   - transform  S×(D+1)×D rows 0..D hold the inverse of the D×D matrix whose
//                          columns are p_j - p_D; row D holds p_D itself
//
// All indices are u32 into these arenas; INVALID (u32::MAX) is the null
// marker, the same convention the rest of the crate uses for "no simplex".

mod tables;

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};

use crate::error::{Error, Result};
use crate::geom::{centroid, Real};

pub use tables::{barycentric_transforms, derive_neighbors, VertexNeighbors};

pub const INVALID: u32 = u32::MAX;

/// Index into `Triangulation::points`
pub type PointIdx = u32;
/// Index into `Triangulation::simplices`
pub type SimplexIdx = u32;

#[derive(Clone, Debug)]
pub struct Triangulation {
    points: Array2<Real>,
    simplices: Array2<PointIdx>,
    neighbors: Array2<SimplexIdx>,
    transform: Array3<Real>,
    min_bound: Vec<Real>,
    max_bound: Vec<Real>,
    vertex_neighbors: VertexNeighbors,
}

impl Triangulation {
    /// Wrap tables produced by an external builder.
    ///
    /// Expected layouts: `simplices` and `neighbors` are S×(D+1), with -1 in
    /// `neighbors` for "no neighbor" as qhull does; `transform` is
    /// S×(D+1)×D, rows `0..D` holding `T^-1` and row D holding `p_D` (the
    /// qhull order, not S×D×(D+1)). Shapes and index ranges are checked;
    /// geometric consistency (shared facets really being shared, transforms
    /// matching the points) is the builder's contract.
    pub fn from_parts(
        points: Array2<Real>,
        simplices: Array2<usize>,
        neighbors: Array2<i64>,
        transform: Array3<Real>,
    ) -> Result<Self> {
        let simplices = convert_simplices(&points, &simplices)?;
        let nsimplex = simplices.nrows();
        let ndim = points.ncols();

        if neighbors.dim() != simplices.dim() {
            return Err(Error::ShapeMismatch {
                context: "neighbors vs simplices",
                expected: simplices.len(),
                actual: neighbors.len(),
            });
        }
        if transform.dim() != (nsimplex, ndim + 1, ndim) {
            return Err(Error::ShapeMismatch {
                context: "transform vs simplices",
                expected: nsimplex * (ndim + 1) * ndim,
                actual: transform.len(),
            });
        }

        let mut table = Array2::from_elem(neighbors.dim(), INVALID);
        for (dst, &n) in table.iter_mut().zip(neighbors.iter()) {
            *dst = match n {
                -1 => INVALID,
                n if n >= 0 && (n as usize) < nsimplex => n as SimplexIdx,
                n => {
                    return Err(Error::IndexOutOfRange {
                        table: "neighbors",
                        index: n,
                        len: nsimplex,
                    })
                }
            };
        }

        Ok(Self::assemble(points, simplices, table, transform))
    }

    /// Build the neighbor and transform tables from the simplex list alone.
    ///
    /// This does not triangulate anything: the simplices are taken as given
    /// and only their facet adjacency and barycentric maps are derived.
    ///
    /// The simplices must tile a convex region. Point location treats every
    /// unmatched facet as the convex hull, so on a non-convex union a walk
    /// that crosses a reflex boundary facet reports "outside" even when
    /// another simplex contains the point, and the answer depends on the hint.
    pub fn from_simplices(points: Array2<Real>, simplices: Array2<usize>) -> Result<Self> {
        let simplices = convert_simplices(&points, &simplices)?;
        let neighbors = derive_neighbors(&simplices)?;
        let transform = barycentric_transforms(&points, &simplices);
        Ok(Self::assemble(points, simplices, neighbors, transform))
    }

    fn assemble(
        points: Array2<Real>,
        simplices: Array2<PointIdx>,
        neighbors: Array2<SimplexIdx>,
        transform: Array3<Real>,
    ) -> Self {
        let ndim = points.ncols();
        let mut min_bound = vec![Real::INFINITY; ndim];
        let mut max_bound = vec![Real::NEG_INFINITY; ndim];
        for row in points.rows() {
            for (j, &x) in row.iter().enumerate() {
                min_bound[j] = min_bound[j].min(x);
                max_bound[j] = max_bound[j].max(x);
            }
        }
        let vertex_neighbors = VertexNeighbors::from_simplices(&simplices, points.nrows());

        Triangulation {
            points,
            simplices,
            neighbors,
            transform,
            min_bound,
            max_bound,
            vertex_neighbors,
        }
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    pub fn ndim(&self) -> usize { self.points.ncols() }
    pub fn npoints(&self) -> usize { self.points.nrows() }
    pub fn nsimplex(&self) -> usize { self.simplices.nrows() }
    pub fn points(&self) -> ArrayView2<'_, Real> { self.points.view() }
    pub fn simplices(&self) -> ArrayView2<'_, PointIdx> { self.simplices.view() }
    pub fn min_bound(&self) -> &[Real] { &self.min_bound }
    pub fn max_bound(&self) -> &[Real] { &self.max_bound }

    pub fn point(&self, p: PointIdx) -> ArrayView1<'_, Real> {
        self.points.row(p as usize)
    }

    /// Point index of vertex `k` of simplex `s`.
    #[inline]
    pub fn vertex(&self, s: SimplexIdx, k: usize) -> PointIdx {
        self.simplices[[s as usize, k]]
    }

    /// Simplex across the facet opposite vertex `k` of `s`, if any.
    #[inline]
    pub fn neighbor(&self, s: SimplexIdx, k: usize) -> Option<SimplexIdx> {
        match self.neighbors[[s as usize, k]] {
            INVALID => None,
            n => Some(n),
        }
    }

    /// The (D+1)×D barycentric transform of simplex `s`.
    pub fn transform(&self, s: SimplexIdx) -> ArrayView2<'_, Real> {
        self.transform.index_axis(Axis(0), s as usize)
    }

    /// Points sharing an edge with `p` (the ridge star used by the gradient
    /// solver), sorted ascending.
    pub fn vertex_neighbors(&self, p: PointIdx) -> &[PointIdx] {
        self.vertex_neighbors.of(p)
    }

    pub fn vertex_neighbor_table(&self) -> &VertexNeighbors {
        &self.vertex_neighbors
    }

    /// True if the transform of `s` is usable (not NaN-filled).
    pub fn is_valid_simplex(&self, s: SimplexIdx) -> bool {
        !self.transform[[s as usize, 0, 0]].is_nan()
    }

    pub fn simplex_centroid(&self, s: SimplexIdx) -> Vec<Real> {
        let ndim = self.ndim();
        centroid((0..=ndim).map(|k| self.point(self.vertex(s, k))), ndim)
    }

    /// Cheap rejection test against the bounding box of all points.
    pub fn within_bounds(&self, x: &[Real], eps: Real) -> bool {
        x.iter()
            .zip(self.min_bound.iter().zip(&self.max_bound))
            .all(|(&xi, (&lo, &hi))| xi >= lo - eps && xi <= hi + eps)
    }
}

fn convert_simplices(points: &Array2<Real>, simplices: &Array2<usize>) -> Result<Array2<PointIdx>> {
    let ndim = points.ncols();
    let npoints = points.nrows();
    if ndim == 0 {
        return Err(Error::invalid("points", "P×0", "points need at least one coordinate"));
    }
    if simplices.ncols() != ndim + 1 {
        return Err(Error::ShapeMismatch {
            context: "simplex vertex count vs ndim + 1",
            expected: ndim + 1,
            actual: simplices.ncols(),
        });
    }
    if simplices.nrows() == 0 {
        return Err(Error::EmptyTriangulation);
    }
    if npoints >= INVALID as usize || simplices.nrows() >= INVALID as usize {
        return Err(Error::invalid(
            "points",
            npoints,
            "point and simplex counts must fit in u32",
        ));
    }

    let mut out = Array2::zeros(simplices.dim());
    for (dst, &v) in out.iter_mut().zip(simplices.iter()) {
        if v >= npoints {
            return Err(Error::IndexOutOfRange {
                table: "simplices",
                index: v as i64,
                len: npoints,
            });
        }
        *dst = v as PointIdx;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn unit_square() -> Triangulation {
        let points = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let simplices = array![[0usize, 1, 2], [0, 2, 3]];
        Triangulation::from_simplices(points, simplices).unwrap()
    }

    #[test]
    fn derived_neighbors_point_across_shared_facet() {
        let tri = unit_square();
        // Facet {0, 2} is opposite vertex 1 in simplex 0 and vertex 2 in simplex 1.
        assert_eq!(tri.neighbor(0, 1), Some(1));
        assert_eq!(tri.neighbor(1, 2), Some(0));
        assert_eq!(tri.neighbor(0, 0), None);
        assert_eq!(tri.neighbor(0, 2), None);
        assert_eq!(tri.neighbor(1, 0), None);
        assert_eq!(tri.neighbor(1, 1), None);
    }

    #[test]
    fn bounds_and_centroid() {
        let tri = unit_square();
        assert_eq!(tri.min_bound(), &[0.0, 0.0]);
        assert_eq!(tri.max_bound(), &[1.0, 1.0]);
        assert!(tri.within_bounds(&[0.5, 0.5], 0.0));
        assert!(!tri.within_bounds(&[1.5, 0.5], 0.0));
        let c = tri.simplex_centroid(0);
        assert!((c[0] - 2.0 / 3.0).abs() < 1e-15);
        assert!((c[1] - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn vertex_neighbors_cover_edges() {
        let tri = unit_square();
        assert_eq!(tri.vertex_neighbors(0), &[1, 2, 3]);
        assert_eq!(tri.vertex_neighbors(1), &[0, 2]);
        assert_eq!(tri.vertex_neighbors(3), &[0, 2]);
    }

    #[test]
    fn from_parts_maps_minus_one() {
        let reference = unit_square();
        let neighbors = array![[-1i64, 1, -1], [-1, -1, 0]];
        let tri = Triangulation::from_parts(
            reference.points().to_owned(),
            array![[0usize, 1, 2], [0, 2, 3]],
            neighbors,
            reference.transform.clone(),
        )
        .unwrap();
        assert_eq!(tri.neighbor(0, 1), Some(1));
        assert_eq!(tri.neighbor(0, 0), None);
    }

    #[test]
    fn from_parts_rejects_bad_neighbor_index() {
        let reference = unit_square();
        let err = Triangulation::from_parts(
            reference.points().to_owned(),
            array![[0usize, 1, 2], [0, 2, 3]],
            array![[-1i64, 7, -1], [-1, -1, 0]],
            reference.transform.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { table: "neighbors", index: 7, .. }));
    }

    #[test]
    fn rejects_wrong_simplex_width() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let err = Triangulation::from_simplices(points, array![[0usize, 1]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn rejects_out_of_range_vertex() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let err = Triangulation::from_simplices(points, array![[0usize, 1, 3]]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { table: "simplices", .. }));
    }

    #[test]
    fn rejects_empty() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let simplices = Array2::<usize>::zeros((0, 3));
        assert!(matches!(
            Triangulation::from_simplices(points, simplices),
            Err(Error::EmptyTriangulation)
        ));
    }
}
