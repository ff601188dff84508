// Copyright 2025 Lars Brubaker
// Piecewise-linear interpolant: exactness, fill behavior, broadcasting.

mod helpers;

use ndarray::{array, Array2, ArrayD, Axis, IxDyn};
use num_complex::Complex64;
use simplex_interp::{
    Error, InterpolatorConfig, LinearInterpolator, ScatteredInterpolator, Triangulation,
};

fn affine(p: &[f64]) -> f64 {
    0.5 - 1.25 * p[0] + 2.0 * p[1]
}

// --- Exactness ---

#[test]
fn reproduces_data_at_every_point() {
    let tri = helpers::grid_triangulation(5, 0.15, 7);
    let mut rng = helpers::XorShift::new(3);
    let values = Array2::from_shape_fn((tri.npoints(), 1), |_| rng.range(-10.0, 10.0));
    let interp = LinearInterpolator::new(tri.clone(), values.clone(), InterpolatorConfig::default()).unwrap();

    let out = interp.evaluate(tri.points().into_dyn()).unwrap();
    for v in 0..tri.npoints() {
        helpers::assert_close(out[[v, 0]], values[[v, 0]], 1e-12, &format!("point {}", v));
    }
}

#[test]
fn affine_data_is_reproduced_everywhere() {
    let tri = helpers::grid_triangulation(6, 0.15, 11);
    let values = helpers::sample(&tri, affine);
    let interp = LinearInterpolator::new(tri, values, InterpolatorConfig::default()).unwrap();

    let xi = helpers::random_queries(500, 0.0, 6.0, 5);
    let out = interp.evaluate(xi.view()).unwrap();
    assert_eq!(out.shape(), &[500, 1]);
    for i in 0..500 {
        let x = [xi[[i, 0]], xi[[i, 1]]];
        helpers::assert_close(out[[i, 0]], affine(&x), 1e-12, &format!("query {:?}", x));
    }
}

#[test]
fn colinear_queries_in_one_simplex_give_colinear_values() {
    // Arbitrary data: the interpolant is still affine inside each simplex.
    let tri = helpers::grid_triangulation(4, 0.15, 19);
    let mut rng = helpers::XorShift::new(23);
    let values = Array2::from_shape_fn((tri.npoints(), 2), |_| rng.range(-5.0, 5.0));
    let interp = LinearInterpolator::new(tri.clone(), values, InterpolatorConfig::default()).unwrap();

    for s in 0..tri.nsimplex() as u32 {
        let c = tri.simplex_centroid(s);
        let v = tri.point(tri.vertex(s, 0));
        // Three points on the segment from the centroid halfway to vertex 0.
        let at = |t: f64| [c[0] + t * (v[0] - c[0]), c[1] + t * (v[1] - c[1])];
        let (a, b, m) = (at(0.0), at(0.5), at(0.25));
        let fa = interp.evaluate_point(&a, Some(s)).unwrap();
        let fb = interp.evaluate_point(&b, Some(s)).unwrap();
        let fm = interp.evaluate_point(&m, Some(s)).unwrap();
        for col in 0..2 {
            helpers::assert_close(fm[col], 0.5 * (fa[col] + fb[col]), 1e-12, &format!("simplex {}", s));
        }
    }
}

#[test]
fn tetrahedral_mesh_is_supported() {
    // Unit cube split into six tetrahedra around the main diagonal.
    let points = array![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0]
    ];
    let simplices = array![
        [0usize, 1, 3, 7],
        [0, 1, 5, 7],
        [0, 2, 3, 7],
        [0, 2, 6, 7],
        [0, 4, 5, 7],
        [0, 4, 6, 7]
    ];
    let tri = Triangulation::from_simplices(points, simplices).unwrap();
    let f = |p: &[f64]| 1.0 + p[0] - 2.0 * p[1] + 3.0 * p[2];
    let values = tri.points().map_axis(Axis(1), |p| f(&p.to_vec())).insert_axis(Axis(1));
    let interp = LinearInterpolator::new(tri, values, InterpolatorConfig::default()).unwrap();

    let mut rng = helpers::XorShift::new(21);
    for _ in 0..100 {
        let x = [rng.next_f64(), rng.next_f64(), rng.next_f64()];
        let got = interp.evaluate_point(&x, None).unwrap();
        helpers::assert_close(got[0], f(&x), 1e-12, &format!("{:?}", x));
    }
}

// --- Outside the hull ---

#[test]
fn outside_hull_gets_fill_value() {
    let tri = helpers::grid_triangulation(3, 0.1, 1);
    let values = helpers::sample(&tri, affine);
    let values = ndarray::concatenate![Axis(1), values, values];

    let nan = LinearInterpolator::new(tri.clone(), values.clone(), InterpolatorConfig::default()).unwrap();
    let xi = array![[-0.5, 1.0], [1.0, 3.5], [10.0, 10.0]].into_dyn();
    let out = nan.evaluate(xi.view()).unwrap();
    assert!(out.iter().all(|v| v.is_nan()), "{:?}", out);

    let fixed = LinearInterpolator::new(tri, values, InterpolatorConfig::default().with_fill_value(42.0)).unwrap();
    let out = fixed.evaluate(xi.view()).unwrap();
    assert!(out.iter().all(|&v| v == 42.0), "{:?}", out);
}

// --- Complex data ---

#[test]
fn complex_values_match_real_path_exactly() {
    let tri = helpers::grid_triangulation(4, 0.15, 9);
    let real = helpers::sample(&tri, |p| (p[0] * 0.7).sin() + p[1] * p[1]);
    let cplx = real.mapv(|v| Complex64::new(v, 0.0));

    let r = LinearInterpolator::new(tri.clone(), real, InterpolatorConfig::default()).unwrap();
    let z = LinearInterpolator::new(tri, cplx, InterpolatorConfig::default()).unwrap();
    let xi = helpers::random_queries(200, -0.5, 4.5, 13);
    let out_r = r.evaluate(xi.view()).unwrap();
    let out_z = z.evaluate(xi.view()).unwrap();
    for (a, b) in out_r.iter().zip(out_z.iter()) {
        if a.is_nan() {
            assert!(b.re.is_nan() && b.im.is_nan());
        } else {
            assert_eq!(b.re, *a);
            assert_eq!(b.im, 0.0);
        }
    }
}

// --- Shapes ---

#[test]
fn broadcast_keeps_leading_axes() {
    let tri = helpers::grid_triangulation(2, 0.0, 0);
    let values = Array2::from_shape_fn((tri.npoints(), 3), |(v, c)| (v * (c + 1)) as f64);
    let interp = LinearInterpolator::new(tri, values, InterpolatorConfig::default()).unwrap();

    let xi = ArrayD::from_elem(IxDyn(&[4, 5, 6, 2]), 0.5);
    let out = interp.evaluate(xi.view()).unwrap();
    assert_eq!(out.shape(), &[4, 5, 6, 3]);
}

#[test]
fn non_contiguous_queries_are_accepted() {
    let tri = helpers::grid_triangulation(2, 0.0, 0);
    let interp = LinearInterpolator::new(tri.clone(), helpers::sample(&tri, affine), InterpolatorConfig::default())
        .unwrap();
    // Transposed view: 2×N in memory, read as N×2.
    let stored = array![[0.5, 1.0, 1.5], [0.25, 1.75, 0.5]];
    let xi = stored.t().into_dyn();
    let out = interp.evaluate(xi).unwrap();
    for i in 0..3 {
        let x = [stored[[0, i]], stored[[1, i]]];
        helpers::assert_close(out[[i, 0]], affine(&x), 1e-12, "transposed query");
    }
}

#[test]
fn wrong_query_dimension_is_rejected() {
    let tri = helpers::grid_triangulation(2, 0.0, 0);
    let interp = LinearInterpolator::new(tri.clone(), helpers::sample(&tri, affine), InterpolatorConfig::default())
        .unwrap();
    let xi = ArrayD::<f64>::zeros(IxDyn(&[3, 3]));
    assert!(matches!(
        interp.evaluate(xi.view()),
        Err(Error::ShapeMismatch { expected: 2, actual: 3, .. })
    ));
    let scalar = ArrayD::<f64>::zeros(IxDyn(&[]));
    assert!(interp.evaluate(scalar.view()).is_err());
}
