use approx::assert_relative_eq;
use husk::Error;
use husk::hull::{ConvexHull, Settings};
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn cube_corners(half: f64) -> Vec<Vector3<f64>> {
    let mut pts = Vec::new();
    for i in 0..8 {
        pts.push(Vector3::new(
            if i & 1 == 0 { -half } else { half },
            if i & 2 == 0 { -half } else { half },
            if i & 4 == 0 { -half } else { half },
        ));
    }
    pts
}

fn sphere_cloud(n: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut pts = Vec::with_capacity(n);
    while pts.len() < n {
        let p = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.norm_squared() <= 1.0 {
            pts.push(p);
        }
    }
    pts
}

/// Every undirected edge must occur in exactly two faces, with opposite
/// local winding
fn assert_closed(hull: &ConvexHull) {
    let mut directed = HashSet::new();
    for t in hull.triangles() {
        for i in 0..3 {
            let e = (t[i], t[(i + 1) % 3]);
            assert!(directed.insert(e), "edge {e:?} appears twice");
        }
    }
    for &(a, b) in &directed {
        assert!(
            directed.contains(&(b, a)),
            "edge ({a}, {b}) has no opposite twin"
        );
    }
}

/// Every point must sit on or inside every face plane
fn assert_contains(hull: &ConvexHull, points: &[Vector3<f64>], tol: f64) {
    for t in hull.triangles() {
        let a = hull.vertices[t[0] as usize];
        let b = hull.vertices[t[1] as usize];
        let c = hull.vertices[t[2] as usize];
        let cross = (b - a).cross(&(c - b));
        if cross.norm() < 1e-12 {
            continue; // the plane of a vanishing face is meaningless
        }
        let n = cross.normalize();
        for p in points {
            let d = n.dot(&(p - a));
            assert!(d <= tol, "point {p:?} pokes {d} above a face");
        }
    }
}

#[test]
fn cube_hull_is_exact() {
    let pts = cube_corners(1.0);
    let hull = ConvexHull::build(&pts, &Settings::default()).unwrap();

    assert_eq!(hull.vertices.len(), 8);
    assert_eq!(hull.faces, 12);
    assert_eq!(hull.indices.len(), 36);
    assert_closed(&hull);
    assert_contains(&hull, &pts, 1e-9);
    assert_relative_eq!(hull.volume(), 8.0, epsilon = 1e-9);
}

#[test]
fn repeated_point_falls_back_to_a_box() {
    let p = Vector3::new(3.0, -2.0, 0.5);
    let pts = vec![p; 100];
    let hull = ConvexHull::build(&pts, &Settings::default()).unwrap();

    assert_eq!(hull.vertices.len(), 8);
    assert_eq!(hull.faces, 12);
    assert_closed(&hull);
    assert!(hull.remap.is_empty());

    // A small box centered on the point: 0.01 reach on each axis
    let centroid = hull
        .vertices
        .iter()
        .fold(Vector3::zeros(), |acc, v| acc + v)
        / 8.0;
    assert!((centroid - p).norm() < 1e-9);
    assert_relative_eq!(hull.volume(), 0.02_f64.powi(3), epsilon = 1e-12);
}

#[test]
fn random_sphere_cloud_is_enclosed() {
    let pts = sphere_cloud(1000, 17);
    let hull = ConvexHull::build(&pts, &Settings::default()).unwrap();

    assert_closed(&hull);
    // Hull vertices are (possibly dedup-merged) input points
    for v in &hull.vertices {
        assert!(v.norm() <= 1.0 + 1e-9);
    }
    // Epsilon-slack containment: dedup may move points by its tolerance
    assert_contains(&hull, &pts, 0.01);
}

#[test]
fn vertex_budget_yields_a_coarser_hull() {
    // Points near the sphere surface, so the unrestricted hull genuinely
    // needs far more than six vertices
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let pts: Vec<_> = sphere_cloud(500, 3)
        .into_iter()
        .filter(|p| p.norm() > 1e-3)
        .map(|p| p.normalize() * rng.gen_range(0.95..1.0))
        .collect();
    let full = ConvexHull::build(&pts, &Settings::default()).unwrap();
    assert!(full.vertices.len() > 20);

    let coarse = ConvexHull::build(
        &pts,
        &Settings {
            max_vertices: 6,
            ..Settings::default()
        },
    )
    .unwrap();

    assert!(coarse.vertices.len() <= 6);
    assert!(coarse.faces >= 4);
    assert_closed(&coarse);
    assert!(coarse.volume() > 0.0);
    assert!(coarse.volume() <= full.volume());
}

#[test]
fn identical_runs_are_identical() {
    let pts = sphere_cloud(300, 99);
    let a = ConvexHull::build(&pts, &Settings::default()).unwrap();
    let b = ConvexHull::build(&pts, &Settings::default()).unwrap();

    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.indices, b.indices);
    assert_eq!(a.remap, b.remap);
}

#[test]
fn reverse_order_reverses_each_triple() {
    let pts = sphere_cloud(100, 5);
    let fwd = ConvexHull::build(&pts, &Settings::default()).unwrap();
    let rev = ConvexHull::build(
        &pts,
        &Settings {
            reverse_order: true,
            ..Settings::default()
        },
    )
    .unwrap();

    assert_eq!(fwd.vertices, rev.vertices);
    assert_eq!(fwd.faces, rev.faces);
    for (f, r) in fwd.triangles().zip(rev.triangles()) {
        assert_eq!([f[2], f[1], f[0]], r);
    }
}

#[test]
fn polygon_mode_frames_each_face() {
    let pts = cube_corners(2.0);
    let tri = ConvexHull::build(&pts, &Settings::default()).unwrap();
    let poly = ConvexHull::build(
        &pts,
        &Settings {
            polygons: true,
            ..Settings::default()
        },
    )
    .unwrap();

    assert!(poly.polygons);
    assert_eq!(poly.indices.len(), 4 * poly.faces);
    for rec in poly.indices.chunks_exact(4) {
        assert_eq!(rec[0], 3);
    }
    assert!(poly.triangles().eq(tri.triangles()));
}

#[test]
fn empty_input_is_an_error() {
    assert!(matches!(
        ConvexHull::build(&[], &Settings::default()),
        Err(Error::EmptyInput)
    ));
}

#[test]
fn axis_aligned_degenerates_fall_back_to_boxes() {
    // Points along the x axis: the bounding box collapses in y and z
    let line: Vec<_> =
        (0..10).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect();
    let hull = ConvexHull::build(&line, &Settings::default()).unwrap();
    assert_eq!(hull.vertices.len(), 8);
    assert_closed(&hull);

    // A square in an axis-aligned plane collapses the same way
    let plane = vec![
        Vector3::new(0.0, 0.0, 2.0),
        Vector3::new(1.0, 0.0, 2.0),
        Vector3::new(1.0, 1.0, 2.0),
        Vector3::new(0.0, 1.0, 2.0),
    ];
    let hull = ConvexHull::build(&plane, &Settings::default()).unwrap();
    assert_eq!(hull.vertices.len(), 8);
    assert_closed(&hull);
}

#[test]
fn diagonal_colinear_cloud_is_degenerate() {
    // Off-axis, so the bounding-box guard can't catch it; the simplex
    // search must fail instead
    let pts: Vec<_> = (0..10)
        .map(|i| Vector3::new(i as f64, 2.0 * i as f64, -1.5 * i as f64))
        .collect();
    assert!(matches!(
        ConvexHull::build(&pts, &Settings::default()),
        Err(Error::DegenerateInput)
    ));
}

#[test]
fn tilted_coplanar_cloud_never_panics() {
    // A grid in the plane x + y + z = 0, far from axis-aligned, so the
    // bounding-box guard cannot rescue it.  Building must not panic, must
    // be deterministic, and any hull it yields must be a valid thin slab.
    let mut pts = Vec::new();
    for i in -3..=3 {
        for j in -3..=3 {
            let u = Vector3::new(1.0, -1.0, 0.0) * (i as f64);
            let v = Vector3::new(1.0, 1.0, -2.0) * (j as f64);
            pts.push(u + v);
        }
    }
    let first = ConvexHull::build(&pts, &Settings::default());
    let again = ConvexHull::build(&pts, &Settings::default());
    match (&first, &again) {
        (Ok(hull), Ok(rerun)) => {
            assert_closed(hull);
            assert_contains(hull, &pts, 0.05);
            assert_eq!(hull.indices, rerun.indices);
            assert_eq!(hull.vertices, rerun.vertices);
        }
        (Err(Error::DegenerateInput), Err(Error::DegenerateInput)) => {}
        other => panic!("inconsistent results across runs: {other:?}"),
    }
}

#[test]
fn remap_tracks_surviving_inputs() {
    let mut pts = cube_corners(1.0);
    pts.push(Vector3::new(0.1, 0.2, 0.3)); // interior
    pts.push(pts[0]); // exact duplicate of a corner

    let hull = ConvexHull::build(&pts, &Settings::default()).unwrap();
    assert_eq!(hull.remap.len(), pts.len());

    // Corners (and the duplicate) resolve to their output slots
    for (i, p) in pts.iter().enumerate() {
        let slot = hull.remap[i];
        if i == 8 {
            assert_eq!(slot, u32::MAX, "interior point kept a slot");
        } else {
            assert!((hull.vertices[slot as usize] - p).norm() < 1e-9);
        }
    }
    assert_eq!(hull.remap[0], hull.remap[9]);
}

#[test]
fn support_point_matches_brute_force() {
    let pts = sphere_cloud(200, 42);
    let hull = ConvexHull::build(&pts, &Settings::default()).unwrap();

    for dir in [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(-0.3, 0.8, 0.6),
        Vector3::new(0.0, -1.0, 0.2),
    ] {
        let s = hull.support_point(&dir);
        let best = hull
            .vertices
            .iter()
            .map(|v| v.dot(&dir))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(s.dot(&dir), best);
    }
}
