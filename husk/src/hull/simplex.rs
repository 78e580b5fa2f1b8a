//! Seed tetrahedron selection
//!
//! Expansion needs four non-coplanar vertices to start from.  They are
//! found with three support queries along mutually orthogonal directions,
//! each slightly skewed so axis-aligned clouds don't tie along the probe.

use super::support::{Mark, max_dir_settled};
use nalgebra::Vector3;

/// Finds four non-coplanar vertices, wound so their tetrahedron has
/// positive volume
///
/// Returns `None` for clouds where no such tetrahedron exists (coincident
/// or colinear points); the caller must abort the whole computation.
pub(crate) fn find_simplex(
    verts: &[Vector3<f64>],
    marks: &mut [Mark],
) -> Option<[u32; 4]> {
    // Skewed so axis-aligned clouds don't tie along the seed axis
    let seed = Vector3::new(0.01, 0.02, 1.0);
    let p0 = max_dir_settled(verts, &seed, marks);
    let p1 = max_dir_settled(verts, &(-seed), marks);
    let edge = verts[p0] - verts[p1];
    if p0 == p1 || edge == Vector3::zeros() {
        return None;
    }

    let a = Vector3::new(1.0, 0.02, 0.0).cross(&edge);
    let b = Vector3::new(-0.02, 1.0, 0.0).cross(&edge);
    let longer = if a.norm() > b.norm() { a } else { b };
    let ortho = longer.try_normalize(0.0)?;
    let mut p2 = max_dir_settled(verts, &ortho, marks);
    if p2 == p0 || p2 == p1 {
        p2 = max_dir_settled(verts, &(-ortho), marks);
    }
    if p2 == p0 || p2 == p1 {
        return None;
    }

    let normal = (verts[p2] - verts[p0]).cross(&edge).try_normalize(0.0)?;
    let mut p3 = max_dir_settled(verts, &normal, marks);
    if p3 == p0 || p3 == p1 || p3 == p2 {
        p3 = max_dir_settled(verts, &(-normal), marks);
    }
    if p3 == p0 || p3 == p1 || p3 == p2 {
        return None;
    }

    // Fix a consistent orientation: positive signed volume
    let vol = (verts[p3] - verts[p0]).dot(
        &(verts[p1] - verts[p0]).cross(&(verts[p2] - verts[p0])),
    );
    if vol < 0.0 {
        std::mem::swap(&mut p2, &mut p3);
    }
    Some([p0 as u32, p1 as u32, p2 as u32, p3 as u32])
}

#[cfg(test)]
mod test {
    use super::*;

    fn marks(n: usize) -> Vec<Mark> {
        vec![Mark::Allowed; n]
    }

    #[test]
    fn tetrahedron_seeds_itself() {
        let verts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let mut m = marks(4);
        let s = find_simplex(&verts, &mut m).unwrap();

        let mut seen = s.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);

        // Positive signed volume
        let [p0, p1, p2, p3] = s.map(|i| verts[i as usize]);
        let vol = (p3 - p0).dot(&(p1 - p0).cross(&(p2 - p0)));
        assert!(vol > 0.0);
    }

    #[test]
    fn colinear_cloud_fails() {
        let verts: Vec<_> = (0..10)
            .map(|i| Vector3::new(i as f64, 2.0 * i as f64, 3.0 * i as f64))
            .collect();
        let mut m = marks(verts.len());
        assert!(find_simplex(&verts, &mut m).is_none());
    }

    #[test]
    fn coincident_cloud_fails() {
        let verts = vec![Vector3::new(1.0, 1.0, 1.0); 5];
        let mut m = marks(verts.len());
        assert!(find_simplex(&verts, &mut m).is_none());
    }
}
