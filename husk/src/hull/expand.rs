//! Incremental hull expansion
//!
//! The state machine at the heart of the crate.  Starting from a seed
//! tetrahedron, each iteration picks the live triangle whose cached support
//! vertex rises farthest above its plane, marks that vertex extreme, and
//! extrudes every triangle visible from it.  Freshly created slivers and
//! locally inverted faces are repaired on the spot, so the live set is a
//! closed, consistently wound surface again before the next iteration.
//!
//! A vertex is never chosen as an apex twice, which bounds the iteration
//! count by the vertex count; an optional budget cuts it off earlier and
//! yields a coarser hull.

use super::clean::bounds;
use super::simplex::find_simplex;
use super::support::{Mark, max_dir_settled};
use super::topo::{Apex, Triangle, TrianglePool};
use crate::Error;
use nalgebra::Vector3;

/// Effective budget when `max_vertices` is zero
const UNBOUNDED: usize = 1_000_000_000;

/// Unit normal of the triangle `(a, b, c)`; an arbitrary axis for
/// zero-area triangles
fn tri_normal(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    c: &Vector3<f64>,
) -> Vector3<f64> {
    let cp = (b - a).cross(&(c - b));
    let m = cp.norm();
    if m == 0.0 { Vector3::x() } else { cp / m }
}

/// Whether `p` lies above the plane of `t` by more than `epsilon`
fn above(
    verts: &[Vector3<f64>],
    t: &[u32; 3],
    p: &Vector3<f64>,
    epsilon: f64,
) -> bool {
    let n = tri_normal(
        &verts[t[0] as usize],
        &verts[t[1] as usize],
        &verts[t[2] as usize],
    );
    n.dot(&(p - verts[t[0] as usize])) > epsilon
}

/// Computes support vertices for every unclassified triangle
///
/// A triangle whose support vertex is already extreme can never expand
/// again and is settled permanently; otherwise it becomes a candidate with
/// a fresh rise.
fn classify_unknown(
    pool: &mut TrianglePool,
    verts: &[Vector3<f64>],
    marks: &mut [Mark],
    extreme: &[bool],
) {
    for id in 0..pool.len() as u32 {
        let tv = match pool.get(id) {
            Some(t) if t.apex == Apex::Unknown => t.verts,
            _ => continue,
        };
        let n = tri_normal(
            &verts[tv[0] as usize],
            &verts[tv[1] as usize],
            &verts[tv[2] as usize],
        );
        let m = max_dir_settled(verts, &n, marks);
        let apex = if extreme[m] {
            Apex::Settled
        } else {
            Apex::Candidate {
                vert: m as u32,
                rise: n.dot(&(verts[m] - verts[tv[0] as usize])),
            }
        };
        pool.get_mut(id).unwrap().apex = apex;
    }
}

/// The candidate vertex and rise of the live triangle rising farthest
fn best_candidate(pool: &TrianglePool) -> Option<(u32, f64)> {
    let mut best: Option<(u32, f64)> = None;
    for (_, t) in pool.live() {
        if let Apex::Candidate { vert, rise } = t.apex {
            if best.is_none_or(|(_, r)| rise > r) {
                best = Some((vert, rise));
            }
        }
    }
    best
}

/// Repairs slivers and locally inverted faces around a fresh apex
///
/// A fan triangle is degenerate when the running centroid pokes above its
/// plane (the face flipped during a near-coplanar extrusion) or when its
/// area is vanishing.  The fix extrudes the triangle's outer neighbor
/// through the apex too, which cancels the bad face as a back-to-back
/// pocket; new fan triangles from the fix go back on the worklist.
///
/// Each fix permanently removes one apex-free triangle, so this
/// terminates.  Degeneracy depends only on a triangle's own vertices, so
/// one check per triangle suffices even as links are restitched around it.
fn repair(
    pool: &mut TrianglePool,
    verts: &[Vector3<f64>],
    apex: u32,
    center: &Vector3<f64>,
    epsilon: f64,
) {
    let mut dirty: Vec<u32> = pool
        .live()
        .filter(|(_, t)| t.has_vert(apex))
        .map(|(id, _)| id)
        .collect();
    while let Some(id) = dirty.pop() {
        let Some(t) = pool.get(id) else { continue };
        let tv = t.verts;
        let outer = t.neighbors[0];

        let inverted = above(verts, &tv, center, 0.01 * epsilon);
        let sliver = (verts[tv[1] as usize] - verts[tv[0] as usize])
            .cross(&(verts[tv[2] as usize] - verts[tv[1] as usize]))
            .norm()
            < epsilon * epsilon * 0.1;
        if !inverted && !sliver {
            continue;
        }

        debug_assert!(
            !pool.tri(outer).has_vert(apex),
            "repair target's outer neighbor already contains the apex"
        );
        for c in pool.extrude(outer, apex) {
            if pool.is_live(c) {
                dirty.push(c);
            }
        }
    }
}

/// Builds the hull of a sanitized cloud, as a flat triangle index list
/// plus a face count
///
/// `max_vertices` caps the number of hull vertices (0 = unbounded);
/// hitting the cap is not an error, just a coarser result.
pub(crate) fn compute_hull(
    verts: &[Vector3<f64>],
    max_vertices: usize,
) -> Result<(Vec<u32>, usize), Error> {
    if verts.len() < 4 {
        return Err(Error::DegenerateInput);
    }
    let mut vlimit = if max_vertices == 0 {
        UNBOUNDED
    } else {
        max_vertices
    };

    let (bmin, bmax) = bounds(verts);
    let epsilon = (bmax - bmin).norm() * 0.001;

    let mut marks = vec![Mark::Allowed; verts.len()];
    let mut extreme = vec![false; verts.len()];

    let Some([p0, p1, p2, p3]) = find_simplex(verts, &mut marks) else {
        return Err(Error::DegenerateInput);
    };
    let center = (verts[p0 as usize]
        + verts[p1 as usize]
        + verts[p2 as usize]
        + verts[p3 as usize])
        / 4.0;

    let mut pool = TrianglePool::new();
    pool.push(Triangle::new([p2, p3, p1], [2, 3, 1]));
    pool.push(Triangle::new([p3, p2, p0], [3, 2, 0]));
    pool.push(Triangle::new([p0, p1, p3], [0, 1, 3]));
    pool.push(Triangle::new([p1, p0, p2], [1, 0, 2]));
    for id in 0..4 {
        pool.check(id);
    }
    for p in [p0, p1, p2, p3] {
        extreme[p as usize] = true;
    }
    classify_unknown(&mut pool, verts, &mut marks, &extreme);

    // The budget counts hull vertices, and the seed spent four
    vlimit = vlimit.saturating_sub(4);
    while vlimit > 0 {
        let Some((v, rise)) = best_candidate(&pool) else { break };
        if rise <= epsilon {
            break; // converged: every vertex is within epsilon of the hull
        }
        debug_assert!(!extreme[v as usize], "apex chosen twice");
        extreme[v as usize] = true;
        let apex_pos = verts[v as usize];

        // Fan the apex into the hole left by every triangle it can see.
        // New triangles land above the starting length and are skipped.
        let mut id = pool.len() as u32;
        while id > 0 {
            id -= 1;
            let Some(t) = pool.get(id) else { continue };
            if above(verts, &t.verts, &apex_pos, 0.01 * epsilon) {
                pool.extrude(id, v);
            }
        }

        repair(&mut pool, verts, v, &center, epsilon);
        classify_unknown(&mut pool, verts, &mut marks, &extreme);
        vlimit -= 1;
    }
    if vlimit == 0 {
        log::debug!("vertex budget exhausted; emitting a coarser hull");
    }

    let mut indices = Vec::new();
    let mut faces = 0;
    for (_, t) in pool.live() {
        indices.extend_from_slice(&t.verts);
        faces += 1;
    }
    Ok((indices, faces))
}
