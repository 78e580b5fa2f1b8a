//! Final vertex compaction
//!
//! The expansion works against the full sanitized cloud, so the raw index
//! list references interior vertices' slots that never made it onto the
//! hull.  This pass rewrites the list onto a minimal vertex set, in first-
//! appearance order, and patches the original-input remap to match.

use nalgebra::Vector3;

/// Remaps `indices` onto a minimal vertex array, which is returned
///
/// `remap` entries (original input index → sanitized slot) are rewritten
/// to point at the compacted slots; entries whose vertex is not referenced
/// by any face become `u32::MAX`.
pub(crate) fn compact_vertices(
    verts: &[Vector3<f64>],
    indices: &mut [u32],
    remap: &mut [u32],
) -> Vec<Vector3<f64>> {
    // Rewrites are matched against the pre-pass mapping, so an entry that
    // was already rewritten can't alias a later vertex id.
    let snapshot: Vec<u32> = remap.to_vec();
    remap.fill(u32::MAX);

    let mut used = vec![0u32; verts.len()]; // slot + 1; 0 = unseen
    let mut out = Vec::new();
    for ix in indices.iter_mut() {
        let v = *ix as usize;
        if used[v] != 0 {
            *ix = used[v] - 1;
        } else {
            let slot = out.len() as u32;
            *ix = slot;
            out.push(verts[v]);
            for (k, &orig) in snapshot.iter().enumerate() {
                if orig == v as u32 {
                    remap[k] = slot;
                }
            }
            used[v] = slot + 1;
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unused_vertices_are_dropped() {
        let verts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
        ];
        // Faces only reference 3, 1, and 0; vertex 2 is interior
        let mut indices = vec![3, 1, 0, 0, 1, 3];
        let mut remap = vec![0, 1, 2, 3];

        let out = compact_vertices(&verts, &mut indices, &mut remap);
        assert_eq!(out, vec![verts[3], verts[1], verts[0]]);
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(remap, vec![2, 1, u32::MAX, 0]);
    }

    #[test]
    fn duplicate_inputs_share_a_slot() {
        let verts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        let mut indices = vec![1, 0, 1];
        // Three original inputs were merged into sanitized slot 1
        let mut remap = vec![1, 1, 0, 1];

        let out = compact_vertices(&verts, &mut indices, &mut remap);
        assert_eq!(out.len(), 2);
        assert_eq!(remap, vec![0, 0, 1, 0]);
    }
}
