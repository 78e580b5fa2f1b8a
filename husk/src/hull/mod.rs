//! Convex hull construction
//!
//! This module builds the convex hull of a 3D point cloud as an indexed
//! face set, using an incremental expansion: a seed tetrahedron is grown one
//! apex vertex at a time, always picking the point that rises farthest above
//! the current surface, until every input point is enclosed (or an optional
//! vertex budget runs out).
//!
//! The resulting meshes are
//! - Watertight: every edge is shared by exactly two faces
//! - Consistently wound, with outward-facing normals
//! - Deterministic for a given cloud and settings
//!
//! Input points are sanitized first: near-duplicates are merged, and clouds
//! that collapse to a point, line, or axis-aligned plane are replaced with a
//! small synthetic box so that downstream code always has a volume to work
//! with.  See [`ConvexHull::build`] for the failure cases that remain.
//!
//! Here's a full example:
//!
//! ```
//! use husk::hull::{ConvexHull, Settings};
//! use nalgebra::Vector3;
//!
//! let cloud = vec![
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(-1.0, 0.0, 0.0),
//!     Vector3::new(0.0, 1.0, 0.0),
//!     Vector3::new(0.0, -1.0, 0.0),
//!     Vector3::new(0.0, 0.0, 1.0),
//!     Vector3::new(0.0, 0.0, -1.0),
//! ];
//! let hull = ConvexHull::build(&cloud, &Settings::default())?;
//! assert_eq!(hull.faces, 8); // an octahedron
//!
//! // Open a file to write, e.g.
//! // let mut f = std::fs::File::create("out.stl")?;
//! # let mut f = vec![];
//! hull.write_stl(&mut f)?;
//! # Ok::<(), husk::Error>(())
//! ```

mod clean;
mod compact;
mod expand;
mod output;
mod simplex;
mod support;
mod topo;

use crate::Error;
use nalgebra::Vector3;

/// Settings when building a convex hull
#[derive(Copy, Clone, Debug)]
pub struct Settings {
    /// Emit length-prefixed polygon records instead of bare triangles
    ///
    /// When set, each face in [`ConvexHull::indices`] is written as
    /// `(3, i0, i1, i2)`.  The leading count is reserved framing for n-gon
    /// faces; coplanar triangles are never merged today.
    pub polygons: bool,

    /// Reverse the winding of every output face
    pub reverse_order: bool,

    /// Tolerance for merging nearby input points, per axis, relative to the
    /// cloud's bounding box
    pub normal_epsilon: f64,

    /// Upper bound on hull vertices; 0 means unbounded
    ///
    /// When the budget is reached, expansion stops early and the result is a
    /// coarser (but still valid and closed) hull.
    pub max_vertices: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            polygons: false,
            reverse_order: false,
            normal_epsilon: 0.001,
            max_vertices: 4096,
        }
    }
}

/// A convex hull as an indexed face set
#[derive(Clone, Debug)]
pub struct ConvexHull {
    /// Whether `indices` holds length-prefixed polygon records
    pub polygons: bool,

    /// Hull vertices; minimal, every one is referenced by `indices`
    pub vertices: Vec<Vector3<f64>>,

    /// Number of faces
    pub faces: usize,

    /// Flat face index buffer
    ///
    /// Three entries per face in triangle mode, four (with a leading `3`) in
    /// polygon mode.
    pub indices: Vec<u32>,

    /// Maps an original input index to its slot in `vertices`
    ///
    /// Entries for points that did not survive onto the hull (interior
    /// points, or duplicates merged into a survivor) are `u32::MAX`.  Empty
    /// when a degenerate cloud was replaced by the synthetic box.
    pub remap: Vec<u32>,
}

impl ConvexHull {
    /// Builds the convex hull of a point cloud
    ///
    /// # Errors
    /// [`Error::EmptyInput`] if `points` is empty, and
    /// [`Error::DegenerateInput`] if no seed tetrahedron exists even after
    /// degeneracy handling (a coincident or colinear cloud that slipped past
    /// the synthetic-box fallback).  There are no partial results: every
    /// other irregularity is repaired internally.
    pub fn build(
        points: &[Vector3<f64>],
        settings: &Settings,
    ) -> Result<Self, Error> {
        let cleaned = clean::clean_vertices(points, settings.normal_epsilon)?;
        let mut remap = cleaned.remap;

        // Hull construction happens at world scale; normalization only
        // serves the dedup epsilon.
        let verts: Vec<Vector3<f64>> = cleaned
            .vertices
            .iter()
            .map(|v| v.component_mul(&cleaned.scale))
            .collect();

        let (mut indices, faces) =
            expand::compute_hull(&verts, settings.max_vertices)?;
        let vertices = compact::compact_vertices(&verts, &mut indices, &mut remap);
        log::debug!(
            "hull done: {} vertices, {} faces",
            vertices.len(),
            faces
        );
        Ok(output::assemble(vertices, &indices, faces, remap, settings))
    }

    /// Iterates over faces as vertex-index triples
    ///
    /// This strips the polygon framing, so it works the same in both output
    /// modes.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let (stride, skip) = if self.polygons { (4, 1) } else { (3, 0) };
        self.indices
            .chunks_exact(stride)
            .map(move |c| [c[skip], c[skip + 1], c[skip + 2]])
    }

    /// Returns the volume enclosed by the hull
    pub fn volume(&self) -> f64 {
        let mut sum = 0.0;
        for t in self.triangles() {
            let a = self.vertices[t[0] as usize];
            let b = self.vertices[t[1] as usize];
            let c = self.vertices[t[2] as usize];
            // Signed volume of the tetrahedron against the origin; the signs
            // cancel over a closed surface.
            sum += a.dot(&b.cross(&c));
        }
        (sum / 6.0).abs()
    }

    /// Returns the hull vertex farthest along `dir`
    pub fn support_point(&self, dir: &Vector3<f64>) -> Vector3<f64> {
        let mut best = self.vertices[0];
        let mut best_dot = best.dot(dir);
        for v in &self.vertices[1..] {
            let d = v.dot(dir);
            if d > best_dot {
                best = *v;
                best_dot = d;
            }
        }
        best
    }
}
