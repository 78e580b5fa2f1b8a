//! Husk computes 3D convex hulls of point clouds.
//!
//! It is aimed at physics pipelines that need approximate convex collision
//! shapes for arbitrary geometry: feed in every vertex of a model and get
//! back a minimal watertight hull around them, optionally capped to a vertex
//! budget so the resulting collider stays cheap.
//!
//! The construction is an incremental quickhull-style expansion with a few
//! properties that matter for collision-shape generation:
//!
//! - **Robust on junk input.**  Duplicated points are merged, and clouds that
//!   collapse to a point, line, or axis-aligned plane are replaced by a small
//!   synthetic box, so a usable hull comes back for almost anything.  Only an
//!   empty cloud or one with no valid seed tetrahedron is an error.
//! - **Deterministic.**  Support queries break ties with a fixed cone-sweep
//!   rather than input order luck, so the same cloud always yields the same
//!   mesh.
//! - **Budgeted.**  An optional vertex limit stops expansion early and
//!   yields a coarser (but still valid and closed) hull.
//!
//! # Example
//!
//! ```
//! use husk::hull::{ConvexHull, Settings};
//! use nalgebra::Vector3;
//!
//! // The eight corners of a cube, plus a point inside it.
//! let mut cloud = vec![Vector3::new(0.5, 0.5, 0.5)];
//! for i in 0..8 {
//!     cloud.push(Vector3::new(
//!         if i & 1 == 0 { -1.0 } else { 1.0 },
//!         if i & 2 == 0 { -1.0 } else { 1.0 },
//!         if i & 4 == 0 { -1.0 } else { 1.0 },
//!     ));
//! }
//!
//! let hull = ConvexHull::build(&cloud, &Settings::default())?;
//!
//! // The interior point is gone; the cube surface is 12 triangles.
//! assert_eq!(hull.vertices.len(), 8);
//! assert_eq!(hull.faces, 12);
//! # Ok::<(), husk::Error>(())
//! ```

pub mod hull;

mod error;
pub use error::Error;
