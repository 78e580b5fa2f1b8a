//! Input sanitization
//!
//! Deduplicates the raw cloud and guards against degenerate shapes.  Points
//! are normalized into a unit-ish box first so the merge epsilon is
//! scale-invariant; the recorded per-axis scale maps them back afterwards.
//! A cloud whose bounding box collapses on any axis (or with fewer than
//! three points) is replaced outright by a small synthetic box, so a valid
//! hull can always be produced.

use crate::Error;
use nalgebra::Vector3;

/// Absolute floor below which a bounding-box extent counts as collapsed
const FLAT_EPSILON: f64 = 1e-6;

/// Edge reach of the synthetic box when every extent is collapsed (≈ 1 cm)
const MIN_REACH: f64 = 0.01;

/// A sanitized point cloud, ready for hull construction
pub(crate) struct CleanedCloud {
    /// Deduplicated vertices, in normalized coordinates
    pub vertices: Vec<Vector3<f64>>,

    /// Per-axis factors mapping `vertices` back to input coordinates
    pub scale: Vector3<f64>,

    /// Original input index → slot in `vertices`
    ///
    /// Empty when the cloud was replaced by a synthetic box.
    pub remap: Vec<u32>,
}

/// Componentwise bounding box; `points` must not be empty
pub(crate) fn bounds(
    points: &[Vector3<f64>],
) -> (Vector3<f64>, Vector3<f64>) {
    let mut bmin = points[0];
    let mut bmax = points[0];
    for p in &points[1..] {
        bmin = bmin.inf(p);
        bmax = bmax.sup(p);
    }
    (bmin, bmax)
}

fn collapsed(extent: &Vector3<f64>) -> bool {
    extent.x < FLAT_EPSILON || extent.y < FLAT_EPSILON || extent.z < FLAT_EPSILON
}

/// The eight corners of a box around `center`
///
/// Each axis reaches as far as the cloud's extent on that axis; collapsed
/// axes get 5% of the largest usable extent, or [`MIN_REACH`] when every
/// axis has collapsed.
fn synthetic_box(
    center: &Vector3<f64>,
    extent: &Vector3<f64>,
) -> Vec<Vector3<f64>> {
    let mut len = 0.0_f64;
    for i in 0..3 {
        if extent[i] >= FLAT_EPSILON && extent[i] > len {
            len = extent[i];
        }
    }
    let mut reach = Vector3::zeros();
    if len == 0.0 {
        reach.fill(MIN_REACH);
    } else {
        for i in 0..3 {
            reach[i] = if extent[i] < FLAT_EPSILON {
                len * 0.05
            } else {
                extent[i]
            };
        }
    }
    let mut verts = Vec::with_capacity(8);
    for i in 0..8 {
        verts.push(Vector3::new(
            if i & 1 == 0 { center.x - reach.x } else { center.x + reach.x },
            if i & 2 == 0 { center.y - reach.y } else { center.y + reach.y },
            if i & 4 == 0 { center.z - reach.z } else { center.z + reach.z },
        ));
    }
    verts
}

/// Sanitizes a raw point cloud
///
/// Fails only on an empty input; everything else produces a usable cloud,
/// possibly the synthetic fallback box.
pub(crate) fn clean_vertices(
    points: &[Vector3<f64>],
    normal_epsilon: f64,
) -> Result<CleanedCloud, Error> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }

    let (bmin, bmax) = bounds(points);
    let extent = bmax - bmin;
    let center = (bmax + bmin) * 0.5;

    if collapsed(&extent) || points.len() < 3 {
        log::debug!("degenerate cloud; substituting a synthetic box");
        return Ok(CleanedCloud {
            vertices: synthetic_box(&center, &extent),
            scale: Vector3::new(1.0, 1.0, 1.0),
            remap: Vec::new(),
        });
    }

    // Normalize so the merge epsilon means the same thing on every axis.
    let scale = extent;
    let recip =
        Vector3::new(1.0 / extent.x, 1.0 / extent.y, 1.0 / extent.z);
    let center = center.component_mul(&recip);

    let mut out: Vec<Vector3<f64>> = Vec::with_capacity(points.len());
    let mut remap: Vec<u32> = Vec::with_capacity(points.len());
    for p in points {
        let q = p.component_mul(&recip);
        let mut slot = None;
        for (j, v) in out.iter_mut().enumerate() {
            if (q.x - v.x).abs() < normal_epsilon
                && (q.y - v.y).abs() < normal_epsilon
                && (q.z - v.z).abs() < normal_epsilon
            {
                // Of two merged points, keep the one farther from the center
                if (q - center).norm_squared()
                    > (*v - center).norm_squared()
                {
                    *v = q;
                }
                slot = Some(j);
                break;
            }
        }
        match slot {
            Some(j) => remap.push(j as u32),
            None => {
                remap.push(out.len() as u32);
                out.push(q);
            }
        }
    }

    // Merging can collapse the cloud; re-check with the same fallback.
    let (bmin, bmax) = bounds(&out);
    let extent = bmax - bmin;
    let center = (bmax + bmin) * 0.5;
    if collapsed(&extent) || out.len() < 3 {
        log::debug!("cloud collapsed during dedup; substituting a box");
        return Ok(CleanedCloud {
            vertices: synthetic_box(&center, &extent),
            scale,
            remap: Vec::new(),
        });
    }

    Ok(CleanedCloud {
        vertices: out,
        scale,
        remap,
    })
}
