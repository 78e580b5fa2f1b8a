//! Result assembly and mesh export

use super::{ConvexHull, Settings};
use std::io::{BufWriter, Write};

use nalgebra::Vector3;

/// Packs the compacted triangle list into the requested output framing
pub(crate) fn assemble(
    vertices: Vec<Vector3<f64>>,
    tri_indices: &[u32],
    faces: usize,
    remap: Vec<u32>,
    settings: &Settings,
) -> ConvexHull {
    let stride = if settings.polygons { 4 } else { 3 };
    let mut indices = Vec::with_capacity(faces * stride);
    for t in tri_indices.chunks_exact(3) {
        if settings.polygons {
            indices.push(3);
        }
        if settings.reverse_order {
            indices.extend_from_slice(&[t[2], t[1], t[0]]);
        } else {
            indices.extend_from_slice(t);
        }
    }
    ConvexHull {
        polygons: settings.polygons,
        vertices,
        faces,
        indices,
        remap,
    }
}

impl ConvexHull {
    /// Writes a binary STL to the given output
    pub fn write_stl<F: Write>(&self, out: &mut F) -> Result<(), crate::Error> {
        // Many small writes, typically into a file; a `BufWriter` saves
        // excessive syscalls.
        let mut out = BufWriter::new(out);
        const HEADER: &[u8] = b"This is a binary STL file exported by Husk";
        out.write_all(HEADER)?;
        out.write_all(&[0u8; 80 - HEADER.len()])?;
        out.write_all(&(self.faces as u32).to_le_bytes())?;
        for t in self.triangles() {
            let a = self.vertices[t[0] as usize];
            let b = self.vertices[t[1] as usize];
            let c = self.vertices[t[2] as usize];
            // Not the _best_ way to calculate a normal, but good enough
            let normal = (b - a).cross(&(c - a));
            for p in &normal {
                out.write_all(&(*p as f32).to_le_bytes())?;
            }
            for v in t {
                for p in &self.vertices[v as usize] {
                    out.write_all(&(*p as f32).to_le_bytes())?;
                }
            }
            out.write_all(&[0u8; std::mem::size_of::<u16>()])?; // attributes
        }
        Ok(())
    }
}
