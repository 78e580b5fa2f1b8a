//! The working surface: a pool of triangles with per-edge neighbor links
//!
//! Triangles live in a growable pool indexed by stable ids.  Removal
//! tombstones the slot instead of compacting, because extrusion relinks
//! neighbors by id while the surgery is still in flight.  The pool is
//! created fresh for every hull computation and discarded with it.
//!
//! Invariant, checked by [`TrianglePool::check`] in debug builds: if
//! triangle A links to triangle B across edge `(u, v)`, then B links back
//! to A across `(v, u)`.  Between surgeries the live set is a closed,
//! consistently wound surface.

/// Expansion state of a pooled triangle
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Apex {
    /// Not yet classified since the last surgery that touched it
    Unknown,
    /// Fully enclosed; never expands again
    Settled,
    /// Farthest exterior vertex and its signed distance above the plane
    Candidate { vert: u32, rise: f64 },
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Triangle {
    /// Vertex indices, wound outward
    pub verts: [u32; 3],

    /// Neighbor ids; `neighbors[i]` is across the edge opposite `verts[i]`
    pub neighbors: [u32; 3],

    pub apex: Apex,
}

impl Triangle {
    pub fn new(verts: [u32; 3], neighbors: [u32; 3]) -> Self {
        Self {
            verts,
            neighbors,
            apex: Apex::Unknown,
        }
    }

    pub fn has_vert(&self, v: u32) -> bool {
        self.verts.contains(&v)
    }

    /// Index into `neighbors` for the edge `(a, b)`, either orientation
    fn edge_slot(&self, a: u32, b: u32) -> usize {
        for i in 0..3 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;
            if (self.verts[i] == a && self.verts[i1] == b)
                || (self.verts[i] == b && self.verts[i1] == a)
            {
                return i2;
            }
        }
        unreachable!("edge ({a}, {b}) is not part of this triangle");
    }
}

/// Id-stable triangle storage with tombstoned removal
pub(crate) struct TrianglePool {
    slots: Vec<Option<Triangle>>,
}

impl TrianglePool {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Total slot count, live and dead; also the next fresh id
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_live(&self, id: u32) -> bool {
        self.slots[id as usize].is_some()
    }

    pub fn get(&self, id: u32) -> Option<&Triangle> {
        self.slots[id as usize].as_ref()
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Triangle> {
        self.slots[id as usize].as_mut()
    }

    /// Live-triangle access; panics on a tombstoned slot
    pub fn tri(&self, id: u32) -> &Triangle {
        self.slots[id as usize].as_ref().unwrap()
    }

    fn tri_mut(&mut self, id: u32) -> &mut Triangle {
        self.slots[id as usize].as_mut().unwrap()
    }

    pub fn push(&mut self, t: Triangle) -> u32 {
        let id = self.slots.len() as u32;
        self.slots.push(Some(t));
        id
    }

    pub fn remove(&mut self, id: u32) {
        let t = self.slots[id as usize].take();
        debug_assert!(t.is_some(), "double removal of triangle {id}");
    }

    pub fn live(&self) -> impl Iterator<Item = (u32, &Triangle)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (i as u32, t)))
    }

    /// The neighbor of `id` across edge `(a, b)`
    pub fn neighbor_across(&self, id: u32, a: u32, b: u32) -> u32 {
        let t = self.tri(id);
        t.neighbors[t.edge_slot(a, b)]
    }

    /// Mutable slot holding the neighbor of `id` across edge `(a, b)`
    pub fn neighbor_slot_mut(&mut self, id: u32, a: u32, b: u32) -> &mut u32 {
        let t = self.tri_mut(id);
        let s = t.edge_slot(a, b);
        &mut t.neighbors[s]
    }

    /// Debug-only validation of the mutual-link invariant around `id`
    pub fn check(&self, id: u32) {
        if cfg!(debug_assertions) {
            let t = self.tri(id);
            for i in 0..3 {
                let a = t.verts[(i + 1) % 3];
                let b = t.verts[(i + 2) % 3];
                debug_assert_ne!(a, b);
                debug_assert_eq!(
                    self.neighbor_across(t.neighbors[i], b, a),
                    id,
                    "neighbor {} does not link back to {}",
                    t.neighbors[i],
                    id
                );
            }
        }
    }

    /// Removes a back-to-back pair (same vertices, opposite winding),
    /// stitching their outer neighbors to each other edge by edge
    fn remove_back_to_back(&mut self, s: u32, t: u32) {
        for i in 0..3 {
            let (a, b) = {
                let st = self.tri(s);
                (st.verts[(i + 1) % 3], st.verts[(i + 2) % 3])
            };
            let s_out = self.neighbor_across(s, a, b);
            let t_out = self.neighbor_across(t, b, a);
            debug_assert_eq!(self.neighbor_across(s_out, b, a), s);
            debug_assert_eq!(self.neighbor_across(t_out, a, b), t);
            *self.neighbor_slot_mut(s_out, b, a) = t_out;
            *self.neighbor_slot_mut(t_out, a, b) = s_out;
        }
        self.remove(s);
        self.remove(t);
    }

    /// Replaces `base` with three triangles fanning `v` onto its edges
    ///
    /// All neighbor links are rewired; a new triangle whose outer neighbor
    /// already contains `v` forms a zero-volume back-to-back pocket, and
    /// both halves are removed on the spot.  Returns the three new ids
    /// (some may already be dead from that cancellation).
    pub fn extrude(&mut self, base: u32, v: u32) -> [u32; 3] {
        let t = self.tri(base).verts;
        let bn = self.tri(base).neighbors;
        let n = self.len() as u32;

        self.push(Triangle::new([v, t[1], t[2]], [bn[0], n + 1, n + 2]));
        *self.neighbor_slot_mut(bn[0], t[1], t[2]) = n;
        self.push(Triangle::new([v, t[2], t[0]], [bn[1], n + 2, n]));
        *self.neighbor_slot_mut(bn[1], t[2], t[0]) = n + 1;
        self.push(Triangle::new([v, t[0], t[1]], [bn[2], n, n + 1]));
        *self.neighbor_slot_mut(bn[2], t[0], t[1]) = n + 2;

        self.check(n);
        self.check(n + 1);
        self.check(n + 2);

        for id in [n, n + 1, n + 2] {
            let outer = self.tri(id).neighbors[0];
            if self.tri(outer).has_vert(v) {
                self.remove_back_to_back(id, outer);
            }
        }
        self.remove(base);
        [n, n + 1, n + 2]
    }
}
