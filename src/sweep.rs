use geo::GeoFloat;
use log::{debug, trace};
use slab::Slab;

use crate::bops::BooleanOp;
use crate::chainer::EventChainer;
use crate::events::{EventArena, Label, PolygonType, SweepEvent};
use crate::geom::{Edge, Vertex, VertexOrEdge};
use crate::polygon::Polygon;
use crate::queue::EventQueue;
use crate::status::Status;

/// The sweep engine shared by the three modes: existence check,
/// intersection enumeration, and boolean overlay.
///
/// Owns the event arena, the pending-event queue and the status of
/// active edges; all three are private to one sweep and released when
/// it completes.
pub(crate) struct SweepCore<T: GeoFloat> {
    arena: EventArena<T>,
    queue: EventQueue,
    status: Status,
}

impl<T: GeoFloat> SweepCore<T> {
    pub fn with_capacity(edges: usize) -> Self {
        SweepCore {
            arena: Slab::with_capacity(2 * edges),
            queue: EventQueue::with_capacity(2 * edges),
            status: Status::default(),
        }
    }

    /// Queue both endpoint events of an edge.
    pub fn add_edge(&mut self, edge: Edge<T>, polygon_type: Option<PolygonType>) {
        let left = self
            .arena
            .insert(SweepEvent::new(edge.left(), true, polygon_type));
        let right = self
            .arena
            .insert(SweepEvent::new(edge.right(), false, polygon_type));
        self.arena[left].pair = right;
        self.arena[right].pair = left;
        self.queue.push(left, &self.arena);
        self.queue.push(right, &self.arena);
    }

    fn edge_of(&self, ev: usize) -> Edge<T> {
        Edge::new(self.arena[ev].vertex, self.arena[self.arena[ev].pair].vertex)
    }

    /// Existence mode: stop at the first neighbour pair that meets in
    /// anything other than a single vertex shared by both edges. No
    /// splitting is ever needed; a qualifying pair ends the sweep.
    pub fn find_intersection(&mut self) -> bool {
        debug!("existence sweep over {} events", self.queue.len());
        while let Some(ev) = self.queue.pop(&self.arena) {
            if self.arena[ev].is_left {
                let at = self.status.insert(ev, &self.arena);
                let below = self.status.below(at);
                let above = self.status.above(at);
                if below.map_or(false, |below| self.crosses(ev, below)) {
                    return true;
                }
                if above.map_or(false, |above| self.crosses(above, ev)) {
                    return true;
                }
            } else {
                let (partner, below, above) = self.close_edge(ev);
                self.status.remove(partner);
                if let (Some(below), Some(above)) = (below, above) {
                    if self.crosses(above, below) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Enumeration mode: drain the whole queue, splitting edges as
    /// intersections appear, and report each intersection geometry
    /// once (deduplicated against the previous report).
    pub fn collect_intersections(&mut self) -> Vec<VertexOrEdge<T>> {
        debug!("enumeration sweep over {} events", self.queue.len());
        let mut found = Vec::new();
        while let Some(ev) = self.queue.pop(&self.arena) {
            if self.arena[ev].is_left {
                let at = self.status.insert(ev, &self.arena);
                let below = self.status.below(at);
                let above = self.status.above(at);
                if let Some(below) = below {
                    if let Some(x) = self.possible_intersection(ev, below) {
                        record(&mut found, x);
                    }
                }
                if let Some(above) = above {
                    if let Some(x) = self.possible_intersection(above, ev) {
                        record(&mut found, x);
                    }
                }
            } else {
                let (partner, below, above) = self.close_edge(ev);
                self.status.remove(partner);
                if let (Some(below), Some(above)) = (below, above) {
                    if let Some(x) = self.possible_intersection(above, below) {
                        record(&mut found, x);
                    }
                }
            }
        }
        found
    }

    /// Overlay mode: classify every left event against its lower
    /// neighbour and hand every closing edge to the chainer at the
    /// moment of its removal.
    pub fn overlay(&mut self, op: BooleanOp) -> Vec<Polygon<T>> {
        debug!("{:?} overlay sweep over {} events", op, self.queue.len());
        let mut chainer = EventChainer::new(op);
        while let Some(ev) = self.queue.pop(&self.arena) {
            if self.arena[ev].is_left {
                let at = self.status.insert(ev, &self.arena);
                let below = self.status.below(at);
                let above = self.status.above(at);
                self.classify(ev, below);
                if let Some(below) = below {
                    self.possible_intersection(ev, below);
                }
                if let Some(above) = above {
                    self.possible_intersection(above, ev);
                }
            } else {
                let (partner, below, above) = self.close_edge(ev);
                let edge = self.edge_of(partner);
                let closing = &self.arena[partner];
                chainer.accept(
                    edge,
                    closing.polygon_type,
                    closing.label,
                    closing.in_out,
                    closing.is_inside,
                );
                self.status.remove(partner);
                if let (Some(below), Some(above)) = (below, above) {
                    self.possible_intersection(above, below);
                }
            }
        }
        chainer.finish()
    }

    /// Locate a right event's partner in the status and look up its
    /// neighbours prior to removal.
    fn close_edge(&self, ev: usize) -> (usize, Option<usize>, Option<usize>) {
        let partner = self.arena[ev].pair;
        let at = self.status.index_of(partner).unwrap_or_else(|| {
            panic!(
                "left partner missing from the status: {:?}",
                self.arena[partner]
            )
        });
        (partner, self.status.below(at), self.status.above(at))
    }

    /// A neighbour pair crosses properly unless the edges only meet at
    /// a vertex that is an endpoint of both.
    fn crosses(&self, next: usize, prev: usize) -> bool {
        let next_edge = self.edge_of(next);
        let prev_edge = self.edge_of(prev);
        match prev_edge.intersection(&next_edge) {
            None => false,
            Some(VertexOrEdge::Vertex(v)) => !(next_edge.contains(v) && prev_edge.contains(v)),
            Some(VertexOrEdge::Edge(_)) => true,
        }
    }

    /// Set the inside / in-out flags of a freshly inserted left event
    /// from its immediate lower neighbour.
    fn classify(&mut self, ev: usize, below: Option<usize>) {
        let (in_out, is_inside) = match below {
            None => (false, false),
            Some(below) => {
                let below = &self.arena[below];
                if below.polygon_type == self.arena[ev].polygon_type {
                    (!below.in_out, below.is_inside)
                } else {
                    (below.is_inside, !below.in_out)
                }
            }
        };
        let ev = &mut self.arena[ev];
        ev.in_out = in_out;
        ev.is_inside = is_inside;
        trace!(
            "classified {:?}: in_out={} is_inside={}",
            ev.vertex,
            in_out,
            is_inside
        );
    }

    /// Restore the no-two-active-edges-properly-cross invariant for a
    /// neighbour pair, `prev` directly below `next`.
    ///
    /// Returns the intersection geometry when the edges meet in more
    /// than a shared endpoint; `None` is the benign outcome (no
    /// contact, or contact the status tolerates).
    fn possible_intersection(&mut self, next: usize, prev: usize) -> Option<VertexOrEdge<T>> {
        let next_edge = self.edge_of(next);
        let prev_edge = self.edge_of(prev);
        let x = prev_edge.intersection(&next_edge)?;
        match x {
            VertexOrEdge::Vertex(v) => {
                let on_next = next_edge.contains(v);
                let on_prev = prev_edge.contains(v);
                if on_next && on_prev {
                    // A shared endpoint; such meetings are allowed.
                    return None;
                }
                debug!(
                    "splitting at {:?}: {:?} x {:?}",
                    v, prev_edge, next_edge
                );
                if !on_next {
                    self.update_pair_vertex(next, v);
                }
                if !on_prev {
                    self.update_pair_vertex(prev, v);
                }
                Some(VertexOrEdge::Vertex(v))
            }
            VertexOrEdge::Edge(overlap) => Some(self.resolve_overlap(next, prev, overlap)),
        }
    }

    /// Collinear overlap: the five alignments of the two edges. The
    /// status tie-break guarantees `prev`'s left endpoint is not after
    /// `next`'s, which is what makes the case split exhaustive.
    fn resolve_overlap(&mut self, next: usize, prev: usize, overlap: Edge<T>) -> VertexOrEdge<T> {
        let p0 = self.arena[prev].vertex;
        let p1 = self.arena[self.arena[prev].pair].vertex;
        let n0 = self.arena[next].vertex;
        let n1 = self.arena[self.arena[next].pair].vertex;
        debug!(
            "overlap {:?}: ({:?}, {:?}) on ({:?}, {:?})",
            overlap, p0, p1, n0, n1
        );

        if p0 == n0 && p1 == n1 {
            // The edges coincide: one copy is muted, the other records
            // whether the two boundaries transition alike.
            self.arena[next].label = Label::NoContributing;
            self.arena[prev].label = if self.arena[next].in_out == self.arena[prev].in_out {
                Label::SameTransition
            } else {
                Label::DifferentTransition
            };
        } else if p0 == n0 {
            // Shared start: trim the longer edge at the shorter's end.
            // The trimmed pair coincides from the current position and
            // is never re-tested, so it is labelled as in the equal
            // case right here.
            if p1 < n1 {
                self.update_pair_vertex(next, p1);
            } else {
                self.update_pair_vertex(prev, n1);
            }
            self.arena[next].label = Label::NoContributing;
            self.arena[prev].label = if self.arena[next].in_out == self.arena[prev].in_out {
                Label::SameTransition
            } else {
                Label::DifferentTransition
            };
        } else if p0 < n0 && n0 < p1 {
            if p1 == n1 {
                // Shared end: `next` is a suffix of `prev`.
                self.update_pair_vertex(prev, n0);
            } else if p1 < n1 {
                // Straddle: each edge keeps its leading part.
                self.update_pair_vertex(prev, n0);
                self.update_pair_vertex(next, p1);
            } else {
                // `prev` strictly contains `next`.
                self.arena[next].label = Label::NoContributing;
                let middle = self.update_pair_vertex(prev, n0);
                self.update_pair_vertex(middle, n1);
            }
        } else {
            panic!(
                "collinear overlap outside the split protocol: prev={:?} next={:?}",
                self.arena[prev], self.arena[next]
            );
        }
        VertexOrEdge::Edge(overlap)
    }

    /// Shrink the edge of `ev` to end at `v` and spawn a fresh event
    /// pair for the remainder `v .. old`. Still-queued events whose
    /// sort keys changed are re-keyed in place; the original pair must
    /// be queued, `ev` itself may be (a left event spawned by an
    /// earlier split at the current point). Returns the fresh left
    /// event's key.
    fn update_pair_vertex(&mut self, ev: usize, v: Vertex<T>) -> usize {
        let pair = self.arena[ev].pair;
        let old = self.arena[pair].vertex;
        debug_assert!(
            self.arena[ev].vertex < v && v < old,
            "split vertex {:?} outside the open span {:?}..{:?}",
            v,
            self.arena[ev].vertex,
            old
        );
        trace!("shrinking ({:?}, {:?}) to end at {:?}", self.arena[ev].vertex, old, v);

        let polygon_type = self.arena[ev].polygon_type;
        let fresh_left = self.arena.insert(SweepEvent::new(v, true, polygon_type));
        let fresh_right = self.arena.insert(SweepEvent::new(old, false, polygon_type));
        self.arena[fresh_left].pair = fresh_right;
        self.arena[fresh_right].pair = fresh_left;

        self.arena[pair].vertex = v;
        let at = self.queue.index_of(pair).unwrap_or_else(|| {
            panic!(
                "re-key of an absent queue element: {:?}",
                self.arena[pair]
            )
        });
        self.queue.update_at(at, &self.arena);
        // A queued left event's own position depends on its pair.
        if let Some(at) = self.queue.index_of(ev) {
            self.queue.update_at(at, &self.arena);
        }

        self.queue.push(fresh_left, &self.arena);
        self.queue.push(fresh_right, &self.arena);
        fresh_left
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> &EventArena<T> {
        &self.arena
    }
}

/// Append an intersection geometry unless it repeats the previous one:
/// the containment overlap emits its trailing segment twice on
/// consecutive resolutions.
fn record<T: GeoFloat>(found: &mut Vec<VertexOrEdge<T>>, x: VertexOrEdge<T>) {
    if found.last() != Some(&x) {
        found.push(x);
    }
}
