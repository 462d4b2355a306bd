use std::cmp::Ordering;

use geo::GeoFloat;
use slab::Slab;

use crate::geom::{orient2d, orientation_as_ordering, Vertex};

/// Arena holding every event of one sweep. Events are addressed by
/// their slab key and are never removed while the sweep runs, so keys
/// are stable and can serve as pair links.
pub(crate) type EventArena<T> = Slab<SweepEvent<T>>;

/// Which input polygon an overlay edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum PolygonType {
    Subject,
    Clip,
}

/// Overlap labelling for collinear duplicate edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    Normal,
    NoContributing,
    SameTransition,
    DifferentTransition,
}

/// A directed endpoint of an edge.
///
/// Left events open an edge when popped, right events close it. The
/// `pair` link is symmetric: `arena[arena[e].pair].pair == e`. The
/// `in_out` and `is_inside` flags are only meaningful on left events
/// of an overlay sweep, after insertion into the status.
#[derive(Debug, Clone)]
pub(crate) struct SweepEvent<T: GeoFloat> {
    pub vertex: Vertex<T>,
    pub pair: usize,
    pub is_left: bool,
    pub polygon_type: Option<PolygonType>,
    pub label: Label,
    /// Crossing this edge from below exits its owning polygon.
    pub in_out: bool,
    /// The edge lies inside the other polygon.
    pub is_inside: bool,
}

impl<T: GeoFloat> SweepEvent<T> {
    pub fn new(vertex: Vertex<T>, is_left: bool, polygon_type: Option<PolygonType>) -> Self {
        SweepEvent {
            vertex,
            pair: usize::MAX,
            is_left,
            polygon_type,
            label: Label::Normal,
            in_out: false,
            is_inside: false,
        }
    }
}

/// The sweep processing order.
///
/// Events compare by vertex (`x` then `y`); at a shared vertex, right
/// events precede left events so that edges ending there leave the
/// status before new ones join; among events of the same kind the one
/// whose edge's other endpoint lies vertically lower goes first; the
/// remaining ties break on subject-before-clip and then the arena key.
pub(crate) fn event_order<T: GeoFloat>(a: usize, b: usize, arena: &EventArena<T>) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let ea = &arena[a];
    let eb = &arena[b];
    ea.vertex
        .cmp(&eb.vertex)
        .then_with(|| ea.is_left.cmp(&eb.is_left))
        .then_with(|| {
            let pa = arena[ea.pair].vertex;
            let pb = arena[eb.pair].vertex;
            orientation_as_ordering(orient2d(ea.vertex.0, pa.0, pb.0))
        })
        .then_with(|| ea.polygon_type.cmp(&eb.polygon_type))
        .then_with(|| a.cmp(&b))
}
