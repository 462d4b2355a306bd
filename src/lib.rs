//! Plane-sweep algorithms over line segments in the plane: crossing
//! detection, intersection enumeration, and boolean overlay of simple
//! polygons.
//!
//! One event-ordered sweep drives all three entry points. The sweep
//! keeps a vertically ordered status of active edges, splits edges at
//! the intersections it discovers, and (in overlay mode) labels each
//! edge with in/out and inside flags that a post-pass chains into
//! result polygons.
//!
//! ```
//! use geo_overlay::{sweep_of_edges, sweep_of_polygons, BooleanOp, Edge, Polygon};
//!
//! let edges = vec![
//!     Edge::new((0., 0.), (10., 10.)),
//!     Edge::new((0., 10.), (10., 0.)),
//! ];
//! assert!(sweep_of_edges(edges).has_intersection());
//!
//! let subject = Polygon::from(vec![(0., 0.), (10., 0.), (10., 10.), (0., 10.)]);
//! let clip = Polygon::from(vec![(5., 5.), (15., 5.), (15., 15.), (5., 15.)]);
//! let result = sweep_of_polygons(subject, clip).compute_boolean(BooleanOp::Intersection);
//! assert_eq!(result.len(), 1);
//! ```

mod bops;
mod chainer;
mod events;
mod geom;
mod polygon;
mod queue;
mod status;
mod sweep;

pub use bops::BooleanOp;
pub use geom::{Edge, Vertex, VertexOrEdge};
pub use polygon::Polygon;

use geo::GeoFloat;
use sweep::SweepCore;

/// Prepare a sweep over a bag of edges.
pub fn sweep_of_edges<T, I>(edges: I) -> EdgeSweep<T>
where
    T: GeoFloat,
    I: IntoIterator<Item = Edge<T>>,
{
    let edges = edges.into_iter();
    let mut core = SweepCore::with_capacity(edges.size_hint().0);
    for edge in edges {
        core.add_edge(edge, None);
    }
    EdgeSweep { core }
}

/// A sweep over loose edges, answering the crossing questions.
pub struct EdgeSweep<T: GeoFloat> {
    core: SweepCore<T>,
}

impl<T: GeoFloat> EdgeSweep<T> {
    /// Do any two edges cross properly? Meetings at a vertex shared by
    /// both edges do not count.
    pub fn has_intersection(mut self) -> bool {
        self.core.find_intersection()
    }

    /// Every proper intersection among the edges: crossing points and
    /// collinear shared sub-segments, each reported once.
    pub fn get_intersections(mut self) -> Vec<VertexOrEdge<T>> {
        self.core.collect_intersections()
    }
}

/// Prepare a boolean overlay of two simple polygons.
pub fn sweep_of_polygons<T: GeoFloat>(subject: Polygon<T>, clip: Polygon<T>) -> PolygonSweep<T> {
    PolygonSweep { subject, clip }
}

/// A pending overlay of a subject and a clip polygon.
pub struct PolygonSweep<T: GeoFloat> {
    subject: Polygon<T>,
    clip: Polygon<T>,
}

impl<T: GeoFloat> PolygonSweep<T> {
    /// Compute the requested boolean of subject and clip as a list of
    /// simple rings; holes come out with orientation opposite to their
    /// shell.
    pub fn compute_boolean(self, op: BooleanOp) -> Vec<Polygon<T>> {
        bops::compute(self.subject, self.clip, op)
    }
}
