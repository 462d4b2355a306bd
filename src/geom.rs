use std::cmp::Ordering;

use geo::{
    kernels::{HasKernel, Kernel, Orientation},
    line_intersection::{line_intersection, LineIntersection},
    GeoFloat, Line,
};
use geo_types::Coordinate;

/// Distance within which computed intersection points are snapped onto
/// existing segment endpoints.
///
/// Derived from the scalar's machine epsilon so that the policy scales
/// with the coordinate type instead of assuming `f64`.
pub(crate) fn tolerance<T: GeoFloat>() -> T {
    T::epsilon().sqrt()
}

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `PartialOrd`,
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these;
/// construction asserts both components are finite, which is what
/// keeps the ordering total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex<T: GeoFloat>(pub(crate) Coordinate<T>);

impl<T: GeoFloat> Vertex<T> {
    /// The underlying coordinate.
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }

    pub fn x(&self) -> T {
        self.0.x
    }

    pub fn y(&self) -> T {
        self.0.y
    }
}

/// Implement lexicographic ordering by `x` and then by `y` coordinate.
impl<T: GeoFloat> PartialOrd for Vertex<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) => self.0.y.partial_cmp(&other.0.y),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl<T: GeoFloat> Ord for Vertex<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: GeoFloat> Eq for Vertex<T> {}

/// Create from a `Coordinate` while checking the components are finite.
impl<T: GeoFloat> From<Coordinate<T>> for Vertex<T> {
    fn from(pt: Coordinate<T>) -> Self {
        assert!(pt.x.is_finite(), "vertex requires a finite x-coordinate");
        assert!(pt.y.is_finite(), "vertex requires a finite y-coordinate");
        Vertex(pt)
    }
}

impl<T: GeoFloat> From<(T, T)> for Vertex<T> {
    fn from(pt: (T, T)) -> Self {
        Vertex::from(Coordinate::from(pt))
    }
}

/// An input line segment: an unordered pair of distinct vertices,
/// stored with the lexicographically smaller endpoint first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<T: GeoFloat> {
    left: Vertex<T>,
    right: Vertex<T>,
}

impl<T: GeoFloat> Edge<T> {
    /// Create an edge from two distinct endpoints, in either order.
    ///
    /// Panics when the endpoints coincide: a zero-length edge is a
    /// precondition violation.
    pub fn new(a: impl Into<Vertex<T>>, b: impl Into<Vertex<T>>) -> Self {
        let a = a.into();
        let b = b.into();
        assert!(a != b, "edge requires two distinct vertices: {:?}", a);
        if a < b {
            Edge { left: a, right: b }
        } else {
            Edge { left: b, right: a }
        }
    }

    /// The lexicographically smaller endpoint: the one the sweep
    /// encounters first.
    pub fn left(&self) -> Vertex<T> {
        self.left
    }

    /// The lexicographically larger endpoint.
    pub fn right(&self) -> Vertex<T> {
        self.right
    }

    /// Membership in the two-vertex pair.
    pub fn contains(&self, v: Vertex<T>) -> bool {
        v == self.left || v == self.right
    }

    /// Whether the segments meet at all (in a point or a sub-segment).
    pub fn intersects(&self, other: &Edge<T>) -> bool {
        self.intersection(other).is_some()
    }

    /// Intersect two segments.
    ///
    /// A transversal crossing yields a `Vertex`; a collinear overlap
    /// yields the shared sub-segment as an `Edge`, degenerating to a
    /// `Vertex` when the overlap collapses to a point. Parallel or
    /// disjoint segments yield `None`. Classification runs on the
    /// robust orientation kernel, the same predicate the sweep
    /// comparators use; computed points are snapped onto existing
    /// endpoints within [`tolerance`], so results can be compared to
    /// endpoints by plain equality.
    pub fn intersection(&self, other: &Edge<T>) -> Option<VertexOrEdge<T>> {
        let isect = line_intersection(
            Line::new(self.left.0, self.right.0),
            Line::new(other.left.0, other.right.0),
        )?;
        Some(match isect {
            LineIntersection::SinglePoint { intersection, .. } => {
                VertexOrEdge::Vertex(self.snap(other, intersection))
            }
            LineIntersection::Collinear { intersection } => {
                let a = self.snap(other, intersection.start);
                let b = self.snap(other, intersection.end);
                if a == b {
                    VertexOrEdge::Vertex(a)
                } else if a < b {
                    VertexOrEdge::Edge(Edge { left: a, right: b })
                } else {
                    VertexOrEdge::Edge(Edge { left: b, right: a })
                }
            }
        })
    }

    /// Round a computed point onto the nearest endpoint of either edge
    /// when within tolerance.
    fn snap(&self, other: &Edge<T>, at: Coordinate<T>) -> Vertex<T> {
        let tol = tolerance::<T>();
        let tol2 = tol * tol;
        for endpoint in [self.left, self.right, other.left, other.right] {
            let dx = at.x - endpoint.0.x;
            let dy = at.y - endpoint.0.y;
            if dx * dx + dy * dy < tol2 {
                return endpoint;
            }
        }
        Vertex::from(at)
    }
}

/// The polymorphic result of intersecting two edges: a single crossing
/// point or a shared sub-segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexOrEdge<T: GeoFloat> {
    Vertex(Vertex<T>),
    Edge(Edge<T>),
}

/// Robust orientation of the triangle `(a, b, c)`.
pub(crate) fn orient2d<T: GeoFloat>(
    a: Coordinate<T>,
    b: Coordinate<T>,
    c: Coordinate<T>,
) -> Orientation {
    <T as HasKernel>::Ker::orient2d(a, b, c)
}

/// Helper to convert orientation-2d into an ordering.
pub(crate) fn orientation_as_ordering(orientation: Orientation) -> Ordering {
    match orientation {
        Orientation::CounterClockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
        Orientation::Collinear => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: (f64, f64), b: (f64, f64)) -> Edge<f64> {
        Edge::new(a, b)
    }

    #[test]
    fn vertex_ordering() {
        let p1 = Vertex::from((0., 0.));
        let p2 = Vertex::from((1., 0.));
        let p3 = Vertex::from((1., 1.));
        let p4 = Vertex::from((1., 1.));

        assert!(p1 < p2);
        assert!(p1 < p3);
        assert!(p2 < p3);
        assert!(p3 <= p4);
    }

    #[test]
    fn edge_normalizes_endpoints() {
        let e = edge((3., 1.), (0., 5.));
        assert_eq!(e.left(), Vertex::from((0., 5.)));
        assert_eq!(e.right(), Vertex::from((3., 1.)));
        assert!(e.contains(Vertex::from((3., 1.))));
        assert!(!e.contains(Vertex::from((1., 1.))));
    }

    #[test]
    #[should_panic(expected = "distinct")]
    fn zero_length_edge_panics() {
        edge((2., 2.), (2., 2.));
    }

    #[test]
    fn transversal_crossing() {
        let a = edge((0., 0.), (10., 10.));
        let b = edge((0., 10.), (10., 0.));
        assert_eq!(
            a.intersection(&b),
            Some(VertexOrEdge::Vertex(Vertex::from((5., 5.))))
        );
        assert!(a.intersects(&b));
    }

    #[test]
    fn meeting_at_shared_endpoint() {
        let a = edge((0., 0.), (5., 5.));
        let b = edge((5., 5.), (10., 0.));
        assert_eq!(
            a.intersection(&b),
            Some(VertexOrEdge::Vertex(Vertex::from((5., 5.))))
        );
    }

    #[test]
    fn vertical_crossing() {
        let a = edge((0., 0.), (0., 10.));
        let b = edge((-5., 5.), (5., 5.));
        assert_eq!(
            a.intersection(&b),
            Some(VertexOrEdge::Vertex(Vertex::from((0., 5.))))
        );
    }

    #[test]
    fn collinear_overlap() {
        let a = edge((0., 0.), (10., 0.));
        let b = edge((4., 0.), (14., 0.));
        assert_eq!(
            a.intersection(&b),
            Some(VertexOrEdge::Edge(edge((4., 0.), (10., 0.))))
        );
    }

    #[test]
    fn collinear_touch_is_a_point() {
        let a = edge((0., 0.), (5., 0.));
        let b = edge((5., 0.), (10., 0.));
        assert_eq!(
            a.intersection(&b),
            Some(VertexOrEdge::Vertex(Vertex::from((5., 0.))))
        );
    }

    #[test]
    fn parallel_disjoint() {
        let a = edge((0., 0.), (10., 0.));
        let b = edge((0., 1.), (10., 1.));
        assert_eq!(a.intersection(&b), None);
        let c = edge((11., 0.), (20., 0.));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn near_endpoint_crossing_snaps() {
        let a = edge((0., 0.), (10., 10.));
        let b = edge((5. - 1e-13, 5. + 1e-13), (10., 0.));
        match a.intersection(&b) {
            Some(VertexOrEdge::Vertex(v)) => assert_eq!(v, b.left()),
            other => panic!("expected a snapped vertex, got {:?}", other),
        }
    }
}
