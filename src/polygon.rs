use geo::GeoFloat;
use geo_types::Coordinate;

use crate::geom::Edge;

/// A simple polygon: one closed ring of coordinates.
///
/// The ring is stored open; the closing segment back to the first
/// coordinate is implicit. Input polygons carry no holes; a boolean
/// overlay encodes holes in its result as separate rings of opposite
/// orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<T: GeoFloat> {
    ring: Vec<Coordinate<T>>,
}

impl<T: GeoFloat> Polygon<T> {
    /// Create a polygon from a ring of coordinates, given open or
    /// closed (a repeated last coordinate is dropped).
    pub fn new(mut ring: Vec<Coordinate<T>>) -> Self {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        Polygon { ring }
    }

    /// The polygon with no vertices.
    pub fn empty() -> Self {
        Polygon { ring: Vec::new() }
    }

    /// The open ring.
    pub fn coords(&self) -> &[Coordinate<T>] {
        &self.ring
    }

    /// A ring with fewer than three vertices encloses nothing.
    pub fn is_empty(&self) -> bool {
        self.ring.len() < 3
    }

    /// The boundary segments, in ring order. Zero-length segments
    /// (repeated coordinates) are skipped.
    pub fn edges(&self) -> impl Iterator<Item = Edge<T>> + '_ {
        let n = self.ring.len();
        (0..n).filter_map(move |i| {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            (a != b).then(|| Edge::new(a, b))
        })
    }

    /// Shoelace area: positive for a counter-clockwise ring, negative
    /// for a clockwise one.
    pub fn signed_area(&self) -> T {
        let n = self.ring.len();
        let mut twice = T::zero();
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            twice = twice + (a.x * b.y - b.x * a.y);
        }
        twice / (T::one() + T::one())
    }

    /// Even-odd containment test by ray casting to the right.
    pub fn contains(&self, c: Coordinate<T>) -> bool {
        let n = self.ring.len();
        let mut inside = false;
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            if (a.y > c.y) != (b.y > c.y) {
                let x_at = a.x + (c.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if c.x < x_at {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Whether the two polygons share any area or boundary: crossing
    /// boundaries, or one containing the other. Used as the overlay
    /// fast path before committing to a sweep.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_min, a_max) = self.bounding_box();
        let (b_min, b_max) = other.bounding_box();
        if a_max.x < b_min.x || b_max.x < a_min.x || a_max.y < b_min.y || b_max.y < a_min.y {
            return false;
        }
        for ea in self.edges() {
            for eb in other.edges() {
                if ea.intersects(&eb) {
                    return true;
                }
            }
        }
        self.contains(other.ring[0]) || other.contains(self.ring[0])
    }

    fn bounding_box(&self) -> (Coordinate<T>, Coordinate<T>) {
        let mut min = self.ring[0];
        let mut max = self.ring[0];
        for c in &self.ring[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        (min, max)
    }
}

impl<T: GeoFloat> From<Vec<(T, T)>> for Polygon<T> {
    fn from(ring: Vec<(T, T)>) -> Self {
        Polygon::new(ring.into_iter().map(Coordinate::from).collect())
    }
}
