use std::cmp::Ordering;

use geo::{kernels::Orientation, GeoFloat};
use geo_types::Coordinate;
use log::{debug, trace};

use crate::bops::BooleanOp;
use crate::events::{Label, PolygonType};
use crate::geom::{orient2d, orientation_as_ordering, Edge, Vertex};
use crate::polygon::Polygon;

/// Stitches the edges surviving the boolean filter into closed rings.
///
/// Every kept edge becomes an arc directed so that the result interior
/// lies on its left; outer rings then close counter-clockwise and
/// holes clockwise.
pub(crate) struct EventChainer<T: GeoFloat> {
    op: BooleanOp,
    arcs: Vec<Arc<T>>,
}

#[derive(Debug, Clone, Copy)]
struct Arc<T: GeoFloat> {
    from: Vertex<T>,
    to: Vertex<T>,
}

impl<T: GeoFloat> Arc<T> {
    fn direction(&self) -> Coordinate<T> {
        self.to.0 - self.from.0
    }
}

impl<T: GeoFloat> EventChainer<T> {
    pub fn new(op: BooleanOp) -> Self {
        EventChainer {
            op,
            arcs: Vec::new(),
        }
    }

    /// Offer the data of a left event removed from the status. Events
    /// the operation does not select are dropped here; the rest enter
    /// the arc graph.
    pub fn accept(
        &mut self,
        edge: Edge<T>,
        polygon_type: Option<PolygonType>,
        label: Label,
        in_out: bool,
        is_inside: bool,
    ) {
        let keep = match label {
            Label::NoContributing => false,
            Label::SameTransition => {
                matches!(self.op, BooleanOp::Intersection | BooleanOp::Union)
            }
            Label::DifferentTransition => self.op == BooleanOp::Difference,
            Label::Normal => match self.op {
                BooleanOp::Intersection => is_inside,
                BooleanOp::Union => !is_inside,
                BooleanOp::Difference => match polygon_type {
                    Some(PolygonType::Subject) => !is_inside,
                    Some(PolygonType::Clip) => is_inside,
                    None => false,
                },
            },
        };
        if !keep {
            trace!("dropping {:?} ({:?})", edge, label);
            return;
        }

        // A clip edge bounds the difference from the far side of its
        // own interior; everything else keeps its own side.
        let interior_above = match (self.op, polygon_type) {
            (BooleanOp::Difference, Some(PolygonType::Clip)) => in_out,
            _ => !in_out,
        };
        let arc = if interior_above {
            Arc {
                from: edge.left(),
                to: edge.right(),
            }
        } else {
            Arc {
                from: edge.right(),
                to: edge.left(),
            }
        };
        trace!("arc {:?} -> {:?}", arc.from, arc.to);
        self.arcs.push(arc);
    }

    /// Walk the surviving arcs into closed rings.
    ///
    /// Nodes are the distinct arc endpoints; from every unconsumed arc
    /// a walk follows outgoing arcs until it returns to its start,
    /// choosing the sharpest clockwise turn whenever a vertex offers
    /// more than one continuation (a pinch point).
    pub fn finish(self) -> Vec<Polygon<T>> {
        if self.arcs.is_empty() {
            return Vec::new();
        }

        let mut nodes: Vec<Vertex<T>> = self
            .arcs
            .iter()
            .flat_map(|arc| [arc.from, arc.to])
            .collect();
        nodes.sort();
        nodes.dedup();
        let node = |v: Vertex<T>| {
            nodes
                .binary_search(&v)
                .expect("arc endpoint registered as a node")
        };

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (index, arc) in self.arcs.iter().enumerate() {
            outgoing[node(arc.from)].push(index);
        }

        let mut used = vec![false; self.arcs.len()];
        let mut rings = Vec::new();
        for start in 0..self.arcs.len() {
            if used[start] {
                continue;
            }
            let mut ring: Vec<Coordinate<T>> = Vec::new();
            let mut current = start;
            loop {
                used[current] = true;
                let arc = self.arcs[current];
                ring.push(arc.from.0);
                if arc.to == self.arcs[start].from {
                    break;
                }
                let incoming = arc.direction();
                let next = outgoing[node(arc.to)]
                    .iter()
                    .copied()
                    .filter(|&candidate| !used[candidate])
                    .min_by(|&a, &b| {
                        clockwise_turn(incoming, self.arcs[a].direction(), self.arcs[b].direction())
                    });
                current = next.unwrap_or_else(|| {
                    panic!(
                        "surviving edges do not close a ring at {:?}",
                        arc.to
                    )
                });
            }
            if ring.len() < 3 {
                debug!("dropping degenerate ring of {} arcs", ring.len());
                continue;
            }
            rings.push(Polygon::new(ring));
        }
        rings
    }
}

/// Order two candidate directions by the size of the clockwise turn
/// they demand from the incoming direction, sharpest first. Keeps
/// rings simple at pinch vertices, deterministically.
fn clockwise_turn<T: GeoFloat>(
    incoming: Coordinate<T>,
    a: Coordinate<T>,
    b: Coordinate<T>,
) -> Ordering {
    let back = Coordinate {
        x: -incoming.x,
        y: -incoming.y,
    };
    turn_rank(back, a).cmp(&turn_rank(back, b)).then_with(|| {
        let origin = Coordinate {
            x: T::zero(),
            y: T::zero(),
        };
        orientation_as_ordering(orient2d(origin, a, b)).reverse()
    })
}

/// Quadrant of a direction in the clockwise rotation starting at the
/// reference direction: the clockwise half-plane, straight on, the
/// counter-clockwise half-plane, and a full u-turn last.
fn turn_rank<T: GeoFloat>(reference: Coordinate<T>, direction: Coordinate<T>) -> u8 {
    let origin = Coordinate {
        x: T::zero(),
        y: T::zero(),
    };
    match orient2d(origin, reference, direction) {
        Orientation::Clockwise => 0,
        Orientation::CounterClockwise => 2,
        Orientation::Collinear => {
            let along = reference.x * direction.x + reference.y * direction.y;
            if along < T::zero() {
                1
            } else {
                3
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: (f64, f64), b: (f64, f64)) -> Edge<f64> {
        Edge::new(a, b)
    }

    /// A synthetic stream of union survivors: the four sides of a
    /// square, `in_out` mirroring a boundary walked counter-clockwise.
    fn feed_square(chainer: &mut EventChainer<f64>) {
        let sides = [
            (edge((0., 0.), (10., 0.)), false),
            (edge((10., 0.), (10., 10.)), false),
            (edge((0., 10.), (10., 10.)), true),
            (edge((0., 0.), (0., 10.)), true),
        ];
        for (side, in_out) in sides {
            chainer.accept(side, Some(PolygonType::Subject), Label::Normal, in_out, false);
        }
    }

    #[test]
    fn single_ring_closes_counter_clockwise() {
        let mut chainer = EventChainer::new(BooleanOp::Union);
        feed_square(&mut chainer);
        let rings = chainer.finish();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].coords().len(), 4);
        assert!(rings[0].signed_area() > 0.);
    }

    #[test]
    fn unselected_events_are_dropped() {
        let mut chainer = EventChainer::new(BooleanOp::Intersection);
        // Outside the other polygon and unlabelled: not part of an
        // intersection.
        chainer.accept(
            edge((0., 0.), (10., 0.)),
            Some(PolygonType::Subject),
            Label::Normal,
            false,
            false,
        );
        chainer.accept(
            edge((0., 0.), (5., 5.)),
            Some(PolygonType::Clip),
            Label::NoContributing,
            false,
            true,
        );
        assert!(chainer.finish().is_empty());
    }

    #[test]
    fn pinch_vertex_splits_into_two_rings() {
        // Two counter-clockwise triangles meeting only at (5, 5).
        let mut chainer = EventChainer::new(BooleanOp::Union);
        let arcs = [
            (edge((0., 0.), (10., 0.)), false),
            (edge((5., 5.), (10., 0.)), true),
            (edge((0., 0.), (5., 5.)), true),
            (edge((5., 5.), (10., 10.)), false),
            (edge((0., 10.), (10., 10.)), true),
            (edge((0., 10.), (5., 5.)), false),
        ];
        for (side, in_out) in arcs {
            chainer.accept(side, Some(PolygonType::Subject), Label::Normal, in_out, false);
        }
        let rings = chainer.finish();
        assert_eq!(rings.len(), 2);
        for ring in &rings {
            assert_eq!(ring.coords().len(), 3);
            assert!(ring.signed_area() > 0.);
        }
    }

    #[test]
    #[should_panic(expected = "do not close a ring")]
    fn an_open_chain_is_fatal() {
        let mut chainer = EventChainer::new(BooleanOp::Union);
        chainer.accept(
            edge((0., 0.), (10., 0.)),
            Some(PolygonType::Subject),
            Label::Normal,
            false,
            false,
        );
        chainer.finish();
    }
}
