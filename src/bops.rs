use geo::GeoFloat;
use log::debug;

use crate::events::PolygonType;
use crate::polygon::Polygon;
use crate::sweep::SweepCore;

/// The boolean operation applied to a subject and a clip polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Intersection,
    Union,
    Difference,
}

/// Overlay two simple polygons.
///
/// Trivial inputs never reach the sweep: an empty operand and
/// non-intersecting operands both have closed-form results. Note that
/// the intersection of disjoint (or empty) inputs is empty.
pub(crate) fn compute<T: GeoFloat>(
    subject: Polygon<T>,
    clip: Polygon<T>,
    op: BooleanOp,
) -> Vec<Polygon<T>> {
    if subject.is_empty() || clip.is_empty() {
        debug!("empty operand short-circuit for {:?}", op);
        return match op {
            BooleanOp::Intersection => vec![],
            BooleanOp::Union => [subject, clip]
                .into_iter()
                .filter(|polygon| !polygon.is_empty())
                .collect(),
            BooleanOp::Difference => {
                if subject.is_empty() {
                    vec![]
                } else {
                    vec![subject]
                }
            }
        };
    }
    if !subject.intersects(&clip) {
        debug!("disjoint operand short-circuit for {:?}", op);
        return match op {
            BooleanOp::Intersection => vec![],
            BooleanOp::Union => vec![subject, clip],
            BooleanOp::Difference => vec![subject],
        };
    }

    let mut core = SweepCore::with_capacity(subject.coords().len() + clip.coords().len());
    for edge in subject.edges() {
        core.add_edge(edge, Some(PolygonType::Subject));
    }
    for edge in clip.edges() {
        core.add_edge(edge, Some(PolygonType::Clip));
    }
    core.overlay(op)
}
