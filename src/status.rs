use std::cmp::Ordering;

use geo::GeoFloat;

use crate::events::{event_order, EventArena};
use crate::geom::{orient2d, orientation_as_ordering};

/// Ordering of two active left events along the sweep line: `a < b`
/// iff the edge of `a` passes strictly below the edge of `b` at the
/// later of the two left endpoints.
///
/// The endpoints of the later-arriving edge are placed against the
/// earlier edge with the orientation kernel; fully collinear pairs
/// fall back to the event order, which keeps the relation total and
/// guarantees that of two overlapping edges the status-lower one is
/// the one whose left event sorts first.
pub(crate) fn vertical_order<T: GeoFloat>(a: usize, b: usize, arena: &EventArena<T>) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let al = arena[a].vertex.0;
    let ar = arena[arena[a].pair].vertex.0;
    let bl = arena[b].vertex.0;
    let br = arena[arena[b].pair].vertex.0;

    let ord = if event_order(a, b, arena) == Ordering::Less {
        orientation_as_ordering(orient2d(al, ar, bl))
            .then_with(|| orientation_as_ordering(orient2d(al, ar, br)))
    } else {
        orientation_as_ordering(orient2d(bl, br, al))
            .reverse()
            .then_with(|| orientation_as_ordering(orient2d(bl, br, ar)).reverse())
    };
    if ord == Ordering::Equal {
        event_order(a, b, arena)
    } else {
        ord
    }
}

/// The ordered sequence of currently active edges, represented by
/// their left events and sorted under [`vertical_order`].
///
/// A sorted list: insertion is a binary search, removal is by
/// identity, neighbours are adjacent indices.
#[derive(Debug, Default)]
pub(crate) struct Status {
    entries: Vec<usize>,
}

impl Status {
    /// Insert an active left event, returning its index.
    pub fn insert<T: GeoFloat>(&mut self, key: usize, arena: &EventArena<T>) -> usize {
        let at = self
            .entries
            .partition_point(|&entry| vertical_order(entry, key, arena) == Ordering::Less);
        self.entries.insert(at, key);
        at
    }

    /// Remove an active left event by identity.
    pub fn remove(&mut self, key: usize) {
        let at = self
            .index_of(key)
            .unwrap_or_else(|| panic!("removal of an event absent from the status: {}", key));
        self.entries.remove(at);
    }

    pub fn index_of(&self, key: usize) -> Option<usize> {
        self.entries.iter().position(|&entry| entry == key)
    }

    /// The neighbour directly below the given index, if any.
    pub fn below(&self, at: usize) -> Option<usize> {
        at.checked_sub(1).map(|below| self.entries[below])
    }

    /// The neighbour directly above the given index, if any.
    pub fn above(&self, at: usize) -> Option<usize> {
        self.entries.get(at + 1).copied()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::pair_up;
    use crate::events::PolygonType;

    #[test]
    fn stacks_by_height_at_the_sweep_line() {
        let mut arena = EventArena::new();
        let (low, _) = pair_up(&mut arena, (0., 0.), (10., 0.), None);
        let (mid, _) = pair_up(&mut arena, (0., 5.), (10., 5.), None);
        let (high, _) = pair_up(&mut arena, (2., 8.), (8., 8.), None);

        let mut status = Status::default();
        assert_eq!(status.insert(mid, &arena), 0);
        assert_eq!(status.insert(low, &arena), 0);
        assert_eq!(status.insert(high, &arena), 2);
        assert_eq!(status.entries(), &[low, mid, high]);

        assert_eq!(status.below(1), Some(low));
        assert_eq!(status.above(1), Some(high));
        assert_eq!(status.below(0), None);
        assert_eq!(status.above(2), None);

        status.remove(mid);
        assert_eq!(status.entries(), &[low, high]);
    }

    #[test]
    fn slanted_edges_order_by_orientation() {
        let mut arena = EventArena::new();
        let (steep, _) = pair_up(&mut arena, (0., 0.), (10., 10.), None);
        let (shallow, _) = pair_up(&mut arena, (1., 1.), (10., 2.), None);

        // At x = 1 the shallow edge starts on the steep one and falls
        // below it.
        assert_eq!(vertical_order(shallow, steep, &arena), Ordering::Less);
        assert_eq!(vertical_order(steep, shallow, &arena), Ordering::Greater);
    }

    #[test]
    fn vertical_edge_sits_above_the_edge_through_its_foot() {
        let mut arena = EventArena::new();
        let (flat, _) = pair_up(&mut arena, (0., 0.), (10., 0.), None);
        let (upright, _) = pair_up(&mut arena, (5., 0.), (5., 7.), None);
        assert_eq!(vertical_order(flat, upright, &arena), Ordering::Less);
    }

    #[test]
    fn collinear_overlap_falls_back_to_event_order() {
        let mut arena = EventArena::new();
        let (clip, _) = pair_up(&mut arena, (0., 0.), (10., 0.), Some(PolygonType::Clip));
        let (subject, _) = pair_up(&mut arena, (0., 0.), (8., 0.), Some(PolygonType::Subject));
        assert_eq!(vertical_order(subject, clip, &arena), Ordering::Less);
        assert_eq!(vertical_order(clip, subject, &arena), Ordering::Greater);
    }

    #[test]
    #[should_panic(expected = "absent from the status")]
    fn removing_an_absent_event_is_fatal() {
        Status::default().remove(3);
    }
}
