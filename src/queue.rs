use std::cmp::Ordering;

use geo::GeoFloat;

use crate::events::{event_order, EventArena};

const ABSENT: usize = usize::MAX;

/// Min-priority queue of pending events, keyed by the sweep order.
///
/// A binary heap over arena keys, augmented with a key-indexed handle
/// map so that an element whose sort key just changed (the resolver
/// shrinks the pair vertex of still-queued events) can be re-keyed in
/// place in `O(log n)`. Comparisons read the arena, so every heap
/// operation takes it as an argument.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: Vec<usize>,
    /// Arena key to heap index, `ABSENT` when not queued.
    pos: Vec<usize>,
}

impl EventQueue {
    pub fn with_capacity(events: usize) -> Self {
        EventQueue {
            heap: Vec::with_capacity(events),
            pos: Vec::with_capacity(events),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn push<T: GeoFloat>(&mut self, key: usize, arena: &EventArena<T>) {
        if self.pos.len() <= key {
            self.pos.resize(key + 1, ABSENT);
        }
        debug_assert_eq!(self.pos[key], ABSENT, "event {} queued twice", key);
        let at = self.heap.len();
        self.heap.push(key);
        self.pos[key] = at;
        self.sift_up(at, arena);
    }

    pub fn peek(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    pub fn pop<T: GeoFloat>(&mut self, arena: &EventArena<T>) -> Option<usize> {
        let top = self.peek()?;
        let last = self.heap.pop().expect("heap is non-empty");
        self.pos[top] = ABSENT;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last] = 0;
            self.sift_down(0, arena);
        }
        Some(top)
    }

    /// Current heap index of a queued event.
    pub fn index_of(&self, key: usize) -> Option<usize> {
        self.pos.get(key).copied().filter(|&at| at != ABSENT)
    }

    /// Restore the heap property around an element whose sort key
    /// changed. Re-keying outside the queue is an invariant violation.
    pub fn update_at<T: GeoFloat>(&mut self, at: usize, arena: &EventArena<T>) {
        assert!(
            at < self.heap.len(),
            "re-key of an absent queue element at index {}",
            at
        );
        let at = self.sift_up(at, arena);
        self.sift_down(at, arena);
    }

    fn sift_up<T: GeoFloat>(&mut self, mut at: usize, arena: &EventArena<T>) -> usize {
        while at > 0 {
            let parent = (at - 1) / 2;
            if event_order(self.heap[at], self.heap[parent], arena) == Ordering::Less {
                self.swap(at, parent);
                at = parent;
            } else {
                break;
            }
        }
        at
    }

    fn sift_down<T: GeoFloat>(&mut self, mut at: usize, arena: &EventArena<T>) {
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut smallest = at;
            if left < self.heap.len()
                && event_order(self.heap[left], self.heap[smallest], arena) == Ordering::Less
            {
                smallest = left;
            }
            if right < self.heap.len()
                && event_order(self.heap[right], self.heap[smallest], arena) == Ordering::Less
            {
                smallest = right;
            }
            if smallest == at {
                break;
            }
            self.swap(at, smallest);
            at = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a]] = a;
        self.pos[self.heap[b]] = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::pair_up;
    use crate::geom::Vertex;

    fn drain(queue: &mut EventQueue, arena: &EventArena<f64>) -> Vec<usize> {
        std::iter::from_fn(|| queue.pop(arena)).collect()
    }

    #[test]
    fn pops_in_sweep_order() {
        let mut arena = EventArena::new();
        let (l1, r1) = pair_up(&mut arena, (0., 0.), (1., 0.), None);
        let (l2, r2) = pair_up(&mut arena, (1., 0.), (1., 1.), None);

        let mut queue = EventQueue::with_capacity(4);
        for key in [r2, l2, r1, l1] {
            queue.push(key, &arena);
        }
        // At (1, 0): the right end of the first edge precedes the left
        // end of the second.
        assert_eq!(drain(&mut queue, &arena), vec![l1, r1, l2, r2]);
    }

    #[test]
    fn index_of_tracks_membership() {
        let mut arena = EventArena::new();
        let (l, r) = pair_up(&mut arena, (0., 0.), (1., 1.), None);
        let mut queue = EventQueue::default();
        queue.push(l, &arena);
        queue.push(r, &arena);
        assert!(queue.index_of(l).is_some());
        assert_eq!(queue.pop(&arena), Some(l));
        assert_eq!(queue.index_of(l), None);
        assert!(queue.index_of(r).is_some());
    }

    #[test]
    fn update_at_rekeys_a_mutated_event() {
        let mut arena = EventArena::new();
        let (l1, r1) = pair_up(&mut arena, (0., 0.), (10., 0.), None);
        let (l2, r2) = pair_up(&mut arena, (1., 1.), (2., 1.), None);

        let mut queue = EventQueue::default();
        for key in [l1, r1, l2, r2] {
            queue.push(key, &arena);
        }

        // Shrink the first edge: its right end moves from (10, 0) to
        // (0.5, 0), which must advance it ahead of the second edge.
        arena[r1].vertex = Vertex::from((0.5, 0.));
        let at = queue.index_of(r1).expect("still queued");
        queue.update_at(at, &arena);

        assert_eq!(drain(&mut queue, &arena), vec![l1, r1, l2, r2]);
    }

    #[test]
    #[should_panic(expected = "absent queue element")]
    fn rekey_outside_the_queue_is_fatal() {
        let arena = EventArena::<f64>::new();
        let mut queue = EventQueue::default();
        queue.update_at(0, &arena);
    }
}
