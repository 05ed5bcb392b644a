/// Bounded history of world snapshots driving the time-inversion feature.
///
/// While the simulation runs forward, the current state is pushed here once
/// per frame before stepping. While inverted, snapshots are popped back off
/// and restored, giving an exact reverse playback of previously visited
/// states (up to the frame granularity captured, and no further back than
/// the oldest retained snapshot).
use std::collections::VecDeque;

use rapier2d::na::Vector2;

/// Kinematic record for a single dynamic body at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub angle: f32,
    pub angular_velocity: f32,
}

/// One captured instant: one `BodyState` per live particle, in particle-list
/// order. Restoration pairs records to particles positionally, so the record
/// count is expected to equal the live particle count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub bodies: Vec<BodyState>,
}

impl Snapshot {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bodies: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Fixed-capacity FIFO-evicting deque of snapshots.
///
/// `push` appends at the back and discards the oldest (front) entry once the
/// configured capacity is exceeded. `pop` removes the most recent entry;
/// popping an empty history returns `None`, and the caller is expected to
/// hold the current state (reverse playback freezes at the oldest snapshot
/// rather than failing).
#[derive(Debug)]
pub struct History {
    frames: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity.min(4096)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.frames.pop_back()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: f32) -> Snapshot {
        Snapshot {
            bodies: vec![BodyState {
                position: Vector2::new(tag, 0.0),
                velocity: Vector2::zeros(),
                angle: 0.0,
                angular_velocity: 0.0,
            }],
        }
    }

    fn tag_of(s: &Snapshot) -> f32 {
        s.bodies[0].position.x
    }

    #[test]
    fn push_then_pop_returns_entry_and_empties() {
        let mut h = History::new(8);
        h.push(snap(1.0));
        let s = h.pop().unwrap();
        assert_eq!(tag_of(&s), 1.0);
        assert!(h.is_empty());
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut h = History::new(4);
        assert!(h.pop().is_none());
        h.push(snap(1.0));
        h.pop();
        assert!(h.pop().is_none());
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut h = History::new(5);
        for i in 0..12 {
            h.push(snap(i as f32));
            assert!(h.len() <= 5);
        }
        assert_eq!(h.len(), 5);
        // The 7 oldest are gone; popping yields 11, 10, 9, 8, 7.
        for expect in (7..12).rev() {
            assert_eq!(tag_of(&h.pop().unwrap()), expect as f32);
        }
        assert!(h.is_empty());
    }

    #[test]
    fn capacity_three_scenario() {
        let (a, b, c, d) = (snap(1.0), snap(2.0), snap(3.0), snap(4.0));
        let mut h = History::new(3);
        h.push(a);
        h.push(b);
        h.push(c);
        h.push(d);
        assert_eq!(tag_of(&h.pop().unwrap()), 4.0);
        assert_eq!(h.len(), 2);
        assert_eq!(tag_of(&h.pop().unwrap()), 3.0);
        assert_eq!(tag_of(&h.pop().unwrap()), 2.0);
        assert!(h.pop().is_none());
    }

    #[test]
    fn clear_empties_buffer() {
        let mut h = History::new(3);
        h.push(snap(1.0));
        h.push(snap(2.0));
        h.clear();
        assert!(h.is_empty());
        assert!(h.pop().is_none());
    }
}
