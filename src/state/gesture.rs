// Pointer tracking and gesture mode for the zoom/pan canvas.

use super::transform::Vec2;

/// Active pointers in canvas-local coordinates, keyed by pointer id.
/// Insertion-ordered so the first two entries stay the pinch pair.
#[derive(Debug, Clone, Default)]
pub struct PointerSet {
    entries: Vec<(i32, Vec2)>,
}

impl PointerSet {
    pub fn insert(&mut self, id: i32, pos: Vec2) {
        match self.entries.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => entry.1 = pos,
            None => self.entries.push((id, pos)),
        }
    }

    /// Update a tracked pointer; false when the id never went down on us.
    pub fn update(&mut self, id: i32, pos: Vec2) -> bool {
        match self.entries.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => {
                entry.1 = pos;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i32) {
        self.entries.retain(|(pid, _)| *pid != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The two pointers driving a pinch, in the order they went down.
    pub fn pair(&self) -> Option<(Vec2, Vec2)> {
        match self.entries.as_slice() {
            [(_, a), (_, b), ..] => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Gesture mode keyed by active pointer count: one pointer drags, two pinch.
/// A 2→1 transition falls back to Idle; the surviving pointer never resumes
/// the drag, a fresh pointer-down is required.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        start: Vec2,
        offset_start: Vec2,
    },
    Pinching {
        start_dist: f64,
        start_scale: f64,
        mid: Vec2,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_update_remove() {
        let mut set = PointerSet::default();
        assert!(set.is_empty());
        set.insert(7, Vec2::new(1.0, 2.0));
        set.insert(9, Vec2::new(3.0, 4.0));
        assert_eq!(set.len(), 2);
        assert!(set.update(7, Vec2::new(5.0, 6.0)));
        assert!(!set.update(42, Vec2::default()));
        let (a, b) = set.pair().unwrap();
        assert_eq!(a, Vec2::new(5.0, 6.0));
        assert_eq!(b, Vec2::new(3.0, 4.0));
        set.remove(7);
        assert_eq!(set.len(), 1);
        assert!(set.pair().is_none());
    }

    #[test]
    fn pair_keeps_down_order_with_three_pointers() {
        let mut set = PointerSet::default();
        set.insert(1, Vec2::new(1.0, 0.0));
        set.insert(2, Vec2::new(2.0, 0.0));
        set.insert(3, Vec2::new(3.0, 0.0));
        let (a, b) = set.pair().unwrap();
        assert_eq!((a.x, b.x), (1.0, 2.0));
    }
}
