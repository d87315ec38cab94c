/*
Binary min-heap keyed by distance, with decrease-key by node id.

Entries live in a flat array where the children of index i are 2i+1 and 2i+2.
A side index maps each id to the array slots holding entries with that id, so
update_key can find its entry without scanning. When an id appears more than
once, update_key acts on the entry in the lowest slot. Comparisons are strict, so equal distances never swap and
the order of ties depends only on the sequence of operations.
*/

use hashbrown::HashMap;

use crate::error::PathError;
use crate::graph::{Cost, NodeId};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeapEntry {
    pub id: NodeId,
    pub distance: Cost,
}

impl HeapEntry {
    pub fn new(id: NodeId, distance: Cost) -> Self {
        Self { id, distance }
    }
}

#[derive(Debug, Default)]
pub struct MinHeap {
    entries: Vec<HeapEntry>,
    positions: HashMap<NodeId, Vec<usize>>, // id -> slots in `entries`.
}

fn parent_of(index: usize) -> usize {
    (index - 1) / 2
}

impl MinHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn peek(&self) -> Option<&HeapEntry> {
        self.entries.first()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Current distance of the entry for `id`, if it is still in the heap.
    /// With duplicate ids this is the entry in the lowest array slot.
    pub fn distance_of(&self, id: NodeId) -> Option<Cost> {
        self.first_slot(id).map(|index| self.entries[index].distance)
    }

    /// Appends `entry` and bubbles it up. Duplicate ids are accepted.
    pub fn insert(&mut self, entry: HeapEntry) {
        let index = self.entries.len();
        self.entries.push(entry);
        self.positions.entry(entry.id).or_default().push(index);
        self.bubble_up(index);
    }

    /// Removes and returns the entry with the smallest distance.
    pub fn extract_min(&mut self) -> Result<HeapEntry, PathError> {
        let last = match self.entries.len() {
            0 => return Err(PathError::EmptyHeap),
            len => len - 1,
        };
        self.swap(0, last);
        let min = self.entries.pop().ok_or(PathError::EmptyHeap)?;
        if let Some(slots) = self.positions.get_mut(&min.id) {
            slots.retain(|&slot| slot != last);
            if slots.is_empty() {
                self.positions.remove(&min.id);
            }
        }
        if !self.entries.is_empty() {
            self.sink_down(0);
        }
        Ok(min)
    }

    /// Sets the distance of the entry for `id` and restores order by bubbling up.
    ///
    /// Only decreases are supported: the entry never moves towards the leaves, so
    /// raising a key leaves the heap out of order. With duplicate ids the entry in
    /// the lowest array slot is updated. Returns false when `id` is not in the heap.
    pub fn update_key(&mut self, id: NodeId, distance: Cost) -> bool {
        let index = match self.first_slot(id) {
            Some(index) => index,
            None => return false,
        };
        debug_assert!(
            distance <= self.entries[index].distance,
            "update_key can only decrease: {} -> {}",
            self.entries[index].distance,
            distance
        );
        self.entries[index].distance = distance;
        self.bubble_up(index);
        true
    }

    fn bubble_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent_of(index);
            if self.entries[index].distance < self.entries[parent].distance {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sink_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;
            if left < len && self.entries[left].distance < self.entries[smallest].distance {
                smallest = left;
            }
            if right < len && self.entries[right].distance < self.entries[smallest].distance {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn first_slot(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).and_then(|slots| slots.iter().min().copied())
    }

    fn swap(&mut self, a: usize, b: usize) {
        let (id_a, id_b) = (self.entries[a].id, self.entries[b].id);
        self.entries.swap(a, b);
        // Same id on both sides: the set of slots for that id doesn't change.
        if id_a == id_b {
            return;
        }
        self.move_slot(id_a, a, b);
        self.move_slot(id_b, b, a);
    }

    fn move_slot(&mut self, id: NodeId, from: usize, to: usize) {
        if let Some(slot) = self
            .positions
            .get_mut(&id)
            .and_then(|slots| slots.iter_mut().find(|slot| **slot == from))
        {
            *slot = to;
        }
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        let ordered = (1..self.entries.len())
            .all(|i| self.entries[parent_of(i)].distance <= self.entries[i].distance);
        let indexed = self.positions.iter().all(|(&id, slots)| {
            !slots.is_empty()
                && slots
                    .iter()
                    .all(|&index| self.entries.get(index).map(|e| e.id) == Some(id))
        });
        let counted = self.positions.values().map(Vec::len).sum::<usize>() == self.entries.len();
        ordered && indexed && counted
    }
}
