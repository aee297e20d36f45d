use std::cmp::Ordering;

/// Ordered list that stays valid while it is being traversed
///
/// Removing during a traversal only empties the slot, so indices of the other
/// entries never shift under the traversal; [ObjectList::clean] compacts the
/// empty slots once nobody is iterating. Moves requested during a traversal
/// are queued and applied, in order, when the outermost traversal ends.
#[derive(Debug, Clone)]
pub struct ObjectList<T> {
    slots: Vec<Option<T>>,
    count: usize,
    dirty: bool,
    unsorted: bool,
    iterating: usize,
    pending_moves: Vec<(T, T)>,
}

impl<T> Default for ObjectList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
            dirty: false,
            unsorted: false,
            iterating: 0,
            pending_moves: Vec::new(),
        }
    }
}

impl<T: PartialEq + Clone> ObjectList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_iterating(&self) -> bool {
        self.iterating > 0
    }

    pub fn add(&mut self, object: T) {
        self.slots.push(Some(object));
        self.count += 1;
        self.unsorted = true;
    }

    /// Returns `false` when `object` is not in the list
    pub fn remove(&mut self, object: &T) -> bool {
        let Some(index) = self.index_of(object) else {
            return false;
        };

        if self.iterating > 0 {
            self.slots[index] = None;
            self.dirty = true;
        } else {
            self.slots.remove(index);
        }
        self.count -= 1;
        true
    }

    pub fn contains(&self, object: &T) -> bool {
        self.index_of(object).is_some()
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// The `index`-th live entry, empty slots are not counted
    pub fn at(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    /// Visits every live entry in order until `callback` returns `false`
    pub fn each(&mut self, mut callback: impl FnMut(&T) -> bool) {
        self.traverse(|_, object| callback(object));
    }

    /// Like [ObjectList::each], but the callback may add, remove or move
    /// entries of the list while it runs
    pub fn traverse(&mut self, mut callback: impl FnMut(&mut Self, &T) -> bool) {
        self.begin_traversal();
        let mut index = 0;
        while index < self.slot_count() {
            if let Some(object) = self.slot(index).cloned() {
                if !callback(self, &object) {
                    break;
                }
            }
            index += 1;
        }
        self.end_traversal();
    }

    pub fn map<U>(&self, callback: impl FnMut(&T) -> U) -> Vec<U> {
        self.iter().map(callback).collect()
    }

    /// Stable insertion sort of the live entries, only runs when an entry was
    /// added since the last sort
    pub fn sort(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        if !self.unsorted || self.iterating > 0 {
            return;
        }

        let live: Vec<usize> = (0..self.slots.len())
            .filter(|index| self.slots[*index].is_some())
            .collect();

        for i in 1..live.len() {
            let mut j = i;
            while j > 0 {
                let (a, b) = (live[j - 1], live[j]);
                let ordering = match (&self.slots[a], &self.slots[b]) {
                    (Some(a), Some(b)) => compare(a, b),
                    _ => Ordering::Equal,
                };
                if ordering != Ordering::Greater {
                    break;
                }
                self.slots.swap(a, b);
                j -= 1;
            }
        }

        self.unsorted = false;
    }

    /// Forces the next [ObjectList::sort] to run
    pub fn mark_unsorted(&mut self) {
        self.unsorted = true;
    }

    pub fn clear(&mut self) {
        if self.iterating > 0 {
            self.slots.iter_mut().for_each(|slot| *slot = None);
            self.dirty = true;
        } else {
            self.slots.clear();
        }
        self.count = 0;
    }

    /// Drops the slots emptied during traversals
    pub fn clean(&mut self) {
        if self.dirty && self.iterating == 0 {
            self.slots.retain(Option::is_some);
            self.dirty = false;
        }
    }

    /// Moves `object` right after `after`
    pub fn move_after(&mut self, object: T, after: T) {
        if object == after {
            return;
        }
        if self.iterating > 0 {
            self.pending_moves.push((object, after));
            return;
        }

        let (Some(from), Some(_)) = (self.index_of(&object), self.index_of(&after)) else {
            return;
        };
        let moved = self.slots.remove(from);
        if let Some(to) = self.index_of(&after) {
            self.slots.insert(to + 1, moved);
        }
    }

    pub fn begin_traversal(&mut self) {
        self.iterating += 1;
    }

    pub fn end_traversal(&mut self) {
        self.iterating = self.iterating.saturating_sub(1);
        if self.iterating == 0 {
            for (object, after) in std::mem::take(&mut self.pending_moves) {
                self.move_after(object, after);
            }
        }
    }

    /// Number of slots, empty ones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    fn index_of(&self, object: &T) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(object))
    }
}
