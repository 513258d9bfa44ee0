use crate::{element::HeapElement, errors::PQueueError};

#[inline]
pub(crate) fn left(i: usize) -> usize {
    i << 1
}

#[inline]
pub(crate) fn right(i: usize) -> usize {
    (i << 1) + 1
}

#[inline]
pub(crate) fn parent(i: usize) -> usize {
    i >> 1
}

/// An array backed max-heap that can remove or re-prioritise any member in
/// logarithmic time.
///
/// Slots are numbered from 1. Slot 0 is reserved, so slot `i` is stored at
/// `items[i - 1]`, its children are `2i` and `2i + 1` and its parent `i / 2`.
/// Every rearrangement writes the new slot back into the element through
/// [`HeapElement::set_position`].
///
/// The queue holds handles, never the elements themselves. Dropping the queue
/// releases its storage and its handles only.
pub struct PQueue<H: HeapElement> {
    items: Vec<H>,
    capacity: usize,
    step: usize,
}

impl<H: HeapElement> PQueue<H> {
    /// Create a queue with room for `n` elements before it has to grow.
    ///
    /// `n + 1` slots are accounted for (slot 0 included) and the same amount
    /// is used as the growth step.
    pub fn init(n: usize) -> Result<PQueue<H>, PQueueError> {
        let mut items = Vec::new();
        items.try_reserve_exact(n)?;
        log::trace!("initialised queue with {} slots", n + 1);
        Ok(PQueue {
            items,
            capacity: n + 1,
            step: n + 1,
        })
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn growth_step(&self) -> usize {
        self.step
    }

    /// Drop every handle, keeping the allocation.
    pub fn clear(&mut self) {
        for item in self.items.iter_mut() {
            item.set_position(0);
        }
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.items.iter()
    }

    /// Insert an element. On allocation failure the queue is unchanged.
    pub fn insert(&mut self, item: H) -> Result<(), PQueueError> {
        let count = self.items.len() + 1;
        if count >= self.capacity {
            self.items.try_reserve_exact(self.step)?;
            self.capacity += self.step;
            log::debug!(
                "grew queue storage by {} to {} slots",
                self.step,
                self.capacity
            );
        }
        self.items.push(item);
        self.bubble_up(count);
        Ok(())
    }

    /// The highest priority element, if any.
    pub fn peek(&self) -> Option<&H> {
        self.items.first()
    }

    /// Remove and return the highest priority element. Its position is reset
    /// to 0, so it no longer passes for a member.
    pub fn pop(&mut self) -> Option<H> {
        if self.items.is_empty() {
            return None;
        }
        let mut head = self.items.swap_remove(0);
        head.set_position(0);
        if !self.items.is_empty() {
            self.items[0].set_position(1);
            self.percolate_down(1);
        }
        Some(head)
    }

    /// Remove `item` from wherever it sits, returning the queue's handle to it.
    ///
    /// `item` must be a member of this queue. Only the recorded position is
    /// consulted, so a position outside the occupied slots is reported as
    /// [`PQueueError::NotMember`]. Handles leaving through `pop`, `remove` or
    /// `clear` get position 0 and are rejected the same way.
    pub fn remove(&mut self, item: &H) -> Result<H, PQueueError> {
        let posn = self.member_position(item)?;
        let removed_pri = self.items[posn - 1].priority();
        let mut removed = self.items.swap_remove(posn - 1);
        removed.set_position(0);
        if posn <= self.items.len() {
            self.items[posn - 1].set_position(posn);
            if self.priority_at(posn) > removed_pri {
                self.bubble_up(posn);
            } else {
                self.percolate_down(posn);
            }
        }
        Ok(removed)
    }

    /// Give `item` a new priority and restore heap order around it.
    ///
    /// The priority is written through the handle held in `item`'s slot, which
    /// for shared handles is the caller's own element. Membership is checked
    /// the same way as for [`remove`](PQueue::remove).
    pub fn change_priority(
        &mut self,
        new_priority: H::Priority,
        item: &H,
    ) -> Result<(), PQueueError> {
        let posn = self.member_position(item)?;
        let old_priority = self.items[posn - 1].priority();
        self.items[posn - 1].set_priority(new_priority);
        if new_priority > old_priority {
            self.bubble_up(posn);
        } else {
            self.percolate_down(posn);
        }
        Ok(())
    }

    /// True when every slot's priority is at least that of its children.
    pub fn is_valid(&self) -> bool {
        (2..=self.items.len()).all(|i| !(self.priority_at(parent(i)) < self.priority_at(i)))
    }

    /// True when every element's recorded position is the slot it occupies.
    pub fn positions_valid(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .all(|(idx, item)| item.position() == idx + 1)
    }

    pub(crate) fn priority_at(&self, i: usize) -> H::Priority {
        self.items[i - 1].priority()
    }

    pub(crate) fn element_at(&self, i: usize) -> &H {
        &self.items[i - 1]
    }

    /// The child of `i` with the greater priority, preferring the left child
    /// on ties, or `None` for a leaf.
    pub(crate) fn max_child(&self, i: usize) -> Option<usize> {
        let n = self.items.len();
        let mut c = left(i);
        if c > n {
            return None;
        }
        if c < n && self.priority_at(c + 1) > self.priority_at(c) {
            c += 1;
        }
        Some(c)
    }

    fn member_position(&self, item: &H) -> Result<usize, PQueueError> {
        let posn = item.position();
        if posn == 0 || posn > self.items.len() {
            return Err(PQueueError::NotMember(posn, self.items.len()));
        }
        Ok(posn)
    }

    fn bubble_up(&mut self, i: usize) {
        let mut i = i;
        let moving = self.priority_at(i);
        while i > 1 {
            let p = parent(i);
            if self.priority_at(p) < moving {
                self.items.swap(i - 1, p - 1);
                self.items[i - 1].set_position(i);
                i = p;
            } else {
                break;
            }
        }
        self.items[i - 1].set_position(i);
    }

    fn percolate_down(&mut self, i: usize) {
        let mut i = i;
        let moving = self.priority_at(i);
        while let Some(c) = self.max_child(i) {
            if moving < self.priority_at(c) {
                self.items.swap(i - 1, c - 1);
                self.items[i - 1].set_position(i);
                i = c;
            } else {
                break;
            }
        }
        self.items[i - 1].set_position(i);
    }

    /// Wrap elements already in heap order whose positions match their slots.
    pub(crate) fn from_heap_ordered(items: Vec<H>) -> PQueue<H> {
        let capacity = items.capacity() + 1;
        PQueue {
            items,
            capacity,
            step: capacity,
        }
    }
}

impl<H: HeapElement> From<Vec<H>> for PQueue<H> {
    fn from(value: Vec<H>) -> Self {
        let mut q = PQueue::from_heap_ordered(value);
        let n = q.items.len();
        for i in 1..=n {
            q.items[i - 1].set_position(i);
        }
        for i in 2..=n {
            q.bubble_up(i);
        }
        q
    }
}
