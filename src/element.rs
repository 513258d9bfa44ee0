use std::{cell::RefCell, rc::Rc};

/// An element of a [`PQueue`](crate::heap::PQueue). The position field belongs
/// to the queue and must not be changed by anyone else while it is queued.
pub trait HeapElement {
    type Priority: PartialOrd + Copy;

    fn priority(&self) -> Self::Priority;

    fn set_priority(&mut self, priority: Self::Priority);

    fn position(&self) -> usize;

    fn set_position(&mut self, position: usize);
}

impl<T: HeapElement> HeapElement for Rc<RefCell<T>> {
    type Priority = T::Priority;

    fn priority(&self) -> Self::Priority {
        self.borrow().priority()
    }

    fn set_priority(&mut self, priority: Self::Priority) {
        self.borrow_mut().set_priority(priority);
    }

    fn position(&self) -> usize {
        self.borrow().position()
    }

    fn set_position(&mut self, position: usize) {
        self.borrow_mut().set_position(position);
    }
}

impl<'a, T: HeapElement> HeapElement for &'a RefCell<T> {
    type Priority = T::Priority;

    fn priority(&self) -> Self::Priority {
        self.borrow().priority()
    }

    fn set_priority(&mut self, priority: Self::Priority) {
        self.borrow_mut().set_priority(priority);
    }

    fn position(&self) -> usize {
        self.borrow().position()
    }

    fn set_position(&mut self, position: usize) {
        self.borrow_mut().set_position(position);
    }
}
