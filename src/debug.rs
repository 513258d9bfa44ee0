//! Inspection helpers layered on the public queue operations.

use std::io::Write;

use crate::{
    element::HeapElement,
    heap::{PQueue, left, parent, right},
};

/// A stand-in for a queued element inside a shadow queue.
///
/// It caches the priority and keeps its own position, so rearranging the
/// shadow never writes to the element it refers to.
struct Snapshot<'a, H: HeapElement> {
    item: &'a H,
    priority: <H as HeapElement>::Priority,
    position: usize,
}

impl<'a, H: HeapElement> HeapElement for Snapshot<'a, H> {
    type Priority = H::Priority;

    fn priority(&self) -> Self::Priority {
        self.priority
    }

    fn set_priority(&mut self, priority: Self::Priority) {
        self.priority = priority;
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Write the queued elements in descending priority order.
///
/// The queue and its elements are left untouched.
pub fn print<H, W, F>(q: &PQueue<H>, out: &mut W, mut print_entry: F) -> std::io::Result<()>
where
    H: HeapElement,
    W: Write,
    F: FnMut(&mut W, &H) -> std::io::Result<()>,
{
    let items: Vec<Snapshot<'_, H>> = q
        .iter()
        .enumerate()
        .map(|(idx, item)| Snapshot {
            item,
            priority: item.priority(),
            position: idx + 1,
        })
        .collect();
    let mut dup = PQueue::from_heap_ordered(items);
    while let Some(s) = dup.pop() {
        print_entry(out, s.item)?;
    }
    Ok(())
}

/// Write one row per occupied slot with its tree bookkeeping, followed by the
/// element itself. A `maxchild` of 0 marks a leaf.
pub fn dump<H, W, F>(q: &PQueue<H>, out: &mut W, mut print_entry: F) -> std::io::Result<()>
where
    H: HeapElement,
    W: Write,
    F: FnMut(&mut W, &H) -> std::io::Result<()>,
{
    writeln!(out, "posn\tleft\tright\tparent\tmaxchild\t...")?;
    for i in 1..=q.size() {
        write!(
            out,
            "{}\t{}\t{}\t{}\t{}\t",
            i,
            left(i),
            right(i),
            parent(i),
            q.max_child(i).unwrap_or(0)
        )?;
        print_entry(out, q.element_at(i))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::element::tests::Node;

    use super::*;

    fn print_node<W: Write>(out: &mut W, n: &Rc<RefCell<Node>>) -> std::io::Result<()> {
        let n = n.borrow();
        writeln!(out, "{} [{}]", n.pri, n.val)
    }

    fn sample() -> (Vec<Rc<RefCell<Node>>>, PQueue<Rc<RefCell<Node>>>) {
        let ns: Vec<Rc<RefCell<Node>>> = [5, 4, 2, 6, 1]
            .iter()
            .map(|p| Node::shared(*p, -*p))
            .collect();
        let mut q = PQueue::init(10).unwrap();
        for n in ns.iter() {
            q.insert(n.clone()).unwrap();
        }
        (ns, q)
    }

    #[test]
    fn print_in_priority_order() {
        let (ns, q) = sample();
        let before: Vec<Node> = ns.iter().map(|n| n.borrow().clone()).collect();

        let mut out = Vec::new();
        print(&q, &mut out, print_node).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "6 [-6]\n5 [-5]\n4 [-4]\n2 [-2]\n1 [-1]\n");

        let after: Vec<Node> = ns.iter().map(|n| n.borrow().clone()).collect();
        assert_eq!(before, after);
        assert_eq!(q.size(), 5);
        assert!(q.is_valid() && q.positions_valid());
    }

    #[test]
    fn print_empty() {
        let q: PQueue<Rc<RefCell<Node>>> = PQueue::init(1).unwrap();
        let mut out: Vec<u8> = Vec::new();
        print(&q, &mut out, print_node).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn dump_three() {
        let ns: Vec<Rc<RefCell<Node>>> =
            [3, 2, 1].iter().map(|p| Node::shared(*p, 0)).collect();
        let mut q = PQueue::init(3).unwrap();
        for n in ns.iter() {
            q.insert(n.clone()).unwrap();
        }
        let mut out = Vec::new();
        dump(&q, &mut out, print_node).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "posn\tleft\tright\tparent\tmaxchild\t...");
        assert_eq!(lines[1], "1\t2\t3\t0\t2\t3 [0]");
        assert_eq!(lines[2], "2\t4\t5\t1\t0\t2 [0]");
        assert_eq!(lines[3], "3\t6\t7\t1\t0\t1 [0]");
        assert_eq!(lines.len(), 4);
    }
}
