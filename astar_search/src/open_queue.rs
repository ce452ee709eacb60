use std::fmt::Debug;
use std::vec::Vec;

use crate::error::{Operation, QueueError, Violation};
use crate::graph::{Cost, NodeRef};

/// Position of an entry in the backing array of an [`OpenQueue`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct HeapIndex(usize);

impl HeapIndex {
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn new(v: usize) -> Self {
        Self(v)
    }

    #[inline(always)]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Per-node storage the queue reads keys from and reports positions to.
///
/// The queue never owns node state. It reads the estimated total cost `f`
/// through [`estimate`] and writes the new array position of every node it
/// moves through [`set_heap_index`], so that decrease-key and removal find a
/// node without scanning.
///
/// Implementations must return the last value passed to `set_heap_index`
/// from `heap_index`. Nodes the implementation does not know about have no
/// estimate and no index.
///
/// [`estimate`]: QueueSlots::estimate
/// [`set_heap_index`]: QueueSlots::set_heap_index
pub trait QueueSlots {
    /// Current `f` of the node, `None` meaning infinite.
    fn estimate(&self, node: NodeRef) -> Option<Cost>;

    /// Stored position of the node, `None` when the node is not queued.
    fn heap_index(&self, node: NodeRef) -> Option<HeapIndex>;

    fn set_heap_index(&mut self, node: NodeRef, index: Option<HeapIndex>);
}

// Equal estimates fall back to insertion order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
struct Priority {
    estimate: Cost,
    sequence: u64,
}

#[derive(Copy, Clone)]
struct HeapEntry {
    node: NodeRef,
    priority: Priority,
}

/// Binary min-heap of nodes ordered by their estimated total cost.
///
/// Every entry caches the estimate it was queued with, so the queue can
/// check that [`decrease_key`] really lowers a key. Ties are broken by
/// insertion order: of two nodes with equal estimates, the one pushed first
/// is popped first.
///
/// All mutating operations keep the stored [`HeapIndex`] of every queued node
/// equal to its array position.
///
/// # Examples
///
/// ```
/// use astar_search::{EstimateTable, NodeRef, OpenQueue};
///
/// let (a, b, c) = (NodeRef::new(0), NodeRef::new(1), NodeRef::new(2));
/// let mut slots = EstimateTable::new();
/// slots.set_estimate(a, 7);
/// slots.set_estimate(b, 3);
/// slots.set_estimate(c, 5);
///
/// let mut queue = OpenQueue::new();
/// for node in [a, b, c] {
///     queue.push(node, &mut slots).unwrap();
/// }
/// assert_eq!(queue.peek(), Some((b, 3)));
///
/// // Lower the key in place, then tell the queue about it.
/// slots.set_estimate(a, 1);
/// queue.decrease_key(a, &mut slots).unwrap();
/// assert_eq!(queue.pop_min(&mut slots), Ok(a));
///
/// assert_eq!(queue.remove(c, &mut slots), Ok(5));
/// assert!(!queue.contains(c, &slots));
/// assert_eq!(queue.pop_min(&mut slots), Ok(b));
/// assert!(queue.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct OpenQueue {
    data: Vec<HeapEntry>,
    next_sequence: u64,
}

#[inline(always)]
fn violation(node: NodeRef, operation: Operation, violation: Violation) -> QueueError {
    QueueError::InvariantViolation {
        node,
        operation,
        violation,
    }
}

impl OpenQueue {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            next_sequence: 0,
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    #[inline(always)]
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Node with the lowest estimate and the estimate it is queued with.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline(always)]
    pub fn peek(&self) -> Option<(NodeRef, Cost)> {
        self.data
            .first()
            .map(|entry| (entry.node, entry.priority.estimate))
    }

    /// Inserts the node with its current estimate.
    ///
    /// Fails with an invariant violation if the node is already queued,
    /// its stored index is stale, or it has no estimate.
    ///
    /// ### Time complexity
    ///
    /// ***O(log n)*** swaps and position updates.
    pub fn push<S: QueueSlots + ?Sized>(
        &mut self,
        node: NodeRef,
        slots: &mut S,
    ) -> Result<(), QueueError> {
        if let Some(position) = self.locate(node, &*slots, Operation::Push)? {
            return Err(violation(
                node,
                Operation::Push,
                Violation::AlreadyQueued(position.0),
            ));
        }
        let estimate = slots
            .estimate(node)
            .ok_or_else(|| violation(node, Operation::Push, Violation::MissingEstimate))?;

        let priority = Priority {
            estimate,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.data.push(HeapEntry { node, priority });
        self.heapify_up(HeapIndex(self.data.len() - 1), |moved, index| {
            slots.set_heap_index(moved, Some(index))
        });
        Ok(())
    }

    /// Removes and returns the node with the lowest estimate.
    ///
    /// ### Time complexity
    ///
    /// Cost of pop is always ***O(log n)***
    pub fn pop_min<S: QueueSlots + ?Sized>(
        &mut self,
        slots: &mut S,
    ) -> Result<NodeRef, QueueError> {
        let root = match self.data.first() {
            Some(entry) => entry.node,
            None => return Err(QueueError::Empty),
        };
        if slots.heap_index(root) != Some(HeapIndex(0)) {
            return Err(violation(
                root,
                Operation::PopMin,
                Violation::UntrackedMember(0),
            ));
        }
        let removed = self.remove_at(HeapIndex(0), slots);
        Ok(removed.node)
    }

    /// Restores the order after the caller lowered the estimate of a queued
    /// node in place.
    ///
    /// Calling this without actually lowering the estimate is a contract
    /// failure and is reported as an invariant violation.
    ///
    /// ### Time complexity
    ///
    /// Up to ***O(log n)*** swaps.
    pub fn decrease_key<S: QueueSlots + ?Sized>(
        &mut self,
        node: NodeRef,
        slots: &mut S,
    ) -> Result<(), QueueError> {
        let position = self
            .locate(node, &*slots, Operation::DecreaseKey)?
            .ok_or(QueueError::NotFound { node })?;
        let estimate = slots
            .estimate(node)
            .ok_or_else(|| violation(node, Operation::DecreaseKey, Violation::MissingEstimate))?;

        let entry = &mut self.data[position.0];
        if estimate >= entry.priority.estimate {
            return Err(violation(
                node,
                Operation::DecreaseKey,
                Violation::KeyNotDecreased {
                    old: entry.priority.estimate,
                    new: estimate,
                },
            ));
        }
        entry.priority.estimate = estimate;
        self.heapify_up(position, |moved, index| {
            slots.set_heap_index(moved, Some(index))
        });
        Ok(())
    }

    /// Removes an arbitrary queued node and returns the estimate it was
    /// queued with.
    ///
    /// Fails with [`QueueError::NotFound`] if the stored index of the node
    /// does not point at it.
    ///
    /// ### Time complexity
    ///
    /// On average the function will require ***O(log n)*** operations.
    pub fn remove<S: QueueSlots + ?Sized>(
        &mut self,
        node: NodeRef,
        slots: &mut S,
    ) -> Result<Cost, QueueError> {
        let position = match slots.heap_index(node) {
            Some(position) if self.is_member(position, node) => position,
            _ => return Err(QueueError::NotFound { node }),
        };
        let removed = self.remove_at(position, slots);
        Ok(removed.priority.estimate)
    }

    /// Checks membership through the stored index of the node.
    ///
    /// A stale index counts as absent; use [`position`] to have it reported.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    ///
    /// [`position`]: OpenQueue::position
    #[inline]
    pub fn contains<S: QueueSlots + ?Sized>(&self, node: NodeRef, slots: &S) -> bool {
        matches!(slots.heap_index(node), Some(position) if self.is_member(position, node))
    }

    /// Stored position of the node, verified against the queue.
    pub fn position<S: QueueSlots + ?Sized>(
        &self,
        node: NodeRef,
        slots: &S,
    ) -> Result<Option<HeapIndex>, QueueError> {
        self.locate(node, slots, Operation::Lookup)
    }

    /// Empties the queue and clears the stored index of every drained node.
    pub fn clear<S: QueueSlots + ?Sized>(&mut self, slots: &mut S) {
        for entry in self.data.drain(..) {
            slots.set_heap_index(entry.node, None);
        }
        self.next_sequence = 0;
    }

    // Drops entries without touching the slots they were reported to.
    // Used when those slots have already been reset by their owner.
    #[inline(always)]
    pub(crate) fn discard(&mut self) {
        self.data.clear();
        self.next_sequence = 0;
    }

    /// Unordered iteration over queued nodes and their queued estimates.
    ///
    /// ### Time complexity
    ///
    /// Iterating over whole queue is ***O(n)***
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, Cost)> + '_ {
        self.data
            .iter()
            .map(|entry| (entry.node, entry.priority.estimate))
    }

    /// Verifies the heap order, that every stored index equals the array
    /// position of its node, and that queued estimates match the slots.
    ///
    /// ### Time complexity
    ///
    /// ***O(n)***
    pub fn check_invariants<S: QueueSlots + ?Sized>(&self, slots: &S) -> Result<(), QueueError> {
        for (i, entry) in self.data.iter().enumerate() {
            if slots.heap_index(entry.node) != Some(HeapIndex(i)) {
                return Err(violation(
                    entry.node,
                    Operation::Check,
                    Violation::UntrackedMember(i),
                ));
            }
            let current = slots.estimate(entry.node);
            if current != Some(entry.priority.estimate) {
                return Err(violation(
                    entry.node,
                    Operation::Check,
                    Violation::StaleEstimate {
                        queued: entry.priority.estimate,
                    },
                ));
            }
            if i > 0 {
                let parent = (i - 1) / 2;
                if entry.priority < self.data[parent].priority {
                    return Err(violation(
                        entry.node,
                        Operation::Check,
                        Violation::HeapOrder { parent, child: i },
                    ));
                }
            }
        }
        Ok(())
    }

    fn locate<S: QueueSlots + ?Sized>(
        &self,
        node: NodeRef,
        slots: &S,
        operation: Operation,
    ) -> Result<Option<HeapIndex>, QueueError> {
        match slots.heap_index(node) {
            None => Ok(None),
            Some(position) if self.is_member(position, node) => Ok(Some(position)),
            Some(position) => Err(violation(
                node,
                operation,
                Violation::StalePosition {
                    stored: position.0,
                    len: self.data.len(),
                },
            )),
        }
    }

    #[inline(always)]
    fn is_member(&self, position: HeapIndex, node: NodeRef) -> bool {
        self.data
            .get(position.0)
            .map_or(false, |entry| entry.node == node)
    }

    // Caller guarantees that position is in bounds.
    fn remove_at<S: QueueSlots + ?Sized>(
        &mut self,
        position: HeapIndex,
        slots: &mut S,
    ) -> HeapEntry {
        let removed = self.data.swap_remove(position.0);
        slots.set_heap_index(removed.node, None);
        if position.0 < self.data.len() {
            self.restore(position, |moved, index| {
                slots.set_heap_index(moved, Some(index))
            });
        }
        removed
    }

    // Sifts the element at position in whichever direction restores the order.
    fn restore<TChangeHandler: FnMut(NodeRef, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        change_handler: TChangeHandler,
    ) {
        let pos = position.0;
        if pos > 0 && self.data[pos].priority < self.data[(pos - 1) / 2].priority {
            self.heapify_up(position, change_handler);
        } else {
            self.heapify_down(position, change_handler);
        }
    }

    fn heapify_up<TChangeHandler: FnMut(NodeRef, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        mut change_handler: TChangeHandler,
    ) {
        debug_assert!(position.0 < self.data.len(), "Out of index in heapify_up");
        let mut position = position.0;
        while position > 0 {
            let parent_pos = (position - 1) / 2;
            if self.data[position].priority < self.data[parent_pos].priority {
                self.data.swap(parent_pos, position);
                change_handler(self.data[position].node, HeapIndex(position));
                position = parent_pos;
            } else {
                break;
            }
        }
        change_handler(self.data[position].node, HeapIndex(position));
    }

    fn heapify_down<TChangeHandler: FnMut(NodeRef, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        mut change_handler: TChangeHandler,
    ) {
        debug_assert!(position.0 < self.data.len(), "Out of index in heapify_down");
        let mut position = position.0;
        loop {
            let min_child_idx = {
                let child1 = position * 2 + 1;
                let child2 = child1 + 1;
                if child1 >= self.data.len() {
                    break;
                }
                if child2 >= self.data.len()
                    || self.data[child1].priority < self.data[child2].priority
                {
                    child1
                } else {
                    child2
                }
            };

            if self.data[min_child_idx].priority < self.data[position].priority {
                self.data.swap(position, min_child_idx);
                change_handler(self.data[position].node, HeapIndex(position));
                position = min_child_idx;
            } else {
                break;
            }
        }
        change_handler(self.data[position].node, HeapIndex(position));
    }
}

impl Debug for HeapEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{node: {}, estimate: {}}}",
            self.node, self.priority.estimate
        )
    }
}

impl Debug for OpenQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.data.fmt(f)
    }
}

/// Standalone [`QueueSlots`] keyed by [`NodeRef`] index, for driving an
/// [`OpenQueue`] without a [`Graph`].
///
/// [`Graph`]: crate::Graph
#[derive(Clone, Debug, Default)]
pub struct EstimateTable {
    estimates: Vec<Option<Cost>>,
    positions: Vec<Option<HeapIndex>>,
}

impl EstimateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            estimates: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    /// Sets `f` of the node. Lowering it for a queued node must be followed
    /// by [`OpenQueue::decrease_key`].
    pub fn set_estimate(&mut self, node: NodeRef, estimate: Cost) {
        let index = node.index();
        if index >= self.estimates.len() {
            self.estimates.resize(index + 1, None);
        }
        self.estimates[index] = Some(estimate);
    }
}

impl QueueSlots for EstimateTable {
    #[inline]
    fn estimate(&self, node: NodeRef) -> Option<Cost> {
        self.estimates.get(node.index()).copied().flatten()
    }

    #[inline]
    fn heap_index(&self, node: NodeRef) -> Option<HeapIndex> {
        self.positions.get(node.index()).copied().flatten()
    }

    #[inline]
    fn set_heap_index(&mut self, node: NodeRef, index: Option<HeapIndex>) {
        let slot = node.index();
        if slot >= self.positions.len() {
            if index.is_none() {
                return;
            }
            self.positions.resize(slot + 1, None);
        }
        self.positions[slot] = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn node(i: usize) -> NodeRef {
        NodeRef::new(i)
    }

    fn filled(estimates: &[Cost]) -> (OpenQueue, EstimateTable) {
        let mut slots = EstimateTable::new();
        let mut queue = OpenQueue::new();
        for (i, &estimate) in estimates.iter().enumerate() {
            slots.set_estimate(node(i), estimate);
            queue.push(node(i), &mut slots).unwrap();
            assert_eq!(
                queue.check_invariants(&slots),
                Ok(()),
                "Heap state is invalid after pushing {}",
                estimate
            );
        }
        (queue, slots)
    }

    #[test]
    fn test_heap_fill() {
        let items = [
            70, 50, 0, 1, 2, 4, 6, 7, 9, 72, 4, 4, 87, 78, 72, 6, 7, 9, 2, 50, 72, 50, 42, 1, 3, 13,
        ];
        let mut minimum = Cost::MAX;
        let mut slots = EstimateTable::new();
        let mut queue = OpenQueue::new();
        assert!(queue.peek().is_none());
        for (i, &x) in items.iter().enumerate() {
            minimum = minimum.min(x);
            slots.set_estimate(node(i), x);
            queue.push(node(i), &mut slots).unwrap();
            assert_eq!(queue.check_invariants(&slots), Ok(()));
            let (_, heap_min) = queue.peek().unwrap();
            assert_eq!(minimum, heap_min);
        }
        assert_eq!(queue.len(), items.len());
    }

    #[test]
    fn test_pop_sorted() {
        let items = [
            16, 5, 11, 1, 34, 42, 5, 6, 25, 35, 11, 35, 2, 40, 42, 40, 45, 48, 48, 38, 28, 33, 31,
            34, 18, 25, 16, 33, 11, 6, 35, 38, 35, 41, 38, 31, 38, 23, 26, 44, 38, 11, 49, 30, 7,
        ];
        let (mut queue, mut slots) = filled(&items);

        let mut sorted_items = items;
        sorted_items.sort_unstable();
        for &x in sorted_items.iter() {
            let popped = queue.pop_min(&mut slots).unwrap();
            assert_eq!(items[popped.index()], x);
            assert_eq!(slots.heap_index(popped), None);
            assert_eq!(queue.check_invariants(&slots), Ok(()), "Heap is invalid after {}", x);
        }

        assert_eq!(queue.pop_min(&mut slots), Err(QueueError::Empty));
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let (mut queue, mut slots) = filled(&[5, 3, 5, 3, 5, 3]);
        let order: Vec<usize> = (0..6)
            .map(|_| queue.pop_min(&mut slots).unwrap().index())
            .collect();
        assert_eq!(order, [1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn test_decrease_key_keeps_original_sequence() {
        let (mut queue, mut slots) = filled(&[4, 9, 2]);
        slots.set_estimate(node(1), 4);
        queue.decrease_key(node(1), &mut slots).unwrap();
        assert_eq!(queue.check_invariants(&slots), Ok(()));
        assert_eq!(queue.pop_min(&mut slots), Ok(node(2)));
        // Node 0 was pushed before node 1 and wins the tie.
        assert_eq!(queue.pop_min(&mut slots), Ok(node(0)));
        assert_eq!(queue.pop_min(&mut slots), Ok(node(1)));
    }

    #[test]
    fn test_decrease_key_rejects_increase_and_equal() {
        let (mut queue, mut slots) = filled(&[4, 9, 2]);
        slots.set_estimate(node(0), 4);
        assert_eq!(
            queue.decrease_key(node(0), &mut slots),
            Err(QueueError::InvariantViolation {
                node: node(0),
                operation: Operation::DecreaseKey,
                violation: Violation::KeyNotDecreased { old: 4, new: 4 },
            })
        );
        slots.set_estimate(node(2), 3);
        assert!(matches!(
            queue.decrease_key(node(2), &mut slots),
            Err(QueueError::InvariantViolation {
                violation: Violation::KeyNotDecreased { old: 2, new: 3 },
                ..
            })
        ));
    }

    #[test]
    fn test_decrease_key_of_absent_node() {
        let (mut queue, mut slots) = filled(&[4, 9]);
        slots.set_estimate(node(5), 1);
        assert_eq!(
            queue.decrease_key(node(5), &mut slots),
            Err(QueueError::NotFound { node: node(5) })
        );
    }

    #[test]
    fn test_push_twice_is_violation() {
        let (mut queue, mut slots) = filled(&[4, 9]);
        assert!(matches!(
            queue.push(node(1), &mut slots),
            Err(QueueError::InvariantViolation {
                violation: Violation::AlreadyQueued(_),
                ..
            })
        ));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_push_without_estimate_is_violation() {
        let mut queue = OpenQueue::new();
        let mut slots = EstimateTable::new();
        assert_eq!(
            queue.push(node(3), &mut slots),
            Err(QueueError::InvariantViolation {
                node: node(3),
                operation: Operation::Push,
                violation: Violation::MissingEstimate,
            })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_index_detected() {
        let (mut queue, mut slots) = filled(&[4, 9, 6]);
        // Pretend node 3 was queued at the position occupied by node 1.
        slots.set_estimate(node(3), 1);
        slots.set_heap_index(node(3), Some(HeapIndex(1)));
        assert!(!queue.contains(node(3), &slots));
        assert!(matches!(
            queue.position(node(3), &slots),
            Err(QueueError::InvariantViolation {
                violation: Violation::StalePosition { stored: 1, len: 3 },
                ..
            })
        ));
        assert!(matches!(
            queue.push(node(3), &mut slots),
            Err(QueueError::InvariantViolation {
                operation: Operation::Push,
                violation: Violation::StalePosition { .. },
                ..
            })
        ));
        assert!(matches!(
            queue.decrease_key(node(3), &mut slots),
            Err(QueueError::InvariantViolation {
                operation: Operation::DecreaseKey,
                ..
            })
        ));
        assert_eq!(
            queue.remove(node(3), &mut slots),
            Err(QueueError::NotFound { node: node(3) })
        );
    }

    #[test]
    fn test_pop_with_untracked_root() {
        let (mut queue, mut slots) = filled(&[1, 2]);
        slots.set_heap_index(node(0), None);
        assert!(matches!(
            queue.pop_min(&mut slots),
            Err(QueueError::InvariantViolation {
                operation: Operation::PopMin,
                violation: Violation::UntrackedMember(0),
                ..
            })
        ));
    }

    #[test]
    fn test_remove_change_tree() {
        let (mut queue, mut slots) = filled(&[300, 500, 400, 400, 600, 100, 200]);
        assert_eq!(queue.remove(node(1), &mut slots), Ok(500));
        assert_eq!(queue.check_invariants(&slots), Ok(()));

        let mut list = Vec::new();
        while let Ok(popped) = queue.pop_min(&mut slots) {
            list.push(slots.estimate(popped).unwrap());
        }
        assert_eq!(list, [100, 200, 300, 400, 400, 600]);
    }

    #[test]
    fn test_remove_sifts_moved_element_up() {
        // The last element lives in the left subtree and is smaller than the
        // parent of the removed right-subtree node, so it has to move up.
        let (mut queue, mut slots) = filled(&[1, 2, 50, 3, 4, 60, 70, 5]);
        let target = node(5);
        assert_eq!(queue.remove(target, &mut slots), Ok(60));
        assert_eq!(queue.check_invariants(&slots), Ok(()));
        assert!(!queue.contains(target, &slots));
        assert_eq!(slots.heap_index(node(7)), Some(HeapIndex(2)));
        let mut popped = Vec::new();
        while let Ok(next) = queue.pop_min(&mut slots) {
            popped.push(slots.estimate(next).unwrap());
        }
        assert_eq!(popped, [1, 2, 3, 4, 5, 50, 70]);
    }

    #[test]
    fn test_remove_last_and_only() {
        let (mut queue, mut slots) = filled(&[1, 2]);
        assert_eq!(queue.remove(node(1), &mut slots), Ok(2));
        assert_eq!(queue.remove(node(0), &mut slots), Ok(1));
        assert!(queue.is_empty());
        assert_eq!(
            queue.remove(node(0), &mut slots),
            Err(QueueError::NotFound { node: node(0) })
        );
    }

    #[test]
    fn test_clear_resets_positions() {
        let (mut queue, mut slots) = filled(&[3, 1, 2]);
        queue.clear(&mut slots);
        assert!(queue.is_empty());
        for i in 0..3 {
            assert_eq!(slots.heap_index(node(i)), None);
        }
        queue.push(node(2), &mut slots).unwrap();
        assert_eq!(queue.peek(), Some((node(2), 2)));
    }

    #[test]
    fn test_fmt() {
        let (queue, _) = filled(&[5, 4]);
        assert_eq!(
            format!("{:?}", queue),
            "[{node: #1, estimate: 4}, {node: #0, estimate: 5}]"
        );
    }

    #[test]
    fn test_random_operations_keep_positions() {
        const NODES: usize = 64;
        let mut rng = ChaCha8Rng::seed_from_u64(546579634698731);
        let mut slots = EstimateTable::new();
        let mut queue = OpenQueue::new();
        let mut queued = vec![false; NODES];

        for _ in 0..4000 {
            let n = node(rng.gen_range(0..NODES));
            match rng.gen_range(0..4) {
                0 if !queued[n.index()] => {
                    slots.set_estimate(n, rng.gen_range(0..1000));
                    queue.push(n, &mut slots).unwrap();
                    queued[n.index()] = true;
                }
                1 => {
                    if let Ok(popped) = queue.pop_min(&mut slots) {
                        let lowest = queue.iter().map(|(_, e)| e).min();
                        let popped_estimate = slots.estimate(popped).unwrap();
                        assert!(lowest.map_or(true, |l| popped_estimate <= l));
                        queued[popped.index()] = false;
                    }
                }
                2 if queued[n.index()] => {
                    let current = slots.estimate(n).unwrap();
                    if current > 0 {
                        slots.set_estimate(n, rng.gen_range(0..current));
                        queue.decrease_key(n, &mut slots).unwrap();
                    }
                }
                3 if queued[n.index()] => {
                    queue.remove(n, &mut slots).unwrap();
                    queued[n.index()] = false;
                }
                _ => {
                    assert_eq!(queue.contains(n, &slots), queued[n.index()]);
                }
            }
            assert_eq!(queue.check_invariants(&slots), Ok(()));
            assert_eq!(queue.len(), queued.iter().filter(|&&q| q).count());
        }
    }
}
