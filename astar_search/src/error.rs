use std::fmt::Display;

use thiserror::Error;

use crate::graph::{Cost, NodeRef};

/// Errors reported while building a [`Graph`].
///
/// A failed mutation leaves the graph exactly as it was before the call.
///
/// [`Graph`]: crate::Graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<TId> {
    /// A node with this identity already exists.
    #[error("node {0:?} already exists in the graph")]
    DuplicateId(TId),

    /// Edge weights must be non-negative.
    #[error("edge {from} -> {to} has negative weight {weight}")]
    InvalidWeight {
        from: NodeRef,
        to: NodeRef,
        weight: i64,
    },

    /// The reference was not produced by this graph.
    #[error("node {0} does not belong to this graph")]
    UnknownNode(NodeRef),
}

/// Operation of the open queue or search loop that detected a broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Push,
    PopMin,
    DecreaseKey,
    Remove,
    Lookup,
    Check,
    Relax,
    ReconstructPath,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Push => "push",
            Operation::PopMin => "pop_min",
            Operation::DecreaseKey => "decrease_key",
            Operation::Remove => "remove",
            Operation::Lookup => "position",
            Operation::Check => "check_invariants",
            Operation::Relax => "relax",
            Operation::ReconstructPath => "reconstruct_path",
        };
        f.write_str(name)
    }
}

/// Cause of a broken invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("stored heap index {stored} does not match the queue (len {len})")]
    StalePosition { stored: usize, len: usize },

    #[error("node sits at heap index {0} but its stored index disagrees")]
    UntrackedMember(usize),

    #[error("node is already queued at index {0}")]
    AlreadyQueued(usize),

    #[error("heap order broken between index {parent} and its child {child}")]
    HeapOrder { parent: usize, child: usize },

    #[error("queued estimate {queued} differs from the node's current estimate")]
    StaleEstimate { queued: Cost },

    #[error("node has no estimated total cost")]
    MissingEstimate,

    #[error("node was expanded without a known distance from the start")]
    MissingDistance,

    #[error("estimate {new} is not lower than queued estimate {old}")]
    KeyNotDecreased { old: Cost, new: Cost },

    #[error("cost {base} + {addend} overflows")]
    CostOverflow { base: Cost, addend: Cost },

    #[error("parent chain does not reach the start within {0} steps")]
    BrokenParentChain(usize),
}

/// Errors reported by [`OpenQueue`].
///
/// [`OpenQueue`]: crate::OpenQueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `pop_min` was called on an empty queue.
    #[error("pop_min called on an empty queue")]
    Empty,

    /// The node is not a member of the queue.
    #[error("node {node} is not present in the queue")]
    NotFound { node: NodeRef },

    /// Caller contract failure; fatal to the current search.
    #[error("{operation} on node {node} violated a queue invariant: {violation}")]
    InvariantViolation {
        node: NodeRef,
        operation: Operation,
        violation: Violation,
    },
}

/// Errors aborting a search run.
///
/// A search that finds no path does not produce an error, see [`PathResult`].
///
/// [`PathResult`]: crate::PathResult
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("{operation} on node {node} violated a search invariant: {violation}")]
    InvariantViolation {
        node: NodeRef,
        operation: Operation,
        violation: Violation,
    },

    #[error("node {0} does not belong to the searched graph")]
    UnknownNode(NodeRef),

    /// An id passed to `search_by_id` is not in the graph. Holds the `Debug`
    /// rendering of the id, not the id itself.
    #[error("no node with id {0} in the searched graph")]
    UnknownId(String),
}

impl SearchError {
    /// Returns true for contract failures of the queue or the search loop,
    /// as opposed to bad input from the caller.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SearchError::InvariantViolation { .. }
                | SearchError::Queue(QueueError::InvariantViolation { .. })
                | SearchError::Queue(QueueError::Empty)
                | SearchError::Queue(QueueError::NotFound { .. })
        )
    }
}
