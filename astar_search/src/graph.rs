use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::GraphError;
use crate::open_queue::{HeapIndex, QueueSlots};

/// Path length, edge weight and heuristic value.
pub type Cost = u64;

/// Stable handle of a node inside the [`Graph`] that created it.
///
/// It is the node's position in the graph's arena. Nodes are never removed,
/// so a handle stays valid for the lifetime of its graph.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct NodeRef(usize);

impl NodeRef {
    #[inline(always)]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Directed edge as stored in the adjacency list of its source node.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Edge {
    pub target: NodeRef,
    pub weight: Cost,
}

/// Where a node stands in the most recent search.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum NodeStatus {
    /// Not reached yet, or the graph was reset.
    Unvisited,
    /// In the open queue with a finite distance.
    Open,
    /// Popped and relaxed. May become `Open` again if a cheaper path shows up.
    Closed,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub(crate) struct SearchState {
    pub(crate) distance: Option<Cost>,
    pub(crate) estimate: Option<Cost>,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) heap_index: Option<HeapIndex>,
    pub(crate) closed: bool,
}

impl SearchState {
    #[inline(always)]
    pub(crate) fn status(&self) -> NodeStatus {
        if self.closed {
            NodeStatus::Closed
        } else if self.heap_index.is_some() {
            NodeStatus::Open
        } else {
            NodeStatus::Unvisited
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    heuristic: Cost,
    state: SearchState,
}

/// Arena of nodes addressed by [`NodeRef`], keyed by caller identity.
///
/// Methods taking a `NodeRef` expect it to be in bounds. [`Graph`] checks
/// every handle at its public boundary before it reaches the table.
#[derive(Clone, Debug)]
pub(crate) struct NodeTable<TId> {
    map: IndexMap<TId, Node>,
}

impl<TId: Hash + Eq> NodeTable<TId> {
    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub(crate) fn contains(&self, node: NodeRef) -> bool {
        node.0 < self.map.len()
    }

    #[inline(always)]
    pub(crate) fn id(&self, node: NodeRef) -> &TId {
        self.map
            .get_index(node.0)
            .map(|(id, _)| id)
            .expect("All node refs of the table must be valid")
    }

    #[inline(always)]
    pub(crate) fn heuristic(&self, node: NodeRef) -> Cost {
        self.map[node.0].heuristic
    }

    #[inline(always)]
    pub(crate) fn state(&self, node: NodeRef) -> &SearchState {
        &self.map[node.0].state
    }

    #[inline(always)]
    pub(crate) fn state_mut(&mut self, node: NodeRef) -> &mut SearchState {
        &mut self.map[node.0].state
    }

    fn reset(&mut self) {
        for node in self.map.values_mut() {
            node.state = SearchState::default();
        }
    }
}

impl<TId: Hash + Eq> QueueSlots for NodeTable<TId> {
    #[inline]
    fn estimate(&self, node: NodeRef) -> Option<Cost> {
        self.map.get_index(node.0)?.1.state.estimate
    }

    #[inline]
    fn heap_index(&self, node: NodeRef) -> Option<HeapIndex> {
        self.map.get_index(node.0)?.1.state.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, node: NodeRef, index: Option<HeapIndex>) {
        if let Some((_, entry)) = self.map.get_index_mut(node.0) {
            entry.state.heap_index = index;
        }
    }
}

/// Weighted directed graph with per-node heuristic estimates.
///
/// Nodes are identified by caller-chosen ids and addressed through the
/// [`NodeRef`] handles returned by [`create_node`]. Each node carries the
/// mutable state of the last search run over the graph (distance from the
/// start, estimated total cost, parent and queue position), readable through
/// [`distance`], [`estimate`], [`parent`] and [`status`].
///
/// A search needs exclusive access to the graph. Run concurrent searches on
/// separate clones.
///
/// # Examples
///
/// ```
/// use astar_search::{Graph, GraphError};
///
/// let mut graph = Graph::new();
/// let a = graph.create_node("a", 2).unwrap();
/// let b = graph.create_node("b", 0).unwrap();
/// graph.add_edge(a, b, 2).unwrap();
/// graph.add_edge(a, b, 5).unwrap();
///
/// assert_eq!(graph.create_node("a", 1), Err(GraphError::DuplicateId("a")));
/// assert!(matches!(graph.add_edge(b, a, -1), Err(GraphError::InvalidWeight { .. })));
///
/// let weights: Vec<u64> = graph.neighbours(a).iter().map(|e| e.weight).collect();
/// assert_eq!(weights, [2, 5]);
/// assert_eq!(graph.edge_count(), 2);
/// ```
///
/// [`create_node`]: Graph::create_node
/// [`distance`]: Graph::distance
/// [`estimate`]: Graph::estimate
/// [`parent`]: Graph::parent
/// [`status`]: Graph::status
#[derive(Clone, Debug)]
pub struct Graph<TId> {
    table: NodeTable<TId>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl<TId: Hash + Eq> Default for Graph<TId> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<TId: Hash + Eq> Graph<TId> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: NodeTable::with_capacity(capacity),
            adjacency: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    /// Adds a node with a fixed heuristic estimate of the remaining cost to
    /// whatever target it will be searched for.
    ///
    /// The node starts out unvisited: infinite distance and estimate, no
    /// parent, not queued, not closed.
    pub fn create_node(&mut self, id: TId, heuristic: Cost) -> Result<NodeRef, GraphError<TId>> {
        if self.table.map.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        let (index, _) = self.table.map.insert_full(
            id,
            Node {
                heuristic,
                state: SearchState::default(),
            },
        );
        self.adjacency.push(Vec::new());
        Ok(NodeRef(index))
    }

    /// Appends a directed edge to the adjacency list of `from`.
    ///
    /// Self-loops and parallel edges are kept as given.
    pub fn add_edge(
        &mut self,
        from: NodeRef,
        to: NodeRef,
        weight: i64,
    ) -> Result<(), GraphError<TId>> {
        for node in [from, to] {
            if !self.contains_node(node) {
                return Err(GraphError::UnknownNode(node));
            }
        }
        let weight =
            Cost::try_from(weight).map_err(|_| GraphError::InvalidWeight { from, to, weight })?;
        self.adjacency[from.0].push(Edge { target: to, weight });
        self.edge_count += 1;
        Ok(())
    }

    /// Outgoing edges of the node in insertion order.
    ///
    /// Empty for nodes that do not belong to this graph.
    #[inline]
    pub fn neighbours(&self, node: NodeRef) -> &[Edge] {
        self.adjacency
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Handle of the node with this id.
    pub fn node_ref<Q>(&self, id: &Q) -> Option<NodeRef>
    where
        TId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.map.get_index_of(id).map(NodeRef)
    }

    pub fn id(&self, node: NodeRef) -> Option<&TId> {
        self.table.map.get_index(node.0).map(|(id, _)| id)
    }

    pub fn heuristic(&self, node: NodeRef) -> Option<Cost> {
        self.table.map.get_index(node.0).map(|(_, n)| n.heuristic)
    }

    #[inline]
    pub fn contains_node(&self, node: NodeRef) -> bool {
        self.table.contains(node)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &TId)> + '_ {
        self.table
            .map
            .keys()
            .enumerate()
            .map(|(index, id)| (NodeRef(index), id))
    }

    /// Best known distance from the start of the last search, `None` if the
    /// node was not reached or does not belong to this graph.
    pub fn distance(&self, node: NodeRef) -> Option<Cost> {
        self.state(node).and_then(|s| s.distance)
    }

    /// Distance plus heuristic from the last search, `None` if not reached.
    pub fn estimate(&self, node: NodeRef) -> Option<Cost> {
        self.state(node).and_then(|s| s.estimate)
    }

    /// Predecessor on the best known path from the start of the last search.
    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.state(node).and_then(|s| s.parent)
    }

    pub fn status(&self, node: NodeRef) -> Option<NodeStatus> {
        self.state(node).map(SearchState::status)
    }

    /// Returns every node to [`NodeStatus::Unvisited`].
    ///
    /// Searches call this before they start.
    pub fn reset_search_state(&mut self) {
        self.table.reset();
    }

    #[inline]
    fn state(&self, node: NodeRef) -> Option<&SearchState> {
        self.table.map.get_index(node.0).map(|(_, n)| &n.state)
    }

    // Borrow checker treats borrowing a field as borrowing whole structure
    // so we need to get references to fields to borrow them individually.
    #[inline(always)]
    pub(crate) fn split_mut(&mut self) -> (&[Vec<Edge>], &mut NodeTable<TId>) {
        (&self.adjacency, &mut self.table)
    }
}
