use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::{Operation, SearchError, Violation};
use crate::graph::{Cost, Edge, Graph, NodeRef, NodeStatus, NodeTable};
use crate::open_queue::OpenQueue;

/// Limits applied to a single search run.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SearchConfig {
    expansion_limit: Option<usize>,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search with [`PathResult::LimitReached`] once `limit` nodes
    /// have been expanded without popping the target.
    ///
    /// The node popped when the limit hits is put back into the open queue,
    /// so it reports [`NodeStatus::Open`] afterwards. This push is not counted
    /// in [`SearchStats::pushed`].
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn expansion_limit(&self) -> Option<usize> {
        self.expansion_limit
    }
}

/// Counters of the most recent run of an [`AStar`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SearchStats {
    /// Nodes popped and relaxed. The popped target is not counted.
    pub expanded: usize,
    /// Pushes into the open queue, re-openings included.
    pub pushed: usize,
    /// Cheaper paths found to nodes that were already open.
    pub decreased: usize,
    /// Closed nodes pushed back into the open queue.
    pub reopened: usize,
}

/// Path from the start to the target, both inclusive.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Path<TId> {
    nodes: Vec<NodeRef>,
    ids: Vec<TId>,
    cost: Cost,
}

impl<TId> Path<TId> {
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn ids(&self) -> &[TId] {
        &self.ids
    }

    /// Sum of the weights of the traversed edges.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Number of nodes on the path, never zero.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_ids(self) -> Vec<TId> {
        self.ids
    }
}

/// Terminal outcome of a search that did not fail.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum PathResult<TId> {
    /// The target was popped from the open queue.
    Found(Path<TId>),
    /// The open queue ran empty: the target is unreachable from the start.
    Exhausted,
    /// The configured expansion limit was hit first. Nothing is known about
    /// reachability of the target.
    LimitReached,
}

impl<TId> PathResult<TId> {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    pub fn path(&self) -> Option<&Path<TId>> {
        match self {
            PathResult::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path<TId>> {
        match self {
            PathResult::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Reusable A* runner.
///
/// Keeps its open queue allocation between runs, and the counters of the
/// last run in [`stats`].
///
/// Closed nodes are re-opened when a strictly cheaper path to them is found,
/// so the returned path is optimal whenever the heuristic is admissible,
/// consistent or not.
///
/// # Examples
///
/// ```
/// use astar_search::{AStar, Graph, PathResult, SearchConfig};
///
/// let mut graph = Graph::new();
/// let nodes: Vec<_> = (0..4).map(|id| graph.create_node(id, 0).unwrap()).collect();
/// for pair in nodes.windows(2) {
///     graph.add_edge(pair[0], pair[1], 1).unwrap();
/// }
///
/// let mut astar = AStar::new();
/// let path = astar.search(&mut graph, nodes[0], nodes[3]).unwrap().into_path().unwrap();
/// assert_eq!(path.ids(), &[0, 1, 2, 3]);
/// assert_eq!(path.cost(), 3);
/// assert_eq!(astar.stats().expanded, 3);
///
/// let mut limited = AStar::with_config(SearchConfig::new().with_expansion_limit(1));
/// assert_eq!(
///     limited.search(&mut graph, nodes[0], nodes[3]).unwrap(),
///     PathResult::LimitReached
/// );
/// ```
///
/// [`stats`]: AStar::stats
#[derive(Clone, Debug, Default)]
pub struct AStar {
    config: SearchConfig,
    queue: OpenQueue,
    stats: SearchStats,
}

#[inline(always)]
fn violation(node: NodeRef, operation: Operation, violation: Violation) -> SearchError {
    SearchError::InvariantViolation {
        node,
        operation,
        violation,
    }
}

#[inline(always)]
fn checked_sum(node: NodeRef, base: Cost, addend: Cost) -> Result<Cost, SearchError> {
    base.checked_add(addend).ok_or_else(|| {
        violation(
            node,
            Operation::Relax,
            Violation::CostOverflow { base, addend },
        )
    })
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Searches a cheapest path from `start` to `target`.
    ///
    /// Resets the search state of every node first, so repeated runs over an
    /// unchanged graph give identical results. On return the graph holds the
    /// distances, parents and statuses computed by this run.
    ///
    /// An `Err` always means a broken invariant or a foreign node handle;
    /// an unreachable target is reported as [`PathResult::Exhausted`].
    pub fn search<TId>(
        &mut self,
        graph: &mut Graph<TId>,
        start: NodeRef,
        target: NodeRef,
    ) -> Result<PathResult<TId>, SearchError>
    where
        TId: Hash + Eq + Clone,
    {
        for node in [start, target] {
            if !graph.contains_node(node) {
                return Err(SearchError::UnknownNode(node));
            }
        }
        graph.reset_search_state();
        self.queue.discard();
        self.stats = SearchStats::default();

        let (adjacency, table) = graph.split_mut();
        let start_estimate = checked_sum(start, 0, table.heuristic(start))?;
        {
            let state = table.state_mut(start);
            state.distance = Some(0);
            state.estimate = Some(start_estimate);
        }
        self.queue.push(start, table)?;
        self.stats.pushed += 1;
        debug!(%start, %target, nodes = table.len(), "starting A* search");

        while !self.queue.is_empty() {
            let current = self.queue.pop_min(table)?;
            if current == target {
                table.state_mut(current).closed = true;
                let path = reconstruct_path(table, start, target)?;
                debug!(
                    cost = path.cost(),
                    length = path.len(),
                    stats = ?self.stats,
                    "A* search found a path"
                );
                return Ok(PathResult::Found(path));
            }
            if let Some(limit) = self.config.expansion_limit {
                if self.stats.expanded >= limit {
                    // Not expanded, so it goes back to the open queue.
                    self.queue.push(current, table)?;
                    debug!(limit, stats = ?self.stats, "A* search hit its expansion limit");
                    return Ok(PathResult::LimitReached);
                }
            }

            self.stats.expanded += 1;
            self.relax(current, &adjacency[current.index()], table)?;
            table.state_mut(current).closed = true;
        }

        debug!(stats = ?self.stats, "A* search exhausted the open queue");
        Ok(PathResult::Exhausted)
    }

    /// Same as [`search`] with the endpoints given by id.
    ///
    /// [`search`]: AStar::search
    pub fn search_by_id<TId, Q>(
        &mut self,
        graph: &mut Graph<TId>,
        start: &Q,
        target: &Q,
    ) -> Result<PathResult<TId>, SearchError>
    where
        TId: Hash + Eq + Clone + Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let lookup = |id: &Q| {
            graph
                .node_ref(id)
                .ok_or_else(|| SearchError::UnknownId(format!("{:?}", id)))
        };
        let start = lookup(start)?;
        let target = lookup(target)?;
        self.search(graph, start, target)
    }

    fn relax<TId: Hash + Eq>(
        &mut self,
        current: NodeRef,
        edges: &[Edge],
        table: &mut NodeTable<TId>,
    ) -> Result<(), SearchError> {
        let base = table
            .state(current)
            .distance
            .ok_or_else(|| violation(current, Operation::Relax, Violation::MissingDistance))?;
        trace!(node = %current, distance = base, "expanding");

        for edge in edges {
            let next = edge.target;
            let candidate = checked_sum(next, base, edge.weight)?;
            let known = *table.state(next);
            if known.distance.map_or(false, |distance| candidate >= distance) {
                continue;
            }
            let estimate = checked_sum(next, candidate, table.heuristic(next))?;
            {
                let state = table.state_mut(next);
                state.parent = Some(current);
                state.distance = Some(candidate);
                state.estimate = Some(estimate);
            }

            match known.status() {
                NodeStatus::Open => {
                    trace!(
                        node = %next,
                        from = %current,
                        distance = candidate,
                        "cheaper path to open node"
                    );
                    self.queue.decrease_key(next, table)?;
                    self.stats.decreased += 1;
                }
                NodeStatus::Closed => {
                    trace!(
                        node = %next,
                        from = %current,
                        distance = candidate,
                        "re-opening closed node"
                    );
                    table.state_mut(next).closed = false;
                    self.queue.push(next, table)?;
                    self.stats.reopened += 1;
                    self.stats.pushed += 1;
                }
                NodeStatus::Unvisited => {
                    self.queue.push(next, table)?;
                    self.stats.pushed += 1;
                }
            }
        }
        Ok(())
    }
}

// Follows parents from the target back to the start.
fn reconstruct_path<TId: Hash + Eq + Clone>(
    table: &NodeTable<TId>,
    start: NodeRef,
    target: NodeRef,
) -> Result<Path<TId>, SearchError> {
    let broken = || {
        violation(
            target,
            Operation::ReconstructPath,
            Violation::BrokenParentChain(table.len()),
        )
    };
    let cost = table
        .state(target)
        .distance
        .ok_or_else(|| violation(target, Operation::ReconstructPath, Violation::MissingDistance))?;

    let mut nodes = vec![target];
    let mut current = target;
    while let Some(parent) = table.state(current).parent {
        if nodes.len() >= table.len() {
            return Err(broken());
        }
        nodes.push(parent);
        current = parent;
    }
    if current != start {
        return Err(broken());
    }
    nodes.reverse();

    let ids = nodes.iter().map(|&node| table.id(node).clone()).collect();
    Ok(Path { nodes, ids, cost })
}

/// Runs a single A* search with the default configuration.
///
/// See [`AStar::search`].
pub fn search<TId>(
    graph: &mut Graph<TId>,
    start: NodeRef,
    target: NodeRef,
) -> Result<PathResult<TId>, SearchError>
where
    TId: Hash + Eq + Clone,
{
    AStar::new().search(graph, start, target)
}

/// Runs a single A* search between two node ids.
///
/// See [`AStar::search_by_id`].
pub fn search_by_id<TId, Q>(
    graph: &mut Graph<TId>,
    start: &Q,
    target: &Q,
) -> Result<PathResult<TId>, SearchError>
where
    TId: Hash + Eq + Clone + Borrow<Q>,
    Q: Hash + Eq + Debug + ?Sized,
{
    AStar::new().search_by_id(graph, start, target)
}
