//! Single-source, single-target shortest path search over weighted directed
//! graphs using the [A* algorithm][a_star].
//!
//! The crate has three parts:
//!
//! * [`Graph`] owns nodes, their heuristic estimates and directed edges with
//!   non-negative weights. Nodes live in an arena and are addressed by
//!   [`NodeRef`] handles; parents on the best known path are stored as handles
//!   too, never as copies of nodes.
//! * [`OpenQueue`] is a binary min-heap over node handles ordered by the
//!   estimated total cost `f = g + h`. Every time it moves a node it reports
//!   the new array position back to the node's owner through [`QueueSlots`],
//!   which makes decrease-key, removal and membership tests ***O(log n)*** or
//!   better without scanning.
//! * [`AStar`] drives the search: pop the cheapest open node, relax its
//!   outgoing edges, close it. A closed node that later turns out to be
//!   reachable more cheaply is re-opened, so the heuristic only has to be
//!   admissible, not consistent.
//!
//! A search that finds nothing returns [`PathResult::Exhausted`]. Errors are
//! reserved for broken invariants (stale heap positions, cost overflow) and
//! foreign node handles, and they abort the run.
//!
//! The search is synchronous and takes the graph by `&mut`: node state is
//! written in place, so concurrent searches need separate graphs.
//!
//! # Examples
//!
//! ```
//! use astar_search::{search_by_id, Graph, PathResult};
//!
//! let heuristics = [3, 2, 6, 2, 5, 7, 1, 3, 9, 8, 0];
//! let edges = [
//!     (0, 1, 2), (0, 2, 5), (0, 4, 3), (1, 2, 1), (1, 4, 1), (2, 3, 2), (2, 4, 7),
//!     (2, 5, 4), (3, 2, 2), (3, 5, 5), (3, 6, 8), (3, 8, 4), (4, 0, 2), (4, 1, 1),
//!     (4, 3, 6), (4, 5, 1), (5, 7, 5), (6, 8, 2), (6, 9, 3), (7, 3, 1), (7, 10, 3),
//!     (8, 7, 3), (8, 9, 2), (8, 10, 1), (9, 7, 1), (9, 10, 5),
//! ];
//!
//! let mut graph = Graph::new();
//! for (id, &h) in heuristics.iter().enumerate() {
//!     graph.create_node(id, h).unwrap();
//! }
//! for &(from, to, weight) in edges.iter() {
//!     let from = graph.node_ref(&from).unwrap();
//!     let to = graph.node_ref(&to).unwrap();
//!     graph.add_edge(from, to, weight).unwrap();
//! }
//!
//! // The estimates of nodes 8 and 9 overshoot their real remaining cost,
//! // so the search settles for a path of cost 12.
//! let path = search_by_id(&mut graph, &0, &10).unwrap().into_path().unwrap();
//! assert_eq!(path.ids(), &[0, 4, 5, 7, 10]);
//! assert_eq!(path.cost(), 12);
//!
//! // Without a heuristic the cheapest path of cost 10 is found.
//! let mut blind = Graph::new();
//! for id in 0..heuristics.len() {
//!     blind.create_node(id, 0).unwrap();
//! }
//! for &(from, to, weight) in edges.iter() {
//!     let from = blind.node_ref(&from).unwrap();
//!     let to = blind.node_ref(&to).unwrap();
//!     blind.add_edge(from, to, weight).unwrap();
//! }
//! let path = search_by_id(&mut blind, &0, &10).unwrap().into_path().unwrap();
//! assert_eq!(path.ids(), &[0, 1, 2, 3, 8, 10]);
//! assert_eq!(path.cost(), 10);
//!
//! // Node 10 has no outgoing edges.
//! assert_eq!(search_by_id(&mut blind, &10, &0).unwrap(), PathResult::Exhausted);
//! ```
//!
//! [a_star]: https://en.wikipedia.org/wiki/A*_search_algorithm

mod error;
mod graph;
mod open_queue;
mod search;

pub use crate::error::{GraphError, Operation, QueueError, SearchError, Violation};
pub use crate::graph::{Cost, Edge, Graph, NodeRef, NodeStatus};
pub use crate::open_queue::{EstimateTable, HeapIndex, OpenQueue, QueueSlots};
pub use crate::search::{
    search, search_by_id, AStar, Path, PathResult, SearchConfig, SearchStats,
};
