use std::fmt;

use tracing::{debug, trace};

use crate::error::PathError;
use crate::graph::{Cost, Graph, NodeId};
use crate::min_heap::{HeapEntry, MinHeap};

/// Distances and predecessors left behind by one run of Dijkstra from `source`.
///
/// When the run was stopped at a target, only nodes extracted before (and
/// including) the target carry final values; everything else may still be
/// `f64::INFINITY` / `None` even if it is reachable.
#[derive(Clone, Debug, PartialEq)]
pub struct Search {
    source: NodeId,
    distances: Vec<Cost>,
    previous: Vec<Option<NodeId>>,
    visited: Vec<NodeId>,
}

impl Search {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn distances(&self) -> &[Cost] {
        &self.distances
    }

    pub fn distance(&self, node_id: NodeId) -> Option<Cost> {
        self.distances.get(node_id).copied()
    }

    pub fn previous(&self, node_id: NodeId) -> Option<NodeId> {
        self.previous.get(node_id).copied().flatten()
    }

    /// Nodes in the order they were extracted from the heap.
    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    /// Walks predecessors back from `dest`. For a node that was never reached this is just `[dest]`.
    pub fn path_to(&self, dest: NodeId) -> Result<Vec<NodeId>, PathError> {
        if dest >= self.previous.len() {
            return Err(PathError::OutOfRange {
                id: dest,
                node_count: self.previous.len(),
            });
        }
        let mut path = vec![dest];
        let mut current = dest;
        while let Some(prev) = self.previous[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }
}

/// Result of a single source/destination query.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPath {
    pub source: NodeId,
    pub path: Vec<NodeId>,
    pub total_distance: Cost,
}

impl ShortestPath {
    pub fn is_reachable(&self) -> bool {
        self.total_distance.is_finite()
    }

    pub fn dest(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// Node ids joined as `a -> b -> c`.
    pub fn hops(&self) -> String {
        let ids: Vec<String> = self.path.iter().map(|id| id.to_string()).collect();
        ids.join(" -> ")
    }
}

impl fmt::Display for ShortestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_reachable() {
            return match self.dest() {
                Some(dest) => write!(f, "node {} is unreachable from node {}", dest, self.source),
                None => write!(f, "unreachable from node {}", self.source),
            };
        }
        write!(f, "{} (distance {})", self.hops(), self.total_distance)
    }
}

/// Dijkstra from `source`, stopping as soon as `target` is extracted (if given).
pub fn search(graph: &Graph, source: NodeId, target: Option<NodeId>) -> Result<Search, PathError> {
    graph.check_node(source)?;
    if let Some(target) = target {
        graph.check_node(target)?;
    }

    let n = graph.node_count();
    let mut distances = vec![f64::INFINITY; n];
    let mut previous = vec![None; n];
    let mut visited = Vec::new();
    distances[source] = 0.0;

    let mut heap = MinHeap::with_capacity(n);
    for (node_id, &distance) in distances.iter().enumerate() {
        heap.insert(HeapEntry::new(node_id, distance));
    }

    debug!(source, ?target, nodes = n, edges = graph.edge_count(), "starting search");

    while !heap.is_empty() {
        let HeapEntry { id: current, distance } = heap.extract_min()?;
        if distance.is_infinite() {
            // Everything left in the heap is unreachable.
            debug!(remaining = heap.len() + 1, "frontier exhausted");
            break;
        }
        visited.push(current);
        trace!(current, distance, "extracted");
        if Some(current) == target {
            break;
        }

        for edge in graph.outgoing(current) {
            let alt = distance + edge.distance;
            if alt < distances[edge.dest] {
                trace!(from = current, to = edge.dest, old = distances[edge.dest], new = alt, "relaxed");
                distances[edge.dest] = alt;
                previous[edge.dest] = Some(current);
                heap.update_key(edge.dest, alt);
            }
        }
    }

    Ok(Search {
        source,
        distances,
        previous,
        visited,
    })
}

/// Shortest path from `source` to `dest`, or `[dest]` with an infinite distance when unreachable.
pub fn shortest_path(graph: &Graph, source: NodeId, dest: NodeId) -> Result<ShortestPath, PathError> {
    let search = search(graph, source, Some(dest))?;
    let path = search.path_to(dest)?;
    let total_distance = search.distances[dest];
    debug!(source, dest, total_distance, hops = path.len(), "query finished");
    Ok(ShortestPath {
        source: search.source(),
        path,
        total_distance,
    })
}

/// Dijkstra from `source` to all nodes. Every distance is final; `f64::INFINITY` when unreachable.
pub fn shortest_path_tree(graph: &Graph, source: NodeId) -> Result<Search, PathError> {
    search(graph, source, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(n: usize, edges: &[(NodeId, NodeId, Cost)]) -> Graph {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.add_node(i as f64, 0.0);
        }
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w).unwrap();
        }
        graph
    }

    fn sample_graph() -> Graph {
        graph_from(4, &[(0, 1, 4.0), (0, 2, 1.0), (2, 1, 1.0), (1, 3, 1.0), (2, 3, 5.0)])
    }

    #[test]
    fn sample_path() {
        let result = shortest_path(&sample_graph(), 0, 3).unwrap();
        assert_eq!(result.path, vec![0, 2, 1, 3]);
        assert_eq!(result.total_distance, 3.0);
        assert!(result.is_reachable());
        assert_eq!(result.to_string(), "0 -> 2 -> 1 -> 3 (distance 3)");
    }

    #[test]
    fn unreachable_destination() {
        let graph = graph_from(2, &[]);
        let result = shortest_path(&graph, 0, 1).unwrap();
        assert_eq!(result.path, vec![1]);
        assert_eq!(result.total_distance, f64::INFINITY);
        assert!(!result.is_reachable());
        assert_eq!(result.source, 0);
        assert_eq!(result.to_string(), "node 1 is unreachable from node 0");
    }

    #[test]
    fn edges_point_the_wrong_way() {
        let graph = graph_from(3, &[(1, 0, 1.0), (2, 1, 1.0)]);
        let result = shortest_path(&graph, 0, 2).unwrap();
        assert_eq!(result.path, vec![2]);
        assert!(!result.is_reachable());
    }

    #[test]
    fn self_query() {
        let search = search(&sample_graph(), 0, Some(0)).unwrap();
        assert_eq!(search.visited(), &[0]);

        let result = shortest_path(&sample_graph(), 0, 0).unwrap();
        assert_eq!(result.path, vec![0]);
        assert_eq!(result.total_distance, 0.0);
    }

    #[test]
    fn parallel_edges_min_wins() {
        let graph = graph_from(2, &[(0, 1, 5.0), (0, 1, 2.0)]);
        let result = shortest_path(&graph, 0, 1).unwrap();
        assert_eq!(result.path, vec![0, 1]);
        assert_eq!(result.total_distance, 2.0);

        let graph = graph_from(2, &[(0, 1, 2.0), (0, 1, 5.0)]);
        assert_eq!(shortest_path(&graph, 0, 1).unwrap().total_distance, 2.0);
    }

    #[test]
    fn out_of_range_ids() {
        let graph = sample_graph();
        assert_eq!(
            shortest_path(&graph, 4, 0),
            Err(PathError::OutOfRange { id: 4, node_count: 4 })
        );
        assert_eq!(
            shortest_path(&graph, 0, 9),
            Err(PathError::OutOfRange { id: 9, node_count: 4 })
        );
        assert!(shortest_path(&Graph::new(), 0, 0).is_err());
    }

    #[test]
    fn repeated_queries_agree() {
        let graph = sample_graph();
        let first = shortest_path(&graph, 0, 3).unwrap();
        let second = shortest_path(&graph, 0, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn early_exit_leaves_later_nodes_unsettled() {
        // 0 -> 1 -> 2 -> 3, query stops at 1.
        let graph = graph_from(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        let partial = search(&graph, 0, Some(1)).unwrap();
        assert_eq!(partial.distances(), &[0.0, 1.0, f64::INFINITY, f64::INFINITY]);
        assert_eq!(partial.previous(2), None);

        let full = shortest_path_tree(&graph, 0).unwrap();
        assert_eq!(full.source(), 0);
        assert_eq!(full.distances(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(full.path_to(3).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(full.visited(), &[0, 1, 2, 3]);
    }

    #[test]
    fn disconnected_components() {
        let graph = graph_from(6, &[(0, 1, 2.0), (1, 2, 2.0), (3, 4, 1.0), (4, 5, 1.0)]);
        let tree = shortest_path_tree(&graph, 0).unwrap();
        assert_eq!(tree.distance(2), Some(4.0));
        for node_id in 3..6 {
            assert_eq!(tree.distance(node_id), Some(f64::INFINITY));
            assert_eq!(tree.path_to(node_id).unwrap(), vec![node_id]);
        }
        assert_eq!(tree.distance(6), None);
        assert!(tree.path_to(6).is_err());
    }

    #[test]
    fn larger_sample_graph() {
        let graph = graph_from(
            11,
            &[
                (0, 1, 0.5),
                (0, 2, 1.0),
                (0, 7, 5.0),
                (1, 3, 3.0),
                (1, 4, 2.0),
                (2, 4, 3.0),
                (2, 5, 2.0),
                (3, 6, 2.0),
                (4, 6, 2.0),
                (6, 8, 3.0),
                (7, 9, 2.0),
                (8, 10, 1.0),
                (9, 10, 2.0),
            ],
        );
        let tree = shortest_path_tree(&graph, 0).unwrap();
        assert_eq!(
            tree.distances(),
            &[0.0, 0.5, 1.0, 3.5, 2.5, 3.0, 4.5, 5.0, 7.5, 7.0, 8.5]
        );
        assert_eq!(tree.path_to(10).unwrap(), vec![0, 1, 4, 6, 8, 10]);
        assert_eq!(shortest_path(&graph, 0, 10).unwrap().total_distance, 8.5);
    }
}
