/*
Directed weighted multigraph built up one node and one edge at a time.

Nodes get dense ids in insertion order. Edges are kept in a flat list and
outgoing edges are found by scanning it, so parallel edges between the same
pair are all visible to the search.
*/

use crate::error::PathError;

pub type NodeId = usize;
pub type Cost = f64;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub dest: NodeId,
    pub distance: Cost,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Adds a node at `(x, y)` and returns its id, which is the number of nodes before the call.
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { id, x, y });
        id
    }

    /// Adds a directed edge. Both endpoints must exist, differ from each other,
    /// and the distance must be a positive finite number.
    pub fn add_edge(&mut self, source: NodeId, dest: NodeId, distance: Cost) -> Result<(), PathError> {
        self.check_node(source)?;
        self.check_node(dest)?;
        if source == dest {
            return Err(PathError::SelfLoop(source));
        }
        if !(distance.is_finite() && distance > 0.0) {
            return Err(PathError::InvalidDistance(distance));
        }
        self.edges.push(Edge { source, dest, distance });
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    pub fn check_node(&self, id: NodeId) -> Result<(), PathError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(PathError::OutOfRange {
                id,
                node_count: self.nodes.len(),
            })
        }
    }

    /// Edges leaving `id`, in insertion order. Linear in the total number of edges.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.source == id)
    }
}
