use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use crate::graph::{Cost, Graph, NodeId};

/// Reads `id,x,y` rows. Ids have to be dense and in order since `Graph` assigns them itself.
fn read_nodes(path: &Path, graph: &mut Graph) -> Result<()> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = row + 2;
        if record.len() < 3 {
            bail!("{}:{}: expected id,x,y", path.display(), line);
        }
        let id: NodeId = record[0]
            .parse()
            .with_context(|| format!("{}:{}: bad node id {:?}", path.display(), line, &record[0]))?;
        let x: f64 = record[1]
            .parse()
            .with_context(|| format!("{}:{}: bad x {:?}", path.display(), line, &record[1]))?;
        let y: f64 = record[2]
            .parse()
            .with_context(|| format!("{}:{}: bad y {:?}", path.display(), line, &record[2]))?;
        let expected = graph.node_count();
        if id != expected {
            bail!("{}:{}: node id {} out of order, expected {}", path.display(), line, id, expected);
        }
        graph.add_node(x, y);
    }
    Ok(())
}

fn read_edges(path: &Path) -> Result<Vec<(NodeId, NodeId, Cost)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut edges = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = row + 2;
        if record.len() < 3 {
            bail!("{}:{}: expected source,dest,distance", path.display(), line);
        }
        let source: NodeId = record[0]
            .parse()
            .with_context(|| format!("{}:{}: bad source {:?}", path.display(), line, &record[0]))?;
        let dest: NodeId = record[1]
            .parse()
            .with_context(|| format!("{}:{}: bad dest {:?}", path.display(), line, &record[1]))?;
        let distance: Cost = record[2]
            .parse()
            .with_context(|| format!("{}:{}: bad distance {:?}", path.display(), line, &record[2]))?;
        edges.push((source, dest, distance));
    }
    Ok(edges)
}

/// Largest graph an edge file may imply on its own; bigger graphs need a node file.
pub const MAX_IMPLIED_NODES: usize = 1 << 24;

// max endpoint + 1, refusing ids that would overflow or allocate an absurd number of nodes.
fn implied_node_count(path: &Path, edge_rows: &[(NodeId, NodeId, Cost)]) -> Result<usize> {
    let mut node_count = 0;
    for (row, &(u, v, _)) in edge_rows.iter().enumerate() {
        let needed = match u.max(v).checked_add(1) {
            Some(needed) if needed <= MAX_IMPLIED_NODES => needed,
            _ => bail!(
                "{}:{}: node id {} is too large without a node file (limit {})",
                path.display(),
                row + 2,
                u.max(v),
                MAX_IMPLIED_NODES
            ),
        };
        node_count = node_count.max(needed);
    }
    Ok(node_count)
}

/// Builds a graph from an edge list CSV (`source,dest,distance`) and an optional node CSV (`id,x,y`).
///
/// Without a node file the graph gets `max endpoint + 1` nodes, all at the origin.
pub fn read_graph(nodes: Option<&Path>, edges: &Path) -> Result<Graph> {
    let edge_rows = read_edges(edges)?;

    let mut graph = match nodes {
        Some(path) => {
            let mut graph = Graph::with_capacity(0, edge_rows.len());
            read_nodes(path, &mut graph)?;
            graph
        }
        None => {
            let node_count = implied_node_count(edges, &edge_rows)?;
            let mut graph = Graph::with_capacity(node_count, edge_rows.len());
            for _ in 0..node_count {
                graph.add_node(0.0, 0.0);
            }
            graph
        }
    };

    for (row, &(source, dest, distance)) in edge_rows.iter().enumerate() {
        graph
            .add_edge(source, dest, distance)
            .with_context(|| format!("{}:{}: rejected edge", edges.display(), row + 2))?;
    }

    info!(
        "Graph: {} nodes, {} directed edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn edges_only() {
        let edges = csv_file("source,dest,distance\n0,1,4\n0,2,1\n2,1,1\n1,3,1\n2,3,5\n");
        let graph = read_graph(None, edges.path()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.edges()[2].distance, 1.0);
    }

    #[test]
    fn nodes_and_edges() {
        let nodes = csv_file("id,x,y\n0, 10.5, 20\n1, 30, 40\n2, 0, 0\n");
        let edges = csv_file("source,dest,distance\n0,1,2.5\n");
        let graph = read_graph(Some(nodes.path()), edges.path()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node(0).map(|n| (n.x, n.y)), Some((10.5, 20.0)));
        assert_eq!(graph.outgoing(0).count(), 1);
    }

    #[test]
    fn empty_edge_file() {
        let edges = csv_file("source,dest,distance\n");
        let graph = read_graph(None, edges.path()).unwrap();
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn bad_rows_are_reported() {
        let edges = csv_file("source,dest,distance\n0,1,2\n1,1,3\n");
        let err = read_graph(None, edges.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("self loop"));

        let edges = csv_file("source,dest,distance\n0,1,1\n18446744073709551615,0,1\n");
        let err = read_graph(None, edges.path()).unwrap_err();
        assert!(err.to_string().contains(":3: node id 18446744073709551615 is too large"));

        let edges = csv_file("source,dest,distance\n0,4000000000,1\n");
        assert!(read_graph(None, edges.path()).is_err());

        let edges = csv_file("source,dest,distance\n0,x,2\n");
        assert!(read_graph(None, edges.path()).is_err());

        let nodes = csv_file("id,x,y\n1,0,0\n");
        let edges = csv_file("source,dest,distance\n");
        let err = read_graph(Some(nodes.path()), edges.path()).unwrap_err();
        assert!(err.to_string().contains("out of order"));

        let nodes = csv_file("id,x,y\n0,0,0\n1,0,0\n");
        let edges = csv_file("source,dest,distance\n0,2,1\n");
        assert!(read_graph(Some(nodes.path()), edges.path()).is_err());
    }
}
