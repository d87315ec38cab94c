/*
Line-oriented session for building a graph by hand and querying it.

  node <x> <y>                   add a node, prints its id
  edge <source> <dest> <dist>    add a directed edge
  path <source> <dest>           shortest path between two nodes
  show                           list nodes and edges
  help                           list commands

Every command returns the text to print. Bad input is reported as an error and
leaves the graph untouched.
*/

use std::fmt::Write;

use anyhow::{anyhow, bail, Context, Result};

use crate::dijkstra::shortest_path;
use crate::graph::{Cost, Graph, NodeId};

pub const HELP: &str = "\
commands:
  node <x> <y>
  edge <source> <dest> <distance>
  path <source> <dest>
  show
  help
  quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Node { x: f64, y: f64 },
    Edge { source: NodeId, dest: NodeId, distance: Cost },
    Path { source: NodeId, dest: NodeId },
    Show,
    Help,
    Quit,
}

fn arg<T: std::str::FromStr>(args: &[&str], index: usize, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(index)
        .ok_or_else(|| anyhow!("missing <{}>", name))?;
    raw.parse().with_context(|| format!("bad <{}>: {:?}", name, raw))
}

impl Command {
    /// Parses one input line. Blank lines and `#` comments give `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = (words[0], &words[1..]);
        let expected = match name {
            "node" | "path" => 2,
            "edge" => 3,
            "show" | "help" | "quit" | "exit" => 0,
            other => bail!("unknown command `{}` (try `help`)", other),
        };
        if args.len() != expected {
            bail!("`{}` takes {} argument(s), got {}", name, expected, args.len());
        }
        let command = match name {
            "node" => Command::Node {
                x: arg(args, 0, "x")?,
                y: arg(args, 1, "y")?,
            },
            "edge" => Command::Edge {
                source: arg(args, 0, "source")?,
                dest: arg(args, 1, "dest")?,
                distance: arg(args, 2, "distance")?,
            },
            "path" => Command::Path {
                source: arg(args, 0, "source")?,
                dest: arg(args, 1, "dest")?,
            },
            "show" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command `{}` (try `help`)", other),
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Default)]
pub struct Session {
    graph: Graph,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match *command {
            Command::Node { x, y } => {
                let id = self.graph.add_node(x, y);
                Ok(format!("added node {}", id))
            }
            Command::Edge { source, dest, distance } => {
                self.graph.add_edge(source, dest, distance)?;
                Ok(format!("added edge {} -> {} ({})", source, dest, distance))
            }
            Command::Path { source, dest } => {
                let result = shortest_path(&self.graph, source, dest)?;
                if result.is_reachable() {
                    Ok(format!(
                        "Shortest Path: {}\nTotal Distance: {}",
                        result.hops(),
                        result.total_distance
                    ))
                } else {
                    Ok(result.to_string())
                }
            }
            Command::Show => Ok(self.describe()),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Parses and runs one line. `Ok(None)` for blank lines and comments.
    pub fn run_line(&mut self, line: &str) -> Result<Option<String>> {
        match Command::parse(line)? {
            Some(command) => self.execute(&command).map(Some),
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} nodes, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        for node in self.graph.nodes() {
            let _ = writeln!(out, "  node {} at ({}, {})", node.id, node.x, node.y);
        }
        for edge in self.graph.edges() {
            let _ = writeln!(out, "  edge {} -> {} ({})", edge.source, edge.dest, edge.distance);
        }
        out.trim_end().to_string()
    }
}
