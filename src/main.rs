use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;
use ordered_float::OrderedFloat;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use ssp_query::{load, shortest_path, shortest_path_tree, Cost, NodeId};

#[derive(Parser, Debug)]
#[command(name = "ssp")]
#[command(about = "Load a graph from CSV and find the shortest path between two node ids.", long_about = None)]
struct Cli {
    /// Edge list CSV with header source,dest,distance
    #[arg(short, long, env = "SSP_EDGES")]
    edges: PathBuf,

    /// Optional node CSV with header id,x,y. Without it, node count is max endpoint + 1.
    #[arg(short, long, env = "SSP_NODES")]
    nodes: Option<PathBuf>,

    /// Source node id
    #[arg(short, long)]
    source: NodeId,

    /// Destination node id
    #[arg(short, long)]
    dest: NodeId,

    /// Output CSV (node_id, distance) for every node, computed without stopping at the destination.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Include unreachable nodes in the output CSV with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn write_distances(out_path: &Path, distances: &[Cost], include_unreachable: bool) -> Result<usize> {
    let mut wtr = Writer::from_path(out_path)
        .with_context(|| format!("creating CSV {}", out_path.display()))?;
    wtr.write_record(["node_id", "distance"])?;

    let mut dist_with_idx: Vec<(usize, Cost)> = distances.iter().copied().enumerate().collect();
    dist_with_idx.sort_by_key(|&(idx, d)| (OrderedFloat(d), idx));

    let mut written = 0;
    for (idx, d) in dist_with_idx {
        if d.is_finite() || include_unreachable {
            let val = if d.is_finite() {
                d.to_string()
            } else {
                String::from("inf")
            };
            wtr.write_record(&[idx.to_string(), val])?;
            written += 1;
        }
    }
    wtr.flush()?;
    Ok(written)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ssp_query::init_logging(cli.verbose, cli.quiet);

    let graph = load::read_graph(cli.nodes.as_deref(), &cli.edges)?;

    let now = Instant::now();
    let result = shortest_path(&graph, cli.source, cli.dest)
        .with_context(|| format!("querying {} -> {}", cli.source, cli.dest))?;
    info!("query took {:.3} ms", now.elapsed().as_secs_f64() * 1000.0);

    if result.is_reachable() {
        println!("Shortest Path: {}", result.hops());
        println!("Total Distance: {}", result.total_distance);
    } else {
        println!("{}", result);
    }

    if let Some(out_path) = cli.out {
        let tree = shortest_path_tree(&graph, cli.source)?;
        let written = write_distances(&out_path, tree.distances(), cli.include_unreachable)?;
        let reachable = tree.distances().iter().filter(|d| d.is_finite()).count();
        info!(
            "Wrote distances for {} nodes ({} reachable from {}) to {}",
            written,
            reachable,
            cli.source,
            out_path.display()
        );
    }

    Ok(())
}
