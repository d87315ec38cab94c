pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod load;
pub mod min_heap;
pub mod session;

pub use dijkstra::{search, shortest_path, shortest_path_tree, Search, ShortestPath};
pub use error::PathError;
pub use graph::{Cost, Edge, Graph, Node, NodeId};
pub use min_heap::{HeapEntry, MinHeap};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber used by both binaries.
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 if quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG, when set, overrides the flags.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
