use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use ssp_query::load;
use ssp_query::session::{Command, Session, HELP};

#[derive(Parser, Debug)]
#[command(name = "ssp-repl")]
#[command(about = "Build a graph one node and edge at a time and query shortest paths interactively.", long_about = None)]
struct Cli {
    /// Start from the edges in this CSV (source,dest,distance) instead of an empty graph
    #[arg(short, long, env = "SSP_EDGES")]
    edges: Option<PathBuf>,

    /// Node CSV (id,x,y) to go with --edges
    #[arg(short, long, env = "SSP_NODES", requires = "edges")]
    nodes: Option<PathBuf>,

    /// Don't print the prompt (for piping scripts in)
    #[arg(long, default_value_t = false)]
    no_prompt: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ssp_query::init_logging(cli.verbose, cli.quiet);

    let mut session = match &cli.edges {
        Some(edges) => Session::with_graph(load::read_graph(cli.nodes.as_deref(), edges)?),
        None => Session::new(),
    };

    if !cli.no_prompt {
        println!("{}", HELP);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        if !cli.no_prompt {
            print!("> ");
            stdout.flush()?;
        }
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("Invalid input: {:#}", err);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match session.execute(&command) {
            Ok(output) => println!("{}", output),
            Err(err) => {
                debug!("{:?} failed: {:#}", command, err);
                println!("Invalid input: {:#}", err);
            }
        }
    }

    let graph = session.graph();
    info!(
        "Session ended with {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}
