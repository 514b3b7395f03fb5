//! Run command implementation

use std::path::PathBuf;

use anyhow::Result;
use gremlin_fsck::{lookup, registry, run_check, Check, CheckContext, FsckConfig, InMemoryGraph, Sink};

pub fn run(graph_path: PathBuf, checks: Option<Vec<String>>, config: FsckConfig) -> Result<u8> {
    let graph = InMemoryGraph::load(&graph_path)?;

    let selected: Vec<Check> = match checks {
        Some(names) => names
            .iter()
            .map(|name| lookup(name))
            .collect::<Result<Vec<_>, _>>()?,
        None => registry(),
    };

    let sink = Sink::stdout();
    let ctx = CheckContext {
        graph: &graph,
        config: &config,
        sink: &sink,
    };

    let mut failed = 0usize;
    for check in &selected {
        if !run_check(&ctx, check)? {
            failed += 1;
        }
    }

    ctx.note("All checks done.");
    Ok(if failed == 0 { 0 } else { 1 })
}
