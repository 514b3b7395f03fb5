//! gremlin-fsck: consistency checks for a cloud resource graph.
//!
//! Checks run through a result-reporting pipeline whose stages compose in a
//! fixed order, outermost first:
//!
//! ```text
//! measure -> report -> to_resources -> stale_window -> base traversal builder
//! ```
//!
//! The measurement stage drives the two output modes. In human-readable mode
//! findings print directly and failures propagate to the caller. In JSON mode
//! (`--output json`) all text a check produces is captured, and each check
//! emits exactly one structured JSON line summarizing its outcome (see
//! [`output::CheckOutcome`]).
//!
//! # Execution Model
//!
//! Everything is single-threaded and synchronous: checks block on the graph
//! engine and the only shared state is the output [`output::Sink`], whose
//! capture sessions restore the previous destination on every exit path.
//!
//! # Graph Dumps
//!
//! The in-memory engine loads a JSON dump of vertices and `parent`/`ref`
//! edges (see [`graph::GraphDump`]); traversal results follow the dump's
//! vertex order, so check output is deterministic for a given dump.

pub mod checks;
pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod resource;

pub use checks::{lookup, registry, run_check, Check, CheckAction};
pub use config::{FsckConfig, DEFAULT_GREMLIN_SERVER, DEFAULT_ZK_SERVER};
pub use error::CheckError;
pub use graph::{
    id_text, EdgeRecord, GraphDump, GraphEngine, InMemoryGraph, Predicate, RawRow, Step,
    Traversal, VertexRecord,
};
pub use output::{CheckOutcome, OutputFormat, Sink, APPLICATION};
pub use pipeline::{
    count_lines, measure, report, stale_window, to_resources, CheckContext, CountTotal,
    LineCount, Measured, STALE_WINDOW_SECS,
};
pub use resource::Resource;
