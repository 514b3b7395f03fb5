//! Resource graph model, traversal values, and the engine boundary.

pub mod model;
pub mod traversal;

use serde_json::Value;

use crate::error::CheckError;

pub use model::{EdgeRecord, GraphDump, InMemoryGraph, VertexRecord};
pub use traversal::{Direction, Predicate, Step, Traversal};

/// Raw projection of one matched element: label, identifier, and the
/// first-available fully-qualified name (empty when absent).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub label: String,
    pub id: Value,
    pub fq_name: String,
}

/// Engine boundary: executes traversals and yields raw rows.
///
/// The pipeline treats this as opaque; result ordering follows the engine's
/// storage order and is preserved end to end.
pub trait GraphEngine {
    /// Execute `t`, projecting every matched element into a raw row.
    fn rows(&self, t: &Traversal) -> Result<Vec<RawRow>, CheckError>;

    /// Remove a vertex by identifier; true when something was removed.
    fn remove(&self, id: &Value) -> Result<bool, CheckError>;
}

/// Convert a graph identifier to its text form.
///
/// String identifiers pass through unquoted; anything else uses its JSON
/// rendering (so the numeric id `42` becomes `"42"`).
pub fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
