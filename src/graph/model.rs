//! In-memory property graph loaded from a JSON dump.
//!
//! The dump format is a flat object with `vertices` and `edges` arrays.
//! Vertices keep their dump order, and traversal results follow it, so check
//! output is deterministic for a given dump. Edges are directed: `out_v`
//! points at `in_v` (a routing instance's `parent` edge points at its
//! virtual network).

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CheckError;
use crate::graph::traversal::{Direction, Predicate, Step, Traversal};
use crate::graph::{id_text, GraphEngine, RawRow};

/// One vertex record in a graph dump file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VertexRecord {
    /// Graph identifier; any string-convertible JSON value
    pub id: Value,
    /// Resource kind label; may be empty for malformed dumps
    #[serde(default)]
    pub label: String,
    /// Arbitrary properties (`updated`, `fq_name`, `_missing`, ...)
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

/// One directed edge record; `out_v` points at `in_v`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub label: String,
    pub out_v: Value,
    pub in_v: Value,
}

/// On-disk dump format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDump {
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

struct GraphData {
    vertices: Vec<VertexRecord>,
    index: HashMap<String, usize>,
    // id key -> (edge label, neighbor id key)
    out_edges: HashMap<String, Vec<(String, String)>>,
    in_edges: HashMap<String, Vec<(String, String)>>,
}

impl GraphData {
    fn vertex_by_key(&self, key: &str) -> Option<&VertexRecord> {
        self.index.get(key).map(|&i| &self.vertices[i])
    }
}

/// Graph engine backed by an in-memory vertex/edge store.
pub struct InMemoryGraph {
    data: RefCell<GraphData>,
}

impl InMemoryGraph {
    /// Build a graph from a dump.
    pub fn new(dump: GraphDump) -> Self {
        let index = dump
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (id_text(&v.id), i))
            .collect();

        let mut out_edges: HashMap<String, Vec<(String, String)>> = HashMap::new();
        let mut in_edges: HashMap<String, Vec<(String, String)>> = HashMap::new();
        for e in &dump.edges {
            let out_key = id_text(&e.out_v);
            let in_key = id_text(&e.in_v);
            out_edges
                .entry(out_key.clone())
                .or_default()
                .push((e.label.clone(), in_key.clone()));
            in_edges
                .entry(in_key)
                .or_default()
                .push((e.label.clone(), out_key));
        }

        InMemoryGraph {
            data: RefCell::new(GraphData {
                vertices: dump.vertices,
                index,
                out_edges,
                in_edges,
            }),
        }
    }

    /// Load a graph dump from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read graph dump {}", path.display()))?;
        let dump: GraphDump = serde_json::from_str(&text)
            .with_context(|| format!("invalid graph dump {}", path.display()))?;
        Ok(InMemoryGraph::new(dump))
    }

    /// Number of vertices currently stored.
    pub fn vertex_count(&self) -> usize {
        self.data.borrow().vertices.len()
    }
}

impl GraphEngine for InMemoryGraph {
    fn rows(&self, t: &Traversal) -> Result<Vec<RawRow>, CheckError> {
        let data = self.data.borrow();
        let mut rows = Vec::new();
        for v in &data.vertices {
            if matches(&data, v, t.steps()) {
                let fq_name = v
                    .properties
                    .get("fq_name")
                    .map(fq_name_text)
                    .unwrap_or_default();
                rows.push(RawRow {
                    label: v.label.clone(),
                    id: v.id.clone(),
                    fq_name,
                });
            }
        }
        Ok(rows)
    }

    fn remove(&self, id: &Value) -> Result<bool, CheckError> {
        let mut data = self.data.borrow_mut();
        let key = id_text(id);
        if !data.index.contains_key(&key) {
            return Ok(false);
        }
        data.vertices.retain(|v| id_text(&v.id) != key);
        let rebuilt: HashMap<String, usize> = data
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (id_text(&v.id), i))
            .collect();
        data.index = rebuilt;
        // edges pointing at the removed vertex resolve to nothing during matching
        data.out_edges.remove(&key);
        data.in_edges.remove(&key);
        Ok(true)
    }
}

fn matches(data: &GraphData, v: &VertexRecord, steps: &[Step]) -> bool {
    steps.iter().all(|step| match step {
        Step::HasLabel(label) => v.label == *label,
        Step::Has(prop, pred) => v
            .properties
            .get(prop)
            .map_or(false, |val| pred_matches(pred, val)),
        Step::HasProp(prop) => v.properties.contains_key(prop),
        Step::HasNotProp(prop) => !v.properties.contains_key(prop),
        Step::WhereNeighbor {
            direction,
            edge,
            steps,
        } => has_neighbor(data, v, *direction, edge, steps),
        Step::WhereNoNeighbor {
            direction,
            edge,
            steps,
        } => !has_neighbor(data, v, *direction, edge, steps),
    })
}

fn pred_matches(pred: &Predicate, val: &Value) -> bool {
    match pred {
        Predicate::Lt(cutoff) => val.as_i64().map_or(false, |n| n < *cutoff),
        Predicate::Eq(expected) => val == expected,
    }
}

fn has_neighbor(
    data: &GraphData,
    v: &VertexRecord,
    direction: Direction,
    edge_label: &str,
    inner: &[Step],
) -> bool {
    let key = id_text(&v.id);
    let edges = match direction {
        Direction::Out => &data.out_edges,
        Direction::In => &data.in_edges,
    };
    edges.get(&key).map_or(false, |neighbors| {
        neighbors.iter().any(|(label, neighbor_key)| {
            label == edge_label
                && data
                    .vertex_by_key(neighbor_key)
                    .map_or(false, |n| matches(data, n, inner))
        })
    })
}

/// Render a `fq_name` property as text: strings pass through, lists join
/// their segments with `:`.
fn fq_name_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(":"),
        other => other.to_string(),
    }
}
