//! Composable vertex queries over the resource graph.
//!
//! A [`Traversal`] is a pure value describing which vertices to select; the
//! graph engine interprets it. The step vocabulary is deliberately small:
//! label filters, property presence and predicates, and neighbor filters
//! along `parent`/`ref` edges, which is enough to express the shipped checks.

use serde_json::Value;

/// Predicate applied to a vertex property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Numeric less-than
    Lt(i64),
    /// Exact equality
    Eq(Value),
}

/// Edge direction for neighbor filters, relative to the filtered vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edges arriving at the vertex
    In,
    /// Edges leaving the vertex
    Out,
}

/// One filtering step of a traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep vertices with this label
    HasLabel(String),
    /// Keep vertices whose property satisfies the predicate
    Has(String, Predicate),
    /// Keep vertices carrying this property
    HasProp(String),
    /// Keep vertices not carrying this property
    HasNotProp(String),
    /// Keep vertices with at least one `edge`-neighbor matching the inner steps
    WhereNeighbor {
        direction: Direction,
        edge: String,
        steps: Vec<Step>,
    },
    /// Keep vertices with no `edge`-neighbor matching the inner steps
    WhereNoNeighbor {
        direction: Direction,
        edge: String,
        steps: Vec<Step>,
    },
}

/// A vertex query, built incrementally and executed by the graph engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traversal {
    steps: Vec<Step>,
}

impl Traversal {
    /// Start a traversal over all vertices.
    pub fn v() -> Self {
        Traversal { steps: Vec::new() }
    }

    /// Filter by vertex label.
    pub fn has_label(mut self, label: &str) -> Self {
        self.steps.push(Step::HasLabel(label.to_string()));
        self
    }

    /// Filter by a property predicate.
    pub fn has(mut self, prop: &str, pred: Predicate) -> Self {
        self.steps.push(Step::Has(prop.to_string(), pred));
        self
    }

    /// Keep vertices that carry `prop`.
    pub fn has_prop(mut self, prop: &str) -> Self {
        self.steps.push(Step::HasProp(prop.to_string()));
        self
    }

    /// Keep vertices that do not carry `prop`.
    pub fn has_not_prop(mut self, prop: &str) -> Self {
        self.steps.push(Step::HasNotProp(prop.to_string()));
        self
    }

    /// Keep vertices with an incoming `edge`-neighbor matching `inner`.
    pub fn where_in(mut self, edge: &str, inner: Traversal) -> Self {
        self.steps.push(Step::WhereNeighbor {
            direction: Direction::In,
            edge: edge.to_string(),
            steps: inner.steps,
        });
        self
    }

    /// Keep vertices with an outgoing `edge`-neighbor matching `inner`.
    pub fn where_out(mut self, edge: &str, inner: Traversal) -> Self {
        self.steps.push(Step::WhereNeighbor {
            direction: Direction::Out,
            edge: edge.to_string(),
            steps: inner.steps,
        });
        self
    }

    /// Keep vertices with no incoming `edge`-neighbor matching `inner`.
    pub fn where_no_in(mut self, edge: &str, inner: Traversal) -> Self {
        self.steps.push(Step::WhereNoNeighbor {
            direction: Direction::In,
            edge: edge.to_string(),
            steps: inner.steps,
        });
        self
    }

    /// Keep vertices with no outgoing `edge`-neighbor matching `inner`.
    pub fn where_no_out(mut self, edge: &str, inner: Traversal) -> Self {
        self.steps.push(Step::WhereNoNeighbor {
            direction: Direction::Out,
            edge: edge.to_string(),
            steps: inner.steps,
        });
        self
    }

    /// The accumulated filter steps, in application order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
