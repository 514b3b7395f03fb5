//! Canonical typed representation of a cloud resource.

use serde::Serialize;

use crate::error::CheckError;
use crate::graph::{id_text, RawRow, VertexRecord};

/// A cloud-infrastructure entity: type, identifier, and fully-qualified name.
///
/// Immutable once constructed; the projection stage owns the only list of
/// these produced per check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Resource kind, with underscores normalized to hyphens
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Identifier in text form
    pub uuid: String,
    /// Fully-qualified name; empty when unknown
    pub fq_name: String,
}

impl Resource {
    /// Build a resource; underscores in `label` normalize to hyphens.
    pub fn new(label: &str, uuid: &str, fq_name: &str) -> Self {
        Resource {
            resource_type: label.replace('_', "-"),
            uuid: uuid.to_string(),
            fq_name: fq_name.to_string(),
        }
    }

    /// Project a raw traversal row into a resource.
    pub fn from_row(row: &RawRow) -> Self {
        Resource::new(&row.label, &id_text(&row.id), &row.fq_name)
    }

    /// Build a resource from a bare vertex.
    ///
    /// Errors when the vertex carries no label, since the resource type
    /// cannot be derived.
    pub fn from_vertex(v: &VertexRecord) -> Result<Self, CheckError> {
        if v.label.is_empty() {
            return Err(CheckError::Command(format!(
                "vertex {} has no label, cannot transform it to a resource",
                id_text(&v.id)
            )));
        }
        Ok(Resource::new(&v.label, &id_text(&v.id), ""))
    }
}
