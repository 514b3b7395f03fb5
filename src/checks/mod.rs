//! Built-in consistency checks and the name registry.
//!
//! Each check pairs a name with a description and an action. Query checks
//! supply a base traversal builder; the runner threads it through the
//! reporting pipeline. Clean checks are log-only commands wrapped by the
//! line-counting variant.
//!
//! Check names follow the `<kind>_<subject>` convention ("check_...",
//! "clean_..."); the first segment becomes the `type` field of the JSON
//! outcome record.

use chrono::Utc;

use crate::error::CheckError;
use crate::graph::Traversal;
use crate::pipeline::{count_lines, measure, report, stale_window, to_resources, CheckContext};
use crate::resource::Resource;

/// How a check produces its result.
#[derive(Debug)]
pub enum CheckAction {
    /// Build a traversal; the pipeline projects and reports the matches.
    Query {
        build: fn(&CheckContext) -> Result<Traversal, CheckError>,
        /// Apply the five-minute staleness window before execution
        windowed: bool,
    },
    /// Log-only command; output lines are counted for JSON encoding.
    Clean(fn(&CheckContext) -> Result<(), CheckError>),
}

/// A named consistency check.
#[derive(Debug)]
pub struct Check {
    pub name: &'static str,
    /// Human description, used in the "Found N <description>:" summary
    pub description: &'static str,
    pub action: CheckAction,
}

/// All registered checks, in execution order.
pub fn registry() -> Vec<Check> {
    vec![
        Check {
            name: "check_missing_resources",
            description: "resources referenced but missing",
            action: CheckAction::Query {
                build: missing_resources,
                windowed: false,
            },
        },
        Check {
            name: "check_unknown_parents",
            description: "resources with missing parent",
            action: CheckAction::Query {
                build: unknown_parents,
                windowed: false,
            },
        },
        Check {
            name: "check_vn_without_ri",
            description: "virtual networks without routing instance",
            action: CheckAction::Query {
                build: vn_without_ri,
                windowed: true,
            },
        },
        Check {
            name: "check_ri_without_rt",
            description: "routing instances without route target",
            action: CheckAction::Query {
                build: ri_without_rt,
                windowed: true,
            },
        },
        Check {
            name: "clean_orphaned_acl",
            description: "orphaned access control lists",
            action: CheckAction::Clean(clean_orphaned_acl),
        },
    ]
}

/// Look up a check by name.
pub fn lookup(name: &str) -> Result<Check, CheckError> {
    registry()
        .into_iter()
        .find(|c| c.name == name)
        .ok_or_else(|| CheckError::NotFound(format!("no check named {}", name)))
}

/// Run one check through the full pipeline
/// (measure → report → to_resources → stale_window → base builder).
///
/// Returns whether the run succeeded; in human-readable mode failures
/// propagate instead.
pub fn run_check(ctx: &CheckContext, check: &Check) -> Result<bool, CheckError> {
    match &check.action {
        CheckAction::Query { build, windowed } => {
            let measured = measure(ctx, check.name, || {
                let mut t = build(ctx)?;
                if *windowed {
                    t = stale_window(t, Utc::now().timestamp());
                }
                let resources = to_resources(ctx, &t)?;
                Ok(report(ctx, check.description, resources))
            })?;
            Ok(measured.success())
        }
        CheckAction::Clean(run) => {
            let measured = measure(ctx, check.name, || count_lines(ctx, || run(ctx)))?;
            Ok(measured.success())
        }
    }
}

/// Placeholder vertices created for references whose target was never seen.
fn missing_resources(_ctx: &CheckContext) -> Result<Traversal, CheckError> {
    Ok(Traversal::v().has_prop("_missing"))
}

/// Resources whose parent vertex is such a placeholder.
fn unknown_parents(_ctx: &CheckContext) -> Result<Traversal, CheckError> {
    Ok(Traversal::v()
        .has_not_prop("_missing")
        .where_out("parent", Traversal::v().has_prop("_missing")))
}

/// Virtual networks with no routing instance child.
fn vn_without_ri(_ctx: &CheckContext) -> Result<Traversal, CheckError> {
    Ok(Traversal::v()
        .has_label("virtual_network")
        .where_no_in("parent", Traversal::v().has_label("routing_instance")))
}

/// Routing instances with no route target ref.
fn ri_without_rt(_ctx: &CheckContext) -> Result<Traversal, CheckError> {
    Ok(Traversal::v()
        .has_label("routing_instance")
        .where_no_out("ref", Traversal::v().has_label("route_target")))
}

/// Remove access control lists that lost their parent, logging each removal.
fn clean_orphaned_acl(ctx: &CheckContext) -> Result<(), CheckError> {
    let t = Traversal::v()
        .has_label("access_control_list")
        .where_no_out("parent", Traversal::v());
    let rows = ctx.graph.rows(&t)?;
    for row in &rows {
        let resource = Resource::from_row(row);
        ctx.graph.remove(&row.id)?;
        ctx.sink.info(
            "clean_orphaned_acl",
            &format!("Removed orphaned {}/{}", resource.resource_type, resource.uuid),
        );
    }
    Ok(())
}
