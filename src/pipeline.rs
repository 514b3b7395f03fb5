//! Result-reporting pipeline for consistency checks.
//!
//! Stages compose in a fixed order, outermost first:
//!
//! ```text
//! measure -> report -> to_resources -> stale_window -> base traversal builder
//! ```
//!
//! Each stage is a standalone function so callers (and tests) can exercise
//! them individually; [`crate::checks::run_check`] wires them together. The
//! [`count_lines`] variant replaces the projection and reporting stages for
//! commands whose only contribution is log output.
//!
//! Mode handling: in human-readable mode failures propagate unchanged and
//! nothing is swallowed. In JSON mode the measurement stage captures all
//! output, converts any failure into a `success:false` outcome record, and
//! emits exactly one JSON line per invocation.

use std::time::Instant;

use crate::config::FsckConfig;
use crate::error::CheckError;
use crate::graph::{GraphEngine, Predicate, Traversal};
use crate::output::{CheckOutcome, Sink};
use crate::resource::Resource;

/// Entities updated within this trailing window are considered in-flight and
/// skipped by windowed checks.
pub const STALE_WINDOW_SECS: i64 = 5 * 60;

/// Shared context threaded through every stage.
pub struct CheckContext<'a> {
    pub graph: &'a dyn GraphEngine,
    pub config: &'a FsckConfig,
    pub sink: &'a Sink,
}

impl CheckContext<'_> {
    /// Write an informational line, suppressed in JSON mode.
    pub fn note(&self, line: &str) {
        if !self.config.json_output() {
            self.sink.write_line(line);
        }
    }
}

/// Time-window filter stage: constrain the traversal to entities whose
/// `updated` timestamp predates `now` by more than the staleness window.
///
/// `now` is supplied by the caller on every invocation, so repeated runs see
/// a fresh cutoff.
pub fn stale_window(t: Traversal, now: i64) -> Traversal {
    t.has("updated", Predicate::Lt(now - STALE_WINDOW_SECS))
}

/// Projection stage: execute the traversal and map each raw row into a
/// [`Resource`], preserving the engine's result ordering. An empty result is
/// not an error.
pub fn to_resources(ctx: &CheckContext, t: &Traversal) -> Result<Vec<Resource>, CheckError> {
    let rows = ctx.graph.rows(t)?;
    Ok(rows.iter().map(Resource::from_row).collect())
}

/// Reporting stage: summarize a non-empty result list on the sink, then hand
/// the list back unchanged.
///
/// In JSON mode the sink is already captured by the measurement stage, so
/// these lines end up in the outcome record's `output` field.
pub fn report(ctx: &CheckContext, description: &str, resources: Vec<Resource>) -> Vec<Resource> {
    if !resources.is_empty() {
        ctx.sink
            .write_line(&format!("Found {} {}:", resources.len(), description.trim()));
        for r in &resources {
            ctx.sink
                .write_line(&format!("  - {}/{} - {}", r.resource_type, r.uuid, r.fq_name));
        }
    }
    resources
}

/// Result types the measurement stage can derive a `total` from.
pub trait CountTotal {
    fn total(&self) -> i64;
}

impl CountTotal for Vec<Resource> {
    fn total(&self) -> i64 {
        self.len() as i64
    }
}

impl CountTotal for LineCount {
    fn total(&self) -> i64 {
        self.len() as i64
    }
}

impl CountTotal for () {
    fn total(&self) -> i64 {
        1
    }
}

/// Proxy count returned by [`count_lines`]: the integers `1..newline_count`.
///
/// The sequence has no meaning beyond feeding the measurement stage's length
/// derivation; with `k` newlines in the captured output its length is
/// `k - 1` (empty for zero or one newline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCount(Vec<usize>);

impl LineCount {
    fn from_output(output: &str) -> Self {
        let newlines = output.matches('\n').count();
        LineCount((1..newlines).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of running a stage chain through the measurement stage.
#[derive(Debug)]
pub struct Measured<T> {
    /// The chain's value; `None` only when JSON mode swallowed a failure
    pub value: Option<T>,
    /// Outcome record; present in JSON mode only
    pub outcome: Option<CheckOutcome>,
}

impl<T> Measured<T> {
    /// False only for a swallowed JSON-mode failure.
    pub fn success(&self) -> bool {
        self.outcome.as_ref().map_or(true, |o| o.success)
    }
}

/// Measurement/encoding stage.
///
/// Human-readable mode runs the chain directly and lets failures propagate
/// unchanged. JSON mode captures the sink for the duration of the call,
/// times it, converts a failure into the `-1` sentinel with the error text
/// as output, restores the sink, and emits the outcome as one JSON line.
/// The chain's value is returned either way for caller-side use.
pub fn measure<T, F>(ctx: &CheckContext, name: &str, f: F) -> Result<Measured<T>, CheckError>
where
    T: CountTotal,
    F: FnOnce() -> Result<T, CheckError>,
{
    if !ctx.config.json_output() {
        return Ok(Measured {
            value: Some(f()?),
            outcome: None,
        });
    }

    let session = ctx.sink.capture();
    let start = Instant::now();
    let result = f();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (value, total) = match result {
        Ok(v) => {
            let total = v.total();
            (Some(v), total)
        }
        Err(e) => {
            // failure text becomes the captured output
            ctx.sink.write_line(&e.to_string());
            (None, -1)
        }
    };

    let output = session.end();
    let outcome = CheckOutcome::new(name, total, output, duration_ms);
    ctx.sink.write_line(&outcome.to_json_line()?);
    Ok(Measured {
        value,
        outcome: Some(outcome),
    })
}

/// Line-counting variant for log-only commands.
///
/// Captures everything the wrapped command writes or logs, replays the
/// buffer on the real sink, and returns a [`LineCount`] proxy for JSON
/// encoding. Redirection is torn down on every exit path; failures re-signal
/// as a uniform command error carrying the original message.
pub fn count_lines<F>(ctx: &CheckContext, f: F) -> Result<LineCount, CheckError>
where
    F: FnOnce() -> Result<(), CheckError>,
{
    let session = ctx.sink.capture();
    match f() {
        Ok(()) => {
            let output = session.end();
            ctx.sink.write_line(&output);
            Ok(LineCount::from_output(&output))
        }
        Err(e) => {
            drop(session);
            Err(CheckError::Command(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RawRow;
    use crate::output::OutputFormat;
    use serde_json::{json, Value};

    struct StaticEngine {
        labels: Vec<(&'static str, Value, &'static str)>,
    }

    impl GraphEngine for StaticEngine {
        fn rows(&self, _t: &Traversal) -> Result<Vec<RawRow>, CheckError> {
            Ok(self
                .labels
                .iter()
                .map(|(label, id, fq_name)| RawRow {
                    label: label.to_string(),
                    id: id.clone(),
                    fq_name: fq_name.to_string(),
                })
                .collect())
        }

        fn remove(&self, _id: &Value) -> Result<bool, CheckError> {
            Ok(false)
        }
    }

    struct FailingEngine;

    impl GraphEngine for FailingEngine {
        fn rows(&self, _t: &Traversal) -> Result<Vec<RawRow>, CheckError> {
            Err(CheckError::NotFound("virtual network vn-x".to_string()))
        }

        fn remove(&self, _id: &Value) -> Result<bool, CheckError> {
            Ok(false)
        }
    }

    fn human_config() -> FsckConfig {
        FsckConfig::default()
    }

    fn json_config() -> FsckConfig {
        FsckConfig {
            output_format: OutputFormat::Json,
            ..FsckConfig::default()
        }
    }

    fn two_network_engine() -> StaticEngine {
        StaticEngine {
            labels: vec![
                ("virtual_network", json!(42), "vn1"),
                ("virtual_network", json!(43), ""),
            ],
        }
    }

    #[test]
    fn test_stale_window_cutoff_tracks_now() {
        let early = stale_window(Traversal::v(), 10_000);
        let late = stale_window(Traversal::v(), 10_600);
        assert_ne!(early, late);
        assert_eq!(
            early,
            Traversal::v().has("updated", Predicate::Lt(10_000 - STALE_WINDOW_SECS))
        );
    }

    #[test]
    fn test_to_resources_preserves_length_and_order() {
        let engine = two_network_engine();
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let resources = to_resources(&ctx, &Traversal::v()).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].resource_type, "virtual-network");
        assert_eq!(resources[0].uuid, "42");
        assert_eq!(resources[0].fq_name, "vn1");
        assert_eq!(resources[1].uuid, "43");
        assert_eq!(resources[1].fq_name, "");
    }

    #[test]
    fn test_report_returns_list_unchanged() {
        let engine = two_network_engine();
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };
        let resources = to_resources(&ctx, &Traversal::v()).unwrap();
        let expected = resources.clone();

        let session = sink.capture();
        let returned = report(&ctx, " stale virtual networks ", resources);
        let output = session.end();

        assert_eq!(returned, expected);
        assert_eq!(
            output,
            "Found 2 stale virtual networks:\n  - virtual-network/42 - vn1\n  - virtual-network/43 - \n"
        );
    }

    #[test]
    fn test_report_empty_list_prints_nothing() {
        let engine = StaticEngine { labels: vec![] };
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let returned = report(&ctx, "anything", Vec::new());
        assert_eq!(session.end(), "");
        assert!(returned.is_empty());
    }

    #[test]
    fn test_measure_human_mode_passes_value_through() {
        let engine = two_network_engine();
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let measured = measure(&ctx, "check_vn", || to_resources(&ctx, &Traversal::v())).unwrap();
        let output = session.end();

        assert_eq!(measured.value.as_ref().unwrap().len(), 2);
        assert!(measured.outcome.is_none());
        assert!(measured.success());
        // no JSON line in human mode
        assert_eq!(output, "");
    }

    #[test]
    fn test_measure_human_mode_propagates_errors() {
        let engine = FailingEngine;
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let result = measure(&ctx, "check_vn", || to_resources(&ctx, &Traversal::v()));
        match result {
            Err(CheckError::NotFound(msg)) => assert_eq!(msg, "virtual network vn-x"),
            other => panic!("expected NotFound, got {:?}", other.map(|m| m.outcome)),
        }
    }

    #[test]
    fn test_measure_json_mode_emits_one_line() {
        let engine = two_network_engine();
        let config = json_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let measured = measure(&ctx, "check_vn_without_ri", || {
            let resources = to_resources(&ctx, &Traversal::v())?;
            Ok(report(&ctx, "virtual networks", resources))
        })
        .unwrap();
        let emitted = session.end();

        assert_eq!(measured.value.as_ref().unwrap().len(), 2);
        let outcome = measured.outcome.unwrap();
        assert_eq!(outcome.total, 2);
        assert!(outcome.success);

        let lines: Vec<&str> = emitted.trim_end().lines().collect();
        assert_eq!(lines.len(), 1, "exactly one JSON line: {:?}", lines);
        let parsed: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["name"], "check_vn_without_ri");
        assert_eq!(parsed["type"], "check");
        assert_eq!(parsed["total"], 2);
        assert_eq!(parsed["success"], true);
        // report lines were captured, not printed
        let captured = parsed["output"].as_str().unwrap();
        assert!(captured.starts_with("Found 2 virtual networks:\n"));
        assert!(parsed["duration"].as_str().unwrap().ends_with(" ms"));
    }

    #[test]
    fn test_measure_json_mode_swallows_failure() {
        let engine = FailingEngine;
        let config = json_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let measured = measure(&ctx, "check_vn_without_ri", || {
            to_resources(&ctx, &Traversal::v())
        })
        .unwrap();
        let emitted = session.end();

        assert!(measured.value.is_none());
        assert!(!measured.success());
        let outcome = measured.outcome.unwrap();
        assert_eq!(outcome.total, -1);
        assert!(!outcome.success);

        let parsed: Value = serde_json::from_str(emitted.trim_end()).unwrap();
        assert_eq!(parsed["total"], -1);
        assert_eq!(parsed["success"], false);
        assert!(parsed["output"]
            .as_str()
            .unwrap()
            .contains("not found: virtual network vn-x"));
    }

    #[test]
    fn test_measure_json_mode_restores_sink() {
        let engine = two_network_engine();
        let config = json_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        measure(&ctx, "check_vn", || to_resources(&ctx, &Traversal::v())).unwrap();
        // the sink is back on its pre-measure destination
        sink.write_line("afterwards");
        let emitted = session.end();
        assert!(emitted.ends_with("afterwards\n"));
    }

    #[test]
    fn test_count_lines_off_by_one() {
        let engine = StaticEngine { labels: vec![] };
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let count = count_lines(&ctx, || {
            ctx.sink.write_line("a");
            ctx.sink.write_line("b");
            ctx.sink.write_line("c");
            Ok(())
        })
        .unwrap();
        session.end();
        // three newlines captured -> sequence 1..3
        assert_eq!(count.len(), 2);

        let session = sink.capture();
        let count = count_lines(&ctx, || Ok(())).unwrap();
        session.end();
        assert!(count.is_empty());

        let session = sink.capture();
        let count = count_lines(&ctx, || {
            ctx.sink.write_line("only");
            Ok(())
        })
        .unwrap();
        session.end();
        assert!(count.is_empty());
    }

    #[test]
    fn test_count_lines_replays_captured_output() {
        let engine = StaticEngine { labels: vec![] };
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        count_lines(&ctx, || {
            ctx.sink.write_line("logged");
            Ok(())
        })
        .unwrap();
        let replayed = session.end();
        assert_eq!(replayed, "logged\n\n");
    }

    #[test]
    fn test_count_lines_rewraps_failure_and_restores_sink() {
        let engine = StaticEngine { labels: vec![] };
        let config = human_config();
        let sink = Sink::stdout();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };

        let session = sink.capture();
        let err = count_lines(&ctx, || {
            ctx.sink.write_line("partial");
            Err(CheckError::NotFound("zk node".to_string()))
        })
        .unwrap_err();

        match err {
            CheckError::Command(msg) => assert_eq!(msg, "not found: zk node"),
            other => panic!("expected Command, got {:?}", other),
        }

        // redirection torn down; partial output discarded
        sink.write_line("next check");
        assert_eq!(session.end(), "next check\n");
    }

    #[test]
    fn test_note_suppressed_in_json_mode() {
        let engine = StaticEngine { labels: vec![] };
        let sink = Sink::stdout();

        let config = json_config();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };
        let session = sink.capture();
        ctx.note("hidden");
        assert_eq!(session.end(), "");

        let config = human_config();
        let ctx = CheckContext {
            graph: &engine,
            config: &config,
            sink: &sink,
        };
        let session = sink.capture();
        ctx.note("shown");
        assert_eq!(session.end(), "shown\n");
    }

    #[test]
    fn test_line_count_total_feeds_measurement() {
        let count = LineCount::from_output("a\nb\nc\n");
        assert_eq!(count.total(), 2);
        assert_eq!(LineCount::from_output("").total(), 0);
        assert_eq!(().total(), 1);
    }
}
