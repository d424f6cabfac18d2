//! Pull-based evaluation of requested pins.

use crate::graph::{Graph, NodeId, PinId};
use crate::platform::Platform;
use crate::result::ExecuteResult;
use itertools::Itertools;
use std::fmt;

mod pass;

use pass::EvaluationPass;

/// The outcome of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// One result per requested pin, in request order.
    pub results: Vec<(PinId, ExecuteResult)>,
    /// Nodes whose behavior ran, in execution order.
    pub executed: Vec<NodeId>,
}

impl EvaluationReport {
    pub fn result(&self, pin: PinId) -> Option<&ExecuteResult> {
        self.results
            .iter()
            .find(|(requested, _)| *requested == pin)
            .map(|(_, result)| result)
    }

    pub fn has_error(&self) -> bool {
        self.results.iter().any(|(_, result)| result.has_error())
    }

    /// Distinct failures among the requested pins, first occurrence first.
    pub fn errors(&self) -> Vec<&ExecuteResult> {
        self.results
            .iter()
            .map(|(_, result)| result)
            .filter(|result| result.has_error())
            .unique_by(|result| result.failed_node())
            .collect()
    }

    /// The nodes the failures are attributed to.
    pub fn failed_nodes(&self) -> Vec<NodeId> {
        self.errors()
            .into_iter()
            .filter_map(ExecuteResult::failed_node)
            .collect()
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "executed: [{}]", self.executed.iter().join(" -> "))?;
        for (pin, result) in &self.results {
            writeln!(f, "  {}: {}", pin, result)?;
        }
        Ok(())
    }
}

/// Resolves pins by executing exactly the upstream nodes they depend on.
///
/// Every call to [`Evaluator::evaluate`] is one pass: each reachable node runs
/// at most once, failures short-circuit their consumers, and cycles are
/// reported instead of followed.
///
/// Dependency chains deeper than [`Evaluator::max_depth`] (512 unless
/// configured) are rejected even when acyclic: the node at which the limit
/// is hit fails with [`DEPTH_LIMIT_EXCEEDED`](crate::result::DEPTH_LIMIT_EXCEEDED),
/// keeps that result as its `last_result`, and its consumers short-circuit.
/// Raise the limit with [`EvaluatorBuilder::max_depth`] for longer chains.
#[derive(Debug, Clone)]
pub struct Evaluator {
    platform: Platform,
    max_depth: usize,
}

impl Evaluator {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn new(platform: Platform) -> Self {
        Self::builder(platform).build()
    }

    pub fn builder(platform: Platform) -> EvaluatorBuilder {
        EvaluatorBuilder::new(platform)
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Runs one pass resolving every pin in `targets`, in order.
    ///
    /// # Panics
    ///
    /// Panics if a target pin is not part of `graph`.
    pub fn evaluate(&self, graph: &mut Graph, targets: &[PinId]) -> EvaluationReport {
        let span = tracing::debug_span!("evaluation_pass", targets = targets.len());
        let _guard = span.enter();

        let owners: Vec<NodeId> = targets.iter().map(|&pin| graph[pin].node()).collect();
        let mut pass = EvaluationPass::new(graph, &self.platform, self.max_depth);
        let results = targets
            .iter()
            .zip(owners)
            .map(|(&pin, node)| (pin, pass.ensure(node)))
            .collect();
        let executed = pass.into_executed();

        let report = EvaluationReport { results, executed };
        tracing::debug!(
            executed = report.executed.len(),
            failures = report.failed_nodes().len(),
            "evaluation pass finished"
        );
        report
    }

    /// Resolves a single pin in its own pass.
    pub fn evaluate_pin(&self, graph: &mut Graph, pin: PinId) -> ExecuteResult {
        self.evaluate(graph, &[pin])
            .results
            .pop()
            .map(|(_, result)| result)
            .unwrap_or_default()
    }

    /// Executes `node` (and whatever it depends on) in its own pass.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not part of `graph`.
    pub fn evaluate_node(&self, graph: &mut Graph, node: NodeId) -> ExecuteResult {
        assert!(graph.contains(node), "{} is not part of this graph", node);
        let mut pass = EvaluationPass::new(graph, &self.platform, self.max_depth);
        pass.ensure(node)
    }
}

/// Configures an [`Evaluator`].
#[derive(Debug, Clone)]
pub struct EvaluatorBuilder {
    platform: Platform,
    max_depth: usize,
}

impl EvaluatorBuilder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            max_depth: Evaluator::DEFAULT_MAX_DEPTH,
        }
    }

    /// Caps how many nodes deep a single dependency chain may go.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn build(self) -> Evaluator {
        Evaluator {
            platform: self.platform,
            max_depth: self.max_depth,
        }
    }
}
