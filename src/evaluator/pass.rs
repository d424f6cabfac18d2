use crate::graph::{Graph, NodeId};
use crate::platform::Platform;
use crate::result::{DEPTH_LIMIT_EXCEEDED, ExecuteResult};
use ahash::AHashMap;

/// Per-pass memo entry for a node.
#[derive(Debug, Clone)]
enum Mark {
    InProgress,
    Done(ExecuteResult),
}

/// One pull-based evaluation pass.
///
/// Walks backward from requested nodes, executing each reachable node at most
/// once. The memo table lives only as long as the pass.
pub(super) struct EvaluationPass<'g> {
    graph: &'g mut Graph,
    platform: &'g Platform,
    marks: AHashMap<NodeId, Mark>,
    executed: Vec<NodeId>,
    depth: usize,
    max_depth: usize,
}

impl<'g> EvaluationPass<'g> {
    pub(super) fn new(graph: &'g mut Graph, platform: &'g Platform, max_depth: usize) -> Self {
        Self {
            graph,
            platform,
            marks: AHashMap::new(),
            executed: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Nodes whose behavior ran, in execution order.
    pub(super) fn into_executed(self) -> Vec<NodeId> {
        self.executed
    }

    /// Makes sure `node` has been executed during this pass and returns its result.
    pub(super) fn ensure(&mut self, node: NodeId) -> ExecuteResult {
        match self.marks.get(&node) {
            Some(Mark::Done(result)) => return result.clone(),
            Some(Mark::InProgress) => {
                tracing::warn!(%node, "cycle detected");
                return ExecuteResult::cycle(node);
            }
            None => {}
        }
        if self.depth >= self.max_depth {
            tracing::warn!(%node, depth = self.depth, "evaluation depth limit exceeded");
            return self.finish(node, ExecuteResult::error_node(node, DEPTH_LIMIT_EXCEEDED));
        }

        self.marks.insert(node, Mark::InProgress);
        self.depth += 1;
        let result = self.resolve_inputs(node).and_then(|| {
            let target = self.graph.node_at_mut(node);
            tracing::debug!(%node, kind = target.kind(), "executing node");
            let result = target.execute(self.platform);
            self.executed.push(node);
            if let ExecuteResult::Error { message, .. } = &result {
                tracing::warn!(%node, error = %message, "node failed");
            }
            result
        });
        self.depth -= 1;
        self.finish(node, result)
    }

    /// Memoizes `result` for the rest of the pass and records it as the node's
    /// last result, so short-circuited nodes remember the upstream failure.
    fn finish(&mut self, node: NodeId, result: ExecuteResult) -> ExecuteResult {
        self.graph.node_at_mut(node).last_result = Some(result.clone());
        self.marks.insert(node, Mark::Done(result.clone()));
        result
    }

    /// Copies every input's current value into its live slot, executing
    /// producers first. Stops at the first failing producer.
    fn resolve_inputs(&mut self, node: NodeId) -> ExecuteResult {
        let links: Vec<Option<_>> = self
            .graph
            .node_at_mut(node)
            .inputs
            .iter()
            .map(|pin| pin.link())
            .collect();

        for (index, link) in links.into_iter().enumerate() {
            let value = match link {
                Some(source) => {
                    let producer = self.graph[source].node();
                    let upstream = self.ensure(producer);
                    if upstream.has_error() {
                        return upstream;
                    }
                    self.graph[source].value().clone()
                }
                None => self.graph.node_at_mut(node).inputs[index].literal().clone(),
            };
            tracing::trace!(%node, input = index, %value, "resolved input");
            self.graph.node_at_mut(node).inputs[index].set_value(value);
        }
        ExecuteResult::Ok
    }
}
