use crate::error::NodeError;
use crate::graph::{ExecuteContext, NodeBehavior, NodeState};
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::ValueType;
use std::time::Instant;

/// Milliseconds since the node first ran or was last reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elapsed;

impl NodeFactory for Elapsed {
    fn kind(&self) -> &str {
        "Elapsed"
    }

    fn category(&self) -> &str {
        "Timing"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Reset", false)
            .output("Milliseconds", ValueType::Int);
        Box::new(Self)
    }
}

impl NodeBehavior for Elapsed {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let reset = ctx.bool(0)?;
        let started = match ctx.state().timer() {
            Some(started) if !reset => started,
            _ => {
                let now = Instant::now();
                *ctx.state() = NodeState::Timer(now);
                now
            }
        };
        let millis = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        ctx.set_output(0, millis);
        Ok(())
    }
}

/// Counts executions since the node first ran or was last reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counter;

impl NodeFactory for Counter {
    fn kind(&self) -> &str {
        "Counter"
    }

    fn category(&self) -> &str {
        "Timing"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Reset", false)
            .output("Count", ValueType::Int)
            .state(NodeState::Counter(0));
        Box::new(Self)
    }
}

impl NodeBehavior for Counter {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let reset = ctx.bool(0)?;
        let state = ctx.state();
        if reset || state.counter_mut().is_none() {
            *state = NodeState::Counter(0);
        }
        let count = match state.counter_mut() {
            Some(count) => {
                *count += 1;
                *count
            }
            None => 0,
        };
        ctx.set_output(0, count);
        Ok(())
    }
}
