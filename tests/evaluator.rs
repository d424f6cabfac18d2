//! Tests for pull-based evaluation passes.
mod common;
use common::*;
use lantu::error::NodeError;
use lantu::prelude::*;
use lantu::result::{CYCLE_DETECTED, DEPTH_LIMIT_EXCEEDED};
use std::cell::Cell;
use std::rc::Rc;

fn evaluator() -> Evaluator {
    Evaluator::new(Platform::headless())
}

#[test]
fn test_evaluates_only_upstream_nodes() {
    let log = execution_log();
    let mut graph = Graph::new();
    let a = int_source(&mut graph, "a", 2, &log);
    let b = int_source(&mut graph, "b", 3, &log);
    let unrelated = int_source(&mut graph, "unrelated", 99, &log);
    let sum = adder(&mut graph, "sum", &log);
    wire(&mut graph, a, 0, sum, 0);
    wire(&mut graph, b, 0, sum, 1);

    let target = output(&graph, sum, 0);
    let result = evaluator().evaluate_pin(&mut graph, target);

    assert_eq!(result, ExecuteResult::Ok);
    assert_eq!(graph[target].value(), &Value::Int(5));
    assert_eq!(*log.borrow(), vec!["a", "b", "sum"]);
    assert!(graph[unrelated].last_result().is_none());
}

#[test]
fn test_unconnected_inputs_use_their_literal() {
    let log = execution_log();
    let mut graph = Graph::new();
    let a = int_source(&mut graph, "a", 4, &log);
    let sum = adder(&mut graph, "sum", &log);
    wire(&mut graph, a, 0, sum, 0);
    let literal = input(&graph, sum, 1);
    graph.set_literal(literal, 10i64);

    let target = output(&graph, sum, 0);
    assert!(evaluator().evaluate_pin(&mut graph, target).is_ok());
    assert_eq!(graph[target].value(), &Value::Int(14));
    assert_eq!(graph[literal].value(), &Value::Int(10));
}

#[test]
fn test_visit_order_is_deterministic_across_passes() {
    let log = execution_log();
    let mut graph = Graph::new();
    let a = int_source(&mut graph, "a", 1, &log);
    let b = int_source(&mut graph, "b", 2, &log);
    let ab = adder(&mut graph, "ab", &log);
    let top = adder(&mut graph, "top", &log);
    wire(&mut graph, a, 0, ab, 0);
    wire(&mut graph, b, 0, ab, 1);
    wire(&mut graph, ab, 0, top, 0);
    wire(&mut graph, b, 0, top, 1);

    let target = output(&graph, top, 0);
    let evaluator = evaluator();
    let first = evaluator.evaluate(&mut graph, &[target]);
    let first_log = log.borrow_mut().drain(..).collect::<Vec<_>>();
    let second = evaluator.evaluate(&mut graph, &[target]);

    assert_eq!(first.executed, second.executed);
    assert_eq!(first_log, *log.borrow());
    assert_eq!(first_log, vec!["a", "b", "ab", "top"]);
}

#[test]
fn test_shared_producer_runs_once_per_pass() {
    let log = execution_log();
    let mut graph = Graph::new();
    let shared = int_source(&mut graph, "shared", 7, &log);
    let consumers: Vec<NodeId> = ["c1", "c2", "c3"]
        .into_iter()
        .map(|name| {
            let consumer = adder(&mut graph, name, &log);
            wire(&mut graph, shared, 0, consumer, 0);
            wire(&mut graph, shared, 0, consumer, 1);
            consumer
        })
        .collect();

    let targets: Vec<PinId> = consumers.iter().map(|&c| output(&graph, c, 0)).collect();
    let evaluator = evaluator();
    let report = evaluator.evaluate(&mut graph, &targets);

    assert!(!report.has_error());
    assert_eq!(log.borrow().iter().filter(|&&n| n == "shared").count(), 1);
    for target in &targets {
        assert_eq!(graph[*target].value(), &Value::Int(14));
    }

    // A second pass executes the producer again, once.
    evaluator.evaluate(&mut graph, &targets);
    assert_eq!(log.borrow().iter().filter(|&&n| n == "shared").count(), 2);
}

#[test]
fn test_two_node_cycle_is_reported_from_either_side() {
    for requested_first in [true, false] {
        let log = execution_log();
        let mut graph = Graph::new();
        let a = adder(&mut graph, "a", &log);
        let b = adder(&mut graph, "b", &log);
        wire(&mut graph, a, 0, b, 0);
        wire(&mut graph, b, 0, a, 0);

        let requested = if requested_first { a } else { b };
        let target = output(&graph, requested, 0);
        let result = evaluator().evaluate_pin(&mut graph, target);

        assert!(result.is_cycle(), "unexpected result: {}", result);
        assert_eq!(result.message(), Some(CYCLE_DETECTED));
        assert_eq!(result.failed_node(), Some(requested));
        assert!(log.borrow().is_empty());
    }
}

#[test]
fn test_self_loop_is_a_cycle() {
    let log = execution_log();
    let mut graph = Graph::new();
    let node = adder(&mut graph, "loop", &log);
    wire(&mut graph, node, 0, node, 1);

    let result = evaluator().evaluate_node(&mut graph, node);
    assert_eq!(result, ExecuteResult::cycle(node));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_failure_short_circuits_dependents() {
    let log = execution_log();
    let fail = Rc::new(Cell::new(true));
    let mut graph = Graph::new();
    let source = int_source(&mut graph, "source", 1, &log);
    let gate_node = gate(&mut graph, "gate", fail.clone(), &log);
    let consumer = adder(&mut graph, "consumer", &log);
    wire(&mut graph, source, 0, gate_node, 0);
    wire(&mut graph, gate_node, 0, consumer, 0);

    let target = output(&graph, consumer, 0);
    let report = evaluator().evaluate(&mut graph, &[target]);

    let result = report.result(target).cloned().unwrap_or_default();
    assert_eq!(
        result,
        ExecuteResult::error_node(gate_node, "gate refused")
    );
    assert_eq!(*log.borrow(), vec!["source", "gate"]);
    assert_eq!(report.failed_nodes(), vec![gate_node]);
    // The consumer remembers why it did not run.
    assert_eq!(graph[consumer].last_result(), Some(&result));
}

#[test]
fn test_failure_short_circuits_transitive_dependents() {
    let log = execution_log();
    let fail = Rc::new(Cell::new(true));
    let mut graph = Graph::new();
    let gate_node = gate(&mut graph, "gate", fail.clone(), &log);
    let first = adder(&mut graph, "first", &log);
    let second = adder(&mut graph, "second", &log);
    wire(&mut graph, gate_node, 0, first, 0);
    wire(&mut graph, first, 0, second, 0);

    let target = output(&graph, second, 0);
    let result = evaluator().evaluate_pin(&mut graph, target);

    let refused = ExecuteResult::error_node(gate_node, "gate refused");
    assert_eq!(result, refused);
    assert_eq!(*log.borrow(), vec!["gate"]);
    assert_eq!(graph[first].last_result(), Some(&refused));
    assert_eq!(graph[second].last_result(), Some(&refused));
    assert_eq!(graph[target].value(), &Value::Int(0));

    // Once the gate opens, the whole chain runs.
    fail.set(false);
    assert!(evaluator().evaluate_pin(&mut graph, target).is_ok());
    assert_eq!(*log.borrow(), vec!["gate", "gate", "first", "second"]);
}

#[test]
fn test_outputs_keep_previous_values_after_failure() {
    let log = execution_log();
    let fail = Rc::new(Cell::new(false));
    let mut graph = Graph::new();
    let source = int_source(&mut graph, "source", 42, &log);
    let gate_node = gate(&mut graph, "gate", fail.clone(), &log);
    wire(&mut graph, source, 0, gate_node, 0);

    let target = output(&graph, gate_node, 0);
    let evaluator = evaluator();
    assert!(evaluator.evaluate_pin(&mut graph, target).is_ok());
    assert_eq!(graph[target].value(), &Value::Int(42));

    fail.set(true);
    let result = evaluator.evaluate_pin(&mut graph, target);
    assert!(result.has_error());
    assert_eq!(graph[target].value(), &Value::Int(42));
}

#[test]
fn test_partial_outputs_are_not_committed_on_failure() {
    let mut graph = Graph::new();
    let node = TestNode::new("Test Partial", |ctx: &mut ExecuteContext<'_>| {
        ctx.set_output(0, 5i64);
        Err(NodeError::Custom("second output unavailable".to_string()))
    })
    .output("First", ValueType::Int)
    .output("Second", ValueType::Int)
    .add_to(&mut graph);

    let result = evaluator().evaluate_node(&mut graph, node);
    assert_eq!(result.message(), Some("second output unavailable"));
    assert_eq!(graph[output(&graph, node, 0)].value(), &Value::Int(0));
}

#[test]
fn test_depth_limit_stops_long_chains() {
    let log = execution_log();
    let mut graph = Graph::new();
    let mut chain = vec![int_source(&mut graph, "root", 1, &log)];
    for _ in 0..10 {
        let next = adder(&mut graph, "link", &log);
        wire(&mut graph, chain[chain.len() - 1], 0, next, 0);
        chain.push(next);
    }
    let previous = chain[chain.len() - 1];
    let target = output(&graph, previous, 0);

    let shallow = Evaluator::builder(Platform::headless()).max_depth(5).build();
    let result = shallow.evaluate_pin(&mut graph, target);
    assert_eq!(result.message(), Some(DEPTH_LIMIT_EXCEEDED));
    assert!(log.borrow().is_empty());

    // The node five levels below the target is where the walk stopped.
    let stopped = chain[chain.len() - 6];
    assert_eq!(result, ExecuteResult::error_node(stopped, DEPTH_LIMIT_EXCEEDED));
    assert_eq!(graph[stopped].last_result(), Some(&result));
    assert_eq!(graph[previous].last_result(), Some(&result));
    assert!(graph[chain[0]].last_result().is_none());

    let deep = Evaluator::builder(Platform::headless()).max_depth(64).build();
    assert!(deep.evaluate_pin(&mut graph, target).is_ok());
    assert_eq!(graph[target].value(), &Value::Int(1));
}

#[test]
fn test_requesting_an_input_pin_evaluates_its_node() {
    let log = execution_log();
    let mut graph = Graph::new();
    let source = int_source(&mut graph, "source", 3, &log);
    let consumer = adder(&mut graph, "consumer", &log);
    wire(&mut graph, source, 0, consumer, 0);

    let target = input(&graph, consumer, 0);
    assert!(evaluator().evaluate_pin(&mut graph, target).is_ok());
    assert_eq!(graph[target].value(), &Value::Int(3));
}

#[test]
fn test_report_display_lists_execution_order() {
    let log = execution_log();
    let mut graph = Graph::new();
    let source = int_source(&mut graph, "source", 3, &log);
    let target = output(&graph, source, 0);

    let report = evaluator().evaluate(&mut graph, &[target]);
    let text = report.to_string();
    assert!(text.contains(&format!("executed: [{}]", source)));
    assert!(text.contains("ok"));
}

#[test]
#[should_panic(expected = "is not part of this graph")]
fn test_unknown_node_panics() {
    let log = execution_log();
    let mut graph = Graph::new();
    let mut other = Graph::new();
    int_source(&mut graph, "mine", 1, &log);
    int_source(&mut other, "foreign", 1, &log);
    let foreign = int_source(&mut other, "foreign", 2, &log);
    evaluator().evaluate_node(&mut graph, foreign);
}
