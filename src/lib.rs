//! # Lantu - Node-Graph Execution Engine for Automation Blueprints
//!
//! **Lantu** evaluates the node graphs behind a visual automation editor. Users
//! wire nodes (image sources, window lookups, screen captures, input
//! injection, timers) into a blueprint; the engine resolves requested outputs
//! by executing exactly the upstream nodes they depend on.
//!
//! ## Core Workflow
//!
//! 1.  **Register Node Kinds**: Build a `NodeRegistry`, either with the built-in
//!     library (`NodeRegistry::with_defaults()`) or your own `NodeFactory`
//!     implementations.
//! 2.  **Build a Graph**: Spawn nodes into a `Graph`, set input literals and
//!     connect outputs to inputs. Alternatively load a JSON blueprint with
//!     `BlueprintDefinition`.
//! 3.  **Provide a Platform**: Bundle the host's window, capture and input
//!     capabilities into a `Platform` (or use `Platform::headless()`).
//! 4.  **Evaluate**: Ask an `Evaluator` for the pins you need. Each call is one
//!     pass; every reachable node runs at most once and failures stop at the
//!     node that caused them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lantu::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let registry = NodeRegistry::with_defaults();
//!     let mut graph = Graph::new();
//!
//!     // Image File -> Image Loaded
//!     let source = graph.spawn(&registry, "Image File")?;
//!     let loaded = graph.spawn(&registry, "Image Loaded")?;
//!
//!     let path = graph.find_pin(source, "Path").expect("Image File has a Path input");
//!     graph.set_literal(path, "screenshot.png");
//!     let image_out = graph.output_pin(source, 0).expect("Image File has an Image output");
//!     let image_in = graph.input_pin(loaded, 0).expect("Image Loaded has an Image input");
//!     graph.connect(image_out, image_in)?;
//!
//!     // Evaluate the consumer's output
//!     let evaluator = Evaluator::new(Platform::headless());
//!     let target = graph.output_pin(loaded, 0).expect("Image Loaded has a Loaded output");
//!     let result = evaluator.evaluate_pin(&mut graph, target);
//!
//!     match result {
//!         ExecuteResult::Ok => println!("loaded: {}", graph[target].value()),
//!         ExecuteResult::Error { node, message } => println!("{} failed: {}", node, message),
//!     }
//!     Ok(())
//! }
//! ```

pub mod blueprint;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod nodes;
pub mod platform;
pub mod prelude;
pub mod registry;
pub mod result;
pub mod value;
