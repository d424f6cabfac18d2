//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the lantu crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use lantu::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let registry = NodeRegistry::with_defaults();
//! let mut loaded = BlueprintDefinition::from_path("path/to/blueprint.json")?.build(&registry)?;
//!
//! let target = loaded.pin("capture.Image")?;
//! let evaluator = Evaluator::new(Platform::headless());
//! let report = evaluator.evaluate(&mut loaded.graph, &[target]);
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

// Graph construction and evaluation
pub use crate::evaluator::{EvaluationReport, Evaluator, EvaluatorBuilder};
pub use crate::graph::{
    CaptureSession, ExecuteContext, Graph, Node, NodeBehavior, NodeId, NodeState, Pin, PinId,
    PinRole,
};
pub use crate::registry::{NodeBuilder, NodeFactory, NodeRegistry, PaletteEntry};
pub use crate::result::ExecuteResult;

// Values
pub use crate::value::{EnumChoice, Handle, ImageBuffer, Point, Rect, Size, Value, ValueType};

// Platform capabilities
pub use crate::platform::{
    InputInjector, KeyAction, MouseButton, Platform, ScreenCapture, TextureUploader,
    WindowProvider,
};

// Blueprint documents
pub use crate::blueprint::{
    BlueprintDefinition, BlueprintLink, BlueprintNode, IntoBlueprint, LoadedBlueprint,
};

// Error types
pub use crate::error::{BlueprintError, GraphError, NodeError, PlatformError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
