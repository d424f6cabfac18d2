use crate::error::NodeError;
use crate::graph::{ExecuteContext, NodeBehavior};
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::{Point, Rect, Size, Value, ValueType};

/// Copies input 0 to output 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl NodeBehavior for PassThrough {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let value = ctx.input(0).clone();
        ctx.set_output(0, value);
        Ok(())
    }
}

/// Defines constant node factories: one "Value" input whose literal is passed through.
macro_rules! constant_nodes {
    ( $( ($name:ident, $kind:expr, $value_type:expr, $default:expr) ),* $(,)? ) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl NodeFactory for $name {
                fn kind(&self) -> &str { $kind }
                fn category(&self) -> &str { "Constants" }
                fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
                    builder.input("Value", $default).output("Value", $value_type);
                    Box::new(PassThrough)
                }
            }
        )*
    };
}

constant_nodes! {
    (BoolConstant, "Bool Constant", ValueType::Bool, Value::Bool(false)),
    (IntConstant, "Int Constant", ValueType::Int, Value::Int(0)),
    (StringConstant, "String Constant", ValueType::String, Value::String(String::new())),
    (PointConstant, "Point Constant", ValueType::Point, Value::Point(Point::default())),
    (SizeConstant, "Size Constant", ValueType::Size, Value::Size(Size::default())),
    (RectConstant, "Rect Constant", ValueType::Rect, Value::Rect(Rect::default())),
}
