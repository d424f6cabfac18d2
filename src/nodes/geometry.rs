use crate::error::NodeError;
use crate::graph::{ExecuteContext, NodeBehavior};
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::{Point, Rect, Size, ValueType};

pub(crate) fn to_i32(value: i64, name: &'static str) -> Result<i32, NodeError> {
    i32::try_from(value).map_err(|_| NodeError::OutOfRange { name, value })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MakePoint;

impl NodeFactory for MakePoint {
    fn kind(&self) -> &str {
        "Make Point"
    }

    fn category(&self) -> &str {
        "Geometry"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("X", 0i64)
            .input("Y", 0i64)
            .output("Point", ValueType::Point);
        Box::new(Self)
    }
}

impl NodeBehavior for MakePoint {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let x = to_i32(ctx.int(0)?, "x")?;
        let y = to_i32(ctx.int(1)?, "y")?;
        ctx.set_output(0, Point::new(x, y));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRect;

impl NodeFactory for MakeRect {
    fn kind(&self) -> &str {
        "Make Rect"
    }

    fn category(&self) -> &str {
        "Geometry"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Origin", Point::default())
            .input("Size", Size::default())
            .output("Rect", ValueType::Rect);
        Box::new(Self)
    }
}

impl NodeBehavior for MakeRect {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let rect = Rect::from_parts(ctx.point(0)?, ctx.size(1)?);
        ctx.set_output(0, rect);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectCenter;

impl NodeFactory for RectCenter {
    fn kind(&self) -> &str {
        "Rect Center"
    }

    fn category(&self) -> &str {
        "Geometry"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Rect", Rect::default())
            .output("Center", ValueType::Point);
        Box::new(Self)
    }
}

impl NodeBehavior for RectCenter {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let center = ctx.rect(0)?.center();
        ctx.set_output(0, center);
        Ok(())
    }
}
