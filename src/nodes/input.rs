use super::geometry::to_i32;
use crate::error::{ConversionError, NodeError, PlatformError};
use crate::graph::{ExecuteContext, NodeBehavior};
use crate::platform::{InputInjector, KeyAction, MouseButton};
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::{EnumChoice, Point, ValueType};

/// Runs one injector call, attaching the injector's last error code to failures
/// that do not already carry one.
fn inject(
    ctx: &ExecuteContext<'_>,
    call: &'static str,
    action: impl FnOnce(&dyn InputInjector) -> Result<(), PlatformError>,
) -> Result<(), NodeError> {
    let input = ctx.platform().input();
    action(input).map_err(|err| match err {
        PlatformError::Os { .. } | PlatformError::Unsupported(_) => err.into(),
        other => {
            let code = input.last_error_code();
            tracing::debug!(call, code, error = %other, "input injection failed");
            PlatformError::Os { call, code }.into()
        }
    })
}

fn selected<T>(
    choice: &EnumChoice,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConversionError> {
    let label = choice.selected_label().unwrap_or_default();
    parse(label).ok_or_else(|| ConversionError::UnknownLabel(label.to_string()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseMove;

impl NodeFactory for MouseMove {
    fn kind(&self) -> &str {
        "Mouse Move"
    }

    fn category(&self) -> &str {
        "Input"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Position", Point::default())
            .output("Done", ValueType::Bool);
        Box::new(Self)
    }
}

impl NodeBehavior for MouseMove {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let to = ctx.point(0)?;
        inject(ctx, "mouse_move", |input| input.mouse_move(to))?;
        ctx.set_output(0, true);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseClick;

impl NodeFactory for MouseClick {
    fn kind(&self) -> &str {
        "Mouse Click"
    }

    fn category(&self) -> &str {
        "Input"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Position", Point::default())
            .input("Button", EnumChoice::new(MouseButton::LABELS, 0))
            .input("Double", false)
            .output("Done", ValueType::Bool);
        Box::new(Self)
    }
}

impl NodeBehavior for MouseClick {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let at = ctx.point(0)?;
        let button = selected(ctx.choice(1)?, MouseButton::from_label)?;
        let clicks = if ctx.bool(2)? { 2 } else { 1 };

        for _ in 0..clicks {
            inject(ctx, "mouse_button", |input| {
                input.mouse_button(button, KeyAction::Press, at)
            })?;
        }
        ctx.set_output(0, true);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseScroll;

impl NodeFactory for MouseScroll {
    fn kind(&self) -> &str {
        "Mouse Scroll"
    }

    fn category(&self) -> &str {
        "Input"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Delta", 0i64)
            .output("Done", ValueType::Bool);
        Box::new(Self)
    }
}

impl NodeBehavior for MouseScroll {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let delta = to_i32(ctx.int(0)?, "delta")?;
        inject(ctx, "scroll", |input| input.scroll(delta))?;
        ctx.set_output(0, true);
        Ok(())
    }
}

/// Presses, holds or releases a named key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Key;

impl NodeFactory for Key {
    fn kind(&self) -> &str {
        "Key"
    }

    fn category(&self) -> &str {
        "Input"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Key", "")
            .input("Action", EnumChoice::new(KeyAction::LABELS, 0))
            .output("Done", ValueType::Bool);
        Box::new(Self)
    }
}

impl NodeBehavior for Key {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let key = ctx.string(0)?.trim();
        if key.is_empty() {
            return Err(NodeError::Custom("no key given".to_string()));
        }
        let action = selected(ctx.choice(1)?, KeyAction::from_label)?;
        inject(ctx, "key", |input| input.key(key, action))?;
        ctx.set_output(0, true);
        Ok(())
    }
}
