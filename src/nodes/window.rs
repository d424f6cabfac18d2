use crate::error::{NodeError, PlatformError};
use crate::graph::{CaptureSession, ExecuteContext, NodeBehavior, NodeState};
use crate::platform::Platform;
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::{Handle, Rect, ValueType};

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn live_window(platform: &Platform, window: Handle) -> Result<Handle, PlatformError> {
    if window.is_null() || !platform.windows().is_window(window) {
        return Err(PlatformError::InvalidHandle(window));
    }
    Ok(window)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindWindow;

impl NodeFactory for FindWindow {
    fn kind(&self) -> &str {
        "Find Window"
    }

    fn category(&self) -> &str {
        "Windows"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Title", "")
            .input("Class", "")
            .output("Window", ValueType::Handle);
        Box::new(Self)
    }
}

impl NodeBehavior for FindWindow {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let title = non_empty(ctx.string(0)?);
        let class = non_empty(ctx.string(1)?);
        if title.is_none() && class.is_none() {
            return Err(NodeError::Custom(
                "a window title or class is required".to_string(),
            ));
        }

        let found = ctx.platform().windows().find_window(title, class)?;
        let Some(window) = found else {
            let query = [("title", title), ("class", class)]
                .into_iter()
                .filter_map(|(field, value)| value.map(|value| format!("{field} '{value}'")))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(NodeError::WindowNotFound(query));
        };
        ctx.set_output(0, window);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowRect;

impl NodeFactory for WindowRect {
    fn kind(&self) -> &str {
        "Window Rect"
    }

    fn category(&self) -> &str {
        "Windows"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Window", Handle::NULL)
            .output("Rect", ValueType::Rect);
        Box::new(Self)
    }
}

impl NodeBehavior for WindowRect {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let platform = ctx.platform();
        let window = live_window(platform, ctx.handle(0)?)?;
        let rect = platform.windows().window_rect(window)?;
        ctx.set_output(0, rect);
        Ok(())
    }
}

/// Captures a window through a session kept in the node's state.
///
/// The session is reused across passes while the window stays valid, reopened
/// when the window changes, and retried once with a fresh session if a
/// capture fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureWindow;

impl CaptureWindow {
    fn session<'s>(
        state: &'s mut NodeState,
        platform: &Platform,
        window: Handle,
    ) -> Result<&'s mut CaptureSession, PlatformError> {
        let reusable = state
            .capture_mut()
            .is_some_and(|session| session.window() == window);
        if !reusable {
            // Release the old session before asking the driver for a new one.
            state.clear();
            *state = NodeState::Capture(CaptureSession::open(platform.capture_driver(), window)?);
        }
        state
            .capture_mut()
            .ok_or_else(|| PlatformError::Capture("capture session unavailable".to_string()))
    }
}

impl NodeFactory for CaptureWindow {
    fn kind(&self) -> &str {
        "Capture Window"
    }

    fn category(&self) -> &str {
        "Windows"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Window", Handle::NULL)
            .output("Image", ValueType::Image);
        Box::new(Self)
    }
}

impl NodeBehavior for CaptureWindow {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let platform = ctx.platform();
        let window = match live_window(platform, ctx.handle(0)?) {
            Ok(window) => window,
            Err(err) => {
                ctx.state().clear();
                return Err(err.into());
            }
        };

        let attempt = Self::session(ctx.state(), platform, window)?.capture();
        let frame = match attempt {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(%window, error = %err, "capture failed, reopening session");
                ctx.state().clear();
                Self::session(ctx.state(), platform, window)?.capture()?
            }
        };
        ctx.set_output(0, frame);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureScreen;

impl NodeFactory for CaptureScreen {
    fn kind(&self) -> &str {
        "Capture Screen"
    }

    fn category(&self) -> &str {
        "Windows"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Region", Rect::default())
            .output("Image", ValueType::Image);
        Box::new(Self)
    }
}

impl NodeBehavior for CaptureScreen {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let region = ctx.rect(0)?;
        if region.is_empty() {
            return Err(NodeError::Custom(format!("capture region {region} is empty")));
        }
        let frame = ctx.platform().capture().capture_screen(region)?;
        ctx.set_output(0, frame);
        Ok(())
    }
}
