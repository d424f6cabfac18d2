use crate::error::PlatformError;
use crate::platform::ScreenCapture;
use crate::value::{Handle, ImageBuffer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// Persistent per-node data that survives between evaluation passes.
///
/// The state is owned by its node and dropped with it; variants that hold OS
/// resources release them in `Drop`.
#[derive(Default)]
pub enum NodeState {
    #[default]
    Empty,
    Capture(CaptureSession),
    Timer(Instant),
    Counter(i64),
    /// Escape hatch for node kinds defined outside this crate.
    Custom(Box<dyn Any>),
}

impl NodeState {
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeState::Empty)
    }

    /// Drops the current state, releasing anything it holds.
    pub fn clear(&mut self) {
        *self = NodeState::Empty;
    }

    pub fn capture_mut(&mut self) -> Option<&mut CaptureSession> {
        match self {
            NodeState::Capture(session) => Some(session),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<Instant> {
        match self {
            NodeState::Timer(started) => Some(*started),
            _ => None,
        }
    }

    pub fn counter_mut(&mut self) -> Option<&mut i64> {
        match self {
            NodeState::Counter(count) => Some(count),
            _ => None,
        }
    }

    /// Returns the custom state if it holds a `T`.
    pub fn custom_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            NodeState::Custom(data) => data.downcast_mut::<T>(),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NodeState::Empty => "empty",
            NodeState::Capture(_) => "capture",
            NodeState::Timer(_) => "timer",
            NodeState::Counter(_) => "counter",
            NodeState::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Capture(session) => f.debug_tuple("Capture").field(session).finish(),
            NodeState::Timer(started) => f.debug_tuple("Timer").field(started).finish(),
            NodeState::Counter(count) => f.debug_tuple("Counter").field(count).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// A platform capture session bound to one window.
///
/// The session is closed through its capture driver when dropped.
pub struct CaptureSession {
    window: Handle,
    session: Handle,
    frames: u64,
    driver: Rc<dyn ScreenCapture>,
}

impl CaptureSession {
    pub fn open(driver: Rc<dyn ScreenCapture>, window: Handle) -> Result<Self, PlatformError> {
        let session = driver.open_session(window)?;
        tracing::debug!(%window, %session, "opened capture session");
        Ok(Self {
            window,
            session,
            frames: 0,
            driver,
        })
    }

    pub fn window(&self) -> Handle {
        self.window
    }

    pub fn handle(&self) -> Handle {
        self.session
    }

    /// Number of frames captured through this session.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn capture(&mut self) -> Result<ImageBuffer, PlatformError> {
        let frame = self.driver.capture_session(self.session)?;
        self.frames += 1;
        Ok(frame)
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("window", &self.window)
            .field("session", &self.session)
            .field("frames", &self.frames)
            .finish()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        tracing::debug!(window = %self.window, session = %self.session, "closing capture session");
        self.driver.close_session(self.session);
    }
}
