//! Capability interfaces the built-in nodes call through.
//!
//! The engine never talks to an operating system directly. Window discovery,
//! screen capture, input injection and texture upload are provided by the host
//! application as trait objects bundled into a [`Platform`].

use crate::error::PlatformError;
use crate::value::{Handle, ImageBuffer, Point, Rect};
use std::rc::Rc;

mod headless;

pub use headless::HeadlessPlatform;

/// Window discovery and geometry.
pub trait WindowProvider {
    /// Finds a top-level window by title and/or class. `None` fields match anything.
    fn find_window(
        &self,
        title: Option<&str>,
        class: Option<&str>,
    ) -> Result<Option<Handle>, PlatformError>;

    fn window_rect(&self, window: Handle) -> Result<Rect, PlatformError>;

    /// Whether `window` still refers to a live window.
    fn is_window(&self, window: Handle) -> bool;
}

/// Pixel capture from the screen or from individual windows.
pub trait ScreenCapture {
    fn capture_screen(&self, region: Rect) -> Result<ImageBuffer, PlatformError>;

    /// Starts a capture session bound to `window` and returns its handle.
    fn open_session(&self, window: Handle) -> Result<Handle, PlatformError>;

    fn capture_session(&self, session: Handle) -> Result<ImageBuffer, PlatformError>;

    fn close_session(&self, session: Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub const LABELS: [&'static str; 3] = ["Left", "Right", "Middle"];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" => Some(MouseButton::Left),
            "Right" => Some(MouseButton::Right),
            "Middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Press, release, or a full down-up stroke of a button or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Down,
    Up,
}

impl KeyAction {
    pub const LABELS: [&'static str; 3] = ["Press", "Down", "Up"];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Press" => Some(KeyAction::Press),
            "Down" => Some(KeyAction::Down),
            "Up" => Some(KeyAction::Up),
            _ => None,
        }
    }
}

/// Synthetic mouse and keyboard input.
///
/// Failed calls should report [`PlatformError::Os`] carrying
/// [`InputInjector::last_error_code`].
pub trait InputInjector {
    fn mouse_move(&self, to: Point) -> Result<(), PlatformError>;

    fn mouse_button(
        &self,
        button: MouseButton,
        action: KeyAction,
        at: Point,
    ) -> Result<(), PlatformError>;

    fn scroll(&self, delta: i32) -> Result<(), PlatformError>;

    fn key(&self, key: &str, action: KeyAction) -> Result<(), PlatformError>;

    /// The platform error code of the most recent failed call.
    fn last_error_code(&self) -> u32;
}

/// A displayable texture created from an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// The renderer's texture upload hook. Used by the UI, never by nodes.
pub trait TextureUploader {
    fn upload(
        &self,
        pixels: &[u8],
        channels: u8,
        width: u32,
        height: u32,
    ) -> Result<Texture, PlatformError>;

    fn release(&self, texture: Texture);
}

/// Uploads an image value for display. Empty images are rejected.
pub fn upload_image(
    uploader: &dyn TextureUploader,
    image: &ImageBuffer,
) -> Result<Texture, PlatformError> {
    if image.is_empty() {
        return Err(PlatformError::EmptyBuffer);
    }
    uploader.upload(
        image.pixels(),
        image.channels(),
        image.width(),
        image.height(),
    )
}

/// The capabilities handed to nodes during evaluation.
#[derive(Clone)]
pub struct Platform {
    windows: Rc<dyn WindowProvider>,
    capture: Rc<dyn ScreenCapture>,
    input: Rc<dyn InputInjector>,
}

impl Platform {
    pub fn new(
        windows: Rc<dyn WindowProvider>,
        capture: Rc<dyn ScreenCapture>,
        input: Rc<dyn InputInjector>,
    ) -> Self {
        Self {
            windows,
            capture,
            input,
        }
    }

    /// A platform on which every capability reports `Unsupported`.
    pub fn headless() -> Self {
        let headless = Rc::new(HeadlessPlatform);
        Self::new(headless.clone(), headless.clone(), headless)
    }

    pub fn windows(&self) -> &dyn WindowProvider {
        self.windows.as_ref()
    }

    pub fn capture(&self) -> &dyn ScreenCapture {
        self.capture.as_ref()
    }

    /// A shared handle to the capture driver, for state that outlives a pass.
    pub fn capture_driver(&self) -> Rc<dyn ScreenCapture> {
        Rc::clone(&self.capture)
    }

    pub fn input(&self) -> &dyn InputInjector {
        self.input.as_ref()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::headless()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
