use super::{InputInjector, KeyAction, MouseButton, ScreenCapture, WindowProvider};
use crate::error::PlatformError;
use crate::value::{Handle, ImageBuffer, Point, Rect};

/// A platform without a display. Every capability fails with `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl WindowProvider for HeadlessPlatform {
    fn find_window(
        &self,
        _title: Option<&str>,
        _class: Option<&str>,
    ) -> Result<Option<Handle>, PlatformError> {
        Err(PlatformError::Unsupported("find_window"))
    }

    fn window_rect(&self, _window: Handle) -> Result<Rect, PlatformError> {
        Err(PlatformError::Unsupported("window_rect"))
    }

    fn is_window(&self, _window: Handle) -> bool {
        false
    }
}

impl ScreenCapture for HeadlessPlatform {
    fn capture_screen(&self, _region: Rect) -> Result<ImageBuffer, PlatformError> {
        Err(PlatformError::Unsupported("capture_screen"))
    }

    fn open_session(&self, _window: Handle) -> Result<Handle, PlatformError> {
        Err(PlatformError::Unsupported("open_session"))
    }

    fn capture_session(&self, _session: Handle) -> Result<ImageBuffer, PlatformError> {
        Err(PlatformError::Unsupported("capture_session"))
    }

    fn close_session(&self, _session: Handle) {}
}

impl InputInjector for HeadlessPlatform {
    fn mouse_move(&self, _to: Point) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("mouse_move"))
    }

    fn mouse_button(
        &self,
        _button: MouseButton,
        _action: KeyAction,
        _at: Point,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("mouse_button"))
    }

    fn scroll(&self, _delta: i32) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("scroll"))
    }

    fn key(&self, _key: &str, _action: KeyAction) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("key"))
    }

    fn last_error_code(&self) -> u32 {
        0
    }
}
