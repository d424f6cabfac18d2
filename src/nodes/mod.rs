//! The built-in node library.

use crate::registry::{NodeFactory, NodeRegistry};

pub mod constants;
pub mod geometry;
pub mod image;
pub mod input;
pub mod timing;
pub mod window;

pub use constants::*;
pub use geometry::*;
pub use self::image::*;
pub use input::*;
pub use timing::*;
pub use window::*;

/// Generates the registration and lookup functions for every built-in factory.
macro_rules! builtin_nodes {
    ( $( $factory:ident ),* $(,)? ) => {
        pub(crate) fn register_builtin_nodes(registry: &mut NodeRegistry) {
            $( registry.register(Box::new($factory)); )*
        }

        pub(crate) fn create_factory_by_name(name: &str) -> Option<Box<dyn NodeFactory>> {
            $(
                if $factory.kind() == name {
                    return Some(Box::new($factory));
                }
            )*
            None
        }
    };
}

builtin_nodes! {
    // Constants
    BoolConstant,
    IntConstant,
    StringConstant,
    PointConstant,
    SizeConstant,
    RectConstant,

    // Geometry
    MakePoint,
    MakeRect,
    RectCenter,

    // Images
    ImageFile,
    RawImage,
    ImageSize,
    CropImage,
    ImageLoaded,

    // Windows
    FindWindow,
    WindowRect,
    CaptureWindow,
    CaptureScreen,

    // Input
    MouseMove,
    MouseClick,
    MouseScroll,
    Key,

    // Timing
    Elapsed,
    Counter,
}
