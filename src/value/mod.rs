//! The payloads that travel along pins.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod choice;
pub mod geometry;
pub mod image;

pub use choice::EnumChoice;
pub use geometry::{Point, Rect, Size};
pub use image::ImageBuffer;

/// The declared type of a pin. Connected pins must agree on it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    String,
    Enum,
    Point,
    Size,
    Rect,
    Image,
    Handle,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::String => "string",
            ValueType::Enum => "enum",
            ValueType::Point => "point",
            ValueType::Size => "size",
            ValueType::Rect => "rect",
            ValueType::Image => "image",
            ValueType::Handle => "handle",
        };
        f.write_str(name)
    }
}

/// An opaque platform reference (window, capture session, texture).
///
/// The engine never interprets the number; only platform collaborators do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A value held by a pin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
    Enum(EnumChoice),
    Point(Point),
    Size(Size),
    Rect(Rect),
    Image(ImageBuffer),
    Handle(Handle),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::String(_) => ValueType::String,
            Value::Enum(_) => ValueType::Enum,
            Value::Point(_) => ValueType::Point,
            Value::Size(_) => ValueType::Size,
            Value::Rect(_) => ValueType::Rect,
            Value::Image(_) => ValueType::Image,
            Value::Handle(_) => ValueType::Handle,
        }
    }

    /// The zero value for `value_type`, used to initialise output pins.
    pub fn default_for(value_type: ValueType) -> Value {
        match value_type {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::String => Value::String(String::new()),
            ValueType::Enum => Value::Enum(EnumChoice::default()),
            ValueType::Point => Value::Point(Point::default()),
            ValueType::Size => Value::Size(Size::default()),
            ValueType::Rect => Value::Rect(Rect::default()),
            ValueType::Image => Value::Image(ImageBuffer::empty()),
            ValueType::Handle => Value::Handle(Handle::NULL),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumChoice> {
        match self {
            Value::Enum(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Value::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Value::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageBuffer> {
        match self {
            Value::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Explicitly converts this value into another tag.
    ///
    /// Converting to the value's own type is a clone. Lossy or meaningless
    /// conversions (e.g. image to point) are rejected.
    pub fn convert(&self, to: ValueType) -> Result<Value, ConversionError> {
        if self.value_type() == to {
            return Ok(self.clone());
        }
        let unsupported = || ConversionError::Unsupported {
            from: self.value_type(),
            to,
        };

        match (self, to) {
            (Value::Bool(b), ValueType::Int) => Ok(Value::Int(i64::from(*b))),
            (Value::Int(i), ValueType::Bool) => Ok(Value::Bool(*i != 0)),
            (Value::Bool(b), ValueType::String) => Ok(Value::String(b.to_string())),
            (Value::Int(i), ValueType::String) => Ok(Value::String(i.to_string())),
            (Value::Enum(choice), ValueType::String) => choice
                .selected_label()
                .map(|label| Value::String(label.to_string()))
                .ok_or_else(unsupported),
            (Value::Enum(choice), ValueType::Int) => Ok(Value::Int(choice.selected() as i64)),
            (Value::String(s), ValueType::Int) => {
                s.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| ConversionError::Parse {
                        text: s.clone(),
                        to,
                    })
            }
            (Value::String(s), ValueType::Bool) => match s.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ConversionError::Parse {
                    text: s.clone(),
                    to,
                }),
            },
            (Value::Point(p), ValueType::Size) => {
                let width = u32::try_from(p.x).map_err(|_| ConversionError::Overflow {
                    value: i64::from(p.x),
                    to: "size width",
                })?;
                let height = u32::try_from(p.y).map_err(|_| ConversionError::Overflow {
                    value: i64::from(p.y),
                    to: "size height",
                })?;
                Ok(Value::Size(Size::new(width, height)))
            }
            (Value::Size(s), ValueType::Point) => {
                let x = i32::try_from(s.width).map_err(|_| ConversionError::Overflow {
                    value: i64::from(s.width),
                    to: "point x",
                })?;
                let y = i32::try_from(s.height).map_err(|_| ConversionError::Overflow {
                    value: i64::from(s.height),
                    to: "point y",
                })?;
                Ok(Value::Point(Point::new(x, y)))
            }
            (Value::Rect(r), ValueType::Point) => Ok(Value::Point(r.origin())),
            (Value::Rect(r), ValueType::Size) => Ok(Value::Size(r.size())),
            (Value::Image(img), ValueType::Size) => Ok(Value::Size(img.size())),
            _ => Err(unsupported()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Enum(choice) => write!(f, "{}", choice),
            Value::Point(p) => write!(f, "{}", p),
            Value::Size(s) => write!(f, "{}", s),
            Value::Rect(r) => write!(f, "{}", r),
            Value::Image(img) => write!(f, "{}", img),
            Value::Handle(h) => write!(f, "handle {}", h),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Point> for Value {
    fn from(value: Point) -> Self {
        Value::Point(value)
    }
}

impl From<Size> for Value {
    fn from(value: Size) -> Self {
        Value::Size(value)
    }
}

impl From<Rect> for Value {
    fn from(value: Rect) -> Self {
        Value::Rect(value)
    }
}

impl From<ImageBuffer> for Value {
    fn from(value: ImageBuffer) -> Self {
        Value::Image(value)
    }
}

impl From<EnumChoice> for Value {
    fn from(value: EnumChoice) -> Self {
        Value::Enum(value)
    }
}

impl From<Handle> for Value {
    fn from(value: Handle) -> Self {
        Value::Handle(value)
    }
}
