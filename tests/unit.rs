//! Unit tests for values, results and platform helpers.
use lantu::error::{ConversionError, ImageBufferError, NodeError, PlatformError};
use lantu::platform::{Texture, upload_image};
use lantu::prelude::*;
use lantu::result::CYCLE_DETECTED;
use std::cell::RefCell;
use std::path::PathBuf;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Int(-3)), "-3");
    assert_eq!(format!("{}", Value::from("a b")), "\"a b\"");
    assert_eq!(format!("{}", Value::Point(Point::new(1, 2))), "(1, 2)");
    assert_eq!(format!("{}", Value::Size(Size::new(3, 4))), "3x4");
    assert_eq!(format!("{}", Value::Rect(Rect::new(1, 2, 3, 4))), "(1, 2, 3x4)");
    assert_eq!(format!("{}", Value::Image(ImageBuffer::empty())), "image <empty>");
    assert_eq!(format!("{}", Value::Handle(Handle::from_raw(255))), "handle 0xff");
}

#[test]
fn test_value_types_and_defaults() {
    for value_type in [
        ValueType::Bool,
        ValueType::Int,
        ValueType::String,
        ValueType::Enum,
        ValueType::Point,
        ValueType::Size,
        ValueType::Rect,
        ValueType::Image,
        ValueType::Handle,
    ] {
        assert_eq!(Value::default_for(value_type).value_type(), value_type);
    }
    assert_eq!(ValueType::Image.to_string(), "image");
}

#[test]
fn test_explicit_conversions() {
    assert_eq!(Value::Bool(true).convert(ValueType::Int), Ok(Value::Int(1)));
    assert_eq!(Value::Int(0).convert(ValueType::Bool), Ok(Value::Bool(false)));
    assert_eq!(Value::from(" 42 ").convert(ValueType::Int), Ok(Value::Int(42)));
    assert_eq!(
        Value::Rect(Rect::new(5, 6, 7, 8)).convert(ValueType::Size),
        Ok(Value::Size(Size::new(7, 8)))
    );
    assert_eq!(
        Value::Point(Point::new(-1, 2)).convert(ValueType::Size),
        Err(ConversionError::Overflow {
            value: -1,
            to: "size width"
        })
    );
    assert!(matches!(
        Value::from("yes").convert(ValueType::Bool),
        Err(ConversionError::Parse { .. })
    ));
    assert_eq!(
        Value::Point(Point::new(0, 0)).convert(ValueType::Image),
        Err(ConversionError::Unsupported {
            from: ValueType::Point,
            to: ValueType::Image
        })
    );
}

#[test]
fn test_enum_choice_selection() {
    let choice = EnumChoice::new(["Left", "Right", "Middle"], 1);
    assert_eq!(choice.selected_label(), Some("Right"));
    assert_eq!(choice.with_label("Middle").unwrap().selected(), 2);
    assert!(choice.with_index(3).is_err());
    assert_eq!(
        Value::Enum(choice.clone()).convert(ValueType::String),
        Ok(Value::from("Right"))
    );
    // Out-of-range selections fall back to the first label.
    assert_eq!(EnumChoice::new(["A", "B"], 9).selected(), 0);
}

#[test]
fn test_image_buffer_validates_layout() {
    assert!(ImageBuffer::new(2, 2, 3, vec![0; 12]).is_ok());
    assert_eq!(
        ImageBuffer::new(2, 2, 3, vec![0; 11]),
        Err(ImageBufferError::SizeMismatch {
            width: 2,
            height: 2,
            channels: 3,
            expected: 12,
            actual: 11
        })
    );
    assert_eq!(
        ImageBuffer::new(1, 1, 5, vec![0; 5]),
        Err(ImageBufferError::Channels(5))
    );
    assert_eq!(
        ImageBuffer::new(u32::MAX, u32::MAX, 4, Vec::new()),
        Err(ImageBufferError::TooLarge {
            width: u32::MAX,
            height: u32::MAX,
            channels: 4
        })
    );
}

#[test]
fn test_image_values_are_deep_copies() {
    let original = ImageBuffer::new(1, 2, 1, vec![1, 2]).unwrap();
    let value = Value::Image(original.clone());
    let copy = value.clone();
    drop(value);
    assert_eq!(copy.as_image(), Some(&original));
    assert_eq!(original.crop(Rect::new(0, 1, 1, 1)).unwrap().pixels(), &[2]);
    assert!(original.crop(Rect::new(0, 1, 1, 2)).is_none());
}

#[test]
fn test_execute_result_helpers() {
    let mut graph = Graph::new();
    let registry = NodeRegistry::with_defaults();
    let node = graph.spawn(&registry, "Counter").unwrap();

    let ok = ExecuteResult::Ok;
    let failed = ExecuteResult::error_node(node, "boom");
    assert!(ok.is_ok());
    assert_eq!(ok.failed_node(), None);
    assert_eq!(failed.failed_node(), Some(node));
    assert_eq!(failed.to_string(), format!("{} failed: boom", node));
    assert_eq!(ExecuteResult::cycle(node).message(), Some(CYCLE_DETECTED));
    assert_eq!(
        ok.clone().and_then(|| failed.clone()),
        failed
    );
    assert_eq!(
        failed.clone().and_then(|| unreachable!("skipped after an error")),
        failed
    );
}

#[test]
fn test_error_display() {
    let missing = NodeError::FileNotFound(PathBuf::from("a.png"));
    assert_eq!(missing.to_string(), "file not found: a.png");

    let os = NodeError::from(PlatformError::Os {
        call: "SendInput",
        code: 87,
    });
    assert!(os.to_string().contains("87"));

    let window = PlatformError::InvalidHandle(Handle::from_raw(16));
    assert_eq!(window.to_string(), "window handle 0x10 is no longer valid");
}

#[derive(Default)]
struct RecordingUploader {
    uploads: RefCell<Vec<(u8, u32, u32)>>,
}

impl TextureUploader for RecordingUploader {
    fn upload(
        &self,
        pixels: &[u8],
        channels: u8,
        width: u32,
        height: u32,
    ) -> std::result::Result<Texture, PlatformError> {
        assert_eq!(pixels.len(), (width * height) as usize * channels as usize);
        self.uploads.borrow_mut().push((channels, width, height));
        Ok(Texture {
            handle: Handle::from_raw(1),
            width,
            height,
        })
    }

    fn release(&self, _texture: Texture) {}
}

#[test]
fn test_upload_image_rejects_empty_buffers() {
    let uploader = RecordingUploader::default();
    assert_eq!(
        upload_image(&uploader, &ImageBuffer::empty()),
        Err(PlatformError::EmptyBuffer)
    );

    let image = ImageBuffer::new(2, 1, 4, vec![0; 8]).unwrap();
    let texture = upload_image(&uploader, &image).unwrap();
    assert_eq!((texture.width, texture.height), (2, 1));
    assert_eq!(*uploader.uploads.borrow(), vec![(4, 2, 1)]);
}
