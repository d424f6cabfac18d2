use super::definition::BlueprintDefinition;
use crate::error::{BlueprintError, ConversionError};
use crate::value::{Point, Rect, Size, Value};
use serde_json::Value as Json;

/// A trait for custom document formats that can be converted into a
/// [`BlueprintDefinition`].
///
/// Implement it on your own editor or save-file structs to feed them to the
/// engine without going through JSON.
///
/// # Example
///
/// ```rust,no_run
/// use lantu::prelude::*;
///
/// struct Chain { kinds: Vec<String> }
///
/// impl IntoBlueprint for Chain {
///     fn into_blueprint(self) -> std::result::Result<BlueprintDefinition, BlueprintError> {
///         let nodes = self
///             .kinds
///             .into_iter()
///             .enumerate()
///             .map(|(index, kind)| BlueprintNode {
///                 id: format!("n{index}"),
///                 kind,
///                 name: None,
///                 literals: Default::default(),
///             })
///             .collect();
///         Ok(BlueprintDefinition { nodes, links: vec![] })
///     }
/// }
/// ```
pub trait IntoBlueprint {
    /// Consumes the object and converts it into a blueprint definition.
    fn into_blueprint(self) -> Result<BlueprintDefinition, BlueprintError>;
}

impl IntoBlueprint for BlueprintDefinition {
    fn into_blueprint(self) -> Result<BlueprintDefinition, BlueprintError> {
        Ok(self)
    }
}

impl IntoBlueprint for Json {
    fn into_blueprint(self) -> Result<BlueprintDefinition, BlueprintError> {
        Ok(serde_json::from_value(self)?)
    }
}

impl IntoBlueprint for &str {
    fn into_blueprint(self) -> Result<BlueprintDefinition, BlueprintError> {
        BlueprintDefinition::from_json(self)
    }
}

/// Reads `N` integer components from either an object keyed by `names` or an
/// array of exactly `N` numbers.
fn components<const N: usize>(json: &Json, names: [&str; N]) -> Option<[i64; N]> {
    let mut out = [0i64; N];
    for (index, name) in names.iter().enumerate() {
        let component = match json {
            Json::Object(fields) => fields.get(*name),
            Json::Array(items) if items.len() == N => items.get(index),
            _ => None,
        }?;
        out[index] = component.as_i64()?;
    }
    Some(out)
}

fn narrow<T: TryFrom<i64>>(value: i64, to: &'static str) -> Result<T, ConversionError> {
    T::try_from(value).map_err(|_| ConversionError::Overflow { value, to })
}

/// Converts a JSON literal into a value of the same type as `template`.
///
/// `template` is the pin's current literal; enum literals keep its label set
/// and may be given as a label or, for numbers without a matching label, an index.
pub(crate) fn literal_from_json(json: &Json, template: &Value) -> Result<Value, ConversionError> {
    let expected = template.value_type();
    let mismatch = || ConversionError::Literal {
        expected,
        found: json.to_string(),
    };

    match (template, json) {
        (Value::Bool(_), Json::Bool(b)) => Ok(Value::Bool(*b)),
        (Value::Int(_), Json::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(mismatch),
        (Value::Bool(_) | Value::Int(_), Json::String(text)) => {
            Value::String(text.clone()).convert(expected)
        }
        (Value::String(_), Json::String(text)) => Ok(Value::String(text.clone())),
        (Value::Enum(choice), Json::String(label)) => Ok(choice.with_label(label)?.into()),
        // Numbers name a label when one matches their text, otherwise an index.
        (Value::Enum(choice), Json::Number(n)) => {
            if let Ok(labelled) = choice.with_label(&n.to_string()) {
                return Ok(labelled.into());
            }
            let index = n.as_u64().ok_or_else(mismatch)?;
            let index = usize::try_from(index).map_err(|_| mismatch())?;
            Ok(choice.with_index(index)?.into())
        }
        (Value::Point(_), _) => {
            let [x, y] = components(json, ["x", "y"]).ok_or_else(mismatch)?;
            Ok(Point::new(narrow(x, "point x")?, narrow(y, "point y")?).into())
        }
        (Value::Size(_), _) => {
            let [width, height] = components(json, ["width", "height"]).ok_or_else(mismatch)?;
            Ok(Size::new(narrow(width, "size width")?, narrow(height, "size height")?).into())
        }
        (Value::Rect(_), _) => {
            let [x, y, width, height] =
                components(json, ["x", "y", "width", "height"]).ok_or_else(mismatch)?;
            Ok(Rect::new(
                narrow(x, "rect x")?,
                narrow(y, "rect y")?,
                narrow(width, "rect width")?,
                narrow(height, "rect height")?,
            )
            .into())
        }
        // Images and handles only ever come from upstream nodes.
        _ => Err(mismatch()),
    }
}

