use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed set of labels with one selected entry, e.g. a mouse button picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumChoice {
    labels: Vec<String>,
    selected: usize,
}

impl EnumChoice {
    /// Builds a choice over `labels`. An out-of-range `selected` falls back to 0.
    pub fn new<I, S>(labels: I, selected: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let selected = if selected < labels.len() { selected } else { 0 };
        Self { labels, selected }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected).map(String::as_str)
    }

    /// Returns a copy of this choice with `label` selected.
    pub fn with_label(&self, label: &str) -> Result<Self, ConversionError> {
        let index = self
            .labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| ConversionError::UnknownLabel(label.to_string()))?;
        Ok(Self {
            labels: self.labels.clone(),
            selected: index,
        })
    }

    /// Returns a copy of this choice with the entry at `index` selected.
    pub fn with_index(&self, index: usize) -> Result<Self, ConversionError> {
        if index >= self.labels.len() {
            return Err(ConversionError::Overflow {
                value: index as i64,
                to: "enum choice index",
            });
        }
        Ok(Self {
            labels: self.labels.clone(),
            selected: index,
        })
    }
}

impl fmt::Display for EnumChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selected_label().unwrap_or("<none>"))
    }
}
