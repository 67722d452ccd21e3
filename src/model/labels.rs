//! Class label table.

use std::ops::Deref;

/// Ordered human-readable class names, index-aligned with the class channels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Creates a table from owned labels.
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Creates a table from borrowed labels.
    pub fn from_strs(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|label| (*label).to_owned()).collect(),
        }
    }

    /// Returns the label for `class_index`, if any.
    pub fn label(&self, class_index: usize) -> Option<&str> {
        self.labels.get(class_index).map(String::as_str)
    }

    /// Returns the index of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|candidate| candidate == label)
    }
}

impl Deref for LabelTable {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.labels
    }
}
