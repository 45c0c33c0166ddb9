use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::properties::Properties;

/// Domain object attached to a node or edge
///
/// `id` names the definition type (e.g. `Task`, `SequenceFlow`); `labels`
/// are the roles rules are written against. A definition always carries
/// its own id as a label unless constructed otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub id: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Definition {
    /// Create a definition whose only label is its own id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut labels = BTreeSet::new();
        labels.insert(id.clone());
        Self {
            id,
            labels,
            properties: Properties::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// True when any of `roles` is one of this definition's labels
    pub fn has_any_label<'a, I>(&self, roles: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        roles.into_iter().any(|role| self.labels.contains(role))
    }
}
