use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{Result, StunnerError};
use crate::model::Definition;

/// What a definition set declares about one definition type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionEntry {
    pub id: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DefinitionEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: BTreeSet::new(),
            category: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Definition types known to a definition set, keyed by id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionRegistry {
    definition_set_id: String,
    entries: BTreeMap<String, DefinitionEntry>,
}

impl DefinitionRegistry {
    pub fn new(definition_set_id: impl Into<String>) -> Self {
        Self {
            definition_set_id: definition_set_id.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn definition_set_id(&self) -> &str {
        &self.definition_set_id
    }

    /// Add a definition type
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if the id is already registered.
    pub fn register(&mut self, entry: DefinitionEntry) -> Result<()> {
        if self.entries.contains_key(&entry.id) {
            return Err(StunnerError::DuplicateIdentifier { uuid: entry.id });
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DefinitionEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Build a fresh definition of a registered type, carrying its labels
    ///
    /// # Errors
    ///
    /// Returns `UnknownDefinition` for an unregistered id.
    pub fn instantiate(&self, id: &str) -> Result<Definition> {
        let entry = self.get(id).ok_or_else(|| StunnerError::UnknownDefinition {
            definition_id: id.to_string(),
        })?;
        Ok(Definition::new(&entry.id).with_labels(entry.labels.iter().cloned()))
    }

    /// Entries in a category, in id order
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a DefinitionEntry> + 'a {
        self.entries
            .values()
            .filter(move |entry| entry.category.as_deref() == Some(category))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new("bpmn");
        registry
            .register(
                DefinitionEntry::new("UserTask")
                    .with_labels(["FlowNode", "Task"])
                    .with_category("Activities"),
            )
            .unwrap();
        registry
            .register(DefinitionEntry::new("StartEvent").with_category("Events"))
            .unwrap();
        registry
    }

    #[test]
    fn test_instantiate_carries_labels() {
        let definition = registry().instantiate("UserTask").unwrap();

        assert_eq!(definition.id, "UserTask");
        assert!(definition.has_label("UserTask"));
        assert!(definition.has_label("Task"));
    }

    #[test]
    fn test_unknown_definition() {
        let err = registry().instantiate("Gateway").unwrap_err();
        assert!(matches!(err, StunnerError::UnknownDefinition { .. }));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry.register(DefinitionEntry::new("StartEvent")).unwrap_err();
        assert!(matches!(err, StunnerError::DuplicateIdentifier { .. }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_category_lookup() {
        let registry = registry();
        let events: Vec<_> = registry.in_category("Events").map(|e| e.id.as_str()).collect();
        assert_eq!(events, ["StartEvent"]);
    }
}
