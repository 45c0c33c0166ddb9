use serde::{Deserialize, Serialize};

use super::content::EdgeContent;
use crate::errors::EdgeEnd;

/// Graph arc between two optional endpoint nodes
///
/// Endpoints are changed through `Graph` so that the adjacency lists of the
/// nodes involved stay in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub uuid: String,
    pub content: EdgeContent,
    #[serde(default)]
    pub(crate) source: Option<String>,
    #[serde(default)]
    pub(crate) target: Option<String>,
}

impl Edge {
    /// Create an edge attached to neither end
    pub fn new(uuid: impl Into<String>, content: EdgeContent) -> Self {
        Self {
            uuid: uuid.into(),
            content,
            source: None,
            target: None,
        }
    }

    /// Builder used when the endpoints are known up front
    pub fn between(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source = source.map(str::to_string);
        self.target = target.map(str::to_string);
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn end(&self, end: EdgeEnd) -> Option<&str> {
        match end {
            EdgeEnd::Source => self.source(),
            EdgeEnd::Target => self.target(),
        }
    }

    pub(crate) fn end_mut(&mut self, end: EdgeEnd) -> &mut Option<String> {
        match end {
            EdgeEnd::Source => &mut self.source,
            EdgeEnd::Target => &mut self.target,
        }
    }

    /// Copy of this edge with both ends cleared
    pub fn detached(&self) -> Self {
        Self {
            uuid: self.uuid.clone(),
            content: self.content.clone(),
            source: None,
            target: None,
        }
    }
}
