use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, StunnerError};
use crate::ops::Graph;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Descriptive data stored alongside a diagram's graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramMetadata {
    pub id: String,
    pub title: String,
    /// Definition set the diagram's rules and definitions come from
    pub definition_set_id: String,
    /// Persisted version, incremented by each successful save
    #[serde(default)]
    pub version: u64,
    /// PNG thumbnail as a base64 data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl DiagramMetadata {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        definition_set_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            definition_set_id: definition_set_id.into(),
            version: 0,
            thumbnail: None,
            updated_at: Utc::now(),
        }
    }

    /// Store raw PNG bytes as the thumbnail
    pub fn set_thumbnail_png(&mut self, png: &[u8]) {
        self.thumbnail = Some(format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png)));
    }

    /// Decode the thumbnail back to PNG bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the thumbnail is not a base64 PNG data URI.
    pub fn thumbnail_png(&self) -> Result<Option<Vec<u8>>> {
        let Some(uri) = &self.thumbnail else {
            return Ok(None);
        };
        let encoded = uri
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or_else(|| StunnerError::InvalidInput {
                reason: "thumbnail is not a PNG data URI".to_string(),
            })?;
        BASE64
            .decode(encoded)
            .map(Some)
            .map_err(|err| StunnerError::InvalidInput {
                reason: format!("thumbnail is not valid base64: {}", err),
            })
    }
}

/// A graph together with its metadata; the unit of persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub metadata: DiagramMetadata,
    pub graph: Graph,
}

impl Diagram {
    pub fn new(metadata: DiagramMetadata, graph: Graph) -> Self {
        Self { metadata, graph }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Owned copy handed to a store while the session keeps editing
    pub fn snapshot(&self) -> Diagram {
        self.clone()
    }
}
