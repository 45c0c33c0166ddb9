use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection point on a node's shape, identified by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Magnet {
    pub index: u32,
}

impl Magnet {
    pub fn new(index: u32) -> Self {
        Self { index }
    }

    /// The centre magnet of a shape
    pub fn center() -> Self {
        Self { index: 0 }
    }
}

impl fmt::Display for Magnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "magnet#{}", self.index)
    }
}
