pub mod containment;
pub mod graph;

pub use graph::{Attachment, EdgePlacement, Graph};
