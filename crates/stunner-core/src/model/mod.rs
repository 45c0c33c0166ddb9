pub mod bounds;
pub mod content;
pub mod definition;
pub mod diagram;
pub mod edge;
pub mod magnet;
pub mod node;
pub mod properties;

pub use bounds::{Bounds, Point};
pub use content::{EdgeContent, EdgeKind, NodeContent, View, ViewConnector};
pub use definition::Definition;
pub use diagram::{Diagram, DiagramMetadata};
pub use edge::Edge;
pub use magnet::Magnet;
pub use node::Node;
pub use properties::Properties;
