//! Graph traversal
//!
//! - [`tree_walk`]: configurable depth-first walk with cycle protection
//! - [`content`]: walks restricted to view, containment or docking edges
//! - [`parent_chain`]: root-to-node containment path

pub mod content;
pub mod parent_chain;
pub mod tree_walk;

pub use content::{collect_containment_order, collect_view_order, ContentTraversal, ContentVisitor};
pub use parent_chain::parent_chain;
pub use tree_walk::{TraversalOutcome, Traverse, TreeWalkTraversal, TreeWalkVisitor};
