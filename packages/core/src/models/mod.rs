//! Data Models
//!
//! - `NodeRecord` / `NewNodeRecord` - the stored shape of a number node
//! - `ParsedOperation` / `Sign` - structured form of a node value
//! - `Forest` / `TreeNode` - derived tree state for one snapshot

mod node_record;
mod operation;
mod tree;

pub use node_record::{NewNodeRecord, NodeRecord};
pub use operation::{ParsedOperation, Sign};
pub use tree::{Forest, NodeIndex, TreeNode};
