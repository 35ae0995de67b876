pub mod builder;
pub mod consistency;
pub mod forest;
pub mod node_set;
pub mod render;

pub use builder::{analyze_hierarchy, build_hierarchy, build_hierarchy_for_all};
pub use consistency::{check_hierarchy, ConsistencyReport, Inconsistency, InconsistencyKind};
pub use forest::{Forest, NodeRef};
pub use node_set::FrameNodeId;
pub use render::save_hierarchy_to_file;
