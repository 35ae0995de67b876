mod json_dir_store;
mod memory_store;
mod store_interface;

pub use json_dir_store::JsonDirStore;
pub use memory_store::MemoryStore;
pub use store_interface::{ErrorDetails, ErrorLayer, FrameRecordStore, HierarchyError, Result};
