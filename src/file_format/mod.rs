pub mod config;
pub mod frame_record;
