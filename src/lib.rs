extern crate serde;
extern crate serde_json;

extern crate clap;
extern crate globset;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
extern crate toml;
extern crate tracing;
extern crate tracing_subscriber;
extern crate walkdir;

pub mod abstract_store;
pub mod file_format;
pub mod hierarchy;

pub mod glob_helper;
pub mod logging;

mod utils;
