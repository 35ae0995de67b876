use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::abstract_store::Result;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Box-drawing text tree, one block per root.
    Text,
    /// Pretty-printed `{ relation, direction, roots, nodes }` JSON.
    Json,
}

/// Schema for the TOML files describing a hierarchy build.  Everything is
/// optional so that a config file can be partial and the command line can
/// fill in or override the rest.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory holding one `<frame>.json` record per frame.
    pub frames_path: Option<String>,
    /// Relation to build, e.g. "Inheritance".
    pub relation: Option<String>,
    /// Build from each frame's narrower frames instead of its broader ones.
    #[serde(default)]
    pub reverse: bool,
    /// Glob patterns over frame names; when non-empty only matching frames are
    /// fed to the builder.
    #[serde(default)]
    pub include: Vec<String>,
    /// Only feed the builder frames whose first `_`-separated word ends in
    /// "ing", e.g. `Installing` or `Being_born`.
    #[serde(default)]
    pub x_ing_only: bool,
    /// File to write the rendering to instead of stdout.
    pub output_path: Option<String>,
    pub format: Option<OutputFormat>,
    /// Run the consistency checker after building.
    #[serde(default)]
    pub check: bool,
}

impl BuildConfig {
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let config_str = fs::read_to_string(path)?;
    BuildConfig::from_toml_str(&config_str)
}
