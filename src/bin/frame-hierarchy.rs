use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use serde_json::to_string_pretty;

use frame_hierarchy::{
    abstract_store::{FrameRecordStore, JsonDirStore, MemoryStore},
    file_format::config::{load, BuildConfig, OutputFormat},
    glob_helper::FrameFilter,
    hierarchy::{analyze_hierarchy, check_hierarchy, save_hierarchy_to_file},
    logging::init_logging,
};

/// Build a FrameNet relation hierarchy from per-frame JSON records and print
/// it as a tree.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// TOML build config; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding one `<frame>.json` record per frame
    #[arg(long, env = "FRAME_JSON_DIR")]
    frames_dir: Option<String>,

    /// Relation to build: Inheritance, Perspective, Usage, Subframe, Precedes
    /// or Causation
    #[arg(short, long)]
    relation: Option<String>,

    /// Build from each frame's narrower frames instead of its broader ones
    #[arg(long)]
    reverse: bool,

    /// Only build from frames whose name matches one of these globs
    #[arg(short, long)]
    include: Vec<String>,

    /// Only build from frames whose first `_`-separated word ends in "ing"
    #[arg(long)]
    x_ing_only: bool,

    /// Write the hierarchy to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Check the built hierarchy against the records and report problems
    #[arg(long)]
    check: bool,
}

impl Args {
    fn merge_into(self, mut config: BuildConfig) -> BuildConfig {
        if self.frames_dir.is_some() {
            config.frames_path = self.frames_dir;
        }
        if self.relation.is_some() {
            config.relation = self.relation;
        }
        if !self.include.is_empty() {
            config.include = self.include;
        }
        if self.output.is_some() {
            config.output_path = self.output;
        }
        if self.format.is_some() {
            config.format = self.format;
        }
        config.reverse |= self.reverse;
        config.x_ing_only |= self.x_ing_only;
        config.check |= self.check;
        config
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_logging();

    let args = Args::parse();
    let base_config = match &args.config {
        Some(path) => load(path)?,
        None => BuildConfig::default(),
    };
    let config = args.merge_into(base_config);

    let frames_path = config.frames_path.as_deref().unwrap_or("frame_json");
    let relation = config.relation.as_deref().unwrap_or("Inheritance");

    // Building and checking both consult every record, so read them once.
    let store = MemoryStore::load_from(&JsonDirStore::new(frames_path))?;
    let frames = FrameFilter::new(&config.include)?
        .with_x_ing_only(config.x_ing_only)
        .filter(store.list_frames()?);

    let forest = analyze_hierarchy(&store, &frames, relation, config.reverse)?;

    let format = config.format.unwrap_or(OutputFormat::Text);
    match (&config.output_path, format) {
        (Some(output_path), OutputFormat::Text) => {
            save_hierarchy_to_file(&forest, output_path)?;
            println!("Hierarchy has been saved to {}!", output_path);
        }
        (Some(output_path), OutputFormat::Json) => {
            std::fs::write(output_path, to_string_pretty(&forest.to_json())? + "\n")?;
            println!("Hierarchy has been saved to {}!", output_path);
        }
        (None, OutputFormat::Text) => print!("{}", forest.render()),
        (None, OutputFormat::Json) => println!("{}", to_string_pretty(&forest.to_json())?),
    }

    if config.check {
        let report = check_hierarchy(&forest, &store);
        println!("{}", report);
        if !report.passed() {
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}
