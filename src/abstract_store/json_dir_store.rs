use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::from_reader;
use tracing::trace;
use walkdir::WalkDir;

use super::store_interface::{ErrorDetails, ErrorLayer, FrameRecordStore, HierarchyError, Result};
use crate::file_format::frame_record::{FrameRecord, RawFrameRecord};

/// IO errors amount to a missing frame for our purposes which means a sticky
/// data problem.
impl From<std::io::Error> for HierarchyError {
    fn from(err: std::io::Error) -> HierarchyError {
        HierarchyError::Sticky(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

/// Frame records stored as one `<frame>.json` file per frame in a single
/// directory, as written by the FrameNet XML extraction step.  Files are read
/// on every lookup; wrap this in a `MemoryStore` if you'll be looking up the
/// same frames repeatedly.
#[derive(Debug)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        JsonDirStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn frame_path(&self, frame: &str) -> PathBuf {
        self.root.join(format!("{}.json", frame))
    }
}

impl FrameRecordStore for JsonDirStore {
    fn lookup_record(&self, frame: &str) -> Result<FrameRecord> {
        let path = self.frame_path(frame);
        trace!(path = %path.display(), "reading frame record");
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(err) => {
                return Err(HierarchyError::data_problem(format!(
                    "no record for frame {} at [{}]: {}",
                    frame,
                    path.display(),
                    err
                )));
            }
        };
        let raw: RawFrameRecord = from_reader(BufReader::new(file))?;
        Ok(FrameRecord::from_raw(raw))
    }

    fn list_frames(&self) -> Result<Vec<String>> {
        let mut frames = vec![];
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| HierarchyError::data_problem(err.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                frames.push(stem.to_string());
            }
        }
        frames.sort();
        Ok(frames)
    }
}
