use std::fmt;

use crate::file_format::frame_record::FrameRecord;

pub type Result<T> = std::result::Result<T, HierarchyError>;

// JSON parse errors are sticky data problems.
impl From<serde_json::Error> for HierarchyError {
    fn from(err: serde_json::Error) -> HierarchyError {
        HierarchyError::Sticky(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for HierarchyError {
    fn from(err: toml::de::Error) -> HierarchyError {
        HierarchyError::Sticky(ErrorDetails {
            layer: ErrorLayer::ConfigLayer,
            message: err.to_string(),
        })
    }
}

/// Express whether the error seems to be happening in the caller's setup or in
/// the frame data.
#[derive(Debug, PartialEq)]
pub enum ErrorLayer {
    /// The request itself has structural issues, like a malformed glob passed
    /// on the command line.  A frame name that simply doesn't resolve is not
    /// this; unresolved parents are an expected part of building.
    BadInput,
    /// The build was configured in a way that makes it impossible to run, like
    /// a config file that doesn't parse.
    ConfigLayer,
    /// The error seems to be related to the frame records themselves, like a
    /// missing or malformed frame JSON file.
    DataLayer,
}

/// Details about what went wrong for investigation purposes.
#[derive(Debug)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

#[derive(Debug)]
pub enum HierarchyError {
    /// The relation name given to `analyze_hierarchy` is not one of the six
    /// FrameNet relations we know the labels for.  This is raised before any
    /// record is looked up.
    InvalidRelation(String),
    /// An error that will persist for the given inputs, for example a frame
    /// file that doesn't exist.
    Sticky(ErrorDetails),
}

impl HierarchyError {
    pub fn data_problem(message: String) -> Self {
        HierarchyError::Sticky(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message,
        })
    }

    pub fn bad_input(message: String) -> Self {
        HierarchyError::Sticky(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message,
        })
    }
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyError::InvalidRelation(name) => write!(
                f,
                "unknown relation {:?}, expected one of: Inheritance, Perspective, Usage, Subframe, Precedes, Causation",
                name
            ),
            HierarchyError::Sticky(details) => {
                write!(f, "{:?}: {}", details.layer, details.message)
            }
        }
    }
}

impl std::error::Error for HierarchyError {}

/// Name-addressable source of frame records.  The hierarchy code never knows
/// where records come from; it asks for one frame at a time.
///
/// ## Runtime Assumptions
///
/// Lookups are synchronous and expected to be cheap (an in-memory table or a
/// small JSON file per frame).  Building calls `lookup_record` once per input
/// frame and the consistency checker calls it once per visited position, so
/// an implementation backed by something slow should cache.
pub trait FrameRecordStore {
    /// Retrieve the record for the given frame name.  A frame the store knows
    /// nothing about is a `DataLayer` error.
    fn lookup_record(&self, frame: &str) -> Result<FrameRecord>;

    /// List the names of all frames the store holds, sorted.
    fn list_frames(&self) -> Result<Vec<String>>;
}
