use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::abstract_store::HierarchyError;

/// The typed FrameNet frame-to-frame relations we know how to build
/// hierarchies for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    Inheritance,
    Perspective,
    Usage,
    Subframe,
    Precedes,
    Causation,
}

/// Which of a relation's two labels names the "parents" of a record.
///
/// `Forward` means the record lists its broader frames (e.g. "Inherits from"),
/// `Reverse` means it lists its narrower frames (e.g. "Is Inherited by") and
/// so the hierarchy comes out upside down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// One directional label of one relation, e.g. (Usage, Reverse) is "Is Used by".
pub type RelationField = (Relation, Direction);

pub const ALL_RELATIONS: [Relation; 6] = [
    Relation::Inheritance,
    Relation::Perspective,
    Relation::Usage,
    Relation::Subframe,
    Relation::Precedes,
    Relation::Causation,
];

impl Relation {
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Inheritance => "Inheritance",
            Relation::Perspective => "Perspective",
            Relation::Usage => "Usage",
            Relation::Subframe => "Subframe",
            Relation::Precedes => "Precedes",
            Relation::Causation => "Causation",
        }
    }

    /// The FrameNet label for this relation in the given direction, as it
    /// appears in a frame's relation list.
    pub fn label(&self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Relation::Inheritance, Direction::Forward) => "Inherits from",
            (Relation::Inheritance, Direction::Reverse) => "Is Inherited by",
            (Relation::Perspective, Direction::Forward) => "Perspective on",
            (Relation::Perspective, Direction::Reverse) => "Is Perspectivized in",
            (Relation::Usage, Direction::Forward) => "Uses",
            (Relation::Usage, Direction::Reverse) => "Is Used by",
            (Relation::Subframe, Direction::Forward) => "Subframe of",
            (Relation::Subframe, Direction::Reverse) => "Has Subframe(s)",
            (Relation::Precedes, Direction::Forward) => "Precedes",
            (Relation::Precedes, Direction::Reverse) => "Is Preceded by",
            (Relation::Causation, Direction::Forward) => "Is Inchoative of",
            (Relation::Causation, Direction::Reverse) => "Is Causative of",
        }
    }

    /// Map a FrameNet relation label back to its typed field.  The extractor
    /// turns `-` and `_` into spaces, so we accept either spelling.
    pub fn field_for_label(label: &str) -> Option<RelationField> {
        let normalized = normalize_label(label);
        for relation in ALL_RELATIONS {
            for direction in [Direction::Forward, Direction::Reverse] {
                if relation.label(direction) == normalized {
                    return Some((relation, direction));
                }
            }
        }
        None
    }
}

fn normalize_label(label: &str) -> String {
    label.replace(['-', '_'], " ").trim().to_string()
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Relation {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_RELATIONS
            .iter()
            .find(|relation| relation.name().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| HierarchyError::InvalidRelation(s.to_string()))
    }
}

/// Split a free-text "Name1, Name2, Name3" relation value into trimmed names.
/// Empty entries (from a blank value or stray commas) are dropped.
pub fn split_frame_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

/// Schema for the per-frame JSON files written by the FrameNet XML extraction
/// stage.  We only rely on `frame_name` and `fr_rel`; everything else is there
/// for the benefit of other consumers of the same files.
#[derive(Clone, Debug, Deserialize)]
pub struct RawFrameRecord {
    pub frame_name: String,
    #[serde(default)]
    pub frame_def: Option<String>,
    /// Relation label to comma-separated related frame names.
    #[serde(default)]
    pub fr_rel: HashMap<String, String>,
}

/// A frame and the frames it is related to, by typed relation field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameRecord {
    pub name: String,
    pub definition: Option<String>,
    pub relations: BTreeMap<RelationField, Vec<String>>,
}

impl FrameRecord {
    pub fn new(name: &str) -> Self {
        FrameRecord {
            name: name.trim().to_string(),
            definition: None,
            relations: BTreeMap::new(),
        }
    }

    pub fn from_raw(raw: RawFrameRecord) -> Self {
        let mut record = FrameRecord::new(&raw.frame_name);
        record.definition = raw.frame_def;
        for (label, value) in raw.fr_rel {
            match Relation::field_for_label(&label) {
                Some(field) => {
                    record
                        .relations
                        .entry(field)
                        .or_default()
                        .extend(split_frame_list(&value));
                }
                None => {
                    trace!(frame = %record.name, label = %label, "ignoring unknown relation label");
                }
            }
        }
        record
    }

    pub fn from_json_str(json: &str) -> crate::abstract_store::Result<Self> {
        let raw: RawFrameRecord = serde_json::from_str(json)?;
        Ok(FrameRecord::from_raw(raw))
    }

    /// Builder helper to set the related frames for one relation field.
    pub fn with_relation(mut self, relation: Relation, direction: Direction, names: &[&str]) -> Self {
        self.relations.insert(
            (relation, direction),
            names.iter().map(|name| name.trim().to_string()).collect(),
        );
        self
    }

    /// The related frame names for the given relation field; a field the
    /// record doesn't have is the same as an empty one.
    pub fn related(&self, relation: Relation, direction: Direction) -> &[String] {
        match self.relations.get(&(relation, direction)) {
            Some(names) => names.as_slice(),
            None => &[],
        }
    }
}
