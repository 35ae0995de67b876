use std::str::FromStr;

use tracing::{info, trace, trace_span};

use super::forest::Forest;
use crate::abstract_store::{FrameRecordStore, Result};
use crate::file_format::frame_record::{Direction, Relation};

/// Build the hierarchy of the given frames under the named relation.
///
/// `relation` must be one of "Inheritance", "Perspective", "Usage", "Subframe",
/// "Precedes" or "Causation" (case-insensitive); anything else is an
/// `InvalidRelation` error before any record is looked at.  When `reverse` is
/// set, each record's narrower frames are treated as its parents and the
/// hierarchy comes out upside down.
pub fn analyze_hierarchy(
    store: &dyn FrameRecordStore,
    frames: &[String],
    relation: &str,
    reverse: bool,
) -> Result<Forest> {
    let relation = Relation::from_str(relation)?;
    build_hierarchy(store, frames, relation, Direction::from_reverse_flag(reverse))
}

/// Typed core of `analyze_hierarchy`.  Frames are fetched from the store and
/// inserted one at a time in the order given; the resulting shape does not
/// depend on that order.
pub fn build_hierarchy(
    store: &dyn FrameRecordStore,
    frames: &[String],
    relation: Relation,
    direction: Direction,
) -> Result<Forest> {
    let span = trace_span!("build_hierarchy", relation = %relation, ?direction);
    let _span_guard = span.enter();

    let mut forest = Forest::new(relation, direction);
    for frame in frames {
        let record = store.lookup_record(frame)?;
        // The record's own name is canonical; file names can drift from it.
        let name = record.name.as_str();
        let parents = record.related(relation, direction);
        let _record_guard = trace_span!("insert_record", frame = name).entered();
        trace!(parents = parents.len(), "inserting");
        forest.insert(name, parents);
    }

    info!(
        relation = %relation,
        frames = frames.len(),
        distinct = forest.count_distinct(),
        roots = forest.count_roots(),
        positions = forest.count_nodes() - 1,
        "built hierarchy"
    );
    Ok(forest)
}

/// Build the hierarchy over every frame the store knows about.
pub fn build_hierarchy_for_all(
    store: &dyn FrameRecordStore,
    relation: Relation,
    direction: Direction,
) -> Result<Forest> {
    let frames = store.list_frames()?;
    build_hierarchy(store, &frames, relation, direction)
}
