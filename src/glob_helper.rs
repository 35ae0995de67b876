/*
Frame selection by name.  FrameNet frame names are things like
"Intentionally_affect" or "Cause_to_make_progress", and exploratory work often
wants a slice of them rather than everything in the store.  Patterns use
https://crates.io/crates/globset syntax and are matched against the bare frame
name, not a path.

The "x-ing frames" (`Installing`, `Being_born`, but not `Process_stopping`) are
the ones whose first `_`-separated word ends in "ing".  No glob says that, so
it's a separate switch on the filter.
*/

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::abstract_store::{HierarchyError, Result};

/// Does the frame's first `_`-separated word end in "ing"?
pub fn is_x_ing_frame(frame: &str) -> bool {
    frame
        .split('_')
        .next()
        .is_some_and(|first_word| first_word.ends_with("ing"))
}

pub struct FrameFilter {
    globs: Option<GlobSet>,
    x_ing_only: bool,
}

impl FrameFilter {
    /// A filter that accepts every frame when `patterns` is empty and
    /// otherwise frames matching any of the patterns.
    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(FrameFilter {
                globs: None,
                x_ing_only: false,
            });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|err| {
                HierarchyError::bad_input(format!("bad frame glob {:?}: {}", pattern, err))
            })?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|err| HierarchyError::bad_input(err.to_string()))?;
        Ok(FrameFilter {
            globs: Some(globs),
            x_ing_only: false,
        })
    }

    /// Additionally require frames to be x-ing frames (see `is_x_ing_frame`).
    pub fn with_x_ing_only(mut self, x_ing_only: bool) -> Self {
        self.x_ing_only = x_ing_only;
        self
    }

    pub fn is_match(&self, frame: &str) -> bool {
        if self.x_ing_only && !is_x_ing_frame(frame) {
            return false;
        }
        match &self.globs {
            Some(globs) => globs.is_match(frame),
            None => true,
        }
    }

    /// Keep the frames the filter accepts, preserving their order.
    pub fn filter(&self, frames: Vec<String>) -> Vec<String> {
        frames
            .into_iter()
            .filter(|frame| self.is_match(frame))
            .collect()
    }
}
