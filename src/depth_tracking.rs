use crate::error::{Error, Result};

/// Tracks the end markers of the nested objects being skipped, innermost last.
#[derive(Clone, Debug)]
pub struct DepthTracker {
    tracking: Vec<u8>,
    max_depth: usize,
}

impl DepthTracker {
    /// Create a new depth tracker
    pub fn new(max_depth: usize) -> Self {
        Self {
            tracking: Vec::new(),
            max_depth,
        }
    }

    /// Enter a nested object that runs until `end`.
    pub fn open(&mut self, end: u8) -> Result<()> {
        self.tracking.push(end);
        // Check to see if we hit the nesting limit
        if self.tracking.len() > self.max_depth {
            return Err(Error::ParseLimit(format!(
                "Nested objects deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// The end marker that closes the innermost open object, if any object is open.
    pub fn current(&self) -> Option<u8> {
        self.tracking.last().copied()
    }

    /// Leave the innermost object.
    pub fn close(&mut self) {
        self.tracking.pop();
    }
}
