//! Z-order management for node focus.
//!
//! A plain monotonic counter: the most recently focused element gets the
//! highest index. The manager only hands out indices; applying them to the
//! host's visual tree is the host's job.

/// First index handed out is `BASE_Z_INDEX + 1`, leaving room below for
/// static chrome.
const BASE_Z_INDEX: i64 = 10;

#[derive(Debug)]
pub struct LayerManager {
    top: i64,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManager {
    pub fn new() -> Self {
        Self { top: BASE_Z_INDEX }
    }

    /// Returns the new top z-index for the focused element. Strictly
    /// increasing per call: refocusing the same element still raises it,
    /// recency decides top rank, not identity.
    pub fn bring_to_front(&mut self) -> i64 {
        self.top += 1;
        self.top
    }

    pub fn current_top_index(&self) -> i64 {
        self.top
    }
}
