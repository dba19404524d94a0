//! Non-owning view handles.
//!
//! The coordination layer never owns views. A host view participates through a
//! [`ViewId`] handle; the frames computed by layout evaluation are stored in a
//! [`ViewRegistry`] and read back by the host after each pass.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Rect;

/// Unique identifier for an externally-owned view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

impl ViewId {
    /// Allocate a new unique view handle.
    pub fn next() -> Self {
        ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stores the most recently computed frame for each placed view, in the
/// content coordinate space of the owning surface.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    frames: HashMap<ViewId, Rect>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn place(&mut self, view: ViewId, frame: Rect) {
        self.frames.insert(view, frame);
    }

    /// The last frame placed for `view`, if it has been placed at all.
    pub fn frame(&self, view: ViewId) -> Option<Rect> {
        self.frames.get(&view).copied()
    }
}
