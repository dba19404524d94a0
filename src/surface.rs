//! The outer coordinating scroll surface.
//!
//! The surface never scrolls content of its own. It owns the offset, content
//! size and insets, re-evaluates its [`SurfaceLayout`] whenever geometry is
//! invalidated, and forwards driven offset mutations to the recognizer. The
//! two write paths are deliberately distinct:
//!
//! - [`drive_offset`](CoordinatingSurface::drive_offset) is a user/host
//!   mutation: it records through the recognizer and notifies subscribers.
//! - [`set_offset_silent`](CoordinatingSurface::set_offset_silent) is a
//!   calibration write: stored offsets move, nobody is notified, and the
//!   translation is zeroed so no feedback loop can form.

use bitflags::bitflags;

use crate::geometry::{Point, Rect, Size};
use crate::layout::{FrameOfReference, SurfaceLayout};
use crate::recognizer::{ScrollChange, ScrollRecognizer};
use crate::view::{ViewId, ViewRegistry};

bitflags! {
    /// Pending invalidation work, coalesced across re-entrant requests.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct ChangeFlags: u8 {
        const NEEDS_PLACEMENT    = 0b01;
        const NEEDS_CONTENT_SIZE = 0b10;
    }
}

pub struct CoordinatingSurface {
    recognizer: ScrollRecognizer,
    layout: SurfaceLayout,
    registry: ViewRegistry,
    viewport: Size,
    content_size: Size,
    content_inset_top: f32,
    content_inset_bottom: f32,
    pending: ChangeFlags,
    in_pass: bool,
}

impl CoordinatingSurface {
    pub fn new(layout: SurfaceLayout) -> Self {
        Self {
            recognizer: ScrollRecognizer::new(),
            layout,
            registry: ViewRegistry::new(),
            viewport: Size::zero(),
            content_size: Size::zero(),
            content_inset_top: 0.0,
            content_inset_bottom: 0.0,
            pending: ChangeFlags::empty(),
            in_pass: false,
        }
    }

    pub fn recognizer(&self) -> &ScrollRecognizer {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut ScrollRecognizer {
        &mut self.recognizer
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Store the viewport size. The caller is expected to invalidate layout
    /// afterwards; the surface does not do it implicitly so a controller can
    /// refresh observed sizes first.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn offset(&self) -> Point {
        self.recognizer.offset()
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn content_inset_top(&self) -> f32 {
        self.content_inset_top
    }

    pub fn set_content_inset_top(&mut self, inset: f32) {
        self.content_inset_top = inset;
    }

    pub fn content_inset_bottom(&self) -> f32 {
        self.content_inset_bottom
    }

    pub fn set_content_inset_bottom(&mut self, inset: f32) {
        self.content_inset_bottom = inset;
    }

    /// Last placed frame of a view, in content coordinates.
    pub fn view_frame(&self, view: ViewId) -> Option<Rect> {
        self.registry.frame(view)
    }

    pub fn frame_of_reference(&self) -> FrameOfReference {
        FrameOfReference {
            previous_offset: self.recognizer.last_offset(),
            offset: self.recognizer.offset(),
            viewport_size: self.viewport,
        }
    }

    /// A user/host-driven offset mutation. Records through the recognizer
    /// (notifying its subscribers exactly once) and re-places mapped views at
    /// the new offset.
    pub fn drive_offset(&mut self, offset: Point) -> ScrollChange {
        let change = self.recognizer.record(offset);
        self.place_views();
        change
    }

    /// Calibration write: moves the offset without re-entering the change
    /// stream.
    pub fn set_offset_silent(&mut self, offset: Point) {
        self.recognizer.calibrate(offset);
        self.place_views();
    }

    /// Re-evaluate every placer and the content size generator.
    ///
    /// Idempotent: two consecutive calls with unchanged state produce
    /// identical placements and content size. Requests arriving while a pass
    /// is running are flattened into one subsequent pass instead of recursing.
    pub fn invalidate_layout(&mut self) {
        self.pending |= ChangeFlags::NEEDS_PLACEMENT | ChangeFlags::NEEDS_CONTENT_SIZE;
        if self.in_pass {
            return;
        }
        self.in_pass = true;
        while !self.pending.is_empty() {
            self.pending = ChangeFlags::empty();
            let reference = self.frame_of_reference();
            self.place_views_with(&reference);
            self.content_size = self.layout.content_size(&reference);
        }
        self.in_pass = false;
        log::trace!(
            "layout pass: offset={:?} content_size={:?}",
            self.offset(),
            self.content_size
        );
    }

    fn place_views(&mut self) {
        let reference = self.frame_of_reference();
        self.place_views_with(&reference);
    }

    fn place_views_with(&mut self, reference: &FrameOfReference) {
        for placer in self.layout.placers() {
            let visible = placer.generate_frame(reference);
            self.registry.place(placer.view(), visible + reference.offset);
            placer.update_view(reference);
        }
    }
}
