//! Declarative layout for a coordinating surface.
//!
//! A [`SurfaceLayout`] is an ordered list of [`ViewPlacer`]s plus one content
//! size generator, all evaluated against a [`FrameOfReference`] snapshot.
//! Generators must be pure reads of the reference and of externally observed
//! sizes (interior cells refreshed before the pass); they must never trigger
//! another invalidation from inside a pass.

use crate::geometry::{Point, Rect, Size};
use crate::view::ViewId;

/// Immutable snapshot of the surface state a layout pass is evaluated
/// against. Produced once per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOfReference {
    pub previous_offset: Point,
    pub offset: Point,
    pub viewport_size: Size,
}

impl FrameOfReference {
    pub fn translation(&self) -> Point {
        self.offset - self.previous_offset
    }
}

pub type FrameGenerator = Box<dyn Fn(&FrameOfReference) -> Rect>;
pub type ViewUpdater = Box<dyn Fn(&FrameOfReference)>;
pub type ContentSizeGenerator = Box<dyn Fn(&FrameOfReference) -> Size>;

/// Binds one externally-owned view to the rule producing its frame.
///
/// Generated frames are in the coordinate space of the visible viewport; the
/// surface translates them by the current offset into content space when it
/// places the view.
pub struct ViewPlacer {
    view: ViewId,
    generate_frame: FrameGenerator,
    update_view: Option<ViewUpdater>,
}

impl ViewPlacer {
    pub fn new(view: ViewId, generate_frame: impl Fn(&FrameOfReference) -> Rect + 'static) -> Self {
        Self {
            view,
            generate_frame: Box::new(generate_frame),
            update_view: None,
        }
    }

    /// Attach a side-effecting update hook invoked with the same reference
    /// after the frame is generated.
    pub fn with_update(mut self, update_view: impl Fn(&FrameOfReference) + 'static) -> Self {
        self.update_view = Some(Box::new(update_view));
        self
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub(crate) fn generate_frame(&self, reference: &FrameOfReference) -> Rect {
        (self.generate_frame)(reference)
    }

    pub(crate) fn update_view(&self, reference: &FrameOfReference) {
        if let Some(update) = &self.update_view {
            update(reference);
        }
    }
}

/// Ordered placers (insertion order is z-order) plus the content size rule.
pub struct SurfaceLayout {
    placers: Vec<ViewPlacer>,
    content_size: ContentSizeGenerator,
}

impl SurfaceLayout {
    pub fn new(
        placers: Vec<ViewPlacer>,
        content_size: impl Fn(&FrameOfReference) -> Size + 'static,
    ) -> Self {
        Self {
            placers,
            content_size: Box::new(content_size),
        }
    }

    pub(crate) fn placers(&self) -> &[ViewPlacer] {
        &self.placers
    }

    pub(crate) fn content_size(&self, reference: &FrameOfReference) -> Size {
        (self.content_size)(reference)
    }
}
