//! Vertical chaining of two scrollable regions.
//!
//! [`ScrollChainController`] stacks two independently scrollable regions in
//! one coordinating surface so they read as a single continuous feed: region
//! A scrolls to its end, then region B begins. Both regions' native scrolling
//! is taken over; the surface offset is the only scroll state and the
//! placers derive each region's frame and offset from it.

use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::{Point, Rect, Size};
use crate::layout::{SurfaceLayout, ViewPlacer};
use crate::region::SharedScrollRegion;
use crate::surface::CoordinatingSurface;
use crate::view::ViewId;

/// Content heights snapshotted before each layout pass, read by the placer
/// closures through `Cell`.
struct ChainShared {
    a_height: Cell<f32>,
    b_height: Cell<f32>,
}

impl ChainShared {
    /// Visible height region A occupies at `offset_y`.
    fn a_visible_height(&self, viewport: Size, offset_y: f32) -> f32 {
        let potential = offset_y.min((self.a_height.get() - viewport.height).max(0.0));
        viewport
            .height
            .min(self.a_height.get() + (-potential).max(0.0))
    }

    /// Visible y of region A's frame; negative once A scrolls off the top.
    fn a_visible_y(&self, viewport: Size, offset_y: f32) -> f32 {
        let y = (self.a_height.get() - viewport.height).max(0.0) - offset_y;
        y.min(0.0)
    }
}

pub struct ScrollChainController {
    surface: CoordinatingSurface,
    region_a: SharedScrollRegion,
    region_b: SharedScrollRegion,
    a_view: ViewId,
    b_view: ViewId,
    shared: Rc<ChainShared>,
}

impl ScrollChainController {
    pub fn new(region_a: SharedScrollRegion, region_b: SharedScrollRegion) -> Self {
        region_a.borrow_mut().set_scroll_enabled(false);
        region_b.borrow_mut().set_scroll_enabled(false);

        let shared = Rc::new(ChainShared {
            a_height: Cell::new(region_a.borrow().content_height()),
            b_height: Cell::new(region_b.borrow().content_height()),
        });

        let a_view = ViewId::next();
        let b_view = ViewId::next();

        let a_frame_shared = shared.clone();
        let a_update_shared = shared.clone();
        let a_update_region = region_a.clone();
        let b_frame_shared = shared.clone();
        let b_update_shared = shared.clone();
        let b_update_region = region_b.clone();
        let size_shared = shared.clone();

        let layout = SurfaceLayout::new(
            vec![
                ViewPlacer::new(a_view, move |reference| {
                    let shared = &a_frame_shared;
                    Rect::new(
                        0.0,
                        shared.a_visible_y(reference.viewport_size, reference.offset.y),
                        reference.viewport_size.width,
                        shared.a_visible_height(reference.viewport_size, reference.offset.y),
                    )
                })
                .with_update(move |reference| {
                    // A scrolls internally until its end is on screen, then
                    // pins.
                    let limit = (a_update_shared.a_height.get()
                        - reference.viewport_size.height)
                        .max(0.0);
                    a_update_region
                        .borrow_mut()
                        .set_offset(Point::new(0.0, reference.offset.y.min(limit)));
                }),
                ViewPlacer::new(b_view, move |reference| {
                    let shared = &b_frame_shared;
                    let a_bottom = shared
                        .a_visible_y(reference.viewport_size, reference.offset.y)
                        + shared.a_visible_height(reference.viewport_size, reference.offset.y);
                    Rect::new(
                        0.0,
                        a_bottom.max(0.0),
                        reference.viewport_size.width,
                        reference.viewport_size.height,
                    )
                })
                .with_update(move |reference| {
                    let a_height = b_update_shared.a_height.get();
                    let offset = if reference.offset.y > a_height {
                        reference.offset - Point::new(0.0, a_height.max(0.0))
                    } else {
                        Point::ZERO
                    };
                    b_update_region.borrow_mut().set_offset(offset);
                }),
            ],
            move |reference| {
                Size::new(
                    reference.viewport_size.width,
                    size_shared.a_height.get() + size_shared.b_height.get(),
                )
            },
        );

        Self {
            surface: CoordinatingSurface::new(layout),
            region_a,
            region_b,
            a_view,
            b_view,
            shared,
        }
    }

    pub fn surface(&self) -> &CoordinatingSurface {
        &self.surface
    }

    pub fn a_view(&self) -> ViewId {
        self.a_view
    }

    pub fn b_view(&self) -> ViewId {
        self.b_view
    }

    pub fn view_frame(&self, view: ViewId) -> Option<Rect> {
        self.surface.view_frame(view)
    }

    pub fn outer_offset(&self) -> Point {
        self.surface.offset()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.surface.set_viewport(viewport);
        self.invalidate_layout();
    }

    /// The host surface's offset moved under the user's drag.
    pub fn handle_scroll(&mut self, offset: Point) {
        self.surface.drive_offset(offset);
    }

    /// Re-evaluate layout after either region's content changed.
    pub fn invalidate_layout(&mut self) {
        self.refresh_heights();
        self.surface.invalidate_layout();
    }

    fn refresh_heights(&mut self) {
        self.shared
            .a_height
            .set(self.region_a.borrow().content_height());
        self.shared
            .b_height
            .set(self.region_b.borrow().content_height());
    }
}
