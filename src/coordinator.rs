//! Offset-coordination state machine.
//!
//! [`HeaderPagerController`] nests a stretchy header, a floating panel (the
//! tab strip plus pages) and the active page's own scrollable region inside
//! one coordinating surface, presenting them as a single continuous scroll.
//! On every recorded drag delta it decides how much goes to the outer offset,
//! the floating panel origin, and the active inner region, keeping the three
//! consistent through the calibration equation
//!
//! `outer.y == header_height - panel_origin.y + inner.y`
//!
//! re-established silently after every step so observed state never feeds
//! back into the change stream as a fresh user delta.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::{Point, Rect, Size};
use crate::layout::{SurfaceLayout, ViewPlacer};
use crate::pager::{Page, PageSwitcher, PagerEvent};
use crate::recognizer::{ScrollChange, TouchPhase};
use crate::region::SharedScrollRegion;
use crate::surface::CoordinatingSurface;
use crate::tabs::TabStripHandle;
use crate::view::ViewId;

/// State shared with the layout generators. Written only by the controller;
/// generators read it through `Cell`, so a layout pass can never invalidate
/// itself.
struct CoordinatorShared {
    panel_origin: Cell<Point>,
    header_height: Cell<f32>,
    /// Active page's content height plus the strip's content contribution,
    /// refreshed before every layout pass. `None` when the active page has no
    /// scrollable region.
    scrollable_content_height: Cell<Option<f32>>,
}

pub struct HeaderPagerController {
    surface: CoordinatingSurface,
    pager: PageSwitcher,
    header_view: ViewId,
    pager_view: ViewId,
    shared: Rc<CoordinatorShared>,
    active_region: Option<SharedScrollRegion>,
    touch_begins_in_panel: bool,
    cached_offset: HashMap<usize, Point>,
    cached_gap: HashMap<usize, f32>,
    last_content_height: Option<f32>,
}

impl HeaderPagerController {
    pub fn new(
        header_height: f32,
        pages: Vec<Box<dyn Page>>,
        tab_strip: Option<TabStripHandle>,
    ) -> Self {
        let pager = PageSwitcher::new(pages, tab_strip);
        let shared = Rc::new(CoordinatorShared {
            panel_origin: Cell::new(Point::new(0.0, header_height)),
            header_height: Cell::new(header_height),
            scrollable_content_height: Cell::new(None),
        });

        let header_view = ViewId::next();
        let pager_view = ViewId::next();

        let header_shared = shared.clone();
        let pager_shared = shared.clone();
        let size_shared = shared.clone();
        let layout = SurfaceLayout::new(
            vec![
                // The header fills the gap above the floating panel; it
                // stretches and collapses with the panel origin.
                ViewPlacer::new(header_view, move |reference| {
                    Rect::new(
                        0.0,
                        0.0,
                        reference.viewport_size.width,
                        header_shared.panel_origin.get().y,
                    )
                }),
                ViewPlacer::new(pager_view, move |reference| {
                    Rect::from_origin_size(
                        pager_shared.panel_origin.get(),
                        reference.viewport_size,
                    )
                }),
            ],
            move |reference| {
                let header_height = size_shared.header_height.get();
                match size_shared.scrollable_content_height.get() {
                    Some(content_height) => Size::new(
                        reference.viewport_size.width,
                        (reference.viewport_size.height - header_height)
                            .max(content_height + header_height),
                    ),
                    None => Size::new(
                        reference.viewport_size.width,
                        reference.viewport_size.height + header_height,
                    ),
                }
            },
        );

        let mut controller = Self {
            surface: CoordinatingSurface::new(layout),
            pager,
            header_view,
            pager_view,
            shared,
            active_region: None,
            touch_begins_in_panel: false,
            cached_offset: HashMap::new(),
            cached_gap: HashMap::new(),
            last_content_height: None,
        };
        controller.disable_native_scrolling();
        controller.bind_active_region();
        controller.invalidate_layout();
        controller.calibrate_content_offset();
        controller
    }

    // ----- host-facing surface state -----

    pub fn surface(&self) -> &CoordinatingSurface {
        &self.surface
    }

    pub fn pager(&self) -> &PageSwitcher {
        &self.pager
    }

    pub fn header_view(&self) -> ViewId {
        self.header_view
    }

    pub fn pager_view(&self) -> ViewId {
        self.pager_view
    }

    pub fn view_frame(&self, view: ViewId) -> Option<Rect> {
        self.surface.view_frame(view)
    }

    pub fn panel_origin(&self) -> Point {
        self.shared.panel_origin.get()
    }

    pub fn outer_offset(&self) -> Point {
        self.surface.offset()
    }

    pub fn header_height(&self) -> f32 {
        self.shared.header_height.get()
    }

    /// Change the stretchy header's default height. Triggers a layout
    /// invalidation and a recalibration.
    pub fn set_header_height(&mut self, header_height: f32) {
        self.shared.header_height.set(header_height);
        self.invalidate_layout();
        self.calibrate_content_offset();
        self.calibrate_content_inset();
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.surface.set_viewport(viewport);
        self.invalidate_layout();
    }

    pub fn active_scroll_region(&self) -> Option<SharedScrollRegion> {
        self.active_region.clone()
    }

    // ----- gesture entry points -----

    /// The host pan gesture began at `location` (content coordinates of the
    /// outer surface).
    pub fn begin_gesture(&mut self, location: Point) {
        self.surface
            .recognizer_mut()
            .set_touch(TouchPhase::Began, Some(location));
    }

    pub fn end_gesture(&mut self) {
        self.surface.recognizer_mut().set_touch(TouchPhase::Ended, None);
    }

    /// A gesture cancelled mid-flight needs no special repair: every branch
    /// clamps what it writes before returning.
    pub fn cancel_gesture(&mut self) {
        self.surface
            .recognizer_mut()
            .set_touch(TouchPhase::Cancelled, None);
    }

    /// The host surface's offset moved to `offset` under the user's drag.
    /// This is the single driven entry into the state machine.
    pub fn handle_scroll(&mut self, offset: Point) {
        let change = self.surface.drive_offset(offset);
        self.on_change(&change);
        if self.surface.recognizer().touch_phase() == TouchPhase::Began {
            let location = self.surface.recognizer().touch_location();
            self.surface
                .recognizer_mut()
                .set_touch(TouchPhase::Changed, location);
        }
    }

    // ----- page transitions -----

    /// Tab-strip selection callback (`did_select`), translated into a
    /// programmatic page transition.
    pub fn select_tab(&mut self, index: usize) {
        let events = self.pager.select(index);
        self.process_pager_events(events);
    }

    /// The host paging container started a gesture-driven page transition.
    pub fn begin_page_gesture(&mut self) {
        if let Some(event) = self.pager.begin_gesture_transition() {
            self.handle_pager_event(event);
        }
    }

    /// The host paging container finished (or cancelled) a gesture-driven
    /// transition toward `index`.
    pub fn finish_page_gesture(&mut self, completed: bool, index: usize) {
        if let Some(event) = self.pager.finish_gesture_transition(completed, index) {
            self.handle_pager_event(event);
        }
    }

    /// Horizontal drive state of the host paging container, for continuous
    /// tab-highlighter tracking.
    pub fn set_page_drive(&mut self, page_x: f32, page_width: f32) {
        self.pager.set_page_drive(page_x, page_width);
    }

    /// Replace the whole page set. Cached per-page scroll positions are
    /// dropped along with the pages they belonged to.
    pub fn set_pages(&mut self, pages: Vec<Box<dyn Page>>) {
        let events = self.pager.set_pages(pages);
        self.cached_offset.clear();
        self.cached_gap.clear();
        self.disable_native_scrolling();
        self.process_pager_events(events);
    }

    // ----- layout & calibration -----

    /// Re-evaluate layout. Detects asynchronous content-size changes of the
    /// active region (comparing snapshots, skipping when unchanged) and
    /// recalibrates when one happened.
    pub fn invalidate_layout(&mut self) {
        let content_changed = self.refresh_content_snapshot();
        self.surface.invalidate_layout();
        if content_changed {
            log::trace!(
                "content height changed -> recalibrating (now {:?})",
                self.last_content_height
            );
            self.calibrate_content_offset();
            self.calibrate_content_inset();
        }
    }

    /// Refresh the observed scrollable content height the layout generators
    /// read. Returns true when it differs from the previous snapshot.
    fn refresh_content_snapshot(&mut self) -> bool {
        let height = self.active_region.as_ref().map(|region| {
            region.borrow().content_height() + self.pager.panel_height_in_content()
        });
        self.shared.scrollable_content_height.set(height);
        let changed = height != self.last_content_height;
        self.last_content_height = height;
        changed
    }

    /// Re-establish `outer.y = header_height - panel_origin.y + inner.y` with
    /// a silent write.
    fn calibrate_content_offset(&mut self) -> Point {
        let header_height = self.shared.header_height.get();
        let panel_offset_y = header_height - self.shared.panel_origin.get().y;
        let inner_y = self
            .active_region
            .as_ref()
            .map(|region| region.borrow().offset().y)
            .unwrap_or(0.0);
        let offset = Point::new(0.0, panel_offset_y + inner_y);
        self.surface.set_offset_silent(offset);
        offset
    }

    /// Leading inset compensates the inner offset while the panel is not
    /// pinned at the top, so visible content doesn't double-count the scroll.
    fn calibrate_content_inset(&mut self) {
        let hit_top = self.shared.panel_origin.get().y <= 0.0;
        let top = if hit_top {
            0.0
        } else {
            -self
                .active_region
                .as_ref()
                .map(|region| region.borrow().offset().y)
                .unwrap_or(0.0)
        };
        self.surface.set_content_inset_top(top);
    }

    // ----- the state machine proper -----

    fn on_change(&mut self, change: &ScrollChange) {
        let translation = change.translation();
        if translation.y == 0.0 {
            return;
        }
        // Offset decreasing = finger pulling content down (header opening);
        // offset increasing = finger pushing content up.
        let pull_down = translation.y < 0.0;
        let origin = self.shared.panel_origin.get();
        let hit_top = origin.y <= 0.0;

        if change.phase == TouchPhase::Began {
            if let Some(location) = change.touch_location {
                let inside = self
                    .surface
                    .view_frame(self.pager_view)
                    .map(|frame| frame.contains(location))
                    .unwrap_or(false);
                self.touch_begins_in_panel = inside;
            }
        }

        match (self.active_region.clone(), hit_top) {
            (Some(region), true) => {
                if pull_down {
                    let mut region = region.borrow_mut();
                    if region.offset().y > 0.0 {
                        let new_offset = region.offset() + translation;
                        region.set_offset(Point::new(0.0, new_offset.y.max(0.0)));
                        if new_offset.y < 0.0 {
                            // Over-scroll: the remainder reopens the header.
                            self.shared
                                .panel_origin
                                .set(Point::new(0.0, origin.y - new_offset.y));
                        }
                    } else {
                        let new_origin = origin - translation;
                        self.shared
                            .panel_origin
                            .set(Point::new(0.0, new_origin.y.max(0.0)));
                    }
                } else {
                    // Panel pinned at top, pushing further up: the inner
                    // region takes the whole delta.
                    let mut region = region.borrow_mut();
                    let new_offset = region.offset() + translation;
                    region.set_offset(new_offset);
                }
            }

            (Some(region), false) => {
                if !pull_down {
                    let new_origin = origin - translation;
                    let y = new_origin.y;
                    self.shared.panel_origin.set(Point::new(0.0, y.max(0.0)));
                    if y < 0.0 {
                        // Over-scroll: the panel hit the top mid-delta; the
                        // excess keeps scrolling the inner region.
                        let mut region = region.borrow_mut();
                        let current = region.offset();
                        region.set_offset(Point::new(current.x, current.y - y));
                    }
                } else {
                    let mut region = region.borrow_mut();
                    if region.offset().y > 0.0 {
                        if self.touch_begins_in_panel {
                            let new_offset = region.offset() + translation;
                            region.set_offset(Point::new(0.0, new_offset.y.max(0.0)));
                            if new_offset.y < 0.0 {
                                self.shared
                                    .panel_origin
                                    .set(Point::new(0.0, origin.y - new_offset.y));
                            }
                        } else {
                            // Let the panel catch up visually while the inner
                            // content stays still. Pulling down only grows the
                            // origin, so no clamp is needed here.
                            let new_origin = origin - translation;
                            self.shared.panel_origin.set(Point::new(0.0, new_origin.y));
                        }
                    } else {
                        let new_origin = origin - translation;
                        self.shared
                            .panel_origin
                            .set(Point::new(0.0, new_origin.y.max(0.0)));
                    }
                }
                self.calibrate_content_inset();
            }

            (None, _) => {
                // No inner scrollable to coordinate with: the panel simply
                // follows the outer offset under the header.
                let y = (self.shared.header_height.get() - change.offset.y).max(0.0);
                self.shared.panel_origin.set(Point::new(0.0, y));
            }
        }

        self.invalidate_layout();
        self.calibrate_content_offset();
    }

    // ----- page-change protocol -----

    fn process_pager_events(&mut self, events: Vec<PagerEvent>) {
        for event in events {
            self.handle_pager_event(event);
        }
    }

    fn handle_pager_event(&mut self, event: PagerEvent) {
        match event {
            PagerEvent::WillScroll { from } => {
                // Snapshot the departing page's exact position so returning
                // to it restores the same scroll state.
                self.cached_offset.insert(from, self.surface.offset());
                self.cached_gap
                    .insert(from, self.shared.panel_origin.get().y);
            }
            PagerEvent::DidScroll { to } => {
                log::debug!("did scroll to page {to}");
                self.bind_active_region();

                let origin_y = self.shared.panel_origin.get().y;
                let offset = match self.cached_offset.get(&to).copied() {
                    Some(cached) => {
                        let gap = self
                            .cached_gap
                            .get(&to)
                            .copied()
                            .unwrap_or(self.shared.header_height.get());
                        Point::new(0.0, cached.y + gap - origin_y)
                    }
                    None => {
                        let inner_y = self
                            .active_region
                            .as_ref()
                            .map(|region| region.borrow().offset().y)
                            .unwrap_or(0.0);
                        Point::new(0.0, self.shared.header_height.get() - origin_y + inner_y)
                    }
                };
                self.surface.set_offset_silent(offset);
                self.invalidate_layout();
                // The content size just changed under the offset; write it
                // again so the restored position survives the new geometry.
                self.surface.set_offset_silent(offset);
                self.calibrate_content_inset();
            }
        }
    }

    /// Re-point the active-region relation at the current page and take over
    /// its scrolling. The old observation basis is replaced wholesale, so a
    /// page switch never registers as a content-size change.
    fn bind_active_region(&mut self) {
        self.active_region = self.pager.current_scroll_region();
        if let Some(region) = &self.active_region {
            region.borrow_mut().set_scroll_enabled(false);
        }
        self.refresh_content_snapshot();
    }

    fn disable_native_scrolling(&mut self) {
        for index in 0..self.pager.page_count() {
            if let Some(region) = self.pager.scroll_region_at(index) {
                region.borrow_mut().set_scroll_enabled(false);
            }
        }
    }
}
