//! End-to-end coordination scenarios driven the way a host toolkit would
//! drive them: viewport setup, offset streams, gesture phases, tab taps.

use std::cell::RefCell;
use std::rc::Rc;

use coscroll::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct ScrollingPage {
    title: String,
    region: SharedScrollRegion,
}

impl ScrollingPage {
    fn boxed(title: &str, content_height: f32) -> (Box<dyn Page>, SharedScrollRegion) {
        let region = ScrollRegion::shared(Size::new(320.0, content_height));
        let page = Box::new(ScrollingPage {
            title: title.to_string(),
            region: region.clone(),
        });
        (page, region)
    }
}

impl Page for ScrollingPage {
    fn title(&self) -> &str {
        &self.title
    }
    fn scroll_region(&self) -> Option<SharedScrollRegion> {
        Some(self.region.clone())
    }
}

struct PlainPage;

impl Page for PlainPage {
    fn title(&self) -> &str {
        "plain"
    }
}

#[derive(Default)]
struct RecordingStrip {
    titles: Vec<String>,
    hidden: Option<bool>,
    highlights: Vec<(usize, bool)>,
    highlighter_offsets: Vec<f32>,
}

impl TabStrip for RecordingStrip {
    fn panel_height(&self) -> f32 {
        40.0
    }
    fn reload_data(&mut self, titles: &[String]) {
        self.titles = titles.to_vec();
    }
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = Some(hidden);
    }
}

impl PassiveTabStrip for RecordingStrip {
    fn highlight_item(&mut self, index: usize, animated: bool) {
        self.highlights.push((index, animated));
    }
}

impl ProactiveTabStrip for RecordingStrip {
    fn update_highlighter_offset(&mut self, page_offset: f32) {
        self.highlighter_offsets.push(page_offset);
    }
}

fn drag_by(controller: &mut HeaderPagerController, dy: f32) {
    let current = controller.outer_offset();
    controller.handle_scroll(Point::new(0.0, current.y + dy));
}

fn assert_calibrated(controller: &HeaderPagerController) {
    let inner = controller
        .active_scroll_region()
        .map(|region| region.borrow().offset().y)
        .unwrap_or(0.0);
    let expected = controller.header_height() - controller.panel_origin().y + inner;
    let actual = controller.outer_offset().y;
    assert!(
        (actual - expected).abs() < 1e-4,
        "outer offset {actual} should equal header - origin + inner = {expected}"
    );
}

#[test]
fn test_calibration_invariant_holds_through_mixed_gesture_walk() {
    init_logging();
    let (page, region) = ScrollingPage::boxed("feed", 3000.0);
    let mut controller = HeaderPagerController::new(250.0, vec![page], None);
    controller.set_viewport(Size::new(320.0, 480.0));
    assert_calibrated(&controller);

    for dy in [100.0, 200.0, -30.0, 500.0, -600.0, 40.0] {
        drag_by(&mut controller, dy);
        assert_calibrated(&controller);
        assert!(controller.panel_origin().y >= 0.0);
        assert!(region.borrow().offset().y >= 0.0);
    }
}

#[test]
fn test_hand_off_pull_down_drains_inner_then_opens_header() {
    init_logging();
    let (page, region) = ScrollingPage::boxed("feed", 2000.0);
    let mut controller = HeaderPagerController::new(250.0, vec![page], None);
    controller.set_viewport(Size::new(320.0, 480.0));

    // Collapse the header fully, then scroll the inner region to 10.
    drag_by(&mut controller, 250.0);
    drag_by(&mut controller, 10.0);
    assert_eq!(controller.panel_origin().y, 0.0);
    assert!((region.borrow().offset().y - 10.0).abs() < 1e-4);

    // One pull-down of 40: the first 10 drains the inner offset, the
    // remaining 30 reopens the header. No dead zone, no jump.
    drag_by(&mut controller, -40.0);
    assert_eq!(region.borrow().offset().y, 0.0);
    assert!((controller.panel_origin().y - 30.0).abs() < 1e-4);
    assert_calibrated(&controller);
}

#[test]
fn test_page_without_region_clamps_panel_at_top() {
    init_logging();
    let mut controller = HeaderPagerController::new(150.0, vec![Box::new(PlainPage)], None);
    controller.set_viewport(Size::new(320.0, 480.0));

    controller.handle_scroll(Point::new(0.0, 200.0));
    assert_eq!(controller.panel_origin().y, 0.0);
}

#[test]
fn test_page_switch_round_trip_restores_scroll_positions() {
    init_logging();
    let (page_a, region_a) = ScrollingPage::boxed("a", 2000.0);
    let (page_b, region_b) = ScrollingPage::boxed("b", 1600.0);
    let strip = Rc::new(RefCell::new(RecordingStrip::default()));
    let mut controller = HeaderPagerController::new(
        200.0,
        vec![page_a, page_b],
        Some(TabStripHandle::full(strip)),
    );
    controller.set_viewport(Size::new(320.0, 480.0));

    // Scroll page a deep: header collapses, inner takes 100.
    drag_by(&mut controller, 300.0);
    assert!((region_a.borrow().offset().y - 100.0).abs() < 1e-4);
    let page_a_offset = controller.outer_offset();

    // Switch to b: fresh page starts from its calibration default.
    controller.select_tab(1);
    assert_eq!(controller.pager().current_index(), 1);
    assert_calibrated(&controller);
    drag_by(&mut controller, 50.0);
    assert!((region_b.borrow().offset().y - 50.0).abs() < 1e-4);
    let page_b_offset = controller.outer_offset();

    // Back to a: the exact position comes back, including the inner offset.
    controller.select_tab(0);
    assert_eq!(controller.outer_offset(), page_a_offset);
    assert!((region_a.borrow().offset().y - 100.0).abs() < 1e-4);
    assert_calibrated(&controller);

    // And forward again to b.
    controller.select_tab(1);
    assert_eq!(controller.outer_offset(), page_b_offset);
    assert!((region_b.borrow().offset().y - 50.0).abs() < 1e-4);
}

#[test]
fn test_tab_selection_drives_strip_exactly_once() {
    init_logging();
    let (page_a, _region_a) = ScrollingPage::boxed("a", 2000.0);
    let (page_b, _region_b) = ScrollingPage::boxed("b", 1600.0);
    let (page_c, _region_c) = ScrollingPage::boxed("c", 1200.0);
    let strip = Rc::new(RefCell::new(RecordingStrip::default()));
    let mut controller = HeaderPagerController::new(
        200.0,
        vec![page_a, page_b, page_c],
        Some(TabStripHandle::full(strip.clone())),
    );
    controller.set_viewport(Size::new(320.0, 480.0));

    controller.select_tab(2);
    {
        let strip = strip.borrow();
        assert_eq!(strip.titles, vec!["a", "b", "c"]);
        assert_eq!(strip.hidden, Some(false));
        assert_eq!(strip.highlights, vec![(2, true)]);
        assert_eq!(strip.highlighter_offsets.last(), Some(&2.0));
    }

    // Selecting the current tab again must not re-notify.
    controller.select_tab(2);
    assert_eq!(strip.borrow().highlights, vec![(2, true)]);
}

#[test]
fn test_cancelled_page_gesture_leaves_state_untouched() {
    init_logging();
    let (page_a, region_a) = ScrollingPage::boxed("a", 2000.0);
    let (page_b, _region_b) = ScrollingPage::boxed("b", 1600.0);
    let mut controller = HeaderPagerController::new(200.0, vec![page_a, page_b], None);
    controller.set_viewport(Size::new(320.0, 480.0));
    drag_by(&mut controller, 300.0);
    let offset_before = controller.outer_offset();

    controller.begin_page_gesture();
    controller.finish_page_gesture(false, 1);

    assert_eq!(controller.pager().current_index(), 0);
    assert_eq!(controller.outer_offset(), offset_before);
    assert!((region_a.borrow().offset().y - 100.0).abs() < 1e-4);

    // The same gesture completed does land on b.
    controller.begin_page_gesture();
    controller.finish_page_gesture(true, 1);
    assert_eq!(controller.pager().current_index(), 1);
    assert_calibrated(&controller);
}

#[test]
fn test_layout_is_idempotent_between_inputs() {
    init_logging();
    let (page, _region) = ScrollingPage::boxed("feed", 2000.0);
    let mut controller = HeaderPagerController::new(200.0, vec![page], None);
    controller.set_viewport(Size::new(320.0, 480.0));
    drag_by(&mut controller, 120.0);

    let header = controller.view_frame(controller.header_view());
    let pager = controller.view_frame(controller.pager_view());
    let size = controller.surface().content_size();

    controller.invalidate_layout();
    controller.invalidate_layout();
    assert_eq!(controller.view_frame(controller.header_view()), header);
    assert_eq!(controller.view_frame(controller.pager_view()), pager);
    assert_eq!(controller.surface().content_size(), size);
}

#[test]
fn test_header_frame_tracks_panel_origin() {
    init_logging();
    let (page, _region) = ScrollingPage::boxed("feed", 2000.0);
    let mut controller = HeaderPagerController::new(200.0, vec![page], None);
    controller.set_viewport(Size::new(320.0, 480.0));

    drag_by(&mut controller, 80.0);
    let offset = controller.outer_offset();
    let header = controller.view_frame(controller.header_view()).unwrap();
    let pager = controller.view_frame(controller.pager_view()).unwrap();

    // In content coordinates the header hugs the top of the viewport and the
    // panel sits directly beneath it.
    assert_eq!(header.y, offset.y);
    assert_eq!(header.height, controller.panel_origin().y);
    assert_eq!(pager.y, header.max_y());
}

#[test]
fn test_proactive_strip_follows_page_drag() {
    init_logging();
    let (page_a, _region_a) = ScrollingPage::boxed("a", 2000.0);
    let (page_b, _region_b) = ScrollingPage::boxed("b", 1600.0);
    let strip = Rc::new(RefCell::new(RecordingStrip::default()));
    let mut controller = HeaderPagerController::new(
        200.0,
        vec![page_a, page_b],
        Some(TabStripHandle::full(strip.clone())),
    );
    controller.set_viewport(Size::new(320.0, 480.0));

    controller.begin_page_gesture();
    controller.set_page_drive(160.0, 320.0);
    assert_eq!(strip.borrow().highlighter_offsets.last(), Some(&0.5));

    controller.finish_page_gesture(true, 1);
    assert_eq!(strip.borrow().highlights, vec![(1, true)]);
}

#[test]
fn test_replacing_pages_resets_and_rebinds() {
    init_logging();
    let (page_a, _region_a) = ScrollingPage::boxed("a", 2000.0);
    let (page_b, _region_b) = ScrollingPage::boxed("b", 1600.0);
    let strip = Rc::new(RefCell::new(RecordingStrip::default()));
    let mut controller = HeaderPagerController::new(
        200.0,
        vec![page_a, page_b],
        Some(TabStripHandle::full(strip.clone())),
    );
    controller.set_viewport(Size::new(320.0, 480.0));
    drag_by(&mut controller, 300.0);
    controller.select_tab(1);

    let (page_c, region_c) = ScrollingPage::boxed("c", 900.0);
    controller.set_pages(vec![page_c]);

    assert_eq!(controller.pager().current_index(), 0);
    assert!(!region_c.borrow().is_scroll_enabled());
    assert_eq!(strip.borrow().hidden, Some(true));
    assert_calibrated(&controller);
}
