//! Paged-content switcher.
//!
//! Manages the page set, the active index, and inter-page transition
//! notifications. Transitions come from two sources: a direct selection (tab
//! tap) and gesture-driven paging in the host's paging container. Both emit
//! `WillScroll` at transition start and, only when the transition actually
//! completes, `DidScroll` plus the tab-strip capability updates. The switcher
//! returns events instead of calling back into its owner, keeping ownership
//! acyclic; the controller processes them.

use crate::region::SharedScrollRegion;
use crate::tabs::TabStripHandle;

/// A hosted page. Pages are externally defined; the core only needs a title
/// for the tab strip and, optionally, the page's embedded scrollable region.
pub trait Page {
    fn title(&self) -> &str {
        ""
    }

    /// The scrollable region this page owns, if any. Returning `Some` hands
    /// scroll control of that region over to the coordinator while the page
    /// is active.
    fn scroll_region(&self) -> Option<SharedScrollRegion> {
        None
    }
}

/// Transition notifications, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEvent {
    WillScroll { from: usize },
    DidScroll { to: usize },
}

pub struct PageSwitcher {
    pages: Vec<Box<dyn Page>>,
    current_index: usize,
    tab_strip: Option<TabStripHandle>,
    /// Horizontal drive state of the host paging container, used for the
    /// continuous page-offset fraction.
    page_x: f32,
    page_width: f32,
    /// Source index of a gesture transition in flight.
    pending_from: Option<usize>,
}

impl PageSwitcher {
    pub fn new(pages: Vec<Box<dyn Page>>, tab_strip: Option<TabStripHandle>) -> Self {
        let switcher = Self {
            pages,
            current_index: 0,
            tab_strip,
            page_x: 0.0,
            page_width: 0.0,
            pending_from: None,
        };
        switcher.reload_strip();
        switcher
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn titles(&self) -> Vec<String> {
        self.pages.iter().map(|page| page.title().to_string()).collect()
    }

    pub fn current_page(&self) -> Option<&dyn Page> {
        self.pages.get(self.current_index).map(|page| page.as_ref())
    }

    pub fn current_scroll_region(&self) -> Option<SharedScrollRegion> {
        self.current_page().and_then(|page| page.scroll_region())
    }

    pub fn scroll_region_at(&self, index: usize) -> Option<SharedScrollRegion> {
        self.pages.get(index).and_then(|page| page.scroll_region())
    }

    /// Height of the tab-strip panel; zero with no strip or no pages.
    pub fn panel_height(&self) -> f32 {
        if self.pages.is_empty() {
            return 0.0;
        }
        self.tab_strip
            .as_ref()
            .map(|strip| strip.panel_height())
            .unwrap_or(0.0)
    }

    /// The strip contributes to scrollable content height only when there is
    /// actually something to switch between.
    pub fn panel_height_in_content(&self) -> f32 {
        if self.pages.len() > 1 {
            self.panel_height()
        } else {
            0.0
        }
    }

    /// Continuous page position: the active index plus the in-flight drag
    /// fraction. A zero page width is treated as 1 to avoid dividing by zero.
    pub fn page_offset(&self) -> f32 {
        let width = if self.page_width == 0.0 { 1.0 } else { self.page_width };
        self.current_index as f32 + self.page_x / width
    }

    /// Update the horizontal drive state from the host paging container,
    /// tracking the highlighter of a proactive strip.
    pub fn set_page_drive(&mut self, page_x: f32, page_width: f32) {
        self.page_x = page_x;
        self.page_width = page_width;
        if let Some(strip) = &self.tab_strip {
            strip.update_highlighter_offset(self.page_offset());
        }
    }

    /// Direct selection (tab tap). Completes synchronously.
    pub fn select(&mut self, index: usize) -> Vec<PagerEvent> {
        if index == self.current_index || index >= self.pages.len() {
            return Vec::new();
        }
        let from = self.current_index;
        log::debug!("page select: {from} -> {index}");
        self.complete_transition(index);
        vec![
            PagerEvent::WillScroll { from },
            PagerEvent::DidScroll { to: index },
        ]
    }

    /// A gesture-driven page transition is starting. Returns the
    /// `WillScroll` notification, or `None` if one is already in flight.
    pub fn begin_gesture_transition(&mut self) -> Option<PagerEvent> {
        if self.pending_from.is_some() {
            return None;
        }
        self.pending_from = Some(self.current_index);
        Some(PagerEvent::WillScroll {
            from: self.current_index,
        })
    }

    /// Finish a gesture transition. A cancelled transition (`completed ==
    /// false`) emits nothing further.
    pub fn finish_gesture_transition(
        &mut self,
        completed: bool,
        index: usize,
    ) -> Option<PagerEvent> {
        let from = self.pending_from.take()?;
        if !completed || index >= self.pages.len() {
            return None;
        }
        log::debug!("page gesture: {from} -> {index}");
        self.complete_transition(index);
        Some(PagerEvent::DidScroll { to: index })
    }

    /// Replace the whole page set. Resets the active index to 0, reloads the
    /// strip (hiding it when fewer than two pages remain) and re-emits the
    /// did-scroll notification for index 0.
    pub fn set_pages(&mut self, pages: Vec<Box<dyn Page>>) -> Vec<PagerEvent> {
        self.pages = pages;
        self.current_index = 0;
        self.pending_from = None;
        self.page_x = 0.0;
        self.reload_strip();
        vec![PagerEvent::DidScroll { to: 0 }]
    }

    fn complete_transition(&mut self, index: usize) {
        self.current_index = index;
        self.page_x = 0.0;
        if let Some(strip) = &self.tab_strip {
            strip.update_highlighter_offset(self.page_offset());
            strip.highlight_item(index, true);
        }
    }

    fn reload_strip(&self) {
        if let Some(strip) = &self.tab_strip {
            strip.reload_data(&self.titles());
            strip.set_hidden(self.pages.len() < 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::tabs::{PassiveTabStrip, ProactiveTabStrip, TabStrip};

    struct TitledPage(&'static str);

    impl Page for TitledPage {
        fn title(&self) -> &str {
            self.0
        }
    }

    fn pages(titles: &[&'static str]) -> Vec<Box<dyn Page>> {
        titles
            .iter()
            .map(|title| Box::new(TitledPage(title)) as Box<dyn Page>)
            .collect()
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

    #[test]
    fn test_select_emits_will_then_did_once() {
        let mut switcher = PageSwitcher::new(pages(&["a", "b", "c", "d"]), None);
        let events = switcher.select(2);
        assert_eq!(
            events,
            vec![
                PagerEvent::WillScroll { from: 0 },
                PagerEvent::DidScroll { to: 2 },
            ]
        );
        assert_eq!(switcher.current_index(), 2);
    }

    #[test]
    fn test_select_same_or_out_of_range_is_a_no_op() {
        let mut switcher = PageSwitcher::new(pages(&["a", "b"]), None);
        assert!(switcher.select(0).is_empty());
        assert!(switcher.select(5).is_empty());
        assert_eq!(switcher.current_index(), 0);
    }

    #[test]
    fn test_cancelled_gesture_transition_emits_nothing_further() {
        let mut switcher = PageSwitcher::new(pages(&["a", "b"]), None);
        let will = switcher.begin_gesture_transition();
        assert_eq!(will, Some(PagerEvent::WillScroll { from: 0 }));

        let did = switcher.finish_gesture_transition(false, 1);
        assert_eq!(did, None);
        assert_eq!(switcher.current_index(), 0);

        // A new transition can start after the cancel.
        assert!(switcher.begin_gesture_transition().is_some());
        assert_eq!(
            switcher.finish_gesture_transition(true, 1),
            Some(PagerEvent::DidScroll { to: 1 })
        );
        assert_eq!(switcher.current_index(), 1);
    }

    #[test]
    fn test_completed_transition_drives_strip() {
        let strip = Rc::new(RefCell::new(RecordingStrip::default()));
        let mut switcher =
            PageSwitcher::new(pages(&["a", "b"]), Some(TabStripHandle::full(strip.clone())));

        switcher.select(1);
        let strip = strip.borrow();
        assert_eq!(strip.highlights, vec![(1, true)]);
        assert_eq!(strip.highlighter_offsets.last(), Some(&1.0));
    }

    #[test]
    fn test_set_pages_resets_and_hides_single_page_strip() {
        let strip = Rc::new(RefCell::new(RecordingStrip::default()));
        let mut switcher =
            PageSwitcher::new(pages(&["a", "b"]), Some(TabStripHandle::full(strip.clone())));
        assert_eq!(strip.borrow().hidden, Some(false));

        switcher.select(1);
        let events = switcher.set_pages(pages(&["only"]));
        assert_eq!(events, vec![PagerEvent::DidScroll { to: 0 }]);
        assert_eq!(switcher.current_index(), 0);
        assert_eq!(strip.borrow().hidden, Some(true));
        assert_eq!(strip.borrow().titles, vec!["only"]);
    }

    #[test]
    fn test_page_offset_guards_zero_width() {
        let mut switcher = PageSwitcher::new(pages(&["a", "b"]), None);
        switcher.set_page_drive(160.0, 0.0);
        // Width 0 treated as 1.
        assert_eq!(switcher.page_offset(), 160.0);

        switcher.set_page_drive(160.0, 320.0);
        assert_eq!(switcher.page_offset(), 0.5);
    }

    #[test]
    fn test_panel_height_in_content_requires_two_pages() {
        let strip = Rc::new(RefCell::new(RecordingStrip::default()));
        let switcher =
            PageSwitcher::new(pages(&["a"]), Some(TabStripHandle::full(strip.clone())));
        assert_eq!(switcher.panel_height(), 40.0);
        assert_eq!(switcher.panel_height_in_content(), 0.0);

        let switcher =
            PageSwitcher::new(pages(&["a", "b"]), Some(TabStripHandle::full(strip)));
        assert_eq!(switcher.panel_height_in_content(), 40.0);
    }
}
