//! Capability contract for the tab-strip widget.
//!
//! The strip itself is an external collaborator; the core only needs its
//! height, a way to push data and highlight updates out, and selection taps
//! coming back in (through the controller's `select_tab`). Optional
//! capabilities are supplied explicitly at construction instead of being
//! discovered by runtime downcasts.

use std::cell::RefCell;
use std::rc::Rc;

/// Base contract every tab strip provides.
pub trait TabStrip {
    /// Height of the strip panel in points.
    fn panel_height(&self) -> f32;
    /// Rebuild the strip's items from page titles.
    fn reload_data(&mut self, titles: &[String]);
    /// Hide or show the strip (hidden when fewer than two pages exist).
    fn set_hidden(&mut self, hidden: bool);
}

/// A strip that highlights whole items on discrete page changes.
pub trait PassiveTabStrip: TabStrip {
    fn highlight_item(&mut self, index: usize, animated: bool);
}

/// A strip that tracks a continuous page offset with its highlighter,
/// following in-flight page drags.
pub trait ProactiveTabStrip: TabStrip {
    /// `page_offset` ranges from -1 to the page count.
    fn update_highlighter_offset(&mut self, page_offset: f32);
}

/// Tagged-capability handle for one strip instance.
///
/// `base` is always present; `passive`/`proactive` point at the same
/// instance when it supports the extra capability.
pub struct TabStripHandle {
    base: Rc<RefCell<dyn TabStrip>>,
    passive: Option<Rc<RefCell<dyn PassiveTabStrip>>>,
    proactive: Option<Rc<RefCell<dyn ProactiveTabStrip>>>,
}

impl TabStripHandle {
    /// A strip with no optional capabilities.
    pub fn basic<T: TabStrip + 'static>(strip: Rc<RefCell<T>>) -> Self {
        Self {
            base: strip,
            passive: None,
            proactive: None,
        }
    }

    pub fn passive<T: PassiveTabStrip + 'static>(strip: Rc<RefCell<T>>) -> Self {
        Self {
            base: strip.clone(),
            passive: Some(strip),
            proactive: None,
        }
    }

    pub fn proactive<T: ProactiveTabStrip + 'static>(strip: Rc<RefCell<T>>) -> Self {
        Self {
            base: strip.clone(),
            passive: None,
            proactive: Some(strip),
        }
    }

    /// A strip supporting both optional capabilities.
    pub fn full<T: PassiveTabStrip + ProactiveTabStrip + 'static>(strip: Rc<RefCell<T>>) -> Self {
        Self {
            base: strip.clone(),
            passive: Some(strip.clone()),
            proactive: Some(strip),
        }
    }

    pub fn panel_height(&self) -> f32 {
        self.base.borrow().panel_height()
    }

    pub(crate) fn reload_data(&self, titles: &[String]) {
        self.base.borrow_mut().reload_data(titles);
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        self.base.borrow_mut().set_hidden(hidden);
    }

    pub(crate) fn highlight_item(&self, index: usize, animated: bool) {
        if let Some(passive) = &self.passive {
            passive.borrow_mut().highlight_item(index, animated);
        }
    }

    pub(crate) fn update_highlighter_offset(&self, page_offset: f32) {
        if let Some(proactive) = &self.proactive {
            proactive.borrow_mut().update_highlighter_offset(page_offset);
        }
    }
}
