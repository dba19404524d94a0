//! Model of an inner scrollable region owned by a hosted page.
//!
//! A page that embeds scrollable content exposes it as a [`ScrollRegion`],
//! shared as `Rc<RefCell<_>>` between the page (its owner) and the
//! coordinator (a relation, not ownership). The coordinator disables the
//! region's native scrolling and becomes the sole writer of its offset while
//! the page is active.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{Point, Size};

pub type SharedScrollRegion = Rc<RefCell<ScrollRegion>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRegion {
    offset: Point,
    content_size: Size,
    scroll_enabled: bool,
}

impl ScrollRegion {
    pub fn new(content_size: Size) -> Self {
        Self {
            offset: Point::ZERO,
            content_size,
            scroll_enabled: true,
        }
    }

    /// Convenience for the common shared form.
    pub fn shared(content_size: Size) -> SharedScrollRegion {
        Rc::new(RefCell::new(Self::new(content_size)))
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn content_height(&self) -> f32 {
        self.content_size.height
    }

    /// Called by the owning page when its content grows or shrinks
    /// asynchronously (e.g. a list loading more rows).
    pub fn set_content_size(&mut self, content_size: Size) {
        self.content_size = content_size;
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_region_defaults() {
        let region = ScrollRegion::new(Size::new(320.0, 1000.0));
        assert_eq!(region.offset(), Point::ZERO);
        assert_eq!(region.content_height(), 1000.0);
        assert!(region.is_scroll_enabled());
    }

    #[test]
    fn test_offset_and_content_size_updates() {
        let region = ScrollRegion::shared(Size::new(320.0, 600.0));
        region.borrow_mut().set_offset(Point::new(0.0, 42.0));
        region
            .borrow_mut()
            .set_content_size(Size::new(320.0, 900.0));

        assert_eq!(region.borrow().offset(), Point::new(0.0, 42.0));
        assert_eq!(region.borrow().content_height(), 900.0);
    }
}
