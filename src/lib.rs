//! A composable scroll-coordination engine.
//!
//! The core primitive is a [`surface::CoordinatingSurface`]: an outer scroll
//! surface that places externally-owned views through a declarative
//! [`layout::SurfaceLayout`] instead of scrolling content of its own. On top
//! of it sit two ready-made controllers:
//!
//! - [`coordinator::HeaderPagerController`] nests a stretchy header, a tab
//!   strip and paged scrollable content into one continuous scroll.
//! - [`chain::ScrollChainController`] chains two scrollable regions
//!   end-to-end.
//!
//! Hosts drive the engine with offsets and gesture phases and mirror the
//! resulting view frames, offsets and insets back into their own toolkit.

pub mod chain;
pub mod coordinator;
pub mod geometry;
pub mod layout;
pub mod pager;
pub mod recognizer;
pub mod region;
pub mod subscription;
pub mod surface;
pub mod tabs;
pub mod view;

pub mod prelude {
    pub use crate::chain::ScrollChainController;
    pub use crate::coordinator::HeaderPagerController;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::layout::{FrameOfReference, SurfaceLayout, ViewPlacer};
    pub use crate::pager::{Page, PageSwitcher, PagerEvent};
    pub use crate::recognizer::{ScrollActivity, ScrollChange, ScrollRecognizer, TouchPhase};
    pub use crate::region::{ScrollRegion, SharedScrollRegion};
    pub use crate::subscription::{Subscription, SubscriptionBag};
    pub use crate::surface::CoordinatingSurface;
    pub use crate::tabs::{PassiveTabStrip, ProactiveTabStrip, TabStrip, TabStripHandle};
    pub use crate::view::ViewId;
}
