//! Textual walkthrough of the header/pager coordination: drives a scroll
//! sequence and prints how the offset splits between header, panel and the
//! inner region. Run with `RUST_LOG=debug` for the engine's own trace.

use std::cell::RefCell;
use std::rc::Rc;

use coscroll::prelude::*;

struct FeedPage {
    title: String,
    region: SharedScrollRegion,
}

impl Page for FeedPage {
    fn title(&self) -> &str {
        &self.title
    }
    fn scroll_region(&self) -> Option<SharedScrollRegion> {
        Some(self.region.clone())
    }
}

struct PrintingStrip;

impl TabStrip for PrintingStrip {
    fn panel_height(&self) -> f32 {
        40.0
    }
    fn reload_data(&mut self, titles: &[String]) {
        println!("strip: tabs {titles:?}");
    }
    fn set_hidden(&mut self, hidden: bool) {
        println!("strip: hidden={hidden}");
    }
}

impl PassiveTabStrip for PrintingStrip {
    fn highlight_item(&mut self, index: usize, animated: bool) {
        println!("strip: highlight {index} (animated={animated})");
    }
}

fn main() {
    env_logger::init();

    let pages: Vec<Box<dyn Page>> = ["posts", "likes"]
        .into_iter()
        .map(|title| {
            Box::new(FeedPage {
                title: title.to_string(),
                region: ScrollRegion::shared(Size::new(320.0, 2000.0)),
            }) as Box<dyn Page>
        })
        .collect();

    let strip = Rc::new(RefCell::new(PrintingStrip));
    let mut controller =
        HeaderPagerController::new(200.0, pages, Some(TabStripHandle::passive(strip)));
    controller.set_viewport(Size::new(320.0, 480.0));

    let report = |controller: &HeaderPagerController, label: &str| {
        let inner = controller
            .active_scroll_region()
            .map(|region| region.borrow().offset().y)
            .unwrap_or(0.0);
        println!(
            "{label:>12}: outer={:7.1} panel_origin={:6.1} inner={:6.1}",
            controller.outer_offset().y,
            controller.panel_origin().y,
            inner,
        );
    };

    report(&controller, "initial");
    for dy in [80.0, 120.0, 150.0, -40.0] {
        let target = controller.outer_offset() + Point::new(0.0, dy);
        controller.handle_scroll(target);
        report(&controller, if dy < 0.0 { "pull down" } else { "push up" });
    }

    controller.select_tab(1);
    report(&controller, "tab 1");
    controller.select_tab(0);
    report(&controller, "back to 0");
}
