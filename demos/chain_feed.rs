//! Chains two scrollable regions into one feed and prints the placed frames
//! while scrolling through the seam.

use coscroll::prelude::*;

fn main() {
    env_logger::init();

    let region_a = ScrollRegion::shared(Size::new(320.0, 800.0));
    let region_b = ScrollRegion::shared(Size::new(320.0, 600.0));
    let mut controller = ScrollChainController::new(region_a.clone(), region_b.clone());
    controller.set_viewport(Size::new(320.0, 480.0));

    println!(
        "chained content: {:?}",
        controller.surface().content_size()
    );

    for offset_y in [0.0, 200.0, 400.0, 800.0, 900.0] {
        controller.handle_scroll(Point::new(0.0, offset_y));
        let a = controller.view_frame(controller.a_view()).unwrap();
        let b = controller.view_frame(controller.b_view()).unwrap();
        println!(
            "offset={offset_y:6.1}: a.y={:7.1} (inner {:5.1})  b.y={:7.1} (inner {:5.1})",
            a.y,
            region_a.borrow().offset().y,
            b.y,
            region_b.borrow().offset().y,
        );
    }
}
