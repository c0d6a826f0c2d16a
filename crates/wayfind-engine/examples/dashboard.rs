//! Example: walk the sample dashboard with the keyboard
//!
//! Run with `RUST_LOG=debug` to see every component at work.

use anyhow::Context;
use wayfind_engine::dom::{Dom, Key, KeyEvent};
use wayfind_engine::{sample, Config, Page};

fn main() -> anyhow::Result<()> {
    wayfind_engine::init_logging();

    let mut page = Page::new(sample::dashboard(), Config::default());
    page.register_default_landmarks()?;
    page.register_tabs("[role=\"tablist\"]")?;
    page.register_tooltips();
    page.register_dashboard_walkthrough()?;

    println!("Wayfind v{}", wayfind_engine::VERSION);

    // F6 through the landmarks
    for _ in 0..3 {
        page.key_down(&KeyEvent::new(Key::F6));
        page.advance(16);
        println!("  live: {}", live(&page)?);
    }

    // Guided tour, start to finish
    let launcher = page.dom().get_element_by_id("wt-tour-btn").context("no tour launcher")?;
    let steps = page.walkthrough().map_or(0, |w| w.steps().len());
    page.click(launcher);
    for _ in 0..steps {
        page.advance(400);
        println!("  live: {}", live(&page)?);
        page.key_down(&KeyEvent::new(Key::ArrowRight));
    }
    page.key_down(&KeyEvent::new(Key::Escape));
    page.advance(16);
    println!("  live: {}", live(&page)?);

    Ok(())
}

fn live(page: &Page) -> anyhow::Result<String> {
    let region = page
        .dom()
        .get_element_by_id(&page.config().live_region_id)
        .context("no live region")?;
    Ok(page.dom().text(region))
}
