//! Chromium page access for PriceScout.
//!
//! One browser and one page per session; the page is reused across every
//! capture so collapsed-element state persists between agent turns. Only the
//! capture pipeline and the expansion executor touch it.

mod driver;
mod errors;
mod stabilize;

pub use driver::{BrowserSettings, ChromiumPageDriver, ClipRegion, PageDriver};
pub use errors::PageError;
pub use stabilize::RenderStabilizer;

/// Fixed viewport applied to every session page.
pub const VIEWPORT_WIDTH: u32 = 1200;
pub const VIEWPORT_HEIGHT: u32 = 900;
