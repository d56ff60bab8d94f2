//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`layout`]: Geometry recorded each frame for mouse handling
//! - [`style`]: Theming and colors

pub mod layout;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{menu_item_at, menu_rect};
pub use render::render;

/// Blank columns left of the page and the card grid.
pub const PAGE_LEFT_PADDING: u16 = 2;
