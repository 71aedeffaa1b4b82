//! Theme styling module for the TUI UI layer.
//!
//! Two palettes are available, both derived from Nord: a dark one and a light
//! one. The header's dark-mode toggle picks between them; nothing else depends
//! on the choice.

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::{NordLightTheme, NordTheme};
pub use roles::Theme;

/// Build the palette matching the dark-mode preference.
pub fn load(dark_mode: bool) -> Box<dyn Theme> {
    if dark_mode {
        Box::new(NordTheme::new())
    } else {
        Box::new(NordLightTheme::new())
    }
}
