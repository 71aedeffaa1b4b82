//! Nord palettes mapped to the application's theme roles: the canonical dark
//! "Polar Night" variant and a light variant built on "Snow Storm".

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Polar Night (base surfaces)
pub const N0: Color = Color::Rgb(0x2E, 0x34, 0x40); // #2E3440
pub const N1: Color = Color::Rgb(0x3B, 0x42, 0x52); // #3B4252
pub const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A); // #4C566A

// Snow Storm (foregrounds on dark, surfaces on light)
pub const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9); // #D8DEE9
pub const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0); // #E5E9F0
pub const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4); // #ECEFF4

// Frost (non-semantic accents)
pub const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0); // #88C0D0
pub const F2: Color = Color::Rgb(0x81, 0xA1, 0xC1); // #81A1C1
pub const F3: Color = Color::Rgb(0x5E, 0x81, 0xAC); // #5E81AC

// Aurora (semantic status)
pub const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A); // #BF616A
pub const A_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C); // #A3BE8C

const TEXT_MUTED_DARK: Color = Color::Rgb(0x61, 0x6E, 0x88); // #616E88
const TEXT_MUTED_LIGHT: Color = Color::Rgb(0x7B, 0x88, 0xA1); // #7B88A1

fn build_dark_roles() -> ThemeRoles {
    ThemeRoles {
        background: N0,
        surface: N1,
        border: N3,

        text: S0,
        text_secondary: S1,
        text_muted: TEXT_MUTED_DARK,

        accent_primary: F1,

        info: F2,
        success: A_GREEN,
        error: A_RED,

        selection_bg: N3,
        selection_fg: S2,
        focus: F1,
        badge_fg: N0,
    }
}

fn build_light_roles() -> ThemeRoles {
    ThemeRoles {
        background: S2,
        surface: S1,
        border: F2,

        text: N0,
        text_secondary: N1,
        text_muted: TEXT_MUTED_LIGHT,

        accent_primary: F3,

        info: F3,
        success: A_GREEN,
        error: A_RED,

        selection_bg: S0,
        selection_fg: N0,
        focus: F3,
        badge_fg: S2,
    }
}

/// Nord theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self { roles: build_dark_roles() }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }

    fn is_dark(&self) -> bool {
        true
    }
}

/// Light variant of the Nord palette.
#[derive(Debug, Clone)]
pub struct NordLightTheme {
    roles: ThemeRoles,
}

impl NordLightTheme {
    pub fn new() -> Self {
        Self { roles: build_light_roles() }
    }
}

impl Default for NordLightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordLightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }

    fn is_dark(&self) -> bool {
        false
    }
}
