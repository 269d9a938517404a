//! Neon theme system for the arena.
//!
//! Two palettes (night and day) mapped onto the handful of roles the battle
//! screen needs. Switchable at runtime and persisted through `Settings`.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeVariant {
    #[default]
    NeonNight,
    NeonDay,
}

impl ThemeVariant {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NeonNight => "NIGHT",
            Self::NeonDay => "DAY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorPalette {
    pub background: Color,
    pub foreground: Color,
    pub hero: Color,
    pub monster: Color,
    pub narrative: Color,
    pub muted: Color,
    pub selection: Color,
    pub warning: Color,
}

/// Roles a widget can be styled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text,
    Title,
    Background,
    /// Hero panel and the hero's turn banner.
    Hero,
    /// Monster panel and the monster's turn banner.
    Monster,
    Narrative,
    Highlight,
    Inactive,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Theme {
    variant: ThemeVariant,
    colors: ColorPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let colors = match variant {
            ThemeVariant::NeonNight => ColorPalette {
                background: Color::Rgb(16, 14, 32),    // #100e20
                foreground: Color::Rgb(222, 218, 255), // #dedaff
                hero: Color::Rgb(0, 229, 255),         // #00e5ff (cyan)
                monster: Color::Rgb(255, 56, 140),     // #ff388c (magenta)
                narrative: Color::Rgb(186, 160, 255),  // #baa0ff (violet)
                muted: Color::Rgb(98, 94, 130),        // #625e82
                selection: Color::Rgb(42, 36, 78),     // #2a244e
                warning: Color::Rgb(255, 196, 0),      // #ffc400
            },
            ThemeVariant::NeonDay => ColorPalette {
                background: Color::Rgb(246, 244, 252), // #f6f4fc
                foreground: Color::Rgb(40, 36, 64),    // #282440
                hero: Color::Rgb(0, 131, 160),         // #0083a0
                monster: Color::Rgb(196, 20, 96),      // #c41460
                narrative: Color::Rgb(98, 60, 190),    // #623cbe
                muted: Color::Rgb(150, 146, 176),      // #9692b0
                selection: Color::Rgb(226, 220, 246),  // #e2dcf6
                warning: Color::Rgb(184, 110, 0),      // #b86e00
            },
        };

        Self { variant, colors }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn colors(&self) -> &ColorPalette {
        &self.colors
    }

    pub fn toggle(&mut self) {
        let next = match self.variant {
            ThemeVariant::NeonNight => ThemeVariant::NeonDay,
            ThemeVariant::NeonDay => ThemeVariant::NeonNight,
        };
        *self = Self::new(next);
    }

    pub fn ratatui_style(&self, element: Element) -> Style {
        let base = Style::default().bg(self.colors.background);
        match element {
            Element::Text | Element::Background => base.fg(self.colors.foreground),
            Element::Title => base.fg(self.colors.hero).add_modifier(Modifier::BOLD),
            Element::Hero => base.fg(self.colors.hero),
            Element::Monster => base.fg(self.colors.monster),
            Element::Narrative => base
                .fg(self.colors.narrative)
                .add_modifier(Modifier::ITALIC),
            Element::Highlight => Style::default()
                .fg(self.colors.foreground)
                .bg(self.colors.selection)
                .add_modifier(Modifier::BOLD),
            Element::Inactive => base.fg(self.colors.muted),
            Element::Warning => base.fg(self.colors.warning),
        }
    }

    pub fn text_style(&self) -> Style {
        self.ratatui_style(Element::Text)
    }

    pub fn highlight_style(&self) -> Style {
        self.ratatui_style(Element::Highlight)
    }

    pub fn warning_style(&self) -> Style {
        self.ratatui_style(Element::Warning)
    }
}
