use ratatui::style::{Color, Modifier, Style};

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord"];

/// Every color the view uses, in one struct.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ── Brand ────────────────────────────────────────────────
    pub accent: Color,
    pub accent_secondary: Color,
    pub bg_dark: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic ─────────────────────────────────────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    pub row_alt_bg: Color,
    pub border: Color,
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            accent_secondary: Color::Rgb(129, 230, 217),
            bg_dark: Color::Rgb(22, 22, 30),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            row_alt_bg: Color::Rgb(30, 30, 42),
            border: Color::Rgb(55, 55, 75),
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),            // yellow
            accent_secondary: Color::Rgb(142, 192, 124), // green
            bg_dark: Color::Rgb(40, 40, 40),             // bg0
            text_primary: Color::Rgb(235, 219, 178),     // fg
            text_dim: Color::Rgb(168, 153, 132),         // fg4
            text_muted: Color::Rgb(102, 92, 84),         // bg4
            success: Color::Rgb(142, 192, 124),
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            row_alt_bg: Color::Rgb(50, 48, 47),
            border: Color::Rgb(80, 73, 69),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),           // nord8
            accent_secondary: Color::Rgb(143, 188, 187), // nord7
            bg_dark: Color::Rgb(46, 52, 64),             // nord0
            text_primary: Color::Rgb(229, 233, 240),     // nord5
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            danger: Color::Rgb(191, 97, 106),
            row_alt_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(76, 86, 106),
        }
    }

    /// Look up a built-in theme (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    /// Like [`by_name`](Self::by_name), falling back to the default theme.
    pub fn resolve(name: &str) -> Self {
        Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Self::default_dark()
        })
    }

    // ── Styles ───────────────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.bg_dark)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.accent_secondary)
    }

    pub fn value_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}
