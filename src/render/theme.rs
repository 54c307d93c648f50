//! Light/dark theme and the SGR palette used to paint rendered lines.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub fn is_light(self) -> bool {
        self == Self::Light
    }

    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Icon shown on the theme toggle.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀️",
        }
    }

    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                user: "1;36",
                assistant: "37",
                muted: "2;37",
                note: "33",
                header: "1;37",
            },
            Self::Light => Palette {
                user: "1;34",
                assistant: "30",
                muted: "2;30",
                note: "31",
                header: "1;30",
            },
        }
    }
}

/// SGR parameter strings per text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub user: &'static str,
    pub assistant: &'static str,
    pub muted: &'static str,
    pub note: &'static str,
    pub header: &'static str,
}

/// Wraps `text` in the SGR sequence `code` and a reset.
#[must_use]
pub fn paint(code: &str, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
}
