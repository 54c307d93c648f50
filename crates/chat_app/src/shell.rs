//! Shell-level presentation state: theme, locale, direction and title.

use miniapp_chat::{TextDirection, Theme};

use crate::bridge::{Haptic, HostBridge};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TITLE: &str = "Chat";

const RTL_LANGUAGES: [&str; 4] = ["fa", "ar", "he", "ur"];
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Prompts offered as one-tap starters.
pub const SUGGESTIONS: &[&str] = &[
    "Summarize the key points of a long article for me",
    "Help me write a polite follow-up email",
    "Explain how HTTP caching works in simple terms",
];

/// Two lowercase letters from a raw locale such as `fa-IR` or `en_US.UTF-8`.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let code: String = raw.trim().chars().take(2).collect::<String>().to_ascii_lowercase();
    if code.len() == 2 && code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        Some(code)
    } else {
        None
    }
}

pub fn direction_for(locale: &str) -> TextDirection {
    if RTL_LANGUAGES.contains(&locale) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// `LANG`-style fallback locale from the process environment.
pub fn locale_from_env() -> Option<String> {
    LOCALE_ENV_VARS.iter().find_map(|key| {
        std::env::var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && value != "C" && value != "POSIX")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    theme: Theme,
    locale: String,
    direction: TextDirection,
    title: String,
}

impl Default for Shell {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            locale: DEFAULT_LOCALE.to_string(),
            direction: TextDirection::Ltr,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Shell {
    /// Resolves the locale from the host first, then `fallback_locale`, then `en`.
    pub fn bootstrap(
        bridge: &dyn HostBridge,
        fallback_locale: Option<&str>,
        title: Option<&str>,
        theme: Theme,
    ) -> Self {
        let locale = bridge
            .locale()
            .as_deref()
            .and_then(normalize_locale)
            .or_else(|| fallback_locale.and_then(normalize_locale))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let direction = direction_for(&locale);
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        tracing::debug!(%locale, direction = direction.as_str(), "shell bootstrapped");

        Self {
            theme,
            locale,
            direction,
            title,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Flips light/dark with a medium haptic pulse.
    pub fn toggle_theme(&mut self, bridge: &mut dyn HostBridge) -> Theme {
        self.theme = self.theme.toggled();
        bridge.haptic(Haptic::Medium);
        self.theme
    }
}
