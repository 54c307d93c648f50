//! Message bubble: the presentation node for one conversation turn.

use crate::core::component::Component;
use crate::core::text::width::{align_right, pad_to_width, visible_width};
use crate::core::text::wrap::wrap_text;
use crate::render::theme::{paint, Palette};

/// Indicator text shown while a bubble is loading.
pub const THINKING_TEXT: &str = "thinking…";

/// Narrowest bubble body, avatar excluded.
const MIN_BODY_WIDTH: usize = 8;

/// Avatar plus the separating space.
const AVATAR_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    User,
    Assistant,
}

impl RoleClass {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    #[must_use]
    pub fn avatar(self) -> &'static str {
        match self {
            Self::User => "🙂",
            Self::Assistant => "🤖",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Everything a bubble displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleProps {
    pub role: RoleClass,
    pub loading: bool,
    pub primary: String,
    pub secondary: Option<String>,
}

impl BubbleProps {
    #[must_use]
    pub fn new(role: RoleClass, primary: impl Into<String>) -> Self {
        Self {
            role,
            loading: false,
            primary: primary.into(),
            secondary: None,
        }
    }
}

/// Retained bubble with a per-width render cache.
#[derive(Debug, Clone)]
pub struct Bubble {
    props: BubbleProps,
    direction: TextDirection,
    palette: Option<Palette>,
    cached: Option<(usize, Vec<String>)>,
}

impl Bubble {
    #[must_use]
    pub fn new(props: BubbleProps) -> Self {
        Self {
            props,
            direction: TextDirection::Ltr,
            palette: None,
            cached: None,
        }
    }

    #[must_use]
    pub fn props(&self) -> &BubbleProps {
        &self.props
    }

    /// Replaces the props. Returns `false` (and keeps the cache) when nothing changed.
    pub fn set_props(&mut self, props: BubbleProps) -> bool {
        if self.props == props {
            return false;
        }
        self.props = props;
        self.invalidate();
        true
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        if self.direction != direction {
            self.direction = direction;
            self.invalidate();
        }
    }

    pub fn set_palette(&mut self, palette: Option<Palette>) {
        if self.palette != palette {
            self.palette = palette;
            self.invalidate();
        }
    }

    fn layout(&self, width: usize) -> Vec<String> {
        let bubble_width = (width * 3 / 4).max(MIN_BODY_WIDTH + AVATAR_COLUMNS).min(width);
        let body_width = bubble_width.saturating_sub(AVATAR_COLUMNS).max(1);

        let mut body: Vec<(String, Option<&'static str>)> = Vec::new();
        let role_style = self.palette.map(|palette| match self.props.role {
            RoleClass::User => palette.user,
            RoleClass::Assistant => palette.assistant,
        });

        if self.props.loading && self.props.primary.trim().is_empty() {
            body.push((
                THINKING_TEXT.to_string(),
                self.palette.map(|palette| palette.muted),
            ));
        } else {
            body.extend(
                wrap_text(&self.props.primary, body_width)
                    .into_iter()
                    .map(|line| (line, role_style)),
            );
        }

        if let Some(secondary) = self
            .props
            .secondary
            .as_deref()
            .filter(|note| !note.trim().is_empty())
        {
            let note_style = self.palette.map(|palette| palette.note);
            body.extend(
                wrap_text(secondary, body_width)
                    .into_iter()
                    .map(|line| (line, note_style)),
            );
        }

        let avatar = self.props.role.avatar();
        let blank_avatar = " ".repeat(visible_width(avatar));
        let inner_width = body.iter().map(|(line, _)| visible_width(line)).max().unwrap_or(0);

        body.into_iter()
            .enumerate()
            .map(|(index, (line, style))| {
                let badge = if index == 0 { avatar } else { blank_avatar.as_str() };
                let text = match style {
                    Some(code) => paint(code, &pad_to_width(&line, inner_width)),
                    None => pad_to_width(&line, inner_width),
                };
                let row = match self.direction {
                    TextDirection::Ltr => format!("{badge} {text}"),
                    TextDirection::Rtl => format!("{text} {badge}"),
                };
                let at_end = matches!(
                    (self.props.role, self.direction),
                    (RoleClass::User, TextDirection::Ltr) | (RoleClass::Assistant, TextDirection::Rtl)
                );
                if at_end {
                    align_right(&row, width)
                } else {
                    pad_to_width(&row, width).trim_end().to_string()
                }
            })
            .collect()
    }
}

impl Component for Bubble {
    fn render(&mut self, width: usize) -> Vec<String> {
        if let Some((cached_width, lines)) = &self.cached {
            if *cached_width == width {
                return lines.clone();
            }
        }

        let lines = self.layout(width);
        self.cached = Some((width, lines.clone()));
        lines
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(lines: &[String]) -> Vec<String> {
        lines.iter().map(|line| line.trim().to_string()).collect()
    }

    #[test]
    fn assistant_bubble_starts_with_avatar_on_the_left() {
        let mut bubble = Bubble::new(BubbleProps::new(RoleClass::Assistant, "hi there"));
        let lines = bubble.render(40);

        assert_eq!(lines, vec!["🤖 hi there".to_string()]);
    }

    #[test]
    fn user_bubble_is_right_aligned() {
        let mut bubble = Bubble::new(BubbleProps::new(RoleClass::User, "hello"));
        let lines = bubble.render(20);

        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("🙂 hello"));
        assert_eq!(visible_width(&lines[0]), 20);
    }

    #[test]
    fn loading_bubble_shows_thinking_indicator() {
        let mut props = BubbleProps::new(RoleClass::Assistant, "");
        props.loading = true;
        let mut bubble = Bubble::new(props);

        assert_eq!(strip(&bubble.render(40)), vec![format!("🤖 {THINKING_TEXT}")]);
    }

    #[test]
    fn secondary_note_renders_below_primary() {
        let mut props = BubbleProps::new(RoleClass::Assistant, "sorry");
        props.secondary = Some("HTTP 500".to_string());
        let mut bubble = Bubble::new(props);

        assert_eq!(strip(&bubble.render(40)), vec!["🤖 sorry", "HTTP 500"]);
    }

    #[test]
    fn rtl_moves_avatar_and_flips_alignment() {
        let mut bubble = Bubble::new(BubbleProps::new(RoleClass::Assistant, "سلام"));
        bubble.set_direction(TextDirection::Rtl);
        let lines = bubble.render(20);

        assert!(lines[0].ends_with("سلام 🤖"));
        assert_eq!(visible_width(&lines[0]), 20);
    }

    #[test]
    fn unchanged_props_keep_cache() {
        let mut bubble = Bubble::new(BubbleProps::new(RoleClass::User, "same"));
        bubble.render(30);

        assert!(!bubble.set_props(BubbleProps::new(RoleClass::User, "same")));
        assert!(bubble.cached.is_some());
        assert!(bubble.set_props(BubbleProps::new(RoleClass::User, "changed")));
        assert!(bubble.cached.is_none());
    }

    #[test]
    fn lines_never_exceed_width() {
        let mut bubble = Bubble::new(BubbleProps::new(
            RoleClass::Assistant,
            "a fairly long reply that has to wrap across several rows of output",
        ));
        for width in [20, 33, 72] {
            assert!(bubble
                .render(width)
                .iter()
                .all(|line| visible_width(line) <= width));
        }
    }
}
