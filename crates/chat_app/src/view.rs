use miniapp_chat::{paint, visible_width, wrap_text, Component, NodeTree};

use crate::app::ChatSession;
use crate::reconciler::Reconciler;

const PROMPT_MARKER: &str = "› ";
const WAITING_TEXT: &str = "… waiting for the reply";

/// Terminal rendition of a session: header, bubbles, then the input line.
#[derive(Debug, Default)]
pub struct ChatView {
    tree: NodeTree,
    reconciler: Reconciler,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(tree: NodeTree) -> Self {
        Self {
            tree,
            reconciler: Reconciler::new(),
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Applies the session's queued log events and shell settings to the tree.
    ///
    /// Returns the number of log events applied.
    pub fn sync(&mut self, session: &mut ChatSession) -> usize {
        self.tree.set_theme(session.shell().theme());
        self.tree.set_direction(session.shell().direction());

        let events = session.drain_log_events();
        for event in &events {
            self.reconciler.apply(&mut self.tree, event);
        }
        events.len()
    }

    pub fn render(&mut self, session: &ChatSession, width: usize) -> Vec<String> {
        let mut lines = vec![self.header(session, width), String::new()];

        let body = self.tree.render(width);
        if !body.is_empty() {
            lines.extend(body);
            lines.push(String::new());
        }

        if let Some(status) = session.status() {
            lines.extend(wrap_text(status, width));
        }

        let input = if session.input().is_enabled() {
            format!("{PROMPT_MARKER}{}", session.input().draft())
        } else {
            WAITING_TEXT.to_string()
        };
        lines.extend(wrap_text(&input, width));

        lines
    }

    fn header(&self, session: &ChatSession, width: usize) -> String {
        let shell = session.shell();
        let title = shell.title();
        let icon = shell.theme().icon();
        let gap = width
            .saturating_sub(visible_width(title) + visible_width(icon))
            .max(1);
        let line = format!("{title}{}{icon}", " ".repeat(gap));

        if self.tree.is_styled() {
            paint(shell.theme().palette().header, &line)
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use conversation_log::SequentialIdGenerator;
    use miniapp_chat::THINKING_TEXT;

    use super::*;
    use crate::app::HostOps;
    use crate::bridge::NoBridge;
    use crate::config::AppConfig;

    struct NullHost;

    impl HostOps for NullHost {
        fn start_request(
            &mut self,
            _model: String,
            _messages: Vec<chat_provider::WireMessage>,
        ) -> Result<chat_provider::RequestId, String> {
            Ok(1)
        }

        fn request_render(&mut self) {}

        fn request_stop(&mut self) {}
    }

    fn session() -> ChatSession {
        let config = AppConfig {
            title: Some("Vexa".to_string()),
            ..AppConfig::default()
        };
        ChatSession::with_collaborators(
            &config,
            Box::new(SequentialIdGenerator::default()),
            Box::new(NoBridge),
        )
    }

    #[test]
    fn header_carries_title_and_theme_icon() {
        let mut session = session();
        let mut view = ChatView::new();
        view.sync(&mut session);

        let lines = view.render(&session, 40);
        assert!(lines[0].starts_with("Vexa"));
        assert!(lines[0].ends_with("🌙"));
        assert_eq!(visible_width(&lines[0]), 40);
        assert_eq!(lines.last().map(String::as_str), Some(PROMPT_MARKER.trim_end()));
    }

    #[test]
    fn pending_reply_shows_thinking_and_waiting_line() {
        let mut session = session();
        let mut view = ChatView::new();

        session.on_input_replace("hello");
        session.on_submit(&mut NullHost);
        assert_eq!(view.sync(&mut session), 2);

        let lines = view.render(&session, 60);
        assert!(lines.iter().any(|line| line.contains(THINKING_TEXT)));
        assert_eq!(lines.last().map(String::as_str), Some(WAITING_TEXT));
        assert_eq!(view.tree().len(), 2);
    }
}
