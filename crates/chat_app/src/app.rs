use chat_provider::{CompletionError, CompletionReply, RequestId, WireMessage};
use conversation_log::{
    IdGenerator, LogError, LogEvent, MessageLog, RandomIdGenerator, Turn, TurnId,
};
use miniapp_chat::Theme;

use crate::bridge::{Haptic, HostBridge, NoBridge};
use crate::commands::{parse_slash_command, SlashCommand, HELP_TEXT};
use crate::config::AppConfig;
use crate::projector::project;
use crate::reply::settlement_patch;
use crate::shell::{Shell, SUGGESTIONS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Sending {
        request_id: RequestId,
        placeholder: TurnId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A request is already in flight.
    Busy,
    Log(LogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    Command(SlashCommand),
    Sent { request_id: RequestId },
    /// The host could not start the request; the placeholder settled as a failure.
    DispatchFailed(String),
    Rejected(RejectReason),
}

/// Draft text plus the enabled flag the lifecycle toggles.
///
/// A disabled surface still accepts slash commands so a conversation can be
/// reset or the client quit while a reply is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSurface {
    draft: String,
    enabled: bool,
}

impl Default for InputSurface {
    fn default() -> Self {
        Self {
            draft: String::new(),
            enabled: true,
        }
    }
}

impl InputSurface {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

pub trait HostOps {
    /// Starts one completion call in the background and returns its id.
    fn start_request(
        &mut self,
        model: String,
        messages: Vec<WireMessage>,
    ) -> Result<RequestId, String>;
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

/// One conversation: the message log, the request lifecycle and the shell state.
pub struct ChatSession {
    log: MessageLog,
    mode: Mode,
    input: InputSurface,
    shell: Shell,
    bridge: Box<dyn HostBridge>,
    model: String,
    system_prompt: String,
    status: Option<String>,
    pub should_exit: bool,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("mode", &self.mode)
            .field("input", &self.input)
            .field("turns", &self.log.len())
            .field("shell", &self.shell)
            .field("model", &self.model)
            .finish()
    }
}

/// Restores the idle state when settlement finishes, however it finishes.
struct IdleOnDrop<'a> {
    mode: &'a mut Mode,
    input: &'a mut InputSurface,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        *self.mode = Mode::Idle;
        self.input.enabled = true;
    }
}

impl ChatSession {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_collaborators(
            config,
            Box::new(RandomIdGenerator::new()),
            Box::new(NoBridge),
        )
    }

    pub fn with_collaborators(
        config: &AppConfig,
        ids: Box<dyn IdGenerator>,
        bridge: Box<dyn HostBridge>,
    ) -> Self {
        let shell = Shell::bootstrap(
            bridge.as_ref(),
            None,
            config.title.as_deref(),
            Theme::default(),
        );

        Self {
            log: MessageLog::with_id_generator(ids),
            mode: Mode::Idle,
            input: InputSurface::default(),
            shell,
            bridge,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            status: None,
            should_exit: false,
        }
    }

    #[must_use]
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.mode, Mode::Sending { .. })
    }

    pub fn input(&self) -> &InputSurface {
        &self.input
    }

    pub fn snapshot(&self) -> &[Turn] {
        self.log.snapshot()
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Last command feedback line, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Wire history the next request would carry.
    pub fn projection(&self) -> Vec<WireMessage> {
        project(self.log.snapshot(), &self.system_prompt)
    }

    /// Takes the log change notifications queued since the last call.
    pub fn drain_log_events(&mut self) -> Vec<LogEvent> {
        self.log.drain_events()
    }

    pub fn on_input_replace(&mut self, text: impl Into<String>) {
        self.input.draft = text.into();
    }

    pub fn on_submit(&mut self, host: &mut dyn HostOps) -> SubmitOutcome {
        let prompt = self.input.draft.trim().to_string();

        if prompt.is_empty() {
            host.request_render();
            return SubmitOutcome::Ignored;
        }

        if let Some(command) = parse_slash_command(&prompt) {
            self.input.draft.clear();
            self.run_command(command.clone(), host);
            return SubmitOutcome::Command(command);
        }

        if self.is_sending() || !self.input.enabled {
            tracing::debug!("submission rejected while a request is in flight");
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }

        self.send(prompt, host)
    }

    fn send(&mut self, prompt: String, host: &mut dyn HostOps) -> SubmitOutcome {
        self.input.enabled = false;

        if let Err(error) = self.log.append_user(prompt) {
            tracing::error!(%error, "failed to record user turn");
            self.input.enabled = true;
            return SubmitOutcome::Rejected(RejectReason::Log(error));
        }
        self.input.draft.clear();
        self.status = None;

        let placeholder = match self.log.append_placeholder() {
            Ok(placeholder) => placeholder,
            Err(error) => {
                tracing::error!(%error, "failed to insert reply placeholder");
                self.input.enabled = true;
                return SubmitOutcome::Rejected(RejectReason::Log(error));
            }
        };

        let messages = project(self.log.snapshot(), &self.system_prompt);
        let outcome = match host.start_request(self.model.clone(), messages) {
            Ok(request_id) => {
                tracing::info!(request_id, model = %self.model, "completion request dispatched");
                self.mode = Mode::Sending {
                    request_id,
                    placeholder,
                };
                SubmitOutcome::Sent { request_id }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to dispatch completion request");
                self.settle(&placeholder, &Err(CompletionError::Internal(error.clone())));
                SubmitOutcome::DispatchFailed(error)
            }
        };

        host.request_render();
        outcome
    }

    /// Applies the result of request `request_id`.
    ///
    /// Returns `false` for a settlement that does not belong to the request in
    /// flight; such results change nothing.
    pub fn on_settled(
        &mut self,
        request_id: RequestId,
        outcome: Result<CompletionReply, CompletionError>,
    ) -> bool {
        let placeholder = match &self.mode {
            Mode::Sending {
                request_id: active,
                placeholder,
            } if *active == request_id => placeholder.clone(),
            _ => {
                tracing::debug!(request_id, "stale settlement ignored");
                return false;
            }
        };

        match &outcome {
            Ok(_) => tracing::info!(request_id, "completion request settled"),
            Err(error) => tracing::warn!(request_id, %error, "completion request failed"),
        }

        self.settle(&placeholder, &outcome);
        true
    }

    fn settle(
        &mut self,
        placeholder: &TurnId,
        outcome: &Result<CompletionReply, CompletionError>,
    ) {
        let _idle = IdleOnDrop {
            mode: &mut self.mode,
            input: &mut self.input,
        };

        match self.log.patch(placeholder, settlement_patch(outcome)) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(turn_id = %placeholder, "placeholder gone, settlement dropped");
            }
            Err(error) => tracing::error!(%error, "failed to settle placeholder"),
        }
    }

    /// Starts over. An in-flight request keeps running; its late result
    /// finds no placeholder and only re-enables input.
    pub fn on_new_conversation(&mut self, host: &mut dyn HostOps) {
        self.log.reset();
        self.status = Some("New conversation".to_string());
        tracing::info!(in_flight = self.is_sending(), "conversation reset");
        host.request_render();
    }

    pub fn on_toggle_theme(&mut self, host: &mut dyn HostOps) {
        let theme = self.shell.toggle_theme(self.bridge.as_mut());
        tracing::debug!(theme = theme.class_name(), "theme toggled");
        host.request_render();
    }

    /// Fills the draft with suggestion `index` (0-based).
    pub fn on_suggestion(&mut self, index: usize, host: &mut dyn HostOps) -> bool {
        let Some(prompt) = SUGGESTIONS.get(index) else {
            self.status = Some(format!("No suggestion #{}", index + 1));
            host.request_render();
            return false;
        };

        self.input.draft = (*prompt).to_string();
        self.bridge.haptic(Haptic::Light);
        host.request_render();
        true
    }

    pub fn on_quit(&mut self, host: &mut dyn HostOps) {
        self.should_exit = true;
        host.request_stop();
        host.request_render();
    }

    fn run_command(&mut self, command: SlashCommand, host: &mut dyn HostOps) {
        match command {
            SlashCommand::New => self.on_new_conversation(host),
            SlashCommand::Theme => self.on_toggle_theme(host),
            SlashCommand::Suggest(Some(number)) => {
                self.on_suggestion(number.saturating_sub(1), host);
            }
            SlashCommand::Suggest(None) => {
                let listing = SUGGESTIONS
                    .iter()
                    .enumerate()
                    .map(|(index, prompt)| format!("{}. {prompt}", index + 1))
                    .collect::<Vec<_>>()
                    .join("  ");
                self.status = Some(listing);
                host.request_render();
            }
            SlashCommand::Help => {
                self.status = Some(HELP_TEXT.to_string());
                host.request_render();
            }
            SlashCommand::Quit => self.on_quit(host),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use conversation_log::SequentialIdGenerator;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FailingHost;

    impl HostOps for FailingHost {
        fn start_request(
            &mut self,
            _model: String,
            _messages: Vec<WireMessage>,
        ) -> Result<RequestId, String> {
            Err("Failed to spawn request worker".to_string())
        }

        fn request_render(&mut self) {}

        fn request_stop(&mut self) {}
    }

    fn session() -> ChatSession {
        ChatSession::with_collaborators(
            &AppConfig::default(),
            Box::new(SequentialIdGenerator::default()),
            Box::new(NoBridge),
        )
    }

    #[test]
    fn dispatch_failure_settles_placeholder_immediately() {
        let mut session = session();
        session.on_input_replace("x");

        let outcome = session.on_submit(&mut FailingHost);

        assert_matches!(outcome, SubmitOutcome::DispatchFailed(error) if error.contains("spawn"));
        assert_eq!(session.mode(), &Mode::Idle);
        assert!(session.input().is_enabled());
        let reply = &session.snapshot()[1];
        assert!(!reply.is_pending());
        assert_eq!(reply.note(), Some("Failed to spawn request worker"));
    }

    #[test]
    fn settle_restores_idle_even_when_patch_is_refused() {
        let mut session = session();
        session.input.enabled = false;
        session.mode = Mode::Sending {
            request_id: 1,
            placeholder: TurnId::new("missing"),
        };

        assert!(session.on_settled(1, Err(CompletionError::Transport("down".to_string()))));

        assert_eq!(session.mode, Mode::Idle);
        assert!(session.input.enabled);
    }
}
