use chat_provider::{WireMessage, WireRole};
use conversation_log::{Role, Turn};

/// Builds the wire history for one request.
///
/// One synthetic system entry carrying `system_prompt`, then every settled
/// turn in log order. Pending turns never reach the wire.
#[must_use]
pub fn project(turns: &[Turn], system_prompt: &str) -> Vec<WireMessage> {
    std::iter::once(WireMessage::system(system_prompt))
        .chain(
            turns
                .iter()
                .filter(|turn| !turn.is_pending())
                .map(|turn| WireMessage::new(wire_role(turn.role()), turn.content())),
        )
        .collect()
}

fn wire_role(role: Role) -> WireRole {
    match role {
        Role::User => WireRole::User,
        Role::Assistant => WireRole::Assistant,
    }
}

#[cfg(test)]
mod tests {
    use conversation_log::{MessageLog, SequentialIdGenerator, TurnPatch};
    use pretty_assertions::assert_eq;

    use super::*;

    fn log() -> MessageLog {
        MessageLog::with_id_generator(Box::new(SequentialIdGenerator::default()))
    }

    #[test]
    fn empty_log_projects_only_the_system_entry() {
        assert_eq!(
            project(&[], "be brief"),
            vec![WireMessage::system("be brief")]
        );
    }

    #[test]
    fn pending_turns_are_excluded() {
        let mut log = log();
        log.append_user("hello").expect("user turn");
        let placeholder = log.append_placeholder().expect("placeholder");

        assert_eq!(
            project(log.snapshot(), "sys"),
            vec![WireMessage::system("sys"), WireMessage::user("hello")]
        );

        log.patch(&placeholder, TurnPatch::settled("hi there"))
            .expect("settle placeholder");
        log.append_user("again").expect("user turn");

        assert_eq!(
            project(log.snapshot(), "sys"),
            vec![
                WireMessage::system("sys"),
                WireMessage::user("hello"),
                WireMessage::assistant("hi there"),
                WireMessage::user("again"),
            ]
        );
    }

    #[test]
    fn exactly_one_system_entry_is_prepended() {
        let mut log = log();
        log.append_user("one").expect("user turn");
        log.append_user("two").expect("user turn");

        let projected = project(log.snapshot(), "sys");
        let system_entries = projected
            .iter()
            .filter(|message| message.role == WireRole::System)
            .count();
        assert_eq!(system_entries, 1);
        assert_eq!(projected[0].role, WireRole::System);
    }
}
