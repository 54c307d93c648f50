//! Turning a settled request into the placeholder's final fields.

use chat_provider::{CompletionError, CompletionReply};
use completion_api::extract_text;
use conversation_log::TurnPatch;

/// Shown when a successful reply carries no recognizable text.
pub const NO_RESPONSE_TEXT: &str = "No reply came back, please try again.";

/// Primary text of every failed request. The error detail goes into the note.
pub const APOLOGY_TEXT: &str =
    "Sorry! The connection could not be established. Check the chat server settings.";

/// Assistant text for a successful reply, falling back to [`NO_RESPONSE_TEXT`].
#[must_use]
pub fn reply_text(reply: &CompletionReply) -> String {
    extract_text(&reply.body).unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
}

/// Patch that settles the placeholder for `outcome`.
#[must_use]
pub fn settlement_patch(outcome: &Result<CompletionReply, CompletionError>) -> TurnPatch {
    match outcome {
        Ok(reply) => TurnPatch::settled(reply_text(reply)),
        Err(error) => {
            let patch = TurnPatch::settled(APOLOGY_TEXT);
            match error.note() {
                Some(note) => patch.with_note(note),
                None => patch,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn success_uses_extracted_text() {
        let outcome = Ok(CompletionReply::new(json!({
            "choices": [{"message": {"content": "hi there"}}]
        })));

        assert_eq!(settlement_patch(&outcome), TurnPatch::settled("hi there"));
    }

    #[test]
    fn success_without_text_uses_no_response_text() {
        let outcome = Ok(CompletionReply::new(json!({"choices": []})));

        let patch = settlement_patch(&outcome);
        assert_eq!(patch, TurnPatch::settled(NO_RESPONSE_TEXT));
        assert_eq!(patch.note, None);
    }

    #[test]
    fn failure_carries_apology_and_note() {
        let outcome = Err(CompletionError::Status {
            status: 500,
            detail: String::new(),
        });

        assert_eq!(
            settlement_patch(&outcome),
            TurnPatch::settled(APOLOGY_TEXT).with_note("Request failed with status 500")
        );
    }

    #[test]
    fn rejection_note_is_the_error_field() {
        let outcome = Err(CompletionError::Rejected {
            detail: Some("quota exceeded".to_string()),
        });

        assert_eq!(
            settlement_patch(&outcome).note.as_deref(),
            Some("quota exceeded")
        );
    }
}
