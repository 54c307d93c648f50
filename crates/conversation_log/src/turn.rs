use std::fmt;

use time::{OffsetDateTime, UtcOffset};

use crate::ids::TurnId;

/// Speaker of a stored turn. System text is a wire-only concept and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversation entry.
///
/// `id` and `role` are fixed at creation. Only [`crate::MessageLog::patch`]
/// mutates `content`, `pending` and `note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub(crate) id: TurnId,
    pub(crate) role: Role,
    pub(crate) content: String,
    pub(crate) pending: bool,
    pub(crate) note: Option<String>,
    pub(crate) created_at: OffsetDateTime,
}

impl Turn {
    #[must_use]
    pub fn id(&self) -> &TurnId {
        &self.id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Creation time. Display only; log position decides order.
    #[must_use]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// `HH:MM` label for bubble footers in local time. Falls back to
    /// `HH:MM UTC` when the local offset cannot be determined.
    #[must_use]
    pub fn display_time(&self) -> String {
        clock_label(self.created_at, UtcOffset::current_local_offset().ok())
    }

    pub(crate) fn apply(&mut self, patch: TurnPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(pending) = patch.pending {
            self.pending = pending;
        }
        if let Some(note) = patch.note {
            self.note = Some(note);
        }
    }
}

/// Field merge applied by [`crate::MessageLog::patch`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnPatch {
    pub content: Option<String>,
    pub pending: Option<bool>,
    pub note: Option<String>,
}

impl TurnPatch {
    /// Final state of a placeholder: no longer pending, carrying `content`.
    #[must_use]
    pub fn settled(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            pending: Some(false),
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.pending.is_none() && self.note.is_none()
    }
}

fn clock_label(at: OffsetDateTime, local_offset: Option<UtcOffset>) -> String {
    match local_offset {
        Some(offset) => {
            let local = at.to_offset(offset);
            format!("{:02}:{:02}", local.hour(), local.minute())
        }
        None => {
            let utc = at.to_offset(UtcOffset::UTC);
            format!("{:02}:{:02} UTC", utc.hour(), utc.minute())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> OffsetDateTime {
        // 2023-11-14 22:13:20 UTC
        OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("valid timestamp")
    }

    #[test]
    fn clock_label_uses_local_offset_when_known() {
        let offset = UtcOffset::from_hms(2, 0, 0).expect("valid offset");
        assert_eq!(clock_label(instant(), Some(offset)), "00:13");
    }

    #[test]
    fn clock_label_marks_utc_fallback() {
        assert_eq!(clock_label(instant(), None), "22:13 UTC");
    }
}
