use std::collections::{HashMap, VecDeque};

use time::OffsetDateTime;

use crate::error::LogError;
use crate::ids::{IdGenerator, RandomIdGenerator, TurnId};
use crate::turn::{Role, Turn, TurnPatch};

/// Change notification queued by every log mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A turn was appended or patched. Carries the turn's state after the mutation.
    TurnChanged(Turn),
    /// Every turn was removed.
    Cleared,
}

/// Append/patch store of conversation turns.
pub struct MessageLog {
    turns: Vec<Turn>,
    index_by_id: HashMap<TurnId, usize>,
    ids: Box<dyn IdGenerator>,
    events: VecDeque<LogEvent>,
    last_created_at: Option<OffsetDateTime>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLog")
            .field("turns", &self.turns)
            .field("queued_events", &self.events.len())
            .finish()
    }
}

impl MessageLog {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(RandomIdGenerator::new()))
    }

    #[must_use]
    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            turns: Vec::new(),
            index_by_id: HashMap::new(),
            ids,
            events: VecDeque::new(),
            last_created_at: None,
        }
    }

    /// Stores a new turn at the end of the log and returns its id.
    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        pending: bool,
    ) -> Result<TurnId, LogError> {
        let content = content.into();

        if pending && role == Role::User {
            return Err(LogError::PendingUserTurn);
        }
        if !pending && content.is_empty() {
            return Err(LogError::EmptyContent { role });
        }
        if pending {
            if let Some(existing) = self.pending_turn() {
                return Err(LogError::PendingTurnExists {
                    pending: existing.id.clone(),
                });
            }
        }

        let id = self.ids.next_id();
        if self.index_by_id.contains_key(&id) {
            return Err(LogError::DuplicateId { id });
        }

        let turn = Turn {
            id: id.clone(),
            role,
            content,
            pending,
            note: None,
            created_at: self.next_created_at(),
        };

        self.index_by_id.insert(id.clone(), self.turns.len());
        self.events.push_back(LogEvent::TurnChanged(turn.clone()));
        self.turns.push(turn);

        Ok(id)
    }

    /// Appends a settled user turn.
    pub fn append_user(&mut self, content: impl Into<String>) -> Result<TurnId, LogError> {
        self.append(Role::User, content, false)
    }

    /// Appends an empty pending assistant turn.
    pub fn append_placeholder(&mut self) -> Result<TurnId, LogError> {
        self.append(Role::Assistant, String::new(), true)
    }

    /// Merges `patch` into the turn with `id`.
    ///
    /// Returns `Ok(false)` without touching the log when `id` is unknown, which
    /// is the expected outcome for a patch that raced a [`MessageLog::reset`].
    pub fn patch(&mut self, id: &TurnId, patch: TurnPatch) -> Result<bool, LogError> {
        let Some(&index) = self.index_by_id.get(id) else {
            tracing::debug!(turn_id = %id, "patch for unknown turn ignored");
            return Ok(false);
        };

        let current = &self.turns[index];
        let next_pending = patch.pending.unwrap_or(current.pending);
        let next_empty = patch
            .content
            .as_deref()
            .map_or(current.content.is_empty(), str::is_empty);

        if !next_pending && next_empty {
            return Err(LogError::EmptyContent { role: current.role });
        }
        if next_pending && !current.pending {
            if current.role == Role::User {
                return Err(LogError::PendingUserTurn);
            }
            if let Some(existing) = self.pending_turn() {
                return Err(LogError::PendingTurnExists {
                    pending: existing.id.clone(),
                });
            }
        }

        let turn = &mut self.turns[index];
        turn.apply(patch);
        self.events.push_back(LogEvent::TurnChanged(turn.clone()));

        Ok(true)
    }

    /// Removes every turn atomically.
    ///
    /// Queued change events for removed turns are dropped; the next drain
    /// yields a single [`LogEvent::Cleared`].
    pub fn reset(&mut self) {
        self.turns.clear();
        self.index_by_id.clear();
        self.events.clear();
        self.events.push_back(LogEvent::Cleared);
    }

    /// Read-only view in log order.
    #[must_use]
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn get(&self, id: &TurnId) -> Option<&Turn> {
        self.index_by_id.get(id).map(|&index| &self.turns[index])
    }

    #[must_use]
    pub fn pending_turn(&self) -> Option<&Turn> {
        self.turns.iter().find(|turn| turn.pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Takes queued change events in mutation order.
    pub fn drain_events(&mut self) -> Vec<LogEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn has_queued_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn next_created_at(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let created_at = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::ids::SequentialIdGenerator;

    fn log() -> MessageLog {
        MessageLog::with_id_generator(Box::new(SequentialIdGenerator::default()))
    }

    #[test]
    fn append_queues_one_event_for_the_new_turn() {
        let mut log = log();
        let id = log.append_user("hello").expect("user turn");

        let events = log.drain_events();
        assert_eq!(events.len(), 1);
        assert_matches!(&events[0], LogEvent::TurnChanged(turn) if turn.id() == &id);
        assert!(!log.has_queued_events());
    }

    #[test]
    fn created_at_never_goes_backwards() {
        let mut log = log();
        log.last_created_at = Some(OffsetDateTime::now_utc() + time::Duration::hours(1));
        let id = log.append_user("later").expect("user turn");

        let turn = log.get(&id).expect("turn exists");
        assert!(turn.created_at() >= OffsetDateTime::now_utc());
    }

    #[test]
    fn settled_turn_requires_content() {
        let mut log = log();
        assert_eq!(
            log.append(Role::Assistant, "", false),
            Err(LogError::EmptyContent {
                role: Role::Assistant
            })
        );

        let placeholder = log.append_placeholder().expect("placeholder");
        assert_eq!(
            log.patch(&placeholder, TurnPatch::settled("")),
            Err(LogError::EmptyContent {
                role: Role::Assistant
            })
        );
        assert!(log.get(&placeholder).is_some_and(Turn::is_pending));
    }

    #[test]
    fn second_pending_turn_is_refused() {
        let mut log = log();
        let first = log.append_placeholder().expect("placeholder");

        assert_eq!(
            log.append_placeholder(),
            Err(LogError::PendingTurnExists { pending: first })
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn user_turns_cannot_become_pending() {
        let mut log = log();
        assert_eq!(
            log.append(Role::User, "", true),
            Err(LogError::PendingUserTurn)
        );

        let id = log.append_user("hi").expect("user turn");
        let patch = TurnPatch {
            pending: Some(true),
            ..TurnPatch::default()
        };
        assert_eq!(log.patch(&id, patch), Err(LogError::PendingUserTurn));
    }

    #[test]
    fn reset_replaces_queued_events_with_single_clear() {
        let mut log = log();
        log.append_user("one").expect("user turn");
        log.append_placeholder().expect("placeholder");

        log.reset();

        assert!(log.is_empty());
        assert_eq!(log.drain_events(), vec![LogEvent::Cleared]);
    }
}
