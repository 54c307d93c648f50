use thiserror::Error;

use crate::ids::TurnId;
use crate::turn::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("settled {role} turn requires non-empty content")]
    EmptyContent { role: Role },

    #[error("turn '{pending}' is already pending; only one in-flight turn is allowed")]
    PendingTurnExists { pending: TurnId },

    #[error("user turns are never pending")]
    PendingUserTurn,

    #[error("identity generator produced duplicate turn id '{id}'")]
    DuplicateId { id: TurnId },
}
