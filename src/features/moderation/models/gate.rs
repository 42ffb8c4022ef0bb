use std::str::FromStr;

use crate::core::error::AppError;
use crate::features::submissions::models::SubmissionStatus;

/// Moderator decision on a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
    Delete,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
            ModerationAction::Delete => "delete",
        }
    }
}

impl FromStr for ModerationAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(ModerationAction::Approve),
            "reject" => Ok(ModerationAction::Reject),
            "delete" => Ok(ModerationAction::Delete),
            _ => Err(AppError::Validation("Acción inválida".to_string())),
        }
    }
}

/// What the gate does with a submission for a given action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePlan {
    /// Single status write `current -> to`
    Write(SubmissionStatus),
    /// Already in the requested terminal state
    Unchanged,
    /// Remove the row and everything attached to it
    Delete,
}

/// Transition table of the moderation gate.
///
/// `pending` moves to `approved` or `rejected`; both are terminal. Repeating
/// the action that produced the current state is a no-op, crossing from one
/// terminal state to the other is a conflict. Delete is allowed from any state.
pub fn plan(current: SubmissionStatus, action: ModerationAction) -> Result<GatePlan, AppError> {
    use SubmissionStatus::*;

    match (action, current) {
        (ModerationAction::Delete, _) => Ok(GatePlan::Delete),
        (ModerationAction::Approve, Pending) => Ok(GatePlan::Write(Approved)),
        (ModerationAction::Reject, Pending) => Ok(GatePlan::Write(Rejected)),
        (ModerationAction::Approve, Approved) | (ModerationAction::Reject, Rejected) => {
            Ok(GatePlan::Unchanged)
        }
        (ModerationAction::Approve, Rejected) => Err(AppError::Conflict(
            "La publicación ya fue rechazada".to_string(),
        )),
        (ModerationAction::Reject, Approved) => Err(AppError::Conflict(
            "La publicación ya fue aprobada".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(
            "APPROVE".parse::<ModerationAction>().unwrap(),
            ModerationAction::Approve
        );
        assert!(matches!(
            "publish".parse::<ModerationAction>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            plan(Pending, ModerationAction::Approve).unwrap(),
            GatePlan::Write(Approved)
        );
        assert_eq!(
            plan(Pending, ModerationAction::Reject).unwrap(),
            GatePlan::Write(Rejected)
        );
    }

    #[test]
    fn test_repeated_action_is_noop() {
        assert_eq!(
            plan(Approved, ModerationAction::Approve).unwrap(),
            GatePlan::Unchanged
        );
        assert_eq!(
            plan(Rejected, ModerationAction::Reject).unwrap(),
            GatePlan::Unchanged
        );
    }

    #[test]
    fn test_terminal_states_never_cross() {
        assert!(matches!(
            plan(Rejected, ModerationAction::Approve),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            plan(Approved, ModerationAction::Reject),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_delete_from_any_state() {
        for status in [Pending, Approved, Rejected] {
            assert_eq!(
                plan(status, ModerationAction::Delete).unwrap(),
                GatePlan::Delete
            );
        }
    }
}
