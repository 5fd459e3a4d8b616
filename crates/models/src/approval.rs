use crate::status::{ApprovalStatus, EnrollmentStatus};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// What an advisor or department head does with a pending KRS entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl FromStr for ApprovalAction {
    type Err = TransitionError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(TransitionError::UnknownAction(other.to_string())),
        }
    }
}

impl Display for ApprovalAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Approve => write!(f, "approved"),
            Self::Reject => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    UnknownAction(String),
    MissingRejectionReason,
    AlreadyDecided(ApprovalStatus),
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownAction(action) => {
                write!(f, "unknown action '{action}', expected approve or reject")
            }
            Self::MissingRejectionReason => write!(f, "rejection_reason is required when rejecting"),
            Self::AlreadyDecided(status) => write!(f, "KRS entry has already been {status}"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Field values a KRS entry takes after a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub approval_status: ApprovalStatus,
    pub status: EnrollmentStatus,
    pub rejection_reason: Option<String>,
}

/// Applies `action` to an entry currently in `current`. Only pending entries
/// can be decided; approved and rejected are terminal.
pub fn decide(
    current: ApprovalStatus,
    action: ApprovalAction,
    rejection_reason: Option<&str>,
) -> Result<Decision, TransitionError> {
    if current != ApprovalStatus::Pending {
        return Err(TransitionError::AlreadyDecided(current));
    }

    match action {
        ApprovalAction::Approve => Ok(Decision {
            approval_status: ApprovalStatus::Approved,
            status: EnrollmentStatus::Diambil,
            rejection_reason: None,
        }),
        ApprovalAction::Reject => {
            let reason = rejection_reason
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .ok_or(TransitionError::MissingRejectionReason)?;

            Ok(Decision {
                approval_status: ApprovalStatus::Rejected,
                status: EnrollmentStatus::Ditolak,
                rejection_reason: Some(reason.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_approve_pending_entry() {
        let decision = decide(ApprovalStatus::Pending, ApprovalAction::Approve, Some("ignored")).unwrap();

        assert_eq!(decision.approval_status, ApprovalStatus::Approved);
        assert_eq!(decision.status, EnrollmentStatus::Diambil);
        assert_eq!(decision.rejection_reason, None);
    }

    #[test]
    fn test_reject_requires_reason() {
        assert_eq!(
            decide(ApprovalStatus::Pending, ApprovalAction::Reject, None),
            Err(TransitionError::MissingRejectionReason)
        );
        assert_eq!(
            decide(ApprovalStatus::Pending, ApprovalAction::Reject, Some("   ")),
            Err(TransitionError::MissingRejectionReason)
        );

        let decision = decide(
            ApprovalStatus::Pending,
            ApprovalAction::Reject,
            Some(" prerequisite missing "),
        )
        .unwrap();
        assert_eq!(decision.approval_status, ApprovalStatus::Rejected);
        assert_eq!(decision.status, EnrollmentStatus::Ditolak);
        assert_eq!(decision.rejection_reason.as_deref(), Some("prerequisite missing"));
    }

    #[test]
    fn test_decided_entries_are_terminal() {
        for current in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            for action in [ApprovalAction::Approve, ApprovalAction::Reject] {
                assert_eq!(
                    decide(current, action, Some("reason")),
                    Err(TransitionError::AlreadyDecided(current))
                );
            }
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("approve".parse::<ApprovalAction>().unwrap(), ApprovalAction::Approve);
        assert_eq!("reject".parse::<ApprovalAction>().unwrap(), ApprovalAction::Reject);
        assert_eq!(
            "postpone".parse::<ApprovalAction>(),
            Err(TransitionError::UnknownAction("postpone".to_string()))
        );
    }
}
