use std::fmt;

use crate::error::FailureKind;

/// The states of one orchestration cycle.
///
/// Each cycle flows through: IDLE → SUBMITTING → POLLING → (SUCCEEDED | FAILED) → IDLE,
/// with SUBMITTING → FAILED when the submission itself does not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
}

impl CycleState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (self, next),
            (Idle, Submitting)
                | (Submitting, Polling)
                | (Submitting, Failed)
                | (Polling, Succeeded)
                | (Polling, Failed)
                | (Succeeded, Idle)
                | (Failed, Idle)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CycleState::Succeeded | CycleState::Failed)
    }

    /// Field edits still drive visibility while the form is on screen.
    pub fn accepts_field_input(self) -> bool {
        matches!(self, CycleState::Idle | CycleState::Submitting)
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleState::Idle => write!(f, "IDLE"),
            CycleState::Submitting => write!(f, "SUBMITTING"),
            CycleState::Polling => write!(f, "POLLING"),
            CycleState::Succeeded => write!(f, "SUCCEEDED"),
            CycleState::Failed => write!(f, "FAILED"),
        }
    }
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Succeeded,
    Failed { kind: FailureKind, message: String },
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Succeeded => write!(f, "Recharge completed"),
            CycleOutcome::Failed { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        use CycleState::*;
        assert!(Idle.can_transition_to(Submitting));
        assert!(Submitting.can_transition_to(Polling));
        assert!(Polling.can_transition_to(Succeeded));
        assert!(Succeeded.can_transition_to(Idle));
    }

    #[test]
    fn failure_transitions_are_legal() {
        use CycleState::*;
        assert!(Submitting.can_transition_to(Failed));
        assert!(Polling.can_transition_to(Failed));
        assert!(Failed.can_transition_to(Idle));
    }

    #[test]
    fn shortcuts_are_rejected() {
        use CycleState::*;
        assert!(!Idle.can_transition_to(Polling));
        assert!(!Idle.can_transition_to(Failed));
        assert!(!Submitting.can_transition_to(Succeeded));
        assert!(!Polling.can_transition_to(Idle));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Polling.can_transition_to(Submitting));
    }

    #[test]
    fn terminal_and_input_states() {
        assert!(CycleState::Succeeded.is_terminal());
        assert!(CycleState::Failed.is_terminal());
        assert!(!CycleState::Polling.is_terminal());
        assert!(CycleState::Idle.accepts_field_input());
        assert!(CycleState::Submitting.accepts_field_input());
        assert!(!CycleState::Polling.accepts_field_input());
    }

    #[test]
    fn state_display() {
        assert_eq!(CycleState::Idle.to_string(), "IDLE");
        assert_eq!(CycleState::Submitting.to_string(), "SUBMITTING");
        assert_eq!(CycleState::Polling.to_string(), "POLLING");
        assert_eq!(CycleState::Succeeded.to_string(), "SUCCEEDED");
        assert_eq!(CycleState::Failed.to_string(), "FAILED");
    }

    #[test]
    fn outcome_display() {
        let failed = CycleOutcome::Failed {
            kind: FailureKind::TaskFailed,
            message: "timeout".into(),
        };
        assert_eq!(failed.to_string(), "Task reported failure: timeout");
    }
}
