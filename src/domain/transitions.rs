use crate::domain::payment::PaymentStatus;

/// Outcome of planning a status transition for a ledger row against an
/// incoming terminal event. Terminal states are absorbing: once a record
/// is Completed or Failed it never moves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Record is Pending; apply the incoming terminal status.
    Apply,
    /// Record already carries the incoming status; a redelivery, no-op.
    AlreadyApplied,
    /// Record sits in the opposite terminal state; ignore and flag for
    /// manual reconciliation.
    ConflictingTerminal,
}

pub fn plan_transition(current: PaymentStatus, incoming: PaymentStatus) -> TransitionDecision {
    if current == incoming {
        return TransitionDecision::AlreadyApplied;
    }
    match current {
        PaymentStatus::Pending => TransitionDecision::Apply,
        PaymentStatus::Completed | PaymentStatus::Failed => {
            TransitionDecision::ConflictingTerminal
        }
    }
}
