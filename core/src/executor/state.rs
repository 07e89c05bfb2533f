//! Scheduler lifecycle and transition rules.

use super::types::SchedulerError;

/// Lifecycle phase of a `Scheduler`.
///
/// ```text
/// Idle ─run()→ Running ─tasks queued, conduit closed→ Draining
///      ─workers joined→ Collecting ─aggregator done→ Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Constructed, accepting tasks
    Idle,
    /// Task conduit populated, workers and aggregator live
    Running,
    /// Task conduit closed, workers finishing in-flight tasks
    Draining,
    /// Workers joined, result conduit closed, aggregator finishing
    Collecting,
    /// Aggregator signalled completion; results frozen
    Done,
}

impl SchedulerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether a `run` call is in flight.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Draining | Self::Collecting)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Running),
            Self::Running => Some(Self::Draining),
            Self::Draining => Some(Self::Collecting),
            Self::Collecting => Some(Self::Done),
            Self::Done => None,
        }
    }
}

pub struct StateTransition;

impl StateTransition {
    /// Transitions are strictly sequential; no skipping, no going back.
    pub fn validate(from: SchedulerState, to: SchedulerState) -> Result<(), SchedulerError> {
        if from.next() == Some(to) {
            return Ok(());
        }

        Err(match (from, to) {
            (s, SchedulerState::Running) if s.is_active() => SchedulerError::AlreadyRunning,
            (SchedulerState::Done, SchedulerState::Running) => SchedulerError::AlreadyCompleted,
            _ => SchedulerError::InvalidTransition { from, to },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_transitions() {
        let mut state = SchedulerState::Idle;
        while let Some(next) = state.next() {
            assert!(StateTransition::validate(state, next).is_ok());
            state = next;
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_rerun_errors() {
        assert!(matches!(
            StateTransition::validate(SchedulerState::Draining, SchedulerState::Running),
            Err(SchedulerError::AlreadyRunning)
        ));
        assert!(matches!(
            StateTransition::validate(SchedulerState::Done, SchedulerState::Running),
            Err(SchedulerError::AlreadyCompleted)
        ));
    }

    #[test]
    fn test_skipping_is_rejected() {
        assert!(matches!(
            StateTransition::validate(SchedulerState::Running, SchedulerState::Done),
            Err(SchedulerError::InvalidTransition { .. })
        ));
        assert!(matches!(
            StateTransition::validate(SchedulerState::Collecting, SchedulerState::Draining),
            Err(SchedulerError::InvalidTransition { .. })
        ));
    }
}
