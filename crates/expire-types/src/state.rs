use std::fmt;

use serde::{Deserialize, Serialize};

/// The state a target occupies with respect to its governing ledger.
///
/// The discriminants double as the exit codes of `expire check`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TargetState {
    /// A record exists and its expiry is still in the future.
    TrackedUnexpired = 0,
    /// A record exists and its expiry has passed.
    TrackedExpired = 1,
    /// No record exists, or no ledger governs the location.
    Untracked = 2,
}

impl TargetState {
    /// Numeric code for this state.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if a record exists for the target.
    pub fn is_tracked(self) -> bool {
        !matches!(self, TargetState::Untracked)
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetState::TrackedUnexpired => "tracked (unexpired)",
            TargetState::TrackedExpired => "tracked (expired)",
            TargetState::Untracked => "untracked",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(TargetState::TrackedUnexpired.code(), 0);
        assert_eq!(TargetState::TrackedExpired.code(), 1);
        assert_eq!(TargetState::Untracked.code(), 2);
    }

    #[test]
    fn tracked_states() {
        assert!(TargetState::TrackedUnexpired.is_tracked());
        assert!(TargetState::TrackedExpired.is_tracked());
        assert!(!TargetState::Untracked.is_tracked());
    }
}
