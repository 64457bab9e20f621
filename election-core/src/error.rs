use std::fmt;

/// Fatal failures the engine cannot recover from on its own.
///
/// Both variants correspond to the two fatal categories the core
/// distinguishes from ordinary tolerated conditions (stale messages, lost
/// rounds): a broken durable store, and a violated invariant. Neither is
/// retried internally; the `Owner` is expected to surface these to the
/// operator and, for `InvariantViolation`, to have already filtered out
/// whatever a faulty peer could have triggered before handing the event to
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionError {
    /// `validate_store` reported the durable medium is not writable.
    StoreUnavailable(String),
    /// A precondition asserted in the core was violated. This indicates a
    /// programming error in the owner or a corrupted/malicious peer message
    /// that should have been dropped before reaching the engine.
    InvariantViolation(String),
}

impl fmt::Display for ElectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectionError::StoreUnavailable(msg) => {
                write!(f, "epoch store unavailable: {msg}")
            }
            ElectionError::InvariantViolation(msg) => {
                write!(f, "election invariant violated: {msg}")
            }
        }
    }
}

impl std::error::Error for ElectionError {}

/// Asserts a precondition that is the engine's responsibility to uphold.
/// Violating it means a bug, not a faulty peer, so debug builds also panic
/// to catch it at the point of failure during testing.
pub(crate) fn invariant(cond: bool, msg: impl Into<String>) -> Result<(), ElectionError> {
    if cond {
        Ok(())
    } else {
        let msg = msg.into();
        debug_assert!(cond, "{msg}");
        Err(ElectionError::InvariantViolation(msg))
    }
}
