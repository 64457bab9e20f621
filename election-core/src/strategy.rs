#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arbitration policy, fixed at engine construction.
///
/// The behavioural difference between the two variants is confined to
/// proposal arbitration and deferral preconditions; it is represented as a
/// closed tagged enum rather than a trait object because there are exactly
/// two policies and neither embedders nor tests need to add a third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Lowest rank wins. The disallowed-leader set is empty by contract.
    Classic,
    /// Lowest rank wins, except that ranks in the disallowed set may never
    /// become leader and are always out-arbitrated.
    Disallow,
}
