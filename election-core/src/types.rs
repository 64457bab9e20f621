use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::epoch::Epoch;

/// Stable integer identity of a participant. Lower rank is higher priority.
pub type Rank = u32;

/// Map keyed by rank, using `nohash-hasher` since ranks are small dense
/// integers and hashing them is pure overhead.
pub type NodeMap<V> = nohash_hasher::IntMap<Rank, V>;

/// Set of ranks, using `nohash-hasher` for the same reason as [`NodeMap`].
pub type NodeSet = nohash_hasher::IntSet<Rank>;

/// The three message kinds participants exchange. The engine does not
/// specify transport framing; this type only carries the payload that the
/// arbitration rules care about.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Message {
    /// Sent by a candidate to every peer when it starts a campaign.
    Propose { from: Rank, epoch: Epoch },
    /// Sent by a peer deferring to a candidate.
    Ack { from: Rank, epoch: Epoch },
    /// Sent by the winner to announce the new quorum.
    Victory {
        from: Rank,
        epoch: Epoch,
        quorum: BTreeSet<Rank>,
    },
}
