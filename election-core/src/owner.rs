use std::collections::BTreeSet;

use crate::epoch::Epoch;
use crate::error::ElectionError;
use crate::types::Rank;

/// The capabilities the engine needs from its embedder.
///
/// The engine holds no ownership over its `Owner`; every call site takes
/// `&mut dyn Owner` for the duration of a single event. Implementations are
/// responsible for supplying whatever serialization (a lock, a dispatch
/// queue, a single-reader event loop) the engine's single-threaded
/// cooperative model assumes — see the crate-level docs for details.
pub trait Owner {
    /// Durably records `epoch` such that the next `read_persisted_epoch`
    /// after any crash returns a value at least this high. Synchronous with
    /// respect to the caller.
    fn persist_epoch(&mut self, epoch: Epoch) -> Result<(), ElectionError>;

    /// Returns the highest previously-persisted epoch, or `Epoch::NONE` if
    /// nothing has ever been persisted.
    fn read_persisted_epoch(&self) -> Epoch;

    /// Confirms the durable medium is writable. Called before starting a
    /// campaign when the stored epoch is already odd, so a broken store
    /// fails fast rather than silently losing the next persist.
    fn validate_store(&mut self) -> Result<(), ElectionError>;

    /// Purely informational: the epoch has been bumped, so the owner should
    /// reset any election bookkeeping of its own to match.
    fn notify_bump_epoch(&mut self);

    /// Requests that the engine's `start()` be re-entered after the current
    /// event returns. May be satisfied synchronously.
    fn trigger_new_election(&mut self);

    /// This participant's rank. Stable within an epoch.
    fn get_my_rank(&self) -> Rank;

    /// The configured cluster size, *N*.
    fn paxos_size(&self) -> u32;

    /// Broadcasts a PROPOSE message tagged with `epoch` to every peer.
    fn propose_to_peers(&mut self, epoch: Epoch);

    /// Notifies the owner that an odd epoch has begun, so it can arm its
    /// election-timeout timer.
    fn notify_election_started(&mut self);

    /// Sends an ACK to `who`, tagged with the current odd epoch.
    ///
    /// `epoch` is passed explicitly (unlike the original owner-holds-engine
    /// design this trait is adapted from) because this trait object is
    /// borrowed transiently by each engine call rather than owning the
    /// engine, so it has no other way to read the epoch back mid-callback.
    fn defer_to(&mut self, who: Rank, epoch: Epoch);

    /// Announces victory with the given quorum of acking ranks to all
    /// peers, tagged with the new (even) epoch. See the note on
    /// `defer_to` for why `epoch` is passed explicitly here too.
    fn message_victory(&mut self, epoch: Epoch, quorum: BTreeSet<Rank>);

    /// Restarts the election subsystem from scratch. Used when we have
    /// never participated and have lost our current round.
    fn reset_election(&mut self);

    /// Whether `rank` is in the presently-believed stable quorum.
    fn is_current_member(&self, rank: Rank) -> bool;

    /// Whether this participant has ever been part of a formed quorum.
    fn ever_participated(&self) -> bool;

    /// The current disallow-set, read dynamically on every arbitration.
    fn get_disallowed_leaders(&self) -> BTreeSet<Rank>;
}
