//! The election state machine.
//!
//! An [`ElectionEngine`] is driven by events (`start`, `receive_propose`,
//! `receive_ack`, `receive_victory_claim`, `end_election_period`,
//! `declare_standalone_victory`) and reacts by mutating its own in-memory
//! state and issuing callbacks on the supplied [`Owner`] for every durable
//! write and outbound message. It holds no reference to its owner between
//! calls — the owner is borrowed for the duration of a single event only,
//! which is what lets the owner hold the engine by value despite each
//! needing to reach the other.

use std::collections::BTreeSet;

use slog::{debug, info, trace, warn};

use crate::epoch::Epoch;
use crate::error::{invariant, ElectionError};
use crate::owner::Owner;
use crate::peer_tracker::PeerTracker;
use crate::strategy::Strategy;
use crate::types::{NodeSet, Rank};

/// Leader-election state machine for one participant in a fixed-size,
/// rank-identified cluster.
///
/// See the crate-level invariants: at most one of `electing_me` and
/// `leader_acked` is ever active at a time, `epoch`'s parity always matches
/// that activity, and `acked_me` is only ever non-empty while campaigning.
pub struct ElectionEngine {
    epoch: Epoch,
    /// Whether we participate in the quorum at all. Only checked by
    /// `start`; a non-participating engine is otherwise driven exactly like
    /// a participating one, by design — see the crate docs for why.
    pub participating: bool,
    electing_me: bool,
    leader_acked: Option<Rank>,
    acked_me: NodeSet,
    strategy: Strategy,
    peer_tracker: PeerTracker,
    logger: slog::Logger,
}

impl ElectionEngine {
    /// Creates a new engine in the initial stable, non-electing state.
    /// `rank` is only used to tag log lines; the engine otherwise always
    /// asks the `Owner` for the authoritative rank.
    pub fn new(strategy: Strategy, rank: Rank) -> Self {
        Self {
            epoch: Epoch::NONE,
            participating: true,
            electing_me: false,
            leader_acked: None,
            acked_me: NodeSet::default(),
            strategy,
            peer_tracker: PeerTracker::new(),
            logger: crate::logger::terminal_logger(rank),
        }
    }

    /// Creates a new engine that logs through the given `slog::Logger`
    /// instead of building one of its own.
    pub fn with_logger(strategy: Strategy, logger: slog::Logger) -> Self {
        Self {
            epoch: Epoch::NONE,
            participating: true,
            electing_me: false,
            leader_acked: None,
            acked_me: NodeSet::default(),
            strategy,
            peer_tracker: PeerTracker::new(),
            logger,
        }
    }

    /// The current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The rank we have deferred to in the current odd epoch, if any.
    pub fn leader_acked(&self) -> Option<Rank> {
        self.leader_acked
    }

    /// Whether we are currently campaigning.
    pub fn electing_me(&self) -> bool {
        self.electing_me
    }

    /// The arbitration strategy this engine was constructed with.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Read-only access to the peer tracker, for an `Owner` that wants to
    /// consult last-seen epochs. The engine is the only thing that ever
    /// writes to it.
    pub fn peer_tracker(&self) -> &PeerTracker {
        &self.peer_tracker
    }

    /// If there are no other peers in this cluster, the owner can declare
    /// victory outright and the engine will make it so.
    ///
    /// # Preconditions
    /// `paxos_size() == 1` and `get_my_rank() == 0`.
    pub fn declare_standalone_victory(
        &mut self,
        owner: &mut dyn Owner,
    ) -> Result<(), ElectionError> {
        invariant(
            owner.paxos_size() == 1 && owner.get_my_rank() == 0,
            "declare_standalone_victory requires a single-member cluster with rank 0",
        )?;
        self.init(owner)?;
        self.bump_epoch(owner, self.epoch.next())
    }

    /// Starts a new election by proposing ourselves as the new leader.
    ///
    /// # Preconditions
    /// `participating` is true, otherwise this is a no-op.
    /// # Postconditions
    /// `epoch` is odd, `electing_me` is true, `propose_to_peers` and
    /// `notify_election_started` have both been called.
    pub fn start(&mut self, owner: &mut dyn Owner) -> Result<(), ElectionError> {
        if !self.participating {
            info!(self.logger, "not starting new election -- not participating");
            return Ok(());
        }
        debug!(self.logger, "start -- can i be leader?");

        self.acked_me.clear();
        self.init(owner)?;

        if self.epoch.is_stable() {
            self.bump_epoch(owner, self.epoch.next())?;
        } else {
            owner.validate_store()?;
        }
        self.electing_me = true;
        self.acked_me.insert(owner.get_my_rank());
        self.leader_acked = None;

        owner.propose_to_peers(self.epoch);
        owner.notify_election_started();
        Ok(())
    }

    /// Called by the owner's timer when the current round has taken too
    /// long. If we won, declare victory; otherwise retry or reset.
    pub fn end_election_period(&mut self, owner: &mut dyn Owner) -> Result<(), ElectionError> {
        debug!(self.logger, "election period ended");
        if self.electing_me && self.acked_me.len() as u32 > owner.paxos_size() / 2 {
            self.declare_victory(owner)
        } else if owner.ever_participated() {
            self.start(owner)
        } else {
            owner.reset_election();
            Ok(())
        }
    }

    /// Handles a PROPOSE from another participant asking to become leader.
    ///
    /// # Preconditions
    /// `mepoch` must not be silently stale-and-in-quorum; see the
    /// stale-epoch handling below for exactly what is tolerated.
    pub fn receive_propose(
        &mut self,
        owner: &mut dyn Owner,
        from: Rank,
        mepoch: Epoch,
    ) -> Result<(), ElectionError> {
        if mepoch > self.epoch {
            self.bump_epoch(owner, mepoch)?;
        } else if mepoch < self.epoch {
            if self.epoch.is_stable() && !owner.is_current_member(from) {
                debug!(
                    self.logger,
                    "got propose from old epoch, {from} must have just started"
                );
                owner.trigger_new_election();
            } else {
                trace!(self.logger, "ignoring old propose from {from}");
            }
            return Ok(());
        }

        let disallowed_leaders = owner.get_disallowed_leaders();
        let my_rank = owner.get_my_rank();
        let me_disallowed = disallowed_leaders.contains(&my_rank);
        let from_disallowed = disallowed_leaders.contains(&from);

        let my_win = !me_disallowed && (my_rank < from || from_disallowed);
        let their_win = !from_disallowed
            && (my_rank > from || me_disallowed)
            && self.leader_acked.map_or(true, |acked| acked >= from);

        if my_win {
            if let Some(acked) = self.leader_acked {
                invariant(
                    acked < from || from_disallowed,
                    format!("already acked {acked} but {from} should still win over us"),
                )?;
                trace!(self.logger, "no, we already acked {acked}");
            } else if !self.electing_me {
                owner.trigger_new_election();
            }
        } else if their_win {
            self.defer(owner, from)?;
        } else {
            trace!(self.logger, "ignoring propose from {from}, standoff");
        }
        Ok(())
    }

    /// Handles an ACK from another participant. If it carries a newer
    /// epoch we must have rebooted; bump and restart our own campaign.
    pub fn receive_ack(
        &mut self,
        owner: &mut dyn Owner,
        from: Rank,
        mepoch: Epoch,
    ) -> Result<(), ElectionError> {
        invariant(
            mepoch.is_electing(),
            format!("ack from {from} carries non-electing epoch {mepoch}"),
        )?;
        if mepoch > self.epoch {
            warn!(
                self.logger,
                "that's a newer epoch, i must have rebooted -- bumping and re-starting"
            );
            self.bump_epoch(owner, mepoch)?;
            return self.start(owner);
        }

        if self.electing_me {
            self.acked_me.insert(from);
            if self.acked_me.len() as u32 == owner.paxos_size() {
                self.declare_victory(owner)?;
            }
        } else {
            invariant(
                self.leader_acked.is_some(),
                "received ack while neither campaigning nor deferring",
            )?;
            trace!(self.logger, "ignoring ack from {from}, already deferring");
        }
        Ok(())
    }

    /// Handles a VICTORY claim from another participant. Returns `true` if
    /// we accepted it (we are now a peon under the new leader), `false` if
    /// we instead found ourselves desynced and started a new campaign.
    pub fn receive_victory_claim(
        &mut self,
        owner: &mut dyn Owner,
        from: Rank,
        mepoch: Epoch,
    ) -> Result<bool, ElectionError> {
        let my_rank = owner.get_my_rank();
        invariant(
            from < my_rank || owner.get_disallowed_leaders().contains(&my_rank),
            format!("victory claim from {from} does not outrank us"),
        )?;
        invariant(
            mepoch.is_stable(),
            format!("victory claim epoch {mepoch} is not even"),
        )?;

        self.leader_acked = None;

        if mepoch != self.epoch.next() {
            warn!(
                self.logger,
                "that's a funny epoch, i must have rebooted -- bumping and re-starting"
            );
            self.bump_epoch(owner, mepoch)?;
            self.start(owner)?;
            return Ok(false);
        }

        self.bump_epoch(owner, mepoch)?;
        Ok(true)
    }

    /// Reads the persisted epoch and adopts or advances past it.
    fn init(&mut self, owner: &mut dyn Owner) -> Result<(), ElectionError> {
        let persisted = owner.read_persisted_epoch();
        self.epoch = if persisted.is_none() {
            debug!(self.logger, "init, first boot, initializing epoch at 1");
            Epoch::new(1)
        } else if persisted.is_electing() {
            let bumped = persisted.next();
            debug!(
                self.logger,
                "init, last seen epoch {persisted}, mid-election, bumping"
            );
            owner.persist_epoch(bumped)?;
            bumped
        } else {
            debug!(self.logger, "init, last seen epoch {persisted}");
            persisted
        };
        Ok(())
    }

    /// Advances our epoch to `e`, persisting it and clearing campaign
    /// state. Does not clear `leader_acked`; callers that need that do it
    /// themselves.
    ///
    /// # Preconditions
    /// `e >= epoch`.
    fn bump_epoch(&mut self, owner: &mut dyn Owner, e: Epoch) -> Result<(), ElectionError> {
        invariant(
            self.epoch <= e,
            format!("bump_epoch({e}) called below current epoch {}", self.epoch),
        )?;
        trace!(self.logger, "bump_epoch {} to {e}", self.epoch);
        self.epoch = e;
        self.peer_tracker.increase_epoch(e);
        owner.persist_epoch(self.epoch)?;
        self.electing_me = false;
        self.acked_me.clear();
        owner.notify_bump_epoch();
        Ok(())
    }

    /// Defers the current election to `who`, dropping our own campaign if
    /// we were running one.
    ///
    /// # Preconditions
    /// Under `Strategy::Classic`, `who < my_rank`; under
    /// `Strategy::Disallow`, `who` is not in the disallow-set.
    fn defer(&mut self, owner: &mut dyn Owner, who: Rank) -> Result<(), ElectionError> {
        match self.strategy {
            Strategy::Classic => {
                invariant(
                    who < owner.get_my_rank(),
                    format!("defer target {who} does not outrank us under Classic strategy"),
                )?;
                debug!(self.logger, "defer to {who}");
            }
            Strategy::Disallow => {
                invariant(
                    !owner.get_disallowed_leaders().contains(&who),
                    format!("defer target {who} is disallowed"),
                )?;
                debug!(self.logger, "defer to {who}, disallowed leaders considered");
            }
        }

        if self.electing_me {
            self.acked_me.clear();
            self.electing_me = false;
        }
        self.leader_acked = Some(who);
        owner.defer_to(who, self.epoch);
        Ok(())
    }

    /// Declares ourselves the winner of the current round.
    ///
    /// # Preconditions
    /// `epoch` is odd, `electing_me` is true, and `acked_me` already holds
    /// a majority.
    fn declare_victory(&mut self, owner: &mut dyn Owner) -> Result<(), ElectionError> {
        invariant(self.epoch.is_electing(), "declare_victory outside an election epoch")?;
        invariant(self.electing_me, "declare_victory while not campaigning")?;
        let have = self.acked_me.len() as u32;
        invariant(have > owner.paxos_size() / 2, "declare_victory without a majority")?;

        info!(self.logger, "I win! acked_me={:?}", self.acked_me);
        let quorum: BTreeSet<Rank> = self.acked_me.drain().collect();
        self.leader_acked = None;
        self.electing_me = false;

        self.bump_epoch(owner, self.epoch.next())?;
        owner.message_victory(self.epoch, quorum);
        Ok(())
    }
}
