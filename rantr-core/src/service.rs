use anyhow::Context;
use rantr_api::{
    EditEntry, EditRant, NewRant, Rant, RantFeed, RantId, RantStore, RantUpdate, UserDirectory,
    UserId, VoteOp, VoteSets, VoteSide, Voter,
};

use crate::Error;

/// Upper bound on one feed window.
pub const RANT_FEED_PAGE_SIZE: usize = 20;

/// The rant lifecycle engine. Owns no global state: both collaborators
/// are supplied at construction, and all serialization of concurrent
/// writers is delegated to the store.
pub struct RantService<S, U> {
    store: S,
    users: U,
}

impl<S: RantStore + Send, U: UserDirectory + Send> RantService<S, U> {
    pub fn new(store: S, users: U) -> RantService<S, U> {
        RantService { store, users }
    }

    /// Persist a new rant. Empty `tags` become exactly
    /// `["general"]`; non-empty tags are kept verbatim, in order.
    pub async fn create_rant(&mut self, new: NewRant) -> Result<Rant, Error> {
        new.validate()?;
        let rant = Rant::created(new);
        tracing::debug!(id = ?rant.id, poster = ?rant.poster, "creating rant");
        Ok(self
            .store
            .insert(rant)
            .await
            .context("inserting new rant")?)
    }

    /// One repository round trip answering both "exists" and "already
    /// deleted": a found-but-deleted record is returned as-is, and the
    /// caller judges the `deleted` flag.
    pub async fn validate_rant_existence(&mut self, id: &RantId) -> Result<Option<Rant>, Error> {
        Ok(self
            .store
            .find_by_id(id)
            .await
            .with_context(|| format!("fetching rant {id:?}"))?)
    }

    /// The rant, but only if `user` posted it. Only meaningful after
    /// the existence/deletion checks passed, so authorization failures
    /// never leak before existence/deletion failures.
    pub async fn validate_rant_creator(
        &mut self,
        user: &UserId,
        id: &RantId,
    ) -> Result<Option<Rant>, Error> {
        Ok(self
            .validate_rant_existence(id)
            .await?
            .filter(|rant| rant.poster == *user))
    }

    pub async fn validate_rant_upvoter(&mut self, user: &UserId) -> Result<Option<Voter>, Error> {
        Ok(self
            .users
            .lookup_voter(user)
            .await
            .with_context(|| format!("looking up voter {user:?}"))?)
    }

    /// Pure fetch, no mutation; includes the vote sets.
    pub async fn get_rant(&mut self, id: &RantId) -> Result<Option<Rant>, Error> {
        self.validate_rant_existence(id).await
    }

    /// One feed window. `num_request` is the zero-based count of items
    /// already delivered to this browsing session.
    pub async fn get_rants(&mut self, num_request: usize) -> Result<RantFeed, Error> {
        let rants = self
            .store
            .list_non_deleted(num_request, RANT_FEED_PAGE_SIZE)
            .await
            .with_context(|| format!("listing rant feed window at offset {num_request}"))?;
        Ok(RantFeed { rants })
    }

    /// Soft-delete. Callers are expected to have run the existence,
    /// deletion and creator checks first; a second delete is rejected
    /// there, not here.
    pub async fn delete_rant(&mut self, id: &RantId) -> Result<(), Error> {
        tracing::info!(?id, "soft-deleting rant");
        self.store
            .update_fields(id, RantUpdate::Delete)
            .await
            .with_context(|| format!("soft-deleting rant {id:?}"))?;
        Ok(())
    }

    /// Apply one edit: body and tags are replaced and exactly one
    /// history entry is appended, all as one logical change. The
    /// caller reads the current body first (`get_rant`), computes
    /// `diff::chars(current, edited)` and passes both along.
    pub async fn edit_rant(
        &mut self,
        user: &UserId,
        id: &RantId,
        edit: EditRant,
    ) -> Result<Rant, Error> {
        let EditRant {
            edited_rant,
            current_rant_in_db,
            tags,
            when,
            diff,
        } = edit;
        tracing::info!(?id, poster = ?user, "editing rant");
        let entry = EditEntry {
            when,
            diff_against: current_rant_in_db,
            diff,
        };
        Ok(self
            .store
            .update_fields(
                id,
                RantUpdate::Edit {
                    body: edited_rant,
                    tags,
                    entry,
                },
            )
            .await
            .with_context(|| format!("applying edit to rant {id:?}"))?)
    }

    pub async fn upvote(&mut self, id: &RantId, voter: &UserId) -> Result<VoteSets, Error> {
        self.cast_vote(id, voter, VoteSide::Up).await
    }

    pub async fn downvote(&mut self, id: &RantId, voter: &UserId) -> Result<VoteSets, Error> {
        self.cast_vote(id, voter, VoteSide::Down).await
    }

    async fn cast_vote(
        &mut self,
        id: &RantId,
        voter: &UserId,
        side: VoteSide,
    ) -> Result<VoteSets, Error> {
        let rant = self
            .validate_rant_existence(id)
            .await?
            .ok_or(Error::rant_not_found())?;
        let ops = vote_transition(&rant, voter, side);
        tracing::debug!(?id, ?voter, ?ops, "recording vote");
        let updated = self
            .store
            .update_fields(id, RantUpdate::Votes(ops))
            .await
            .with_context(|| format!("recording vote on rant {id:?}"))?;
        Ok(VoteSets::of(&updated))
    }

    /// Existence then deletion, in that priority order.
    pub async fn fetch_live_rant(&mut self, id: &RantId) -> Result<Rant, Error> {
        let rant = self
            .validate_rant_existence(id)
            .await?
            .ok_or(Error::rant_not_found())?;
        if rant.deleted {
            return Err(Error::already_deleted());
        }
        Ok(rant)
    }

    /// Existence, then deletion, then authorization, judged on a
    /// single fetch. The creator check runs strictly after the live
    /// checks so its failure never leaks first.
    pub async fn fetch_owned_rant(&mut self, user: &UserId, id: &RantId) -> Result<Rant, Error> {
        let rant = self.fetch_live_rant(id).await?;
        if rant.poster != *user {
            return Err(Error::not_rant_creator());
        }
        Ok(rant)
    }

    /// A voter that both exists and is allowed to vote.
    pub async fn resolve_voter(&mut self, user: &UserId) -> Result<Voter, Error> {
        let voter = self
            .validate_rant_upvoter(user)
            .await?
            .ok_or(Error::voter_not_found())?;
        if voter.deactivated {
            return Err(Error::voter_deactivated());
        }
        Ok(voter)
    }

    /// `get_rants`, with an empty window reported as feed exhaustion.
    pub async fn fetch_feed_page(&mut self, num_request: usize) -> Result<RantFeed, Error> {
        let feed = self.get_rants(num_request).await?;
        if feed.is_exhausted() {
            return Err(Error::feed_exhausted());
        }
        Ok(feed)
    }
}

/// The ledger transition for one vote action, as atomic set
/// operations. Mutual exclusion between the two sets holds after every
/// op: a voter seen on the opposite side is moved across, a voter
/// already on this side is toggled off, anyone else is added.
fn vote_transition(rant: &Rant, voter: &UserId, side: VoteSide) -> Vec<VoteOp> {
    let (same, other) = match side {
        VoteSide::Up => (&rant.upvotes, &rant.downvotes),
        VoteSide::Down => (&rant.downvotes, &rant.upvotes),
    };
    if other.contains(voter) {
        vec![
            VoteOp::Remove(side.opposite(), voter.clone()),
            VoteOp::Insert(side, voter.clone()),
        ]
    } else if same.contains(voter) {
        vec![VoteOp::Remove(side, voter.clone())]
    } else {
        vec![VoteOp::Insert(side, voter.clone())]
    }
}
