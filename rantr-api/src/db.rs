use std::collections::HashSet;

use async_trait::async_trait;

use crate::{EditEntry, Rant, RantId, UserId, Voter};

/// One logical change to a stored rant. A store must apply all of a
/// change or none of it, with set additions/removals and history
/// appends done field-level atomic, so two concurrent writers on the
/// same rant never silently drop each other's update.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RantUpdate {
    /// Soft-delete. Comments, votes and edit history are retained; the
    /// rant only disappears from feed listings.
    Delete,

    /// Replace body and tags, mark the rant edited, and append the
    /// matching history entry, as a single unit.
    Edit {
        body: String,
        tags: Vec<String>,
        entry: EditEntry,
    },

    /// Set-level additions and removals on the vote sets.
    Votes(Vec<VoteOp>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteSide {
    Up,
    Down,
}

impl VoteSide {
    pub fn opposite(self) -> VoteSide {
        match self {
            VoteSide::Up => VoteSide::Down,
            VoteSide::Down => VoteSide::Up,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VoteOp {
    Insert(VoteSide, UserId),
    Remove(VoteSide, UserId),
}

/// Vote membership of a rant after a mutation. Counts are derived as
/// set sizes by the caller.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VoteSets {
    pub upvotes: HashSet<UserId>,
    pub downvotes: HashSet<UserId>,
}

impl VoteSets {
    pub fn of(rant: &Rant) -> VoteSets {
        VoteSets {
            upvotes: rant.upvotes.clone(),
            downvotes: rant.downvotes.clone(),
        }
    }
}

/// Abstract persistence for rant documents. Serialization of
/// concurrent writers is delegated entirely to implementations; the
/// service layer takes no in-process locks.
#[async_trait]
pub trait RantStore {
    async fn find_by_id(&mut self, id: &RantId) -> anyhow::Result<Option<Rant>>;

    async fn insert(&mut self, rant: Rant) -> anyhow::Result<Rant>;

    async fn update_fields(&mut self, id: &RantId, update: RantUpdate) -> anyhow::Result<Rant>;

    /// A bounded window of non-deleted rants in stable recency order,
    /// most recent first.
    async fn list_non_deleted(&mut self, offset: usize, limit: usize) -> anyhow::Result<Vec<Rant>>;
}

/// Account lookup, owned by the (external) user subsystem.
#[async_trait]
pub trait UserDirectory {
    async fn lookup_voter(&mut self, id: &UserId) -> anyhow::Result<Option<Voter>>;
}
