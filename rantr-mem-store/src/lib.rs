use std::collections::{btree_map, BTreeMap, HashMap, HashSet};

use anyhow::anyhow;
use async_trait::async_trait;
use rantr_api::{
    Rant, RantId, RantStore, RantUpdate, UserDirectory, UserId, VoteOp, VoteSide, Voter,
};

/// In-memory `RantStore`, for tests and local development. Each
/// `update_fields` call applies one whole logical change while the
/// entry is borrowed, which is exactly the atomicity the trait asks
/// for; there is only ever one writer here.
#[derive(Debug, Default)]
pub struct MemRantStore {
    rants: BTreeMap<RantId, Rant>,
}

impl MemRantStore {
    pub fn new() -> MemRantStore {
        MemRantStore::default()
    }

    /// Number of stored records, soft-deleted ones included.
    pub fn test_num_rants(&self) -> usize {
        self.rants.len()
    }

    /// Direct read access for test assertions.
    pub fn test_get_rant(&self, id: &RantId) -> Option<&Rant> {
        self.rants.get(id)
    }
}

fn vote_set_mut(rant: &mut Rant, side: VoteSide) -> &mut HashSet<UserId> {
    match side {
        VoteSide::Up => &mut rant.upvotes,
        VoteSide::Down => &mut rant.downvotes,
    }
}

#[async_trait]
impl RantStore for MemRantStore {
    async fn find_by_id(&mut self, id: &RantId) -> anyhow::Result<Option<Rant>> {
        Ok(self.rants.get(id).cloned())
    }

    async fn insert(&mut self, rant: Rant) -> anyhow::Result<Rant> {
        match self.rants.entry(rant.id) {
            btree_map::Entry::Occupied(_) => Err(anyhow!("rant id {:?} already used", rant.id)),
            btree_map::Entry::Vacant(entry) => Ok(entry.insert(rant).clone()),
        }
    }

    async fn update_fields(&mut self, id: &RantId, update: RantUpdate) -> anyhow::Result<Rant> {
        let rant = self
            .rants
            .get_mut(id)
            .ok_or_else(|| anyhow!("updating rant {id:?} that is not in store"))?;
        match update {
            RantUpdate::Delete => rant.deleted = true,
            RantUpdate::Edit { body, tags, entry } => {
                if let Some(last) = rant.edit.history.last() {
                    if last.when > entry.when {
                        tracing::warn!(
                            ?id,
                            "edit entry older than the previous one, appending anyway"
                        );
                    }
                }
                rant.body = body;
                rant.tags = tags;
                rant.edit.is_edited = true;
                rant.edit.history.push(entry);
            }
            RantUpdate::Votes(ops) => {
                for op in ops {
                    match op {
                        VoteOp::Insert(side, user) => {
                            vote_set_mut(rant, side).insert(user);
                        }
                        VoteOp::Remove(side, user) => {
                            vote_set_mut(rant, side).remove(&user);
                        }
                    }
                }
            }
        }
        Ok(rant.clone())
    }

    async fn list_non_deleted(&mut self, offset: usize, limit: usize) -> anyhow::Result<Vec<Rant>> {
        let mut live: Vec<&Rant> = self.rants.values().filter(|r| !r.deleted).collect();
        // most recent first, id as deterministic tiebreak
        live.sort_by(|a, b| b.when.cmp(&a.when).then_with(|| a.id.cmp(&b.id)));
        Ok(live.into_iter().skip(offset).take(limit).cloned().collect())
    }
}

/// In-memory `UserDirectory` counterpart.
#[derive(Debug, Default)]
pub struct MemUserDirectory {
    voters: HashMap<UserId, Voter>,
}

impl MemUserDirectory {
    pub fn new() -> MemUserDirectory {
        MemUserDirectory::default()
    }

    pub fn add_voter(&mut self, voter: Voter) {
        self.voters.insert(voter.id.clone(), voter);
    }
}

#[async_trait]
impl UserDirectory for MemUserDirectory {
    async fn lookup_voter(&mut self, id: &UserId) -> anyhow::Result<Option<Voter>> {
        Ok(self.voters.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rantr_api::{NewRant, Time};

    use super::*;

    fn when(secs: i64) -> Time {
        Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap()
    }

    fn stored(body: &str, at: Time) -> Rant {
        Rant::created(NewRant {
            poster: UserId::new("someone"),
            body: body.to_string(),
            tags: vec![],
            when: at,
        })
    }

    #[tokio::test]
    async fn insert_rejects_reused_id() {
        let mut store = MemRantStore::new();
        let rant = stored("an utterly ordinary first rant", when(0));
        let dup = rant.clone();
        store.insert(rant).await.unwrap();
        assert!(store.insert(dup).await.is_err());
        assert_eq!(store.test_num_rants(), 1);
    }

    #[tokio::test]
    async fn listing_skips_deleted_and_orders_by_recency() {
        let mut store = MemRantStore::new();
        let oldest = store.insert(stored("oldest", when(0))).await.unwrap();
        let middle = store.insert(stored("middle", when(10))).await.unwrap();
        let newest = store.insert(stored("newest", when(20))).await.unwrap();
        store
            .update_fields(&middle.id, RantUpdate::Delete)
            .await
            .unwrap();

        let window = store.list_non_deleted(0, 10).await.unwrap();
        let ids: Vec<RantId> = window.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest.id, oldest.id]);

        assert!(store.list_non_deleted(2, 10).await.unwrap().is_empty());
    }
}
