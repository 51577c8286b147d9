use std::collections::HashSet;

use uuid::Uuid;

use crate::{Comment, Error, Time, UserId, STUB_UUID};

/// Tag applied when a rant is created without any.
pub const DEFAULT_TAG: &str = "general";

/// A rant body must be strictly longer than this once trimmed.
pub const RANT_MIN_BODY_CHARS: usize = 20;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct RantId(pub Uuid);

impl RantId {
    pub fn generate() -> RantId {
        RantId(Uuid::new_v4())
    }

    pub fn stub() -> RantId {
        RantId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Rant {
    /// Unique and immutable once assigned.
    pub id: RantId,
    pub poster: UserId,
    pub body: String,

    /// Never empty after creation. Kept verbatim, in order, without
    /// de-duplication or case/whitespace normalization.
    pub tags: Vec<String>,
    pub when: Time,

    pub comments: Vec<Comment>,
    pub upvotes: HashSet<UserId>,
    pub downvotes: HashSet<UserId>,

    /// Monotonic: goes false to true and never back.
    pub deleted: bool,
    pub edit: EditRecord,
}

impl Rant {
    /// The stored form of a new rant: fresh id, defaulted tags, empty
    /// comments and vote sets, no edit history.
    pub fn created(new: NewRant) -> Rant {
        let NewRant {
            poster,
            body,
            tags,
            when,
        } = new;
        let tags = if tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            tags
        };
        Rant {
            id: RantId::generate(),
            poster,
            body,
            tags,
            when,
            comments: Vec::new(),
            upvotes: HashSet::new(),
            downvotes: HashSet::new(),
            deleted: false,
            edit: EditRecord::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EditRecord {
    pub is_edited: bool,

    /// Append-only, ordered non-decreasing by `when`. Entries are
    /// never removed or reordered; retention is unbounded.
    pub history: Vec<EditEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EditEntry {
    /// Timestamp of the edit request, as supplied by the caller.
    pub when: Time,

    /// Body value immediately prior to this edit.
    pub diff_against: String,

    pub diff: Vec<DiffSegment>,
}

/// A labeled span from a before/after body comparison. `added` and
/// `removed` are mutually exclusive; both false marks an unchanged
/// span. Concatenating values while skipping removed segments yields
/// the post-edit body; skipping added segments yields `diff_against`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DiffSegment {
    pub value: String,
    pub added: bool,
    pub removed: bool,
}

impl DiffSegment {
    pub fn unchanged(value: impl Into<String>) -> DiffSegment {
        DiffSegment {
            value: value.into(),
            added: false,
            removed: false,
        }
    }

    pub fn added(value: impl Into<String>) -> DiffSegment {
        DiffSegment {
            value: value.into(),
            added: true,
            removed: false,
        }
    }

    pub fn removed(value: impl Into<String>) -> DiffSegment {
        DiffSegment {
            value: value.into(),
            added: false,
            removed: true,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !self.added && !self.removed
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewRant {
    pub poster: UserId,
    pub body: String,
    pub tags: Vec<String>,
    pub when: Time,
}

impl NewRant {
    /// Upstream middleware checks the body shape before the core is
    /// ever called; the core re-checks here so a malformed request can
    /// never reach storage.
    pub fn validate(&self) -> Result<(), Error> {
        if self.body.trim().chars().count() <= RANT_MIN_BODY_CHARS {
            return Err(Error::RantTooShort);
        }
        Ok(())
    }
}

/// Payload for an edit, assembled by the caller: the current body is
/// read first as diff baseline, the diff computed from it, and the
/// whole change submitted as one unit.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EditRant {
    pub edited_rant: String,
    pub current_rant_in_db: String,
    pub tags: Vec<String>,
    pub when: Time,
    pub diff: Vec<DiffSegment>,
}

/// One window of the feed. Exhaustion is re-derived from window
/// emptiness on every call, never from comparing the cursor to a
/// cached total: the collection may grow between calls.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RantFeed {
    pub rants: Vec<Rant>,
}

impl RantFeed {
    pub fn is_exhausted(&self) -> bool {
        self.rants.is_empty()
    }
}
