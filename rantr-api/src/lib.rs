use chrono::Utc;

pub use uuid::{uuid, Uuid};

mod comment;
mod db;
mod error;
mod rant;
mod user;

pub use comment::{Comment, CommentId};
pub use db::{RantStore, RantUpdate, UserDirectory, VoteOp, VoteSets, VoteSide};
pub use error::Error;
pub use rant::{
    DiffSegment, EditEntry, EditRant, EditRecord, NewRant, Rant, RantFeed, RantId, DEFAULT_TAG,
    RANT_MIN_BODY_CHARS,
};
pub use user::{UserId, Voter};

pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");
