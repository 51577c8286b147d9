use serde_json::json;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("This rant does not exist")]
    RantNotFound,

    #[error("Rant has already been deleted")]
    AlreadyDeleted,

    #[error("You are not allowed to modify this rant at this time")]
    NotRantCreator,

    #[error("The rant voter does not exist")]
    VoterNotFound,

    #[error("Your account has been deactivated, you can't carry out this operation")]
    VoterDeactivated,

    #[error("No rants to read")]
    FeedExhausted,

    #[error("Rant cannot be created because it is not longer than 20 characters")]
    RantTooShort,
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::RantNotFound => StatusCode::NOT_FOUND,
            Error::AlreadyDeleted => StatusCode::GONE,
            Error::NotRantCreator => StatusCode::UNAUTHORIZED,
            // deactivated accounts are reported like missing ones, so
            // the response does not reveal the account state
            Error::VoterNotFound | Error::VoterDeactivated => StatusCode::NOT_FOUND,
            Error::FeedExhausted => StatusCode::NOT_FOUND,
            Error::RantTooShort => StatusCode::PRECONDITION_FAILED,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        let kind = match self {
            Error::Unknown(_) => "unknown",
            Error::RantNotFound => "rant-not-found",
            Error::AlreadyDeleted => "already-deleted",
            Error::NotRantCreator => "not-rant-creator",
            Error::VoterNotFound => "voter-not-found",
            Error::VoterDeactivated => "voter-deactivated",
            Error::FeedExhausted => "feed-exhausted",
            Error::RantTooShort => "rant-too-short",
        };
        serde_json::to_vec(&json!({
            "message": self.to_string(),
            "type": kind,
        }))
        .expect("serializing error contents")
    }
}
