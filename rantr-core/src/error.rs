use rantr_api::Error as ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn rant_not_found() -> Error {
        Error::Api(ApiError::RantNotFound)
    }

    pub fn already_deleted() -> Error {
        Error::Api(ApiError::AlreadyDeleted)
    }

    pub fn not_rant_creator() -> Error {
        Error::Api(ApiError::NotRantCreator)
    }

    pub fn voter_not_found() -> Error {
        Error::Api(ApiError::VoterNotFound)
    }

    pub fn voter_deactivated() -> Error {
        Error::Api(ApiError::VoterDeactivated)
    }

    pub fn feed_exhausted() -> Error {
        Error::Api(ApiError::FeedExhausted)
    }

    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Error::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            Error::Api(err) => err.status_code(),
        }
    }

    /// Response body for a transport layer. Storage failures are
    /// logged and collapsed into an opaque message.
    pub fn contents(&self) -> Vec<u8> {
        match self {
            Error::Internal(err) => {
                tracing::error!(?err, "internal error");
                ApiError::Unknown(String::from("Internal error, see logs for details")).contents()
            }
            Error::Api(err) => err.contents(),
        }
    }
}
