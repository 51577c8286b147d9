pub mod diff;

mod error;
mod service;

pub use error::Error;
pub use service::{RantService, RANT_FEED_PAGE_SIZE};
