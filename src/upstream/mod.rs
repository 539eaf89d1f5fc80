// Upstream collaborators — traits, the live HTTP client and its plumbing.

pub mod client;
pub mod error;
pub mod parse;
pub mod rate_limit;
pub mod session;
pub mod traits;

pub use client::UpstreamClient;
pub use error::FetchError;
pub use session::Session;
pub use traits::{
    AccountInfoSource, ContactHintSource, FollowerPage, FollowerSource, NameSearch, ProfileSource,
};
