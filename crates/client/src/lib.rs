//! Client side of the wallet workflow.
//!
//! The server owns every balance and status. This crate only mirrors what
//! the server returns: [`WalletSession`] for a wallet owner, [`AdminDesk`]
//! for an admin working through request queues. Input is validated before
//! any network call, and a failed call never changes local state beyond
//! flagging the affected entry as stale.

pub use backend::Backend;
pub use cache::{CachedRequest, Freshness, RequestCache, TabKey};
pub use client::{Client, Credentials};
pub use desk::{ActionOutcome, AdminAction, AdminDesk, Dialog, RejectInput};
pub use error::{ClientError, DeskError, FALLBACK_MESSAGE};
pub use session::WalletSession;

mod backend;
mod cache;
mod client;
mod desk;
mod error;
mod session;

#[cfg(test)]
mod fake;
