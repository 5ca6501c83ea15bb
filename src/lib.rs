//! Session, login and tier-selection client for the StealthMate API.
//!
//! [`AuthScreen`] owns the current [`Session`]. It restores it from a
//! [`SessionStore`] on start, creates it through [`AuthApi::login`] and drops it
//! on logout. [`Client`] is the HTTP implementation of [`AuthApi`].

pub mod config;
pub mod errors;
pub mod logging;
mod structs;

pub use config::ClientOptions;
pub use errors::AuthError;
pub use structs::client::{AuthApi, Client};
pub use structs::session::{AuthScreen, AuthState};
pub use structs::store::{LocalStorage, MemoryStore, SessionStore, SESSION_KEY};
pub use structs::tier::{tier_by_id, tier_name, upgrade_options, TierDetails, TIERS};
pub use structs::*;
