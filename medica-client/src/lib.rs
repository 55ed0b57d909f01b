//! Medica client SDK
//!
//! This crate is the embeddable client half of the Medica records platform:
//! a typed, async GraphQL client with an authenticated request pipeline
//! (bearer decoration, one-shot refresh-and-replay on expired sessions) and
//! persistent session storage. Application frontends own rendering,
//! validation, and navigation; the SDK ends at typed operations.
//!
//! Notes
//! - The token store is an injected dependency ([`store::TokenStore`]); the
//!   SDK never reaches for global state.
//! - Dropping an in-flight operation future cancels it, including a pending
//!   refresh or replay.

mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod ops;
pub mod store;
pub mod users;

pub use cache::{CachedProfile, ProfileCache};
pub use client::GraphqlClient;
pub use config::ClientConfig;
pub use error::{ClientError, RefreshError, Result};
pub use ops::{FileAttachment, Operation, documents};
pub use store::{
    FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreExt, keys,
};
pub use users::UserSearch;

pub use medica_model as model;
