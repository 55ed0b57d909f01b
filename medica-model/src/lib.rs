//! Core data model definitions shared across Medica crates.
#![allow(missing_docs)]

pub mod auth;
pub mod error;
pub mod graphql;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use auth::{
    LoginPayload, RefreshRequest, RefreshResponse, RegisterPayload,
    SessionCredentials,
};
pub use error::{ModelError, Result as ModelResult};
pub use graphql::{
    GraphqlError, GraphqlErrorExtensions, GraphqlRequest, GraphqlResponse,
    code,
};
pub use user::{
    MedicalCategory, MedicalVisit, Role, UpdateUserInput, UserProfile,
    UserRecord, UserSummary,
};
