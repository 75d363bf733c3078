//! `kafkagate-core`: resource model shared by the claim compiler and its stores.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod error;
pub mod grant;
pub mod namespace;

pub use error::{DomainError, DomainResult};
pub use grant::{AccessGrant, GrantPermission, PUBLIC_GRANTEE, PatternKind, ResourceKind};
pub use namespace::Namespace;
