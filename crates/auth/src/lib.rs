//! `kafkagate-auth`: compiles namespace access grants into UI authorization claims.
//!
//! This crate is intentionally decoupled from HTTP and storage: collaborators
//! are reached through [`GrantDirectory`], and every compilation is a pure
//! function of the directory contents and [`ClaimsConfig`].

pub mod binding;
pub mod claims;
pub mod config;
pub mod pattern;
pub mod reduce;
pub mod scope;

pub use binding::ClaimBinding;
pub use claims::{
    ClaimCompiler, ClaimFilters, ClaimRequest, ClaimResponseV1, ClaimResponseV2, ClaimResponseV3,
};
pub use config::{ClaimsConfig, RoleMapping};
pub use pattern::{ALLOW_ALL, DENY_ALL};
pub use scope::{GrantDirectory, GrantSnapshot, MembershipTest, Scope};
