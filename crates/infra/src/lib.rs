//! Infrastructure layer: collaborator stores and configuration.

pub mod config;
pub mod directory;
pub mod store;

pub use config::{AppConfig, SeedData};
pub use directory::StoreDirectory;
pub use store::StoreError;
