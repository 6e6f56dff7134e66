// ABOUTME: Provider adapters for source-control hosts (GitHub, GitLab)
// ABOUTME: Exposes the registry, the adapter capability trait, and normalized types

pub mod adapter;
pub mod config;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod kind;
pub mod types;

pub use adapter::ProviderAdapter;
pub use config::{ProviderConfig, ProviderRegistry};
pub use error::{ProviderError, ProviderResult};
pub use kind::ProviderKind;
pub use types::{NormalizedUser, Profile};
