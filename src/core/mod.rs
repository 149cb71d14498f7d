// src/core/mod.rs
//! Collaborators around the validation and classification core

pub mod fs_ops;
pub mod oidc;
pub mod webhook_client;

pub use fs_ops::{FsOps, LoadedProfile};
pub use oidc::{GitHubOidcProvider, IdentityTokenProvider, StaticTokenProvider};
pub use webhook_client::{Delivery, WebhookClient};
