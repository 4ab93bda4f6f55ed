/// Business logic services
pub mod credential_store;
pub mod revocation_cleanup;
pub mod token_service;

pub use credential_store::CredentialStore;
pub use revocation_cleanup::{purge_once, spawn_revocation_cleanup};
pub use token_service::{AuthenticatedUser, TokenIdentifier, TokenService};
