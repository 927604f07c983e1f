mod jwks;
mod session_store;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod identity;
pub mod model;
pub mod profile_store;
pub mod routes;
pub mod service;

pub use identity::GoogleIdentityProvider;
pub use jwks::JwksClient;
pub use profile_store::InMemoryProfileStore;
pub use service::{AuthService, SignOutHook};
pub use session_store::SessionStore;
