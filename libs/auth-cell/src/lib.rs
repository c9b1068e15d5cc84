pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use error::AuthError;
pub use models::IdentityRecord;
pub use services::{AuthService, IdentityResolver, TokenService};
pub use store::IdentityStore;
