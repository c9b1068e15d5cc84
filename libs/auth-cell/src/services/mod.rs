pub mod auth;
pub mod identity;
pub mod password;
pub mod token;

pub use auth::AuthService;
pub use identity::IdentityResolver;
pub use token::TokenService;
