//! JCMap Auth — registration and login orchestration, Argon2id password
//! hashing, and EdDSA JWT issuance/validation.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthOutput, AuthService, RegisterInput};
pub use token::AccessTokenClaims;
