//! Identity is issued elsewhere. This module only reads (and, for tooling,
//! mints) the HS256 tokens that carry an owner id.

mod jwt;
pub use jwt::{OwnerClaims, issue_token, verify_token};
mod error;
pub use error::{CryptError, CryptResult};
