//! Authentication module
//!
//! Write endpoints resolve their caller through an `IdentityProvider`.
//! `JwtIdentityProvider` accepts `Bearer` HS256 access tokens and can also
//! issue them (used by the CLI and tests).

mod identity;
mod types;

pub use identity::{bearer_token, IdentityProvider, JwtIdentityProvider};
pub use types::{Claims, Identity, TokenType};

#[cfg(test)]
mod tests;
