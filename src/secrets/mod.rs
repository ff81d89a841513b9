//! secrets
//!
//! Credential lookup for the GitHub token.
//!
//! # Security
//!
//! - Tokens are **never** logged or included in error messages
//! - `Debug` output of every type here redacts token values
//! - Only the [`TokenOrigin`] of a resolved token is ever logged
//!
//! # Example
//!
//! ```ignore
//! use delete_branch_on_merge::secrets::{CredentialSource, TokenResolver};
//!
//! let resolver = TokenResolver::new(cli.token.clone(), config.token().map(String::from));
//! let token = resolver.get_credential()?;
//! ```

mod resolver;
mod traits;

pub use resolver::{TokenOrigin, TokenResolver, TOKEN_ENV_VARS};
pub use traits::CredentialSource;
