//! Auth module: turns a bearer credential into a verified [`Identity`].
//!
//! Tokens are issued by a separate service; this side only verifies them against the
//! configured shared secret and algorithm set.

pub mod domain;
pub mod errors;
pub mod resolver;

pub use domain::Identity;
pub use resolver::IdentityResolver;
