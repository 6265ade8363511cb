//! Service layer: identity resolution, the ownership rule and the item operations.
//! - Separates business logic from data access (`ItemStore`).
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod authorization;
pub mod pagination;
pub mod items;
#[cfg(test)]
pub mod test_support;
