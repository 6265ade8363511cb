//! Shared building blocks for the item service crates: log initialisation and
//! small response types used on public endpoints.

pub mod types;
pub mod utils;
