//! Items: ownership-scoped CRUD in three layers (domain, store, service).

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Item, ItemChanges, ItemCreate, ItemUpdate, ItemsPage, Patch};
pub use repository::ItemStore;
