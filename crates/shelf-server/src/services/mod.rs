//! Business services

pub mod item_service;

pub use item_service::{ItemError, ItemService};
