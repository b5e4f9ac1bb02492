//! Flat-file backing store for service records.

mod models;
mod repository;

pub use repository::JsonFileServiceStore;
