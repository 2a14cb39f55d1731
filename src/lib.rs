//! Daily Memento: one photo and one quote per day, kept in a local store.
//!
//! [`App`] wires the item store, the photo storage from the `photo-gallery`
//! crate and the event bus together; the services under [`services`] hold
//! the actual logic and can be used on their own.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod filesystem;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use config::{AppConfig, QuoteSelection};
pub use error::AppError;
pub use events::{AppEvent, EventBus};
