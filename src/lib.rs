pub mod analysis;
pub mod app;
pub mod cache;
pub mod challenges;
pub mod config;
pub mod daily;
pub mod errors;
pub mod gemini;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod request;
pub mod state;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod theory;
pub mod ui;

#[cfg(test)]
mod testing;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{JsonFileStore, PersistedStore};
