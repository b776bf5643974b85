pub mod app;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod pie;
pub mod state;
pub mod storage;
pub mod summary;
pub mod table;
pub mod ticker;
pub mod ui;

pub use app::router;
pub use catalog::{StateCatalog, load_catalog};
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
