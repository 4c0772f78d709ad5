//! HTTP service that turns marker scripts into downloadable PPTX decks.

pub mod config;
pub mod error;
pub mod generate;
mod page;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
