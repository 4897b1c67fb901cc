pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod shutdown;
pub mod state;

pub use api::create_router;
pub use config::{AppConfig, ConfigLoader};
pub use error::{ApiError, Result};
pub use state::AppState;
