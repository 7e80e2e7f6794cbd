//! people-registry — REST service that stores people enriched with
//! age, gender and nationality guesses.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
pub use router::{build_router, AppState};
