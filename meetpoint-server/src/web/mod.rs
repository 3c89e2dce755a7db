//! Web layer for the meeting-point finder.
//!
//! Provides the JSON endpoint that ranks meeting stations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LiveState};
