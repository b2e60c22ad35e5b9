//! axum HTTP server exposing the repository catalog.

mod server;

pub use server::{build_router, AppState, HttpServer};
