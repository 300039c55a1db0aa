//! HydroGPT API - HTTP surface
//!
//! Exposes the query pipeline and the read-only geo-data endpoints.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
