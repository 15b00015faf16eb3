pub mod app;
pub mod controllers;
pub mod error;
pub mod router;
pub mod state;
pub mod tracing;
