pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod presenter;
pub mod types;

// Layered boundaries: use cases and ports in `app`, adapters in `infra`
pub mod app;
pub mod infra;
