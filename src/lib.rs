//! PriceScout binary support: environment-driven configuration and wiring
//! of the page driver, storage sink, oracle and agent loop.

pub mod config;

pub use config::AppConfig;
