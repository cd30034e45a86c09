//! Client gateway
//!
//! Wires the identity, graph, content and feed services over one document
//! store and exposes them as [`SocialClient`], with failures mapped to
//! [`UserFacingError`].

pub mod client;
pub mod config;
pub mod error;
pub mod telemetry;

pub use client::{ClientResult, SocialClient};
pub use config::{AppConfig, Config, LogFormat};
pub use error::{IntoUserFacing, UserFacingError, RETRY_MESSAGE};
pub use telemetry::init_tracing;
