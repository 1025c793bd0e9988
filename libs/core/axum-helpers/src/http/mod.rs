//! HTTP middleware module.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{CorsConfig, cors_layer};
//!
//! let app = Router::new()
//!     .route("/quotes", get(handler))
//!     .layer(cors_layer(&CorsConfig::default())?);
//! ```

pub mod cors;

pub use cors::{CorsConfig, cors_layer};
