//! Quotes API
//!
//! HTTP front end for semantic quote search.
//!
//! ## Routes
//!
//! - `GET /quotes?author=&query=`: author listing, semantic search or everything
//! - `GET /quote/{id}`: one quote
//! - `GET /page/`: search page
//! - `GET /`, `GET /metrics`, `GET /ready`
//!
//! ## Modules
//!
//! - `api`: route composition and the request pipeline
//! - `config`: environment configuration
//! - `server`: bootstrap and lifecycle
//! - `seed`: bulk loading behind the `seed` binary

pub mod api;
pub mod config;
pub mod seed;
pub mod server;

pub use server::run;
