//! Core library for the `skycheck` CLI.
//!
//! This crate defines:
//! - Query validation and request URL building
//! - Condition-code to icon classification
//! - The WeatherAPI.com current-conditions client and its response model
//! - A last-query-wins session for UI-style callers
//! - Configuration & credentials handling
//!
//! It is used by `skycheck-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod session;

pub use client::{ConditionsSource, WeatherClient, WeatherClientBuilder};
pub use condition::{IconId, classify};
pub use config::Config;
pub use error::{BuildError, DecodeError, FetchError};
pub use model::{WeatherReport, WeatherResponse};
pub use query::{Coordinates, QueryBuilder, WeatherQuery};
pub use session::{Delivery, LatestQuery, Outcome, Ticket};
