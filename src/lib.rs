//! MCP server exposing the MeasureSpace weather, climate, air quality and
//! geocoding APIs as tools.

pub mod catalog;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod service;
pub mod tools;

pub use catalog::{load_metadata, MetadataSource, VariableCatalog};
pub use client::{Endpoints, MeasureSpaceApi, MeasureSpaceClient};
pub use config::{ApiKeys, Config};
pub use error::{ApiError, ConfigError, MetadataError};
pub use service::MeasureSpace;
