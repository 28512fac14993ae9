//! # Connector Core
//!
//! Shared types and traits for the Census webhook connector.
//!
//! This crate provides:
//! - Wire types for the object catalog the connector advertises
//! - The injected, read-only catalog configuration
//! - Traits for the two external collaborators: API-key validation and
//!   record delivery

pub mod catalog;
pub mod traits;
pub mod types;

pub use catalog::{Catalog, FieldSpec};
pub use traits::{ApiKeyValidator, RecordSink, SinkError};
pub use types::{FieldDescriptor, ObjectDescriptor, RecordResult, SyncSpeed};
