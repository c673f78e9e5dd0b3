//! Flow schema converter module
//!
//! Provides the V1 to V2 flow document migration.

pub mod flow_id;
pub mod migrate_flow;

pub use flow_id::{normalize_flow_id, uuid_from_integer};
pub use migrate_flow::{
    Migration, MigrationError, MigrationReport, convert_document, convert_flow,
    convert_node_data, migrate_document,
};
