//! Flow Migrate - V1 to V2 flow document converter
//!
//! Provides:
//! - Flow id normalization (integer ids become UUIDs with the same 128-bit value)
//! - Node data field renaming (`sources`/`targets`/`targets_form` to
//!   `outputs`/`inputs`/`config`) and removal of deprecated keys
//! - A command-line front end (feature `cli`)
//!
//! # Example
//!
//! ```rust
//! use flow_migrate::convert_document;
//! use serde_json::json;
//!
//! let v1 = json!({
//!     "flow": {
//!         "id": 1,
//!         "nodes": [{"data": {"sources": [], "targets": [], "ui_schema": {}}}]
//!     },
//!     "bookmarks": []
//! });
//!
//! let v2 = convert_document(v1).unwrap();
//! assert_eq!(v2["flow"]["id"], "00000000-0000-0000-0000-000000000001");
//! assert_eq!(
//!     v2["flow"]["nodes"][0]["data"],
//!     json!({"outputs": [], "inputs": [], "config": {}})
//! );
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod convert;

pub use convert::{
    Migration, MigrationError, MigrationReport, convert_document, convert_flow,
    convert_node_data, migrate_document,
};
