//! Flow V1 to V2 schema migration
//!
//! Rewrites a parsed flow document in place of its V1 field names:
//! - an integer flow `id` becomes the UUID with the same 128-bit value
//! - node `data.sources` / `data.targets` become `outputs` / `inputs`
//! - node `data.targets_form.form_data` becomes `data.config`
//! - `json_schema` and `ui_schema` are dropped from node data
//!
//! Everything else passes through untouched and keeps its position.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::flow_id::normalize_flow_id;

/// Node data keys that have no place in the V2 schema
pub const DROPPED_NODE_DATA_KEYS: [&str; 2] = ["json_schema", "ui_schema"];

/// Error during flow migration
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Invalid shape at '{path}': expected {expected}")]
    InvalidShape { path: String, expected: &'static str },
    #[error("Flow id {0} does not fit in a 128-bit UUID")]
    FlowIdOutOfRange(String),
}

/// Summary of what a migration changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// The flow was found under a `flow` key of the document
    pub wrapped: bool,
    /// New flow id, when an integer id was rewritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    /// Number of entries in `nodes`
    pub nodes_total: usize,
    /// Number of nodes whose `data` block was converted
    pub nodes_converted: usize,
    /// `sources` / `targets` keys renamed
    pub renamed_keys: usize,
    /// `config` values taken from `targets_form.form_data`
    pub configs_from_form_data: usize,
    /// `config` values defaulted to an empty object
    pub configs_defaulted: usize,
    /// Deprecated keys removed from node data
    pub dropped_keys: usize,
}

/// A converted document together with its report
#[derive(Debug, Clone)]
pub struct Migration {
    pub document: Value,
    pub report: MigrationReport,
}

/// Convert one node's `data` block to the V2 layout
///
/// Never fails: any object, including an empty one, yields a valid V2 block
/// containing at least `config`.
///
/// # Example
///
/// ```rust
/// use flow_migrate::convert::convert_node_data;
/// use serde_json::json;
///
/// let data = json!({"sources": [1], "targets_form": {"form_data": {"a": 1}}});
/// let converted = convert_node_data(data.as_object().unwrap().clone());
/// assert_eq!(
///     serde_json::Value::Object(converted),
///     json!({"outputs": [1], "config": {"a": 1}})
/// );
/// ```
pub fn convert_node_data(data: Map<String, Value>) -> Map<String, Value> {
    convert_node_data_tracked(data, &mut MigrationReport::default())
}

fn convert_node_data_tracked(
    data: Map<String, Value>,
    report: &mut MigrationReport,
) -> Map<String, Value> {
    let mut converted = Map::with_capacity(data.len() + 1);

    for (key, value) in data {
        match key.as_str() {
            "sources" => {
                converted.insert("outputs".to_string(), value);
                report.renamed_keys += 1;
            }
            "targets" => {
                converted.insert("inputs".to_string(), value);
                report.renamed_keys += 1;
            }
            "targets_form" => match take_form_data(value) {
                Some(config) => {
                    converted.insert("config".to_string(), config);
                    report.configs_from_form_data += 1;
                }
                None if !converted.contains_key("config") => {
                    converted.insert("config".to_string(), Value::Object(Map::new()));
                    report.configs_defaulted += 1;
                }
                None => {}
            },
            k if DROPPED_NODE_DATA_KEYS.contains(&k) => {
                report.dropped_keys += 1;
            }
            _ => {
                converted.insert(key, value);
            }
        }
    }

    if !converted.contains_key("config") {
        converted.insert("config".to_string(), Value::Object(Map::new()));
        report.configs_defaulted += 1;
    }

    converted
}

/// Pull `form_data` out of a `targets_form` value, if it has one
fn take_form_data(targets_form: Value) -> Option<Value> {
    let Value::Object(mut form) = targets_form else {
        return None;
    };

    let form_data = form.remove("form_data");
    if form_data.is_none() && !form.is_empty() {
        warn!(
            keys = ?form.keys().collect::<Vec<_>>(),
            "targets_form has no form_data; discarding it and defaulting config"
        );
    }
    form_data
}

/// Convert a flow object to the V2 layout
///
/// Missing `id` and `nodes` are fine. Nodes without `data`, and nodes that are
/// not objects, are kept as they are.
///
/// # Errors
///
/// Returns [`MigrationError::InvalidShape`] when the flow is not an object,
/// `nodes` is not an array, or a node's `data` is not an object, and
/// [`MigrationError::FlowIdOutOfRange`] for integer ids outside `0..=u128::MAX`.
pub fn convert_flow(flow: Value) -> Result<Value, MigrationError> {
    convert_flow_tracked(flow, "", &mut MigrationReport::default())
}

fn convert_flow_tracked(
    flow: Value,
    path: &str,
    report: &mut MigrationReport,
) -> Result<Value, MigrationError> {
    let Value::Object(mut flow) = flow else {
        let path = if path.is_empty() { "$" } else { path };
        return Err(MigrationError::InvalidShape {
            path: path.to_string(),
            expected: "object",
        });
    };

    if let Some(id) = flow.get_mut("id")
        && let Some(uuid) = normalize_flow_id(id)?
    {
        debug!(old = %id, new = %uuid, "Normalized flow id");
        *id = Value::String(uuid.clone());
        report.flow_id = Some(uuid);
    }

    if let Some(nodes) = flow.get_mut("nodes") {
        let Value::Array(nodes) = nodes else {
            return Err(MigrationError::InvalidShape {
                path: join_path(path, "nodes"),
                expected: "array",
            });
        };
        report.nodes_total += nodes.len();

        for (index, node) in nodes.iter_mut().enumerate() {
            let Some(data) = node.as_object_mut().and_then(|n| n.get_mut("data")) else {
                continue;
            };
            let Value::Object(block) = data else {
                return Err(MigrationError::InvalidShape {
                    path: join_path(path, &format!("nodes[{}].data", index)),
                    expected: "object",
                });
            };

            *block = convert_node_data_tracked(std::mem::take(block), report);
            report.nodes_converted += 1;
            debug!(node = index, "Converted node data");
        }
    }

    Ok(Value::Object(flow))
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Convert a whole document
///
/// A document that wraps its flow under `flow` keeps every sibling key (such as
/// `bookmarks`) untouched; any other document is treated as the flow itself.
pub fn convert_document(doc: Value) -> Result<Value, MigrationError> {
    migrate_document(doc).map(|migration| migration.document)
}

/// Convert a whole document and report what changed
pub fn migrate_document(doc: Value) -> Result<Migration, MigrationError> {
    let mut report = MigrationReport::default();

    let document = match doc {
        Value::Object(mut root) if root.contains_key("flow") => {
            report.wrapped = true;
            if let Some(flow) = root.get_mut("flow") {
                *flow = convert_flow_tracked(flow.take(), "flow", &mut report)?;
            }
            Value::Object(root)
        }
        flow => convert_flow_tracked(flow, "", &mut report)?,
    };

    info!(
        wrapped = report.wrapped,
        flow_id = report.flow_id.as_deref().unwrap_or("unchanged"),
        nodes = report.nodes_total,
        converted = report.nodes_converted,
        renamed = report.renamed_keys,
        dropped = report.dropped_keys,
        "Flow migration complete"
    );

    Ok(Migration { document, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_targets_form_without_form_data_defaults_config() {
        let converted = convert_node_data(object(json!({
            "targets_form": {"extra": true},
            "node_id": "const"
        })));
        assert_eq!(
            Value::Object(converted),
            json!({"config": {}, "node_id": "const"})
        );
    }

    #[test]
    fn test_targets_form_not_an_object_defaults_config() {
        let converted = convert_node_data(object(json!({"targets_form": null})));
        assert_eq!(Value::Object(converted), json!({"config": {}}));
    }

    #[test]
    fn test_existing_config_not_clobbered_by_default() {
        let converted = convert_node_data(object(json!({
            "config": {"keep": 1},
            "targets_form": {}
        })));
        assert_eq!(Value::Object(converted), json!({"config": {"keep": 1}}));
    }

    #[test]
    fn test_form_data_replaces_earlier_config() {
        let converted = convert_node_data(object(json!({
            "config": {"old": 1},
            "targets_form": {"form_data": {"new": 2}}
        })));
        assert_eq!(Value::Object(converted), json!({"config": {"new": 2}}));
    }

    #[test]
    fn test_renamed_keys_keep_their_position() {
        let converted = convert_node_data(object(json!({
            "node_id": "x",
            "sources": [],
            "json_schema": {},
            "targets": [],
            "targets_form": {"form_data": 3},
            "instruction_info": null
        })));
        let keys: Vec<&str> = converted.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["node_id", "outputs", "inputs", "config", "instruction_info"]
        );
    }

    #[test]
    fn test_report_counts() {
        let migration = migrate_document(json!({
            "flow": {
                "id": 3,
                "nodes": [
                    {"data": {"sources": [], "targets": [], "ui_schema": {}}},
                    {"data": {"targets_form": {"form_data": {}}, "json_schema": {}}},
                    {"id": "no-data"}
                ]
            },
            "bookmarks": []
        }))
        .unwrap();

        assert_eq!(
            migration.report,
            MigrationReport {
                wrapped: true,
                flow_id: Some("00000000-0000-0000-0000-000000000003".to_string()),
                nodes_total: 3,
                nodes_converted: 2,
                renamed_keys: 2,
                configs_from_form_data: 1,
                configs_defaulted: 1,
                dropped_keys: 2,
            }
        );
    }

    #[test]
    fn test_nodes_must_be_an_array() {
        let err = convert_flow(json!({"id": "f", "nodes": {"a": 1}})).unwrap_err();
        match err {
            MigrationError::InvalidShape { path, expected } => {
                assert_eq!(path, "nodes");
                assert_eq!(expected, "array");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_null_nodes_is_a_shape_violation() {
        assert!(matches!(
            convert_flow(json!({"nodes": null})),
            Err(MigrationError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_node_data_must_be_an_object() {
        let err = convert_document(json!({
            "flow": {"nodes": [{"data": {}}, {"data": [1, 2]}]}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid shape at 'flow.nodes[1].data': expected object"
        );
    }

    #[test]
    fn test_document_must_be_an_object() {
        assert!(matches!(
            convert_document(json!([1, 2, 3])),
            Err(MigrationError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_non_object_nodes_pass_through() {
        let converted = convert_flow(json!({"nodes": [1, "two", null]})).unwrap();
        assert_eq!(converted, json!({"nodes": [1, "two", null]}));
    }
}
