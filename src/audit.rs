//! Field-level change detection for append-only history records.
//!
//! Aggregates are compared through their `serde_json` representation so each
//! changed top-level field yields exactly one [`FieldChange`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Bookkeeping fields that change on every write and are never audited.
const IGNORED_FIELDS: [&str; 3] = ["updated_at", "version", "created_at"];

/// A single changed field between two snapshots of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Serialized field name.
    pub field: String,
    /// Value before the change, `None` when the record is being created.
    pub old_value: Option<Value>,
    /// Value after the change, `None` when the record is being deleted.
    pub new_value: Option<Value>,
}

/// Computes the changed fields between two optional snapshots.
///
/// `before = None` describes a creation and `after = None` a deletion. Null
/// fields are omitted on creation and deletion.
///
/// # Errors
///
/// Returns the serialization error when either snapshot cannot be
/// represented as JSON.
pub fn diff_fields<T: Serialize>(
    before: Option<&T>,
    after: Option<&T>,
) -> Result<Vec<FieldChange>, serde_json::Error> {
    let old_map = snapshot(before)?;
    let new_map = snapshot(after)?;

    let mut fields: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
    fields.sort();
    fields.dedup();

    let changes = fields
        .into_iter()
        .filter(|field| !IGNORED_FIELDS.contains(&field.as_str()))
        .filter_map(|field| {
            let old_value = old_map.get(field).filter(|value| !value.is_null());
            let new_value = new_map.get(field).filter(|value| !value.is_null());
            (old_value != new_value).then(|| FieldChange {
                field: field.clone(),
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
            })
        })
        .collect();
    Ok(changes)
}

fn snapshot<T: Serialize>(value: Option<&T>) -> Result<Map<String, Value>, serde_json::Error> {
    let Some(inner) = value else {
        return Ok(Map::new());
    };
    match serde_json::to_value(inner)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert("value".to_owned(), other);
            Ok(map)
        }
    }
}
