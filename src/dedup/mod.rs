//! Duplicate sibling removal on serialized descriptor trees
//!
//! Works on the generic tree (`serde_json::Value`) a descriptor serializes
//! to, so it applies equally to TOML and JSON text.

use serde_json::Value;
use tracing::warn;

/// Remove array items structurally equal to an earlier sibling.
///
/// Object members compare by key, so member order does not make two items
/// distinct.
///
/// Children are processed before their parent, so two items that only
/// differ by duplicates of their own collapse as well. Returns the paths of
/// the removed items (`parent/key` for members, `parent[i]` for items) in
/// removal order.
pub fn remove_duplicate_siblings(tree: &mut Value) -> Vec<String> {
    let mut removed = Vec::new();
    dedup_recursive(tree, String::new(), &mut removed);
    removed
}

fn dedup_recursive(value: &mut Value, path: String, removed: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}/{}", path, key)
                };
                dedup_recursive(child, child_path, removed);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                dedup_recursive(item, format!("{}[{}]", path, i), removed);
            }

            let mut kept: Vec<Value> = Vec::with_capacity(items.len());
            for (i, item) in items.drain(..).enumerate() {
                if kept.contains(&item) {
                    let item_path = format!("{}[{}]", path, i);
                    warn!("Removing duplicated element : {}", item_path);
                    removed.push(item_path);
                } else {
                    kept.push(item);
                }
            }
            *items = kept;
        }
        _ => {}
    }
}
