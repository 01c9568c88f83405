//! In-process backend holding the whole tree in a `RefCell`. No borrow is
//! ever held across an await, so the cooperative single-threaded embedding
//! cannot observe a locked store.

use std::cell::RefCell;

use serde_json::{Map, Value};

use crate::{DocumentStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RefCell<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing tree, e.g. a captured database export.
    pub fn from_value(root: Value) -> Self {
        Self {
            root: RefCell::new(root),
        }
    }

    /// Clone of the full tree, for inspecting write effects in tests.
    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty())
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for seg in segments(path) {
        node = match node {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

fn lookup_mut<'a>(root: &'a mut Value, segs: &[&str]) -> Option<&'a mut Value> {
    let mut node = root;
    for seg in segs {
        node = match node {
            Value::Object(map) => map.get_mut(*seg)?,
            Value::Array(items) => items.get_mut(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Walk to `path`, creating missing parents. Arrays are addressed by
/// position and padded with `Null` when the position is past the end; any
/// other node standing in the way is replaced by an object, the way a
/// destructive tree write behaves in the real store.
fn node_mut<'a>(root: &'a mut Value, path: &str) -> &'a mut Value {
    let mut node = root;
    for seg in segments(path) {
        let array_index = if node.is_array() {
            seg.parse::<usize>().ok()
        } else {
            None
        };
        node = match (node, array_index) {
            (Value::Array(items), Some(index)) => {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                &mut items[index]
            }
            (other, _) => {
                if !other.is_object() {
                    *other = Value::Object(Map::new());
                }
                other
                    .as_object_mut()
                    .expect("node was just made an object")
                    .entry(seg.to_string())
                    .or_insert(Value::Null)
            }
        };
    }
    node
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.root.borrow();
        Ok(match lookup(&root, path) {
            None | Some(Value::Null) => None,
            Some(subtree) => Some(subtree.clone()),
        })
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        if value.is_null() {
            return self.remove(path).await;
        }
        let mut root = self.root.borrow_mut();
        *node_mut(&mut root, path) = value;
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let mut root = self.root.borrow_mut();
        let node = node_mut(&mut root, path);
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node
            .as_object_mut()
            .expect("node was just made an object");
        for (key, value) in fields {
            if value.is_null() {
                map.remove(&key);
            } else {
                map.insert(key, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        let mut root = self.root.borrow_mut();
        let segs: Vec<&str> = segments(path).collect();
        let Some((last, parents)) = segs.split_last() else {
            *root = Value::Null;
            return Ok(());
        };
        let Some(parent) = lookup_mut(&mut root, parents) else {
            return Ok(());
        };
        match parent {
            Value::Object(map) => {
                map.remove(*last);
            }
            Value::Array(items) => {
                // array slots are nulled, not shifted, so sibling paths stay stable
                if let Some(slot) = last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                    *slot = Value::Null;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
