//! Object graph: registry of converted object nodes keyed by UID
//!
//! Nodes refer to their parent by UID only. The registry is rebuilt for
//! every top-level conversion and starts with the `ROOT` node, whose parent
//! is itself.
//!
//! Copyright (c) 2025 Jsonbyket Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::settings::Defaults;
use crate::value::merge_into;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// UID of the root node
pub const ROOT_UID: &str = "ROOT";

/// A registered object node
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier of this node
    pub uid: String,
    /// UID of the node lexically containing this one
    pub parent: String,
    /// Inherited default settings, snapshotted from the parent
    pub defaults: Defaults,
    /// Variables bound by `varSet` directives
    pub variables: Map<String, Value>,
    /// Latest known content of the node
    pub payload: Map<String, Value>,
}

/// Arena of nodes indexed by UID
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    nodes: HashMap<String, Node>,
    uid_counter: u64,
}

impl ObjectGraph {
    /// Create a graph holding only the root node
    pub fn new(root_defaults: Defaults) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_UID.to_string(),
            Node {
                uid: ROOT_UID.to_string(),
                parent: ROOT_UID.to_string(),
                defaults: root_defaults,
                variables: Map::new(),
                payload: Map::new(),
            },
        );
        Self {
            nodes,
            uid_counter: 0,
        }
    }

    /// Generate the next UID
    pub fn generate_uid(&mut self) -> String {
        self.uid_counter += 1;
        self.uid_counter.to_string()
    }

    /// Number of registered nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root is registered
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether a UID is registered
    pub fn contains(&self, uid: &str) -> bool {
        self.nodes.contains_key(uid)
    }

    /// Look up a node
    pub fn node(&self, uid: &str) -> Result<&Node> {
        self.nodes.get(uid).ok_or_else(|| Error::UnknownNode {
            uid: uid.to_string(),
        })
    }

    /// Look up a node for modification
    pub fn node_mut(&mut self, uid: &str) -> Result<&mut Node> {
        self.nodes.get_mut(uid).ok_or_else(|| Error::UnknownNode {
            uid: uid.to_string(),
        })
    }

    /// Register a node, or merge into it if the UID is already known.
    ///
    /// Returns the payload to convert: the incoming map for a new node, the
    /// merged map for a revisited one.
    pub fn register(
        &mut self,
        uid: &str,
        parent: &str,
        payload: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        if let Some(existing) = self.nodes.get_mut(uid) {
            merge_into(&mut existing.payload, payload);
            existing.parent = parent.to_string();
            return Ok(existing.payload.clone());
        }

        let defaults = self.node(parent)?.defaults.clone();
        self.nodes.insert(
            uid.to_string(),
            Node {
                uid: uid.to_string(),
                parent: parent.to_string(),
                defaults,
                variables: Map::new(),
                payload: payload.clone(),
            },
        );
        Ok(payload)
    }

    /// Re-snapshot a node's defaults from its parent
    pub fn inherit_defaults(&mut self, uid: &str) -> Result<()> {
        let parent = self.node(uid)?.parent.clone();
        if parent == uid {
            return Ok(());
        }
        let defaults = self.node(&parent)?.defaults.clone();
        self.node_mut(uid)?.defaults = defaults;
        Ok(())
    }

    /// Replace the stored payload of a node after conversion
    pub fn update_payload(&mut self, uid: &str, payload: Map<String, Value>) -> Result<()> {
        self.node_mut(uid)?.payload = payload;
        Ok(())
    }

    /// UID of the ancestor `levels` steps above `uid` (0 is `uid` itself).
    ///
    /// Walking past the root stays at the root.
    pub fn ancestor(&self, uid: &str, levels: usize) -> Result<&str> {
        let mut current = self.node(uid)?;
        for _ in 0..levels {
            current = self.node(&current.parent)?;
        }
        Ok(&current.uid)
    }

    /// UIDs from `uid` up to and including the root
    pub fn lineage(&self, uid: &str) -> Result<Vec<&str>> {
        let mut chain = Vec::new();
        let mut current = self.node(uid)?;
        loop {
            chain.push(current.uid.as_str());
            if current.parent == current.uid {
                return Ok(chain);
            }
            current = self.node(&current.parent)?;
        }
    }

    /// Bind a variable in a node's scope
    pub fn bind_variable(&mut self, uid: &str, name: &str, value: Value) -> Result<()> {
        self.node_mut(uid)?
            .variables
            .insert(name.to_string(), value);
        Ok(())
    }

    /// Find a variable starting at `uid` and walking up to the root
    pub fn lookup_variable(&self, uid: &str, name: &str) -> Result<Option<&Value>> {
        for ancestor in self.lineage(uid)? {
            if let Some(value) = self.node(ancestor)?.variables.get(name) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn chain() -> ObjectGraph {
        let mut graph = ObjectGraph::new(Defaults::default());
        graph.register("1", ROOT_UID, Map::new()).unwrap();
        graph.register("2", "1", Map::new()).unwrap();
        graph.register("3", "2", Map::new()).unwrap();
        graph
    }

    #[test]
    fn test_uids_are_monotonic() {
        let mut graph = ObjectGraph::new(Defaults::default());
        assert_eq!(graph.generate_uid(), "1");
        assert_eq!(graph.generate_uid(), "2");
    }

    #[test]
    fn test_ancestor_walk_saturates_at_root() {
        let graph = chain();
        assert_eq!(graph.ancestor("3", 0).unwrap(), "3");
        assert_eq!(graph.ancestor("3", 1).unwrap(), "2");
        assert_eq!(graph.ancestor("3", 3).unwrap(), ROOT_UID);
        assert_eq!(graph.ancestor("3", 10).unwrap(), ROOT_UID);
        assert_eq!(graph.lineage("3").unwrap(), vec!["3", "2", "1", ROOT_UID]);
    }

    #[test]
    fn test_unknown_node() {
        let graph = chain();
        assert!(matches!(graph.node("nope"), Err(Error::UnknownNode { .. })));
    }

    #[test]
    fn test_register_snapshots_parent_defaults() {
        let mut graph = ObjectGraph::new(Defaults::default());
        graph.node_mut(ROOT_UID).unwrap().defaults.set(&["r".into()], json!(true));
        graph.register("1", ROOT_UID, Map::new()).unwrap();

        graph.node_mut(ROOT_UID).unwrap().defaults.set(&["r".into()], json!(false));
        assert!(graph.node("1").unwrap().defaults.required());
    }

    #[test]
    fn test_revisit_merges() {
        let mut graph = ObjectGraph::new(Defaults::default());
        graph
            .register("7", ROOT_UID, map(json!({"a": 1, "obj": {"x": 1}, "list": [1, 2]})))
            .unwrap();
        let merged = graph
            .register("7", ROOT_UID, map(json!({"a": 2, "obj": {"y": 2}, "list": [3]})))
            .unwrap();

        assert_eq!(
            Value::Object(merged),
            json!({"a": 2, "obj": {"x": 1, "y": 2}, "list": [3]})
        );
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_variable_lookup_walks_ancestors() {
        let mut graph = chain();
        graph.bind_variable("1", "n", json!(5)).unwrap();

        assert_eq!(graph.lookup_variable("3", "n").unwrap(), Some(&json!(5)));
        assert_eq!(graph.lookup_variable(ROOT_UID, "n").unwrap(), None);
    }
}
