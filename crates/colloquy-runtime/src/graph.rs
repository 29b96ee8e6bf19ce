use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use colloquy_core::types::NodeId;

use crate::node::{DialogueNode, ExecutableDialogue};

/// A compiled, immutable dialogue graph.
///
/// Owns every node by id plus the designated starting reference. Built
/// once by whatever loads authored content, then shared read-only among
/// cursors (typically behind an `Arc`). Nothing here mutates after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueGraph {
    nodes: HashMap<NodeId, DialogueNode>,
    start: NodeId,
    /// Optional authoring groups, for listing dialogues by section.
    #[serde(default)]
    groups: BTreeMap<String, Vec<NodeId>>,
}

impl DialogueGraph {
    /// Build a graph from its nodes.
    ///
    /// `start` is the reference a cursor resolves first; it may point at
    /// an executable or a conditional node.
    pub fn new(nodes: Vec<DialogueNode>, start: impl Into<NodeId>) -> Self {
        let nodes = nodes.into_iter().map(|n| (n.id().clone(), n)).collect();
        Self {
            nodes,
            start: start.into(),
            groups: BTreeMap::new(),
        }
    }

    /// Record a named group of node ids.
    pub fn with_group(mut self, name: impl Into<String>, members: Vec<NodeId>) -> Self {
        self.groups.insert(name.into(), members);
        self
    }

    pub fn start(&self) -> &NodeId {
        &self.start
    }

    pub fn get(&self, id: &NodeId) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Look up a node expected to be executable.
    pub fn executable(&self, id: &NodeId) -> Option<&ExecutableDialogue> {
        self.nodes.get(id).and_then(DialogueNode::as_executable)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node names, sorted, optionally restricted to starting nodes.
    pub fn dialogue_names(&self, starting_only: bool) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| !starting_only || n.is_starting())
            .map(|n| n.id().as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// The group names, sorted.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Node names inside a group, sorted, optionally starting-only.
    pub fn names_in_group(&self, group: &str, starting_only: bool) -> Vec<&str> {
        let Some(members) = self.groups.get(group) else {
            warn!(group = %group, "Unknown dialogue group");
            return vec![];
        };

        let mut names: Vec<&str> = members
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|n| !starting_only || n.is_starting())
            .map(|n| n.id().as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Node names that belong to no group, sorted, optionally starting-only.
    pub fn ungrouped_names(&self, starting_only: bool) -> Vec<&str> {
        let grouped: HashSet<&NodeId> = self.groups.values().flatten().collect();

        let mut names: Vec<&str> = self
            .nodes
            .values()
            .filter(|n| !grouped.contains(n.id()))
            .filter(|n| !starting_only || n.is_starting())
            .map(|n| n.id().as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
