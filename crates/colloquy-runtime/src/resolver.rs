use tracing::debug;

use colloquy_core::error::{DialogueError, Result};
use colloquy_core::traits::VariableStore;
use colloquy_core::types::NodeId;

use crate::graph::DialogueGraph;
use crate::node::{DialogueNode, ExecutableDialogue};

/// Resolves a node reference down to an executable node.
///
/// Conditional branch nodes are transparent to the player: the resolver
/// walks through any chain of them, evaluating each against the variable
/// store, until it lands on an executable node or on an absent reference
/// (the end of the dialogue). The walk is iterative, so chain length
/// costs no stack, and guarded: a revisited branch is a cycle, and
/// `max_depth` bounds degenerate chains. Both are authoring errors
/// reported to the caller, never a crash.
pub struct BranchResolver<'a> {
    graph: &'a DialogueGraph,
    variables: &'a dyn VariableStore,
    max_depth: usize,
}

impl<'a> BranchResolver<'a> {
    pub fn new(
        graph: &'a DialogueGraph,
        variables: &'a dyn VariableStore,
        max_depth: usize,
    ) -> Self {
        Self {
            graph,
            variables,
            max_depth,
        }
    }

    /// Follow `reference` through any conditional nodes.
    ///
    /// `Ok(None)` is the normal end-of-dialogue signal for an absent
    /// reference or an unwired branch output. `Err` means the graph is
    /// malformed: a reference to a node that does not exist, a cycle
    /// among conditional nodes, or a chain longer than `max_depth`.
    pub fn resolve(&self, reference: Option<&NodeId>) -> Result<Option<&'a ExecutableDialogue>> {
        let Some(mut current) = reference else {
            return Ok(None);
        };

        let mut visited: Vec<&NodeId> = Vec::new();

        loop {
            let node = self
                .graph
                .get(current)
                .ok_or_else(|| DialogueError::UnknownNode(current.to_string()))?;

            let branch = match node {
                DialogueNode::Executable(dialogue) => return Ok(Some(dialogue)),
                DialogueNode::Branch(branch) => branch,
            };

            if visited.contains(&current) {
                return Err(DialogueError::ConditionalCycle(current.to_string()));
            }
            if visited.len() >= self.max_depth {
                return Err(DialogueError::ResolveDepthExceeded {
                    node_id: current.to_string(),
                    depth: self.max_depth,
                });
            }
            visited.push(current);

            let passed = branch.conditions_met(self.variables);
            debug!(branch_id = %branch.id, passed, "Evaluated conditional branch");

            match branch.target(passed) {
                Some(next) => current = next,
                None => {
                    debug!(branch_id = %branch.id, passed, "Branch output unwired, ending dialogue");
                    return Ok(None);
                }
            }
        }
    }
}
