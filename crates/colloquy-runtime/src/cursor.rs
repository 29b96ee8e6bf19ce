use std::sync::Arc;

use tracing::{error, warn};

use colloquy_core::config::EngineConfig;
use colloquy_core::traits::VariableStore;
use colloquy_core::types::{DialogueKind, NodeId};

use crate::graph::DialogueGraph;
use crate::node::ExecutableDialogue;
use crate::resolver::BranchResolver;

/// Per-player traversal state over a shared dialogue graph.
///
/// The cursor tracks the current executable node, a first-call flag, and
/// a linear history with a separate back-pointer. Conditional branch
/// nodes are resolved away before the cursor ever sees a position, so
/// history only ever contains player-visible nodes.
///
/// Every malformed-graph path degrades to an absent current node with a
/// diagnostic; no operation panics or corrupts history.
pub struct DialogueCursor {
    graph: Arc<DialogueGraph>,
    variables: Arc<dyn VariableStore>,
    config: EngineConfig,
    /// Overrides the graph's designated start when set.
    start: Option<NodeId>,

    current: Option<NodeId>,
    first_call: bool,
    history: Vec<NodeId>,
    /// Number of history entries behind the cursor; 0 means nothing to
    /// go back to.
    pointer: usize,
}

impl std::fmt::Debug for DialogueCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueCursor")
            .field("current", &self.current)
            .field("first_call", &self.first_call)
            .field("history", &self.history)
            .field("pointer", &self.pointer)
            .finish()
    }
}

impl DialogueCursor {
    /// Create a cursor at the graph's designated starting node.
    pub fn new(graph: Arc<DialogueGraph>, variables: Arc<dyn VariableStore>) -> Self {
        Self::with_config(graph, variables, EngineConfig::default())
    }

    pub fn with_config(
        graph: Arc<DialogueGraph>,
        variables: Arc<dyn VariableStore>,
        config: EngineConfig,
    ) -> Self {
        let mut cursor = Self {
            graph,
            variables,
            config,
            start: None,
            current: None,
            first_call: true,
            history: Vec::new(),
            pointer: 0,
        };
        cursor.reset_to_first();
        cursor
    }

    /// Start from a specific node instead of the graph's designated one.
    pub fn with_start(mut self, start: impl Into<NodeId>) -> Self {
        self.start = Some(start.into());
        self.reset_to_first();
        self
    }

    /// Rewind to the starting node, clearing history.
    ///
    /// Guarantees the next [`next`](Self::next) call returns the first
    /// dialogue. The starting reference is resolved through the branch
    /// resolver, so a conditional start is fine.
    pub fn reset_to_first(&mut self) {
        self.first_call = true;
        self.history.clear();
        self.pointer = 0;

        let start = self
            .start
            .clone()
            .unwrap_or_else(|| self.graph.start().clone());
        self.current = self.resolve_to_id(Some(&start));

        if self.current.is_none() {
            warn!(start = %start, "Starting reference did not resolve to an executable node");
        }
    }

    /// Whether the cursor has a current node at all.
    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the first [`next`](Self::next) call is still pending.
    pub fn is_start(&self) -> bool {
        self.first_call
    }

    /// Whether the dialogue has nothing further to show.
    ///
    /// True once the first call has been consumed and the current node is
    /// a terminal line (or absent entirely).
    pub fn is_end(&self) -> bool {
        if self.first_call {
            return false;
        }
        match self.current() {
            Some(dialogue) => dialogue.is_terminal(),
            None => true,
        }
    }

    /// End check for a specific choice of a multiple-choice node.
    ///
    /// Inspects the chosen choice's target directly; an out-of-range
    /// index reads as "not the end" so the move path can report it as a
    /// usage error instead. Non-multiple-choice nodes defer to
    /// [`is_end`](Self::is_end).
    pub fn is_end_for_choice(&self, choice: usize) -> bool {
        match self.current() {
            Some(d) if d.kind == DialogueKind::MultipleChoice => {
                d.choices.get(choice).is_some_and(|c| c.next.is_none())
            }
            _ => self.is_end(),
        }
    }

    /// Whether the current node offers the player an actual choice.
    pub fn has_choices(&self) -> bool {
        self.current().is_some_and(|d| d.choices.len() > 1)
    }

    /// The ordered choice texts of the current node.
    pub fn current_choices(&self) -> Option<Vec<&str>> {
        if !self.has_choices() {
            warn!("Tried to get the choices but there are no choices available");
            return None;
        }

        self.current()
            .map(|d| d.choices.iter().map(|c| c.text.as_str()).collect())
    }

    /// The current node, without advancing.
    pub fn current(&self) -> Option<&ExecutableDialogue> {
        self.current
            .as_ref()
            .and_then(|id| self.graph.executable(id))
    }

    /// Advance along the single continuation and return the new node.
    ///
    /// The very first call returns the starting node without moving, so
    /// the first line is never skipped. Returns `None` once the end is
    /// reached.
    pub fn next(&mut self) -> Option<&ExecutableDialogue> {
        self.next_with(0)
    }

    /// Advance along the given choice index and return the new node.
    ///
    /// The index is ignored on single-choice nodes. On a multiple-choice
    /// node an out-of-range index is reported and the cursor stays put.
    pub fn next_with(&mut self, choice: usize) -> Option<&ExecutableDialogue> {
        if self.first_call {
            // First call surfaces the pre-resolved starting node,
            // otherwise it would be skipped.
            self.first_call = false;
            return self.current();
        }

        if self.is_end_for_choice(choice) {
            return None;
        }

        self.move_next(choice);
        self.current()
    }

    /// Step back one entry in the history and return that node.
    ///
    /// Repeatable without limit; returns `None` once the history is
    /// exhausted.
    pub fn back(&mut self) -> Option<&ExecutableDialogue> {
        if self.pointer == 0 {
            return None;
        }

        self.move_back();
        self.current()
    }

    /// Move to the chosen choice's target without returning it.
    ///
    /// The current node is pushed onto the history before moving; the
    /// new position is the branch-resolved target, which may be absent.
    pub fn move_next(&mut self, choice: usize) {
        let Some(dialogue) = self.current() else {
            warn!("Tried to advance but there is no current dialogue");
            return;
        };

        if dialogue.choices.is_empty() {
            error!(node_id = %dialogue.id, "Dialogue node has no choices");
            return;
        }

        let is_multi = dialogue.kind == DialogueKind::MultipleChoice;
        if is_multi && choice >= dialogue.choices.len() {
            error!(
                choice,
                available = dialogue.choices.len(),
                node_id = %dialogue.id,
                "Choice index out of range"
            );
            return;
        }

        let current_id = dialogue.id.clone();
        let target = dialogue.choices[if is_multi { choice } else { 0 }].next.clone();

        if self.is_end_for_choice(choice) {
            warn!(node_id = %current_id, "Tried to advance but the end was already reached");
            return;
        }

        self.history.push(current_id);
        self.pointer += 1;
        self.current = self.resolve_to_id(target.as_ref());
    }

    /// Move back one history entry without returning it.
    pub fn move_back(&mut self) {
        if self.pointer == 0 {
            warn!("There are no dialogues in the history to move back to");
            return;
        }

        self.pointer -= 1;
        self.current = Some(self.history[self.pointer].clone());
    }

    /// The nodes the cursor can still step back through, oldest first.
    pub fn history(&self) -> &[NodeId] {
        &self.history[..self.pointer]
    }

    pub fn history_len(&self) -> usize {
        self.pointer
    }

    /// Resolve a reference and keep only the resulting node id.
    ///
    /// Resolution errors (dangling reference, conditional cycle, depth
    /// cap) are reported here, once, and collapse to an absent position.
    fn resolve_to_id(&self, reference: Option<&NodeId>) -> Option<NodeId> {
        let resolver = BranchResolver::new(
            &self.graph,
            self.variables.as_ref(),
            self.config.max_resolve_depth,
        );

        match resolver.resolve(reference) {
            Ok(resolved) => resolved.map(|d| d.id.clone()),
            Err(e) => {
                error!(error = %e, "Branch resolution failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_core::condition::Condition;
    use colloquy_core::variables::MemoryVariableStore;

    use crate::node::{Choice, ConditionalBranch, ExecutableDialogue};

    fn cursor_over(nodes: Vec<crate::node::DialogueNode>, start: &str) -> DialogueCursor {
        cursor_with_vars(nodes, start, MemoryVariableStore::new())
    }

    fn cursor_with_vars(
        nodes: Vec<crate::node::DialogueNode>,
        start: &str,
        vars: MemoryVariableStore,
    ) -> DialogueCursor {
        DialogueCursor::new(Arc::new(DialogueGraph::new(nodes, start)), Arc::new(vars))
    }

    fn linear_nodes() -> Vec<crate::node::DialogueNode> {
        vec![
            ExecutableDialogue::single("Intro", "Hello.").to("Middle").starting().into(),
            ExecutableDialogue::single("Middle", "Still here?").to("End").into(),
            ExecutableDialogue::single("End", "Goodbye.").into(),
        ]
    }

    #[test]
    fn test_first_call_does_not_advance() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");

        assert!(cursor.is_start());
        let first = cursor.next().expect("first node").id.clone();
        assert_eq!(first.as_str(), "Intro");
        assert!(!cursor.is_start());
        assert_eq!(cursor.current().expect("current").id, first);
        assert_eq!(cursor.history_len(), 0);
    }

    #[test]
    fn test_walk_to_end() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");

        assert_eq!(cursor.next().expect("intro").id.as_str(), "Intro");
        assert_eq!(cursor.next().expect("middle").id.as_str(), "Middle");
        assert_eq!(cursor.next().expect("end").id.as_str(), "End");
        assert!(cursor.is_end());
        assert!(cursor.next().is_none());
        // Still parked on the terminal node.
        assert_eq!(cursor.current().expect("current").id.as_str(), "End");
    }

    #[test]
    fn test_end_is_not_reported_before_first_call() {
        let nodes = vec![ExecutableDialogue::single("Only", "One line.").into()];
        let mut cursor = cursor_over(nodes, "Only");

        assert!(!cursor.is_end());
        cursor.next();
        assert!(cursor.is_end());
    }

    #[test]
    fn test_back_walks_history_and_exhausts() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");
        cursor.next();
        cursor.next();
        cursor.next();

        assert_eq!(cursor.back().expect("middle").id.as_str(), "Middle");
        assert_eq!(cursor.back().expect("intro").id.as_str(), "Intro");
        assert!(cursor.back().is_none());
        assert_eq!(cursor.current().expect("current").id.as_str(), "Intro");
    }

    #[test]
    fn test_forward_after_back_appends() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");
        cursor.next();
        cursor.next();
        cursor.back();

        // Forward again from "Intro": the history grows, no truncation.
        assert_eq!(cursor.next().expect("middle").id.as_str(), "Middle");
        assert_eq!(cursor.history_len(), 1);
    }

    #[test]
    fn test_multiple_choice_out_of_range_is_noop() {
        let nodes = vec![
            ExecutableDialogue::multiple("Fork", "Which way?")
                .with_choice(Choice::to("Left", "A"))
                .with_choice(Choice::to("Right", "B"))
                .into(),
            ExecutableDialogue::single("A", "Left it is.").into(),
            ExecutableDialogue::single("B", "Right it is.").into(),
        ];
        let mut cursor = cursor_over(nodes, "Fork");
        cursor.next();

        cursor.move_next(5);
        assert_eq!(cursor.current().expect("current").id.as_str(), "Fork");
        assert_eq!(cursor.history_len(), 0);

        // And through the next_with path as well.
        let unchanged = cursor.next_with(5).expect("unchanged current");
        assert_eq!(unchanged.id.as_str(), "Fork");
    }

    #[test]
    fn test_choice_index_ignored_on_single_choice() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");
        cursor.next();

        assert_eq!(cursor.next_with(7).expect("middle").id.as_str(), "Middle");
    }

    #[test]
    fn test_multiple_choice_end_per_choice() {
        let nodes = vec![
            ExecutableDialogue::multiple("Fork", "Which way?")
                .with_choice(Choice::to("Deeper", "A"))
                .with_choice(Choice::end("Leave"))
                .into(),
            ExecutableDialogue::single("A", "Onward.").into(),
        ];
        let mut cursor = cursor_over(nodes, "Fork");
        cursor.next();

        assert!(!cursor.is_end_for_choice(0));
        assert!(cursor.is_end_for_choice(1));
        assert!(cursor.next_with(1).is_none());
        assert_eq!(cursor.current().expect("current").id.as_str(), "Fork");
    }

    #[test]
    fn test_choices_listing() {
        let nodes = vec![
            ExecutableDialogue::multiple("Fork", "Which way?")
                .with_choice(Choice::to("Left", "A"))
                .with_choice(Choice::to("Right", "B"))
                .into(),
            ExecutableDialogue::single("A", "Left.").into(),
            ExecutableDialogue::single("B", "Right.").into(),
        ];
        let mut cursor = cursor_over(nodes, "Fork");
        cursor.next();

        assert!(cursor.has_choices());
        assert_eq!(cursor.current_choices().expect("choices"), vec!["Left", "Right"]);
    }

    #[test]
    fn test_choices_listing_on_single_choice_is_none() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");
        cursor.next();

        assert!(!cursor.has_choices());
        assert!(cursor.current_choices().is_none());
    }

    #[test]
    fn test_conditional_start_resolves_before_first_call() {
        let mut vars = MemoryVariableStore::new();
        vars.set_bool("returning", true);

        let nodes = vec![
            ConditionalBranch::new("Gate")
                .with_condition(Condition::bool_is("returning", true))
                .on_true("WelcomeBack")
                .on_false("FirstMeeting")
                .into(),
            ExecutableDialogue::single("WelcomeBack", "Back again?").into(),
            ExecutableDialogue::single("FirstMeeting", "A new face.").into(),
        ];
        let mut cursor = cursor_with_vars(nodes, "Gate", vars);

        assert!(cursor.is_initialized());
        assert_eq!(cursor.next().expect("node").id.as_str(), "WelcomeBack");
    }

    #[test]
    fn test_missing_start_degrades() {
        let mut cursor = cursor_over(vec![], "Missing");

        assert!(!cursor.is_initialized());
        assert!(cursor.next().is_none());
        assert!(cursor.is_end());
        assert!(cursor.back().is_none());
    }

    #[test]
    fn test_dangling_choice_target_degrades() {
        let nodes =
            vec![ExecutableDialogue::single("Intro", "Hello.").to("Deleted").into()];
        let mut cursor = cursor_over(nodes, "Intro");
        cursor.next();

        // The target does not exist: reported, then treated as absent.
        assert!(cursor.next().is_none());
        assert!(cursor.is_end());
        // The failed hop still advanced the history once.
        assert_eq!(cursor.history_len(), 1);
        assert_eq!(cursor.back().expect("intro").id.as_str(), "Intro");
    }

    #[test]
    fn test_start_override() {
        let cursor_default = cursor_over(linear_nodes(), "Intro");
        assert_eq!(cursor_default.current().expect("node").id.as_str(), "Intro");

        let graph = Arc::new(DialogueGraph::new(linear_nodes(), "Intro"));
        let vars: Arc<dyn VariableStore> = Arc::new(MemoryVariableStore::new());
        let cursor = DialogueCursor::new(graph, vars).with_start("Middle");
        assert_eq!(cursor.current().expect("node").id.as_str(), "Middle");
    }

    #[test]
    fn test_reset_after_walk() {
        let mut cursor = cursor_over(linear_nodes(), "Intro");
        cursor.next();
        cursor.next();
        assert_eq!(cursor.history_len(), 1);

        cursor.reset_to_first();
        assert!(cursor.is_start());
        assert_eq!(cursor.history_len(), 0);
        assert_eq!(cursor.next().expect("intro").id.as_str(), "Intro");
    }
}
