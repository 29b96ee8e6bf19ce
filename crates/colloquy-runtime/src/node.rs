use serde::{Deserialize, Serialize};
use tracing::debug;

use colloquy_core::condition::Condition;
use colloquy_core::traits::VariableStore;
use colloquy_core::types::{Author, DialogueKind, MatchPolicy, NodeId};

/// A node in a compiled dialogue graph.
///
/// A closed sum: either an executable line the player sees, or a
/// conditional branch that silently routes to one of two targets. The
/// resolver dispatches on the variant; there is no open node hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DialogueNode {
    Executable(ExecutableDialogue),
    Branch(ConditionalBranch),
}

impl DialogueNode {
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Executable(dialogue) => &dialogue.id,
            Self::Branch(branch) => &branch.id,
        }
    }

    pub fn as_executable(&self) -> Option<&ExecutableDialogue> {
        match self {
            Self::Executable(dialogue) => Some(dialogue),
            Self::Branch(_) => None,
        }
    }

    /// Whether this node can open a traversal.
    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Executable(d) if d.is_starting)
    }
}

impl From<ExecutableDialogue> for DialogueNode {
    fn from(dialogue: ExecutableDialogue) -> Self {
        Self::Executable(dialogue)
    }
}

impl From<ConditionalBranch> for DialogueNode {
    fn from(branch: ConditionalBranch) -> Self {
        Self::Branch(branch)
    }
}

/// A player-visible dialogue line with its outgoing choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutableDialogue {
    /// Unique identifier within the graph.
    pub id: NodeId,
    /// The line of text shown to the player.
    pub text: String,
    /// Single continuation or an indexed player choice.
    pub kind: DialogueKind,
    /// Outgoing choices, in authored order. A single choice with no
    /// target marks a terminal line.
    pub choices: Vec<Choice>,
    /// Speaker of this line, if any.
    #[serde(default)]
    pub author: Option<Author>,
    /// Whether a traversal may start at this node.
    #[serde(default)]
    pub is_starting: bool,
}

impl ExecutableDialogue {
    /// Create a single-choice line. Without an explicit choice it is a
    /// terminal line (one choice, no target).
    pub fn single(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: DialogueKind::SingleChoice,
            choices: vec![Choice::end("Next")],
            author: None,
            is_starting: false,
        }
    }

    /// Create a multiple-choice line with no choices yet.
    pub fn multiple(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: DialogueKind::MultipleChoice,
            choices: vec![],
            author: None,
            is_starting: false,
        }
    }

    /// Point the single continuation at `next`.
    pub fn to(mut self, next: impl Into<NodeId>) -> Self {
        self.choices = vec![Choice::to("Next", next)];
        self
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the speaker.
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Mark as a valid traversal start.
    pub fn starting(mut self) -> Self {
        self.is_starting = true;
        self
    }

    /// A terminal line: exactly one choice with no target.
    pub fn is_terminal(&self) -> bool {
        self.choices.len() == 1 && self.choices[0].next.is_none()
    }
}

/// One outgoing option of an executable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown on the choice button.
    pub text: String,
    /// Target node (executable or conditional). `None` ends the dialogue.
    #[serde(default)]
    pub next: Option<NodeId>,
}

impl Choice {
    /// A choice leading to another node.
    pub fn to(text: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Self {
            text: text.into(),
            next: Some(next.into()),
        }
    }

    /// A choice that ends the dialogue.
    pub fn end(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next: None,
        }
    }
}

/// An invisible routing node.
///
/// Evaluates its conditions under the match policy and redirects to
/// `on_true` or `on_false`. Branches never reach the player and are never
/// recorded in traversal history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalBranch {
    pub id: NodeId,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub to_be_met: MatchPolicy,
    #[serde(default)]
    pub on_true: Option<NodeId>,
    #[serde(default)]
    pub on_false: Option<NodeId>,
}

impl ConditionalBranch {
    /// A branch requiring all conditions (the authoring default).
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            conditions: vec![],
            to_be_met: MatchPolicy::All,
            on_true: None,
            on_false: None,
        }
    }

    /// A branch requiring any one condition.
    pub fn any(id: impl Into<NodeId>) -> Self {
        Self {
            to_be_met: MatchPolicy::Any,
            ..Self::new(id)
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn on_true(mut self, next: impl Into<NodeId>) -> Self {
        self.on_true = Some(next.into());
        self
    }

    pub fn on_false(mut self, next: impl Into<NodeId>) -> Self {
        self.on_false = Some(next.into());
        self
    }

    /// Evaluate the conditions under the match policy.
    ///
    /// `All` short-circuits on the first failing condition, `Any` on the
    /// first passing one.
    pub fn conditions_met(&self, vars: &dyn VariableStore) -> bool {
        match self.to_be_met {
            MatchPolicy::All => {
                for condition in &self.conditions {
                    if !condition.evaluate(vars) {
                        return false;
                    }
                }
                true
            }
            MatchPolicy::Any => {
                for condition in &self.conditions {
                    if condition.evaluate(vars) {
                        return true;
                    }
                    debug!(branch_id = %self.id, key = %condition.key(), "Condition not met");
                }
                false
            }
        }
    }

    /// The branch to follow for a given evaluation result.
    pub fn target(&self, passed: bool) -> Option<&NodeId> {
        if passed {
            self.on_true.as_ref()
        } else {
            self.on_false.as_ref()
        }
    }
}
