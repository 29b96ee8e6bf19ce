use serde::{Deserialize, Serialize};

/// Stable identity of a node in a dialogue graph.
///
/// Node ids are the authoring-time dialogue names, unique per graph.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a dialogue line advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueKind {
    /// One implicit continuation; the choice index is ignored.
    SingleChoice,
    /// The player picks among the node's choices by index.
    MultipleChoice,
}

/// How a conditional branch combines its conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every condition must pass (short-circuits on the first failure).
    #[default]
    All,
    /// At least one condition must pass (short-circuits on the first pass).
    Any,
}

/// Speaker attached to a dialogue line.
///
/// Portrait assets live with the presentation layer; the engine only
/// carries the reference and how it should be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default = "default_emotion")]
    pub emotion: String,
    #[serde(default = "default_show_portrait")]
    pub show_portrait: bool,
}

fn default_emotion() -> String {
    "Default".to_string()
}

fn default_show_portrait() -> bool {
    true
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emotion: default_emotion(),
            show_portrait: default_show_portrait(),
        }
    }

    /// Set the emotion variant the presentation layer should display.
    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = emotion.into();
        self
    }

    /// Hide the portrait for this line.
    pub fn without_portrait(mut self) -> Self {
        self.show_portrait = false;
        self
    }
}
