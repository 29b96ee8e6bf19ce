use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traits::VariableStore;

/// A single comparison between a named variable and a literal value.
///
/// Conditions are authored on conditional branch nodes and evaluated
/// against the injected [`VariableStore`]. Evaluation fails closed: a key
/// that is missing from the store makes the condition `false` and emits a
/// diagnostic, it never becomes an error the caller has to handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Bool {
        key: String,
        op: BoolComparison,
        value: bool,
    },
    Int {
        key: String,
        op: IntComparison,
        value: i64,
    },
    String {
        key: String,
        op: StringComparison,
        value: String,
    },
}

/// Boolean operators applied between the stored value and the literal.
///
/// `And`/`Or`/`Xor` are boolean combinations, not threshold checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolComparison {
    Is,
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntComparison {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringComparison {
    Equal,
    NotEqual,
    Contains,
    StartsWith,
    EndsWith,
}

impl Condition {
    /// Shorthand for the common "is this flag set to X" check.
    pub fn bool_is(key: impl Into<String>, value: bool) -> Self {
        Self::Bool {
            key: key.into(),
            op: BoolComparison::Is,
            value,
        }
    }

    pub fn int(key: impl Into<String>, op: IntComparison, value: i64) -> Self {
        Self::Int {
            key: key.into(),
            op,
            value,
        }
    }

    pub fn string(key: impl Into<String>, op: StringComparison, value: impl Into<String>) -> Self {
        Self::String {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    /// The variable key this condition reads.
    pub fn key(&self) -> &str {
        match self {
            Self::Bool { key, .. } | Self::Int { key, .. } | Self::String { key, .. } => key,
        }
    }

    /// Evaluate against the store. Missing keys fail closed.
    pub fn evaluate(&self, vars: &dyn VariableStore) -> bool {
        match self {
            Self::Bool { key, op, value } => match vars.get_bool(key) {
                Some(stored) => match op {
                    BoolComparison::Is => stored == *value,
                    BoolComparison::And => stored && *value,
                    BoolComparison::Or => stored || *value,
                    BoolComparison::Xor => stored ^ *value,
                },
                None => {
                    warn!(kind = "bool", key = %key, "Condition variable not found");
                    false
                }
            },
            Self::Int { key, op, value } => match vars.get_int(key) {
                Some(stored) => match op {
                    IntComparison::Equal => stored == *value,
                    IntComparison::NotEqual => stored != *value,
                    IntComparison::Greater => stored > *value,
                    IntComparison::GreaterOrEqual => stored >= *value,
                    IntComparison::Less => stored < *value,
                    IntComparison::LessOrEqual => stored <= *value,
                },
                None => {
                    warn!(kind = "int", key = %key, "Condition variable not found");
                    false
                }
            },
            Self::String { key, op, value } => match vars.get_string(key) {
                Some(stored) => match op {
                    StringComparison::Equal => stored == *value,
                    StringComparison::NotEqual => stored != *value,
                    StringComparison::Contains => stored.contains(value.as_str()),
                    StringComparison::StartsWith => stored.starts_with(value.as_str()),
                    StringComparison::EndsWith => stored.ends_with(value.as_str()),
                },
                None => {
                    warn!(kind = "string", key = %key, "Condition variable not found");
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::MemoryVariableStore;

    fn store() -> MemoryVariableStore {
        let mut vars = MemoryVariableStore::new();
        vars.set_bool("met_kara", true);
        vars.set_bool("betrayed", false);
        vars.set_int("gold", 40);
        vars.set_string("faction", "Iron Outlaws");
        vars
    }

    #[test]
    fn test_bool_is() {
        let vars = store();
        assert!(Condition::bool_is("met_kara", true).evaluate(&vars));
        assert!(!Condition::bool_is("met_kara", false).evaluate(&vars));
        assert!(Condition::bool_is("betrayed", false).evaluate(&vars));
    }

    #[test]
    fn test_bool_operators() {
        let vars = store();
        let cond = |op, value| Condition::Bool {
            key: "met_kara".into(),
            op,
            value,
        };

        // Stored value is true.
        assert!(!cond(BoolComparison::And, false).evaluate(&vars));
        assert!(cond(BoolComparison::And, true).evaluate(&vars));
        assert!(cond(BoolComparison::Or, false).evaluate(&vars));
        assert!(cond(BoolComparison::Xor, false).evaluate(&vars));
        assert!(!cond(BoolComparison::Xor, true).evaluate(&vars));
    }

    #[test]
    fn test_int_comparisons() {
        let vars = store();
        let gold = |op, value| Condition::int("gold", op, value);

        assert!(gold(IntComparison::Equal, 40).evaluate(&vars));
        assert!(gold(IntComparison::NotEqual, 41).evaluate(&vars));
        assert!(gold(IntComparison::Greater, 39).evaluate(&vars));
        assert!(!gold(IntComparison::Greater, 40).evaluate(&vars));
        assert!(gold(IntComparison::GreaterOrEqual, 40).evaluate(&vars));
        assert!(gold(IntComparison::Less, 41).evaluate(&vars));
        assert!(gold(IntComparison::LessOrEqual, 40).evaluate(&vars));
        assert!(!gold(IntComparison::LessOrEqual, 39).evaluate(&vars));
    }

    #[test]
    fn test_string_comparisons() {
        let vars = store();
        let faction = |op, value: &str| Condition::string("faction", op, value);

        assert!(faction(StringComparison::Equal, "Iron Outlaws").evaluate(&vars));
        assert!(faction(StringComparison::NotEqual, "Wardens").evaluate(&vars));
        assert!(faction(StringComparison::Contains, "Out").evaluate(&vars));
        assert!(faction(StringComparison::StartsWith, "Iron").evaluate(&vars));
        assert!(faction(StringComparison::EndsWith, "Outlaws").evaluate(&vars));
        assert!(!faction(StringComparison::StartsWith, "Outlaws").evaluate(&vars));
    }

    #[test]
    fn test_missing_key_fails_closed() {
        let vars = store();
        assert!(!Condition::bool_is("missing", true).evaluate(&vars));
        assert!(!Condition::int("missing", IntComparison::Equal, 0).evaluate(&vars));
        assert!(!Condition::string("missing", StringComparison::Equal, "").evaluate(&vars));
    }

    #[test]
    fn test_wrong_kind_fails_closed() {
        // "gold" exists as an int; reading it as a bool is a missing key.
        let vars = store();
        assert!(!Condition::bool_is("gold", true).evaluate(&vars));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cond = Condition::int("gold", IntComparison::GreaterOrEqual, 10);
        let json = serde_json::to_string(&cond).unwrap();
        let parsed: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cond);
        assert_eq!(parsed.key(), "gold");
    }
}
