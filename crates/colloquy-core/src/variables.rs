use std::collections::HashMap;

use crate::traits::VariableStore;

/// In-memory variable store.
///
/// Three typed maps, one per variable kind. Keys are independent across
/// kinds: a bool `"met_kara"` and an int `"met_kara"` can coexist, which
/// matches how conditions address variables (key + declared kind).
#[derive(Debug, Clone, Default)]
pub struct MemoryVariableStore {
    bools: HashMap<String, bool>,
    ints: HashMap<String, i64>,
    strings: HashMap<String, String>,
}

impl MemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.bools.insert(key.into(), value);
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.ints.insert(key.into(), value);
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }
}

impl VariableStore for MemoryVariableStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.get(key).copied()
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }
}
