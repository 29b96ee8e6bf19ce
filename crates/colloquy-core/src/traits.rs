/// Variable store — the named values dialogue conditions read.
///
/// The store is an injected capability rather than a process-wide
/// singleton so embedders can plug in their own game state and tests can
/// supply a fake. The engine only ever reads from it; writers are
/// serialized by the caller.
pub trait VariableStore: Send + Sync + 'static {
    /// Look up a boolean variable.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Look up an integer variable.
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Look up a string variable.
    fn get_string(&self, key: &str) -> Option<String>;
}
