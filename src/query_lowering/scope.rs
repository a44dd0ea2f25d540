//! Lexical scopes of the lowering pass.
//!
//! Every query, including each nested query inside a lambda, is lowered in its own
//! scope. Lambda parameters are bound in the scope of the query whose rows they range
//! over. Looking a parameter up from a nested scope walks the parent chain, and each
//! step up becomes one `$parent` hop in the generated path:
//!
//! ```text
//! order (o1)                      o1.Address.id  →  $parent.$parent.Address.id
//! └─ order (o2)                   o2.id          →  $parent.id
//!    └─ address (a)               a.id           →  id
//! ```

use std::collections::HashMap;

use super::lowered::Lowered;

#[derive(Debug, Default)]
pub struct LoweringScope {
    table: Option<String>,
    bindings: HashMap<String, Lowered>,
    parent: Option<Box<LoweringScope>>,
}

impl LoweringScope {
    /// The outermost scope, above every query.
    pub fn root() -> Self {
        Self::default()
    }

    fn child(table: impl Into<String>, parent: LoweringScope) -> Self {
        Self {
            table: Some(table.into()),
            bindings: HashMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Replace `self` with a fresh child scope whose parent is the old `self`.
    pub fn enter(&mut self, table: impl Into<String>) {
        let parent = std::mem::take(self);
        *self = Self::child(table, parent);
    }

    /// Drop the current scope and return to its parent. Leaving the root is a no-op.
    pub fn exit(&mut self) {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.depth() + 1,
            None => 0,
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Lowered) {
        self.bindings.insert(name.into(), value);
    }

    /// Look a parameter up along the scope chain, returning the binding and the number
    /// of scopes between here and the one that bound it.
    pub fn resolve(&self, name: &str) -> Option<(&Lowered, usize)> {
        // Try current scope first
        if let Some(value) = self.bindings.get(name) {
            return Some((value, 0));
        }

        // Search parent scope recursively (scope chain)
        self.parent
            .as_ref()
            .and_then(|parent| parent.resolve(name))
            .map(|(value, hops)| (value, hops + 1))
    }
}
