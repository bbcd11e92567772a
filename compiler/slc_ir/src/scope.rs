//! Lexical scopes and the scope arena.

use std::fmt;

use crate::arena::NodeArena;
use crate::node::NodeId;

/// Index into the scope arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ScopeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// A lexical scope: a parent link plus the definitions declared here.
///
/// Variables and functions share one namespace; insertion is append-only
/// and conflict checks run before insertion, never replacement.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub variables: Vec<NodeId>,
    pub functions: Vec<NodeId>,
}

/// Flat storage for every scope created during analysis.
#[derive(Clone, Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena::default()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(
            u32::try_from(self.scopes.len()).expect("scope arena capacity exceeded"),
        );
        self.scopes.push(Scope {
            parent,
            ..Scope::default()
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.index()].parent
    }

    /// Whether `id` is the global scope.
    pub fn is_global(&self, id: ScopeId) -> bool {
        self.parent(id).is_none()
    }

    // -- Single-scope lookups (used for conflict checks) --

    pub fn find_variable_in(
        &self,
        scope: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.scopes[scope.index()]
            .variables
            .iter()
            .copied()
            .find(|&def| nodes.get(def).name == name)
    }

    pub fn find_function_in(
        &self,
        scope: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.scopes[scope.index()]
            .functions
            .iter()
            .copied()
            .find(|&def| nodes.get(def).name == name)
    }

    /// Either kind of definition in a single scope, functions first.
    pub fn find_definition_in(
        &self,
        scope: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.find_function_in(scope, name, nodes)
            .or_else(|| self.find_variable_in(scope, name, nodes))
    }

    // -- Chain lookups (first hit wins) --

    pub fn lookup_variable(
        &self,
        from: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.walk(from, |scope| self.find_variable_in(scope, name, nodes))
    }

    pub fn lookup_function(
        &self,
        from: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.walk(from, |scope| self.find_function_in(scope, name, nodes))
    }

    pub fn lookup_definition(
        &self,
        from: ScopeId,
        name: &str,
        nodes: &NodeArena,
    ) -> Option<NodeId> {
        self.walk(from, |scope| self.find_definition_in(scope, name, nodes))
    }

    fn walk<F>(&self, from: ScopeId, mut probe: F) -> Option<NodeId>
    where
        F: FnMut(ScopeId) -> Option<NodeId>,
    {
        let mut cursor = Some(from);
        while let Some(scope) = cursor {
            if let Some(hit) = probe(scope) {
                return Some(hit);
            }
            cursor = self.parent(scope);
        }
        None
    }
}
