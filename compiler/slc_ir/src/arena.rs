//! Contiguous storage for the AST.

use slc_types::TypeInfo;

use crate::location::LocationInfo;
use crate::node::{LiteralValue, Node, NodeId, NodeKind, VisitState};
use crate::scope::ScopeId;

/// Flat storage for every node in a compilation unit.
///
/// The root is allocated at construction and is always index zero. All
/// structural mutation goes through the arena so parent links stay
/// consistent with child lists.
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// The root node's index.
    pub const ROOT: NodeId = NodeId::new(0);

    pub fn new() -> Self {
        NodeArena {
            nodes: vec![Node::new(NodeKind::Root, "Root".to_string())],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node. Attach it with [`NodeArena::add_child`].
    pub fn alloc(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let id = NodeId::new(
            u32::try_from(self.nodes.len()).expect("node arena capacity exceeded"),
        );
        self.nodes.push(Node::new(kind, name.into()));
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Iterate every node id in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    // -- Structure --

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.insert(0, child);
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Whether `ancestor` is `id` itself or a proper ancestor of it.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            if n == ancestor {
                return true;
            }
            cursor = self.parent(n);
        }
        false
    }

    /// Climb the parent chain from `id`'s parent to the first node with a
    /// scope assigned.
    ///
    /// During analysis a node's own scope slot may still be unset, so this
    /// walks parents, never the scope chain.
    pub fn nearest_scope(&self, id: NodeId) -> Option<ScopeId> {
        let mut cursor = self.parent(id);
        while let Some(n) = cursor {
            if let Some(scope) = self.nodes[n.index()].scope {
                return Some(scope);
            }
            cursor = self.parent(n);
        }
        None
    }

    /// Dotted path from the root to this node, built from non-empty
    /// ancestor names. Used to name global string constants.
    pub fn fqn(&self, id: NodeId, delim: &str) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            let node = self.get(n);
            if !node.is_root() && !node.name.is_empty() {
                parts.push(node.name.clone());
            }
            cursor = node.parent;
        }
        parts.reverse();
        parts.join(delim)
    }

    // -- Annotations --

    pub fn set_location(&mut self, id: NodeId, line: u32, column: u32, text: &str) {
        self.nodes[id.index()].location = Some(LocationInfo::new(line, column, text));
    }

    pub fn location(&self, id: NodeId) -> Option<&LocationInfo> {
        self.nodes[id.index()].location.as_ref()
    }

    pub fn set_type(&mut self, id: NodeId, ty: TypeInfo) {
        self.nodes[id.index()].ty = Some(ty);
    }

    pub fn ty(&self, id: NodeId) -> Option<&TypeInfo> {
        self.nodes[id.index()].ty.as_ref()
    }

    pub fn set_scope(&mut self, id: NodeId, scope: ScopeId) {
        self.nodes[id.index()].scope = Some(scope);
    }

    pub fn scope(&self, id: NodeId) -> Option<ScopeId> {
        self.nodes[id.index()].scope
    }

    // -- Visit marks --

    pub fn mark_visiting(&mut self, id: NodeId) {
        self.nodes[id.index()].visit = VisitState::Visiting;
    }

    pub fn mark_visited(&mut self, id: NodeId) {
        self.nodes[id.index()].visit = VisitState::Visited;
    }

    pub fn visited(&self, id: NodeId) -> bool {
        self.nodes[id.index()].visited()
    }

    pub fn visiting(&self, id: NodeId) -> bool {
        self.nodes[id.index()].visiting()
    }

    // -- Callable accessors --

    /// The formal parameters of a callable, in declaration order.
    pub fn formals_of(&self, callable: NodeId) -> Vec<NodeId> {
        self.children(callable)
            .iter()
            .copied()
            .filter(|&c| matches!(self.get(c).kind, NodeKind::Formal))
            .collect()
    }

    /// The function body of a callable, if it has one.
    pub fn body_of(&self, callable: NodeId) -> Option<NodeId> {
        self.children(callable)
            .iter()
            .copied()
            .find(|&c| matches!(self.get(c).kind, NodeKind::FunctionBody { .. }))
    }

    /// The designated return expression of a function body.
    pub fn return_expression_of(&self, body: NodeId) -> Option<NodeId> {
        match self.get(body).kind {
            NodeKind::FunctionBody { return_expression } => return_expression,
            _ => None,
        }
    }

    // -- Literal constructors --
    //
    // Literals couple a value with its type, so the arena builds both.

    pub fn lit_int(&mut self, value: i64) -> NodeId {
        let id = self.alloc(NodeKind::Literal(LiteralValue::Int(value)), "");
        self.set_type(id, TypeInfo::Int);
        id
    }

    pub fn lit_float(&mut self, value: f64) -> NodeId {
        let id = self.alloc(NodeKind::Literal(LiteralValue::Float(value)), "");
        self.set_type(id, TypeInfo::Float);
        id
    }

    pub fn lit_str(&mut self, value: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeKind::Literal(LiteralValue::Str(value.into())), "");
        self.set_type(id, TypeInfo::Str);
        id
    }

    pub fn lit_nil(&mut self) -> NodeId {
        let id = self.alloc(NodeKind::Literal(LiteralValue::Nil), "");
        self.set_type(id, TypeInfo::Nil);
        id
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::OpKind;

    #[test]
    fn root_exists_at_index_zero() {
        let arena = NodeArena::new();
        assert!(arena.get(NodeArena::ROOT).is_root());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn add_child_links_both_directions() {
        let mut arena = NodeArena::new();
        let def = arena.alloc(NodeKind::VariableDefinition, "x");
        arena.add_child(NodeArena::ROOT, def);
        assert_eq!(arena.parent(def), Some(NodeArena::ROOT));
        assert_eq!(arena.children(NodeArena::ROOT), &[def]);
    }

    #[test]
    fn prepend_child_goes_first() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(NodeKind::VariableDefinition, "a");
        let b = arena.alloc(NodeKind::VariableDefinition, "b");
        arena.add_child(NodeArena::ROOT, a);
        arena.prepend_child(NodeArena::ROOT, b);
        assert_eq!(arena.children(NodeArena::ROOT), &[b, a]);
    }

    #[test]
    fn is_ancestor_includes_self_and_root() {
        let mut arena = NodeArena::new();
        let func = arena.alloc(NodeKind::FunctionDefinition, "f");
        let body = arena.alloc(
            NodeKind::FunctionBody {
                return_expression: None,
            },
            "",
        );
        let lit = arena.lit_int(1);
        arena.add_child(NodeArena::ROOT, func);
        arena.add_child(func, body);
        arena.add_child(body, lit);

        assert!(arena.is_ancestor(lit, lit));
        assert!(arena.is_ancestor(func, lit));
        assert!(arena.is_ancestor(NodeArena::ROOT, lit));
        assert!(!arena.is_ancestor(lit, func));
    }

    #[test]
    fn nearest_scope_walks_parent_chain() {
        let mut arena = NodeArena::new();
        let func = arena.alloc(NodeKind::FunctionDefinition, "f");
        let body = arena.alloc(
            NodeKind::FunctionBody {
                return_expression: None,
            },
            "",
        );
        let op = arena.alloc(NodeKind::BinaryOp(OpKind::Less), "");
        arena.add_child(NodeArena::ROOT, func);
        arena.add_child(func, body);
        arena.add_child(body, op);

        assert_eq!(arena.nearest_scope(op), None);
        arena.set_scope(func, ScopeId::new(7));
        assert_eq!(arena.nearest_scope(op), Some(ScopeId::new(7)));
    }

    #[test]
    fn fqn_skips_unnamed_nodes() {
        let mut arena = NodeArena::new();
        let func = arena.alloc(NodeKind::FunctionDefinition, "main");
        let body = arena.alloc(
            NodeKind::FunctionBody {
                return_expression: None,
            },
            "",
        );
        let lit = arena.lit_str("hello");
        arena.add_child(NodeArena::ROOT, func);
        arena.add_child(func, body);
        arena.add_child(body, lit);
        arena.get_mut(lit).name = "string".to_string();

        assert_eq!(arena.fqn(lit, "."), "main.string");
    }

    #[test]
    fn literal_constructors_set_types() {
        let mut arena = NodeArena::new();
        let i = arena.lit_int(3);
        let f = arena.lit_float(2.5);
        let s = arena.lit_str("hi");
        let n = arena.lit_nil();
        assert_eq!(arena.ty(i), Some(&TypeInfo::Int));
        assert_eq!(arena.ty(f), Some(&TypeInfo::Float));
        assert_eq!(arena.ty(s), Some(&TypeInfo::Str));
        assert_eq!(arena.ty(n), Some(&TypeInfo::Nil));
    }

    #[test]
    fn formals_and_body_accessors() {
        let mut arena = NodeArena::new();
        let func = arena.alloc(NodeKind::FunctionDefinition, "sq");
        let x = arena.alloc(NodeKind::Formal, "x");
        let body = arena.alloc(
            NodeKind::FunctionBody {
                return_expression: None,
            },
            "",
        );
        arena.add_child(NodeArena::ROOT, func);
        arena.add_child(func, x);
        arena.add_child(func, body);

        assert_eq!(arena.formals_of(func), vec![x]);
        assert_eq!(arena.body_of(func), Some(body));
    }
}
